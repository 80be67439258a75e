//! Fan-out of location updates to connected viewers.
//!
//! One `tokio::sync::broadcast` channel serves every viewer session. There
//! is no server-side owner filtering: each session receives every update
//! and clients filter on `ownerId` against their own identity.

use tokio::sync::broadcast;

use crate::model::LocationUpdate;

/// Capacity of the broadcast channel. Receivers that fall this far behind
/// observe `RecvError::Lagged` and skip ahead rather than stalling the
/// simulator.
const BROADCAST_CAPACITY: usize = 256;

/// The `Publisher` trait defines the outbound event dispatch behavior.
pub trait Publisher: Send + Sync + Clone + 'static {
    /// Emit one location update to all current subscribers. Non-blocking
    /// and best-effort: viewers connecting later rely on the snapshot API.
    fn publish(&self, update: LocationUpdate);
}

/// Broadcast hub handed to the simulator and to each viewer connection.
#[derive(Debug, Clone)]
pub struct LocationBroadcast {
    sender: broadcast::Sender<LocationUpdate>,
}

impl LocationBroadcast {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Subscribe to the stream. Each viewer session calls this once.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LocationUpdate> {
        self.sender.subscribe()
    }

    /// Number of currently connected viewer sessions.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LocationBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher for LocationBroadcast {
    fn publish(&self, update: LocationUpdate) {
        // send() errors when there are no receivers, which is fine here.
        let _ = self.sender.send(update);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{LocationBroadcast, Publisher};
    use crate::model::{LocationUpdate, Vehicle, VehicleKind};

    fn update(id: &str) -> LocationUpdate {
        let vehicle = Vehicle::new(id, "Car 1", VehicleKind::Car, 1.0, 2.0, 0.0, "u1");
        LocationUpdate::from(&vehicle)
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_update() {
        let hub = LocationBroadcast::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.publish(update("V001"));
        hub.publish(update("V002"));

        for receiver in [&mut first, &mut second] {
            let got_one = receiver.recv().await.expect("should receive first update");
            let got_two = receiver.recv().await.expect("should receive second update");
            assert_eq!(got_one.vehicle_id, "V001");
            assert_eq!(got_two.vehicle_id, "V002");
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let hub = LocationBroadcast::new();
        hub.publish(update("V001"));
        assert_eq!(hub.receiver_count(), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_leaves_the_recipient_set() {
        let hub = LocationBroadcast::new();
        let receiver = hub.subscribe();
        assert_eq!(hub.receiver_count(), 1);

        drop(receiver);
        assert_eq!(hub.receiver_count(), 0);
    }
}
