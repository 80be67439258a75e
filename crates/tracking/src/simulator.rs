//! Timer-driven movement simulation.
//!
//! Once per tick the simulator loads the full fleet, advances every vehicle
//! along its heading, persists the result, and hands each successfully
//! persisted vehicle to the publisher. Failures are contained per vehicle:
//! one bad record never aborts the rest of the tick.

use chrono::Utc;
use rand::Rng;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::broadcast::Publisher;
use crate::config::SimulatorConfig;
use crate::model::{LocationUpdate, RoutePoint, Vehicle};
use crate::store::VehicleStore;

/// Summary of one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Vehicles persisted and broadcast this tick.
    pub updated: usize,
    /// Vehicles skipped this tick (persistence failure or rejected model
    /// output).
    pub skipped: usize,
}

/// Advances every vehicle's position on a fixed-delay timer.
///
/// Collaborators are injected: the simulator owns no global state and can
/// run against any store/publisher pair, which is what the deterministic
/// tests do.
#[derive(Debug, Clone)]
pub struct MovementSimulator<S: VehicleStore, P: Publisher> {
    config: SimulatorConfig,
    store: S,
    publisher: P,
}

impl<S: VehicleStore, P: Publisher> MovementSimulator<S, P> {
    pub const fn new(config: SimulatorConfig, store: S, publisher: P) -> Self {
        Self { config, store, publisher }
    }

    /// Runs ticks until the process shuts down.
    ///
    /// Fixed-delay semantics: a tick that runs long delays the next one
    /// instead of overlapping it against the same store.
    pub async fn run(&self) {
        let mut interval = time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let outcome = self.tick().await;
            debug!(updated = outcome.updated, skipped = outcome.skipped, "tick complete");
        }
    }

    /// Executes one pass over the fleet.
    ///
    /// A failed fleet scan produces zero updates and zero broadcasts; the
    /// next scheduled tick retries independently.
    pub async fn tick(&self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        let vehicles = match self.store.list().await {
            Ok(vehicles) => vehicles,
            Err(err) => {
                error!(error = %err, "fleet scan failed, tick skipped");
                return outcome;
            }
        };

        for mut vehicle in vehicles {
            if !self.advance(&mut vehicle) {
                warn!(vehicle = %vehicle.vehicle_id, "non-finite position rejected");
                outcome.skipped += 1;
                continue;
            }
            vehicle.updated_at = Utc::now();

            match self.store.save(&vehicle).await {
                Ok(()) => {
                    self.publisher.publish(LocationUpdate::from(&vehicle));
                    outcome.updated += 1;
                }
                Err(err) => {
                    warn!(vehicle = %vehicle.vehicle_id, error = %err, "vehicle skipped");
                    outcome.skipped += 1;
                }
            }
        }

        outcome
    }

    /// Applies the heading/speed model to one vehicle in place.
    ///
    /// Returns `false` when the model would produce a non-finite
    /// coordinate, leaving the vehicle untouched.
    fn advance(&self, vehicle: &mut Vehicle) -> bool {
        let mut rng = rand::thread_rng();

        // Self-heal records created before heading existed.
        let mut heading = match vehicle.heading {
            Some(value) if value.is_finite() => value,
            _ => rng.gen_range(0.0..360.0),
        };

        // Occasional turn, simulating direction changes without a route graph.
        if rng.r#gen::<f64>() < self.config.turn_probability {
            heading += rng.gen_range(-self.config.turn_magnitude..=self.config.turn_magnitude);
        }
        let heading = heading.rem_euclid(360.0);

        // Flat-plane displacement; not geodesic, fine at simulated scale.
        let rad = heading.to_radians();
        let lat = self.config.speed.mul_add(rad.cos(), vehicle.lat);
        let lng = self.config.speed.mul_add(rad.sin(), vehicle.lng);
        if !lat.is_finite() || !lng.is_finite() {
            return false;
        }

        vehicle.heading = Some(heading);
        vehicle.lat = lat;
        vehicle.lng = lng;
        vehicle.route.push(RoutePoint { lat, lng });
        if vehicle.route.len() > self.config.route_cap {
            let excess = vehicle.route.len() - self.config.route_cap;
            vehicle.route.drain(..excess);
        }

        true
    }
}
