//! Position store collaborator interfaces.
//!
//! The durable store holding vehicle and user records is external to the
//! core; these traits define the access the simulator and snapshot layers
//! need. Implementations must provide atomic single-record writes.

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{User, Vehicle};

#[async_trait]
pub trait VehicleStore: Send + Sync + Clone + 'static {
    /// Full fleet scan. Acceptable at small fleet scale; the simulator
    /// calls this once per tick.
    async fn list(&self) -> Result<Vec<Vehicle>>;

    async fn get(&self, vehicle_id: &str) -> Result<Option<Vehicle>>;

    async fn for_owner(&self, owner_id: &str) -> Result<Vec<Vehicle>>;

    /// Creates a vehicle record. Fails when the id is already taken.
    async fn insert(&self, vehicle: Vehicle) -> Result<()>;

    /// Persists a mutated vehicle. Fails when the record no longer exists,
    /// e.g. it was deleted between the tick's read and this write.
    async fn save(&self, vehicle: &Vehicle) -> Result<()>;

    /// Removes the vehicle matching both owner and id, returning it.
    async fn remove(&self, owner_id: &str, vehicle_id: &str) -> Result<Option<Vehicle>>;

    async fn count(&self) -> Result<usize>;
}

#[async_trait]
pub trait UserStore: Send + Sync + Clone + 'static {
    async fn list(&self) -> Result<Vec<User>>;

    /// Appends a vehicle display name to the owner's list. Names are never
    /// deduplicated; ownership is computed from the vehicle records.
    async fn record_vehicle_name(&self, owner_id: &str, name: &str) -> Result<()>;
}
