//! Read-only snapshot queries over the position store.
//!
//! Used by clients on initial load and for periodic re-synchronization,
//! independent of the live broadcast stream. Store failures surface as
//! errors; there are no partial results.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Vehicle;
use crate::store::{UserStore, VehicleStore};

/// Fleet counters for the admin dashboard.
///
/// `total_vehicles_added` counts every registration recorded against a
/// user, while `total_tracked_vehicles` counts vehicles currently in the
/// store; the two diverge once vehicles are deleted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_vehicles_added: usize,
    pub total_tracked_vehicles: usize,
    pub active_vehicles: usize,
}

/// Snapshot query facade over a vehicle store.
#[derive(Debug, Clone)]
pub struct SnapshotService<S: VehicleStore> {
    store: S,
    active_window: Duration,
}

impl<S: VehicleStore> SnapshotService<S> {
    pub const fn new(store: S, active_window: Duration) -> Self {
        Self { store, active_window }
    }

    /// Vehicles updated within the active window (10 seconds observed).
    ///
    /// # Errors
    /// Returns [`Error::StoreError`] when the store scan fails.
    pub async fn active_vehicles(&self) -> Result<Vec<Vehicle>> {
        let since = Utc::now()
            - chrono::Duration::from_std(self.active_window)
                .map_err(|err| Error::Internal(err.to_string()))?;
        let vehicles = self.store.list().await.map_err(store_error)?;
        Ok(vehicles.into_iter().filter(|vehicle| vehicle.updated_at >= since).collect())
    }

    /// All vehicles owned by `owner_id`, exact equality match.
    ///
    /// # Errors
    /// Returns [`Error::StoreError`] when the store query fails.
    pub async fn vehicles_for_owner(&self, owner_id: &str) -> Result<Vec<Vehicle>> {
        self.store.for_owner(owner_id).await.map_err(store_error)
    }

    /// Single vehicle lookup for public tracking-link pages.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when the vehicle is absent and
    /// [`Error::StoreError`] when the store query fails.
    pub async fn vehicle_by_id(&self, vehicle_id: &str) -> Result<Vehicle> {
        self.store
            .get(vehicle_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::NotFound(format!("vehicle {vehicle_id}")))
    }

    /// Counts for the admin dashboard. Active count uses the same window
    /// as [`Self::active_vehicles`]; the added count sums the vehicle name
    /// lists recorded on each user.
    ///
    /// # Errors
    /// Returns [`Error::StoreError`] when any of the counts fail.
    pub async fn stats(&self, users: &impl UserStore) -> Result<DashboardStats> {
        let users = users.list().await.map_err(store_error)?;
        let total_users = users.len();
        let total_vehicles_added = users.iter().map(|user| user.vehicles.len()).sum();
        let total_tracked_vehicles = self.store.count().await.map_err(store_error)?;
        let active_vehicles = self.active_vehicles().await?.len();

        Ok(DashboardStats {
            total_users,
            total_vehicles_added,
            total_tracked_vehicles,
            active_vehicles,
        })
    }
}

fn store_error(err: anyhow::Error) -> Error {
    Error::StoreError(err.to_string())
}
