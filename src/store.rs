//! Process-local position store.
//!
//! DashMap-backed implementation of the store traits, with atomic
//! single-record writes. Stands in for the durable document store the
//! service would normally talk to.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracking::model::{User, Vehicle, VehicleKind};
use tracking::store::{UserStore, VehicleStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    vehicles: Arc<DashMap<String, Vehicle>>,
    users: Arc<DashMap<String, User>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    /// Inserts a demo user and two sample vehicles when the store is empty
    /// so a fresh deployment shows live movement immediately.
    pub fn seed_if_empty(&self) {
        if !self.vehicles.is_empty() {
            return;
        }
        let seeded = [
            Vehicle::new("V001", "Car 1", VehicleKind::Car, 28.6139, 77.209, 90.0, "demo"),
            Vehicle::new("V002", "Bus 1", VehicleKind::Bus, 28.7041, 77.1025, 180.0, "demo"),
        ];
        self.add_user(User {
            id: "demo".to_string(),
            name: "Demo User".to_string(),
            email: "demo@tracker.local".to_string(),
            image: String::new(),
            vehicles: seeded.iter().map(|vehicle| vehicle.name.clone()).collect(),
            created_at: Utc::now(),
        });
        for vehicle in seeded {
            self.vehicles.insert(vehicle.vehicle_id.clone(), vehicle);
        }
    }
}

#[async_trait]
impl VehicleStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> =
            self.vehicles.iter().map(|entry| entry.value().clone()).collect();
        vehicles.sort_by(|left, right| left.vehicle_id.cmp(&right.vehicle_id));
        Ok(vehicles)
    }

    async fn get(&self, vehicle_id: &str) -> Result<Option<Vehicle>> {
        Ok(self.vehicles.get(vehicle_id).map(|entry| entry.value().clone()))
    }

    async fn for_owner(&self, owner_id: &str) -> Result<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|entry| entry.value().owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        vehicles.sort_by(|left, right| left.vehicle_id.cmp(&right.vehicle_id));
        Ok(vehicles)
    }

    async fn insert(&self, vehicle: Vehicle) -> Result<()> {
        if self.vehicles.contains_key(&vehicle.vehicle_id) {
            bail!("vehicle {} already exists", vehicle.vehicle_id);
        }
        self.vehicles.insert(vehicle.vehicle_id.clone(), vehicle);
        Ok(())
    }

    async fn save(&self, vehicle: &Vehicle) -> Result<()> {
        // Atomic check-and-write: a vehicle deleted mid-tick must not be
        // resurrected by the simulator's save.
        let Some(mut entry) = self.vehicles.get_mut(&vehicle.vehicle_id) else {
            bail!("vehicle {} no longer exists", vehicle.vehicle_id);
        };
        *entry = vehicle.clone();
        Ok(())
    }

    async fn remove(&self, owner_id: &str, vehicle_id: &str) -> Result<Option<Vehicle>> {
        let removed = self
            .vehicles
            .remove_if(vehicle_id, |_, vehicle| vehicle.owner_id == owner_id)
            .map(|(_, vehicle)| vehicle);
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.vehicles.len())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|entry| entry.value().clone()).collect();
        // Newest first.
        users.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(users)
    }

    async fn record_vehicle_name(&self, owner_id: &str, name: &str) -> Result<()> {
        if let Some(mut user) = self.users.get_mut(owner_id) {
            user.vehicles.push(name.to_string());
        }
        Ok(())
    }
}
