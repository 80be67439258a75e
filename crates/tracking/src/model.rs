use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A tracked vehicle as held by the position store.
///
/// `vehicle_id` and `owner_id` are assigned at creation and never change;
/// the simulator is the only writer of the position fields afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: VehicleKind,
    pub lat: f64,
    pub lng: f64,
    /// Direction of travel in degrees [0, 360). Vehicles created before
    /// heading existed carry `None` until the simulator first sees them.
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default)]
    pub route: Vec<RoutePoint>,
    pub owner_id: String,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Creates a vehicle with a freshly randomized heading, used at
    /// registration time so the simulator never has to backfill one.
    #[must_use]
    pub fn register(
        vehicle_id: impl Into<String>, name: impl Into<String>, kind: VehicleKind, lat: f64,
        lng: f64, owner_id: impl Into<String>,
    ) -> Self {
        let heading = rand::thread_rng().gen_range(0.0..360.0);
        Self::new(vehicle_id, name, kind, lat, lng, heading, owner_id)
    }

    /// Creates a vehicle at an initial position with a single-point route
    /// and an already-initialized heading.
    #[must_use]
    pub fn new(
        vehicle_id: impl Into<String>, name: impl Into<String>, kind: VehicleKind, lat: f64,
        lng: f64, heading: f64, owner_id: impl Into<String>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            name: name.into(),
            kind,
            lat,
            lng,
            heading: Some(heading),
            route: vec![RoutePoint { lat, lng }],
            owner_id: owner_id.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Closed set of vehicle categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    #[default]
    Car,
    Bike,
    Truck,
    Bus,
}

/// One historical position in a vehicle's bounded route trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
}

/// A registered user. The `vehicles` name list is display metadata only;
/// authoritative ownership lives on the vehicle's `owner_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    #[serde(default)]
    pub vehicles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The `locationUpdate` event broadcast to every connected viewer.
///
/// Carries enough for a client to add a not-yet-seen vehicle to its map or
/// patch an existing one without a second round trip. Viewers filter on
/// `owner_id` themselves; the server does not scope delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub vehicle_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    pub owner_id: String,
    pub lat: f64,
    pub lng: f64,
    pub route: Vec<RoutePoint>,
}

impl From<&Vehicle> for LocationUpdate {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.vehicle_id.clone(),
            name: vehicle.name.clone(),
            kind: vehicle.kind,
            owner_id: vehicle.owner_id.clone(),
            lat: vehicle.lat,
            lng: vehicle.lng,
            route: vehicle.route.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{Vehicle, VehicleKind};

    #[test]
    fn vehicle_wire_shape() {
        let vehicle = Vehicle::new("V001", "Car 1", VehicleKind::Car, 28.6139, 77.209, 90.0, "u1");
        let value = serde_json::to_value(&vehicle).expect("should serialize");

        assert_eq!(value["vehicleId"], json!("V001"));
        assert_eq!(value["type"], json!("car"));
        assert_eq!(value["ownerId"], json!("u1"));
        assert_eq!(value["route"], json!([{"lat": 28.6139, "lng": 77.209}]));
    }

    #[test]
    fn kind_defaults_to_car() {
        let raw = json!({
            "vehicleId": "V002",
            "name": "Bus 1",
            "lat": 28.7041,
            "lng": 77.1025,
            "ownerId": "u2",
            "updatedAt": "2026-08-30T00:00:00Z"
        });
        let vehicle: Vehicle = serde_json::from_value(raw).expect("should deserialize");

        assert_eq!(vehicle.kind, VehicleKind::Car);
        assert_eq!(vehicle.heading, None);
        assert!(vehicle.route.is_empty());
    }

    #[test]
    fn update_carries_full_contract() {
        let vehicle = Vehicle::new("V003", "Truck 1", VehicleKind::Truck, 1.0, 2.0, 45.0, "u3");
        let update = super::LocationUpdate::from(&vehicle);
        let value = serde_json::to_value(&update).expect("should serialize");

        assert_eq!(value["vehicleId"], json!("V003"));
        assert_eq!(value["type"], json!("truck"));
        assert_eq!(value["ownerId"], json!("u3"));
        assert_eq!(value["lat"], json!(1.0));
        assert_eq!(value["route"].as_array().map(Vec::len), Some(1));
    }
}
