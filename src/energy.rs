//! Payload-dependent range and consumption.
//!
//! Full-charge range shrinks linearly with the payload aboard when the
//! battery is topped up; each kilometre flown costs more range the heavier
//! the drone is.

use crate::models::Vehicle;

/// Range never drops below this while the vehicle can carry cargo at all.
pub const MIN_CAPACITY_KM: f64 = 10.0;

/// Fraction of base range lost at maximum rated payload.
pub const CAPACITY_LOSS_AT_MAX_PAYLOAD: f64 = 0.5;

/// Extra consumption at maximum rated payload.
pub const CONSUMPTION_GAIN_AT_MAX_PAYLOAD: f64 = 0.3;

/// Full-charge range in kilometres with `payload_kg` aboard.
///
/// A vehicle with no usable payload rating has zero capacity.
pub fn capacity_km(vehicle: &Vehicle, payload_kg: f64) -> f64 {
    if vehicle.max_payload_kg <= 0.0 {
        return 0.0;
    }
    let factor = 1.0 - CAPACITY_LOSS_AT_MAX_PAYLOAD * payload_kg.max(0.0) / vehicle.max_payload_kg;
    MIN_CAPACITY_KM.max(vehicle.base_range_km * factor)
}

/// Multiplier applied to every kilometre flown with `payload_kg` aboard.
pub fn consumption_factor(payload_kg: f64, vehicle: &Vehicle) -> f64 {
    if vehicle.max_payload_kg <= 0.0 {
        return 1.0;
    }
    let load = payload_kg.clamp(0.0, vehicle.max_payload_kg) / vehicle.max_payload_kg;
    1.0 + CONSUMPTION_GAIN_AT_MAX_PAYLOAD * load
}

/// Remaining range as a percentage of capacity, in `[0, 100]`.
pub fn battery_pct(remaining_range_km: f64, capacity_km: f64) -> f64 {
    if capacity_km <= 0.0 {
        return 0.0;
    }
    (remaining_range_km / capacity_km * 100.0).clamp(0.0, 100.0)
}
