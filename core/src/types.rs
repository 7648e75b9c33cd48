//! Shared primitive types used across generation and loading.

/// A stable, unique identifier for any generated entity.
pub type EntityId = String;

/// A fraud ring identifier, e.g. `RING_0`.
pub type RingId = String;

/// Round a monetary amount to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
