//! Test fixtures for drone-route-planner.
//!
//! Provides realistic test data:
//! - Real villages around the GLS Hungary hub in Pest county
//! - Request builders with a standard drone

pub mod invariants;
pub mod pest_county_locations;

#[allow(unused_imports)]
pub use invariants::*;
#[allow(unused_imports)]
pub use pest_county_locations::*;
