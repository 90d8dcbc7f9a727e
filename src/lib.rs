//! drone-route-planner core
//!
//! Plans a single drone's delivery round from a fixed depot under a
//! payload-dependent energy budget, and turns the route into telemetry.

pub mod config;
pub mod directory;
pub mod energy;
pub mod haversine;
pub mod http_sink;
pub mod models;
pub mod planner;
pub mod telemetry;
pub mod traits;
