//! Networking modules for the Creator Compass REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the `CompassApi` seam and its HTTP implementation, `demo`
//! serves canned responses for offline demos, and `types` defines the shared
//! wire schema.

pub mod api;
pub mod demo;
pub mod types;
