//! NVMe controller frontend backed by the Marvell NVMe procedures.
//!
//! This module exposes NVMe controllers as API resources: creating,
//! updating, deleting, listing and inspecting controllers attached to NVMe
//! subsystems, with each operation carried out through a backend procedure
//! call. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Runtime settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
