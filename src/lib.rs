//! Marvell bridge: NVMe controller frontend for Marvell storage backends.
//!
//! This crate exposes NVMe controllers as named API resources and carries
//! out each lifecycle operation through a Marvell backend procedure call,
//! keeping a local registry of the controllers it created.
//!
//! # Architecture
//!
//! The bridge follows hexagonal architecture principles:
//!
//! - **Domain**: Resource names, controller specs and field masks
//! - **Ports**: Registry and backend invoker traits
//! - **Adapters**: In-memory registries and an emulated Marvell backend
//! - **Services**: Create, update, delete, list, get and stats orchestration
//!
//! # Modules
//!
//! - [`frontend`]: NVMe controller lifecycle over backend procedures

pub mod frontend;
