//! Adapter implementations for the controller frontend ports.

pub mod memory;

mod backend;

pub use backend::{InMemoryMarvellBackend, STATUS_NO_SUCH_CONTROLLER};
