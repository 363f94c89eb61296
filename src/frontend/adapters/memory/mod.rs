//! In-memory registry adapters.

mod controller;
mod page_tokens;
mod subsystem;

pub use controller::InMemoryControllerRegistry;
pub use page_tokens::InMemoryPageTokens;
pub use subsystem::InMemorySubsystemRegistry;
