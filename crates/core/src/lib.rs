//! # Chatrelay Core
//!
//! Domain types, traits, and error definitions for the chatrelay web chat relay.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod history;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use history::HistoryStore;
pub use message::{Conversation, Message, Role, SessionKey};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
