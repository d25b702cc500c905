//! Storage layer for the durable session token.
//!
//! The client keeps exactly one piece of durable state: the bearer token of the
//! current session. Everything else is refetched from the server.
//!
//! # Modules
//!
//! - `backend`: [`TokenStore`] trait
//! - `json`: JSON file store with atomic writes
//! - `memory`: in-process store for tests and ephemeral sessions
//! - `models`: on-disk record types

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::TokenStore;
pub use json::JsonTokenStore;
pub use memory::MemoryTokenStore;
pub use models::TokenRecord;
