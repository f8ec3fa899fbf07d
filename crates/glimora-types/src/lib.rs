//! Shared domain types for Glimora.
//!
//! This crate contains the core domain types used across the Glimora chat
//! client: Message, ChatSession, turn state, search results, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod search;
pub mod session;
pub mod turn;
