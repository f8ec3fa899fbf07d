//! Turn orchestration core for Glimora.
//!
//! This crate contains the genuinely stateful, ordering-sensitive logic of
//! the chat client:
//!
//! - [`stream`]: byte-stream to text-fragment decoding
//! - [`turn`]: the turn controller, its context, and the mode strategies
//! - [`session`]: the in-memory session store and its persistence policy
//! - [`client`]: collaborator traits implemented in glimora-infra
//!
//! No I/O happens here; everything network- or filesystem-shaped is behind
//! the collaborator traits.

pub mod client;
pub mod session;
pub mod stream;
pub mod turn;
