//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Each use case is a command (or query) struct plus a handler holding the
//! ports it needs.

pub mod handlers;
