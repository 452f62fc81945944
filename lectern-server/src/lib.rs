//! Lectern Server Library
//!
//! HTTP API over the Lectern catalog and reader. This module exports the
//! server components for testing and reuse.

pub mod handlers;
pub mod routes;
pub mod state;
