//! Subcommand handlers
//!
//! Each handler takes its services and an output writer so it can run
//! against stdout or a buffer.

pub mod ask;
pub mod chat;
pub mod chunk;
pub mod config;
pub mod search;
pub mod setup;
