//! Nebula Client API Library
//!
//! A small HTTP API for inspecting and snapshotting local directories.
//! This library exposes modules for testing and external use; the binary
//! entry point is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
