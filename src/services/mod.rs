//! Service layer for business logic
//!
//! This module contains service functions that are pure with respect to the
//! transport layer: they operate on validated data and the read-only
//! configuration, never on raw HTTP objects.

pub mod folders;
pub mod health;
pub mod snapshot;
