//! Shopdesk Core - Shared types library.
//!
//! This crate provides common types used across all Shopdesk components:
//! - `admin` - Back-office API over the hosted record store
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, statuses, delimited lists and the color palette

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
