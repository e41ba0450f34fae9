//! Core types for Shopdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod list;
pub mod palette;
pub mod price;
pub mod status;

pub use id::*;
pub use list::DelimitedList;
pub use palette::{ColorSelection, PALETTE, Swatch};
pub use price::{CurrencyCode, Price};
pub use status::*;
