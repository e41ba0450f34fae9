//! Shopdesk Admin library.
//!
//! Back office for the catalog, orders and users of a store whose records
//! live in a hosted PostgREST database. The binary serves a JSON API over
//! these modules; the CLI and integration tests use them directly.
//!
//! # Layout
//!
//! - [`store`] - record store trait, REST and in-memory backends, query cache
//! - [`models`] - typed rows and their wire encodings
//! - [`filters`] / [`list_view`] - list pages and their filter bars
//! - [`forms`] - create/edit forms for categories and products
//! - [`orders`], [`dashboard`], [`notifications`], [`shell`] - page logic
//! - [`routes`] - axum handlers
//!
//! # Security
//!
//! The store API key can read and write every table. Only deploy behind a
//! private network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod forms;
pub mod list_view;
pub mod models;
pub mod notifications;
pub mod orders;
pub mod routes;
pub mod shell;
pub mod state;
pub mod store;
