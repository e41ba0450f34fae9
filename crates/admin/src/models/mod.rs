//! Typed rows of the hosted store.
//!
//! Field names follow the store's column names through serde renames, so
//! the Rust side stays `snake_case` while the wire keeps its mixed casing
//! (`categoryId`, `colorsList`, `Uid`, ...).

mod address;
mod category;
mod order;
mod product;
mod user;
pub mod wire;

pub use address::{Address, CardDetail};
pub use category::Category;
pub use order::{Customer, ORDER_COLUMNS, Order};
pub use product::Product;
pub use user::User;

use crate::store::Table;

/// A model backed by one store table.
pub trait Record: serde::de::DeserializeOwned {
    const TABLE: Table;
    /// Primary key column.
    const KEY: &'static str;
}
