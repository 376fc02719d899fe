//! Domain models for products and carts.

pub mod cart;
pub mod product;

pub use cart::{Cart, CartEntry, ResolvedCart, ResolvedEntry};
pub use product::Product;
