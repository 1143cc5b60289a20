//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types (what the storefront displays and mutates)
//! - `wire.rs` — Request/response bodies matching the backend
//! - `state.rs` — Pure state containers with transition methods
//! - `client.rs` — Sub-client with HTTP methods, caching and reconciliation

pub mod admin;
pub mod cart;
pub mod coupon;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;
pub mod wishlist;
