//! Bazaar server library.
//!
//! This crate provides the backend functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod query;
pub mod routes;
pub mod state;
pub mod store;
