//! Shared types and models for the Logistics Portal
//!
//! This crate contains the domain models and pure business rules shared
//! between the backend and the browser dashboard (via WASM).

pub mod models;
pub mod storage;
pub mod types;
pub mod validation;

pub use models::*;
pub use storage::*;
pub use types::*;
pub use validation::*;
