//! Domain models for the Logistics Portal

mod client;
mod inventory;
mod order;
mod user;
mod warehouse;

pub use client::*;
pub use inventory::*;
pub use order::*;
pub use user::*;
pub use warehouse::*;
