//! HTTP request handlers

pub mod client;
pub mod health;
pub mod inventory;
pub mod order;
pub mod profile;
pub mod role;
pub mod setting;
pub mod storage_alert;

pub use client::*;
pub use health::*;
pub use inventory::*;
pub use order::*;
pub use profile::*;
pub use role::*;
pub use setting::*;
pub use storage_alert::*;
