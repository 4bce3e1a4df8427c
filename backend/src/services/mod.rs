//! Business logic services for the Logistics Portal

pub mod client;
pub mod inventory;
pub mod order;
pub mod role;
pub mod setting;
pub mod storage_alert;

pub use client::ClientService;
pub use inventory::InventoryService;
pub use order::OrderService;
pub use role::RoleService;
pub use setting::SettingService;
pub use storage_alert::StorageAlertService;
