pub mod client;
pub mod depletion;
pub mod messages;
pub mod service;

// Re-export commonly used types
pub use client::InventoryClient;
pub use depletion::DepletionFlag;
pub use messages::{MaterialRequest, MaterialResponse, RequestKind};
pub use service::{InventoryLedger, InventoryService, MaterialInventory};
