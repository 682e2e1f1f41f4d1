/// Cross-location file inventory with per-copy metadata.
pub mod inventory;

pub use inventory::{FileCopy, FileProperties, Inventory, collect};
