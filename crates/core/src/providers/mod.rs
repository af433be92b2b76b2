pub mod registry;
pub mod traits;

// Integration implementations
pub mod bridge;
pub mod offline;
pub mod process;
