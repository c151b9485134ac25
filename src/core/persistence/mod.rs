pub mod storage_path;
pub mod inventory;
