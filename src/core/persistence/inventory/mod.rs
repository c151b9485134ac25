pub mod inventory_tables;
pub mod inventory_fs_adapter;
pub mod inventory_repository_trait;
pub mod inventory_repository;
