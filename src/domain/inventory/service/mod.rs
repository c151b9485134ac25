pub mod resource_collector;
pub mod snapshot_store_service;
pub mod inventory_service;
