pub mod model;
pub mod environment_aggregator;
pub mod service;
