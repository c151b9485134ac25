// Kube-rs based Kubernetes client
pub mod access_provider;
pub mod cluster_api;
pub mod kube_client;
pub mod kube_resources;
pub mod namespaces;
pub mod deployments;
pub mod config_maps;
pub mod pods;
pub mod mappers;

// In-memory clusters for deterministic runs
#[cfg(any(test, feature = "test-util"))]
pub mod fake_cluster;
