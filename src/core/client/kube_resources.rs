/// Re-export the Kubernetes resource types the inventory walks over.
/// This module provides a centralized place for all K8s resource types

pub use k8s_openapi::api::core::v1::{
    ConfigMap,
    Namespace,
    Pod,
    PodStatus,
};

pub use k8s_openapi::api::apps::v1::{
    Deployment,
    DeploymentSpec,
};

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
