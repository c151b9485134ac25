pub mod k8s_refresh;
