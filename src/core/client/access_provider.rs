use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use kube::config::Kubeconfig;
use tracing::{debug, info};

/// Everything needed to reach one cluster.
#[derive(Debug, Clone)]
pub struct ClusterAccess {
    /// Name of the first cluster entry; identifies the stored snapshot
    pub declared_name: String,
    pub server_address: Option<String>,
    pub kubeconfig: Kubeconfig,
}

impl ClusterAccess {
    /// Build an access entry from a parsed kubeconfig.
    ///
    /// The first cluster entry's `name` becomes the cluster identity.
    pub fn from_kubeconfig(kubeconfig: Kubeconfig) -> Result<Self> {
        let first = kubeconfig
            .clusters
            .first()
            .ok_or_else(|| anyhow!("kubeconfig declares no clusters"))?;

        let declared_name = first.name.clone();
        let server_address = first.cluster.as_ref().and_then(|c| c.server.clone());
        info!("Resolved cluster name: {}", declared_name);

        Ok(Self {
            declared_name,
            server_address,
            kubeconfig,
        })
    }
}

/// Supplies the ordered list of clusters a refresh cycle walks.
#[async_trait]
pub trait ClusterAccessProvider: Send + Sync {
    async fn list_configurations(&self) -> Result<Vec<ClusterAccess>>;
}

/// Loads one kubeconfig per file from a directory, ordered by file name.
///
/// Without a directory the process default kubeconfig is used
/// (`KUBECONFIG` or `~/.kube/config`).
pub struct KubeconfigDirProvider {
    dir: Option<PathBuf>,
}

impl KubeconfigDirProvider {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    fn is_kubeconfig_file(path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") | Some("conf") => true,
            None => path.file_name().and_then(|n| n.to_str()) == Some("config"),
            _ => false,
        }
    }

    fn load_dir(dir: &Path) -> Result<Vec<ClusterAccess>> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read kubeconfig directory {:?}", dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| Self::is_kubeconfig_file(p))
            .collect();
        files.sort();

        debug!("Found {} kubeconfig file(s) in {:?}", files.len(), dir);

        files
            .iter()
            .map(|path| {
                let kubeconfig = Kubeconfig::read_from(path)
                    .with_context(|| format!("Can't load kubeconfig {:?}", path))?;
                ClusterAccess::from_kubeconfig(kubeconfig)
                    .with_context(|| format!("Invalid kubeconfig {:?}", path))
            })
            .collect()
    }
}

#[async_trait]
impl ClusterAccessProvider for KubeconfigDirProvider {
    async fn list_configurations(&self) -> Result<Vec<ClusterAccess>> {
        match &self.dir {
            Some(dir) => Self::load_dir(dir),
            None => {
                let kubeconfig = Kubeconfig::read().context("Can't load default kubeconfig")?;
                Ok(vec![ClusterAccess::from_kubeconfig(kubeconfig)?])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kubeconfig_yaml(cluster: &str, server: &str) -> String {
        format!(
            r#"apiVersion: v1
kind: Config
clusters:
- name: {cluster}
  cluster:
    server: {server}
contexts:
- name: {cluster}-ctx
  context:
    cluster: {cluster}
    user: {cluster}-user
current-context: {cluster}-ctx
users:
- name: {cluster}-user
  user:
    token: dummy
"#
        )
    }

    #[test]
    fn declared_name_is_first_cluster_entry() {
        let yaml = r#"apiVersion: v1
kind: Config
clusters:
- name: first
  cluster:
    server: https://first:6443
- name: second
  cluster:
    server: https://second:6443
"#;
        let kubeconfig = Kubeconfig::from_yaml(yaml).unwrap();
        let access = ClusterAccess::from_kubeconfig(kubeconfig).unwrap();
        assert_eq!(access.declared_name, "first");
        assert_eq!(access.server_address.as_deref(), Some("https://first:6443"));
    }

    #[test]
    fn kubeconfig_without_clusters_is_rejected() {
        let kubeconfig = Kubeconfig::from_yaml("apiVersion: v1\nkind: Config\n").unwrap();
        assert!(ClusterAccess::from_kubeconfig(kubeconfig).is_err());
    }

    #[tokio::test]
    async fn directory_files_load_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b-cluster.yaml"), kubeconfig_yaml("beta", "https://b:6443")).unwrap();
        fs::write(dir.path().join("a-cluster.yml"), kubeconfig_yaml("alpha", "https://a:6443")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a kubeconfig").unwrap();

        let provider = KubeconfigDirProvider::new(Some(dir.path().to_path_buf()));
        let configs = provider.list_configurations().await.unwrap();

        let names: Vec<_> = configs.iter().map(|c| c.declared_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn broken_file_fails_the_whole_listing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yaml"), kubeconfig_yaml("alpha", "https://a:6443")).unwrap();
        fs::write(dir.path().join("b.yaml"), ": : not yaml [").unwrap();

        let provider = KubeconfigDirProvider::new(Some(dir.path().to_path_buf()));
        assert!(provider.list_configurations().await.is_err());
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let provider = KubeconfigDirProvider::new(Some(PathBuf::from("/nonexistent/kubeconfigs")));
        assert!(provider.list_configurations().await.is_err());
    }
}
