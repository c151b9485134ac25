use std::collections::{BTreeMap, HashMap};

use super::model::{CollectedNamespace, Environment, ENVIRONMENT_NAME_LABEL};

/// Environment a namespace belongs to: its `environmentName` label when set,
/// otherwise the namespace's own name.
pub fn derive_environment_name(
    namespace_name: &str,
    labels: Option<&BTreeMap<String, String>>,
) -> String {
    labels
        .and_then(|l| l.get(ENVIRONMENT_NAME_LABEL))
        .cloned()
        .unwrap_or_else(|| namespace_name.to_string())
}

/// Group namespaces into environments.
///
/// Stable group-by with first-occurrence semantics: environments appear in
/// the order their name was first seen, namespaces keep collection order
/// inside each environment.
pub fn aggregate_environments<I>(namespaces: I) -> Vec<Environment>
where
    I: IntoIterator<Item = CollectedNamespace>,
{
    let mut environments: Vec<Environment> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for collected in namespaces {
        match index_by_name.get(&collected.environment_name) {
            Some(&idx) => environments[idx].namespaces.push(collected.namespace),
            None => {
                index_by_name.insert(collected.environment_name.clone(), environments.len());
                environments.push(Environment {
                    name: collected.environment_name,
                    namespaces: vec![collected.namespace],
                });
            }
        }
    }

    environments
}
