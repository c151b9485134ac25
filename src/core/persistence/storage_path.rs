use std::path::{Path, PathBuf};

/// Default persistence root when none is configured
pub const DEFAULT_DATA_DIR: &str = "./data";

pub fn inventory_dir_path(root: &Path) -> PathBuf {
    root.join("inventory")
}

/// `<root>/inventory/inventory.json`
pub fn inventory_file_path(root: &Path) -> PathBuf {
    inventory_dir_path(root).join("inventory.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_file_lives_under_root() {
        let path = inventory_file_path(Path::new("/var/lib/colly"));
        assert_eq!(path, PathBuf::from("/var/lib/colly/inventory/inventory.json"));
    }
}
