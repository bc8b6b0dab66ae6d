use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Ensures that a directory exists at the specified path, creating it and any missing
/// parents if necessary. An existing directory is left untouched.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("create directory '{}'", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_ensure_dir_exists() {
        let base_path = Path::new("_test_singalong_ensure_dir");
        let _ = fs::remove_dir_all(base_path);

        let nested_dir = base_path.join("storage/nested");
        ensure_dir_exists(&nested_dir).unwrap();
        assert!(nested_dir.is_dir());

        // Already there, nothing to do.
        ensure_dir_exists(&nested_dir).unwrap();
        assert!(nested_dir.is_dir());

        fs::remove_dir_all(base_path).unwrap();
    }
}
