use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Every image file under `root`, sorted so seeded runs do not depend on
/// directory iteration order. Unreadable entries are skipped with a warning.
pub fn enumerate(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "skipping unreadable corpus entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_image(p))
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_images_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        for name in ["1_X_1.jpg", "notes.txt", "2_Y_2.PNG"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::write(nested.join("3_Z_3.jpeg"), b"").unwrap();
        fs::create_dir(dir.path().join("dir.jpg")).unwrap();

        let found: Vec<String> = enumerate(dir.path())
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(found, ["1_X_1.jpg", "2_Y_2.PNG", "a/b/3_Z_3.jpeg"]);
    }

    #[test]
    fn empty_directory_gives_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(enumerate(dir.path()).is_empty());
    }
}
