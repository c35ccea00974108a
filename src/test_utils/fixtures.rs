use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::ATTIC_SUBDIR;

/// Isolated wiki root with a `data/attic` tree.
pub struct AtticFixture {
    pub temp_dir: TempDir,
}

impl Default for AtticFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl AtticFixture {
    /// Root with an empty attic.
    #[must_use]
    pub fn new() -> Self {
        let fixture = Self::without_attic();
        fixture.create_dir(ATTIC_SUBDIR);
        fixture
    }

    /// Root with no attic at all.
    #[must_use]
    pub fn without_attic() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        println!("[FIXTURE] Created wiki root: {:?}", temp_dir.path());
        Self { temp_dir }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn attic(&self) -> PathBuf {
        self.root().join(ATTIC_SUBDIR)
    }

    pub fn create_dir(&self, relative_path: &str) -> PathBuf {
        let full_path = self.root().join(relative_path);
        std::fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create an empty file relative to the wiki root.
    pub fn create_file(&self, relative_path: &str) -> PathBuf {
        let full_path = self.root().join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, b"").expect("Failed to write file");
        println!("[FIXTURE] Created file: {full_path:?}");
        full_path
    }

    /// Create `data/attic/<page>.<epoch>.txt.gz`. `page` may contain `/`
    /// to place the revision in a namespace directory.
    pub fn revision(&self, page: &str, epoch: i64) -> PathBuf {
        self.create_file(&format!("{ATTIC_SUBDIR}/{page}.{epoch}.txt.gz"))
    }
}
