//! Evidence files for completed verification runs.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes per-run evidence (`<EID>.png`, `<EID>.pdf`) into the configured
/// artifact directory. Artifacts are write-once and never read back; the
/// calling application relocates or serves them.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("⚠️ Artifact directory {:?}: {}", dir, e);
        }
        Self { dir }
    }

    pub fn screenshot_path(&self, emirates_id: &str) -> PathBuf {
        self.dir.join(format!("{}.png", emirates_id))
    }

    pub fn pdf_path(&self, emirates_id: &str) -> PathBuf {
        self.dir.join(format!("{}.pdf", emirates_id))
    }

    /// Best-effort write; losing evidence is logged, never fatal to a run.
    pub fn save_screenshot(&self, emirates_id: &str, png: &[u8]) {
        self.write(&self.screenshot_path(emirates_id), png, "screenshot");
    }

    pub fn save_pdf(&self, emirates_id: &str, pdf: &[u8]) {
        self.write(&self.pdf_path(emirates_id), pdf, "PDF");
    }

    fn write(&self, path: &Path, bytes: &[u8], kind: &str) {
        match fs::write(path, bytes) {
            Ok(()) => tracing::info!("📸 Saved {} ({} bytes): {:?}", kind, bytes.len(), path),
            Err(e) => tracing::warn!("⚠️ Failed to save {} {:?}: {}", kind, path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_artifacts_named_by_emirates_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.save_screenshot("784199012345671", b"png-bytes");
        store.save_pdf("784199012345671", b"pdf-bytes");

        assert!(dir.path().join("784199012345671.png").exists());
        assert!(dir.path().join("784199012345671.pdf").exists());
    }

    #[test]
    fn unwritable_directory_is_tolerated() {
        let store = ArtifactStore::new("/proc/no-such-dir/artifacts");
        // Must not panic; evidence loss is logged only.
        store.save_screenshot("784199012345671", b"png-bytes");
    }
}
