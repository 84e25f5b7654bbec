//! Generated-source output. The one place where failure is fatal: an
//! unwritable artifact aborts the pass with the offending path.

use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{Error, Result};

#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))
    }

    /// Write one generated source file, returning its full path.
    pub fn write_source_file(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
        debug!("wrote {} ({} bytes)", path.display(), contents.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_into_the_output_directory() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("generated"));
        writer.ensure_output_dir().unwrap();

        let path = writer
            .write_source_file("fake_user_service.rs", "pub struct FakeUserService;")
            .unwrap();
        assert!(path.ends_with("generated/fake_user_service.rs"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "pub struct FakeUserService;"
        );
    }

    #[test]
    fn failure_identifies_the_offending_path() {
        let writer = OutputWriter::new("/nonexistent/generated");
        let err = writer
            .write_source_file("fake_x.rs", "pub struct FakeX;")
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/generated/fake_x.rs"));
    }
}
