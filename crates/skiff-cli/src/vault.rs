//! Scoped materialization of secret content
//!
//! Secret material is written to a temp file for the duration of one upload
//! and removed on every exit path; deletion rides on the temp file's drop.

use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use eyre::Result;
use tempfile::NamedTempFile;

pub struct SecretFile {
    file: NamedTempFile,
    basename: String,
}

impl SecretFile {
    /// Write `content` to a fresh temp file
    ///
    /// The generated basename stands in for the temp file's own meaningless
    /// name when the secret lands in a remote directory.
    pub fn materialize(content: &str) -> Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or_default();
        let basename = format!("secret-{}-{}", std::process::id(), nanos);

        Ok(Self { file, basename })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    #[must_use]
    pub fn basename(&self) -> &str {
        &self.basename
    }
}
