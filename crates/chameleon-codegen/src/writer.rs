//! Generated files and how they reach disk.
//!
//! Output for one plugin on one platform is written all-or-nothing: every
//! file is first staged in a temporary file beside its destination, then the
//! staged files are persisted. If anything fails, files already persisted
//! are restored to what they were before.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Artifact, CodegenError, CodegenResult};
use crate::platform::HostPlatform;

/// One rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub artifact: Artifact,
    /// Destination relative to the output directory.
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(artifact: Artifact, path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            artifact,
            path: path.into(),
            contents,
        }
    }
}

/// Everything generated for one plugin on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlugin {
    pub platform: HostPlatform,
    pub bootstrap: GeneratedFile,
    pub descriptor: GeneratedFile,
}

impl GeneratedPlugin {
    pub fn files(&self) -> [&GeneratedFile; 2] {
        [&self.bootstrap, &self.descriptor]
    }

    /// Writes both artifacts under `out_dir`. Returns the written paths.
    pub fn write_to(&self, out_dir: &Path) -> CodegenResult<Vec<PathBuf>> {
        let written = write_all(out_dir, &self.files())?;
        debug!(platform = %self.platform, dir = %out_dir.display(), "Wrote plugin artifacts");
        Ok(written)
    }
}

struct Staged {
    artifact: Artifact,
    path: PathBuf,
    temp: NamedTempFile,
}

struct Committed {
    path: PathBuf,
    previous: Option<Vec<u8>>,
}

/// Writes `files` under `out_dir`, leaving no partial output on failure.
pub fn write_all(out_dir: &Path, files: &[&GeneratedFile]) -> CodegenResult<Vec<PathBuf>> {
    let staged = files
        .iter()
        .map(|file| stage(out_dir, file))
        .collect::<CodegenResult<Vec<_>>>()?;

    let mut committed: Vec<Committed> = Vec::with_capacity(staged.len());
    for Staged {
        artifact,
        path,
        temp,
    } in staged
    {
        let previous = fs::read(&path).ok();
        if let Err(err) = temp.persist(&path) {
            rollback(&committed);
            return Err(CodegenError::Write {
                artifact,
                path,
                source: err.error,
            });
        }
        committed.push(Committed { path, previous });
    }

    Ok(committed.into_iter().map(|c| c.path).collect())
}

fn stage(out_dir: &Path, file: &GeneratedFile) -> CodegenResult<Staged> {
    let path = out_dir.join(&file.path);
    let write_error = |source| CodegenError::Write {
        artifact: file.artifact,
        path: path.clone(),
        source,
    };

    let parent = path.parent().unwrap_or(out_dir);
    fs::create_dir_all(parent).map_err(write_error)?;
    let mut temp = NamedTempFile::new_in(parent).map_err(write_error)?;
    temp.write_all(file.contents.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(write_error)?;

    Ok(Staged {
        artifact: file.artifact,
        path,
        temp,
    })
}

fn rollback(committed: &[Committed]) {
    for file in committed.iter().rev() {
        let result = match &file.previous {
            Some(previous) => fs::write(&file.path, previous),
            None => fs::remove_file(&file.path),
        };
        if let Err(error) = result {
            warn!(path = %file.path.display(), %error, "Failed to roll back generated file");
        }
    }
}
