//! Runs a single job and writes its artifact.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::{Artifact, BuildError, JobSpec, RendererRegistry};

/// Renders jobs and writes their artifacts to disk.
#[derive(Debug, Clone, Copy)]
pub struct BuildExecutor<'a> {
    registry: &'a RendererRegistry,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(registry: &'a RendererRegistry) -> Self {
        Self { registry }
    }

    /// Renders `job` and writes the artifact to its output path.
    ///
    /// Parent directories are created as needed. Render failures and write
    /// failures are reported as different [`BuildError`] variants; nothing is
    /// written when rendering fails, and a failed write never leaves a partial
    /// file at the output path.
    pub fn execute(&self, job: &JobSpec) -> Result<Artifact, BuildError> {
        let artifact = self
            .registry
            .render(job)
            .map_err(|source| BuildError::Render {
                job_id: job.id.clone(),
                source,
            })?;

        write_atomic(&job.output_path, artifact.bytes.as_slice()).map_err(|source| {
            BuildError::Write {
                path: job.output_path.clone(),
                source,
            }
        })?;

        debug!(
            "Wrote {} ({} bytes)",
            job.output_path.display(),
            artifact.len()
        );
        Ok(artifact)
    }
}

/// Streams `contents` into a temporary file next to `path`, then renames it
/// over `path`. On any error the temporary file is removed and `path` keeps
/// its previous state.
fn write_atomic(path: &Path, mut contents: impl Read) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".chartsmith-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    io::copy(&mut contents, &mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
