//! Renderer abstraction.
//!
//! A renderer turns one [`JobSpec`] into artifact bytes. Renderers are looked
//! up by chart type through an explicit [`RendererRegistry`] that the caller
//! builds and hands to the builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::{JobSpec, RenderError};

/// Bytes produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Creates an artifact from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Number of bytes in the artifact.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the artifact is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<String> for Artifact {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

/// Produces an artifact for a job.
///
/// Implementations must not write the artifact themselves; the executor owns
/// the output file.
pub trait Renderer {
    /// Renders the job.
    fn render(&self, job: &JobSpec) -> Result<Artifact, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(&JobSpec) -> Result<Artifact, RenderError>,
{
    fn render(&self, job: &JobSpec) -> Result<Artifact, RenderError> {
        self(job)
    }
}

/// Maps chart types to renderers.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: BTreeMap<String, Box<dyn Renderer>>,
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a renderer for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: impl Into<String>, renderer: impl Renderer + 'static) {
        self.renderers.insert(kind.into(), Box::new(renderer));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, kind: impl Into<String>, renderer: impl Renderer + 'static) -> Self {
        self.register(kind, renderer);
        self
    }

    /// Returns the renderer for `kind`.
    pub fn get(&self, kind: &str) -> Option<&dyn Renderer> {
        self.renderers.get(kind).map(|r| r.as_ref())
    }

    /// Returns `true` if a renderer is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.renderers.contains_key(kind)
    }

    /// Registered chart types in sorted order.
    pub fn kinds(&self) -> Vec<String> {
        self.renderers.keys().cloned().collect()
    }

    /// Renders `job` with the renderer registered for its type.
    pub fn render(&self, job: &JobSpec) -> Result<Artifact, RenderError> {
        let renderer = self
            .get(&job.kind)
            .ok_or_else(|| RenderError::UnknownKind {
                kind: job.kind.clone(),
                available: self.kinds(),
            })?;
        renderer.render(job)
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
