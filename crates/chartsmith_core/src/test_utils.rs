use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use crate::{Artifact, JobSpec, RenderError, Renderer, RendererRegistry};

/// Renderer that records the jobs it was asked to render.
#[derive(Clone, Default)]
pub struct FakeRenderer {
    calls: Rc<RefCell<Vec<String>>>,
    failing: Rc<RefCell<HashSet<String>>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes renders of `job_id` fail.
    pub fn fail_on(&self, job_id: &str) {
        self.failing.borrow_mut().insert(job_id.to_string());
    }

    /// Job ids rendered so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// A registry with this renderer registered for `kind`.
    pub fn registry(&self, kind: &str) -> RendererRegistry {
        RendererRegistry::new().with(kind, self.clone())
    }
}

impl Renderer for FakeRenderer {
    fn render(&self, job: &JobSpec) -> Result<Artifact, RenderError> {
        self.calls.borrow_mut().push(job.id.clone());
        if self.failing.borrow().contains(&job.id) {
            return Err(RenderError::data(format!("fake failure for {}", job.id)));
        }
        Ok(Artifact::from(format!("<html>{}</html>", job.id)))
    }
}

/// Sets a file's modification time to `secs` after the Unix epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}
