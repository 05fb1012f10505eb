use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use engine::{load_wire_mesh, WireMesh};
use tracing::{info, warn};

/// Result of walking the source list. `None` means every source failed and
/// the placeholder box stays in place.
pub(crate) type ModelResult = Option<Arc<WireMesh>>;

/// Tries each source in order and keeps the first that loads and normalises.
pub(crate) fn load_first_available(sources: &[PathBuf], target_height: f32) -> ModelResult {
    for source in sources {
        match load_wire_mesh(source, target_height) {
            Ok(mesh) => {
                info!(
                    path = %source.display(),
                    vertices = mesh.vertices().len(),
                    edges = mesh.edges().len(),
                    "character_model_loaded"
                );
                return Some(Arc::new(mesh));
            }
            Err(error) => warn!(
                path = %source.display(),
                error = %error,
                "character_model_source_failed"
            ),
        }
    }
    warn!(sources = sources.len(), "character_model_placeholder");
    None
}

/// Model load running on a background thread, polled once per frame.
pub(crate) struct PendingModel {
    receiver: Option<Receiver<ModelResult>>,
}

impl PendingModel {
    pub(crate) fn spawn(sources: Vec<PathBuf>, target_height: f32) -> Self {
        let (sender, receiver) = channel();
        let spawned = thread::Builder::new()
            .name("model-loader".to_string())
            .spawn(move || {
                let result = load_first_available(&sources, target_height);
                // The scene may have unloaded already; nobody is waiting then.
                let _ = sender.send(result);
            });
        match spawned {
            Ok(_) => Self {
                receiver: Some(receiver),
            },
            Err(error) => {
                warn!(error = %error, "character_model_thread_failed");
                Self::resolved()
            }
        }
    }

    /// A load that already finished; `poll` reports nothing new.
    pub(crate) fn resolved() -> Self {
        Self { receiver: None }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// `Some` exactly once, on the frame the result arrives.
    pub(crate) fn poll(&mut self) -> Option<ModelResult> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => {
                self.receiver = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("character_model_thread_exited");
                self.receiver = None;
                Some(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const TRIANGLE: &str = "v 0 0 0\nv 1 2 0\nv 0 2 1\nf 1 2 3\n";

    fn wait_for(pending: &mut PendingModel) -> ModelResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = pending.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "model load timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn falls_back_to_next_source() {
        let dir = TempDir::new().expect("temp");
        let broken = dir.path().join("broken.obj");
        fs::write(&broken, "v 0 0 0\nf 1 9\n").expect("broken");
        let good = dir.path().join("good.obj");
        fs::write(&good, TRIANGLE).expect("good");

        let sources = vec![dir.path().join("missing.obj"), broken, good];
        let mesh = load_first_available(&sources, 1.8).expect("mesh");
        let bounds = mesh.bounds().expect("bounds");
        assert!((bounds.size().y - 1.8).abs() < 1e-4);
    }

    #[test]
    fn all_sources_failing_yields_placeholder() {
        let dir = TempDir::new().expect("temp");
        let flat = dir.path().join("flat.obj");
        fs::write(&flat, "v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n").expect("flat");
        assert!(load_first_available(&[flat], 1.8).is_none());
        assert!(load_first_available(&[], 1.8).is_none());
    }

    #[test]
    fn background_load_delivers_once() {
        let dir = TempDir::new().expect("temp");
        let good = dir.path().join("good.obj");
        fs::write(&good, TRIANGLE).expect("good");

        let mut pending = PendingModel::spawn(vec![good], 1.8);
        assert!(wait_for(&mut pending).is_some());
        assert!(!pending.is_pending());
        assert!(pending.poll().is_none());
    }

    #[test]
    fn resolved_never_reports() {
        let mut pending = PendingModel::resolved();
        assert!(!pending.is_pending());
        assert!(pending.poll().is_none());
    }
}
