//! Display backends
//!
//! The plotter never draws anything itself. It assembles a
//! [`SceneSnapshot`] and presents it to whichever backend it was built
//! with: an in-memory recorder, a directory of JSON frames, or nothing.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::engine::scene::SceneSnapshot;
use crate::error::{Result, VisualizationError};

/// Sink for finished frames
pub trait DisplayBackend: Send {
    fn name(&self) -> &str;

    /// Present one frame
    fn present(&mut self, snapshot: &SceneSnapshot) -> Result<()>;

    /// Release any resources held by the backend
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    frames: Vec<SceneSnapshot>,
    released: bool,
}

/// Records every presented frame in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

/// Read access to the frames recorded by a [`MemoryBackend`]
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    state: Arc<Mutex<MemoryState>>,
}

fn lock(state: &Mutex<MemoryState>) -> Result<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| VisualizationError::Backend("memory backend lock poisoned".into()))
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that stays valid after the backend is boxed into a plotter
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl MemoryHandle {
    pub fn frames(&self) -> Result<Vec<SceneSnapshot>> {
        Ok(lock(&self.state)?.frames.clone())
    }

    pub fn frame_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.frames.len())
    }

    pub fn last(&self) -> Result<Option<SceneSnapshot>> {
        Ok(lock(&self.state)?.frames.last().cloned())
    }

    pub fn is_released(&self) -> Result<bool> {
        Ok(lock(&self.state)?.released)
    }
}

impl DisplayBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn present(&mut self, snapshot: &SceneSnapshot) -> Result<()> {
        let mut state = lock(&self.state)?;
        state.frames.push(snapshot.clone());
        debug!("Recorded frame {} ({} nodes)", state.frames.len(), snapshot.node_count());
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        lock(&self.state)?.released = true;
        Ok(())
    }
}

/// Writes each frame as `frame_NNNN.json` into a directory
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    directory: PathBuf,
    written: usize,
}

impl JsonFileBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            written: 0,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl DisplayBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json-file"
    }

    fn present(&mut self, snapshot: &SceneSnapshot) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        let path = self
            .directory
            .join(format!("frame_{:04}.json", self.written + 1));
        fs::write(&path, snapshot.to_json()?)?;
        self.written += 1;
        info!("Wrote scene '{}' to {}", snapshot.title, path.display());
        Ok(())
    }
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl DisplayBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn present(&mut self, snapshot: &SceneSnapshot) -> Result<()> {
        debug!("Discarding scene '{}'", snapshot.title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::engine::scene::Camera;

    fn snapshot(title: &str) -> SceneSnapshot {
        SceneSnapshot {
            title: title.into(),
            size: (800, 600),
            background: Color::WHITE,
            camera: Camera::fit(None, [0.0, 0.0, 1.0], 1.0, 4.0 / 3.0).unwrap(),
            nodes: Vec::new(),
        }
    }

    #[test]
    fn test_memory_backend_records_frames() {
        let mut backend = MemoryBackend::new();
        let handle = backend.handle();

        backend.present(&snapshot("first")).unwrap();
        backend.present(&snapshot("second")).unwrap();
        backend.release().unwrap();

        assert_eq!(handle.frame_count().unwrap(), 2);
        assert_eq!(handle.last().unwrap().unwrap().title, "second");
        assert!(handle.is_released().unwrap());
    }

    #[test]
    fn test_json_backend_numbers_frames() {
        let dir = std::env::temp_dir().join(format!("plotcloud-frames-{}", std::process::id()));
        let mut backend = JsonFileBackend::new(&dir);

        backend.present(&snapshot("a")).unwrap();
        backend.present(&snapshot("b")).unwrap();

        let text = fs::read_to_string(dir.join("frame_0002.json")).unwrap();
        let parsed: SceneSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.title, "b");
        assert_eq!(backend.written(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }
}
