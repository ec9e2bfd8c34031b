//! Scene assembly and presentation
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod backend;
pub mod scene;

pub use backend::{DisplayBackend, JsonFileBackend, MemoryBackend, MemoryHandle, NullBackend};
pub use scene::{Camera, SceneNode, SceneSnapshot};
