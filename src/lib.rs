//! Core modules of the orrery viewer.
//!
//! The crate separates the simulated world (camera rig, animation tracks,
//! car driving) from the wgpu renderer and the windowing shell, so the
//! whole simulation can be driven headless for tests and for machines
//! without a display.

pub mod app;
pub mod camera;
pub mod clock;
pub mod config;
pub mod input;
pub mod mesh;
pub mod obj;
pub mod render;
pub mod scene;

pub use app::{run_interactive, WindowInitError, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
pub use camera::{Camera, LookTarget};
pub use clock::FrameClock;
pub use config::SceneLayout;
pub use input::{InputState, KeyCode, NamedKey};
pub use mesh::{MeshData, Vertex};
pub use obj::{load_obj_file, load_obj_from_str};
pub use render::{Lighting, Renderer};
pub use scene::{
    BlendMode, CameraId, DriveState, FillMode, MeshSource, Scene, SceneInstance, Track, TrackStep,
};
