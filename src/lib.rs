//! scene-ngin
//!
//! A small scene-rendering engine built around per-material draw batching.
//! Each frame a first-person camera is positioned, a handful of geometric
//! objects (textured quads/cubes and OBJ meshes) are transformed into a
//! shared view, and every model is submitted to the GPU as one indexed draw
//! call per material-keyed index range, with the transform and material
//! uniform blocks rewritten before each draw that depends on them.
//!
//! High-level modules
//! - `camera`: first-person camera pose and view/projection math
//! - `context`: central GPU context owning surface/device/queue
//! - `data_structures`: engine data models (meshes, materials, textures,
//!   instances)
//! - `scene`: per-frame update/render orchestration and uniform-block state
//! - `pipelines`: the Phong render pipeline and its bind group layouts
//! - `resources`: helpers to load OBJ meshes and textures from disk
//! - `input`: polled input snapshot consumed by the scene
//! - `app`: window plumbing and the driving frame loop
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod input;
pub mod pipelines;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
