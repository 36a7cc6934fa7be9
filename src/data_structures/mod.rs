//! Engine data structures: models, materials, textures and instances.
//!
//! - `model` contains vertex/material definitions, draw-range batching and
//!   the GPU-resident geometry models
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-object transformation data

pub mod instance;
pub mod model;
pub mod texture;
