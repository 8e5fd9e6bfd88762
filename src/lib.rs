//! Sierpinski triangle subdivision with interchangeable drawing surfaces.
//!
//! The geometry is computed by a pure, lazy generator ([`fractal`]) and
//! handed to a [`Surface`] that knows how to clear itself and fill a
//! triangle. Native builds draw through wgpu; WebAssembly builds draw on a
//! 2D canvas driven by a range input.

pub mod app;
pub mod color;
pub mod error;
pub mod fractal;
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod render;
pub mod settings;
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{seed_for_viewport, CanvasViewport, Sketch};
pub use color::Rgba;
pub use error::FractalError;
pub use fractal::{
    generate_triangles, leaf_length, subdivide, triangle_count, Emission, SubdivisionRequest,
    Triangles, MAX_DEPTH,
};
pub use geometry::{Bounds, Point, Triangle, SIN_60};
pub use input::{DepthSlider, KeyCode, NamedKey, SliderAction};
pub use settings::DrawSettings;
pub use surface::{redraw, DrawCommand, RecordingSurface, Surface};
