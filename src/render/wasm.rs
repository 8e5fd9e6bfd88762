use anyhow::{anyhow, Result};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Rgba;
use crate::geometry::Triangle;
use crate::surface::Surface;

/// Surface backed by a 2D canvas for WebAssembly builds.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Creates a surface that draws into the provided HTML canvas element.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(|err| anyhow!("failed to query canvas context: {err:?}"))?
            .ok_or_else(|| anyhow!("canvas does not support 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("failed to cast canvas context"))?;
        Ok(Self { canvas, context })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        let (width, height) = self.size();
        self.context
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn fill_triangle(&mut self, triangle: &Triangle, color: Rgba) {
        let [first, second, third] = triangle.vertices();
        self.context.set_fill_style_str(&color.to_css());
        self.context.begin_path();
        self.context.move_to(first.x, first.y);
        self.context.line_to(second.x, second.y);
        self.context.line_to(third.x, third.y);
        self.context.close_path();
        self.context.fill();
    }
}
