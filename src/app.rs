use std::sync::Arc;

use anyhow::{Context, Result};
use glam::DVec2;
use parking_lot::RwLock;

use crate::fractal::{leaf_length, SubdivisionRequest};
use crate::geometry::{Bounds, SIN_60};
use crate::input::{DepthSlider, SliderAction};
use crate::settings::DrawSettings;
use crate::surface::{redraw, RecordingSurface, Surface};

/// Current size of the drawing surface, shared between the event loop and
/// the renderer.
#[derive(Debug)]
pub struct CanvasViewport {
    size: RwLock<(u32, u32)>,
}

impl CanvasViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: RwLock::new((width.max(1), height.max(1))),
        }
    }

    pub fn update(&self, width: u32, height: u32) {
        *self.size.write() = (width.max(1), height.max(1));
    }

    pub fn size(&self) -> (u32, u32) {
        *self.size.read()
    }
}

/// Largest bounding triangle that fits a `width` x `height` surface,
/// centred horizontally with its base on the bottom edge.
///
/// Returns the left base vertex and the edge length.
pub fn seed_for_viewport(width: u32, height: u32) -> (DVec2, f64) {
    let (width, height) = (f64::from(width), f64::from(height));
    let length = width.min(height / SIN_60);
    (DVec2::new((width - length) / 2.0, height), length)
}

/// Front-end independent state of the viewer: settings, the depth control
/// and the surface size.
#[derive(Debug)]
pub struct Sketch {
    settings: DrawSettings,
    slider: DepthSlider,
    viewport: Arc<CanvasViewport>,
}

impl Sketch {
    pub fn new(settings: DrawSettings, viewport: Arc<CanvasViewport>) -> Self {
        let slider = DepthSlider::new(settings.depth, settings.max_depth);
        Self {
            settings,
            slider,
            viewport,
        }
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    pub fn slider(&self) -> &DepthSlider {
        &self.slider
    }

    pub fn slider_mut(&mut self) -> &mut DepthSlider {
        &mut self.slider
    }

    pub fn viewport(&self) -> &Arc<CanvasViewport> {
        &self.viewport
    }

    /// Applies a depth action; returns whether a redraw is needed.
    pub fn apply(&mut self, action: SliderAction) -> bool {
        self.slider.apply(action)
    }

    /// Subdivision request for the current depth and surface size.
    pub fn request(&self) -> Result<SubdivisionRequest> {
        let (width, height) = self.viewport.size();
        let (origin, length) = seed_for_viewport(width, height);
        SubdivisionRequest::new(origin, length, self.slider.value())
            .with_context(|| format!("cannot subdivide a {width}x{height} surface"))
    }

    /// Clears `surface` and draws the current depth. Returns the number of
    /// triangles drawn.
    pub fn redraw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<usize> {
        let request = self.request()?;
        Ok(redraw(
            surface,
            &request,
            self.settings.emission,
            self.settings.fill,
        ))
    }
}

/// Describes the pass for the current depth, one line per entry.
///
/// The pass is drawn on a [`RecordingSurface`], so the reported triangles are
/// exactly the ones a real surface would receive.
pub fn summary_lines(sketch: &Sketch, list: bool) -> Result<Vec<String>> {
    let request = sketch.request()?;
    let emission = sketch.settings().emission;
    let mut surface = RecordingSurface::default();
    let drawn = sketch.redraw(&mut surface)?;

    let mut lines = vec![
        format!(
            "Sierpinski depth {} ({emission}): {drawn} triangles",
            request.depth
        ),
        format!(
            "Seed origin=({:.2}, {:.2}) length={:.2}",
            request.origin.x, request.origin.y, request.length
        ),
        format!(
            "Leaf edge length {:.2}",
            leaf_length(request.length, request.depth)
        ),
    ];
    if let Some(bounds) = Bounds::enclosing(surface.visible()) {
        lines.push(format!(
            "Bounds min=({:.2}, {:.2}) max=({:.2}, {:.2})",
            bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
        ));
    }
    if list {
        lines.extend(surface.visible().map(|triangle| {
            format!(
                " - left=({:.2}, {:.2}) apex=({:.2}, {:.2}) right=({:.2}, {:.2})",
                triangle.left.x,
                triangle.left.y,
                triangle.apex.x,
                triangle.apex.y,
                triangle.right.x,
                triangle.right.y
            )
        }));
    }
    Ok(lines)
}

/// Prints [`summary_lines`] to stdout.
pub fn print_summary(sketch: &Sketch, list: bool) -> Result<()> {
    for line in summary_lines(sketch, list)? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::{triangle_count, Emission};

    fn sketch(depth: u32) -> Sketch {
        let settings = DrawSettings {
            depth,
            ..DrawSettings::default()
        };
        let viewport = Arc::new(CanvasViewport::new(settings.width, settings.height));
        Sketch::new(settings, viewport)
    }

    #[test]
    fn square_canvas_uses_full_width() {
        let (origin, length) = seed_for_viewport(600, 600);
        assert_eq!(origin, DVec2::new(0.0, 600.0));
        assert_eq!(length, 600.0);
    }

    #[test]
    fn wide_canvas_is_limited_by_height() {
        let (origin, length) = seed_for_viewport(1000, 433);
        assert!((length - 433.0 / SIN_60).abs() < 1e-9);
        assert!((origin.x - (1000.0 - length) / 2.0).abs() < 1e-9);
        assert_eq!(origin.y, 433.0);
    }

    #[test]
    fn viewport_never_reports_zero_area() {
        let viewport = CanvasViewport::new(0, 0);
        assert_eq!(viewport.size(), (1, 1));
        viewport.update(640, 0);
        assert_eq!(viewport.size(), (640, 1));
    }

    #[test]
    fn depth_changes_trigger_full_redraws() {
        let mut sketch = sketch(1);
        let mut surface = RecordingSurface::default();
        assert_eq!(sketch.redraw(&mut surface).unwrap(), 3);

        assert!(sketch.apply(SliderAction::Increment));
        assert_eq!(sketch.redraw(&mut surface).unwrap(), 9);
        assert_eq!(surface.visible().count(), 9);
        assert_eq!(surface.clears(), 2);
    }

    #[test]
    fn request_follows_viewport_resizes() {
        let sketch = sketch(0);
        sketch.viewport().update(300, 300);
        let request = sketch.request().unwrap();
        assert_eq!(request.length, 300.0);
        assert_eq!(request.origin, DVec2::new(0.0, 300.0));
        assert_eq!(sketch.settings().emission, Emission::Unique);
    }

    #[test]
    fn summary_reports_what_the_surface_received() {
        let settings = DrawSettings {
            depth: 2,
            emission: Emission::Replayed,
            width: 300,
            height: 300,
            ..DrawSettings::default()
        };
        let viewport = Arc::new(CanvasViewport::new(settings.width, settings.height));
        let sketch = Sketch::new(settings, viewport);

        let lines = summary_lines(&sketch, true).unwrap();
        let drawn = triangle_count(2, Emission::Replayed);
        assert_eq!(
            lines[0],
            format!("Sierpinski depth 2 (replayed): {drawn} triangles")
        );
        assert_eq!(lines[1], "Seed origin=(0.00, 300.00) length=300.00");
        assert_eq!(lines[2], "Leaf edge length 75.00");
        assert!(lines[3].starts_with("Bounds min=(0.00, "));
        assert_eq!(lines.len(), 4 + drawn);
        assert!(lines[4].starts_with(" - left=(0.00, 300.00)"));
    }
}
