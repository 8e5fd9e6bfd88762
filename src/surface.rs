use log::info;

use crate::color::Rgba;
use crate::fractal::{subdivide, Emission, SubdivisionRequest};
use crate::geometry::Triangle;

/// Drawing target for a subdivision pass.
pub trait Surface {
    /// Erases everything drawn so far.
    fn clear(&mut self);

    /// Fills `triangle` with a solid colour.
    fn fill_triangle(&mut self, triangle: &Triangle, color: Rgba);
}

/// Clears `surface` and draws a complete pass for `request`.
///
/// Returns the number of triangles drawn.
pub fn redraw<S: Surface + ?Sized>(
    surface: &mut S,
    request: &SubdivisionRequest,
    emission: Emission,
    color: Rgba,
) -> usize {
    surface.clear();
    let drawn = subdivide(request, emission, surface, color);
    info!("redrew depth {} with {drawn} triangles", request.depth);
    drawn
}

/// Single call recorded by a [`RecordingSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill { triangle: Triangle, color: Rgba },
}

/// Surface that keeps every call, used for headless runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Triangles filled since the most recent clear.
    pub fn visible(&self) -> impl Iterator<Item = &Triangle> {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear))
            .map_or(0, |index| index + 1);
        self.commands[start..].iter().filter_map(|command| match command {
            DrawCommand::Fill { triangle, .. } => Some(triangle),
            DrawCommand::Clear => None,
        })
    }

    /// Every triangle filled, across clears.
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Fill { triangle, .. } => Some(triangle),
            DrawCommand::Clear => None,
        })
    }

    pub fn clears(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Clear))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_triangle(&mut self, triangle: &Triangle, color: Rgba) {
        self.commands.push(DrawCommand::Fill {
            triangle: *triangle,
            color,
        });
    }
}
