use bytemuck::{Pod, Zeroable};

use crate::color::Rgba;
use crate::geometry::{Point, Triangle};

/// Clip-space vertex uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;
    pub const COLOR_OFFSET: u64 = std::mem::size_of::<[f32; 2]>() as u64;
}

/// Appends the three clip-space vertices of a screen-space triangle drawn on
/// a `width` x `height` surface.
pub fn push_triangle(
    vertices: &mut Vec<Vertex>,
    triangle: &Triangle,
    color: Rgba,
    (width, height): (u32, u32),
) {
    let (width, height) = (f64::from(width.max(1)), f64::from(height.max(1)));
    let color = color.to_array();
    let to_clip = |point: Point| Vertex {
        position: [
            (2.0 * point.x / width - 1.0) as f32,
            (1.0 - 2.0 * point.y / height) as f32,
        ],
        color,
    };
    vertices.extend(triangle.vertices().map(to_clip));
}

/// Converts triangles into a flat clip-space triangle list.
pub fn triangles_to_vertices<'a>(
    triangles: impl IntoIterator<Item = &'a Triangle>,
    color: Rgba,
    size: (u32, u32),
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for triangle in triangles {
        push_triangle(&mut vertices, triangle, color, size);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn corners_map_to_clip_space() {
        let triangle = Triangle {
            left: DVec2::new(0.0, 200.0),
            apex: DVec2::new(50.0, 0.0),
            right: DVec2::new(100.0, 200.0),
        };
        let vertices = triangles_to_vertices([&triangle], Rgba::FILL, (100, 200));
        let positions: Vec<_> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[-1.0, -1.0], [0.0, 1.0], [1.0, -1.0]]);
        assert!(vertices.iter().all(|v| v.color == Rgba::FILL.to_array()));
    }

    #[test]
    fn three_vertices_per_triangle() {
        let triangles: Vec<_> =
            crate::fractal::generate_triangles(DVec2::new(0.0, 64.0), 64.0, 3).collect();
        let vertices = triangles_to_vertices(&triangles, Rgba::WHITE, (64, 64));
        assert_eq!(vertices.len(), 27 * 3);
        assert!(vertices
            .iter()
            .all(|v| v.position.iter().all(|c| (-1.0..=1.0).contains(c))));
        assert_eq!(
            bytemuck::cast_slice::<Vertex, u8>(&vertices).len() as u64,
            81 * Vertex::STRIDE
        );
    }
}
