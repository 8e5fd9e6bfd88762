//! Sierpinski subdivision.
//!
//! A [`SubdivisionRequest`] describes the bounding triangle at one level of
//! the construction. Requests with a non-zero depth split into three
//! half-size corner requests (left, right, apex); requests at depth zero are
//! terminal and produce the triangles that get drawn. The central downward
//! triangle is never produced, which is what leaves the familiar holes.
//!
//! Generation is lazy and driven by an explicit worklist, so the call stack
//! does not grow with depth.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::FractalError;
use crate::geometry::{Point, Triangle, SIN_60};
use crate::surface::Surface;

/// Deepest subdivision accepted by [`SubdivisionRequest::new`].
pub const MAX_DEPTH: u32 = 12;

/// Which terminal draws a pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emission {
    /// Every terminal triangle exactly once (`3^depth` triangles).
    #[default]
    Unique,
    /// The slider demo's draw sequence: at the last subdivision step each of
    /// the three siblings draws all three sibling triangles, so every
    /// terminal triangle is drawn three times.
    Replayed,
}

impl Emission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emission::Unique => "unique",
            Emission::Replayed => "replayed",
        }
    }
}

impl fmt::Display for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emission {
    type Err = FractalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(Emission::Unique),
            "replayed" | "literal" => Ok(Emission::Replayed),
            _ => Err(FractalError::InvalidEmission(value.to_string())),
        }
    }
}

/// Bounding triangle at one level of the construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionRequest {
    /// Left base vertex.
    pub origin: Point,
    pub length: f64,
    /// Remaining subdivision steps.
    pub depth: u32,
}

impl SubdivisionRequest {
    /// Creates a validated request.
    pub fn new(origin: Point, length: f64, depth: u32) -> Result<Self, FractalError> {
        if !origin.is_finite() {
            return Err(FractalError::InvalidOrigin {
                x: origin.x,
                y: origin.y,
            });
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(FractalError::InvalidLength(length));
        }
        if depth > MAX_DEPTH {
            return Err(FractalError::DepthTooLarge {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(Self {
            origin,
            length,
            depth,
        })
    }

    /// The triangle this request covers.
    pub fn triangle(&self) -> Triangle {
        Triangle::from_origin(self.origin, self.length)
    }

    /// Splits the request into its left, right and apex corners.
    ///
    /// Returns `None` for terminal requests.
    pub fn children(&self) -> Option<[SubdivisionRequest; 3]> {
        if self.depth == 0 {
            return None;
        }
        let length = self.length / 2.0;
        let depth = self.depth - 1;
        let corner = |offset: DVec2| SubdivisionRequest {
            origin: self.origin + offset,
            length,
            depth,
        };
        Some([
            corner(DVec2::ZERO),
            corner(DVec2::new(length, 0.0)),
            corner(DVec2::new(length / 2.0, -length * SIN_60)),
        ])
    }

    /// Lazily produces the terminal triangles of this request.
    pub fn triangles(&self, emission: Emission) -> Triangles {
        Triangles::new(*self, emission)
    }

    /// Edge length of every terminal triangle.
    pub fn leaf_length(&self) -> f64 {
        leaf_length(self.length, self.depth)
    }
}

/// Terminal triangles of a request, depth first in left, right, apex order.
///
/// The iterator is not restartable; build a new one from the same request to
/// regenerate the identical sequence.
#[derive(Debug, Clone)]
pub struct Triangles {
    pending: Vec<SubdivisionRequest>,
    replay: VecDeque<Triangle>,
    emission: Emission,
    remaining: usize,
}

impl Triangles {
    fn new(request: SubdivisionRequest, emission: Emission) -> Self {
        Self {
            pending: vec![request],
            replay: VecDeque::new(),
            emission,
            remaining: triangle_count(request.depth, emission),
        }
    }

    fn push_children(&mut self, children: [SubdivisionRequest; 3]) {
        self.pending.extend(children.into_iter().rev());
    }

    fn queue_replay(&mut self, children: [SubdivisionRequest; 3]) {
        let siblings = children.map(|child| child.triangle());
        for _ in 0..siblings.len() {
            self.replay.extend(siblings);
        }
    }
}

impl Iterator for Triangles {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        loop {
            if let Some(triangle) = self.replay.pop_front() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(triangle);
            }
            let request = self.pending.pop()?;
            match (request.children(), self.emission) {
                (None, _) => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(request.triangle());
                }
                (Some(children), Emission::Replayed) if request.depth == 1 => {
                    self.queue_replay(children);
                }
                (Some(children), _) => self.push_children(children),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Generates the terminal triangles for the given seed without validating
/// it. Use [`SubdivisionRequest::new`] for caller supplied input.
pub fn generate_triangles(origin: Point, length: f64, depth: u32) -> Triangles {
    SubdivisionRequest {
        origin,
        length,
        depth,
    }
    .triangles(Emission::Unique)
}

/// Number of draws a pass at `depth` produces.
pub fn triangle_count(depth: u32, emission: Emission) -> usize {
    match emission {
        Emission::Unique => 3usize.saturating_pow(depth),
        Emission::Replayed if depth == 0 => 1,
        Emission::Replayed => 3usize.saturating_pow(depth.saturating_add(1)),
    }
}

/// Edge length of the terminal triangles: `length / 2^depth`.
pub fn leaf_length(length: f64, depth: u32) -> f64 {
    (0..depth).fold(length, |length, _| length / 2.0)
}

/// Fills every terminal triangle of `request` on `surface` and returns the
/// number of triangles drawn. The surface is not cleared first.
pub fn subdivide<S: Surface + ?Sized>(
    request: &SubdivisionRequest,
    emission: Emission,
    surface: &mut S,
    color: Rgba,
) -> usize {
    let mut drawn = 0;
    for triangle in request.triangles(emission) {
        surface.fill_triangle(&triangle, color);
        drawn += 1;
    }
    debug!(
        "subdivided depth {} ({emission}) into {drawn} triangles of edge {:.3}",
        request.depth,
        request.leaf_length()
    );
    drawn
}
