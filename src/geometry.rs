use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Screen-space coordinate. The y axis grows downward.
pub type Point = DVec2;

/// `sin(60°)`, the height of an equilateral triangle with unit edge.
pub const SIN_60: f64 = 0.866_025_403_784_438_6;

/// Upward-pointing equilateral triangle.
///
/// `left` and `right` form the base; `apex` sits above it, which in screen
/// space means a smaller y value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub left: Point,
    pub right: Point,
    pub apex: Point,
}

impl Triangle {
    /// Builds the triangle whose left base vertex is `origin`.
    pub fn from_origin(origin: Point, length: f64) -> Self {
        Self {
            left: origin,
            right: origin + DVec2::new(length, 0.0),
            apex: origin + DVec2::new(length / 2.0, -length * SIN_60),
        }
    }

    /// Vertices in drawing order: left, apex, right.
    pub fn vertices(&self) -> [Point; 3] {
        [self.left, self.apex, self.right]
    }

    pub fn edge_length(&self) -> f64 {
        self.right.x - self.left.x
    }

    pub fn height(&self) -> f64 {
        self.left.y - self.apex.y
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: DVec2::new(self.left.x, self.apex.y),
            max: DVec2::new(self.right.x, self.left.y),
        }
    }
}

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns the union of every triangle's bounds, or `None` when empty.
    pub fn enclosing<'a>(triangles: impl IntoIterator<Item = &'a Triangle>) -> Option<Bounds> {
        triangles
            .into_iter()
            .map(Triangle::bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_points_up_in_screen_space() {
        let triangle = Triangle::from_origin(DVec2::new(10.0, 100.0), 40.0);
        assert_eq!(triangle.right, DVec2::new(50.0, 100.0));
        assert_eq!(triangle.apex.x, 30.0);
        assert!(triangle.apex.y < triangle.left.y);
        assert!((triangle.height() - 40.0 * SIN_60).abs() < 1e-12);
    }

    #[test]
    fn sin_60_matches_std() {
        assert!((SIN_60 - (std::f64::consts::PI / 3.0).sin()).abs() < 1e-15);
    }

    #[test]
    fn enclosing_bounds_cover_all_triangles() {
        let a = Triangle::from_origin(DVec2::ZERO, 10.0);
        let b = Triangle::from_origin(DVec2::new(10.0, 0.0), 10.0);
        let bounds = Bounds::enclosing([&a, &b]).unwrap();
        assert_eq!(bounds.min, DVec2::new(0.0, -10.0 * SIN_60));
        assert_eq!(bounds.max, DVec2::new(20.0, 0.0));
        assert!(Bounds::enclosing(std::iter::empty()).is_none());
    }
}
