//! Primitive 2D regions used to seed fluid bodies.
//!
//! The solver only ever asks a region two questions: is a point inside, and
//! what box encloses it.

use crate::math::{component, Real, Vecd};

/// A region of the plane that particles can be generated in.
pub trait Shape {
    fn contains(&self, point: Vecd) -> bool;
    fn bounding_box(&self) -> BoundingBox;
}

/// Axis-aligned box `[lower, upper)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub lower: Vecd,
    pub upper: Vecd,
}

impl BoundingBox {
    pub fn new(lower: Vecd, upper: Vecd) -> Self {
        Self { lower, upper }
    }

    /// Edge lengths along each axis.
    pub fn extent(&self) -> Vecd {
        self.upper - self.lower
    }

    /// Edge length along `axis`.
    pub fn length(&self, axis: usize) -> Real {
        component(self.upper, axis) - component(self.lower, axis)
    }

    pub fn is_degenerate(&self) -> bool {
        let e = self.extent();
        !(e.x > 0.0 && e.y > 0.0) || !e.is_finite()
    }
}

impl Shape for BoundingBox {
    fn contains(&self, point: Vecd) -> bool {
        point.x >= self.lower.x
            && point.x < self.upper.x
            && point.y >= self.lower.y
            && point.y < self.upper.y
    }

    fn bounding_box(&self) -> BoundingBox {
        *self
    }
}

/// Closed polygon, inside test by the even-odd rule.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Vecd>,
}

impl Polygon {
    /// A trailing vertex equal to the first one is accepted and dropped.
    pub fn new(mut vertices: Vec<Vecd>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vecd] {
        &self.vertices
    }
}

impl Shape for Polygon {
    fn contains(&self, point: Vecd) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn bounding_box(&self) -> BoundingBox {
        let mut lower = Vecd::splat(Real::INFINITY);
        let mut upper = Vecd::splat(Real::NEG_INFINITY);
        for v in &self.vertices {
            lower = lower.min(*v);
            upper = upper.max(*v);
        }
        BoundingBox { lower, upper }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_is_half_open() {
        let b = BoundingBox::new(Vecd::ZERO, Vecd::ONE);
        assert!(b.contains(Vecd::ZERO));
        assert!(b.contains(Vecd::new(0.5, 0.999)));
        assert!(!b.contains(Vecd::new(1.0, 0.5)));
        assert!(!b.contains(Vecd::new(0.5, -1e-12)));
    }

    #[test]
    fn test_polygon_square_matches_box() {
        let square = Polygon::new(vec![
            Vecd::new(0.0, 0.0),
            Vecd::new(0.0, 1.0),
            Vecd::new(1.0, 1.0),
            Vecd::new(1.0, 0.0),
            Vecd::new(0.0, 0.0),
        ]);
        assert_eq!(square.vertices().len(), 4);
        assert!(square.contains(Vecd::new(0.25, 0.75)));
        assert!(!square.contains(Vecd::new(1.25, 0.75)));
        let bb = square.bounding_box();
        assert_eq!(bb.lower, Vecd::ZERO);
        assert_eq!(bb.upper, Vecd::ONE);
    }

    #[test]
    fn test_polygon_concave_notch() {
        // U-shape: the notch between the arms is outside
        let u = Polygon::new(vec![
            Vecd::new(0.0, 0.0),
            Vecd::new(3.0, 0.0),
            Vecd::new(3.0, 3.0),
            Vecd::new(2.0, 3.0),
            Vecd::new(2.0, 1.0),
            Vecd::new(1.0, 1.0),
            Vecd::new(1.0, 3.0),
            Vecd::new(0.0, 3.0),
        ]);
        assert!(u.contains(Vecd::new(0.5, 2.5)));
        assert!(u.contains(Vecd::new(1.5, 0.5)));
        assert!(!u.contains(Vecd::new(1.5, 2.0)));
    }
}
