use serde::Serialize;

/// Cross-product slack for the collinearity test.
pub const COLLINEAR_EPS: f64 = 1e-6;
/// Bounding-box padding, absorbs rounding in exported coordinates.
pub const BBOX_PAD: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BBox {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }
}

/// True when `p` lies on the straight segment `a`-`b`.
pub fn is_point_on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (p.y - a.y) * (b.x - a.x) - (p.x - a.x) * (b.y - a.y);
    if cross.abs() > COLLINEAR_EPS {
        return false;
    }
    if p.x < a.x.min(b.x) - BBOX_PAD || p.x > a.x.max(b.x) + BBOX_PAD {
        return false;
    }
    if p.y < a.y.min(b.y) - BBOX_PAD || p.y > a.y.max(b.y) + BBOX_PAD {
        return false;
    }
    true
}
