#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    /// Unit vector for a heading in degrees, where 0 points up (+y) and
    /// positive angles turn counter-clockwise.
    pub fn from_heading(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Vector2D::new(-radians.sin(), radians.cos())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Aabb {
    pub fn from_center(center: Vector2D, half_width: f64, half_height: f64) -> Self {
        Aabb {
            left: center.x - half_width,
            right: center.x + half_width,
            bottom: center.y - half_height,
            top: center.y + half_height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.bottom < other.top
            && other.bottom < self.top
    }
}

/// Rectangle a body wraps around once its bounds have fully left it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WrapBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        WrapBounds { min_x, max_x, min_y, max_y }
    }

    pub fn padded(width: f64, height: f64, padding: f64) -> Self {
        WrapBounds::new(-padding, width + padding, -padding, height + padding)
    }
}
