use crate::types::{Aabb, Vector2D, WrapBounds};

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Degrees. 0 points up, positive turns counter-clockwise.
    pub heading: f64,
    pub spin: f64,
    /// Half width/height of the unrotated sprite.
    pub half_extents: (f64, f64),
    pub alive: bool,
}

impl Body {
    pub fn new(position: Vector2D, velocity: Vector2D, half_extents: (f64, f64)) -> Self {
        Body {
            position,
            velocity,
            heading: 0.0,
            spin: 0.0,
            half_extents,
            alive: true,
        }
    }

    pub fn integrate(&mut self) {
        self.position = self.position.add(self.velocity);
        self.heading += self.spin;
    }

    pub fn bounds(&self) -> Aabb {
        let (hw, hh) = self.half_extents;
        let radians = self.heading.to_radians();
        let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
        Aabb::from_center(self.position, cos * hw + sin * hh, sin * hw + cos * hh)
    }

    /// Moves the body to the opposite side once its bounds have fully left
    /// `wrap`. At most one wrap per axis per call.
    pub fn wrap(&mut self, wrap: &WrapBounds) {
        let bounds = self.bounds();
        if bounds.right < wrap.min_x {
            self.position.x += wrap.max_x - bounds.left;
        } else if bounds.left > wrap.max_x {
            self.position.x -= bounds.right - wrap.min_x;
        }
        if bounds.top < wrap.min_y {
            self.position.y += wrap.max_y - bounds.bottom;
        } else if bounds.bottom > wrap.max_y {
            self.position.y -= bounds.top - wrap.min_y;
        }
    }
}

/// Anything that owns a [`Body`].
pub trait Kinematic {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn bounds(&self) -> Aabb {
        self.body().bounds()
    }

    fn is_alive(&self) -> bool {
        self.body().alive
    }

    fn kill(&mut self) {
        self.body_mut().alive = false;
    }
}
