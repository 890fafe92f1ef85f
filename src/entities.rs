use crate::body::{Body, Kinematic};
use crate::config::GameConfig;
use crate::constants::*;
use crate::input::{InputState, Thrust, Turn};
use crate::types::{Vector2D, WrapBounds};

// --- Ship ---
#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub body: Body,
    /// Scalar speed along the heading. Negative when reversing.
    pub speed: f64,
    pub max_speed: f64,
    pub drag: f64,
    pub thrust_forward: f64,
    pub thrust_reverse: f64,
    pub turn_rate: f64,
    respawn_ticks: u32,
    /// 0 while flying normally, counts up from 1 while respawning.
    respawning: u32,
    spawn_point: Vector2D,
}

impl Ship {
    /// A new ship starts out respawning at the centre of the window.
    pub fn new(config: &GameConfig) -> Self {
        let spawn_point = Vector2D::new(config.window_width / 2.0, config.window_height / 2.0);
        let mut ship = Ship {
            body: Body::new(spawn_point, Vector2D::default(), SHIP_HALF_EXTENTS),
            speed: 0.0,
            max_speed: config.ship_max_speed,
            drag: config.ship_drag,
            thrust_forward: config.thrust_forward,
            thrust_reverse: config.thrust_reverse,
            turn_rate: config.turn_rate,
            respawn_ticks: config.respawn_ticks,
            respawning: 0,
            spawn_point,
        };
        ship.respawn();
        ship
    }

    /// Back to the centre, pointing up, ghosted. Speed is left alone.
    pub fn respawn(&mut self) {
        self.respawning = 1;
        self.body.position = self.spawn_point;
        self.body.heading = 0.0;
    }

    pub fn is_respawning(&self) -> bool {
        self.respawning > 0
    }

    pub fn respawn_remaining(&self) -> u32 {
        if self.respawning == 0 {
            0
        } else {
            (self.respawn_ticks + 1).saturating_sub(self.respawning)
        }
    }

    pub fn alpha(&self) -> u8 {
        if self.respawning == 0 {
            u8::MAX
        } else {
            self.respawning.min(u8::MAX as u32) as u8
        }
    }

    pub fn update(&mut self, input: &InputState, window: &WrapBounds) {
        if self.respawning > 0 {
            self.respawning += 1;
            if self.respawning > self.respawn_ticks {
                self.respawning = 0;
            }
        }

        match input.thrust {
            Thrust::Forward => self.speed += self.thrust_forward,
            Thrust::Reverse => self.speed -= self.thrust_reverse,
            Thrust::None => {}
        }

        // Drag pulls toward zero without crossing it.
        if self.speed > 0.0 {
            self.speed = (self.speed - self.drag).max(0.0);
        } else if self.speed < 0.0 {
            self.speed = (self.speed + self.drag).min(0.0);
        }
        self.speed = self.speed.clamp(-self.max_speed, self.max_speed);

        self.body.spin = match input.turn {
            Turn::Left => self.turn_rate,
            Turn::Right => -self.turn_rate,
            Turn::None => 0.0,
        };

        self.body.velocity = Vector2D::from_heading(self.body.heading).scale(self.speed);
        self.body.integrate();
        self.body.heading = self.body.heading.rem_euclid(360.0);
        self.body.wrap(window);
    }
}

impl Kinematic for Ship {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

// --- Asteroids ---
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Tiny = 1,
    Small = 2,
    Medium = 3,
    Large = 4,
}

impl Tier {
    pub fn level(self) -> u8 {
        self as u8
    }

    /// The tier fragments split into, `None` for the terminal tier.
    pub fn child(self) -> Option<Tier> {
        match self {
            Tier::Large => Some(Tier::Medium),
            Tier::Medium => Some(Tier::Small),
            Tier::Small => Some(Tier::Tiny),
            Tier::Tiny => None,
        }
    }

    pub fn extents(self) -> &'static [(f64, f64)] {
        match self {
            Tier::Large => &LARGE_ASTEROID_EXTENTS,
            Tier::Medium => &MEDIUM_ASTEROID_EXTENTS,
            Tier::Small => &SMALL_ASTEROID_EXTENTS,
            Tier::Tiny => &TINY_ASTEROID_EXTENTS,
        }
    }

    pub fn variant_count(self) -> usize {
        self.extents().len()
    }
}

impl TryFrom<u8> for Tier {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Tier::Tiny),
            2 => Ok(Tier::Small),
            3 => Ok(Tier::Medium),
            4 => Ok(Tier::Large),
            other => Err(other),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Asteroid {
    pub id: u64,
    pub body: Body,
    pub tier: Tier,
    pub variant: usize,
}

impl Asteroid {
    pub fn new(id: u64, position: Vector2D, velocity: Vector2D, spin: f64, tier: Tier, variant: usize) -> Self {
        let extents = tier.extents();
        let variant = variant % extents.len();
        let mut body = Body::new(position, velocity, extents[variant]);
        body.spin = spin;
        Asteroid { id, body, tier, variant }
    }

    pub fn update(&mut self, bounds: &WrapBounds) {
        self.body.integrate();
        self.body.wrap(bounds);
    }
}

impl Kinematic for Asteroid {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

// --- Projectiles ---
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub body: Body,
    pub spawned_at: u64,
}

impl Projectile {
    pub fn new(id: u64, position: Vector2D, heading: f64, speed: f64, spawned_at: u64) -> Self {
        let mut body = Body::new(position, Vector2D::from_heading(heading).scale(speed), PROJECTILE_HALF_EXTENTS);
        body.heading = heading;
        Projectile { id, body, spawned_at }
    }

    pub fn update(&mut self) {
        self.body.integrate();
    }

    /// True once the centre is further outside the window than the
    /// projectile's own size.
    pub fn is_off_screen(&self, window: &WrapBounds) -> bool {
        let bounds = self.body.bounds();
        let size = bounds.width().max(bounds.height());
        let p = self.body.position;
        p.x < window.min_x - size || p.x > window.max_x + size || p.y < window.min_y - size || p.y > window.max_y + size
    }
}

impl Kinematic for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
