// --- Playfield ---
pub const WINDOW_WIDTH: f64 = 800.0;
pub const WINDOW_HEIGHT: f64 = 600.0;
pub const BOUNDARY_PADDING: f64 = 300.0; // Asteroids drift this far off-screen before wrapping

// --- Session ---
pub const INITIAL_LIVES: i32 = 3;
pub const INITIAL_ASTEROID_COUNT: usize = 3;
pub const GAME_OVER_TICKS: u64 = 300; // Frames the game over screen stays up

// --- Ship ---
pub const SHIP_MAX_SPEED: f64 = 4.0;
pub const SHIP_DRAG: f64 = 0.05;
pub const SHIP_THRUST_FORWARD: f64 = 0.15;
pub const SHIP_THRUST_REVERSE: f64 = 0.2;
pub const SHIP_TURN_RATE: f64 = 3.0; // Degrees per frame
pub const RESPAWN_TICKS: u32 = 250;
pub const SHIP_HALF_EXTENTS: (f64, f64) = (24.75, 18.75);

// --- Projectiles ---
pub const PROJECTILE_SPEED: f64 = 13.0;
pub const PROJECTILE_HALF_EXTENTS: (f64, f64) = (2.25, 13.5); // Long axis along the direction of travel

// --- Asteroids ---
pub const FRAGMENT_COUNT: usize = 3;
pub const ASTEROID_SPAWN_SPEED: f64 = 1.0; // Initial vx/vy drawn from [-1, 1)
pub const ASTEROID_MAX_SPIN: f64 = 1.0;

// Half extents per sprite variant, indexed by tier (largest first).
pub const LARGE_ASTEROID_EXTENTS: [(f64, f64); 4] =
    [(25.25, 21.0), (30.0, 24.5), (22.25, 20.5), (24.5, 24.0)];
pub const MEDIUM_ASTEROID_EXTENTS: [(f64, f64); 2] = [(16.125, 16.125), (16.875, 15.0)];
pub const SMALL_ASTEROID_EXTENTS: [(f64, f64); 2] = [(10.5, 10.5), (10.875, 9.75)];
pub const TINY_ASTEROID_EXTENTS: [(f64, f64); 2] = [(6.75, 6.75), (6.0, 5.625)];

// --- HUD ---
pub const LIFE_ICON_WIDTH: f64 = 16.5;
pub const LIFE_ICON_HEIGHT: f64 = 13.0;
pub const LIFE_ICON_START_X: f64 = 10.0;

// --- Host ---
pub const TARGET_FPS: u64 = 60;
pub const HELD_KEY_TIMEOUT_FRAMES: u64 = 35; // Auto-release without key-up; outlasts the ~500 ms repeat delay
