//! Asteroid Smasher: ship, rocks and bullets on a wrapping playfield.
//!
//! The simulation core (`body`, `entities`, `fragmentation`, `collision`,
//! `scene`, `session`) has no terminal dependency. `game`, `rendering` and
//! `terminal_io` are the crossterm front-end that drives it.

pub mod body;
pub mod collision;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod fragmentation;
pub mod game;
pub mod input;
pub mod rendering;
pub mod scene;
pub mod session;
pub mod terminal_io;
pub mod types;

pub use config::GameConfig;
pub use error::{ConfigError, SceneError};
pub use input::{Control, InputState};
pub use scene::Scene;
pub use session::{Session, SessionSnapshot, Signal};
