//! Session tunables.
//!
//! [`GameConfig::default`] mirrors `constants.rs`, which stays the source of
//! the stock values. A TOML file can override any subset of fields; keys it
//! leaves out keep their defaults.
//!
//! ```toml
//! initial_lives = 5
//! ship_max_speed = 6.0
//! seed = 42
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use crate::types::WrapBounds;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    // Playfield
    pub window_width: f64,
    pub window_height: f64,
    pub boundary_padding: f64,

    // Session
    pub initial_lives: i32,
    pub initial_asteroids: usize,
    pub game_over_ticks: u64,

    // Ship
    pub ship_max_speed: f64,
    pub ship_drag: f64,
    pub thrust_forward: f64,
    pub thrust_reverse: f64,
    pub turn_rate: f64,
    pub respawn_ticks: u32,

    // Projectiles
    pub projectile_speed: f64,

    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            boundary_padding: BOUNDARY_PADDING,
            initial_lives: INITIAL_LIVES,
            initial_asteroids: INITIAL_ASTEROID_COUNT,
            game_over_ticks: GAME_OVER_TICKS,
            ship_max_speed: SHIP_MAX_SPEED,
            ship_drag: SHIP_DRAG,
            thrust_forward: SHIP_THRUST_FORWARD,
            thrust_reverse: SHIP_THRUST_REVERSE,
            turn_rate: SHIP_TURN_RATE,
            respawn_ticks: RESPAWN_TICKS,
            projectile_speed: PROJECTILE_SPEED,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_lives < 0 {
            return Err(ConfigError::Negative {
                name: "initial_lives",
                value: self.initial_lives as f64,
            });
        }

        positive("window_width", self.window_width)?;
        positive("window_height", self.window_height)?;
        positive("ship_max_speed", self.ship_max_speed)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("respawn_ticks", self.respawn_ticks as f64)?;
        positive("game_over_ticks", self.game_over_ticks as f64)?;

        non_negative("boundary_padding", self.boundary_padding)?;
        non_negative("ship_drag", self.ship_drag)?;
        non_negative("thrust_forward", self.thrust_forward)?;
        non_negative("thrust_reverse", self.thrust_reverse)?;
        non_negative("turn_rate", self.turn_rate)?;
        Ok(())
    }

    /// Edges the ship wraps at.
    pub fn window_bounds(&self) -> WrapBounds {
        WrapBounds::new(0.0, self.window_width, 0.0, self.window_height)
    }

    /// Edges asteroids wrap at.
    pub fn asteroid_bounds(&self) -> WrapBounds {
        WrapBounds::padded(self.window_width, self.window_height, self.boundary_padding)
    }
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_nan() || value < 0.0 {
        Err(ConfigError::Negative { name, value })
    } else {
        Ok(())
    }
}
