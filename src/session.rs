//! One game attempt: ship, rocks, bullets, score, lives and the current
//! scene. The host drives it with [`Session::tick`], [`Session::fire`] and
//! [`Session::request_scene`] and reads it back through the accessors or a
//! [`SessionSnapshot`].

use std::vec::Drain;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::Kinematic;
use crate::collision;
use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{Asteroid, Projectile, Ship, Tier};
use crate::error::{ConfigResult, SceneError};
use crate::fragmentation;
use crate::input::InputState;
use crate::scene::{Scene, Trigger};
use crate::types::{Aabb, Vector2D};

/// Notifications for the audio side. The session never plays anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Fired,
    AsteroidDestroyed { tier: Tier },
    LifeLost { lives_left: u32 },
    SceneChanged { from: Scene, to: Scene },
}

pub struct Session {
    config: GameConfig,
    rng: StdRng,
    scene: Scene,
    score: u32,
    lives: u32,
    frame_count: u64,
    elapsed: f64,
    ship: Option<Ship>,
    asteroids: Vec<Asteroid>,
    projectiles: Vec<Projectile>,
    life_icons: Vec<Vector2D>,
    signals: Vec<Signal>,
    next_id: u64,
}

impl Session {
    /// Starts on the menu with an empty board; the first scene change sets
    /// the board up.
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!("New session: {} lives, {} asteroids, seed {:?}", config.initial_lives, config.initial_asteroids, config.seed);
        Ok(Session {
            lives: config.initial_lives as u32,
            config,
            rng,
            scene: Scene::Menu,
            score: 0,
            frame_count: 0,
            elapsed: 0.0,
            ship: None,
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            life_icons: Vec::new(),
            signals: Vec::new(),
            next_id: 0,
        })
    }

    // --- Read-only views ---

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Ticks since the last scene change.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds of host time fed in through `tick`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Centres of the remaining-lives icons, one per life.
    pub fn life_icons(&self) -> &[Vector2D] {
        &self.life_icons
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(self)
    }

    pub fn drain_signals(&mut self) -> Drain<'_, Signal> {
        self.signals.drain(..)
    }

    // --- Commands ---

    /// Menu command from the UI. Illegal requests leave the session untouched.
    pub fn request_scene(&mut self, to: Scene) -> Result<(), SceneError> {
        if !self.scene.can_transition(to, Trigger::Request) {
            warn!("Rejected scene request {:?} -> {:?}", self.scene, to);
            return Err(SceneError::InvalidTransition { from: self.scene, to });
        }
        self.enter(to);
        Ok(())
    }

    /// Launches a projectile from the ship's nose. Only while playing and
    /// not respawning; returns whether a shot was fired.
    pub fn fire(&mut self) -> bool {
        if self.scene != Scene::Playing {
            return false;
        }
        let Some(ship) = self.ship.as_ref() else {
            return false;
        };
        if ship.is_respawning() {
            return false;
        }

        self.next_id += 1;
        let mut projectile = Projectile::new(
            self.next_id,
            ship.body.position,
            ship.body.heading,
            self.config.projectile_speed,
            self.frame_count,
        );
        projectile.update();
        self.projectiles.push(projectile);
        self.signals.push(Signal::Fired);
        true
    }

    /// Advances the game by one frame. `dt` is the host's frame time in
    /// seconds; the simulation itself steps a fixed amount per call.
    pub fn tick(&mut self, dt: f64, input: &InputState) {
        self.frame_count += 1;
        self.elapsed += dt;

        match self.scene {
            Scene::Playing => self.step(input),
            Scene::GameOver => {
                if self.frame_count >= self.config.game_over_ticks {
                    self.enter(Scene::Menu);
                }
            }
            Scene::Menu | Scene::HowTo => {}
        }
    }

    // --- Simulation ---

    fn step(&mut self, input: &InputState) {
        let window = self.config.window_bounds();
        let asteroid_bounds = self.config.asteroid_bounds();

        for asteroid in &mut self.asteroids {
            asteroid.update(&asteroid_bounds);
        }
        for projectile in &mut self.projectiles {
            projectile.update();
        }
        if let Some(ship) = self.ship.as_mut() {
            ship.update(input, &window);
        }

        // Fragments join the field after all projectiles are resolved, so a
        // bullet can't hit a rock spawned this tick.
        let mut fragments = Vec::new();
        for (p, a) in collision::projectile_hits(&self.projectiles, &self.asteroids) {
            self.projectiles[p].kill();
            fragments.extend(self.destroy_asteroid(a));
        }

        for projectile in &mut self.projectiles {
            if projectile.is_alive() && projectile.is_off_screen(&window) {
                debug!("Projectile {} left the screen after {} ticks", projectile.id, self.frame_count.saturating_sub(projectile.spawned_at));
                projectile.kill();
            }
        }
        self.asteroids.extend(fragments);

        self.resolve_ship_hit();

        self.asteroids.retain(|a| a.is_alive());
        self.projectiles.retain(|p| p.is_alive());
    }

    fn resolve_ship_hit(&mut self) {
        let Some(ship) = self.ship.as_ref() else {
            return;
        };
        let Some(index) = collision::ship_hit(ship, &self.asteroids) else {
            return;
        };

        if self.lives == 0 {
            info!("Ship hit with no lives left. Game over.");
            self.enter(Scene::GameOver);
            return;
        }

        self.lives -= 1;
        let fragments = self.destroy_asteroid(index);
        self.asteroids.extend(fragments);
        if let Some(ship) = self.ship.as_mut() {
            ship.respawn();
        }
        self.life_icons.pop();
        self.signals.push(Signal::LifeLost { lives_left: self.lives });
        info!("Ship destroyed. Lives left: {}", self.lives);

        if self.lives == 0 {
            info!("Last life lost. Game over with score {}.", self.score);
            self.enter(Scene::GameOver);
        }
    }

    fn destroy_asteroid(&mut self, index: usize) -> Vec<Asteroid> {
        let asteroid = &mut self.asteroids[index];
        asteroid.kill();
        let tier = asteroid.tier;
        let fragments = fragmentation::fragment(asteroid, &mut self.rng, &mut self.next_id);

        self.score = self.score.saturating_add(1);
        self.signals.push(Signal::AsteroidDestroyed { tier });
        debug!("Asteroid {} (tier {}) destroyed, {} fragments. Score: {}", asteroid.id, tier.level(), fragments.len(), self.score);
        fragments
    }

    // --- Scenes ---

    fn enter(&mut self, to: Scene) {
        let from = self.scene;
        debug_assert!(
            from.can_transition(to, Trigger::Request) || from.can_transition(to, Trigger::Internal),
            "illegal transition {from:?} -> {to:?}"
        );
        if to.resets_session_on_entry() {
            self.reset();
        }
        self.scene = to;
        self.frame_count = 0;
        self.signals.push(Signal::SceneChanged { from, to });
        info!("Scene {:?} -> {:?}", from, to);
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = self.config.initial_lives as u32;
        self.projectiles.clear();
        self.asteroids.clear();
        self.ship = Some(Ship::new(&self.config));
        self.reset_life_icons();
        self.spawn_asteroids();
    }

    fn reset_life_icons(&mut self) {
        self.life_icons.clear();
        let mut cur_pos = LIFE_ICON_START_X;
        for _ in 0..self.lives {
            self.life_icons.push(Vector2D::new(cur_pos + LIFE_ICON_WIDTH, LIFE_ICON_HEIGHT));
            cur_pos += LIFE_ICON_WIDTH;
        }
    }

    fn spawn_asteroids(&mut self) {
        let bounds = self.config.asteroid_bounds();
        for _ in 0..self.config.initial_asteroids {
            // Whole-unit starting positions.
            let position = Vector2D::new(
                self.rng.gen_range(bounds.min_x as i64..bounds.max_x as i64) as f64,
                self.rng.gen_range(bounds.min_y as i64..bounds.max_y as i64) as f64,
            );
            let velocity = Vector2D::new(
                self.rng.gen_range(-ASTEROID_SPAWN_SPEED..ASTEROID_SPAWN_SPEED),
                self.rng.gen_range(-ASTEROID_SPAWN_SPEED..ASTEROID_SPAWN_SPEED),
            );
            let spin = self.rng.gen_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN);
            let variant = self.rng.gen_range(0..Tier::Large.variant_count());
            self.next_id += 1;
            self.asteroids.push(Asteroid::new(self.next_id, position, velocity, spin, Tier::Large, variant));
        }
    }
}

// --- Snapshots for the renderer ---

#[derive(Clone, Debug, PartialEq)]
pub struct ShipView {
    pub position: Vector2D,
    pub heading: f64,
    pub bounds: Aabb,
    pub alpha: u8,
    pub respawning: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidView {
    pub id: u64,
    pub position: Vector2D,
    pub heading: f64,
    pub bounds: Aabb,
    pub tier: Tier,
    pub variant: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileView {
    pub id: u64,
    pub position: Vector2D,
    pub heading: f64,
    pub bounds: Aabb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub scene: Scene,
    pub score: u32,
    pub lives: u32,
    pub frame_count: u64,
    pub window: (f64, f64),
    pub ship: Option<ShipView>,
    pub asteroids: Vec<AsteroidView>,
    pub projectiles: Vec<ProjectileView>,
    pub life_icons: Vec<Vector2D>,
}

impl From<&Ship> for ShipView {
    fn from(ship: &Ship) -> Self {
        Self {
            position: ship.body.position,
            heading: ship.body.heading,
            bounds: ship.bounds(),
            alpha: ship.alpha(),
            respawning: ship.is_respawning(),
        }
    }
}

impl From<&Asteroid> for AsteroidView {
    fn from(a: &Asteroid) -> Self {
        Self {
            id: a.id,
            position: a.body.position,
            heading: a.body.heading,
            bounds: a.bounds(),
            tier: a.tier,
            variant: a.variant,
        }
    }
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            position: p.body.position,
            heading: p.body.heading,
            bounds: p.bounds(),
        }
    }
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            scene: session.scene,
            score: session.score,
            lives: session.lives,
            frame_count: session.frame_count,
            window: (session.config.window_width, session.config.window_height),
            ship: session.ship.as_ref().map(ShipView::from),
            asteroids: session.asteroids.iter().map(AsteroidView::from).collect(),
            projectiles: session.projectiles.iter().map(ProjectileView::from).collect(),
            life_icons: session.life_icons.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(lives: i32) -> GameConfig {
        GameConfig { initial_lives: lives, seed: Some(7), ..GameConfig::default() }
    }

    fn still_rock(id: u64, x: f64, y: f64) -> Asteroid {
        Asteroid::new(id, Vector2D::new(x, y), Vector2D::default(), 0.0, Tier::Large, 0)
    }

    // Playing, rocks parked where asked, ship done respawning.
    fn ready_session(lives: i32, rocks: &[(f64, f64)]) -> Session {
        let mut session = Session::new(config(lives)).unwrap();
        session.request_scene(Scene::Playing).unwrap();
        session.asteroids = rocks
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| still_rock(100 + i as u64, x, y))
            .collect();
        for _ in 0..RESPAWN_TICKS {
            session.tick(1.0 / 60.0, &InputState::default());
        }
        assert!(!session.ship().unwrap().is_respawning());
        session.drain_signals().for_each(drop);
        session
    }

    fn count_tier(session: &Session, tier: Tier) -> usize {
        session.asteroids().iter().filter(|a| a.tier == tier).count()
    }

    #[test]
    fn asteroids_use_the_padded_field_not_the_window() {
        let mut session = ready_session(3, &[(-100.0, 300.0)]);
        session.asteroids[0].body.velocity = Vector2D::new(-1.0, 0.0);
        session.tick(1.0 / 60.0, &InputState::default());
        assert_eq!(session.asteroids()[0].body.position, Vector2D::new(-101.0, 300.0));
    }

    #[test]
    fn new_session_waits_on_menu_without_a_ship() {
        let session = Session::new(config(3)).unwrap();
        assert_eq!(session.scene(), Scene::Menu);
        assert!(session.ship().is_none());
        assert!(session.asteroids().is_empty());
        assert_eq!(session.lives(), 3);
    }

    #[test]
    fn bad_config_fails_fast() {
        assert!(Session::new(config(-2)).is_err());
        let zero_speed = GameConfig { ship_max_speed: 0.0, ..GameConfig::default() };
        assert!(Session::new(zero_speed).is_err());
    }

    #[test]
    fn starting_a_game_seeds_the_field() {
        let mut session = Session::new(config(3)).unwrap();
        session.request_scene(Scene::Playing).unwrap();

        assert_eq!(session.scene(), Scene::Playing);
        assert_eq!(session.frame_count(), 0);
        assert_eq!(session.asteroids().len(), 3);
        assert_eq!(session.life_icons().len(), 3);
        let bounds = session.config().asteroid_bounds();
        for a in session.asteroids() {
            assert_eq!(a.tier, Tier::Large);
            assert!((bounds.min_x..bounds.max_x).contains(&a.body.position.x));
            assert!((bounds.min_y..bounds.max_y).contains(&a.body.position.y));
            assert_eq!(a.body.position.x.fract(), 0.0);
            assert_eq!(a.body.position.y.fract(), 0.0);
            assert!(a.body.velocity.x.abs() <= 1.0 && a.body.velocity.y.abs() <= 1.0);
        }
        let ship = session.ship().unwrap();
        assert!(ship.is_respawning());
        assert_eq!(ship.body.position, Vector2D::new(400.0, 300.0));
        assert_eq!(
            session.drain_signals().collect::<Vec<_>>(),
            vec![Signal::SceneChanged { from: Scene::Menu, to: Scene::Playing }]
        );
    }

    #[test]
    fn cannot_fire_while_respawning_or_outside_play() {
        let mut session = Session::new(config(3)).unwrap();
        assert!(!session.fire());
        session.request_scene(Scene::Playing).unwrap();
        assert!(!session.fire());
        assert!(session.projectiles().is_empty());
    }

    #[test]
    fn shooting_a_large_rock_leaves_three_medium_ones() {
        let mut session = ready_session(3, &[(400.0, 420.0), (100.0, 100.0), (700.0, 100.0)]);
        assert!(session.fire());
        assert_eq!(session.projectiles().len(), 1);
        // One step is applied on launch.
        assert_eq!(session.projectiles()[0].body.position, Vector2D::new(400.0, 313.0));

        for _ in 0..20 {
            session.tick(1.0 / 60.0, &InputState::default());
            if session.score() > 0 {
                break;
            }
        }

        assert_eq!(session.score(), 1);
        assert_eq!(session.asteroids().len(), 5);
        assert_eq!(count_tier(&session, Tier::Medium), 3);
        assert!(session.projectiles().is_empty());
        assert!(session.asteroids().iter().all(|a| a.id != 100));
        assert_eq!(
            session.drain_signals().collect::<Vec<_>>(),
            vec![Signal::Fired, Signal::AsteroidDestroyed { tier: Tier::Large }]
        );
    }

    #[test]
    fn tiny_rock_scores_but_leaves_nothing() {
        let mut session = ready_session(3, &[(100.0, 100.0)]);
        session.asteroids.push(Asteroid::new(200, Vector2D::new(400.0, 340.0), Vector2D::default(), 0.0, Tier::Tiny, 0));
        session.fire();
        for _ in 0..5 {
            session.tick(1.0 / 60.0, &InputState::default());
        }
        assert_eq!(session.score(), 1);
        assert_eq!(session.asteroids().len(), 1);
    }

    #[test]
    fn projectile_leaving_the_window_is_removed_that_tick() {
        let mut session = ready_session(3, &[(100.0, 100.0)]);
        session.projectiles.push(Projectile::new(500, Vector2D::new(400.0, 620.0), 0.0, 13.0, 0));
        session.tick(1.0 / 60.0, &InputState::default());
        assert!(session.projectiles().is_empty());
    }

    #[test]
    fn crash_costs_a_life_and_respawns() {
        let mut session = ready_session(3, &[(100.0, 100.0)]);
        session.asteroids.push(still_rock(300, 400.0, 300.0));
        session.tick(1.0 / 60.0, &InputState::default());

        assert_eq!(session.lives(), 2);
        assert_eq!(session.life_icons().len(), 2);
        assert_eq!(session.score(), 1);
        assert_eq!(session.scene(), Scene::Playing);
        assert_eq!(count_tier(&session, Tier::Medium), 3);
        assert!(session.ship().unwrap().is_respawning());

        // Fragments sit on the ship but it's a ghost now.
        session.tick(1.0 / 60.0, &InputState::default());
        assert_eq!(session.lives(), 2);
    }

    #[test]
    fn losing_the_last_life_ends_the_game_that_tick() {
        let mut session = ready_session(1, &[(100.0, 100.0)]);
        session.asteroids.push(still_rock(300, 400.0, 300.0));
        session.tick(1.0 / 60.0, &InputState::default());

        assert_eq!(session.lives(), 0);
        assert_eq!(session.scene(), Scene::GameOver);
        assert_eq!(session.frame_count(), 0);
        assert!(session.life_icons().is_empty());
        let signals: Vec<Signal> = session.drain_signals().collect();
        assert!(signals.contains(&Signal::LifeLost { lives_left: 0 }));
        assert_eq!(signals.last(), Some(&Signal::SceneChanged { from: Scene::Playing, to: Scene::GameOver }));
    }

    #[test]
    fn crash_with_zero_lives_goes_straight_to_game_over() {
        let mut session = ready_session(0, &[(100.0, 100.0)]);
        session.asteroids.push(still_rock(300, 400.0, 300.0));
        session.tick(1.0 / 60.0, &InputState::default());
        assert_eq!(session.lives(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.scene(), Scene::GameOver);
    }

    #[test]
    fn game_over_returns_to_a_fresh_menu_after_300_ticks() {
        let mut session = ready_session(1, &[(100.0, 100.0)]);
        session.asteroids.push(still_rock(300, 400.0, 300.0));
        session.tick(1.0 / 60.0, &InputState::default());
        assert_eq!(session.scene(), Scene::GameOver);
        let frozen: Vec<Vector2D> = session.asteroids().iter().map(|a| a.body.position).collect();

        for _ in 0..299 {
            session.tick(1.0 / 60.0, &InputState::default());
        }
        assert_eq!(session.scene(), Scene::GameOver);
        assert_eq!(session.score(), 1);
        let still_frozen: Vec<Vector2D> = session.asteroids().iter().map(|a| a.body.position).collect();
        assert_eq!(frozen, still_frozen);

        session.tick(1.0 / 60.0, &InputState::default());
        assert_eq!(session.scene(), Scene::Menu);
        assert_eq!(session.frame_count(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 1);
        assert_eq!(session.asteroids().len(), 3);
        assert!(session.asteroids().iter().all(|a| a.tier == Tier::Large));
        assert!(session.projectiles().is_empty());
    }

    #[test]
    fn menu_and_how_to_do_not_simulate() {
        let mut session = Session::new(config(3)).unwrap();
        session.request_scene(Scene::HowTo).unwrap();
        let before: Vec<Vector2D> = session.asteroids().iter().map(|a| a.body.position).collect();
        for _ in 0..10 {
            session.tick(0.016, &InputState::default());
        }
        let after: Vec<Vector2D> = session.asteroids().iter().map(|a| a.body.position).collect();
        assert_eq!(before, after);
        assert_eq!(session.frame_count(), 10);
    }

    #[test]
    fn how_to_round_trip_resets_the_board() {
        let mut session = ready_session(3, &[(400.0, 420.0)]);
        session.fire();
        for _ in 0..10 {
            session.tick(0.016, &InputState::default());
        }
        assert_eq!(session.score(), 1);

        // Playing has no menu exit, so come back through game over.
        assert_eq!(
            session.request_scene(Scene::HowTo),
            Err(SceneError::InvalidTransition { from: Scene::Playing, to: Scene::HowTo })
        );
        session.scene = Scene::Menu;
        session.request_scene(Scene::HowTo).unwrap();
        assert_eq!(session.score(), 0);
        assert_eq!(session.asteroids().len(), 3);
        session.request_scene(Scene::Menu).unwrap();
        assert_eq!(session.scene(), Scene::Menu);
        assert_eq!(session.frame_count(), 0);
    }

    #[test]
    fn rejected_request_changes_nothing() {
        let mut session = Session::new(config(3)).unwrap();
        let err = session.request_scene(Scene::GameOver).unwrap_err();
        assert_eq!(err, SceneError::InvalidTransition { from: Scene::Menu, to: Scene::GameOver });
        assert_eq!(session.scene(), Scene::Menu);
        assert!(session.ship().is_none());
        assert_eq!(session.drain_signals().count(), 0);
    }

    #[test]
    fn elapsed_time_accumulates() {
        let mut session = Session::new(config(3)).unwrap();
        session.tick(0.25, &InputState::default());
        session.tick(0.5, &InputState::default());
        assert_eq!(session.elapsed(), 0.75);
    }

    #[test]
    fn snapshot_mirrors_the_session() {
        let mut session = Session::new(config(3)).unwrap();
        session.request_scene(Scene::Playing).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.scene, Scene::Playing);
        assert_eq!(snapshot.asteroids.len(), 3);
        assert_eq!(snapshot.window, (800.0, 600.0));
        let ship = snapshot.ship.unwrap();
        assert!(ship.respawning);
        assert_eq!(ship.alpha, 1);
    }
}
