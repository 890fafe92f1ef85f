use std::io;
use std::time::{Duration, Instant};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use log::{debug, error, info};

use crate::constants::{HELD_KEY_TIMEOUT_FRAMES, TARGET_FPS};
use crate::input::{Control, InputState};
use crate::rendering::{compose, GameGrid, OutputTarget};
use crate::scene::Scene;
use crate::session::{Session, Signal};
use crate::terminal_io::{command_for, control_for, Command, HeldKeys, SimulatedInput};

/// Terminal host: frame clock, key source, renderer and sound sink around a
/// [`Session`].
pub struct Game {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    session: Session,
    input: InputState,
    held_keys: Option<HeldKeys>,
    simulated_input: Option<SimulatedInput>,
    debug_mode_active: bool,
    max_frames: Option<u64>,
    running: bool,
    frame: u64,
}

impl Game {
    /// `reports_key_release` is false on terminals that only send key-down;
    /// held controls then time out instead.
    pub fn new(
        session: Session,
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        max_frames: Option<u64>,
        reports_key_release: bool,
    ) -> Self {
        let debug_mode_active = simulated_input.is_some();
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            session,
            input: InputState::default(),
            held_keys: (!reports_key_release).then(|| HeldKeys::new(HELD_KEY_TIMEOUT_FRAMES)),
            simulated_input,
            debug_mode_active,
            max_frames,
            running: true,
            frame: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn frames_run(&self) -> u64 {
        self.frame
    }

    pub fn run(&mut self) -> io::Result<()> {
        let frame_time = Duration::from_micros(1_000_000 / TARGET_FPS);
        let mut game_grid = GameGrid::new(self.terminal_width, self.terminal_height);
        let mut last_tick = Instant::now();

        while self.running && self.max_frames.is_none_or(|max| self.frame < max) {
            let frame_start = Instant::now();
            self.handle_input(frame_start + frame_time)?;

            let dt = if self.debug_mode_active {
                frame_time.as_secs_f64()
            } else {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;
                dt
            };
            self.session.tick(dt, &self.input);
            self.play_signals();

            if game_grid.width != self.terminal_width || game_grid.height != self.terminal_height {
                game_grid = GameGrid::new(self.terminal_width, self.terminal_height);
            }
            compose(&mut game_grid, &self.session.snapshot());
            self.render(&game_grid)?;

            self.frame += 1;
        }

        info!("Game loop ended after {} frames. Final score: {}", self.frame, self.session.score());
        Ok(())
    }

    fn handle_input(&mut self, deadline: Instant) -> io::Result<()> {
        if let Some(sim_input) = &mut self.simulated_input {
            for event in sim_input.take(self.frame) {
                self.handle_event(event);
            }
        } else {
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                    break;
                }
                let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
                self.handle_event(event);
            }
        }

        if let Some(held) = &mut self.held_keys {
            for control in held.expired(self.frame) {
                self.input.release(control);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => self.handle_key(key_event),
            Event::Resize(new_width, new_height) => {
                self.terminal_width = new_width;
                self.terminal_height = new_height;
                info!("Terminal resized to {}x{}", new_width, new_height);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.kind == KeyEventKind::Release {
            if let Some(control) = control_for(key_event.code) {
                self.input.release(control);
            }
            return;
        }

        if let Some(command) = command_for(key_event.code) {
            self.apply_command(command);
            return;
        }

        match control_for(key_event.code) {
            Some(Control::Fire) => {
                if key_event.kind == KeyEventKind::Press && self.session.fire() {
                    debug!("Fired on frame {}", self.frame);
                }
            }
            Some(control) => {
                self.input.press(control);
                if let Some(held) = &mut self.held_keys {
                    held.pressed(control, self.frame);
                }
            }
            None => {}
        }
    }

    fn apply_command(&mut self, command: Command) {
        let target = match command {
            Command::Quit => {
                info!("Quit requested.");
                self.running = false;
                return;
            }
            Command::NewGame => Scene::Playing,
            Command::HowTo => Scene::HowTo,
            Command::BackToMenu => Scene::Menu,
        };
        if let Err(e) = self.session.request_scene(target) {
            debug!("Ignored {:?}: {}", command, e);
        }
    }

    // No audio backend; signals are logged.
    fn play_signals(&mut self) {
        for signal in self.session.drain_signals() {
            match signal {
                Signal::Fired => debug!("sound: laser"),
                Signal::AsteroidDestroyed { tier } => debug!("sound: explosion (tier {})", tier.level()),
                Signal::LifeLost { lives_left } => info!("sound: crash ({} lives left)", lives_left),
                Signal::SceneChanged { from, to } => {
                    info!("Scene changed {:?} -> {:?}", from, to);
                    self.input.clear();
                }
            }
        }
    }

    fn render(&mut self, game_grid: &GameGrid) -> io::Result<()> {
        game_grid.render(&mut self.stdout_target).map_err(|e| { error!("Failed to render frame: {}", e); e })?;
        if self.debug_mode_active && self.frame % TARGET_FPS == 0 {
            if let OutputTarget::ScreenBuffer(sb) = &self.stdout_target {
                sb.print_to_log();
            }
        }
        Ok(())
    }
}
