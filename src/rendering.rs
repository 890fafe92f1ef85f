use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
};

use crate::entities::Tier;
use crate::scene::Scene;
use crate::session::{SessionSnapshot, ShipView};
use crate::types::{Aabb, Vector2D};

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer.get(y as usize).map(|r| r.iter().collect()).unwrap_or_default()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for y in 0..self.height {
            info!("{}", self.row(y));
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            },
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Nothing to do headless
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

// --- World to terminal cell mapping ---
/// The world has y pointing up; terminal rows count down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub world_width: f64,
    pub world_height: f64,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world: (f64, f64)) -> Self {
        Viewport { cols, rows, world_width: world.0, world_height: world.1 }
    }

    fn col(&self, x: f64) -> i32 {
        (x / self.world_width * self.cols as f64).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        ((self.world_height - y) / self.world_height * self.rows as f64).floor() as i32
    }

    pub fn to_cell(&self, p: Vector2D) -> Option<(u16, u16)> {
        let (col, row) = (self.col(p.x), self.row(p.y));
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            None
        } else {
            Some((col as u16, row as u16))
        }
    }

    pub fn cells(&self, bounds: &Aabb) -> impl Iterator<Item = (u16, u16)> {
        let left = self.col(bounds.left).max(0);
        let right = self.col(bounds.right).min(self.cols as i32 - 1);
        let top = self.row(bounds.top).max(0);
        let bottom = self.row(bounds.bottom).min(self.rows as i32 - 1);
        (top..=bottom).flat_map(move |y| (left..=right).map(move |x| (x as u16, y as u16)))
    }
}

// --- GameGrid: one frame of characters ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str) {
        for (i, c) in s.chars().enumerate() {
            self.set_char(x.saturating_add(i as u16), y, c);
        }
    }

    pub fn put_centered(&mut self, y: u16, s: &str) {
        let x = (self.width / 2).saturating_sub(s.chars().count() as u16 / 2);
        self.put_str(x, y, s);
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    pub fn row(&self, y: u16) -> String {
        self.grid.get(y as usize).map(|r| r.iter().collect()).unwrap_or_default()
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.row(y))?;
        }
        stdout.flush()
    }
}

// --- Scene composition ---
const TITLE_ART: [&str; 5] = [
    r"    _   ___ _____ ___ ___  ___ ___ ___  ",
    r"   /_\ / __|_   _| __| _ \/ _ \_ _|   \ ",
    r"  / _ \\__ \ | | | _||   / (_) | || |) |",
    r" /_/ \_\___/ |_| |___|_|_\\___/___|___/ ",
    r"            S  M  A  S  H  E  R         ",
];

const HOW_TO_TEXT: [&str; 9] = [
    "HOW TO PLAY",
    "",
    "Left / Right arrows : turn",
    "Up arrow            : thrust",
    "Down arrow          : reverse",
    "Space               : fire",
    "",
    "Big rocks split into three smaller ones. Every rock is worth 1 point.",
    "You lose a life on every crash. After a crash the ship blinks and can't be hit.",
];

pub fn tier_glyph(tier: Tier) -> char {
    match tier {
        Tier::Large => '@',
        Tier::Medium => 'O',
        Tier::Small => 'o',
        Tier::Tiny => '.',
    }
}

/// Arrow pointing the way the ship faces. Heading 0 is up, 90 is left.
pub fn ship_glyph(heading: f64) -> char {
    match heading.rem_euclid(360.0) {
        h if !(45.0..315.0).contains(&h) => '^',
        h if h < 135.0 => '<',
        h if h < 225.0 => 'v',
        _ => '>',
    }
}

fn ship_visible(ship: &ShipView) -> bool {
    !ship.respawning || (ship.alpha / 8) % 2 == 0
}

pub fn compose(grid: &mut GameGrid, snapshot: &SessionSnapshot) {
    grid.clear();
    match snapshot.scene {
        Scene::Menu => compose_menu(grid),
        Scene::HowTo => compose_how_to(grid),
        Scene::Playing => compose_playfield(grid, snapshot),
        Scene::GameOver => compose_game_over(grid, snapshot),
    }
}

fn compose_menu(grid: &mut GameGrid) {
    let top = (grid.height / 2).saturating_sub(TITLE_ART.len() as u16 + 1);
    for (i, line) in TITLE_ART.iter().enumerate() {
        grid.put_centered(top + i as u16, line);
    }
    let options = top + TITLE_ART.len() as u16 + 2;
    grid.put_centered(options, "[N] New Game");
    grid.put_centered(options + 1, "[H] How To Play");
    grid.put_centered(options + 2, "[Q] Quit");
}

fn compose_how_to(grid: &mut GameGrid) {
    let top = (grid.height / 2).saturating_sub(HOW_TO_TEXT.len() as u16 / 2 + 1);
    for (i, line) in HOW_TO_TEXT.iter().enumerate() {
        grid.put_centered(top + i as u16, line);
    }
    grid.put_str(0, grid.height.saturating_sub(1), "[B] Back to Menu");
}

fn compose_playfield(grid: &mut GameGrid, snapshot: &SessionSnapshot) {
    let viewport = Viewport::new(grid.width, grid.height, snapshot.window);

    for asteroid in &snapshot.asteroids {
        let glyph = tier_glyph(asteroid.tier);
        for (x, y) in viewport.cells(&asteroid.bounds) {
            grid.set_char(x, y, glyph);
        }
    }
    for projectile in &snapshot.projectiles {
        if let Some((x, y)) = viewport.to_cell(projectile.position) {
            grid.set_char(x, y, '*');
        }
    }
    if let Some(ship) = snapshot.ship.as_ref().filter(|s| ship_visible(s)) {
        if let Some((x, y)) = viewport.to_cell(ship.position) {
            grid.set_char(x, y, ship_glyph(ship.heading));
        }
    }
    for icon in &snapshot.life_icons {
        if let Some((x, y)) = viewport.to_cell(*icon) {
            grid.set_char(x, y, 'A');
        }
    }

    grid.put_str(0, 0, &format!("Score: {}", snapshot.score));
    grid.put_str(0, 1, &format!("Asteroid Count: {}", snapshot.asteroids.len()));
}

fn compose_game_over(grid: &mut GameGrid, snapshot: &SessionSnapshot) {
    let middle = grid.height / 2;
    grid.put_centered(middle.saturating_sub(1), "GAME OVER");
    grid.put_centered(middle + 1, &format!("Final Score: {}", snapshot.score));
}
