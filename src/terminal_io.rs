use std::collections::HashMap;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::input::Control;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    NewGame,
    HowTo,
    BackToMenu,
    Quit,
}

pub fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Left => Some(Control::TurnLeft),
        KeyCode::Right => Some(Control::TurnRight),
        KeyCode::Up => Some(Control::ThrustForward),
        KeyCode::Down => Some(Control::ThrustReverse),
        KeyCode::Char(' ') => Some(Control::Fire),
        _ => None,
    }
}

pub fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => Some(Command::NewGame),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::HowTo),
        KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Esc => Some(Command::BackToMenu),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::from(code))
}

pub fn key_release(code: KeyCode) -> Event {
    let mut event = KeyEvent::from(code);
    event.kind = KeyEventKind::Release;
    Event::Key(event)
}

// --- HeldKeys: synthesises key-up for terminals that never send one ---
pub struct HeldKeys {
    last_seen: HashMap<Control, u64>,
    timeout: u64,
}

impl HeldKeys {
    pub fn new(timeout: u64) -> Self {
        HeldKeys { last_seen: HashMap::new(), timeout }
    }

    pub fn pressed(&mut self, control: Control, frame: u64) {
        self.last_seen.insert(control, frame);
    }

    pub fn expired(&mut self, frame: u64) -> Vec<Control> {
        let timeout = self.timeout;
        let expired: Vec<Control> = self
            .last_seen
            .iter()
            .filter(|&(_, &seen)| frame.saturating_sub(seen) >= timeout)
            .map(|(&control, _)| control)
            .collect();
        for control in &expired {
            self.last_seen.remove(control);
        }
        expired
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    /// Starts a game, flies around, fires once the ship is solid and quits.
    pub fn demo_script() -> Self {
        let mut events: HashMap<u64, Vec<Event>> = HashMap::new();
        events.insert(1, vec![key(KeyCode::Char('n'))]);
        events.insert(5, vec![key(KeyCode::Up)]);
        events.insert(40, vec![key_release(KeyCode::Up), key(KeyCode::Left)]);
        events.insert(70, vec![key_release(KeyCode::Left)]);
        for frame in (260..400).step_by(10) {
            events.insert(frame, vec![key(KeyCode::Char(' '))]);
        }
        events.insert(420, vec![key(KeyCode::Char('q'))]);
        SimulatedInput::new(events)
    }

    pub fn take(&mut self, frame: u64) -> Vec<Event> {
        self.events.remove(&frame).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_space_are_controls() {
        assert_eq!(control_for(KeyCode::Left), Some(Control::TurnLeft));
        assert_eq!(control_for(KeyCode::Down), Some(Control::ThrustReverse));
        assert_eq!(control_for(KeyCode::Char(' ')), Some(Control::Fire));
        assert_eq!(control_for(KeyCode::Char('n')), None);
        assert_eq!(command_for(KeyCode::Enter), Some(Command::NewGame));
        assert_eq!(command_for(KeyCode::Esc), Some(Command::BackToMenu));
    }

    #[test]
    fn held_keys_expire_without_repeats() {
        let mut held = HeldKeys::new(8);
        held.pressed(Control::TurnLeft, 10);
        held.pressed(Control::ThrustForward, 14);
        assert!(held.expired(17).is_empty());
        assert_eq!(held.expired(18), vec![Control::TurnLeft]);
        assert!(held.expired(19).is_empty());
        assert_eq!(held.expired(22), vec![Control::ThrustForward]);
    }

    #[test]
    fn simulated_events_are_delivered_once() {
        let mut input = SimulatedInput::demo_script();
        assert_eq!(input.take(1), vec![key(KeyCode::Char('n'))]);
        assert!(input.take(1).is_empty());
        assert!(input.take(2).is_empty());
    }
}
