#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    TurnLeft,
    TurnRight,
    ThrustForward,
    ThrustReverse,
    Fire,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Thrust {
    #[default]
    None,
    Forward,
    Reverse,
}

/// Level-triggered ship controls, held between ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub turn: Turn,
    pub thrust: Thrust,
}

impl InputState {
    pub fn press(&mut self, control: Control) {
        match control {
            Control::TurnLeft => self.turn = Turn::Left,
            Control::TurnRight => self.turn = Turn::Right,
            Control::ThrustForward => self.thrust = Thrust::Forward,
            Control::ThrustReverse => self.thrust = Thrust::Reverse,
            Control::Fire => {}
        }
    }

    pub fn release(&mut self, control: Control) {
        match control {
            Control::TurnLeft | Control::TurnRight => self.turn = Turn::None,
            Control::ThrustForward | Control::ThrustReverse => self.thrust = Thrust::None,
            Control::Fire => {}
        }
    }

    pub fn clear(&mut self) {
        *self = InputState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_press_wins_and_release_clears_axis() {
        let mut input = InputState::default();
        input.press(Control::TurnLeft);
        input.press(Control::TurnRight);
        assert_eq!(input.turn, Turn::Right);

        input.release(Control::TurnLeft);
        assert_eq!(input.turn, Turn::None);

        input.press(Control::ThrustReverse);
        input.press(Control::Fire);
        assert_eq!(input.thrust, Thrust::Reverse);
        input.release(Control::ThrustForward);
        assert_eq!(input, InputState::default());
    }
}
