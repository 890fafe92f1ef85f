/// Top-level screens of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scene {
    #[default]
    Menu,
    Playing,
    HowTo,
    GameOver,
}

/// Who asked for a scene change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Request,
    Internal,
}

impl Scene {
    /// The transition table. Returns whether `self -> to` is allowed for the
    /// given trigger.
    pub fn can_transition(self, to: Scene, trigger: Trigger) -> bool {
        use Scene::*;
        match (self, to) {
            (Menu, Playing) | (Menu, HowTo) | (HowTo, Menu) => trigger == Trigger::Request,
            (Playing, GameOver) => trigger == Trigger::Internal,
            (GameOver, Menu) => true,
            _ => false,
        }
    }

    /// Whether entering `self` starts from a freshly reset board.
    pub fn resets_session_on_entry(self) -> bool {
        // Menu and HowTo get a fresh board as well as Playing.
        !matches!(self, Scene::GameOver)
    }

    pub fn simulates(self) -> bool {
        self == Scene::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Scene; 4] = [Scene::Menu, Scene::Playing, Scene::HowTo, Scene::GameOver];

    #[test]
    fn requestable_transitions() {
        let allowed: Vec<(Scene, Scene)> = ALL
            .iter()
            .flat_map(|&from| ALL.iter().map(move |&to| (from, to)))
            .filter(|&(from, to)| from.can_transition(to, Trigger::Request))
            .collect();
        assert_eq!(
            allowed,
            vec![
                (Scene::Menu, Scene::Playing),
                (Scene::Menu, Scene::HowTo),
                (Scene::HowTo, Scene::Menu),
                (Scene::GameOver, Scene::Menu),
            ]
        );
    }

    #[test]
    fn game_over_is_only_reached_internally() {
        assert!(!Scene::Playing.can_transition(Scene::GameOver, Trigger::Request));
        assert!(Scene::Playing.can_transition(Scene::GameOver, Trigger::Internal));
        assert!(!Scene::Menu.can_transition(Scene::GameOver, Trigger::Internal));
        assert!(!Scene::Playing.can_transition(Scene::Playing, Trigger::Internal));
    }
}
