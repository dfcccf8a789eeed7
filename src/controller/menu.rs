use crate::controller::audio::{Cue, CueSink};
use crate::model::settings::SettingsStore;
use crate::model::state::AppState;

/// Which overlay panel is active. `Pause` is the root; the other two are
/// reached only from it and return only to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuMode {
    Pause,
    Settings,
    Debug,
}

impl MenuMode {
    pub fn item_count(self) -> usize {
        match self {
            MenuMode::Pause => 4,
            MenuMode::Settings => 4,
            MenuMode::Debug => 3,
        }
    }
}

/// Discrete keys the menu understands. The scheduler maps physical key
/// codes to this vocabulary before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Escape,
    Confirm,
    Up,
    Down,
    Left,
    Right,
}

/// Requests the menu cannot carry out itself; the scheduler acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSignal {
    Exit,
    SpawnEnemy,
    KillAll,
}

/// Modal menu state machine over the settings store.
///
/// `selection` is always in `[0, mode.item_count())`; every mode transition
/// resets it to 0. The machine only reacts while `state.paused` is set,
/// except for the Escape that sets it.
pub struct Menu {
    pub mode: MenuMode,
    pub selection: usize,
    pub store: SettingsStore,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            mode: MenuMode::Pause,
            selection: 0,
            store: SettingsStore::default(),
        }
    }

    fn enter(&mut self, mode: MenuMode) {
        self.mode = mode;
        self.selection = 0;
    }

    /// Feed one key-down event through the state machine.
    pub fn handle_key(
        &mut self,
        key: MenuKey,
        state: &mut AppState,
        cues: &mut dyn CueSink,
    ) -> Option<MenuSignal> {
        if !state.paused {
            if key == MenuKey::Escape {
                state.paused = true;
                cues.play(Cue::Move);
            }
            return None;
        }

        match key {
            MenuKey::Escape => {
                match self.mode {
                    MenuMode::Settings | MenuMode::Debug => self.enter(MenuMode::Pause),
                    MenuMode::Pause => state.paused = false,
                }
                cues.play(Cue::Move);
                None
            }
            MenuKey::Confirm => {
                let signal = match self.mode {
                    MenuMode::Pause => self.confirm_pause(state),
                    // Settings rows are edited with left/right, not confirm.
                    MenuMode::Settings => None,
                    MenuMode::Debug => self.confirm_debug(state),
                };
                cues.play(Cue::Move);
                signal
            }
            MenuKey::Up => {
                self.selection = if self.selection == 0 {
                    self.mode.item_count() - 1
                } else {
                    self.selection - 1
                };
                cues.play(Cue::Move);
                None
            }
            MenuKey::Down => {
                self.selection = (self.selection + 1) % self.mode.item_count();
                cues.play(Cue::Move);
                None
            }
            MenuKey::Left => {
                if self.mode == MenuMode::Settings {
                    self.adjust(false, state, cues);
                }
                None
            }
            MenuKey::Right => {
                if self.mode == MenuMode::Settings {
                    self.adjust(true, state, cues);
                }
                None
            }
        }
    }

    fn confirm_pause(&mut self, state: &mut AppState) -> Option<MenuSignal> {
        match self.selection {
            0 => {
                state.paused = false;
                None
            }
            1 => {
                self.enter(MenuMode::Settings);
                None
            }
            2 => {
                self.enter(MenuMode::Debug);
                None
            }
            _ => Some(MenuSignal::Exit),
        }
    }

    fn confirm_debug(&mut self, state: &mut AppState) -> Option<MenuSignal> {
        match self.selection {
            0 => {
                state.camera.reset();
                None
            }
            1 => Some(MenuSignal::SpawnEnemy),
            _ => Some(MenuSignal::KillAll),
        }
    }

    fn adjust(&mut self, raise: bool, state: &mut AppState, cues: &mut dyn CueSink) {
        // The cue plays even for an edit saturated at its bound.
        cues.play(Cue::Change);
        self.store.adjust(self.selection, raise);
        state.live = self.store.publish();
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::Quality;
    use glam::{Vec2, Vec3};

    struct Recorder {
        cues: Vec<Cue>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { cues: Vec::new() }
        }
    }

    impl CueSink for Recorder {
        fn play(&mut self, cue: Cue) {
            self.cues.push(cue);
        }
    }

    fn paused() -> (Menu, AppState, Recorder) {
        let mut menu = Menu::new();
        let mut state = AppState::new();
        let mut rec = Recorder::new();
        menu.handle_key(MenuKey::Escape, &mut state, &mut rec);
        assert!(state.paused);
        (menu, state, rec)
    }

    #[test]
    fn escape_while_unpaused_pauses() {
        let mut menu = Menu::new();
        let mut state = AppState::new();
        let mut rec = Recorder::new();
        let signal = menu.handle_key(MenuKey::Escape, &mut state, &mut rec);
        assert!(state.paused);
        assert_eq!(signal, None);
        assert_eq!(menu.mode, MenuMode::Pause);
        assert_eq!(menu.selection, 0);
        assert_eq!(rec.cues, vec![Cue::Move]);
    }

    #[test]
    fn non_escape_keys_are_ignored_while_unpaused() {
        let mut menu = Menu::new();
        let mut state = AppState::new();
        let mut rec = Recorder::new();
        for key in [MenuKey::Confirm, MenuKey::Up, MenuKey::Down, MenuKey::Left, MenuKey::Right] {
            assert_eq!(menu.handle_key(key, &mut state, &mut rec), None);
        }
        assert!(!state.paused);
        assert_eq!(menu.selection, 0);
        assert!(rec.cues.is_empty());
    }

    #[test]
    fn down_then_up_restores_selection_in_every_mode() {
        for mode in [MenuMode::Pause, MenuMode::Settings, MenuMode::Debug] {
            let (mut menu, mut state, mut rec) = paused();
            menu.mode = mode;
            for start in 0..mode.item_count() {
                menu.selection = start;
                menu.handle_key(MenuKey::Down, &mut state, &mut rec);
                menu.handle_key(MenuKey::Up, &mut state, &mut rec);
                assert_eq!(menu.selection, start, "mode {mode:?}, start {start}");

                menu.handle_key(MenuKey::Up, &mut state, &mut rec);
                menu.handle_key(MenuKey::Down, &mut state, &mut rec);
                assert_eq!(menu.selection, start, "mode {mode:?}, start {start}");
            }
        }
    }

    #[test]
    fn selection_wraps_at_both_ends() {
        let (mut menu, mut state, mut rec) = paused();
        assert_eq!(menu.selection, 0);
        menu.handle_key(MenuKey::Up, &mut state, &mut rec);
        assert_eq!(menu.selection, 3, "decrement below zero wraps to the last row");
        menu.handle_key(MenuKey::Down, &mut state, &mut rec);
        assert_eq!(menu.selection, 0, "increment at the last row wraps to zero");
    }

    #[test]
    fn confirm_enters_settings_with_selection_reset() {
        let (mut menu, mut state, mut rec) = paused();
        menu.handle_key(MenuKey::Down, &mut state, &mut rec);
        assert_eq!(menu.selection, 1);
        menu.handle_key(MenuKey::Confirm, &mut state, &mut rec);
        assert_eq!(menu.mode, MenuMode::Settings);
        assert_eq!(menu.selection, 0);
    }

    #[test]
    fn escape_from_settings_returns_to_pause_with_selection_reset() {
        let (mut menu, mut state, mut rec) = paused();
        menu.mode = MenuMode::Settings;
        menu.selection = 3;
        menu.handle_key(MenuKey::Escape, &mut state, &mut rec);
        assert_eq!(menu.mode, MenuMode::Pause);
        assert_eq!(menu.selection, 0);
        assert!(state.paused, "leaving a submenu keeps the app paused");
    }

    #[test]
    fn escape_from_pause_resumes() {
        let (mut menu, mut state, mut rec) = paused();
        menu.handle_key(MenuKey::Escape, &mut state, &mut rec);
        assert!(!state.paused);
        assert_eq!(menu.mode, MenuMode::Pause);
    }

    #[test]
    fn resume_row_unpauses() {
        let (mut menu, mut state, mut rec) = paused();
        let signal = menu.handle_key(MenuKey::Confirm, &mut state, &mut rec);
        assert_eq!(signal, None);
        assert!(!state.paused);
    }

    #[test]
    fn exit_row_signals_exit() {
        let (mut menu, mut state, mut rec) = paused();
        menu.selection = 3;
        let signal = menu.handle_key(MenuKey::Confirm, &mut state, &mut rec);
        assert_eq!(signal, Some(MenuSignal::Exit));
    }

    #[test]
    fn debug_rows_emit_signals() {
        let (mut menu, mut state, mut rec) = paused();
        menu.mode = MenuMode::Debug;
        menu.selection = 1;
        assert_eq!(
            menu.handle_key(MenuKey::Confirm, &mut state, &mut rec),
            Some(MenuSignal::SpawnEnemy)
        );
        menu.selection = 2;
        assert_eq!(
            menu.handle_key(MenuKey::Confirm, &mut state, &mut rec),
            Some(MenuSignal::KillAll)
        );
    }

    #[test]
    fn left_right_only_edit_in_settings_mode() {
        let (mut menu, mut state, mut rec) = paused();
        let before = menu.store;
        rec.cues.clear();
        menu.handle_key(MenuKey::Left, &mut state, &mut rec);
        menu.handle_key(MenuKey::Right, &mut state, &mut rec);
        assert_eq!(menu.store, before, "pause mode ignores left/right");
        assert!(rec.cues.is_empty(), "no cue for ignored left/right");
    }

    #[test]
    fn settings_edit_plays_change_cue_and_publishes() {
        let (mut menu, mut state, mut rec) = paused();
        menu.mode = MenuMode::Settings;
        menu.selection = 2; // sensitivity row
        rec.cues.clear();
        menu.handle_key(MenuKey::Right, &mut state, &mut rec);
        assert_eq!(rec.cues, vec![Cue::Change]);
        assert_eq!(menu.store.sensitivity, 11);
        assert_eq!(state.live.sensitivity, 1.1);
    }

    #[test]
    fn quality_double_toggle_is_a_noop() {
        let (mut menu, mut state, mut rec) = paused();
        menu.mode = MenuMode::Settings;
        menu.selection = 0;
        menu.handle_key(MenuKey::Right, &mut state, &mut rec);
        assert_eq!(state.live.quality, Quality::Low);
        menu.handle_key(MenuKey::Left, &mut state, &mut rec);
        assert_eq!(state.live.quality, Quality::High);
    }

    #[test]
    fn fps_cap_clamps_through_the_menu() {
        let (mut menu, mut state, mut rec) = paused();
        menu.mode = MenuMode::Settings;
        menu.selection = 1;
        menu.store.fps_cap = 350.0;
        menu.handle_key(MenuKey::Right, &mut state, &mut rec);
        assert_eq!(state.live.fps_cap, 360.0);
        menu.handle_key(MenuKey::Right, &mut state, &mut rec);
        assert_eq!(state.live.fps_cap, 360.0);
    }

    #[test]
    fn navigation_plays_move_cue() {
        let (mut menu, mut state, mut rec) = paused();
        rec.cues.clear();
        menu.handle_key(MenuKey::Down, &mut state, &mut rec);
        menu.handle_key(MenuKey::Confirm, &mut state, &mut rec);
        assert_eq!(rec.cues, vec![Cue::Move, Cue::Move]);
    }

    #[test]
    fn pause_debug_reset_scenario() {
        // Full path: pause, walk to the debug entry, reset the camera.
        let mut menu = Menu::new();
        let mut state = AppState::new();
        let mut rec = Recorder::new();
        state.camera.position = Vec3::new(3.0, 1.0, -7.0);
        state.camera.rotation = Vec2::new(0.5, -0.25);

        menu.handle_key(MenuKey::Escape, &mut state, &mut rec);
        assert!(state.paused);
        assert_eq!((menu.mode, menu.selection), (MenuMode::Pause, 0));

        menu.handle_key(MenuKey::Down, &mut state, &mut rec);
        menu.handle_key(MenuKey::Down, &mut state, &mut rec);
        assert_eq!(menu.selection, 2);

        menu.handle_key(MenuKey::Confirm, &mut state, &mut rec);
        assert_eq!((menu.mode, menu.selection), (MenuMode::Debug, 0));

        let signal = menu.handle_key(MenuKey::Confirm, &mut state, &mut rec);
        assert_eq!(signal, None);
        assert_eq!(state.camera.position, Vec3::ZERO);
        assert_eq!(state.camera.rotation, Vec2::ZERO);
    }
}
