use blockfall_engine::{GameSession, TICK_RATE};
use blockfall_tui::{App, RenderMode, Runtime};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use super::input::{InputState, KeyAction};
use crate::view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay};

const FRAME_RATE: f64 = 60.0;

const RUNNING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑"], "Rotate"),
    (&["↓"], "Soft drop"),
    (&["q", "Esc"], "Quit"),
];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["q", "Esc"], "Quit")];

#[derive(Debug)]
pub(crate) struct PlayApp {
    session: GameSession,
    input: InputState,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            session,
            input: InputState::new(false),
            is_exiting: false,
        }
    }

    pub(crate) fn into_session(self) -> GameSession {
        self.session
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        let key_release_events = runtime.key_release_events();
        tracing::debug!(key_release_events, "terminal input mode");
        self.input = InputState::new(key_release_events);
        runtime.set_tick_rate(Some(f64::from(TICK_RATE)));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FRAME_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        match self.input.handle_key(key) {
            Some(KeyAction::Command(command)) => self.session.apply(command),
            Some(KeyAction::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let keys = if self.session.state().is_game_over() {
            GAME_OVER_KEYS
        } else {
            RUNNING_KEYS
        };
        let session_display =
            SessionDisplay::new(&self.session).soft_drop(self.input.is_soft_dropping());

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(keys), help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        if let Some(command) = self.input.tick() {
            self.session.apply(command);
        }
        self.session.tick();
    }
}
