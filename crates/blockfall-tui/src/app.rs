use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by [`Runtime::run`] must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called once the terminal is ready. Configure the tick rate and render
    /// mode here. [`Runtime::key_release_events`] is already known at this point.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key press, repeat and release, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);

    /// Advances application state by one tick.
    fn update(&mut self, runtime: &mut Runtime);
}
