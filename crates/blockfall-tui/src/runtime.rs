use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use ratatui::DefaultTerminal;

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Owns the terminal for the duration of [`Self::run`] and drives an [`App`].
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    key_release_events: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second). `None` disables ticks.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the tick interval. The first tick fires one interval from now.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval, Instant::now());
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Returns whether the terminal reports key release and repeat events.
    ///
    /// Without them every key event arrives as a press, so held keys show up
    /// as a stream of presses from the terminal's auto-repeat.
    #[must_use]
    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }

    /// Runs the application until [`App::should_exit`] returns true.
    ///
    /// 1. Enables key release reporting if the terminal supports it
    /// 2. Calls `app.init()`
    /// 3. Loops:
    ///    - tick: calls `app.update()`
    ///    - render: calls `app.draw()`
    ///    - terminal event: calls `app.handle_event()`
    /// 4. Restores the keyboard mode and the terminal
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release_events = push_key_release_flags()?;
            app.init(&mut self);

            let result = self.event_loop(terminal, app);

            if self.key_release_events {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn event_loop<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => app.update(self),
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}

fn push_key_release_flags() -> io::Result<bool> {
    // Terminals that do not answer the capability query are treated as unsupported.
    if !terminal::supports_keyboard_enhancement().unwrap_or(false) {
        return Ok(false);
    }
    execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    )?;
    Ok(true)
}
