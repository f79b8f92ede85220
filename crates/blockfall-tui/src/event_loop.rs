use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Redraw after every tick or terminal event.
    #[default]
    OnDirty,
    /// Redraw after changes, at most once per interval.
    ///
    /// Changes arriving faster than the interval are batched into one redraw.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from a frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Schedules ticks and redraws between terminal events.
///
/// Ticks keep a fixed cadence: each tick is scheduled one interval after the
/// previous one rather than after the moment it was handled. When the loop
/// falls more than one interval behind, the schedule restarts from now
/// instead of delivering a burst of late ticks.
#[derive(Debug)]
pub(crate) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    next_tick: Instant,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    /// Creates a loop with ticks disabled and a redraw pending.
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            next_tick: now,
            last_render: None,
            dirty: true,
        }
    }

    pub(crate) fn set_tick_interval(&mut self, interval: Option<Duration>, now: Instant) {
        self.tick_interval = interval;
        if let Some(interval) = interval {
            self.next_tick = now + interval;
        }
    }

    pub(crate) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until a tick or redraw is due, or a terminal event arrives.
    pub(crate) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Returns the tick or redraw due at `now`, ticks first.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(interval) = self.tick_interval
            && now >= self.next_tick
        {
            self.next_tick += interval;
            if self.next_tick <= now {
                self.next_tick = now + interval;
            }
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        if self.dirty && self.render_allowed(now) {
            self.last_render = Some(now);
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn render_allowed(&self, now: Instant) -> bool {
        match (self.render_mode, self.last_render) {
            (RenderMode::OnDirty, _) | (RenderMode::Throttled(_), None) => true,
            (RenderMode::Throttled(interval), Some(last)) => now.duration_since(last) >= interval,
        }
    }

    /// Returns how long to wait for terminal events, or `None` to wait indefinitely.
    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|_| self.next_tick);
        let next_render_at = match (self.render_mode, self.last_render) {
            _ if !self.dirty => None,
            (RenderMode::Throttled(interval), Some(last)) => Some(last + interval),
            _ => Some(now),
        };
        let wake_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(wake_at.saturating_duration_since(now))
    }
}
