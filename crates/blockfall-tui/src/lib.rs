//! Fixed-rate terminal event loop for games built on `ratatui` and `crossterm`.
//!
//! Implement [`App`] and hand it to [`Runtime::run`]. The runtime owns the
//! terminal, delivers ticks at a fixed rate, forwards terminal events and
//! redraws after anything changes.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
