use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(crate) enum TuiEvent {
    /// Fixed-rate logic step.
    Tick,
    /// Redraw request.
    Render,
    /// Terminal input or resize.
    Crossterm(CrosstermEvent),
}
