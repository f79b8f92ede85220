use blockfall_engine::{CellState, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// One board cell, drawn two columns wide so cells look square.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub const fn piece(kind: PieceKind) -> Self {
        Self::new(style::piece(kind), "")
    }

    /// Falling cells take the color of `falling_kind`.
    pub const fn from_cell(cell: CellState, falling_kind: Option<PieceKind>) -> Self {
        match (cell, falling_kind) {
            (CellState::Empty, _) => Self::empty(true),
            (CellState::Falling, Some(kind)) => Self::piece(kind),
            (CellState::Falling, None) => Self::new(style::DEFAULT, "[]"),
            (CellState::Locked, _) => Self::new(style::LOCKED, ""),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // A Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
