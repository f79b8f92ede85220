use blockfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{CellDisplay, cells_to_u16};

/// Preview of a piece kind in its spawn orientation.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Sized for the widest spawn shape (4 × 2 cells).
    pub fn width(&self) -> u16 {
        4 * CellDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty = CellDisplay::empty(false);
        empty.render(area, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let (w, h) = piece.size();
        let (w, h) = (cells_to_u16(w), cells_to_u16(h));
        let piece_area = area.centered(
            Constraint::Length(w * CellDisplay::WIDTH),
            Constraint::Length(h * CellDisplay::HEIGHT),
        );

        let horizontal =
            Layout::horizontal((0..w).map(|_| Constraint::Length(CellDisplay::WIDTH)))
                .flex(Flex::Center);
        let vertical = Layout::vertical((0..h).map(|_| Constraint::Length(CellDisplay::HEIGHT)));
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied = CellDisplay::piece(piece);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if piece.is_occupied((x, y)) {
                    Widget::render(&occupied, grid_cell, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::widgets::style;

    #[test]
    fn test_render_next_piece() {
        let widget = PieceDisplay::new().piece(PieceKind::T);
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        // T is 3 × 2 cells, centered in a 4 × 2 area: one column of margin each side.
        let t_color = style::piece(PieceKind::T).bg;
        let empty = style::EMPTY.bg;
        let bg = |x: u16, y: u16| Some(buf[(x, y)].bg);
        assert_eq!(bg(0, 0), empty);
        assert_eq!(bg(1, 0), empty);
        assert_eq!(bg(3, 0), t_color);
        assert_eq!(bg(4, 0), t_color);
        assert_eq!(bg(1, 1), t_color);
        assert_eq!(bg(6, 1), t_color);
        assert_eq!(bg(7, 1), empty);
    }

    #[test]
    fn test_render_without_piece() {
        let widget = PieceDisplay::new();
        let area = Rect::new(0, 0, widget.width(), widget.height());
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert!(buf.content().iter().all(|cell| Some(cell.bg) == style::EMPTY.bg));
    }
}
