use blockfall_engine::GameSession;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style};

/// The whole play screen: stats, board and next-piece preview side by side.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    soft_drop: bool,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            soft_drop: false,
        }
    }

    /// Highlights the frame while soft drop is held.
    pub fn soft_drop(self, soft_drop: bool) -> Self {
        Self { soft_drop, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_padding = Padding::horizontal(1);
        let game_over = self.session.state().is_game_over();
        let border_style = if game_over {
            color::RED
        } else if self.soft_drop {
            color::CYAN
        } else {
            color::WHITE
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let mut game_board = BoardDisplay::new(self.session.board()).block(
            Block::bordered()
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        if let Some(piece) = self.session.falling_piece() {
            game_board = game_board.falling_kind(piece.kind());
        }
        let mut next_panel = PieceDisplay::new().block(panel("NEXT"));
        if let Some(kind) = self.session.next_piece() {
            next_panel = next_panel.piece(kind);
        }
        let session_stats =
            SessionStatsDisplay::new(self.session.stats(), self.session.duration())
                .block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if game_over {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(style);
            let text = Text::styled("GAME OVER", style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Board, PieceSeed, PieceSequencer, SessionConfig};

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(session: &GameSession) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        SessionDisplay::new(session).render(area, &mut buf);
        buf
    }

    #[test]
    fn test_render_running_session() {
        let session = GameSession::new(SessionConfig::default()).unwrap();
        let text = buffer_text(&render(&session));

        assert!(text.contains("NEXT"));
        assert!(text.contains("STATS"));
        assert!(text.contains("SCORE:"));
        assert!(!text.contains("GAME OVER"));
    }

    #[test]
    fn test_render_largest_board_in_small_area() {
        let config = SessionConfig {
            width: blockfall_engine::MAX_WIDTH,
            height: blockfall_engine::MAX_HEIGHT,
            ..SessionConfig::default()
        };
        let session = GameSession::new(config).unwrap();
        let buf = render(&session);
        assert_eq!(buf.area, Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn test_render_game_over() {
        let board = Board::from_ascii(&["...####...", "...####...", ".........."]).unwrap();
        let sequencer = PieceSequencer::with_seed(PieceSeed::from_bytes([5; 16]));
        let session = GameSession::with_board(board, sequencer);
        assert!(session.state().is_game_over());

        let text = buffer_text(&render(&session));
        assert!(text.contains("GAME OVER"));
    }
}
