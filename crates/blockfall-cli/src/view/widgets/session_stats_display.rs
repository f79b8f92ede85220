use std::{iter, time::Duration};

use blockfall_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{cells_to_u16, style};

const INNER_WIDTH: u16 = 18;

/// Score, play time, and line clear histogram of a session.
pub struct SessionStatsDisplay<'a> {
    stats: &'a GameStats,
    elapsed: Duration,
    block: Option<BlockWidget<'a>>,
}

/// One terminal row of the stats panel.
enum StatLine {
    Blank,
    Heading(&'static str),
    Total(String),
    Field(&'static str, String),
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(stats: &'a GameStats, elapsed: Duration) -> Self {
        Self {
            stats,
            elapsed,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        INNER_WIDTH.saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        cells_to_u16(self.lines().len())
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    fn lines(&self) -> Vec<StatLine> {
        let stats = self.stats;
        let clears = stats.line_cleared_counter();
        let secs = self.elapsed.as_secs();
        let elapsed = format!(
            "{}:{:02}.{:02}",
            secs / 60,
            secs % 60,
            self.elapsed.subsec_millis() / 10
        );
        vec![
            StatLine::Heading("SCORE:"),
            StatLine::Total(stats.score().to_string()),
            StatLine::Heading("TIME:"),
            StatLine::Total(elapsed),
            StatLine::Blank,
            StatLine::Field("LINES:", stats.total_cleared_lines().to_string()),
            StatLine::Field("PIECES:", stats.completed_pieces().to_string()),
            StatLine::Field("DROP:", stats.soft_drop_points().to_string()),
            StatLine::Blank,
            StatLine::Field("SINGLES:", clears[1].to_string()),
            StatLine::Field("DOUBLES:", clears[2].to_string()),
            StatLine::Field("TRIPLES:", clears[3].to_string()),
            StatLine::Field("QUADS:", clears[4].to_string()),
        ]
    }
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let lines = self.lines();
        let line_areas = Layout::vertical(lines.iter().map(|_| Constraint::Length(1))).split(area);

        for (line, area) in iter::zip(lines, line_areas.iter().copied()) {
            match line {
                StatLine::Blank => {}
                StatLine::Heading(label) => {
                    Line::styled(label, style::DEFAULT).render(area, buf);
                }
                StatLine::Total(value) => {
                    Line::styled(value, style::DEFAULT)
                        .right_aligned()
                        .render(area, buf);
                }
                StatLine::Field(label, value) => {
                    Line::styled(label, style::DEFAULT).render(area, buf);
                    Line::styled(value, style::DEFAULT)
                        .right_aligned()
                        .render(area, buf);
                }
            }
        }
    }
}
