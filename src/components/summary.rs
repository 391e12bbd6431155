use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::theme;

/// Snapshot of the state shown in the summary pane.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub period: String,
    pub visible: usize,
    pub cached: usize,
    pub source: &'static str,
    /// False once the cache has been invalidated and not yet reloaded.
    pub fresh: bool,
    pub filters: Vec<(String, String)>,
    pub offset: u16,
    pub max_offset: u16,
}

impl Summary {
    pub fn lines(&self) -> Vec<Line<'static>> {
        let theme = theme::current();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Events: ", theme.dim),
                Span::raw(format!("{} shown / {} cached", self.visible, self.cached)),
                Span::styled(
                    if self.fresh {
                        format!("  ({})", self.source)
                    } else {
                        format!("  ({}, stale)", self.source)
                    },
                    theme.dim,
                ),
            ]),
            Line::from(vec![
                Span::styled("Scroll: ", theme.dim),
                Span::raw(format!("{}/{}", self.offset, self.max_offset)),
            ]),
        ];

        if self.filters.is_empty() {
            lines.push(Line::from(Span::styled("No filters", theme.dim)));
        } else {
            lines.push(Line::from(Span::styled("Filters:", theme.dim)));
            for (key, desc) in &self.filters {
                lines.push(Line::from(format!("  {key}: {desc}")));
            }
        }
        lines
    }
}

pub struct SummaryView;

impl SummaryView {
    pub fn render(frame: &mut Frame, area: Rect, summary: &Summary) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= summary.period.len() + 4 {
            format!(" {} ", summary.period)
        } else {
            " Summary ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let para = Paragraph::new(summary.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(para, area);
    }
}
