use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::ViewMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, mode: ViewMode, message: Option<&str>) {
        let w = area.width as usize;
        let style = theme::current().status;

        let mode_str = match mode {
            ViewMode::Day => "[1]Day",
            ViewMode::Week => "[2]Week",
        };

        // Show status message if present, otherwise show width-aware hints
        let right = match message {
            Some(msg) => format!(" {msg} "),
            None => hints(w).to_string(),
        };

        let left = format!(" {mode_str} ");
        let padding = " ".repeat(w.saturating_sub(left.len() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}

fn hints(width: usize) -> &'static str {
    if width >= 80 {
        " ws:Scroll ad:Period t:Today r:Random ::Cmd ?:Help q:Quit "
    } else if width >= 50 {
        " ws:Scroll ad:Period ::Cmd q:Quit "
    } else {
        " ?:Help q:Quit "
    }
}
