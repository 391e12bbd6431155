use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

/// One-line command editor at the bottom of the screen.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    pub active: bool,
    input: String,
}

impl CommandLine {
    pub fn open(&mut self) {
        self.active = true;
        self.input.clear();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.input.clear();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Close the editor and hand back what was typed.
    pub fn commit(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.input)
    }
}

pub struct CommandView;

impl CommandView {
    pub fn render(frame: &mut Frame, area: Rect, state: &CommandLine) {
        let theme = theme::current();
        let line = if state.active {
            Line::from(vec![
                Span::styled(": ", theme.command.add_modifier(Modifier::BOLD)),
                Span::styled(state.input().to_string(), theme.command),
                Span::styled("_", theme.command),
            ])
        } else {
            Line::from(vec![
                Span::styled(":", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("command", theme.dim),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_returns_input_and_closes() {
        let mut line = CommandLine::default();
        line.open();
        for c in "delete 4x".chars() {
            line.input_char(c);
        }
        line.backspace();
        assert_eq!(line.input(), "delete 4");
        assert_eq!(line.commit(), "delete 4");
        assert!(!line.active);
        assert_eq!(line.input(), "");
    }

    #[test]
    fn cancel_discards_input() {
        let mut line = CommandLine::default();
        line.open();
        line.input_char('q');
        line.cancel();
        assert!(!line.active);
        assert_eq!(line.input(), "");
    }
}
