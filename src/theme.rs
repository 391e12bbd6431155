use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme chosen at startup. Later calls are ignored.
pub fn init(theme: Theme) {
    let _ = THEME.set(theme);
}

/// Get the active theme, falling back to the default when none was installed.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    /// Label of the pane holding "now".
    pub today: Style,
    /// Pane labels.
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    /// Event lines inside a pane.
    pub event: Style,
    pub command: Style,
}

/// Colors a preset is built from.
struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
    rule: Color,
    bar: Color,
    event: Color,
    prompt: Color,
}

impl Palette {
    fn into_theme(self, name: &str) -> Theme {
        Theme {
            name: name.to_string(),
            today: Style::default().fg(Color::Black).bg(self.accent),
            header: Style::default().fg(self.text).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(self.muted),
            border: Style::default().fg(self.rule),
            status: Style::default().fg(self.text).bg(self.bar),
            event: Style::default().fg(self.event),
            command: Style::default().fg(self.prompt),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Palette {
            accent: Color::Yellow,
            text: Color::White,
            muted: Color::DarkGray,
            rule: Color::Gray,
            bar: Color::DarkGray,
            event: Color::Cyan,
            prompt: Color::Green,
        }
        .into_theme("default")
    }
}

impl Theme {
    /// Built-in preset by name; unknown names give the default theme.
    pub fn preset(name: &str) -> Self {
        let palette = match name {
            "dracula" => Palette {
                accent: Color::Rgb(189, 147, 249),
                text: Color::Rgb(248, 248, 242),
                muted: Color::Rgb(98, 114, 164),
                rule: Color::Rgb(68, 71, 90),
                bar: Color::Rgb(68, 71, 90),
                event: Color::Rgb(139, 233, 253),
                prompt: Color::Rgb(80, 250, 123),
            },
            "gruvbox" => Palette {
                accent: Color::Rgb(250, 189, 47),
                text: Color::Rgb(235, 219, 178),
                muted: Color::Rgb(146, 131, 116),
                rule: Color::Rgb(102, 92, 84),
                bar: Color::Rgb(80, 73, 69),
                event: Color::Rgb(131, 165, 152),
                prompt: Color::Rgb(184, 187, 38),
            },
            "nord" => Palette {
                accent: Color::Rgb(235, 203, 139),
                text: Color::Rgb(229, 233, 240),
                muted: Color::Rgb(76, 86, 106),
                rule: Color::Rgb(67, 76, 94),
                bar: Color::Rgb(67, 76, 94),
                event: Color::Rgb(136, 192, 208),
                prompt: Color::Rgb(163, 190, 140),
            },
            _ => return Self::default(),
        };
        palette.into_theme(name)
    }
}

/// `[theme]` section of the config file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub event_fg: Option<String>,
}

impl ThemeConfig {
    pub fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        recolor(&mut theme.today, self.today_fg.as_deref(), self.today_bg.as_deref());
        recolor(&mut theme.header, self.header_fg.as_deref(), None);
        recolor(&mut theme.dim, self.dim_fg.as_deref(), None);
        recolor(&mut theme.border, self.border_fg.as_deref(), None);
        recolor(&mut theme.status, self.status_fg.as_deref(), self.status_bg.as_deref());
        recolor(&mut theme.event, self.event_fg.as_deref(), None);
        theme
    }
}

/// Apply whichever of `fg`/`bg` parse; unparseable colors are ignored.
fn recolor(style: &mut Style, fg: Option<&str>, bg: Option<&str>) {
    if let Some(c) = fg.and_then(parse_color) {
        *style = style.fg(c);
    }
    if let Some(c) = bg.and_then(parse_color) {
        *style = style.bg(c);
    }
}

/// Hex `#rrggbb` or one of ratatui's named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel =
            |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        return Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}
