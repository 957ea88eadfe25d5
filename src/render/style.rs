// Style tokens for labels and values

use crate::error::{GlanceError, Result};
use nu_ansi_term::{Color, Style};

/// Label and value styles applied to every report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConfig {
    pub label: Style,
    pub value: Style,
    /// When false nothing is painted and the color swatch is empty
    pub enabled: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            label: Color::Blue.normal(),
            value: Color::Green.normal(),
            enabled: true,
        }
    }
}

impl StyleConfig {
    /// Build from two token lists, e.g. `["bold", "blue"]` and `["green"]`
    pub fn from_tokens<L, V>(label: &[L], value: &[V], enabled: bool) -> Result<Self>
    where
        L: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(Self {
            label: parse_style(label)?,
            value: parse_style(value)?,
            enabled,
        })
    }

    /// No escape codes at all
    pub fn plain() -> Self {
        Self {
            label: Style::default(),
            value: Style::default(),
            enabled: false,
        }
    }

    pub fn paint_label(&self, text: &str) -> String {
        paint(self.enabled, self.label, text)
    }

    pub fn paint_value(&self, text: &str) -> String {
        paint(self.enabled, self.value, text)
    }
}

fn paint(enabled: bool, style: Style, text: &str) -> String {
    if enabled {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Fold tokens left to right into one style.
///
/// `normal` resets everything accumulated so far.
pub fn parse_style<S: AsRef<str>>(tokens: &[S]) -> Result<Style> {
    tokens.iter().try_fold(Style::default(), |style, token| {
        apply_token(style, token.as_ref())
    })
}

fn apply_token(style: Style, token: &str) -> Result<Style> {
    let name = token.trim().to_lowercase();

    let style = match name.as_str() {
        "normal" => Style::default(),
        "bold" => style.bold(),
        "dim" => style.dimmed(),
        "italic" => style.italic(),
        "underline" => style.underline(),
        "blink" => style.blink(),
        "reverse" => style.reverse(),
        "hidden" => style.hidden(),
        "strikethrough" => style.strikethrough(),
        other => {
            let invalid = || GlanceError::InvalidStyle(token.to_string());
            match other.strip_prefix("on_") {
                Some(bg) => style.on(color(bg).ok_or_else(invalid)?),
                None => style.fg(color(other).ok_or_else(invalid)?),
            }
        }
    };

    Ok(style)
}

fn color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "default" => Color::Default,
        "light_black" => Color::DarkGray,
        "light_red" => Color::LightRed,
        "light_green" => Color::LightGreen,
        "light_yellow" => Color::LightYellow,
        "light_blue" => Color::LightBlue,
        "light_magenta" => Color::LightMagenta,
        "light_cyan" => Color::LightCyan,
        "light_white" => Color::LightGray,
        _ => return None,
    };
    Some(color)
}
