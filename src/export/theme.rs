//! Terminal colors for the report table.
//!
//! Built-in themes: default, dracula, monochrome, plain. `plain` emits no
//! escape codes at all and is used when output is not a terminal.

use crossterm::style::{Color, Stylize};
use std::borrow::Cow;

/// Colors used by the report writer
#[derive(Clone, Debug)]
pub struct Theme {
    name: Cow<'static, str>,

    pub header: Option<Color>,
    pub rule: Option<Color>,

    // Hop classes
    pub public: Option<Color>,
    pub private: Option<Color>,

    /// "N/A" and missing values
    pub missing: Option<Color>,
    pub total: Option<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: Cow::Borrowed("default"),
            header: Some(Color::Cyan),
            rule: Some(Color::DarkGrey),
            public: Some(Color::Green),
            private: Some(Color::Red),
            missing: Some(Color::DarkGrey),
            total: Some(Color::Yellow),
        }
    }

    /// Dracula theme - popular dark theme
    pub fn dracula() -> Self {
        Self {
            name: Cow::Borrowed("dracula"),
            header: Some(Color::Rgb { r: 255, g: 121, b: 198 }), // Pink
            rule: Some(Color::Rgb { r: 98, g: 114, b: 164 }),    // Comment
            public: Some(Color::Rgb { r: 80, g: 250, b: 123 }),  // Green
            private: Some(Color::Rgb { r: 255, g: 85, b: 85 }),  // Red
            missing: Some(Color::Rgb { r: 98, g: 114, b: 164 }),
            total: Some(Color::Rgb { r: 241, g: 250, b: 140 }), // Yellow
        }
    }

    /// Monochrome theme - grayscale only
    pub fn monochrome() -> Self {
        Self {
            name: Cow::Borrowed("monochrome"),
            header: Some(Color::White),
            rule: Some(Color::Grey),
            public: Some(Color::White),
            private: Some(Color::Grey),
            missing: Some(Color::DarkGrey),
            total: Some(Color::White),
        }
    }

    /// No escape codes
    pub fn plain() -> Self {
        Self {
            name: Cow::Borrowed("plain"),
            header: None,
            rule: None,
            public: None,
            private: None,
            missing: None,
            total: None,
        }
    }

    /// Get theme by name (case-insensitive), falls back to default
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "monochrome" | "mono" => Self::monochrome(),
            "plain" | "none" => Self::plain(),
            _ => Self::default_theme(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// List all available theme names
    pub fn list() -> &'static [&'static str] {
        &["default", "dracula", "monochrome", "plain"]
    }

    /// Wrap `text` in `color`, or return it untouched
    pub fn paint(&self, text: &str, color: Option<Color>) -> String {
        match color {
            Some(color) => text.with(color).to_string(),
            None => text.to_string(),
        }
    }
}
