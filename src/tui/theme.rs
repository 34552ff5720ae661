// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::model::Author;
use crate::prefs::Theme;

pub(crate) const PALETTE_ENV: &str = "KNINE_TUI_PALETTE";

/// Resolved colours for one frame: the light/dark preference plus an optional palette override.
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    mode: Theme,
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env(mode: Theme) -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { mode, palette })
    }

    pub(crate) fn with_mode(&self, mode: Theme) -> Self {
        Self { mode, palette: self.palette.clone() }
    }

    pub(crate) fn mode(&self) -> Theme {
        self.mode
    }

    pub(crate) fn base_style(&self) -> Style {
        match (&self.palette, self.mode) {
            (Some(palette), _) => Style::default().fg(palette.fg).bg(palette.bg),
            (None, Theme::Dark) => Style::default(),
            (None, Theme::Light) => Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    fn ansi_color(&self, color: Ansi16) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi_color(color.idx()),
            None => match (self.mode, color) {
                (Theme::Light, Ansi16::BrightCyan) => Color::Blue,
                (Theme::Light, Ansi16::BrightGreen) => Color::Green,
                (Theme::Light, Ansi16::BrightBlack) => Color::Gray,
                _ => color.into(),
            },
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.ansi_color(Ansi16::Yellow))
        } else {
            self.base_style()
        }
    }

    pub(crate) fn author_style(&self, author: Author) -> Style {
        let color = match author {
            Author::User => Ansi16::BrightCyan,
            Author::Agent => Ansi16::BrightGreen,
        };
        self.base_style().fg(self.ansi_color(color)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn citation_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Magenta))
    }

    pub(crate) fn dim_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightBlack))
    }

    pub(crate) fn key_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Cyan)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Red))
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg and the 16 ANSI colors), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let fg = parse_palette_color(parts[0])?;
        let bg = parse_palette_color(parts[1])?;

        let mut ansi = [Color::Reset; 16];
        for (idx, part) in parts.iter().skip(2).enumerate() {
            ansi[idx] = parse_palette_color(part)?;
        }

        Ok(Self { fg, bg, ansi })
    }

    fn ansi_color(&self, idx: usize) -> Color {
        self.ansi[idx]
    }
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    let value = match env::var(PALETTE_ENV) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    TuiPalette::parse_csv(trimmed).map(Some).map_err(|error| ThemeError::InvalidEnv {
        name: PALETTE_ENV.to_owned(),
        value: format!("{trimmed} ({error})"),
    })
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != 3 {
            return Err(format!("invalid rgb: value: {trimmed}"));
        }
        let r = parse_hex_channel(parts[0])?;
        let g = parse_hex_channel(parts[1])?;
        let b = parse_hex_channel(parts[2])?;
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    match value.len() {
        2 => u8::from_str_radix(value, 16).map_err(|_| format!("invalid rgb: component {value}")),
        4 => u16::from_str_radix(value, 16)
            .map(|parsed| (parsed >> 8) as u8)
            .map_err(|_| format!("invalid rgb: component {value}")),
        _ => Err(format!("invalid rgb: component {value} (expected 2 or 4 hex digits)")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ansi16 {
    Red,
    Yellow,
    Magenta,
    Cyan,
    BrightBlack,
    BrightGreen,
    BrightCyan,
}

impl Ansi16 {
    const fn idx(self) -> usize {
        match self {
            Self::Red => 1,
            Self::Yellow => 3,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::BrightBlack => 8,
            Self::BrightGreen => 10,
            Self::BrightCyan => 14,
        }
    }
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        match value {
            Ansi16::Red => Color::Red,
            Ansi16::Yellow => Color::Yellow,
            Ansi16::Magenta => Color::Magenta,
            Ansi16::Cyan => Color::Cyan,
            Ansi16::BrightBlack => Color::DarkGray,
            Ansi16::BrightGreen => Color::LightGreen,
            Ansi16::BrightCyan => Color::LightCyan,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::{TuiPalette, TuiTheme};
    use crate::prefs::Theme;

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = TuiPalette::parse_csv(
            "#111111,#222222,#000000,#ff0000,#00ff00,#ffff00,#0000ff,#ff00ff,#00ffff,#ffffff,#1a1a1a,#ff1111,#11ff11,#ffff11,#1111ff,#ff11ff,#11ffff,#fefefe",
        )
        .expect("palette");

        assert_eq!(palette.fg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette.bg, Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(palette.ansi_color(1), Color::Rgb(0xff, 0, 0));
        assert_eq!(palette.ansi_color(15), Color::Rgb(0xfe, 0xfe, 0xfe));
    }

    #[test]
    fn palette_override_rejects_invalid_csv() {
        let err = TuiPalette::parse_csv("nope").unwrap_err();
        assert!(err.contains("expected"));
    }

    #[test]
    fn rgb_channels_accept_two_or_four_digits() {
        let csv = ["rgb:11/2222/33"; 18].join(",");
        let palette = TuiPalette::parse_csv(&csv).expect("palette");
        assert_eq!(palette.fg, Color::Rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn light_mode_paints_a_light_background() {
        let theme = TuiTheme::default().with_mode(Theme::Light);
        assert_eq!(theme.base_style().bg, Some(Color::White));
        assert_eq!(TuiTheme::default().base_style().bg, None);
    }
}
