// Theme for the TUI
//
// One palette for the chrome plus helpers that turn the catalog's CSS color
// strings into terminal colors. Terminals have no alpha channel, so
// translucent tints are flattened against the theme background.

use crate::color::Rgb;
use ratatui::style::{Color, Modifier, Style};

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub border_focused: Color,
    /// Background as RGB, for flattening translucent tints
    pub canvas: Rgb,

    // Title and status
    pub title: Color,
    pub status_bar: Color,
    pub muted: Color,

    // Selection
    pub selected_bg: Color,
    pub selected_fg: Color,

    // Selector modes
    pub edit_mode: Color,
    pub drag: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
    pub log_trace: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        let canvas = Rgb {
            r: 0x1e,
            g: 0x1e,
            b: 0x1e,
        };
        Self {
            bg: to_color(canvas),
            fg: Color::White,
            border: Color::Gray,
            border_focused: Color::Cyan,
            canvas,

            title: Color::Cyan,
            status_bar: Color::Green,
            muted: Color::DarkGray,

            selected_bg: Color::DarkGray,
            selected_fg: Color::Yellow,

            edit_mode: Color::Magenta,
            drag: Color::LightBlue,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
            log_trace: Color::DarkGray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        let canvas = Rgb {
            r: 0xff,
            g: 0xff,
            b: 0xff,
        };
        Self {
            bg: to_color(canvas),
            fg: Color::Black,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            canvas,

            title: Color::Blue,
            status_bar: Color::DarkGray,
            muted: Color::Gray,

            selected_bg: Color::LightBlue,
            selected_fg: Color::Black,

            edit_mode: Color::Magenta,
            drag: Color::Blue,

            log_error: Color::Red,
            log_warn: Color::Rgb(184, 134, 11), // Dark goldenrod
            log_info: Color::Blue,
            log_debug: Color::DarkGray,
            log_trace: Color::Gray,
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.border_focused
        } else {
            self.border
        };
        Style::default().fg(color)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Parse a CSS color as used by the catalog and flatten it onto the canvas
    ///
    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`. Anything else falls back to
    /// the theme foreground.
    pub fn css_color(&self, css: &str) -> Color {
        css_rgb(css, self.canvas).map(to_color).unwrap_or(self.fg)
    }

    /// Chip background for a shaded type (base color at the shade's alpha)
    pub fn tint(&self, base: &str, alpha: f32) -> Color {
        match Rgb::parse_hex(base) {
            Some(rgb) => to_color(rgb.blend_over(self.canvas, alpha)),
            None => self.muted,
        }
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Black or white, whichever reads better on `background`
pub fn contrast_text(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) => {
            let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
            if luma > 140.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => Color::White,
    }
}

fn css_rgb(css: &str, canvas: Rgb) -> Option<Rgb> {
    let hex = css.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            Rgb::parse_hex(&expanded)
        }
        6 => Rgb::parse_hex(hex),
        8 if hex.is_ascii() => {
            let alpha = u8::from_str_radix(&hex[6..], 16).ok()?;
            let rgb = Rgb::parse_hex(&hex[..6])?;
            Some(rgb.blend_over(canvas, f32::from(alpha) / 255.0))
        }
        _ => None,
    }
}
