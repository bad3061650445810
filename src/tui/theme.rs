use ratatui::style::Color;

use crate::model::{Server, ServerFilter, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    /// "Recent" section heading
    pub yellow: Color,
    /// Filled star and "Favorites" heading
    pub gold: Color,
    pub selection_bg: Color,
    pub popup_bg: Color,
    pub server_blue: Color,
    pub server_green: Color,
    pub server_red: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x2C, 0x2C, 0x2C),
            text: Color::Rgb(0xCC, 0xCC, 0xCC),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x00, 0x78, 0xD7),
            dim: Color::Rgb(0x66, 0x66, 0x66),
            red: Color::Rgb(0xC0, 0x39, 0x2B),
            yellow: Color::Rgb(0xFF, 0xFF, 0x4D),
            gold: Color::Rgb(0xFF, 0xD7, 0x00),
            selection_bg: Color::Rgb(0x00, 0x5A, 0x9E),
            popup_bg: Color::Rgb(0x40, 0x40, 0x40),
            server_blue: Color::Rgb(0x4D, 0xA6, 0xFF),
            server_green: Color::Rgb(0x4D, 0xFF, 0x4D),
            server_red: Color::Rgb(0xFF, 0x4D, 0x4D),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "gold" => theme.gold = color,
                    "selection_bg" => theme.selection_bg = color,
                    "popup_bg" => theme.popup_bg = color,
                    _ => {}
                }
            }
        }

        for (name, value) in &ui.server_colors {
            if let (Some(server), Some(color)) = (Server::parse_server(name), parse_hex_color(value)) {
                match server {
                    Server::Blue => theme.server_blue = color,
                    Server::Green => theme.server_green = color,
                    Server::Red => theme.server_red = color,
                }
            }
        }

        theme
    }

    pub fn server_color(&self, server: Server) -> Color {
        match server {
            Server::Blue => self.server_blue,
            Server::Green => self.server_green,
            Server::Red => self.server_red,
        }
    }

    /// "All" is drawn in bright text
    pub fn filter_color(&self, filter: ServerFilter) -> Color {
        match filter {
            ServerFilter::All => self.text_bright,
            ServerFilter::Blue => self.server_blue,
            ServerFilter::Green => self.server_green,
            ServerFilter::Red => self.server_red,
        }
    }
}
