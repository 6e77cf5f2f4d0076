//! CSS border values
//! (`border`, `border-top`, `border-width`, `border-style`, `border-color`)

use super::color::Color;
use super::length::Length;
use crate::engine::share::text::split_top_level_whitespace;

/// CSSのborder-styleプロパティで使われる値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Hidden,
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(BorderStyle::None),
            "hidden" => Some(BorderStyle::Hidden),
            "solid" => Some(BorderStyle::Solid),
            "dashed" => Some(BorderStyle::Dashed),
            "dotted" => Some(BorderStyle::Dotted),
            "double" => Some(BorderStyle::Double),
            // groove 等は実線扱い
            "groove" | "ridge" | "inset" | "outset" => Some(BorderStyle::Solid),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, BorderStyle::None | BorderStyle::Hidden)
    }
}

/// 単一の辺、または4辺共通のborder定義
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BorderSide {
    pub width: f32,
    pub style: BorderStyle,
    /// None は `color` プロパティ（currentColor）に従う
    pub color: Option<Color>,
}

impl Default for BorderSide {
    fn default() -> Self {
        Self {
            width: 0.0,
            style: BorderStyle::None,
            color: None,
        }
    }
}

impl BorderSide {
    /// `2px solid #333` のようなショートハンド。順序は問わない。
    ///
    /// スタイル省略時は描画されない（CSS と同じ）。幅省略時は medium = 3px。
    pub fn parse_shorthand(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("none") || value == "0" {
            return Some(Self::default());
        }

        let mut side = BorderSide {
            width: 3.0,
            ..Default::default()
        };
        let mut recognized = false;
        for token in split_top_level_whitespace(value) {
            if let Some(style) = BorderStyle::from_css(&token) {
                side.style = style;
            } else if let Some(width) = parse_border_width(&token) {
                side.width = width;
            } else if let Some(color) = Color::parse(&token) {
                side.color = Some(color);
            } else {
                log::debug!(target:"CssParser::Border", "Unknown border token `{}`", token);
                continue;
            }
            recognized = true;
        }
        recognized.then_some(side)
    }

    pub fn is_visible(&self) -> bool {
        self.style.is_visible() && self.width > 0.0
    }
}

/// `thin` / `medium` / `thick` / 長さ
pub fn parse_border_width(value: &str) -> Option<f32> {
    match value.trim().to_ascii_lowercase().as_str() {
        "thin" => Some(1.0),
        "medium" => Some(3.0),
        "thick" => Some(5.0),
        other => match Length::from_css(other)? {
            Length::Auto | Length::Percent(_) => None,
            length => Some(length.to_px(0.0).max(0.0)),
        },
    }
}

/// 全体のborderプロパティ
///
/// `top` は円形スピナー描画のために別に保持する。
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Border {
    pub all: BorderSide,
    pub top: BorderSide,
}

impl Border {
    pub fn is_visible(&self) -> bool {
        self.all.is_visible()
    }
}
