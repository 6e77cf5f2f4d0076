//! `box-shadow`

use super::color::Color;
use super::length::Length;
use crate::engine::share::text::{split_top_level, split_top_level_whitespace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub color: Color,
}

impl BoxShadow {
    /// 先頭のシャドウのみ扱う。`inset` と spread は無視する。
    pub fn parse(value: &str) -> Option<Self> {
        let first = split_top_level(value, ',').into_iter().next()?;
        if first.eq_ignore_ascii_case("none") {
            return None;
        }

        let mut lengths = Vec::new();
        let mut color = None;
        for token in split_top_level_whitespace(&first) {
            if token.eq_ignore_ascii_case("inset") {
                continue;
            }
            match Length::from_css(&token) {
                Some(length) if !length.is_auto() => lengths.push(length.to_px(0.0)),
                _ => color = Color::parse(&token).or(color),
            }
        }

        let [offset_x, offset_y, rest @ ..] = lengths.as_slice() else {
            return None;
        };
        Some(Self {
            offset_x: *offset_x,
            offset_y: *offset_y,
            blur: rest.first().copied().unwrap_or(0.0).max(0.0),
            color: color.unwrap_or(Color::Rgba(0, 0, 0, 0.5)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_shadow() {
        let shadow = BoxShadow::parse("0 4px 12px rgba(0, 0, 0, 0.3), 0 0 2px red").unwrap();
        assert_eq!(shadow.offset_y, 4.0);
        assert_eq!(shadow.blur, 12.0);
        assert_eq!(shadow.color, Color::Rgba(0, 0, 0, 0.3));
    }

    #[test]
    fn none_and_garbage() {
        assert!(BoxShadow::parse("none").is_none());
        assert!(BoxShadow::parse("red").is_none());
    }
}
