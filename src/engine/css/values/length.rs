//! CSS length values (px, em, rem, %)
//! Used in width/height, padding, margin, gap, top/left, etc.

use std::fmt;

/// `em` / `rem` はこの基準値で解決する
pub const ROOT_FONT_SIZE: f32 = 16.0;

/// CSSの長さ単位を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// 絶対値 (px)。単位なしの数値もここに入る
    Px(f32),
    /// 相対値 (em)
    Em(f32),
    /// 相対値 (rem)
    Rem(f32),
    /// パーセンテージ (%)
    Percent(f32),
    /// 自動 (auto)
    Auto,
}

impl Length {
    /// ピクセル値として評価する。`%` は `base` に対する割合。
    pub fn to_px(&self, base: f32) -> f32 {
        match *self {
            Length::Px(px) => px,
            Length::Em(em) => em * ROOT_FONT_SIZE,
            Length::Rem(rem) => rem * ROOT_FONT_SIZE,
            Length::Percent(p) => base * (p / 100.0),
            Length::Auto => 0.0,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// CSS文字列からLength
    pub fn from_css(value: &str) -> Option<Length> {
        let value = value.trim().to_ascii_lowercase();
        if value == "auto" {
            return Some(Length::Auto);
        }

        let number = |s: &str| s.trim().parse::<f32>().ok().filter(|v| v.is_finite());

        if let Some(num) = value.strip_suffix("px") {
            number(num).map(Length::Px)
        } else if let Some(num) = value.strip_suffix("rem") {
            number(num).map(Length::Rem)
        } else if let Some(num) = value.strip_suffix("em") {
            number(num).map(Length::Em)
        } else if let Some(num) = value.strip_suffix('%') {
            number(num).map(Length::Percent)
        } else if let Some(num) = value.strip_suffix("pt") {
            number(num).map(|pt| Length::Px(pt * 4.0 / 3.0))
        } else {
            number(&value).map(Length::Px)
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Em(v) => write!(f, "{}em", v),
            Length::Rem(v) => write!(f, "{}rem", v),
            Length::Percent(v) => write!(f, "{}%", v),
            Length::Auto => write!(f, "auto"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10px", Some(Length::Px(10.0)) ; "pixels")]
    #[test_case("10", Some(Length::Px(10.0)) ; "bare number")]
    #[test_case("1.5em", Some(Length::Em(1.5)) ; "em")]
    #[test_case("2rem", Some(Length::Rem(2.0)) ; "rem is not em")]
    #[test_case("50%", Some(Length::Percent(50.0)) ; "percent")]
    #[test_case("AUTO", Some(Length::Auto) ; "auto")]
    #[test_case("12pt", Some(Length::Px(16.0)) ; "points")]
    #[test_case("calc(100% - 4px)", None ; "unsupported")]
    #[test_case("px", None ; "missing number")]
    fn parses(input: &str, expected: Option<Length>) {
        assert_eq!(Length::from_css(input), expected);
    }

    #[test]
    fn resolves_against_base() {
        assert_eq!(Length::Percent(50.0).to_px(300.0), 150.0);
        assert_eq!(Length::Em(2.0).to_px(300.0), 32.0);
        assert_eq!(Length::Px(7.0).to_px(300.0), 7.0);
    }
}
