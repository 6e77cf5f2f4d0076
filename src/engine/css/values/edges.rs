//! Four-sided box values (`padding`, `margin`).

use super::length::Length;
use crate::engine::share::text::split_top_level_whitespace;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Edges<T> {
    pub fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// CSS の 1〜4 値ショートハンド展開
    ///
    /// 1 → all, 2 → (vertical, horizontal), 3 → (top, horizontal, bottom),
    /// 4 → (top, right, bottom, left)
    pub fn from_values(values: &[T]) -> Option<Self> {
        match *values {
            [a] => Some(Self::all(a)),
            [v, h] => Some(Self {
                top: v,
                right: h,
                bottom: v,
                left: h,
            }),
            [t, h, b] => Some(Self {
                top: t,
                right: h,
                bottom: b,
                left: h,
            }),
            [t, r, b, l] => Some(Self {
                top: t,
                right: r,
                bottom: b,
                left: l,
            }),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> Edges<U> {
        Edges {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

impl Edges<Length> {
    /// `padding: 5px 10px` のようなショートハンドをパースする
    pub fn parse_shorthand(value: &str) -> Option<Self> {
        let lengths = split_top_level_whitespace(value)
            .iter()
            .map(|v| Length::from_css(v))
            .collect::<Option<Vec<_>>>()?;
        Self::from_values(&lengths)
    }
}

impl Edges<f32> {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("5px", (5.0, 5.0, 5.0, 5.0) ; "one value")]
    #[test_case("5px 10px", (5.0, 10.0, 5.0, 10.0) ; "two values")]
    #[test_case("1px 2px 3px", (1.0, 2.0, 3.0, 2.0) ; "three values")]
    #[test_case("1px 2px 3px 4px", (1.0, 2.0, 3.0, 4.0) ; "four values")]
    #[test_case("0 1em", (0.0, 16.0, 0.0, 16.0) ; "mixed units")]
    fn corner_expansion(input: &str, expected: (f32, f32, f32, f32)) {
        let edges = Edges::parse_shorthand(input)
            .expect("valid shorthand")
            .map(|l| l.to_px(0.0));
        assert_eq!(
            (edges.top, edges.right, edges.bottom, edges.left),
            expected
        );
    }

    #[test]
    fn rejects_bad_shorthands() {
        assert!(Edges::parse_shorthand("").is_none());
        assert!(Edges::parse_shorthand("1px 2px 3px 4px 5px").is_none());
        assert!(Edges::parse_shorthand("wide").is_none());
    }
}
