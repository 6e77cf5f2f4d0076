//! 計算済みスタイル（ComputedStyle）
//!
//! [`ResolvedStyle`] の文字列値を型付きのフィールドに変換したもの。
//! レイアウトと SVG 出力はこちらだけを参照する。どのフィールドにも
//! 対応しないプロパティは `extra` にそのまま残る。

use std::collections::BTreeMap;

use super::cascade::ResolvedStyle;
use super::ua::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR};
use crate::engine::css::values::border::parse_border_width;
use crate::engine::css::values::{Border, BorderSide, BorderStyle, BoxShadow, Color, Edges, Length};
use crate::engine::share::number::parse_number;
use crate::engine::share::text::{parse_function_call, split_top_level_whitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    /// `flex` / `inline-flex`
    Flex,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// `align-items` / `justify-content` の簡易版
///
/// `space-between` などの分配は扱わず、`Start` と同じになる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    fn from_css(value: &str) -> Self {
        match value {
            "center" => Alignment::Center,
            "flex-end" | "end" | "right" | "bottom" => Alignment::End,
            "flex-start" | "start" | "left" | "top" | "stretch" | "normal" | "baseline" => {
                Alignment::Start
            }
            other => {
                log::debug!(target:"Styler::Computed", "Alignment `{}` treated as start", other);
                Alignment::Start
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    /// 単位なし（フォントサイズに対する倍率）
    Factor(f32),
    Px(f32),
}

/// `animation` 関連の宣言（未解釈の文字列のまま）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationProperties {
    pub shorthand: Option<String>,
    pub name: Option<String>,
    pub duration: Option<String>,
    pub delay: Option<String>,
    pub iteration_count: Option<String>,
    pub direction: Option<String>,
    pub fill_mode: Option<String>,
    pub timing_function: Option<String>,
}

impl AnimationProperties {
    pub fn is_empty(&self) -> bool {
        self.shorthand.is_none() && self.name.is_none()
    }
}

/// 計算済みスタイル
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub flex_direction: FlexDirection,
    pub align_items: Alignment,
    pub justify_content: Alignment,
    pub position: Position,

    pub width: Option<Length>,
    pub height: Option<Length>,
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,

    pub padding: Edges<Length>,
    pub margin: Edges<Length>,
    pub gap: Length,

    pub font_size: f32,
    pub font_family: String,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub line_height: Option<LineHeight>,
    pub text_align: Option<TextAlign>,
    /// CSS の色表記のまま（SVG 出力時に変換する）
    pub color: String,

    /// `background-color` があればそちら、なければ `background`
    pub background: Option<String>,
    pub background_size: Option<String>,
    pub border: Border,
    pub border_radius: Option<Length>,
    pub box_shadow: Option<BoxShadow>,
    /// `filter: blur(Npx)`
    pub blur: Option<f32>,
    pub opacity: Option<f32>,

    pub animation: AnimationProperties,

    /// 解釈しないプロパティ
    pub extra: BTreeMap<String, String>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            flex_direction: FlexDirection::Row,
            align_items: Alignment::Start,
            justify_content: Alignment::Start,
            position: Position::Static,
            width: None,
            height: None,
            top: None,
            right: None,
            bottom: None,
            left: None,
            padding: Edges::default(),
            margin: Edges::default(),
            gap: Length::Px(0.0),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: None,
            font_style: None,
            line_height: None,
            text_align: None,
            color: DEFAULT_TEXT_COLOR.to_string(),
            background: None,
            background_size: None,
            border: Border::default(),
            border_radius: None,
            box_shadow: None,
            blur: None,
            opacity: None,
            animation: AnimationProperties::default(),
            extra: BTreeMap::new(),
        }
    }
}

impl ComputedStyle {
    /// 宣言はプロパティ名の昇順で適用される。後の段のショートハンドに
    /// 上書きされたロングハンドはカスケードで取り除かれているので、
    /// ここに残るロングハンドは同じ段以降のものだけ。
    pub fn compute(resolved: &ResolvedStyle) -> Self {
        let mut style = ComputedStyle::default();
        for (name, value) in resolved.iter() {
            if style.apply_declaration(name, value.trim()).is_none() {
                log::debug!(target:"Styler::Computed", "Invalid value for {}: `{}`", name, value);
            }
        }
        style
    }

    pub fn is_flex(&self) -> bool {
        self.display == Display::Flex
    }

    pub fn is_flex_row(&self) -> bool {
        self.is_flex() && self.flex_direction == FlexDirection::Row
    }

    pub fn is_flex_column(&self) -> bool {
        self.is_flex() && self.flex_direction == FlexDirection::Column
    }

    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }

    /// 1行の高さ。`line-height` 未指定時は `font_size * default_factor`
    pub fn line_height_or(&self, default_factor: f32) -> f32 {
        match self.line_height {
            Some(LineHeight::Factor(f)) => self.font_size * f,
            Some(LineHeight::Px(px)) => px,
            None => self.font_size * default_factor,
        }
    }

    fn apply_declaration(&mut self, name: &str, value: &str) -> Option<()> {
        let lower = value.to_ascii_lowercase();
        let keyword = lower.as_str();

        match name {
            /* ======================
             * Display / Flex
             * ====================== */
            "display" => {
                self.display = match keyword {
                    "flex" | "inline-flex" => Display::Flex,
                    "none" => Display::None,
                    _ => Display::Block,
                };
            }
            "flex-direction" => {
                self.flex_direction = match keyword {
                    "column" | "column-reverse" => FlexDirection::Column,
                    _ => FlexDirection::Row,
                };
            }
            "align-items" => self.align_items = Alignment::from_css(keyword),
            "justify-content" => self.justify_content = Alignment::from_css(keyword),
            "gap" => {
                // `gap: row column` は先頭の値のみ
                let first = split_top_level_whitespace(value).into_iter().next()?;
                self.gap = Length::from_css(&first)?;
            }
            "position" => {
                self.position = match keyword {
                    "absolute" | "fixed" => Position::Absolute,
                    "relative" => Position::Relative,
                    _ => Position::Static,
                };
            }

            /* ======================
             * Box
             * ====================== */
            "width" => self.width = Some(Length::from_css(value)?).filter(|l| !l.is_auto()),
            "height" => self.height = Some(Length::from_css(value)?).filter(|l| !l.is_auto()),
            "top" => self.top = Some(Length::from_css(value)?),
            "right" => self.right = Some(Length::from_css(value)?),
            "bottom" => self.bottom = Some(Length::from_css(value)?),
            "left" => self.left = Some(Length::from_css(value)?),

            "padding" => self.padding = Edges::parse_shorthand(value)?,
            "padding-top" => self.padding.top = Length::from_css(value)?,
            "padding-right" => self.padding.right = Length::from_css(value)?,
            "padding-bottom" => self.padding.bottom = Length::from_css(value)?,
            "padding-left" => self.padding.left = Length::from_css(value)?,

            "margin" => self.margin = Edges::parse_shorthand(value)?,
            "margin-top" => self.margin.top = Length::from_css(value)?,
            "margin-right" => self.margin.right = Length::from_css(value)?,
            "margin-bottom" => self.margin.bottom = Length::from_css(value)?,
            "margin-left" => self.margin.left = Length::from_css(value)?,

            /* ======================
             * Text
             * ====================== */
            "font-size" => self.font_size = parse_font_size(keyword)?,
            "font-family" => self.font_family = value.to_string(),
            "font-weight" => self.font_weight = Some(value.to_string()),
            "font-style" => self.font_style = Some(value.to_string()),
            "line-height" => self.line_height = parse_line_height(keyword),
            "text-align" => {
                self.text_align = match keyword {
                    "center" => Some(TextAlign::Center),
                    "right" | "end" => Some(TextAlign::Right),
                    "left" | "start" | "justify" => Some(TextAlign::Left),
                    _ => return None,
                };
            }
            "color" => {
                if !matches!(keyword, "inherit" | "currentcolor") {
                    self.color = value.to_string();
                }
            }

            /* ======================
             * Paint
             * ====================== */
            "background" | "background-color" => {
                self.background = (keyword != "none").then(|| value.to_string());
            }
            "background-size" => self.background_size = Some(value.to_string()),
            "border" => {
                let side = BorderSide::parse_shorthand(value)?;
                self.border.all = side;
                self.border.top = side;
            }
            "border-top" => self.border.top = BorderSide::parse_shorthand(value)?,
            "border-width" => {
                let first = split_top_level_whitespace(value).into_iter().next()?;
                let width = parse_border_width(&first)?;
                self.border.all.width = width;
                self.border.top.width = width;
            }
            "border-style" => {
                let first = split_top_level_whitespace(value).into_iter().next()?;
                let style = BorderStyle::from_css(&first)?;
                self.border.all.style = style;
                self.border.top.style = style;
            }
            "border-color" => {
                let first = split_top_level_whitespace(value).into_iter().next()?;
                let color = Color::parse(&first)?;
                self.border.all.color = Some(color);
                self.border.top.color = Some(color);
            }
            "border-top-color" => self.border.top.color = Some(Color::parse(value)?),
            "border-radius" => {
                // 楕円指定（`a / b`）や角ごとの値は先頭のみ
                let first = split_top_level_whitespace(value).into_iter().next()?;
                self.border_radius = Some(Length::from_css(&first)?);
            }
            "box-shadow" => self.box_shadow = BoxShadow::parse(value),
            "filter" => {
                let (function, args) = parse_function_call(value)?;
                if function != "blur" {
                    self.extra.insert(name.to_string(), value.to_string());
                    return Some(());
                }
                self.blur = Some(Length::from_css(&args)?.to_px(0.0).max(0.0));
            }
            "opacity" => {
                let opacity = match keyword.strip_suffix('%') {
                    Some(p) => parse_number(p)? / 100.0,
                    None => parse_number(keyword)?,
                };
                self.opacity = Some(opacity.clamp(0.0, 1.0));
            }

            /* ======================
             * Animation
             * ====================== */
            "animation" => self.animation.shorthand = Some(value.to_string()),
            "animation-name" => self.animation.name = Some(value.to_string()),
            "animation-duration" => self.animation.duration = Some(value.to_string()),
            "animation-delay" => self.animation.delay = Some(value.to_string()),
            "animation-iteration-count" => self.animation.iteration_count = Some(value.to_string()),
            "animation-direction" => self.animation.direction = Some(value.to_string()),
            "animation-fill-mode" => self.animation.fill_mode = Some(value.to_string()),
            "animation-timing-function" => self.animation.timing_function = Some(value.to_string()),

            _ => {
                self.extra.insert(name.to_string(), value.to_string());
            }
        }

        Some(())
    }
}

fn parse_font_size(value: &str) -> Option<f32> {
    let keyword = match value {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(16.0),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        _ => None,
    };
    if keyword.is_some() {
        return keyword;
    }

    let size = Length::from_css(value)?;
    if size.is_auto() {
        return None;
    }
    Some(size.to_px(DEFAULT_FONT_SIZE)).filter(|px| *px > 0.0)
}

fn parse_line_height(value: &str) -> Option<LineHeight> {
    if value == "normal" {
        return None;
    }
    if let Some(factor) = parse_number(value) {
        return Some(LineHeight::Factor(factor.max(0.0)));
    }
    match Length::from_css(value)? {
        Length::Percent(p) => Some(LineHeight::Factor(p / 100.0)),
        Length::Em(em) | Length::Rem(em) => Some(LineHeight::Factor(em)),
        Length::Px(px) => Some(LineHeight::Px(px.max(0.0))),
        Length::Auto => None,
    }
}
