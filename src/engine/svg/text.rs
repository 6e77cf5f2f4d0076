//! テキストの折り返しと `<text>` 出力
//!
//! フォントは読み込まないので、1文字の幅を `font-size * 0.6` と仮定して
//! 単語単位で折り返す。

use super::paint::SolidPaint;
use crate::engine::css::values::Color;
use crate::engine::layouter::Bounds;
use crate::engine::layouter::estimate::chars_per_line;
use crate::engine::share::number::fmt_num;
use crate::engine::share::text::escape_xml;
use crate::engine::styler::ua::DEFAULT_TEXT_COLOR;
use crate::engine::styler::{Alignment, ComputedStyle, StyledNode, TextAlign};

/// 行送り（フォントサイズに対する比）
pub const LINE_STEP: f32 = 1.2;
/// 行の中心からベースラインまでのずれ（フォントサイズに対する比）
pub const BASELINE_SHIFT: f32 = 0.35;

/// 単語単位で折り返す。1行に収まらない単語は文字単位で分割する。
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let max_chars = chars_per_line(font_size, max_width);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + word.len() <= max_chars {
            current.push(' ');
            current.extend(word.iter());
            current_len += 1 + word.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        while word.len() > max_chars {
            let rest = word.split_off(max_chars);
            lines.push(word.iter().collect());
            word = rest;
        }
        current_len = word.len();
        current = word.into_iter().collect();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// 横方向・縦方向の揃え
///
/// `text-align` が優先。フレックスコンテナ自身が持つテキストは、
/// 主軸・交差軸の揃えに従って中央（または末尾）に寄せる。
fn text_alignment(style: &ComputedStyle) -> (TextAlign, Alignment) {
    let (horizontal, vertical) = if style.is_flex_column() {
        (style.align_items, style.justify_content)
    } else if style.is_flex() {
        (style.justify_content, style.align_items)
    } else {
        (Alignment::Start, Alignment::Start)
    };

    let text_align = style.text_align.unwrap_or(match horizontal {
        Alignment::Start => TextAlign::Left,
        Alignment::Center => TextAlign::Center,
        Alignment::End => TextAlign::Right,
    });
    (text_align, vertical)
}

/// 要素のテキストを描く。`offset` は描画座標から引く量（中心座標系用）
pub fn render_text(node: &StyledNode<'_>, bounds: &Bounds, offset: (f32, f32)) -> String {
    let style = &node.style;
    let lines = wrap_text(node.text(), style.font_size, bounds.width);
    if lines.is_empty() {
        return String::new();
    }

    let line_height = style.line_height_or(LINE_STEP);
    let (text_align, vertical) = text_alignment(style);
    let (anchor, x) = match text_align {
        TextAlign::Left => ("start", bounds.x),
        TextAlign::Center => ("middle", bounds.center_x),
        TextAlign::Right => ("end", bounds.x + bounds.width),
    };

    let block_height = lines.len() as f32 * line_height;
    let top = match vertical {
        Alignment::Start => bounds.y,
        Alignment::Center => bounds.center_y - block_height / 2.0,
        Alignment::End => bounds.y + bounds.height - block_height,
    };
    let baseline = top + line_height / 2.0 + style.font_size * BASELINE_SHIFT;
    let x = fmt_num(x - offset.0);

    let fill = match SolidPaint::from_css(&style.color, DEFAULT_TEXT_COLOR) {
        Some(paint) => paint.attrs("fill"),
        None if Color::parse(&style.color).is_some() => r#" fill="none""#.to_string(),
        None => format!(r#" fill="{}""#, DEFAULT_TEXT_COLOR),
    };

    let mut markup = format!(
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}"{} text-anchor="{}""#,
        x,
        fmt_num(baseline - offset.1),
        escape_xml(&style.font_family),
        fmt_num(style.font_size),
        fill,
        anchor
    );
    if let Some(weight) = &style.font_weight {
        markup.push_str(&format!(r#" font-weight="{}""#, escape_xml(weight)));
    }
    if let Some(font_style) = &style.font_style {
        markup.push_str(&format!(r#" font-style="{}""#, escape_xml(font_style)));
    }
    markup.push('>');

    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { line_height };
        markup.push_str(&format!(
            r#"<tspan x="{}" dy="{}">{}</tspan>"#,
            x,
            fmt_num(dy),
            escape_xml(line)
        ));
    }
    markup.push_str("</text>");
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_words() {
        // 9.6px/文字、幅 60px → 6 文字
        let lines = wrap_text("ab cd efgh ij", 16.0, 60.0);
        assert_eq!(lines, vec!["ab cd", "efgh", "ij"]);
    }

    #[test]
    fn breaks_long_words() {
        let lines = wrap_text("abcdefghij", 16.0, 40.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn exact_fit_stays_on_one_line() {
        let text = "Hello World";
        let width = text.chars().count() as f32 * 16.0 * 0.6;
        assert_eq!(wrap_text(text, 16.0, width), vec![text]);
    }

    #[test]
    fn empty_text() {
        assert!(wrap_text("   ", 16.0, 100.0).is_empty());
    }
}
