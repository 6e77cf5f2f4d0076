//! サイズ見積もり（レイアウトの1パス目）
//!
//! 親は子を配置する前に子の大きさを知る必要がある。ここでは実際の折り返し幅が
//! まだ分からないので、テキストはキャンバス幅の 80% で折り返すと仮定する。
//! ブラウザの描画とは一致しない近似値。

use super::types::{LayoutContext, Size};
use crate::engine::css::values::{Edges, Length};
use crate::engine::styler::StyledNode;

/// 折り返し幅が未知の場合に仮定するキャンバス幅の割合
pub const ASSUMED_WRAP_RATIO: f32 = 0.8;
/// 1文字の幅（フォントサイズに対する比）
pub const CHAR_WIDTH_RATIO: f32 = 0.6;
/// 見積もり時の行の高さ（フォントサイズに対する比）
pub const ESTIMATE_LINE_HEIGHT: f32 = 1.4;
/// 内容から見積もった高さの下限
pub const MIN_ESTIMATED_HEIGHT: f32 = 20.0;

pub fn resolve_edges(edges: &Edges<Length>, base: f32) -> Edges<f32> {
    edges.map(|length| length.to_px(base))
}

/// `width` に収まる1行あたりの文字数（最低 1）
pub fn chars_per_line(font_size: f32, width: f32) -> usize {
    let char_width = font_size * CHAR_WIDTH_RATIO;
    if char_width <= 0.0 {
        return 1;
    }
    // 9.6 * 11 / 9.6 のような誤差で1文字減らないように
    ((width / char_width + 1e-3).floor() as usize).max(1)
}

pub fn estimate_line_count(text: &str, font_size: f32, wrap_width: f32) -> usize {
    let chars = text.chars().count();
    if chars == 0 {
        return 0;
    }
    chars.div_ceil(chars_per_line(font_size, wrap_width))
}

/// 通常フローに参加する子（`position: absolute` 以外）
pub fn flow_children<'n, 'a>(node: &'n StyledNode<'a>) -> impl Iterator<Item = &'n StyledNode<'a>> {
    node.children.iter().filter(|child| !child.style.is_absolute())
}

/// ボーダーボックスの幅を見積もる。`parent` は親のコンテンツボックス。
pub fn estimate_width(node: &StyledNode<'_>, ctx: &LayoutContext, parent: Size) -> f32 {
    let style = &node.style;
    if let Some(width) = style.width {
        return width.to_px(parent.width).max(0.0);
    }

    let padding = resolve_edges(&style.padding, parent.width);
    let content = if node.has_text() {
        let chars = node.text().chars().count() as f32;
        (chars * style.font_size * CHAR_WIDTH_RATIO).min(ctx.assumed_wrap_width())
    } else {
        let inner = inner_size(node, parent);
        let gap = style.gap.to_px(inner.width);
        let widths: Vec<f32> = flow_children(node)
            .map(|child| {
                let margin = resolve_edges(&child.style.margin, inner.width);
                estimate_width(child, ctx, inner) + margin.horizontal()
            })
            .collect();

        if style.is_flex_row() {
            widths.iter().sum::<f32>() + gap * widths.len().saturating_sub(1) as f32
        } else {
            widths.iter().copied().fold(0.0, f32::max)
        }
    };

    content + padding.horizontal()
}

/// ボーダーボックスの高さを見積もる。`parent` は親のコンテンツボックス。
pub fn estimate_height(node: &StyledNode<'_>, ctx: &LayoutContext, parent: Size) -> f32 {
    let style = &node.style;
    if let Some(height) = style.height {
        return height.to_px(parent.height).max(0.0);
    }

    let padding = resolve_edges(&style.padding, parent.width);
    let content = if node.has_text() {
        let lines = estimate_line_count(node.text(), style.font_size, ctx.assumed_wrap_width());
        lines as f32 * style.line_height_or(ESTIMATE_LINE_HEIGHT)
    } else {
        let inner = inner_size(node, parent);
        let gap = style.gap.to_px(inner.width);
        let heights: Vec<f32> = flow_children(node)
            .map(|child| {
                let margin = resolve_edges(&child.style.margin, inner.width);
                estimate_height(child, ctx, inner) + margin.vertical()
            })
            .collect();

        if style.is_flex_row() {
            heights.iter().copied().fold(0.0, f32::max)
        } else {
            heights.iter().sum::<f32>() + gap * heights.len().saturating_sub(1) as f32
        }
    };

    (content + padding.vertical()).max(MIN_ESTIMATED_HEIGHT)
}

/// 子の見積もりに渡す、このノードのコンテンツボックスの大きさ
fn inner_size(node: &StyledNode<'_>, parent: Size) -> Size {
    let style = &node.style;
    let padding = resolve_edges(&style.padding, parent.width);
    let width = style
        .width
        .map(|w| w.to_px(parent.width))
        .unwrap_or(parent.width);
    let height = style
        .height
        .map(|h| h.to_px(parent.height))
        .unwrap_or(parent.height);
    Size::new(
        (width - padding.horizontal()).max(0.0),
        (height - padding.vertical()).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::css;
    use crate::engine::html::{self, Element};
    use crate::engine::styler::{StyleResolver, StyledNode};

    fn with_tree<R>(markup: &str, stylesheet: &str, f: impl FnOnce(&StyledNode<'_>) -> R) -> R {
        let elements: Vec<Element> = html::parse(markup);
        let sheet = css::parse(stylesheet);
        let resolver = StyleResolver::new(&sheet);
        let nodes = StyledNode::build_all(&elements, &resolver);
        f(&nodes[0])
    }

    const CTX: LayoutContext = LayoutContext {
        canvas_width: 800.0,
        canvas_height: 400.0,
    };
    const PARENT: Size = Size {
        width: 800.0,
        height: 400.0,
    };

    #[test]
    fn text_wraps_at_assumed_width() {
        // 640 / 9.6 = 66 文字/行
        assert_eq!(chars_per_line(16.0, 640.0), 66);
        assert_eq!(estimate_line_count(&"a".repeat(67), 16.0, 640.0), 2);
        assert_eq!(estimate_line_count("", 16.0, 640.0), 0);
    }

    #[test]
    fn text_height_and_floor() {
        with_tree("<div>Hello World</div>", "", |node| {
            let h = estimate_height(node, &CTX, PARENT);
            assert!((h - 22.4).abs() < 1e-4);
        });
        with_tree("<small>hi</small>", "", |node| {
            // 12 * 1.4 = 16.8 → 20
            assert_eq!(estimate_height(node, &CTX, PARENT), 20.0);
        });
    }

    #[test]
    fn explicit_sizes_win() {
        with_tree("<div>text</div>", "div { width: 50%; height: 3em }", |node| {
            assert_eq!(estimate_width(node, &CTX, PARENT), 400.0);
            assert_eq!(estimate_height(node, &CTX, PARENT), 48.0);
        });
    }

    #[test]
    fn containers_sum_or_max() {
        let markup = "<section><div>a</div><div>b</div></section>";
        let sheet = "div { height: 30px; width: 40px } section { gap: 10px; padding: 5px }";
        with_tree(markup, sheet, |node| {
            assert_eq!(estimate_height(node, &CTX, PARENT), 30.0 + 10.0 + 30.0 + 10.0);
            assert_eq!(estimate_width(node, &CTX, PARENT), 40.0 + 10.0);
        });
        let sheet = "div { height: 30px; width: 40px } section { display: flex; gap: 10px }";
        with_tree(markup, sheet, |node| {
            assert_eq!(estimate_height(node, &CTX, PARENT), 30.0);
            assert_eq!(estimate_width(node, &CTX, PARENT), 90.0);
        });
    }

    #[test]
    fn line_height_changes_estimate() {
        with_tree("<p>x</p>", "p { line-height: 2 }", |node| {
            assert_eq!(estimate_height(node, &CTX, PARENT), 32.0);
        });
    }
}
