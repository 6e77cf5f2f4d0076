//! 配置（レイアウトの2パス目）
//!
//! 親のコンテンツボックスと見積もり済みの子のサイズから、各要素の
//! [`Bounds`] を決める。通常はブロックフロー（上から下へ積む）で、
//! `display: flex` のときだけ1行／1列の簡易フレックス配置になる。
//! 折り返しや `space-between` は扱わない。

use super::estimate::{estimate_height, estimate_width, resolve_edges};
use super::types::{Bounds, LayoutBox, LayoutContext, Size};
use crate::engine::css::values::{Edges, Length};
use crate::engine::styler::{Alignment, ComputedStyle, StyledNode};

/// トップレベル要素をキャンバス上にブロックフローで配置する
pub fn layout(nodes: &[StyledNode<'_>], ctx: &LayoutContext) -> Vec<LayoutBox> {
    let canvas = Bounds::canvas(ctx.canvas_width, ctx.canvas_height);
    place_children(&ComputedStyle::default(), nodes, &canvas, ctx)
}

/// ボーダーボックスの位置とサイズが決まった要素を、子孫ごと配置する
pub fn place(
    node: &StyledNode<'_>,
    ctx: &LayoutContext,
    origin: (f32, f32),
    size: Size,
    parent: &Bounds,
) -> LayoutBox {
    let padding = resolve_edges(&node.style.padding, parent.width);
    let bounds = Bounds::new(origin.0, origin.1, size.width, size.height, &padding);
    log::debug!(target:"Layouter::Place", "<{}> at ({}, {}) {}x{}", node.tag_name(), bounds.bx, bounds.by, bounds.bwidth, bounds.bheight);

    let children = place_children(&node.style, &node.children, &bounds, ctx);
    LayoutBox { bounds, children }
}

fn place_children(
    style: &ComputedStyle,
    children: &[StyledNode<'_>],
    bounds: &Bounds,
    ctx: &LayoutContext,
) -> Vec<LayoutBox> {
    let content = bounds.content_size();
    let gap = style.gap.to_px(content.width);

    let sizes: Vec<Size> = children
        .iter()
        .map(|child| child_size(style, child, content, ctx))
        .collect();
    let margins: Vec<Edges<f32>> = children
        .iter()
        .map(|child| resolve_edges(&child.style.margin, content.width))
        .collect();
    let flow: Vec<usize> = (0..children.len())
        .filter(|&i| !children[i].style.is_absolute())
        .collect();
    let gaps = gap * flow.len().saturating_sub(1) as f32;

    let mut origins = vec![(bounds.x, bounds.y); children.len()];

    if style.is_flex_row() {
        let total: f32 = flow
            .iter()
            .map(|&i| sizes[i].width + margins[i].horizontal())
            .sum::<f32>()
            + gaps;
        let mut cursor = bounds.x + alignment_offset(style.justify_content, content.width - total);
        for &i in &flow {
            let (size, margin) = (sizes[i], &margins[i]);
            let y = match style.align_items {
                Alignment::Start => bounds.y + margin.top,
                Alignment::Center => bounds.y + (content.height - size.height) / 2.0,
                Alignment::End => bounds.y + content.height - size.height - margin.bottom,
            };
            origins[i] = (cursor + margin.left, y);
            cursor += margin.horizontal() + size.width + gap;
        }
    } else if style.is_flex_column() {
        let total: f32 = flow
            .iter()
            .map(|&i| sizes[i].height + margins[i].vertical())
            .sum::<f32>()
            + gaps;
        let mut cursor = bounds.y + alignment_offset(style.justify_content, content.height - total);
        for &i in &flow {
            let (size, margin) = (sizes[i], &margins[i]);
            let x = match style.align_items {
                Alignment::Start => bounds.x + margin.left,
                Alignment::Center => bounds.x + (content.width - size.width) / 2.0,
                Alignment::End => bounds.x + content.width - size.width - margin.right,
            };
            origins[i] = (x, cursor + margin.top);
            cursor += margin.vertical() + size.height + gap;
        }
    } else {
        let mut cursor = bounds.y;
        for &i in &flow {
            let (size, margin) = (sizes[i], &margins[i]);
            origins[i] = (bounds.x + margin.left, cursor + margin.top);
            cursor += margin.vertical() + size.height + gap;
        }
    }

    for (i, child) in children.iter().enumerate() {
        if child.style.is_absolute() {
            origins[i] = absolute_origin(&child.style, sizes[i], &margins[i], bounds);
        }
    }

    children
        .iter()
        .enumerate()
        .map(|(i, child)| place(child, ctx, origins[i], sizes[i], bounds))
        .collect()
}

/// 子のボーダーボックスのサイズ
///
/// ブロックフローの子は親の幅いっぱいに広がり、フレックスアイテムと
/// 絶対配置の要素は見積もり幅になる。
fn child_size(parent: &ComputedStyle, child: &StyledNode<'_>, content: Size, ctx: &LayoutContext) -> Size {
    let shrink_to_fit = child.style.is_absolute()
        || parent.is_flex_row()
        || (parent.is_flex_column() && parent.align_items != Alignment::Start);

    let width = match child.style.width {
        Some(width) => width.to_px(content.width).max(0.0),
        None if shrink_to_fit => estimate_width(child, ctx, content),
        None => {
            let margin = resolve_edges(&child.style.margin, content.width);
            (content.width - margin.horizontal()).max(0.0)
        }
    };
    Size::new(width, estimate_height(child, ctx, content))
}

fn alignment_offset(alignment: Alignment, free_space: f32) -> f32 {
    match alignment {
        Alignment::Start => 0.0,
        Alignment::Center => free_space / 2.0,
        Alignment::End => free_space,
    }
}

/// `position: absolute` の位置。`top`/`left` を優先し、なければ `bottom`/`right`
fn absolute_origin(style: &ComputedStyle, size: Size, margin: &Edges<f32>, parent: &Bounds) -> (f32, f32) {
    let specified = |length: Option<Length>| length.filter(|l| !l.is_auto());

    let x = match (specified(style.left), specified(style.right)) {
        (Some(left), _) => {
            resolve_offset(left, parent.x, parent.width, parent.center_x, size.width) + margin.left
        }
        (None, Some(right)) => {
            parent.x + parent.width - right.to_px(parent.width) - size.width - margin.right
        }
        (None, None) => parent.x + margin.left,
    };
    let y = match (specified(style.top), specified(style.bottom)) {
        (Some(top), _) => {
            resolve_offset(top, parent.y, parent.height, parent.center_y, size.height) + margin.top
        }
        (None, Some(bottom)) => {
            parent.y + parent.height - bottom.to_px(parent.height) - size.height - margin.bottom
        }
        (None, None) => parent.y + margin.top,
    };
    (x, y)
}

/// `50%` は親の中心から自身の半分を引いた位置（中央寄せ）
fn resolve_offset(value: Length, start: f32, extent: f32, center: f32, own: f32) -> f32 {
    match value {
        Length::Percent(p) if (p - 50.0).abs() < f32::EPSILON => center - own / 2.0,
        other => start + other.to_px(extent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::css;
    use crate::engine::html;
    use crate::engine::styler::StyleResolver;

    fn run(markup: &str, stylesheet: &str) -> Vec<LayoutBox> {
        let elements = html::parse(markup);
        let sheet = css::parse(stylesheet);
        let resolver = StyleResolver::new(&sheet);
        let nodes = StyledNode::build_all(&elements, &resolver);
        layout(&nodes, &LayoutContext::new(800.0, 400.0))
    }

    #[test]
    fn block_flow_stacks_with_gap() {
        let boxes = run(
            "<div><p>a</p><p>b</p></div>",
            "div { padding: 10px; gap: 4px } p { height: 30px }",
        );
        let outer = &boxes[0];
        assert_eq!(outer.bounds.bwidth, 800.0);
        let (first, second) = (&outer.children[0].bounds, &outer.children[1].bounds);
        assert_eq!((first.bx, first.by, first.bwidth), (10.0, 10.0, 780.0));
        assert_eq!(second.by, 10.0 + 30.0 + 4.0);
    }

    #[test]
    fn top_level_elements_stack_on_canvas() {
        let boxes = run("<div>one</div><div>two</div>", "");
        assert_eq!(boxes[0].bounds.by, 0.0);
        assert!((boxes[1].bounds.by - 22.4).abs() < 1e-4);
    }

    #[test]
    fn flex_row_advances_by_width_plus_gap() {
        let boxes = run(
            "<div class=row><div>Hi</div><div>There</div></div>",
            ".row { display: flex; flex-direction: row; gap: 10 }",
        );
        let row = &boxes[0];
        let first = row.children[0].bounds;
        let second = row.children[1].bounds;
        assert!((first.bwidth - 2.0 * 16.0 * 0.6).abs() < 1e-4);
        assert!((second.bx - (first.bwidth + 10.0)).abs() < 1e-4);
    }

    #[test]
    fn flex_centering() {
        let boxes = run(
            "<div class=c><span>x</span></div>",
            ".c { display: flex; align-items: center; justify-content: center; height: 100px; width: 200px }
             span { width: 20px; height: 10px }",
        );
        let child = boxes[0].children[0].bounds;
        assert_eq!((child.bx, child.by), (90.0, 45.0));
    }

    #[test]
    fn flex_column_align_end() {
        let boxes = run(
            "<div class=c><p>x</p></div>",
            ".c { display: flex; flex-direction: column; align-items: flex-end; justify-content: flex-end; height: 100px; width: 200px }
             p { width: 20px; height: 10px }",
        );
        let child = boxes[0].children[0].bounds;
        assert_eq!((child.bx, child.by), (180.0, 90.0));
    }

    #[test]
    fn absolute_children_leave_the_flow() {
        let boxes = run(
            "<div class=p><i class=badge></i><p>flow</p></div>",
            ".p { width: 200px; height: 100px }
             .badge { position: absolute; top: 50%; left: 50%; width: 20px; height: 10px }
             p { height: 30px }",
        );
        let parent = &boxes[0];
        assert_eq!((parent.children[0].bounds.bx, parent.children[0].bounds.by), (90.0, 45.0));
        assert_eq!(parent.children[1].bounds.by, 0.0);
    }

    #[test]
    fn absolute_right_bottom() {
        let boxes = run(
            "<div class=p><i class=badge></i></div>",
            ".p { width: 200px; height: 100px }
             .badge { position: absolute; right: 10px; bottom: 5px; width: 20px; height: 10px }",
        );
        let badge = boxes[0].children[0].bounds;
        assert_eq!((badge.bx, badge.by), (170.0, 85.0));
    }

    #[test]
    fn margins_offset_block_children() {
        let boxes = run(
            "<div><p>a</p><p>b</p></div>",
            "p { margin: 5px 20px; height: 10px }",
        );
        let first = boxes[0].children[0].bounds;
        let second = boxes[0].children[1].bounds;
        assert_eq!((first.bx, first.by, first.bwidth), (20.0, 5.0, 760.0));
        assert_eq!(second.by, 5.0 + 10.0 + 5.0 + 5.0);
    }

    #[test]
    fn padding_larger_than_box_clamps_content() {
        let boxes = run("<div></div>", "div { width: 10px; height: 10px; padding: 20px }");
        let bounds = boxes[0].bounds;
        assert_eq!((bounds.width, bounds.height), (0.0, 0.0));
    }
}
