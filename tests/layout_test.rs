use svgsmith::engine::css;
use svgsmith::engine::html;
use svgsmith::engine::layouter::{LayoutBox, LayoutContext, estimate_width, layout};
use svgsmith::engine::styler::{StyleResolver, StyledNode};

fn run(markup: &str, stylesheet: &str, check: impl FnOnce(&[StyledNode<'_>], &[LayoutBox], &LayoutContext)) {
    let elements = html::parse(markup);
    let sheet = css::parse(stylesheet);
    let resolver = StyleResolver::new(&sheet);
    let nodes = StyledNode::build_all(&elements, &resolver);
    let ctx = LayoutContext::new(800.0, 400.0);
    let boxes = layout(&nodes, &ctx);
    check(&nodes, &boxes, &ctx);
}

#[test]
fn flex_row_gap_offsets_second_child() {
    run(
        "<div class=row><div>First item</div><div>Second</div></div>",
        ".row { display: flex; flex-direction: row; gap: 10 }",
        |nodes, boxes, ctx| {
            let row = &boxes[0];
            let first = &row.children[0].bounds;
            let second = &row.children[1].bounds;
            let estimated = estimate_width(&nodes[0].children[0], ctx, row.bounds.content_size());

            assert_eq!(first.bx, 0.0);
            assert!((second.bx - (first.bx + estimated + 10.0)).abs() < 1e-3);
            assert!((first.bwidth - estimated).abs() < 1e-3);
        },
    );
}

#[test]
fn content_box_never_negative() {
    run(
        "<div>x</div>",
        "div { width: 10px; height: 10px; padding: 40px }",
        |_, boxes, _| {
            let bounds = &boxes[0].bounds;
            assert_eq!(bounds.bwidth, 10.0);
            assert_eq!(bounds.width, 0.0);
            assert_eq!(bounds.height, 0.0);
        },
    );
}

#[test]
fn block_flow_stacks_with_margins() {
    run(
        "<div class=a></div><div class=b></div>",
        ".a { height: 30px; margin-bottom: 5px } .b { height: 20px; margin: 10px 0 0 15px }",
        |_, boxes, _| {
            assert_eq!(boxes[0].bounds.by, 0.0);
            assert_eq!(boxes[1].bounds.by, 45.0);
            assert_eq!(boxes[1].bounds.bx, 15.0);
            assert_eq!(boxes[1].bounds.bwidth, 785.0);
        },
    );
}

#[test]
fn absolute_children_leave_the_flow() {
    run(
        "<div class=wrap><div class=badge>NEW</div><p>body</p></div>",
        ".wrap { height: 100px } .badge { position: absolute; top: 5px; right: 5px; width: 40px; height: 20px }",
        |_, boxes, _| {
            let wrap = &boxes[0];
            let badge = &wrap.children[0].bounds;
            let body = &wrap.children[1].bounds;
            assert_eq!((badge.bx, badge.by), (755.0, 5.0));
            assert_eq!(body.by, 0.0);
        },
    );
}
