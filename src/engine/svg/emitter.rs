//! SVG 出力
//!
//! スタイル付きツリーと配置済みツリーを同時に深さ優先でたどり、要素ごとに
//! `<g>` を1つ出力する。座標変換アニメーションを持つ要素は、要素の中心へ
//! 平行移動したグループの中で原点中心に描く（SVG の変換の原点は左上のため）。

use super::animate::{animate_opacity, animate_transform};
use super::defs::{Fragment, IdScope};
use super::paint::{GradientUnits, Paint, SolidPaint, blur_def, drop_shadow_def, gradient_def};
use super::text::render_text;
use crate::engine::animation::compile::GradientTarget;
use crate::engine::animation::{AnimationDirective, Channel, compile_element};
use crate::engine::css::stylesheet::Stylesheet;
use crate::engine::css::values::BorderStyle;
use crate::engine::layouter::{Bounds, LayoutBox, LayoutContext};
use crate::engine::share::number::fmt_num;
use crate::engine::share::text::escape_xml;
use crate::engine::styler::ua::DEFAULT_TEXT_COLOR;
use crate::engine::styler::{ComputedStyle, StyledNode};

pub struct Emitter<'a> {
    stylesheet: &'a Stylesheet,
    ctx: LayoutContext,
    ids: IdScope,
}

impl<'a> Emitter<'a> {
    pub fn new(stylesheet: &'a Stylesheet, ctx: LayoutContext, ids: IdScope) -> Self {
        Self { stylesheet, ctx, ids }
    }

    /// SVG 文書全体を出力する。`boxes` は `nodes` と同じ形であること。
    pub fn emit(&self, nodes: &[StyledNode<'_>], boxes: &[LayoutBox]) -> String {
        let mut body = Fragment::default();
        for (i, (node, layout)) in nodes.iter().zip(boxes).enumerate() {
            body.append(self.emit_node(node, layout, &[i]));
        }
        log::debug!(target:"SvgEmitter", "Emitted {} bytes of markup with {} definitions", body.markup.len(), body.defs.len());
        document(self.ctx.canvas_width, self.ctx.canvas_height, &body)
    }

    fn emit_node(&self, node: &StyledNode<'_>, layout: &LayoutBox, path: &[usize]) -> Fragment {
        let style = &node.style;
        let bounds = &layout.bounds;
        let animation = compile_element(style, self.stylesheet, bounds);
        let centered = animation.has_transform();
        let offset = if centered {
            (bounds.bcenter_x, bounds.bcenter_y)
        } else {
            (0.0, 0.0)
        };

        let mut fragment = Fragment::default();

        /* ---------- 背景・影 ---------- */
        let paint = style
            .background
            .as_deref()
            .and_then(|background| Paint::parse(background, &style.color));
        let fill = match &paint {
            Some(Paint::Solid(solid)) => solid.attrs("fill"),
            Some(gradient) => {
                let id = self.ids.id("grad", path);
                let animations: Vec<&AnimationDirective> =
                    animation.by_channel(Channel::GradientTranslate).collect();
                let units = self.gradient_units(style, bounds, offset, !animations.is_empty());
                if let Some(def) = gradient_def(&id, gradient, units, &animations) {
                    fragment.push_def(def);
                }
                format!(r#" fill="url(#{})""#, id)
            }
            None => r#" fill="none""#.to_string(),
        };
        let shadow = style.box_shadow.map(|shadow| {
            let id = self.ids.id("shadow", path);
            fragment.push_def(drop_shadow_def(&id, &shadow));
            format!(r#" filter="url(#{})""#, id)
        });
        let needs_container = paint.is_some() || style.border.is_visible() || style.box_shadow.is_some();

        /* ---------- グループ属性 ---------- */
        let mut group_attrs = String::new();
        if let Some(opacity) = style.opacity {
            group_attrs.push_str(&format!(r#" opacity="{}""#, fmt_num(opacity)));
        }
        if let Some(blur) = style.blur.filter(|b| *b > 0.0) {
            let id = self.ids.id("blur", path);
            fragment.push_def(blur_def(&id, blur));
            group_attrs.push_str(&format!(r#" filter="url(#{})""#, id));
        }

        /* ---------- 要素自身 ---------- */
        let mut own = String::new();
        if needs_container {
            own.push_str(&container_rect(style, bounds, offset, &fill, shadow.as_deref()));
        }
        if let Some(arc) = spinner_arc(style, bounds, offset) {
            own.push_str(&arc);
        }
        if node.has_text() {
            own.push_str(&render_text(node, bounds, offset));
        }

        /* ---------- 子 ---------- */
        let mut children = Fragment::default();
        for (i, (child, child_layout)) in node.children.iter().zip(&layout.children).enumerate() {
            let mut child_path = path.to_vec();
            child_path.push(i);
            children.append(self.emit_node(child, child_layout, &child_path));
        }
        fragment.defs.extend(children.defs);

        let opacity_animations: String = animation
            .by_channel(Channel::Opacity)
            .map(animate_opacity)
            .collect();

        if centered {
            log::debug!(target:"SvgEmitter", "<{}> uses centered coordinates at ({}, {})", node.tag_name(), offset.0, offset.1);
            fragment.push_str(&format!(
                r#"<g{} transform="translate({} {})">"#,
                group_attrs,
                fmt_num(offset.0),
                fmt_num(offset.1)
            ));
            fragment.push_str(&opacity_animations);
            fragment.push_str("<g>");
            for directive in animation.transforms() {
                fragment.push_str(&animate_transform(directive, "transform", true));
            }
            fragment.push_str(&own);
            if !children.markup.is_empty() {
                fragment.push_str(&format!(
                    r#"<g transform="translate({} {})">"#,
                    fmt_num(-offset.0),
                    fmt_num(-offset.1)
                ));
                fragment.push_str(&children.markup);
                fragment.push_str("</g>");
            }
            fragment.push_str("</g></g>");
        } else {
            fragment.push_str(&format!("<g{}>", group_attrs));
            fragment.push_str(&opacity_animations);
            fragment.push_str(&own);
            fragment.push_str(&children.markup);
            fragment.push_str("</g>");
        }

        fragment
    }

    /// `background-size: 400%` のシマー効果はキャンバス幅の4倍に広げた
    /// ユーザー座標のグラデーションにする。それ以外で `background-position` が
    /// アニメーションする場合は、要素の幅 × `background-size` に広げる。
    fn gradient_units(
        &self,
        style: &ComputedStyle,
        bounds: &Bounds,
        offset: (f32, f32),
        animated: bool,
    ) -> GradientUnits {
        let size = style.background_size.as_deref().unwrap_or_default();
        if size.contains("400%") {
            return GradientUnits::UserSpace {
                x1: -offset.0,
                x2: self.ctx.canvas_width * 4.0 - offset.0,
                y: -offset.1,
            };
        }
        if animated {
            let percent = GradientTarget::from_style(style)
                .map(|target| target.size_percent)
                .unwrap_or(100.0);
            let x1 = bounds.bx - offset.0;
            return GradientUnits::UserSpace {
                x1,
                x2: x1 + bounds.bwidth * percent / 100.0,
                y: bounds.by - offset.1,
            };
        }
        GradientUnits::BoundingBox
    }
}

/// 背景・枠線・影を持つ要素の `<rect>`
fn container_rect(
    style: &ComputedStyle,
    bounds: &Bounds,
    offset: (f32, f32),
    fill: &str,
    filter: Option<&str>,
) -> String {
    let (mut x, mut y) = (bounds.bx - offset.0, bounds.by - offset.1);
    let (mut width, mut height) = (bounds.bwidth, bounds.bheight);
    let mut stroke = String::new();

    let border = &style.border.all;
    if border.is_visible() {
        // 枠線はボーダーボックスの内側に収める
        let half = border.width / 2.0;
        x += half;
        y += half;
        width = (width - border.width).max(0.0);
        height = (height - border.width).max(0.0);

        let paint = match border.color {
            Some(color) => SolidPaint::from_color(color),
            None => SolidPaint::from_css(&style.color, DEFAULT_TEXT_COLOR),
        };
        match paint {
            Some(paint) => stroke.push_str(&paint.attrs("stroke")),
            None => stroke.push_str(r#" stroke="none""#),
        }
        stroke.push_str(&format!(r#" stroke-width="{}""#, fmt_num(border.width)));
        match border.style {
            BorderStyle::Dashed => stroke.push_str(&format!(
                r#" stroke-dasharray="{} {}""#,
                fmt_num(border.width * 3.0),
                fmt_num(border.width * 2.0)
            )),
            BorderStyle::Dotted => stroke.push_str(&format!(
                r#" stroke-dasharray="{} {}" stroke-linecap="round""#,
                fmt_num(border.width),
                fmt_num(border.width * 2.0)
            )),
            _ => {}
        }
    }

    let mut rect = format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        fmt_num(x),
        fmt_num(y),
        fmt_num(width),
        fmt_num(height)
    );
    if let Some(radius) = style.border_radius.map(|r| r.to_px(bounds.bwidth)) {
        let radius = radius.min(width / 2.0).min(height / 2.0);
        if radius > 0.0 {
            rect.push_str(&format!(r#" rx="{0}" ry="{0}""#, fmt_num(radius)));
        }
    }
    rect.push_str(fill);
    rect.push_str(&stroke);
    if let Some(filter) = filter {
        rect.push_str(filter);
    }
    rect.push_str("/>");
    rect
}

/// 円形の要素で上辺の枠線だけ色が違う場合（ローディングスピナー）、
/// 上辺の色で -135° から -45° の円弧を重ねる
fn spinner_arc(style: &ComputedStyle, bounds: &Bounds, offset: (f32, f32)) -> Option<String> {
    let radius = style.border_radius?.to_px(bounds.bwidth);
    if bounds.bwidth <= 0.0 || radius < bounds.bwidth / 2.0 {
        return None;
    }

    let top = &style.border.top;
    let top_color = top.color?;
    if !top.is_visible() || style.border.all.color == Some(top_color) {
        return None;
    }
    let stroke = SolidPaint::from_color(top_color)?;

    let r = (bounds.bwidth.min(bounds.bheight) - top.width) / 2.0;
    if r <= 0.0 {
        return None;
    }
    let (cx, cy) = (bounds.bcenter_x - offset.0, bounds.bcenter_y - offset.1);
    let (start, end) = ((-135f32).to_radians(), (-45f32).to_radians());

    Some(format!(
        r#"<path d="M {} {} A {} {} 0 0 1 {} {}" fill="none"{} stroke-width="{}" stroke-linecap="round"/>"#,
        fmt_num(cx + r * start.cos()),
        fmt_num(cy + r * start.sin()),
        fmt_num(r),
        fmt_num(r),
        fmt_num(cx + r * end.cos()),
        fmt_num(cy + r * end.sin()),
        stroke.attrs("stroke"),
        fmt_num(top.width)
    ))
}

/// ルート要素と `<defs>` で本体を包む
pub fn document(width: f32, height: f32, body: &Fragment) -> String {
    let (width, height) = (fmt_num(width), fmt_num(height));
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
        width, height
    );
    svg.push('\n');
    if !body.defs.is_empty() {
        svg.push_str("<defs>");
        for def in &body.defs {
            svg.push_str(def);
        }
        svg.push_str("</defs>\n");
    }
    svg.push_str(&body.markup);
    svg.push_str("\n</svg>");
    svg
}

/// 描画する要素が1つもない場合の画像
pub fn placeholder_svg(width: f32, height: f32) -> String {
    let mut body = Fragment::default();
    body.push_str(&format!(
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#f3f4f6"/><text x="{}" y="{}" font-family="Arial, sans-serif" font-size="14" fill="#9ca3af" text-anchor="middle">Nothing to render</text>"##,
        fmt_num(width),
        fmt_num(height),
        fmt_num(width / 2.0),
        fmt_num(height / 2.0)
    ));
    document(width, height, &body)
}

/// エラー時に返す固定サイズの画像
pub fn fallback_svg(message: &str) -> String {
    let mut body = Fragment::default();
    body.push_str(&format!(
        r##"<rect x="0" y="0" width="400" height="100" rx="8" ry="8" fill="#fee2e2" stroke="#ef4444" stroke-width="2"/><text x="200" y="45" font-family="Arial, sans-serif" font-size="16" font-weight="bold" fill="#b91c1c" text-anchor="middle">Failed to render SVG</text><text x="200" y="70" font-family="Arial, sans-serif" font-size="12" fill="#7f1d1d" text-anchor="middle">{}</text>"##,
        escape_xml(message)
    ));
    document(400.0, 100.0, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defs_only_when_present() {
        let mut body = Fragment::default();
        body.push_str("<g></g>");
        let svg = document(100.0, 50.0, &body);
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50" viewBox="0 0 100 50">"#));
        assert!(!svg.contains("<defs>"));

        body.push_def("<filter id=\"f\"/>".into());
        body.push_def("<filter id=\"g\"/>".into());
        let svg = document(100.0, 50.0, &body);
        assert_eq!(svg.matches("<defs>").count(), 1);
        assert!(svg.find("<defs>") < svg.find("<g>"));
    }

    #[test]
    fn fallback_escapes_message() {
        let svg = fallback_svg("bad <input>");
        assert!(svg.contains("bad &lt;input&gt;"));
        assert!(svg.contains(r#"width="400""#));
    }
}
