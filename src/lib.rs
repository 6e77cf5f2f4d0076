//! svgsmith: HTML/CSS フラグメントを単体で完結した SVG に変換する
//!
//! ```text
//! HTML ─ html::parse ─┐
//!                     ├─ styler ─ layouter ─ animation ─ svg ─> String
//! CSS ── css::parse ──┘
//! ```
//!
//! 外部リソースは読み込まない。フォントも測定しないため、文字幅は
//! フォントサイズからの推定値を使う。

pub mod engine;

use engine::css;
use engine::html::{Element, Parser as HtmlParser};
use engine::layouter::{LayoutContext, layout};
use engine::styler::{StyleResolver, StyledNode};
use engine::svg::{Emitter, IdScope, placeholder_svg};

pub use engine::error::CompileError;
pub use engine::options::CompileOptions;
pub use engine::svg::fallback_svg;

/// `width` × `height` のキャンバスに描画する
pub fn compile(html: &str, css: &str, width: f32, height: f32) -> Result<String, CompileError> {
    compile_with_options(html, css, &CompileOptions::new(width, height))
}

pub fn compile_with_options(html: &str, css: &str, options: &CompileOptions) -> Result<String, CompileError> {
    validate(html, css, options)?;

    let elements = HtmlParser::new(html).with_max_depth(options.max_depth).parse();
    log::debug!(target:"Compiler", "Parsed {} top-level elements", elements.len());

    let mut stylesheet = css::parse(css);
    for text in collect_style_blocks(&elements) {
        stylesheet.merge(css::parse(&text));
    }

    let resolver = StyleResolver::new(&stylesheet);
    let nodes = StyledNode::build_all(&elements, &resolver);
    if nodes.is_empty() {
        log::debug!(target:"Compiler", "Nothing to render, emitting placeholder");
        return Ok(placeholder_svg(options.width, options.height));
    }

    let ctx = LayoutContext::new(options.width, options.height);
    let boxes = layout(&nodes, &ctx);
    let emitter = Emitter::new(&stylesheet, ctx, IdScope::new(options.id_prefix.as_deref()));
    Ok(emitter.emit(&nodes, &boxes))
}

/// 失敗した場合はエラー内容を描いた SVG を返す
pub fn compile_or_fallback(html: &str, css: &str, width: f32, height: f32) -> String {
    compile(html, css, width, height).unwrap_or_else(|err| {
        log::warn!(target:"Compiler", "Compilation failed: {}", err);
        fallback_svg(&err.to_string())
    })
}

fn validate(html: &str, css: &str, options: &CompileOptions) -> Result<(), CompileError> {
    let (width, height) = (options.width, options.height);
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(CompileError::InvalidCanvas { width, height });
    }
    for (what, input) in [("HTML", html), ("CSS", css)] {
        if input.len() > options.max_input_bytes {
            return Err(CompileError::InputTooLarge {
                what,
                len: input.len(),
                limit: options.max_input_bytes,
            });
        }
    }
    Ok(())
}

/// マークアップ中の `<style>` の中身を文書順に集める
fn collect_style_blocks(elements: &[Element]) -> Vec<String> {
    fn walk(element: &Element, out: &mut Vec<String>) {
        if element.tag_name == "style" {
            if !element.content.is_empty() {
                out.push(element.content.clone());
            }
            return;
        }
        for child in &element.children {
            walk(child, out);
        }
    }

    let mut out = Vec::new();
    for element in elements {
        walk(element, &mut out);
    }
    out
}
