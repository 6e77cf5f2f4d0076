//! スタイル付きツリー
//!
//! パース済みの [`Element`] を借用し、各ノードに解決済みスタイルを付ける。
//! 描画されない要素（`<style>` 等）と `display: none` はここで取り除く。

use super::cascade::{ResolvedStyle, StyleResolver};
use super::computed::{ComputedStyle, Display};
use crate::engine::html::{Element, util as html_util};

#[derive(Debug, Clone)]
pub struct StyledNode<'a> {
    pub element: &'a Element,
    pub resolved: ResolvedStyle,
    pub style: ComputedStyle,
    pub children: Vec<StyledNode<'a>>,
}

impl<'a> StyledNode<'a> {
    /// 要素とその子孫にスタイルを付ける。描画対象外なら `None`
    pub fn build(
        element: &'a Element,
        resolver: &StyleResolver<'_>,
        parent: Option<&ResolvedStyle>,
    ) -> Option<Self> {
        if html_util::is_non_rendered_element(&element.tag_name) {
            log::debug!(target:"Styler::Tree", "Skipping non-rendered <{}>", element.tag_name);
            return None;
        }

        let resolved = resolver.resolve(element, parent);
        let style = ComputedStyle::compute(&resolved);
        if style.display == Display::None {
            log::debug!(target:"Styler::Tree", "Skipping <{}> with display:none", element.tag_name);
            return None;
        }

        let children = element
            .children
            .iter()
            .filter_map(|child| StyledNode::build(child, resolver, Some(&resolved)))
            .collect();

        Some(Self {
            element,
            resolved,
            style,
            children,
        })
    }

    /// トップレベル要素列をまとめて処理する
    pub fn build_all(elements: &'a [Element], resolver: &StyleResolver<'_>) -> Vec<Self> {
        elements
            .iter()
            .filter_map(|element| StyledNode::build(element, resolver, None))
            .collect()
    }

    pub fn tag_name(&self) -> &str {
        &self.element.tag_name
    }

    pub fn text(&self) -> &str {
        &self.element.content
    }

    pub fn has_text(&self) -> bool {
        !self.element.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::css;
    use crate::engine::html;

    #[test]
    fn skips_hidden_and_non_rendered() {
        let elements = html::parse(
            "<style>.x{}</style><div><p class=hide>a</p><p>b</p></div><script>1</script>",
        );
        let sheet = css::parse(".hide { display: none } p { color: red }");
        let resolver = StyleResolver::new(&sheet);
        let nodes = StyledNode::build_all(&elements, &resolver);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children.len(), 1);
        assert_eq!(nodes[0].children[0].text(), "b");
        assert_eq!(nodes[0].children[0].style.color, "red");
    }
}
