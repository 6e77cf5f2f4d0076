//! パース済みのマークアップ要素
//!
//! # 概要
//! `Element` はタグ名・属性・テキスト・子要素を持つ木構造です。
//! 子要素は親が所有し、パース後は変更されません。

use super::tokenizer::Attribute;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// 小文字のタグ名
    pub tag_name: String,
    /// 属性（名前は一意）
    pub attributes: Vec<Attribute>,
    /// 子要素を持たない場合のみ入るテキスト（空白は畳み込み済み）
    pub content: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// `class` 属性を空白で分割したもの（記述順）
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// 子孫を含めた木の深さ（葉は 1）
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Element::depth).max().unwrap_or(0)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_element(self, f, &[])
    }
}

/// 再帰的にツリーを表示するヘルパー関数
fn fmt_element(element: &Element, f: &mut Formatter<'_>, ancestors_last: &[bool]) -> fmt::Result {
    let is_last = *ancestors_last.last().unwrap_or(&true);
    let connector = if ancestors_last.is_empty() {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut prefix = String::new();
    for &ancestor_last in &ancestors_last[..ancestors_last.len().saturating_sub(1)] {
        prefix.push_str(if ancestor_last { "    " } else { "│   " });
    }

    write!(f, "{}{}<{}", prefix, connector, element.tag_name)?;
    for attr in &element.attributes {
        write!(f, " {}=\"{}\"", attr.name, attr.value)?;
    }
    write!(f, ">")?;
    if !element.content.is_empty() {
        write!(f, " {:?}", element.content)?;
    }
    writeln!(f)?;

    let child_count = element.children.len();
    for (i, child) in element.children.iter().enumerate() {
        let mut new_ancestors = ancestors_last.to_vec();
        new_ancestors.push(i == child_count - 1);
        fmt_element(child, f, &new_ancestors)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_draws_tree() {
        let tree = Element::new("div")
            .with_attr("class", "card")
            .with_child(Element::new("h1").with_content("Title"))
            .with_child(Element::new("p").with_content("Body"));

        let rendered = tree.to_string();
        assert_eq!(
            rendered,
            "<div class=\"card\">\n├── <h1> \"Title\"\n└── <p> \"Body\"\n"
        );
    }

    #[test]
    fn classes_in_listed_order() {
        let el = Element::new("div").with_attr("class", "  b   a c ");
        assert_eq!(el.classes().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(el.depth(), 1);
    }
}
