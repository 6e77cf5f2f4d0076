//! カスケード: 要素に適用される宣言を1つのマップにまとめる
//!
//! 優先度（低 → 高）:
//! 1. UA デフォルト（見出しのフォントサイズ等）
//! 2. 親から継承されるプロパティ（[`INHERITED_PROPERTIES`] のみ）
//! 3. タグセレクタ
//! 4. `#id` セレクタ
//! 5. `.class` セレクタ（class 属性に並んだ順）
//! 6. インライン `style` 属性
//!
//! 詳細度の計算は行わない。後の段が常に勝つ。

use std::collections::btree_map;

use super::ua;
use crate::engine::css::parser::parse_declarations;
use crate::engine::css::stylesheet::{DeclarationMap, Stylesheet};
use crate::engine::html::Element;

/// 親から子へ継承されるプロパティ
pub const INHERITED_PROPERTIES: [&str; 5] =
    ["color", "font-family", "font-size", "text-align", "line-height"];

/// 1要素分の解決済み宣言
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    declarations: DeclarationMap,
}

impl ResolvedStyle {
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.declarations.contains_key(property)
    }

    /// プロパティ名の昇順
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// 後の段の宣言で上書きする。ショートハンドは、前の段で書かれた
    /// ロングハンドを取り消す（`padding` は `padding-left` 等を初期化する）。
    ///
    /// 同じ段の中ではプロパティ名の昇順に処理するので、同じブロックの
    /// ロングハンドはショートハンドの後に残る。
    fn apply(&mut self, declarations: &DeclarationMap) {
        for (property, value) in declarations {
            for longhand in reset_longhands(property) {
                self.declarations.remove(*longhand);
            }
            self.declarations.insert(property.clone(), value.clone());
        }
    }

    /// 子に引き継ぐ部分だけを取り出す
    fn inherited(&self) -> DeclarationMap {
        INHERITED_PROPERTIES
            .iter()
            .filter_map(|&p| self.declarations.get(p).map(|v| (p.to_string(), v.clone())))
            .collect()
    }
}

/// ショートハンドが初期化するロングハンド
fn reset_longhands(property: &str) -> &'static [&'static str] {
    match property {
        "background" => &[
            "background-color",
            "background-image",
            "background-position",
            "background-size",
        ],
        "padding" => &["padding-top", "padding-right", "padding-bottom", "padding-left"],
        "margin" => &["margin-top", "margin-right", "margin-bottom", "margin-left"],
        "border" => &[
            "border-width",
            "border-style",
            "border-color",
            "border-top",
            "border-top-width",
            "border-top-style",
            "border-top-color",
        ],
        "border-top" => &["border-top-width", "border-top-style", "border-top-color"],
        "border-width" => &["border-top-width"],
        "border-style" => &["border-top-style"],
        "border-color" => &["border-top-color"],
        "animation" => &[
            "animation-name",
            "animation-duration",
            "animation-delay",
            "animation-iteration-count",
            "animation-direction",
            "animation-fill-mode",
            "animation-timing-function",
        ],
        _ => &[],
    }
}

impl FromIterator<(String, String)> for ResolvedStyle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            declarations: iter.into_iter().collect(),
        }
    }
}

/// スタイルシートを参照して [`ResolvedStyle`] を作る
///
/// 状態を持たないので、同じ入力に対しては常に同じ結果を返す。
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    stylesheet: &'a Stylesheet,
}

impl<'a> StyleResolver<'a> {
    pub fn new(stylesheet: &'a Stylesheet) -> Self {
        Self { stylesheet }
    }

    pub fn stylesheet(&self) -> &'a Stylesheet {
        self.stylesheet
    }

    pub fn resolve(&self, element: &Element, parent: Option<&ResolvedStyle>) -> ResolvedStyle {
        let mut resolved = ResolvedStyle::default();

        resolved.apply(&ua::default_declarations(&element.tag_name));

        if let Some(parent) = parent {
            resolved.apply(&parent.inherited());
        }

        if let Some(rule) = self.stylesheet.rule(&element.tag_name) {
            resolved.apply(rule);
        }

        if let Some(id) = element.id()
            && let Some(rule) = self.stylesheet.rule(&format!("#{}", id))
        {
            resolved.apply(rule);
        }

        for class in element.classes() {
            if let Some(rule) = self.stylesheet.rule(&format!(".{}", class)) {
                resolved.apply(rule);
            }
        }

        if let Some(inline) = element.attr("style") {
            resolved.apply(&parse_declarations(inline));
        }

        log::debug!(target:"Styler::Cascade", "<{}> resolved {} declarations", element.tag_name, resolved.len());
        resolved
    }
}
