//! HTML関連のユーティリティ関数群

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `&amp;` → `&` のような名前付き文字参照の表
static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    entities::ENTITIES
        .iter()
        .filter(|e| e.entity.ends_with(';'))
        .map(|e| (e.entity, e.characters))
        .collect()
});

/// is_block_level_element - タグ名が典型的なブロック要素かどうか判定する
///
/// 注意:
/// - CSSでのdisplay変更には触れていません。
pub fn is_block_level_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "html" | "body" | "main" | "header" | "footer" | "section" | "nav" | "article" | "aside" |
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" |
        "p" | "pre" | "blockquote" | "address" | "hr" |
        "div" | "fieldset" | "legend" | "details" | "summary" | "figure" | "figcaption" |
        "ul" | "ol" | "li" | "dl" | "dt" | "dd" |
        "table" | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" |
        "form" | "textarea" | "canvas" | "video" | "svg"
    )
}

pub fn is_heading(tag_name: &str) -> bool {
    matches!(tag_name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Elements that never have children, with or without a trailing `/`.
pub fn is_void_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

/// Phrasing elements that may be folded into their parent's text.
pub fn is_phrasing_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "span" | "b" | "strong" | "i" | "em" | "a" | "code" | "small" | "u" | "s" | "mark"
            | "sub" | "sup" | "br" | "img"
    )
}

/// script/style の中身はマークアップとして解釈しない
pub fn is_raw_text_element(tag_name: &str) -> bool {
    matches!(tag_name, "script" | "style")
}

/// 描画対象にならない要素
pub fn is_non_rendered_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "head" | "meta" | "title" | "link" | "style" | "script"
    )
}

/// Decodes named (`&amp;`) and numeric (`&#39;`, `&#x27;`) character references.
/// Unknown references are left untouched.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_reference(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(tail: &str) -> Option<(String, usize)> {
    let semi = tail.find(';')?;
    if semi > 32 {
        return None;
    }
    let reference = &tail[..=semi];

    if let Some(number) = reference.strip_prefix("&#") {
        let number = &number[..number.len() - 1];
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(|c| (c.to_string(), semi + 1));
    }

    NAMED_ENTITIES
        .get(reference)
        .map(|decoded| (decoded.to_string(), semi + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&lt;3 &#9829; &#x2764;"), "<3 \u{2665} \u{2764}");
        assert_eq!(decode_entities("AT&T rocks"), "AT&T rocks");
        assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
    }

    #[test]
    fn classifies_tags() {
        assert!(is_void_element("br"));
        assert!(!is_void_element("div"));
        assert!(is_block_level_element("section"));
        assert!(is_phrasing_element("strong"));
        assert!(is_non_rendered_element("style"));
    }
}
