//! CSS Parser
//!
//! Scans a stylesheet once, left to right, tracking brace depth, comments and
//! quoted strings. Each complete top-level block is handed to a block
//! processor which either builds an `@keyframes` set or registers one
//! declaration map under every selector of a comma-separated list.
//!
//! ## Failure semantics
//! - Nothing here is fatal. Malformed declarations, stray braces, unknown
//!   at-rules and unterminated blocks are dropped and logged at debug level.
//! - No property-specific validation is performed; values stay raw strings
//!   and are interpreted by the styler and layouter.

use super::stylesheet::{DeclarationMap, Keyframe, Stylesheet};
use crate::engine::share::text::{collapse_whitespace, split_top_level};

/// CSS parser producing a [`Stylesheet`].
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a new CSS parser.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the entire stylesheet.
    pub fn parse(&self) -> Stylesheet {
        let mut sheet = Stylesheet::default();
        let mut block = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut chars = self.input.chars().peekable();

        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                block.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        block.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
                continue;
            }

            match c {
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    let mut prev = '\0';
                    for inner in chars.by_ref() {
                        if prev == '*' && inner == '/' {
                            break;
                        }
                        prev = inner;
                    }
                    block.push(' ');
                }
                '"' | '\'' => {
                    quote = Some(c);
                    block.push(c);
                }
                '{' => {
                    depth += 1;
                    block.push(c);
                }
                '}' => {
                    if depth == 0 {
                        log::debug!(target:"CssParser::Block", "Stray '}}' dropped with `{}`", block.trim());
                        block.clear();
                        continue;
                    }
                    depth -= 1;
                    block.push(c);
                    if depth == 0 {
                        self.process_block(&block, &mut sheet);
                        block.clear();
                    }
                }
                ';' if depth == 0 => {
                    // `@import url(...);` のようなブロックを持たない文
                    log::debug!(target:"CssParser::Block", "Skipping statement `{}`", block.trim());
                    block.clear();
                }
                _ => block.push(c),
            }
        }

        if !block.trim().is_empty() {
            log::debug!(target:"CssParser::Block", "Unterminated block dropped: `{}`", block.trim());
        }

        sheet
    }

    /// Handles one complete `head { body }` block.
    fn process_block(&self, text: &str, sheet: &mut Stylesheet) {
        let Some(open) = text.find('{') else {
            return;
        };
        let head = text[..open].trim();
        let body = &text[open + 1..text.len() - 1];

        if let Some(name) = keyframes_name(head) {
            let frames = parse_keyframes(body);
            log::debug!(target:"CssParser::Keyframes", "@keyframes {} with {} frames", name, frames.len());
            sheet.keyframe_sets.insert(name, frames);
            return;
        }

        if head.starts_with('@') {
            log::debug!(target:"CssParser::AtRule", "Unsupported at-rule skipped: {}", head);
            return;
        }

        let declarations = parse_declarations(body);
        for selector in head.split(',') {
            let selector = collapse_whitespace(selector);
            if selector.is_empty() {
                continue;
            }
            sheet.add_rule(&selector, &declarations);
        }
    }
}

/// Parses `prop: value; prop: value` into a map.
///
/// Shared by rule bodies, keyframe blocks and inline `style` attributes.
/// Declarations without a colon, with an empty property or an empty value
/// are dropped. A trailing `!important` is removed and otherwise ignored.
pub fn parse_declarations(block: &str) -> DeclarationMap {
    let mut map = DeclarationMap::new();

    for declaration in split_top_level(block, ';') {
        if declaration.is_empty() {
            continue;
        }
        let Some((property, value)) = declaration.split_once(':') else {
            log::debug!(target:"CssParser::Declaration", "Missing ':' in `{}`", declaration);
            continue;
        };

        let property = property.trim();
        let property = if property.starts_with("--") {
            property.to_string()
        } else {
            property.to_ascii_lowercase()
        };
        let value = strip_important(value.trim());

        if property.is_empty() || value.is_empty() || !is_property_name(&property) {
            log::debug!(target:"CssParser::Declaration", "Dropping malformed declaration `{}`", declaration);
            continue;
        }

        map.insert(property, value.to_string());
    }

    map
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) if lower[idx..].trim_end() == "!important" => value[..idx].trim_end(),
        _ => value,
    }
}

fn is_property_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `@keyframes spin` → `Some("spin")`
fn keyframes_name(head: &str) -> Option<String> {
    let lower = head.to_ascii_lowercase();
    let rest = ["@keyframes", "@-webkit-keyframes", "@-moz-keyframes"]
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix).map(|_| &head[prefix.len()..]))?;

    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim().trim_matches(|c| c == '"' || c == '\'');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Parses the body of an `@keyframes` rule. The result is sorted ascending by
/// offset; frames sharing an offset keep their source order.
fn parse_keyframes(body: &str) -> Vec<Keyframe> {
    let mut frames = Vec::new();
    let mut rest = body;

    while let Some(open) = rest.find('{') {
        let selector = rest[..open].trim();
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            log::debug!(target:"CssParser::Keyframes", "Unterminated keyframe `{}`", selector);
            break;
        };

        let properties = parse_declarations(&after[..close]);
        for offset in selector.split(',') {
            match parse_offset(offset) {
                Some(offset_percent) => frames.push(Keyframe {
                    offset_percent,
                    properties: properties.clone(),
                }),
                None => {
                    log::debug!(target:"CssParser::Keyframes", "Invalid keyframe offset `{}`", offset.trim())
                }
            }
        }

        rest = &after[close + 1..];
    }

    frames.sort_by(|a, b| a.offset_percent.total_cmp(&b.offset_percent));
    frames
}

fn parse_offset(offset: &str) -> Option<f32> {
    let offset = offset.trim().to_ascii_lowercase();
    match offset.as_str() {
        "from" => Some(0.0),
        "to" => Some(100.0),
        _ => {
            let value = offset.strip_suffix('%')?.trim().parse::<f32>().ok()?;
            (0.0..=100.0).contains(&value).then_some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_rule() {
        let sheet = Parser::new("body { color: red; }").parse();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules["body"]["color"], "red");
    }

    #[test]
    fn comments_and_strings_do_not_confuse_depth() {
        let css = r#"/* a { b } */ p { content: "}"; color: blue } /* trailing"#;
        let sheet = Parser::new(css).parse();
        assert_eq!(sheet.rules["p"]["content"], "\"}\"");
        assert_eq!(sheet.rules["p"]["color"], "blue");
    }

    #[test]
    fn last_declaration_wins() {
        let sheet = Parser::new("a { color: red; color: green } a { color: blue; margin: 0 }").parse();
        assert_eq!(sheet.rules["a"]["color"], "blue");
        assert_eq!(sheet.rules["a"]["margin"], "0");
    }

    #[test]
    fn important_is_stripped() {
        let map = parse_declarations("color: red !important; width: 10px");
        assert_eq!(map["color"], "red");
        assert_eq!(map["width"], "10px");
    }

    #[test]
    fn value_with_colon_keeps_rest() {
        let map = parse_declarations("background: url(http://x/y.png)");
        assert_eq!(map["background"], "url(http://x/y.png)");
    }

    #[test]
    fn unsupported_at_rules_are_skipped() {
        let css = "@import url(a.css); @media (max-width: 10px) { p { color: red } } div { color: blue }";
        let sheet = Parser::new(css).parse();
        assert!(sheet.rule("p").is_none());
        assert_eq!(sheet.rules["div"]["color"], "blue");
    }

    #[test]
    fn keyframe_offset_lists() {
        let css = "@keyframes pulse { 0%, 100% { opacity: 1 } 50% { opacity: .4 } }";
        let sheet = Parser::new(css).parse();
        let frames = sheet.keyframes("pulse").unwrap_or_default();
        let offsets: Vec<f32> = frames.iter().map(|f| f.offset_percent).collect();
        assert_eq!(offsets, vec![0.0, 50.0, 100.0]);
    }
}
