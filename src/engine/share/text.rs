//! Text helpers shared by the parsers and the SVG emitter.

/// Escapes the five XML special characters.
///
/// Used for text nodes and attribute values alike, so quotes are always escaped.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trims and collapses every whitespace run into a single space.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `input` on `separator`, ignoring separators nested in parentheses
/// or inside quoted strings. Pieces are trimmed; empty pieces are kept so
/// callers can decide whether they matter.
pub fn split_top_level(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            current.push(c);
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c == separator && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}

/// Whitespace-separated tokens, keeping function calls such as
/// `rgba(0, 0, 0, 0.5)` or `cubic-bezier(.1, .7, 1, .1)` in one piece.
pub fn split_top_level_whitespace(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parses `name(args)` into `("name", "args")`. Returns `None` when `input`
/// is not a single function call.
pub fn parse_function_call(input: &str) -> Option<(String, String)> {
    let input = input.trim();
    let open = input.find('(')?;
    let inner = input.strip_suffix(')')?;
    let name = input[..open].trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_ascii_lowercase(), inner[open + 1..].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn split_ignores_nested_separators() {
        let parts = split_top_level("rgba(0, 0, 0, 0.5), #fff 50%", ',');
        assert_eq!(parts, vec!["rgba(0, 0, 0, 0.5)", "#fff 50%"]);

        let parts = split_top_level("content: \"a;b\"; color: red", ';');
        assert_eq!(parts, vec!["content: \"a;b\"", "color: red"]);
    }

    #[test]
    fn whitespace_split_keeps_functions_whole() {
        let tokens = split_top_level_whitespace("spin 2s cubic-bezier(0.1, 0.7, 1, 0.1) infinite");
        assert_eq!(
            tokens,
            vec!["spin", "2s", "cubic-bezier(0.1, 0.7, 1, 0.1)", "infinite"]
        );
    }

    #[test]
    fn function_call_parts() {
        assert_eq!(
            parse_function_call("translateX(50%)"),
            Some(("translatex".to_string(), "50%".to_string()))
        );
        assert_eq!(parse_function_call("50%"), None);
    }
}
