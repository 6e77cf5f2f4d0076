use super::util::decode_entities;

/// Represents a single HTML attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// HTML tokens emitted by the tokenizer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Comment(String),
    Doctype(String),
    Text(String),
}

/// Represents the internal state of the tokenizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenizerState {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    SelfClosingStartTag,
}

/// HTML fragment tokenizer.
///
/// Comments, doctypes and processing instructions are consumed by slicing
/// ahead to their terminator instead of walking dedicated states. The body of
/// `<script>` / `<style>` is returned verbatim as one `Text` token.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    state: TokenizerState,
    token: Option<Token>,
    current_token: Option<Token>,
    current_attribute: Option<Attribute>,
    text: String,
    raw_text_tag: Option<String>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: TokenizerState::Data,
            token: None,
            current_token: None,
            current_attribute: None,
            text: String::new(),
            raw_text_tag: None,
        }
    }

    /// Returns the next character from input and advances the position
    fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Steps back so that `c` is read again by the next state.
    fn reconsume(&mut self, c: char) {
        self.pos -= c.len_utf8();
    }

    /// Emits pending text, decoding character references.
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let raw = std::mem::take(&mut self.text);
            self.token = Some(Token::Text(decode_entities(&raw)));
        }
    }

    /// Emits the tag under construction and returns to the data state.
    fn commit_tag(&mut self) {
        self.push_current_attribute();
        if let Some(Token::StartTag {
            name, self_closing, ..
        }) = &self.current_token
            && !*self_closing
            && (name == "script" || name == "style")
        {
            self.raw_text_tag = Some(name.clone());
        }
        self.token = self.current_token.take();
        self.state = TokenizerState::Data;
    }

    /// Pushes the current attribute to the start tag if exists.
    /// The first occurrence of a name wins.
    fn push_current_attribute(&mut self) {
        if let (Some(mut attr), Some(Token::StartTag { attributes, .. })) =
            (self.current_attribute.take(), &mut self.current_token)
        {
            if attributes.iter().any(|a| a.name == attr.name) {
                log::debug!(target:"HtmlTokenizer::Attribute", "Duplicate attribute dropped: {}", attr.name);
                return;
            }
            attr.value = decode_entities(&attr.value);
            attributes.push(attr);
        }
    }

    fn start_attribute(&mut self, c: char) {
        self.push_current_attribute();
        self.current_attribute = Some(Attribute::new(c.to_ascii_lowercase().to_string(), ""));
        self.state = TokenizerState::AttributeName;
    }

    /// Debug log for emitted tokens
    fn debug_emit(&self, token: &Token) {
        match token {
            Token::StartTag { name, .. } => {
                log::debug!(target:"HtmlTokenizer::EmitToken::TagStart", "Emitting token: {name}, Pos: {}", self.pos)
            }
            Token::EndTag { name } => {
                log::debug!(target:"HtmlTokenizer::EmitToken::TagEnd", "Emitting token: {name}, Pos: {}", self.pos)
            }
            Token::Text(text) => {
                log::debug!(target:"HtmlTokenizer::EmitToken::Text", "Emitting token: `{text}`, Pos: {}", self.pos)
            }
            _ => {}
        }
    }

    /// Returns the next token if available
    pub fn next_token(&mut self) -> Option<Token> {
        if let Some(tag) = self.raw_text_tag.take()
            && let Some(token) = self.consume_raw_text(&tag)
        {
            self.debug_emit(&token);
            return Some(token);
        }

        while let Some(c) = self.next_char() {
            match self.state {
                TokenizerState::Data => self.state_data(c),
                TokenizerState::TagOpen => self.state_tag_open(c),
                TokenizerState::EndTagOpen => self.state_end_tag_open(c),
                TokenizerState::TagName => self.state_tag_name(c),
                TokenizerState::BeforeAttributeName => self.state_before_attribute_name(c),
                TokenizerState::AttributeName => self.state_attribute_name(c),
                TokenizerState::AfterAttributeName => self.state_after_attribute_name(c),
                TokenizerState::BeforeAttributeValue => self.state_before_attribute_value(c),
                TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted => {
                    self.state_attribute_value_quoted(c)
                }
                TokenizerState::AttributeValueUnquoted => self.state_attribute_value_unquoted(c),
                TokenizerState::SelfClosingStartTag => self.state_self_closing_start_tag(c),
            }

            if let Some(token) = self.token.take() {
                self.debug_emit(&token);
                return Some(token);
            }
        }

        // End of input: an unfinished tag is dropped, pending text is kept.
        match self.state {
            TokenizerState::Data => {}
            TokenizerState::TagOpen => self.text.push('<'),
            state => {
                log::debug!(target:"HtmlTokenizer::Eof", "Dropping unterminated tag in state {:?}", state);
                self.current_token = None;
                self.current_attribute = None;
                self.state = TokenizerState::Data;
            }
        }
        self.flush_text();
        self.token.take()
    }

    // --- State handlers ---
    fn state_data(&mut self, c: char) {
        match c {
            '<' => self.state = TokenizerState::TagOpen,
            _ => self.text.push(c),
        }
    }

    fn state_tag_open(&mut self, c: char) {
        match c {
            '/' => self.state = TokenizerState::EndTagOpen,
            '!' => {
                self.flush_text();
                self.state = TokenizerState::Data;
                if self.input[self.pos..].starts_with("--") {
                    self.pos += 2;
                    let comment = self.skip_past("-->");
                    if self.token.is_none() {
                        self.token = Some(Token::Comment(comment));
                    }
                } else {
                    let body = self.skip_past(">");
                    if body.to_ascii_lowercase().starts_with("doctype") && self.token.is_none() {
                        self.token = Some(Token::Doctype(body[7..].trim().to_string()));
                    }
                }
            }
            '?' => {
                self.flush_text();
                self.skip_past(">");
                self.state = TokenizerState::Data;
            }
            c if c.is_ascii_alphabetic() => {
                self.flush_text();
                self.current_token = Some(Token::StartTag {
                    name: c.to_ascii_lowercase().to_string(),
                    attributes: Vec::new(),
                    self_closing: false,
                });
                self.state = TokenizerState::TagName;
            }
            _ => {
                // `a < b` のような裸の `<` はテキストとして扱う
                self.text.push('<');
                self.state = TokenizerState::Data;
                self.reconsume(c);
            }
        }
    }

    fn state_end_tag_open(&mut self, c: char) {
        match c {
            c if c.is_ascii_alphabetic() => {
                self.flush_text();
                self.current_token = Some(Token::EndTag {
                    name: c.to_ascii_lowercase().to_string(),
                });
                self.state = TokenizerState::TagName;
            }
            '>' => self.state = TokenizerState::Data,
            _ => {
                self.flush_text();
                self.skip_past(">");
                self.state = TokenizerState::Data;
            }
        }
    }

    fn state_tag_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => self.state = TokenizerState::BeforeAttributeName,
            '/' => self.state = TokenizerState::SelfClosingStartTag,
            '>' => self.commit_tag(),
            _ => match &mut self.current_token {
                Some(Token::StartTag { name, .. }) | Some(Token::EndTag { name }) => {
                    name.push(c.to_ascii_lowercase())
                }
                _ => {}
            },
        }
    }

    fn state_before_attribute_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {}
            '/' => self.state = TokenizerState::SelfClosingStartTag,
            '>' => self.commit_tag(),
            '=' | '"' | '\'' | '<' => {}
            _ => self.start_attribute(c),
        }
    }

    fn state_attribute_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => self.state = TokenizerState::AfterAttributeName,
            '=' => self.state = TokenizerState::BeforeAttributeValue,
            '/' => {
                self.push_current_attribute();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            '>' => self.commit_tag(),
            _ => {
                if let Some(attr) = &mut self.current_attribute {
                    attr.name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    fn state_after_attribute_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {}
            '=' if self.current_attribute.is_some() => {
                self.state = TokenizerState::BeforeAttributeValue
            }
            '/' => {
                self.push_current_attribute();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            '>' => self.commit_tag(),
            '=' | '"' | '\'' | '<' => {}
            _ => self.start_attribute(c),
        }
    }

    fn state_before_attribute_value(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {}
            '"' => self.state = TokenizerState::AttributeValueDoubleQuoted,
            '\'' => self.state = TokenizerState::AttributeValueSingleQuoted,
            '>' => self.commit_tag(),
            _ => {
                self.state = TokenizerState::AttributeValueUnquoted;
                if let Some(attr) = &mut self.current_attribute {
                    attr.value.push(c);
                }
            }
        }
    }

    fn state_attribute_value_quoted(&mut self, c: char) {
        match (self.state, c) {
            (TokenizerState::AttributeValueDoubleQuoted, '"')
            | (TokenizerState::AttributeValueSingleQuoted, '\'') => {
                self.push_current_attribute();
                self.state = TokenizerState::AfterAttributeName;
            }
            _ => {
                if let Some(attr) = &mut self.current_attribute {
                    attr.value.push(c);
                }
            }
        }
    }

    fn state_attribute_value_unquoted(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {
                self.push_current_attribute();
                self.state = TokenizerState::BeforeAttributeName;
            }
            '>' => self.commit_tag(),
            _ => {
                if let Some(attr) = &mut self.current_attribute {
                    attr.value.push(c);
                }
            }
        }
    }

    fn state_self_closing_start_tag(&mut self, c: char) {
        match c {
            '>' => {
                if let Some(Token::StartTag { self_closing, .. }) = &mut self.current_token {
                    *self_closing = true;
                }
                self.commit_tag();
            }
            c if c.is_whitespace() => {}
            _ => {
                self.state = TokenizerState::BeforeAttributeName;
                self.reconsume(c);
            }
        }
    }

    /// Consumes input up to and including `terminator`, returning what came
    /// before it. Without a terminator the rest of the input is swallowed.
    fn skip_past(&mut self, terminator: &str) -> String {
        let rest = &self.input[self.pos..];
        match rest.find(terminator) {
            Some(idx) => {
                self.pos += idx + terminator.len();
                rest[..idx].to_string()
            }
            None => {
                self.pos = self.input.len();
                rest.to_string()
            }
        }
    }

    /// Reads the body of a raw text element up to its end tag.
    fn consume_raw_text(&mut self, tag: &str) -> Option<Token> {
        let rest = &self.input[self.pos..];
        let end = rest
            .to_ascii_lowercase()
            .find(&format!("</{tag}"))
            .unwrap_or(rest.len());
        let raw = rest[..end].to_string();
        self.pos += end;
        if raw.is_empty() {
            None
        } else {
            Some(Token::Text(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn start(name: &str, attributes: Vec<Attribute>, self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes,
            self_closing,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_text_node() {
        let tokens = collect_tokens("Hello, world!");
        assert_eq!(tokens, vec![Token::Text("Hello, world!".to_string())]);
    }

    #[test]
    fn test_simple_tag() {
        let tokens = collect_tokens("<DIV></div>");
        assert_eq!(tokens, vec![start("div", vec![], false), end("div")]);
    }

    #[test]
    fn test_attribute_forms() {
        let tokens = collect_tokens(r#"<a href="https://example.com" target='_blank' rel=noopener hidden>Link</a>"#);
        assert_eq!(
            tokens,
            vec![
                start(
                    "a",
                    vec![
                        Attribute::new("href", "https://example.com"),
                        Attribute::new("target", "_blank"),
                        Attribute::new("rel", "noopener"),
                        Attribute::new("hidden", ""),
                    ],
                    false
                ),
                Token::Text("Link".to_string()),
                end("a"),
            ]
        );
    }

    #[test]
    fn test_boolean_attribute_before_another() {
        let tokens = collect_tokens(r#"<input disabled value="x">"#);
        assert_eq!(
            tokens,
            vec![start(
                "input",
                vec![Attribute::new("disabled", ""), Attribute::new("value", "x")],
                false
            )]
        );
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let tokens = collect_tokens(r#"<p id="a" id="b">"#);
        assert_eq!(tokens, vec![start("p", vec![Attribute::new("id", "a")], false)]);
    }

    #[test]
    fn test_self_closing_tag() {
        let tokens = collect_tokens("<img src='image.png'/>");
        assert_eq!(
            tokens,
            vec![start("img", vec![Attribute::new("src", "image.png")], true)]
        );
    }

    #[test]
    fn test_comment_and_doctype() {
        let tokens = collect_tokens("<!DOCTYPE html><!-- note -->x");
        assert_eq!(
            tokens,
            vec![
                Token::Doctype("html".to_string()),
                Token::Comment(" note ".to_string()),
                Token::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_escape_entity() {
        let tokens = collect_tokens("Hello &amp; goodbye");
        assert_eq!(tokens, vec![Token::Text("Hello & goodbye".to_string())]);
    }

    #[test]
    fn test_bare_less_than_is_text() {
        let tokens = collect_tokens("a < b");
        assert_eq!(tokens, vec![Token::Text("a < b".to_string())]);
    }

    #[test]
    fn test_style_body_is_raw() {
        let tokens = collect_tokens("<style>p > a { color: red; }</style>");
        assert_eq!(
            tokens,
            vec![
                start("style", vec![], false),
                Token::Text("p > a { color: red; }".to_string()),
                end("style"),
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_is_dropped() {
        let tokens = collect_tokens("text<div class=");
        assert_eq!(tokens, vec![Token::Text("text".to_string())]);
    }
}
