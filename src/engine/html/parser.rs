use crate::engine::html::element::Element;
use crate::engine::html::tokenizer::{Attribute, Token, Tokenizer};
use crate::engine::html::util as html_util;
use crate::engine::share::text::collapse_whitespace;

/// Maximum element nesting kept by default; deeper start tags are skipped.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// 構築中の要素
#[derive(Debug)]
struct OpenElement {
    element: Element,
    /// 直下のテキスト
    text: String,
    /// 直下のテキストと、子孫を持たない子要素のテキストを出現順に連結したもの
    flattened: String,
}

impl OpenElement {
    fn new(element: Element) -> Self {
        Self {
            element,
            text: String::new(),
            flattened: String::new(),
        }
    }

    /// Turns the collected text into `content` and returns the finished element.
    fn finish(self) -> Element {
        let OpenElement {
            mut element,
            text,
            flattened,
        } = self;

        if html_util::is_raw_text_element(&element.tag_name) {
            element.content = text.trim().to_string();
            return element;
        }

        let direct = collapse_whitespace(&text);
        if element.children.is_empty() {
            element.content = direct;
        } else if !direct.is_empty() {
            let all_phrasing = element
                .children
                .iter()
                .all(|c| c.children.is_empty() && html_util::is_phrasing_element(&c.tag_name));
            if all_phrasing {
                element.content = collapse_whitespace(&flattened);
                element.children.clear();
            } else {
                log::debug!(target:"HtmlParser::MixedContent", "Dropping stray text in <{}>: `{}`", element.tag_name, direct);
            }
        }
        element
    }
}

/// Stack-based tree builder for HTML fragments.
///
/// Never fails: unmatched end tags are ignored, unclosed elements are closed
/// at end of input and start tags beyond `max_depth` are skipped.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    /// `stack[0]` はフラグメントのルート（出力には現れない）
    stack: Vec<OpenElement>,
    /// 深さ制限で読み飛ばした開始タグ
    skipped: Vec<String>,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            stack: vec![OpenElement::new(Element::new("#fragment"))],
            skipped: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Parses the whole fragment into its top-level elements.
    ///
    /// Bare text at the top level is wrapped in an anonymous `span`.
    pub fn parse(&mut self) -> Vec<Element> {
        while let Some(token) = self.tokenizer.next_token() {
            log::debug!(target:"HtmlParser::Token", "Processing token: {token:?}");
            match token {
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => self.handle_start_tag(name, attributes, self_closing),
                Token::EndTag { name } => self.handle_end_tag(&name),
                Token::Text(data) => self.handle_text(&data),
                Token::Comment(_) | Token::Doctype(_) => {}
            }
        }

        while self.stack.len() > 1 {
            self.close_top();
        }

        let root = match self.stack.pop() {
            Some(open) => open.finish(),
            None => return Vec::new(),
        };
        self.stack.push(OpenElement::new(Element::new("#fragment")));

        if root.children.is_empty() && !root.content.is_empty() {
            return vec![Element::new("span").with_content(&root.content)];
        }
        root.children
    }

    fn handle_start_tag(&mut self, name: String, attributes: Vec<Attribute>, self_closing: bool) {
        // 読み飛ばし中は中身ごと捨てる
        if !self.skipped.is_empty() {
            if !self_closing && !html_util::is_void_element(&name) {
                self.skipped.push(name);
            }
            return;
        }

        while self.check_start_tag_with_invalid_nesting(&name) {
            log::debug!(target:"HtmlParser::AutoClosing", "Auto-closing <{}> to allow <{}>", self.top_tag(), name);
            self.close_top();
        }

        let element = Element {
            tag_name: name,
            attributes,
            ..Default::default()
        };

        if self_closing || html_util::is_void_element(&element.tag_name) {
            self.attach(element);
            return;
        }

        if self.stack.len() > self.max_depth {
            log::warn!(target:"HtmlParser::Depth", "Nesting deeper than {} levels, skipping <{}>", self.max_depth, element.tag_name);
            self.skipped.push(element.tag_name);
            return;
        }

        log::debug!(target:"HtmlParser::Stack", "Stack len: {}, +Pushed <{}> to stack.", self.stack.len(), element.tag_name);
        self.stack.push(OpenElement::new(element));
    }

    fn handle_end_tag(&mut self, name: &str) {
        if let Some(idx) = self.skipped.iter().rposition(|s| s == name) {
            self.skipped.truncate(idx);
            return;
        }
        // 閉じられないまま外側の終了タグが来た
        self.skipped.clear();

        let position = self
            .stack
            .iter()
            .skip(1)
            .rposition(|open| open.element.tag_name == name);

        match position {
            Some(idx) => {
                // skip(1) の分だけずらす
                let target_len = idx + 1;
                while self.stack.len() > target_len {
                    self.close_top();
                }
                log::debug!(target:"HtmlParser::Stack", "Stack len: {}, -Popped </{}> from stack.", self.stack.len(), name);
            }
            None => {
                log::debug!(target:"HtmlParser::Invalid", "No matching start tag for </{}>", name);
            }
        }
    }

    fn handle_text(&mut self, data: &str) {
        if !self.skipped.is_empty() {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            top.text.push_str(data);
            top.flattened.push_str(data);
        }
    }

    /// Pops the innermost open element and attaches it to its parent.
    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(open) = self.stack.pop() {
            let element = open.finish();
            self.attach(element);
        }
    }

    fn attach(&mut self, element: Element) {
        if let Some(parent) = self.stack.last_mut() {
            if element.tag_name == "br" {
                parent.flattened.push(' ');
            } else if element.children.is_empty() {
                parent.flattened.push_str(&element.content);
            }
            parent.element.children.push(element);
        }
    }

    fn top_tag(&self) -> &str {
        self.stack
            .last()
            .map(|open| open.element.tag_name.as_str())
            .unwrap_or_default()
    }

    fn check_start_tag_with_invalid_nesting(&self, name: &str) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        let parent = self.top_tag();

        // <p> の中に <p> やブロック要素が来た場合、前の <p> を閉じる
        if parent == "p" && html_util::is_block_level_element(name) {
            return true;
        }
        // 見出しの中に見出しが来た場合
        if html_util::is_heading(parent) && html_util::is_heading(name) {
            return true;
        }
        // <li> の中に <li> が来た場合、前の <li> を閉じる
        if parent == "li" && name == "li" {
            return true;
        }
        // <dt>/<dd> の中に <dt>/<dd>
        if matches!(parent, "dt" | "dd") && matches!(name, "dt" | "dd") {
            return true;
        }
        // <option> の中に <option>
        if parent == "option" && name == "option" {
            return true;
        }
        false
    }
}
