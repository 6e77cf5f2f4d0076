pub mod element;
pub mod parser;
pub mod tokenizer;
pub mod util;

pub use element::Element;
pub use parser::Parser;
pub use tokenizer::Attribute;

/// Parses an HTML fragment into its top-level elements.
pub fn parse(html: &str) -> Vec<Element> {
    Parser::new(html).parse()
}
