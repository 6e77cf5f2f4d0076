//! CSS: stylesheet parsing and value types.

pub mod parser;
pub mod stylesheet;
pub mod values;

pub use parser::{parse_declarations, Parser};
pub use stylesheet::{DeclarationMap, Keyframe, Stylesheet};

/// Parses a CSS text blob. Never fails; malformed parts are omitted.
pub fn parse(css: &str) -> Stylesheet {
    Parser::new(css).parse()
}
