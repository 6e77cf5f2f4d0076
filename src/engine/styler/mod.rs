//! HTML 要素とスタイルシートを統合し、各ノードの最終スタイル（ComputedStyle）を決定する。

pub mod cascade;
pub mod computed;
pub mod style_tree;
pub mod ua;

pub use cascade::{INHERITED_PROPERTIES, ResolvedStyle, StyleResolver};
pub use computed::{Alignment, ComputedStyle, Display, FlexDirection, LineHeight, Position, TextAlign};
pub use style_tree::StyledNode;
