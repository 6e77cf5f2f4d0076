//! レイアウト
//!
//! 見積もり（[`estimate`]）と配置（[`place`]）の2パスで、スタイル付きツリーと
//! 同じ形の [`LayoutBox`] ツリーを作る。

pub mod estimate;
pub mod place;
pub mod types;

pub use estimate::{estimate_height, estimate_width};
pub use place::layout;
pub use types::{Bounds, LayoutBox, LayoutContext, Size};
