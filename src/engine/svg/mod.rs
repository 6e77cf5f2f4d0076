//! SVG 出力
//!
//! 配置済みツリーを SVG 文書に変換する。グラデーションやフィルタの定義は
//! 文書先頭の単一の `<defs>` にまとめる。

pub mod animate;
pub mod defs;
pub mod emitter;
pub mod paint;
pub mod text;

pub use defs::{Fragment, IdScope};
pub use emitter::{Emitter, document, fallback_svg, placeholder_svg};
pub use paint::{Paint, SolidPaint};
