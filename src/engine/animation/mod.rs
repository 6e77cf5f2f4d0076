//! CSS アニメーションを SVG のアニメーション要素に変換する

pub mod compile;
pub mod shorthand;
pub mod transform;

pub use compile::{AnimationDirective, Channel, CompiledAnimation, compile, compile_element};
pub use shorthand::{AnimationSpec, IterationCount};
