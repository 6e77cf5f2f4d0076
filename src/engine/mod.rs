pub mod animation;
pub mod css;
pub mod error;
pub mod html;
pub mod layouter;
pub mod options;
pub mod share;
pub mod styler;
pub mod svg;
