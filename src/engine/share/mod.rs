//! エンジン全体で共有する小さなユーティリティ群

pub mod number;
pub mod text;
