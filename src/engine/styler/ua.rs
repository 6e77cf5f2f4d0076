//! UA（User-Agent）デフォルトスタイル
//!
//! タグごとの最小限のフォント指定のみ。その他の初期値は
//! [`ComputedStyle`](super::computed::ComputedStyle) の既定値で決まる。

use crate::engine::css::stylesheet::DeclarationMap;

pub const DEFAULT_FONT_SIZE: f32 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_TEXT_COLOR: &str = "white";

/// タグ名ごとの既定フォントサイズ（px）。未定義のタグは継承値か 16px。
pub fn default_font_size(tag_name: &str) -> Option<f32> {
    match tag_name {
        "h1" => Some(36.0),
        "h2" => Some(32.0),
        "h3" => Some(28.0),
        "h4" => Some(24.0),
        "h5" => Some(20.0),
        "h6" => Some(18.0),
        "small" => Some(12.0),
        "code" => Some(14.0),
        _ => None,
    }
}

/// タグ名に対するデフォルト宣言を返す
///
/// カスケードの最初の段なので、継承値や著者スタイルがあればそちらが勝つ。
pub fn default_declarations(tag_name: &str) -> DeclarationMap {
    let mut declarations = DeclarationMap::new();

    if let Some(size) = default_font_size(tag_name) {
        declarations.insert("font-size".into(), format!("{}px", size));
    }

    // "h" で始まるタグは全て太字（header, hr 等も含む）
    if tag_name.starts_with('h') {
        declarations.insert("font-weight".into(), "bold".into());
    }

    match tag_name {
        "b" | "strong" => {
            declarations.insert("font-weight".into(), "bold".into());
        }
        "i" | "em" => {
            declarations.insert("font-style".into(), "italic".into());
        }
        _ => {}
    }

    declarations
}
