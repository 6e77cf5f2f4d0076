use crate::engine::html::parser::DEFAULT_MAX_DEPTH;

pub const DEFAULT_WIDTH: f32 = 800.0;
pub const DEFAULT_HEIGHT: f32 = 400.0;
/// HTML・CSS それぞれの入力サイズ上限
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// 1回のコンパイルの設定
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    pub width: f32,
    pub height: f32,
    /// 定義 id の接頭辞。`None` ならコンパイルごとにランダム
    pub id_prefix: Option<String>,
    pub max_input_bytes: usize,
    /// 要素の入れ子の上限。これより深い開始タグは読み飛ばす
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            id_prefix: None,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let options = CompileOptions::default()
            .with_size(300.0, 120.0)
            .with_id_prefix("card")
            .with_max_depth(8);
        assert_eq!(options.width, 300.0);
        assert_eq!(options.height, 120.0);
        assert_eq!(options.id_prefix.as_deref(), Some("card"));
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }
}
