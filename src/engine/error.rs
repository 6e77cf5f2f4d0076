use std::fmt;

/// コンパイルを続行できない入力
///
/// 構文の誤りはここには含まれない（読み飛ばして続行する）。
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// キャンバスの幅・高さが正の有限値でない
    InvalidCanvas { width: f32, height: f32 },
    /// 入力が上限を超えている
    InputTooLarge {
        what: &'static str,
        len: usize,
        limit: usize,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanvas { width, height } => {
                write!(f, "Invalid canvas size: {width}x{height}")
            }
            Self::InputTooLarge { what, len, limit } => {
                write!(f, "{what} input too large: {len} bytes (limit {limit})")
            }
        }
    }
}

impl std::error::Error for CompileError {}
