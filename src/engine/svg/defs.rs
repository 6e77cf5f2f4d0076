//! 出力断片と定義 id
//!
//! 各要素の出力は [`Fragment`] として親に返され、親がそれを連結する。
//! `<defs>` に入る定義も断片と一緒に返すので、出力中に共有の可変状態はない。

/// 1要素（と子孫）分の出力
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub markup: String,
    /// `<defs>` に集める定義（グラデーション・フィルタ）
    pub defs: Vec<String>,
}

impl Fragment {
    pub fn push_str(&mut self, markup: &str) {
        self.markup.push_str(markup);
    }

    pub fn push_def(&mut self, def: String) {
        self.defs.push(def);
    }

    /// 子の出力を後ろに連結する
    pub fn append(&mut self, other: Fragment) {
        self.markup.push_str(&other.markup);
        self.defs.extend(other.defs);
    }
}

/// 定義 id の発行元
///
/// id は `{種類}-{接頭辞}-{ツリー上の位置}`。接頭辞は指定がなければ
/// コンパイルごとにランダムに決まり、同じページに複数の SVG を
/// 埋め込んでも衝突しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScope {
    prefix: String,
}

impl IdScope {
    pub fn new(prefix: Option<&str>) -> Self {
        let prefix = match prefix {
            Some(prefix) => sanitize(prefix),
            None => format!("{:08x}", rand::random::<u32>()),
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `path` は要素のツリー上の位置（各階層でのインデックス）
    pub fn id(&self, kind: &str, path: &[usize]) -> String {
        let mut id = format!("{}-{}", kind, self.prefix);
        for index in path {
            id.push('-');
            id.push_str(&index.to_string());
        }
        id
    }
}

/// XML の id に使えない文字を取り除く
fn sanitize(prefix: &str) -> String {
    let cleaned: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "svg".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_tree_path() {
        let ids = IdScope::new(Some("card"));
        assert_eq!(ids.id("grad", &[0, 2, 1]), "grad-card-0-2-1");
        assert_eq!(ids.id("shadow", &[]), "shadow-card");
    }

    #[test]
    fn prefix_is_sanitized_or_random() {
        assert_eq!(IdScope::new(Some("a b\"<c>")).prefix(), "abc");
        assert_eq!(IdScope::new(Some("  ")).prefix(), "svg");
        assert_eq!(IdScope::new(None).prefix().len(), 8);
    }

    #[test]
    fn fragments_concatenate() {
        let mut parent = Fragment::default();
        parent.push_str("<g>");
        let mut child = Fragment::default();
        child.push_str("<rect/>");
        child.push_def("<filter/>".into());
        parent.append(child);
        parent.push_str("</g>");
        assert_eq!(parent.markup, "<g><rect/></g>");
        assert_eq!(parent.defs, vec!["<filter/>"]);
    }
}
