use crate::engine::css::values::Edges;

// =========================
//           Size
// =========================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// =========================
//          Bounds
// =========================

/// 1要素分の配置結果
///
/// `b` 接頭辞付きのフィールドがボーダーボックス、それ以外がコンテンツボックス
/// （ボーダーボックスからパディングを引いたもの）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub bx: f32,
    pub by: f32,
    pub bwidth: f32,
    pub bheight: f32,
    pub bcenter_x: f32,
    pub bcenter_y: f32,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl Bounds {
    /// コンテンツボックスの幅・高さは 0 未満にならない
    pub fn new(bx: f32, by: f32, bwidth: f32, bheight: f32, padding: &Edges<f32>) -> Self {
        let bwidth = bwidth.max(0.0);
        let bheight = bheight.max(0.0);
        let x = bx + padding.left;
        let y = by + padding.top;
        let width = (bwidth - padding.horizontal()).max(0.0);
        let height = (bheight - padding.vertical()).max(0.0);

        Self {
            bx,
            by,
            bwidth,
            bheight,
            bcenter_x: bx + bwidth / 2.0,
            bcenter_y: by + bheight / 2.0,
            x,
            y,
            width,
            height,
            center_x: x + width / 2.0,
            center_y: y + height / 2.0,
        }
    }

    /// キャンバス全体（パディングなし）
    pub fn canvas(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height, &Edges::default())
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

// =========================
//        LayoutBox
// =========================

/// 配置済みツリー。[`StyledNode`](crate::engine::styler::StyledNode) と同じ形をしている。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutBox {
    pub bounds: Bounds,
    pub children: Vec<LayoutBox>,
}

/// レイアウト全体で共有する値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl LayoutContext {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            canvas_width,
            canvas_height,
        }
    }

    /// 折り返し幅が分からない時に仮定する幅（キャンバス幅の 80%）
    pub fn assumed_wrap_width(&self) -> f32 {
        self.canvas_width * super::estimate::ASSUMED_WRAP_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_box_never_negative() {
        let padding = Edges::all(30.0);
        let bounds = Bounds::new(10.0, 10.0, 40.0, 20.0, &padding);
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.height, 0.0);
        assert_eq!(bounds.x, 40.0);
        assert_eq!(bounds.bcenter_x, 30.0);
    }

    #[test]
    fn padding_shrinks_content_box() {
        let padding = Edges {
            top: 5.0,
            right: 10.0,
            bottom: 5.0,
            left: 10.0,
        };
        let bounds = Bounds::new(0.0, 0.0, 100.0, 50.0, &padding);
        assert_eq!((bounds.x, bounds.y, bounds.width, bounds.height), (10.0, 5.0, 80.0, 40.0));
        assert_eq!((bounds.center_x, bounds.center_y), (50.0, 25.0));
    }
}
