//! 塗り（単色・グラデーション）とフィルタ定義

use crate::engine::animation::transform::parse_angle;
use crate::engine::animation::AnimationDirective;
use crate::engine::css::values::{BoxShadow, Color, Length};
use crate::engine::share::number::fmt_num;
use crate::engine::share::text::{escape_xml, parse_function_call, split_top_level, split_top_level_whitespace};

use super::animate;

/// 角度指定のない `linear-gradient()` の向き
pub const DEFAULT_GRADIENT_ANGLE: f32 = 45.0;

/// 単色の塗り
#[derive(Debug, Clone, PartialEq)]
pub struct SolidPaint {
    /// `fill` / `stroke` に書く値
    pub color: String,
    /// 1 未満のときだけ `*-opacity` を付ける
    pub opacity: Option<f32>,
}

impl SolidPaint {
    /// CSS の色を SVG の塗りに変換する。透明なら `None`
    ///
    /// 名前付きの色と不透明な16進表記はそのまま使い、関数表記と
    /// 半透明の色は `#rrggbb` + 不透明度に分解する。
    pub fn from_css(value: &str, current_color: &str) -> Option<Self> {
        let value = value.trim();
        let color = Color::parse(value)?;
        if color.is_transparent() {
            return None;
        }
        if color == Color::CurrentColor {
            return if value.eq_ignore_ascii_case(current_color) {
                None
            } else {
                SolidPaint::from_css(current_color, "")
            };
        }

        let alpha = color.alpha();
        let opacity = (alpha < 1.0).then_some(alpha);
        let color = if value.contains('(') || opacity.is_some() {
            color.to_hex()
        } else {
            value.to_string()
        };
        Some(Self { color, opacity })
    }

    /// パース済みの色から作る。`currentColor` は扱わない
    pub fn from_color(color: Color) -> Option<Self> {
        if color.is_transparent() || color == Color::CurrentColor {
            return None;
        }
        let alpha = color.alpha();
        Some(Self {
            color: color.to_hex(),
            opacity: (alpha < 1.0).then_some(alpha),
        })
    }

    /// `{kind}="..." {kind}-opacity="..."`
    pub fn attrs(&self, kind: &str) -> String {
        let mut attrs = format!(r#" {}="{}""#, kind, escape_xml(&self.color));
        if let Some(opacity) = self.opacity {
            attrs.push_str(&format!(r#" {}-opacity="{}""#, kind, fmt_num(opacity)));
        }
        attrs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// %
    pub offset: f32,
    pub color: SolidPaint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(SolidPaint),
    Linear { angle: f32, stops: Vec<GradientStop> },
    Radial { stops: Vec<GradientStop> },
}

impl Paint {
    /// `background` の値を解釈する。描画するものがなければ `None`
    pub fn parse(value: &str, current_color: &str) -> Option<Self> {
        let value = value.trim();
        // `background: url(a.png), linear-gradient(...)` のような重ね指定は
        // 最初に解釈できた層だけ使う
        for layer in split_top_level(value, ',') {
            for token in split_top_level_whitespace(&layer) {
                if let Some((name, args)) = parse_function_call(&token) {
                    match name.trim_start_matches("-webkit-").trim_start_matches("repeating-") {
                        "linear-gradient" => return parse_linear(&args, current_color),
                        "radial-gradient" => return parse_radial(&args, current_color),
                        _ => {}
                    }
                }
            }
        }

        // `background: #fff no-repeat` のような指定から色を拾う
        split_top_level_whitespace(value)
            .iter()
            .find_map(|token| SolidPaint::from_css(token, current_color))
            .map(Paint::Solid)
    }

    pub fn is_gradient(&self) -> bool {
        !matches!(self, Paint::Solid(_))
    }
}

fn parse_linear(args: &str, current_color: &str) -> Option<Paint> {
    let parts = split_top_level(args, ',');
    let (angle, stop_parts) = match parts.first().map(|p| p.to_ascii_lowercase()) {
        Some(first) if first.starts_with("to ") => (direction_angle(&first[3..])?, &parts[1..]),
        Some(first) if parse_angle(&first).is_some() && Color::parse(&first).is_none() => {
            (parse_angle(&first)?, &parts[1..])
        }
        _ => (DEFAULT_GRADIENT_ANGLE, &parts[..]),
    };
    let stops = parse_stops(stop_parts, current_color)?;
    Some(Paint::Linear { angle, stops })
}

fn parse_radial(args: &str, current_color: &str) -> Option<Paint> {
    let parts = split_top_level(args, ',');
    // `circle at center` 等の形状指定は読み飛ばす
    let stop_parts = match parts.first() {
        Some(first) if parse_stop(first, current_color).is_none() => &parts[1..],
        _ => &parts[..],
    };
    let stops = parse_stops(stop_parts, current_color)?;
    Some(Paint::Radial { stops })
}

/// `to right` → 90 など
fn direction_angle(direction: &str) -> Option<f32> {
    let mut words: Vec<&str> = direction.split_whitespace().collect();
    words.sort_unstable();
    match words.as_slice() {
        ["top"] => Some(0.0),
        ["right", "top"] => Some(45.0),
        ["right"] => Some(90.0),
        ["bottom", "right"] => Some(135.0),
        ["bottom"] => Some(180.0),
        ["bottom", "left"] => Some(225.0),
        ["left"] => Some(270.0),
        ["left", "top"] => Some(315.0),
        _ => None,
    }
}

/// 位置のない色は等間隔に並べる
fn parse_stops(parts: &[String], current_color: &str) -> Option<Vec<GradientStop>> {
    let parsed: Vec<(SolidPaint, Option<f32>)> = parts
        .iter()
        .filter_map(|part| parse_stop(part, current_color))
        .collect();
    if parsed.is_empty() {
        return None;
    }

    let last = parsed.len().saturating_sub(1).max(1) as f32;
    Some(
        parsed
            .into_iter()
            .enumerate()
            .map(|(i, (color, offset))| GradientStop {
                offset: offset.unwrap_or(i as f32 / last * 100.0),
                color,
            })
            .collect(),
    )
}

fn parse_stop(part: &str, current_color: &str) -> Option<(SolidPaint, Option<f32>)> {
    let tokens = split_top_level_whitespace(part);
    let color_token = tokens.first()?;
    Color::parse(color_token)?;
    // 透明な色の停止点は不透明度 0 の黒にする
    let color = SolidPaint::from_css(color_token, current_color).unwrap_or(SolidPaint {
        color: "#000000".to_string(),
        opacity: Some(0.0),
    });
    let offset = tokens.get(1).and_then(|t| match Length::from_css(t)? {
        Length::Percent(p) => Some(p.clamp(0.0, 100.0)),
        _ => None,
    });
    Some((color, offset))
}

/// CSS の角度を `x1/y1/x2/y2`（%）に変換する
///
/// 0deg が上向き、90deg が右向き。
pub fn gradient_vector(angle: f32) -> (f32, f32, f32, f32) {
    let rad = (angle - 90.0).to_radians();
    let (sin, cos) = rad.sin_cos();
    (50.0 - cos * 50.0, 50.0 - sin * 50.0, 50.0 + cos * 50.0, 50.0 + sin * 50.0)
}

/// グラデーションの座標系
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientUnits {
    /// 要素の外接矩形に対する %（既定）
    BoundingBox,
    /// ユーザー座標での横方向のグラデーション（`background-size` を伴うシマー効果）
    UserSpace { x1: f32, x2: f32, y: f32 },
}

/// `<linearGradient>` / `<radialGradient>` 定義。`animations` は `gradientTransform` に付く
pub fn gradient_def(id: &str, paint: &Paint, units: GradientUnits, animations: &[&AnimationDirective]) -> Option<String> {
    let (open, close, stops) = match paint {
        Paint::Solid(_) => return None,
        Paint::Linear { angle, stops } => {
            let coords = match units {
                GradientUnits::BoundingBox => {
                    let (x1, y1, x2, y2) = gradient_vector(*angle);
                    format!(
                        r#"x1="{}%" y1="{}%" x2="{}%" y2="{}%""#,
                        fmt_num(x1),
                        fmt_num(y1),
                        fmt_num(x2),
                        fmt_num(y2)
                    )
                }
                GradientUnits::UserSpace { x1, x2, y } => format!(
                    r#"gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}""#,
                    fmt_num(x1),
                    fmt_num(y),
                    fmt_num(x2),
                    fmt_num(y)
                ),
            };
            (format!(r#"<linearGradient id="{}" {}>"#, id, coords), "</linearGradient>", stops)
        }
        Paint::Radial { stops } => (
            format!(r#"<radialGradient id="{}" cx="50%" cy="50%" r="50%">"#, id),
            "</radialGradient>",
            stops,
        ),
    };

    let mut def = open;
    for stop in stops {
        def.push_str(&format!(
            r#"<stop offset="{}%" stop-color="{}""#,
            fmt_num(stop.offset),
            escape_xml(&stop.color.color)
        ));
        if let Some(opacity) = stop.color.opacity {
            def.push_str(&format!(r#" stop-opacity="{}""#, fmt_num(opacity)));
        }
        def.push_str("/>");
    }
    for directive in animations {
        def.push_str(&animate::animate_transform(directive, "gradientTransform", false));
    }
    def.push_str(close);
    Some(def)
}

/// `box-shadow` 用のドロップシャドウ
pub fn drop_shadow_def(id: &str, shadow: &BoxShadow) -> String {
    let flood = match shadow.color {
        Color::CurrentColor => "#000000".to_string(),
        color => color.to_hex(),
    };
    let opacity = shadow.color.alpha();
    format!(
        concat!(
            r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%">"#,
            r#"<feGaussianBlur in="SourceAlpha" stdDeviation="{blur}"/>"#,
            r#"<feOffset dx="{dx}" dy="{dy}" result="offsetblur"/>"#,
            r#"<feFlood flood-color="{flood}" flood-opacity="{opacity}"/>"#,
            r#"<feComposite in2="offsetblur" operator="in"/>"#,
            r#"<feMerge><feMergeNode/><feMergeNode in="SourceGraphic"/></feMerge>"#,
            "</filter>"
        ),
        id = id,
        blur = fmt_num(shadow.blur / 2.0),
        dx = fmt_num(shadow.offset_x),
        dy = fmt_num(shadow.offset_y),
        flood = flood,
        opacity = fmt_num(opacity),
    )
}

/// `filter: blur()` 用
pub fn blur_def(id: &str, radius: f32) -> String {
    format!(
        r#"<filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
        id,
        fmt_num(radius)
    )
}
