//! `transform` 値から平行移動・拡大縮小・回転を取り出す

use crate::engine::css::values::Length;
use crate::engine::layouter::Size;
use crate::engine::share::number::parse_number;
use crate::engine::share::text::{parse_function_call, split_top_level_whitespace};

/// 1つのキーフレームの `transform` に含まれていた成分
///
/// 宣言されなかった成分は `None`（恒等変換で補う）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformParts {
    pub translate: Option<(f32, f32)>,
    pub scale: Option<(f32, f32)>,
    /// 度
    pub rotate: Option<f32>,
}

/// `translate(-50%, 10px) rotate(45deg)` のような値を解釈する
///
/// 平行移動の `%` は要素自身の大きさに対する割合。同じ種類の関数が複数あれば
/// 平行移動と回転は足し合わせ、拡大縮小は掛け合わせる。
pub fn parse_transform(value: &str, own: Size) -> TransformParts {
    let mut parts = TransformParts::default();

    for token in split_top_level_whitespace(value) {
        let Some((name, args)) = parse_function_call(&token) else {
            if !token.eq_ignore_ascii_case("none") {
                log::debug!(target:"Animation::Transform", "Unknown transform token `{}`", token);
            }
            continue;
        };
        let args = split_args(&args);
        if apply_function(&mut parts, &name, &args, own).is_none() {
            log::debug!(target:"Animation::Transform", "Invalid arguments in `{}`", token);
        }
    }

    parts
}

fn apply_function(parts: &mut TransformParts, name: &str, args: &[String], own: Size) -> Option<()> {
    let first = args.first().map(String::as_str);
    let second = args.get(1).map(String::as_str);

    match name {
        "translate" | "translate3d" => {
            let x = translate_length(first?, own.width)?;
            let y = match second {
                Some(y) => translate_length(y, own.height)?,
                None => 0.0,
            };
            add_translate(parts, x, y);
        }
        "translatex" => add_translate(parts, translate_length(first?, own.width)?, 0.0),
        "translatey" => add_translate(parts, 0.0, translate_length(first?, own.height)?),
        "scale" | "scale3d" => {
            let sx = scale_factor(first?)?;
            let sy = match second {
                Some(sy) => scale_factor(sy)?,
                None => sx,
            };
            multiply_scale(parts, sx, sy);
        }
        "scalex" => multiply_scale(parts, scale_factor(first?)?, 1.0),
        "scaley" => multiply_scale(parts, 1.0, scale_factor(first?)?),
        "rotate" | "rotatez" => {
            let deg = parse_angle(first?)?;
            parts.rotate = Some(parts.rotate.unwrap_or(0.0) + deg);
        }
        _ => {
            log::debug!(target:"Animation::Transform", "Unsupported transform function {}()", name);
        }
    }
    Some(())
}
/// 角度を度に変換する（`deg` / `turn` / `rad` / `grad`、単位なしの 0）
pub fn parse_angle(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(v) = value.strip_suffix("deg") {
        parse_number(v)
    } else if let Some(v) = value.strip_suffix("turn") {
        parse_number(v).map(|t| t * 360.0)
    } else if let Some(v) = value.strip_suffix("grad") {
        parse_number(v).map(|g| g * 0.9)
    } else if let Some(v) = value.strip_suffix("rad") {
        parse_number(v).map(f32::to_degrees)
    } else {
        parse_number(&value).filter(|v| *v == 0.0)
    }
}

fn split_args(args: &str) -> Vec<String> {
    args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn translate_length(value: &str, own: f32) -> Option<f32> {
    match Length::from_css(value)? {
        Length::Auto => None,
        length => Some(length.to_px(own)),
    }
}

fn scale_factor(value: &str) -> Option<f32> {
    match value.trim().strip_suffix('%') {
        Some(p) => parse_number(p).map(|p| p / 100.0),
        None => parse_number(value),
    }
}

fn add_translate(parts: &mut TransformParts, x: f32, y: f32) {
    let (tx, ty) = parts.translate.unwrap_or((0.0, 0.0));
    parts.translate = Some((tx + x, ty + y));
}

fn multiply_scale(parts: &mut TransformParts, sx: f32, sy: f32) {
    let (cx, cy) = parts.scale.unwrap_or((1.0, 1.0));
    parts.scale = Some((cx * sx, cy * sy));
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN: Size = Size {
        width: 200.0,
        height: 100.0,
    };

    #[test]
    fn translate_percent_uses_own_size() {
        let parts = parse_transform("translate(-50%, 10%)", OWN);
        assert_eq!(parts.translate, Some((-100.0, 10.0)));
        assert_eq!(parts.scale, None);
    }

    #[test]
    fn translate_components_accumulate() {
        let parts = parse_transform("translateX(10px) translateY(-5px) translate(1px)", OWN);
        assert_eq!(parts.translate, Some((11.0, -5.0)));
    }

    #[test]
    fn scale_forms() {
        assert_eq!(parse_transform("scale(1.5)", OWN).scale, Some((1.5, 1.5)));
        assert_eq!(parse_transform("scale(2, 0.5)", OWN).scale, Some((2.0, 0.5)));
        assert_eq!(parse_transform("scaleX(2) scaleY(3)", OWN).scale, Some((2.0, 3.0)));
        assert_eq!(parse_transform("scale(50%)", OWN).scale, Some((0.5, 0.5)));
    }

    #[test]
    fn rotate_units() {
        assert_eq!(parse_angle("90deg"), Some(90.0));
        assert_eq!(parse_angle("0.5turn"), Some(180.0));
        assert_eq!(parse_angle("0"), Some(0.0));
        assert_eq!(parse_angle("45"), None);
        let rad = parse_angle("3.14159265rad").unwrap();
        assert!((rad - 180.0).abs() < 1e-3);
    }

    #[test]
    fn none_and_unknown() {
        assert_eq!(parse_transform("none", OWN), TransformParts::default());
        let parts = parse_transform("skewX(10deg) rotate(10deg)", OWN);
        assert_eq!(parts.rotate, Some(10.0));
    }
}
