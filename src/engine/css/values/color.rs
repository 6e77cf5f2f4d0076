use crate::engine::share::text::parse_function_call;

/// パース済みの色
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Rgba(u8, u8, u8, f32), // RGBA (0–255, 0–1)
    CurrentColor,          // CSS の currentColor
    Transparent,           // 透明
}

impl Default for Color {
    fn default() -> Self {
        Color::Rgba(0, 0, 0, 1.0) // デフォルトは不透明な黒
    }
}

impl Color {
    pub const BLACK: Color = Color::Rgba(0, 0, 0, 1.0);
    pub const WHITE: Color = Color::Rgba(255, 255, 255, 1.0);

    /// 任意のCSS色表現をパースする
    pub fn parse(value: &str) -> Option<Color> {
        let value = value.trim();
        if value.starts_with('#') {
            return Color::from_hex(value);
        }
        if let Some((name, args)) = parse_function_call(value) {
            return match name.as_str() {
                "rgb" | "rgba" => Color::from_rgb_args(&args),
                "hsl" | "hsla" => Color::from_hsl_args(&args),
                _ => None,
            };
        }
        Color::from_named(value)
    }

    pub fn from_named(name: &str) -> Option<Color> {
        let rgb = |r, g, b| Some(Color::Rgba(r, g, b, 1.0));
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "red" => rgb(255, 0, 0),
            "green" => rgb(0, 128, 0),
            "lime" => rgb(0, 255, 0),
            "blue" => rgb(0, 0, 255),
            "yellow" => rgb(255, 255, 0),
            "orange" => rgb(255, 165, 0),
            "purple" => rgb(128, 0, 128),
            "pink" => rgb(255, 192, 203),
            "gray" | "grey" => rgb(128, 128, 128),
            "silver" => rgb(192, 192, 192),
            "navy" => rgb(0, 0, 128),
            "teal" => rgb(0, 128, 128),
            "cyan" | "aqua" => rgb(0, 255, 255),
            "magenta" | "fuchsia" => rgb(255, 0, 255),
            "gold" => rgb(255, 215, 0),
            "transparent" => Some(Color::Transparent),
            "currentcolor" => Some(Color::CurrentColor),
            _ => None,
        }
    }

    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
        match hex.len() {
            3 => Some(Color::Rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Color::Rgba(
                short(0)?,
                short(1)?,
                short(2)?,
                short(3)? as f32 / 255.0,
            )),
            6 => Some(Color::Rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                1.0,
            )),
            8 => Some(Color::Rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])? as f32 / 255.0,
            )),
            _ => None,
        }
    }

    /// `255, 0, 0, 0.5` / `255 0 0 / 50%`
    fn from_rgb_args(args: &str) -> Option<Color> {
        let parts = split_color_args(args);
        if parts.len() < 3 {
            return None;
        }
        let channel = |s: &str| -> Option<u8> {
            let v = match s.strip_suffix('%') {
                Some(p) => p.trim().parse::<f32>().ok()? * 2.55,
                None => s.parse::<f32>().ok()?,
            };
            Some(v.round().clamp(0.0, 255.0) as u8)
        };
        let alpha = match parts.get(3) {
            Some(a) => parse_alpha(a)?,
            None => 1.0,
        };
        Some(Color::Rgba(
            channel(&parts[0])?,
            channel(&parts[1])?,
            channel(&parts[2])?,
            alpha,
        ))
    }

    fn from_hsl_args(args: &str) -> Option<Color> {
        let parts = split_color_args(args);
        if parts.len() < 3 {
            return None;
        }
        let h = parts[0].trim_end_matches("deg").parse::<f32>().ok()?;
        let s = parts[1].trim_end_matches('%').parse::<f32>().ok()? / 100.0;
        let l = parts[2].trim_end_matches('%').parse::<f32>().ok()? / 100.0;
        let a = match parts.get(3) {
            Some(a) => parse_alpha(a)?,
            None => 1.0,
        };
        Some(Color::from_hsl(h.rem_euclid(360.0), s.clamp(0.0, 1.0), l.clamp(0.0, 1.0), a))
    }

    pub fn from_hsl(h: f32, s: f32, l: f32, a: f32) -> Color {
        // （簡易実装：CSS Color Module Level 3準拠）
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;
        let (r, g, b) = match h as i32 {
            0..=59 => (c, x, 0.0),
            60..=119 => (x, c, 0.0),
            120..=179 => (0.0, c, x),
            180..=239 => (0.0, x, c),
            240..=299 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Color::Rgba(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
            a,
        )
    }

    pub fn alpha(&self) -> f32 {
        match self {
            Color::Rgba(_, _, _, a) => *a,
            Color::Transparent => 0.0,
            Color::CurrentColor => 1.0,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha() <= 0.0
    }

    /// `#rrggbb` 形式（アルファは含まない）
    pub fn to_hex(&self) -> String {
        match self {
            Color::Rgba(r, g, b, _) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            Color::Transparent => "#000000".to_string(),
            Color::CurrentColor => "currentColor".to_string(),
        }
    }
}

fn split_color_args(args: &str) -> Vec<String> {
    args.replace(['/', ','], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn parse_alpha(value: &str) -> Option<f32> {
    let a = match value.strip_suffix('%') {
        Some(p) => p.trim().parse::<f32>().ok()? / 100.0,
        None => value.trim().parse::<f32>().ok()?,
    };
    Some(a.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#f00"), Some(Color::Rgba(255, 0, 0, 1.0)));
        assert_eq!(Color::parse("#00ff00"), Some(Color::Rgba(0, 255, 0, 1.0)));
        assert_eq!(Color::parse("#0000ff80").map(|c| c.to_hex()), Some("#0000ff".to_string()));
        assert_eq!(Color::parse("#zzz"), None);
    }

    #[test]
    fn parses_functions() {
        assert_eq!(
            Color::parse("rgba(0, 0, 0, 0.5)"),
            Some(Color::Rgba(0, 0, 0, 0.5))
        );
        assert_eq!(
            Color::parse("rgb(255 128 0 / 25%)"),
            Some(Color::Rgba(255, 128, 0, 0.25))
        );
        assert_eq!(Color::parse("hsl(0, 100%, 50%)"), Some(Color::Rgba(255, 0, 0, 1.0)));
    }

    #[test]
    fn named_and_special() {
        assert_eq!(Color::parse("White"), Some(Color::WHITE));
        assert!(Color::parse("transparent").is_some_and(|c| c.is_transparent()));
        assert_eq!(Color::parse("notacolor"), None);
    }
}
