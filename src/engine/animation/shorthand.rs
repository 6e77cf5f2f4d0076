//! `animation` ショートハンドとロングハンドの解釈

use crate::engine::share::number::parse_number;
use crate::engine::share::text::{parse_function_call, split_top_level, split_top_level_whitespace};
use crate::engine::styler::computed::AnimationProperties;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IterationCount {
    #[default]
    Once,
    Finite(f32),
    Infinite,
}

impl IterationCount {
    fn from_css(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("infinite") {
            return Some(IterationCount::Infinite);
        }
        let n = parse_number(value)?;
        if n < 0.0 {
            return None;
        }
        Some(if n == 1.0 {
            IterationCount::Once
        } else {
            IterationCount::Finite(n)
        })
    }

    pub fn count(&self) -> Option<f32> {
        match self {
            IterationCount::Once => Some(1.0),
            IterationCount::Finite(n) => Some(*n),
            IterationCount::Infinite => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    /// 終了後に最終フレームを保持するか
    pub fn holds_end(&self) -> bool {
        matches!(self, FillMode::Forwards | FillMode::Both)
    }
}

/// イージング。出力は常に線形補間だが、ステップ系だけは離散アニメーションにする。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TimingFunction {
    #[default]
    Ease,
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    StepStart,
    StepEnd,
    CubicBezier(String),
    Steps(String),
}

impl TimingFunction {
    fn from_css(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "ease" => Some(TimingFunction::Ease),
            "linear" => Some(TimingFunction::Linear),
            "ease-in" => Some(TimingFunction::EaseIn),
            "ease-out" => Some(TimingFunction::EaseOut),
            "ease-in-out" => Some(TimingFunction::EaseInOut),
            "step-start" => Some(TimingFunction::StepStart),
            "step-end" => Some(TimingFunction::StepEnd),
            _ => match parse_function_call(&lower)? {
                (name, args) if name == "cubic-bezier" => Some(TimingFunction::CubicBezier(args)),
                (name, args) if name == "steps" => Some(TimingFunction::Steps(args)),
                _ => None,
            },
        }
    }

    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            TimingFunction::StepStart | TimingFunction::StepEnd | TimingFunction::Steps(_)
        )
    }
}

/// 1つのアニメーション指定
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationSpec {
    pub name: String,
    /// 秒
    pub duration: f32,
    /// 秒
    pub delay: f32,
    pub iteration_count: IterationCount,
    pub timing_function: TimingFunction,
    pub direction: Direction,
    pub fill_mode: FillMode,
    pub paused: bool,
}

/// `2s` / `500ms` / `.5s` を秒に変換する
pub fn parse_time(token: &str) -> Option<f32> {
    let token = token.trim().to_ascii_lowercase();
    if let Some(ms) = token.strip_suffix("ms") {
        return parse_number(ms).map(|v| v / 1000.0);
    }
    token.strip_suffix('s').and_then(parse_number)
}

/// カンマ区切りの1要素を解釈する。名前がなければ `None`
///
/// トークンは形で分類する: 最初の時間が duration、次が delay。
/// `infinite` と数値は繰り返し回数。キーワードに当てはまらない最初のトークンが名前。
pub fn parse_single(value: &str) -> Option<AnimationSpec> {
    let mut spec = AnimationSpec::default();
    let mut duration = None;
    let mut delay = None;
    let mut name = None;

    for token in split_top_level_whitespace(value) {
        let lower = token.to_ascii_lowercase();

        if let Some(time) = parse_time(&lower) {
            if duration.is_none() {
                duration = Some(time);
            } else if delay.is_none() {
                delay = Some(time);
            }
            continue;
        }
        if let Some(count) = IterationCount::from_css(&lower) {
            spec.iteration_count = count;
            continue;
        }
        if let Some(timing) = TimingFunction::from_css(&lower) {
            spec.timing_function = timing;
            continue;
        }
        if let Some(direction) = parse_direction(&lower) {
            spec.direction = direction;
            continue;
        }
        if let Some(fill_mode) = parse_fill_mode(&lower) {
            spec.fill_mode = fill_mode;
            continue;
        }
        match lower.as_str() {
            "running" => continue,
            "paused" => {
                spec.paused = true;
                continue;
            }
            _ => {}
        }

        if name.is_none() {
            name = Some(token);
        } else {
            log::debug!(target:"Animation::Shorthand", "Ignoring extra token `{}`", token);
        }
    }

    spec.name = name?;
    spec.duration = duration.unwrap_or(0.0);
    spec.delay = delay.unwrap_or(0.0);
    Some(spec)
}

/// `animation` とロングハンドから、適用するアニメーションの一覧を作る
///
/// ロングハンドはショートハンドより後に適用される。カンマ区切りの値は
/// 位置で対応付け、足りない分は先頭から繰り返す。
pub fn from_properties(props: &AnimationProperties) -> Vec<AnimationSpec> {
    let mut specs: Vec<AnimationSpec> = match &props.shorthand {
        Some(shorthand) => split_top_level(shorthand, ',')
            .iter()
            .filter_map(|single| parse_single(single))
            .collect(),
        None => Vec::new(),
    };

    if let Some(names) = &props.name {
        let names: Vec<String> = split_top_level(names, ',');
        if specs.is_empty() {
            specs = names.iter().map(|_| AnimationSpec::default()).collect();
        }
        for (spec, name) in specs.iter_mut().zip(names.iter().cycle()) {
            spec.name = name.trim().to_string();
        }
        specs.retain(|spec| !spec.name.is_empty() && !spec.name.eq_ignore_ascii_case("none"));
    }

    apply_longhand(&mut specs, props.duration.as_deref(), |spec, v| {
        spec.duration = parse_time(v)?;
        Some(())
    });
    apply_longhand(&mut specs, props.delay.as_deref(), |spec, v| {
        spec.delay = parse_time(v)?;
        Some(())
    });
    apply_longhand(&mut specs, props.iteration_count.as_deref(), |spec, v| {
        spec.iteration_count = IterationCount::from_css(v)?;
        Some(())
    });
    apply_longhand(&mut specs, props.direction.as_deref(), |spec, v| {
        spec.direction = parse_direction(&v.to_ascii_lowercase())?;
        Some(())
    });
    apply_longhand(&mut specs, props.fill_mode.as_deref(), |spec, v| {
        spec.fill_mode = parse_fill_mode(&v.to_ascii_lowercase())?;
        Some(())
    });
    apply_longhand(&mut specs, props.timing_function.as_deref(), |spec, v| {
        spec.timing_function = TimingFunction::from_css(v)?;
        Some(())
    });

    specs
}

fn apply_longhand(
    specs: &mut [AnimationSpec],
    value: Option<&str>,
    apply: impl Fn(&mut AnimationSpec, &str) -> Option<()>,
) {
    let Some(value) = value else {
        return;
    };
    let values = split_top_level(value, ',');
    for (spec, v) in specs.iter_mut().zip(values.iter().cycle()) {
        if apply(spec, v).is_none() {
            log::debug!(target:"Animation::Shorthand", "Invalid animation longhand value `{}`", v);
        }
    }
}

fn parse_direction(value: &str) -> Option<Direction> {
    match value {
        "normal" => Some(Direction::Normal),
        "reverse" => Some(Direction::Reverse),
        "alternate" => Some(Direction::Alternate),
        "alternate-reverse" => Some(Direction::AlternateReverse),
        _ => None,
    }
}

fn parse_fill_mode(value: &str) -> Option<FillMode> {
    match value {
        "none" => Some(FillMode::None),
        "forwards" => Some(FillMode::Forwards),
        "backwards" => Some(FillMode::Backwards),
        "both" => Some(FillMode::Both),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("spin 2s infinite", "spin", 2.0, 0.0, IterationCount::Infinite ; "name first")]
    #[test_case("2s linear infinite spin", "spin", 2.0, 0.0, IterationCount::Infinite ; "name last")]
    #[test_case("fade 500ms 1s 3 ease-in-out", "fade", 0.5, 1.0, IterationCount::Finite(3.0) ; "delay and count")]
    #[test_case("pulse 1.5s cubic-bezier(0.4, 0, 0.6, 1) infinite", "pulse", 1.5, 0.0, IterationCount::Infinite ; "bezier kept whole")]
    #[test_case("bounce .8s ease-out forwards", "bounce", 0.8, 0.0, IterationCount::Once ; "fill mode")]
    fn classifies_tokens(input: &str, name: &str, duration: f32, delay: f32, count: IterationCount) {
        let spec = parse_single(input).expect("has a name");
        assert_eq!(spec.name, name);
        assert!((spec.duration - duration).abs() < 1e-6);
        assert!((spec.delay - delay).abs() < 1e-6);
        assert_eq!(spec.iteration_count, count);
    }

    #[test]
    fn vocabulary_is_not_a_name() {
        assert!(parse_single("2s ease infinite alternate both").is_none());
        assert!(parse_single("none").is_none());
        let spec = parse_single("slide 1s alternate-reverse both steps(4, end)").unwrap();
        assert_eq!(spec.direction, Direction::AlternateReverse);
        assert_eq!(spec.fill_mode, FillMode::Both);
        assert!(spec.timing_function.is_discrete());
    }

    #[test]
    fn first_unmatched_token_wins() {
        let spec = parse_single("one two 1s").unwrap();
        assert_eq!(spec.name, "one");
    }

    #[test]
    fn comma_separated_and_longhands() {
        let props = AnimationProperties {
            shorthand: Some("spin 2s infinite, fade 1s".into()),
            duration: Some("3s".into()),
            ..Default::default()
        };
        let specs = from_properties(&props);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].duration, 3.0);
        assert_eq!(specs[1].duration, 3.0);
        assert_eq!(specs[1].name, "fade");
    }

    #[test]
    fn longhands_alone() {
        let props = AnimationProperties {
            name: Some("pulse".into()),
            duration: Some("750ms".into()),
            iteration_count: Some("infinite".into()),
            ..Default::default()
        };
        let specs = from_properties(&props);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "pulse");
        assert_eq!(specs[0].duration, 0.75);
        assert_eq!(specs[0].iteration_count, IterationCount::Infinite);
    }
}
