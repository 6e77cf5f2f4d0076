//! CSS キーフレームアニメーション → SVG (SMIL) アニメーション指示
//!
//! 1つのアニメーション指定とキーフレーム列から、チャンネルごと
//! （平行移動・拡大縮小・回転・不透明度）に値リストを作る。全チャンネルは
//! 同じ `keyTimes` を共有し、値を宣言していないフレームには恒等値を入れる。

use super::shorthand::{self, AnimationSpec, Direction, IterationCount};
use super::transform::{TransformParts, parse_transform};
use crate::engine::css::stylesheet::{Keyframe, Stylesheet};
use crate::engine::css::values::Length;
use crate::engine::layouter::{Bounds, Size};
use crate::engine::share::number::{fmt_num, parse_number};
use crate::engine::share::text::split_top_level_whitespace;
use crate::engine::styler::ComputedStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Translate,
    Scale,
    Rotate,
    Opacity,
    /// `background-position` によるグラデーションの横移動
    GradientTranslate,
}

impl Channel {
    /// 要素の座標変換として扱うチャンネルか
    pub fn is_transform(&self) -> bool {
        matches!(self, Channel::Translate | Channel::Scale | Channel::Rotate)
    }

    /// `animateTransform` の `type`
    pub fn transform_type(&self) -> Option<&'static str> {
        match self {
            Channel::Translate | Channel::GradientTranslate => Some("translate"),
            Channel::Scale => Some("scale"),
            Channel::Rotate => Some("rotate"),
            Channel::Opacity => None,
        }
    }
}

/// SVG のアニメーション要素1つ分
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDirective {
    pub channel: Channel,
    /// キーフレームごとの値（`"x y"` / `"sx sy"` / `"deg 0 0"` / `"a"`）
    pub values: Vec<String>,
    /// 0.0 ..= 1.0、`values` と同じ長さ
    pub key_times: Vec<f32>,
    /// 秒
    pub duration: f32,
    pub repeat: IterationCount,
    /// 秒
    pub begin: f32,
    /// 終了後に最終値を保持する（`fill="freeze"`）
    pub freeze: bool,
    /// ステップ系イージング（`calcMode="discrete"`）
    pub discrete: bool,
}

impl AnimationDirective {
    pub fn values_attr(&self) -> String {
        self.values.join(";")
    }

    pub fn key_times_attr(&self) -> String {
        self.key_times
            .iter()
            .map(|t| fmt_num(*t))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn dur_attr(&self) -> String {
        format!("{}s", fmt_num(self.duration))
    }

    pub fn repeat_count_attr(&self) -> String {
        match self.repeat.count() {
            Some(n) => fmt_num(n),
            None => "indefinite".to_string(),
        }
    }
}

/// 1要素に付くアニメーションの全て
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledAnimation {
    pub directives: Vec<AnimationDirective>,
}

impl CompiledAnimation {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// 中心座標系での描画が必要か
    pub fn has_transform(&self) -> bool {
        self.directives.iter().any(|d| d.channel.is_transform())
    }

    pub fn by_channel(&self, channel: Channel) -> impl Iterator<Item = &AnimationDirective> {
        self.directives.iter().filter(move |d| d.channel == channel)
    }

    pub fn transforms(&self) -> impl Iterator<Item = &AnimationDirective> {
        self.directives.iter().filter(|d| d.channel.is_transform())
    }
}

/// `background-position` アニメーションの対象となるグラデーション背景
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientTarget {
    /// `background-size` の横方向の割合（%）。未指定は 100
    pub size_percent: f32,
}

impl GradientTarget {
    pub fn from_style(style: &ComputedStyle) -> Option<Self> {
        let background = style.background.as_deref()?;
        if !background.to_ascii_lowercase().contains("gradient(") {
            return None;
        }
        let size_percent = style
            .background_size
            .as_deref()
            .and_then(|size| split_top_level_whitespace(size).into_iter().next())
            .and_then(|first| match Length::from_css(&first)? {
                Length::Percent(p) => Some(p),
                _ => None,
            })
            .unwrap_or(100.0);
        Some(Self { size_percent })
    }
}

/// 要素のスタイルに書かれた全アニメーションをコンパイルする
///
/// 対応する `@keyframes` がない名前は無視する（要素は静的に描画される）。
pub fn compile_element(style: &ComputedStyle, stylesheet: &Stylesheet, bounds: &Bounds) -> CompiledAnimation {
    let mut compiled = CompiledAnimation::default();
    if style.animation.is_empty() {
        return compiled;
    }

    let gradient = GradientTarget::from_style(style);
    for spec in shorthand::from_properties(&style.animation) {
        let Some(keyframes) = stylesheet.keyframes(&spec.name) else {
            log::warn!(target:"Animation::Compile", "No @keyframes named `{}`, rendering statically", spec.name);
            continue;
        };
        compiled
            .directives
            .extend(compile(&spec, keyframes, bounds, gradient.as_ref()));
    }
    compiled
}

/// キーフレーム1つ分の解釈結果
#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    time: f32,
    transform: TransformParts,
    opacity: Option<f32>,
}

/// 1つのアニメーション指定をコンパイルする
pub fn compile(
    spec: &AnimationSpec,
    keyframes: &[Keyframe],
    bounds: &Bounds,
    gradient: Option<&GradientTarget>,
) -> Vec<AnimationDirective> {
    if spec.paused {
        log::debug!(target:"Animation::Compile", "`{}` is paused, skipped", spec.name);
        return Vec::new();
    }
    if spec.duration <= 0.0 || keyframes.is_empty() {
        log::debug!(target:"Animation::Compile", "`{}` has no duration or frames, skipped", spec.name);
        return Vec::new();
    }

    let own = Size::new(bounds.bwidth, bounds.bheight);
    let mut frames: Vec<Frame> = keyframes
        .iter()
        .map(|keyframe| Frame {
            time: keyframe.offset_percent / 100.0,
            transform: keyframe
                .properties
                .get("transform")
                .map(|value| parse_transform(value, own))
                .unwrap_or_default(),
            opacity: keyframe.properties.get("opacity").and_then(|v| parse_opacity(v)),
        })
        .collect();

    // 0% / 100% がなければ恒等値のフレームで補う
    if frames.first().is_some_and(|f| f.time > 0.0) {
        frames.insert(0, Frame::default());
    }
    if frames.last().is_some_and(|f| f.time < 1.0) {
        frames.push(Frame {
            time: 1.0,
            ..Default::default()
        });
    }
    let key_times: Vec<f32> = frames.iter().map(|f| f.time).collect();

    let channels: [(Channel, Vec<Option<String>>, &str); 4] = [
        (
            Channel::Translate,
            frames
                .iter()
                .map(|f| f.transform.translate.map(|(x, y)| pair(x, y)))
                .collect(),
            "0 0",
        ),
        (
            Channel::Scale,
            frames
                .iter()
                .map(|f| f.transform.scale.map(|(x, y)| pair(x, y)))
                .collect(),
            "1 1",
        ),
        (
            Channel::Rotate,
            frames
                .iter()
                .map(|f| f.transform.rotate.map(|deg| format!("{} 0 0", fmt_num(deg))))
                .collect(),
            "0 0 0",
        ),
        (
            Channel::Opacity,
            frames.iter().map(|f| f.opacity.map(fmt_num)).collect(),
            "0",
        ),
    ];

    let mut directives = Vec::new();
    for (channel, values, identity) in channels {
        if values.iter().all(Option::is_none) {
            continue;
        }
        let values = values
            .into_iter()
            .map(|v| v.unwrap_or_else(|| identity.to_string()))
            .collect();
        directives.push(directive(spec, channel, values, key_times.clone()));
    }

    if let Some(target) = gradient
        && let Some((values, times)) = gradient_offsets(keyframes, bounds, target)
    {
        directives.push(directive(spec, Channel::GradientTranslate, values, times));
    }

    log::debug!(target:"Animation::Compile", "`{}` compiled into {} directives", spec.name, directives.len());
    directives
}

fn directive(spec: &AnimationSpec, channel: Channel, values: Vec<String>, key_times: Vec<f32>) -> AnimationDirective {
    let mut directive = AnimationDirective {
        channel,
        values,
        key_times,
        duration: spec.duration,
        repeat: spec.iteration_count,
        begin: spec.delay,
        freeze: spec.fill_mode.holds_end(),
        discrete: spec.timing_function.is_discrete(),
    };
    apply_direction(&mut directive, spec.direction);
    directive
}

/// `reverse` は値を逆順に、`alternate` は往復を1周期にまとめる
/// （周期が2倍になるので繰り返し回数は半分）
fn apply_direction(directive: &mut AnimationDirective, direction: Direction) {
    let alternates = matches!(direction, Direction::Alternate | Direction::AlternateReverse)
        && directive.repeat != IterationCount::Once;

    if matches!(direction, Direction::Reverse | Direction::AlternateReverse) {
        directive.values.reverse();
        directive.key_times = directive.key_times.iter().rev().map(|t| 1.0 - t).collect();
    }

    if alternates {
        let forward_values = directive.values.clone();
        let forward_times = directive.key_times.clone();

        directive.key_times = forward_times.iter().map(|t| t / 2.0).collect();
        for (value, time) in forward_values.iter().zip(&forward_times).rev().skip(1) {
            directive.values.push(value.clone());
            directive.key_times.push(1.0 - time / 2.0);
        }

        directive.duration *= 2.0;
        directive.repeat = match directive.repeat {
            IterationCount::Finite(n) => IterationCount::Finite(n / 2.0),
            other => other,
        };
    }
}

/// グラデーションの移動量。`background-position` の X を、背景サイズから
/// 求めた最大移動量に割り当てる。ループが途切れないよう最初の値で両端を補う。
fn gradient_offsets(
    keyframes: &[Keyframe],
    bounds: &Bounds,
    target: &GradientTarget,
) -> Option<(Vec<String>, Vec<f32>)> {
    let max_offset = bounds.bwidth * (target.size_percent / 100.0 - 1.0);
    let mut points: Vec<(f32, f32)> = keyframes
        .iter()
        .filter_map(|keyframe| {
            let position = keyframe.properties.get("background-position")?;
            let x = position_x_offset(position, max_offset)?;
            Some((keyframe.offset_percent / 100.0, x))
        })
        .collect();

    let (first_time, first_value) = *points.first()?;
    if first_time > 0.0 {
        points.insert(0, (0.0, first_value));
    }
    if points.last().is_some_and(|(t, _)| *t < 1.0) {
        points.push((1.0, first_value));
    }

    let values = points.iter().map(|(_, x)| pair(*x, 0.0)).collect();
    let times = points.iter().map(|(t, _)| *t).collect();
    Some((values, times))
}

fn position_x_offset(position: &str, max_offset: f32) -> Option<f32> {
    let first = split_top_level_whitespace(position).into_iter().next()?;
    let percent = match first.to_ascii_lowercase().as_str() {
        "left" => 0.0,
        "center" => 50.0,
        "right" => 100.0,
        other => match Length::from_css(other)? {
            Length::Percent(p) => p,
            Length::Auto => return None,
            length => return Some(length.to_px(0.0)),
        },
    };
    Some(-(percent / 100.0) * max_offset)
}

fn parse_opacity(value: &str) -> Option<f32> {
    let value = value.trim();
    let opacity = match value.strip_suffix('%') {
        Some(p) => parse_number(p)? / 100.0,
        None => parse_number(value)?,
    };
    Some(opacity.clamp(0.0, 1.0))
}

fn pair(a: f32, b: f32) -> String {
    format!("{} {}", fmt_num(a), fmt_num(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::css;
    use crate::engine::css::values::Edges;
    use crate::engine::styler::{ResolvedStyle, StyleResolver};
    use crate::engine::html::Element;

    fn bounds() -> Bounds {
        Bounds::new(0.0, 0.0, 200.0, 100.0, &Edges::default())
    }

    fn compile_css(stylesheet: &str) -> CompiledAnimation {
        let sheet = css::parse(stylesheet);
        let resolver = StyleResolver::new(&sheet);
        let resolved: ResolvedStyle = resolver.resolve(&Element::new("div"), None);
        let style = ComputedStyle::compute(&resolved);
        compile_element(&style, &sheet, &bounds())
    }

    #[test]
    fn spin_rotates_full_turn() {
        let compiled = compile_css(
            "@keyframes spin{from{transform:rotate(0deg)}to{transform:rotate(360deg)}} div{animation:spin 2s infinite}",
        );
        assert_eq!(compiled.directives.len(), 1);
        let rotate = &compiled.directives[0];
        assert_eq!(rotate.channel, Channel::Rotate);
        assert_eq!(rotate.values_attr(), "0 0 0;360 0 0");
        assert_eq!(rotate.key_times_attr(), "0;1");
        assert_eq!(rotate.dur_attr(), "2s");
        assert_eq!(rotate.repeat_count_attr(), "indefinite");
        assert!(compiled.has_transform());
    }

    #[test]
    fn missing_channel_values_use_identity() {
        let compiled = compile_css(
            "@keyframes pop { 0% { transform: scale(1) } 50% { transform: scale(1.2) translateY(-10%) } 100% { opacity: .5 } }
             div { animation: pop 1s 2 }",
        );
        let channels: Vec<Channel> = compiled.directives.iter().map(|d| d.channel).collect();
        assert_eq!(channels, vec![Channel::Translate, Channel::Scale, Channel::Opacity]);

        let translate = &compiled.directives[0];
        assert_eq!(translate.values, vec!["0 0", "0 -10", "0 0"]);
        let scale = &compiled.directives[1];
        assert_eq!(scale.values, vec!["1 1", "1.2 1.2", "1 1"]);
        let opacity = &compiled.directives[2];
        assert_eq!(opacity.values, vec!["0", "0", "0.5"]);
        assert!(compiled.directives.iter().all(|d| d.key_times.len() == d.values.len()));
        assert_eq!(opacity.repeat_count_attr(), "2");
    }

    #[test]
    fn pads_missing_ends() {
        let compiled = compile_css("@keyframes blink { 50% { opacity: 1 } } div { animation: blink 1s }");
        let blink = &compiled.directives[0];
        assert_eq!(blink.key_times_attr(), "0;0.5;1");
        assert_eq!(blink.values_attr(), "0;1;0");
        assert_eq!(blink.repeat_count_attr(), "1");
    }

    #[test]
    fn opacity_defaults_to_zero_where_unset() {
        let compiled = compile_css("@keyframes a { from { transform: scale(1) } to { opacity: 1 } } div { animation: a 1s }");
        let opacity = compiled.by_channel(Channel::Opacity).next().map(|d| d.values_attr());
        assert_eq!(opacity.as_deref(), Some("0;1"));
    }

    #[test]
    fn unknown_name_and_zero_duration_emit_nothing() {
        assert!(compile_css("div { animation: nothing 1s }").is_empty());
        assert!(compile_css("@keyframes a { to { opacity: 0 } } div { animation: a 0s }").is_empty());
        assert!(compile_css("@keyframes a { to { opacity: 0 } } div { animation: a }").is_empty());
    }

    #[test]
    fn delay_and_fill_mode() {
        let compiled = compile_css("@keyframes a { to { opacity: 0 } } div { animation: a 1s 250ms forwards }");
        let fade = &compiled.directives[0];
        assert_eq!(fade.begin, 0.25);
        assert!(fade.freeze);
    }

    #[test]
    fn reverse_and_alternate() {
        let compiled = compile_css("@keyframes a { from { opacity: 0 } to { opacity: 1 } } div { animation: a 1s reverse }");
        assert_eq!(compiled.directives[0].values_attr(), "1;0");
        assert_eq!(compiled.directives[0].key_times_attr(), "0;1");

        let compiled =
            compile_css("@keyframes a { from { opacity: 0 } to { opacity: 1 } } div { animation: a 1s alternate infinite }");
        let alt = &compiled.directives[0];
        assert_eq!(alt.values_attr(), "0;1;0");
        assert_eq!(alt.key_times_attr(), "0;0.5;1");
        assert_eq!(alt.dur_attr(), "2s");

        let compiled =
            compile_css("@keyframes a { from { opacity: 0 } to { opacity: 1 } } div { animation: a 1s alternate 4 }");
        assert_eq!(compiled.directives[0].repeat_count_attr(), "2");
    }

    #[test]
    fn shimmer_moves_gradient() {
        let compiled = compile_css(
            "@keyframes shimmer { 0% { background-position: 0% 50% } 50% { background-position: 100% 50% } }
             div { background: linear-gradient(90deg, #333, #555); background-size: 400% 400%; animation: shimmer 3s infinite }",
        );
        let shimmer: Vec<&AnimationDirective> = compiled.by_channel(Channel::GradientTranslate).collect();
        assert_eq!(shimmer.len(), 1);
        // 200 * (4 - 1) = 600
        assert_eq!(shimmer[0].values_attr(), "0 0;-600 0;0 0");
        assert_eq!(shimmer[0].key_times_attr(), "0;0.5;1");
        assert!(!compiled.has_transform());
    }

    #[test]
    fn background_position_without_gradient_is_ignored() {
        let compiled = compile_css(
            "@keyframes move { to { background-position: 100% 0 } } div { background: red; animation: move 1s }",
        );
        assert!(compiled.is_empty());
    }
}
