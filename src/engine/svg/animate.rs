//! SMIL アニメーション要素

use crate::engine::animation::AnimationDirective;
use crate::engine::share::number::fmt_num;

/// `<animateTransform>`。`additive` のときは同じ要素の他の変換に加算する。
pub fn animate_transform(directive: &AnimationDirective, attribute: &str, additive: bool) -> String {
    let kind = directive.channel.transform_type().unwrap_or("translate");
    let mut tag = format!(
        r#"<animateTransform attributeName="{}" attributeType="XML" type="{}""#,
        attribute, kind
    );
    tag.push_str(&timing_attrs(directive));
    if additive {
        tag.push_str(r#" additive="sum""#);
    }
    tag.push_str("/>");
    tag
}

pub fn animate_opacity(directive: &AnimationDirective) -> String {
    format!(r#"<animate attributeName="opacity"{}/>"#, timing_attrs(directive))
}

fn timing_attrs(directive: &AnimationDirective) -> String {
    let mut attrs = format!(
        r#" values="{}" keyTimes="{}" dur="{}" repeatCount="{}""#,
        directive.values_attr(),
        directive.key_times_attr(),
        directive.dur_attr(),
        directive.repeat_count_attr()
    );
    if directive.begin > 0.0 {
        attrs.push_str(&format!(r#" begin="{}s""#, fmt_num(directive.begin)));
    }
    if directive.freeze {
        attrs.push_str(r#" fill="freeze""#);
    }
    if directive.discrete {
        attrs.push_str(r#" calcMode="discrete""#);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::animation::{Channel, IterationCount};

    fn directive(channel: Channel) -> AnimationDirective {
        AnimationDirective {
            channel,
            values: vec!["0".into(), "360".into()],
            key_times: vec![0.0, 1.0],
            duration: 1.0,
            repeat: IterationCount::Infinite,
            begin: 0.0,
            freeze: false,
            discrete: false,
        }
    }

    #[test]
    fn rotate_is_additive() {
        let tag = animate_transform(&directive(Channel::Rotate), "transform", true);
        assert_eq!(
            tag,
            r#"<animateTransform attributeName="transform" attributeType="XML" type="rotate" values="0;360" keyTimes="0;1" dur="1s" repeatCount="indefinite" additive="sum"/>"#
        );
    }

    #[test]
    fn optional_timing_attributes() {
        let mut d = directive(Channel::Opacity);
        d.begin = 0.5;
        d.freeze = true;
        d.discrete = true;
        d.repeat = IterationCount::Finite(2.0);
        let tag = animate_opacity(&d);
        assert!(tag.contains(r#"repeatCount="2""#));
        assert!(tag.contains(r#"begin="0.5s""#));
        assert!(tag.contains(r#"fill="freeze""#));
        assert!(tag.contains(r#"calcMode="discrete""#));
    }
}
