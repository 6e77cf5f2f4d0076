//! Parsed stylesheet: selector rules and `@keyframes` sets.

use std::collections::{BTreeMap, HashMap};

/// Property name → raw value. Keys are unique; the last write wins.
pub type DeclarationMap = BTreeMap<String, String>;

/// One `<offset> { ... }` block of an `@keyframes` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// 0.0 ..= 100.0 (`from` = 0, `to` = 100)
    pub offset_percent: f32,
    pub properties: DeclarationMap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// `tag` / `.class` / `#id` (or any other selector text, which is kept but never matched)
    pub rules: HashMap<String, DeclarationMap>,
    /// Animation name → keyframes sorted ascending by offset
    pub keyframe_sets: HashMap<String, Vec<Keyframe>>,
}

impl Stylesheet {
    pub fn rule(&self, selector: &str) -> Option<&DeclarationMap> {
        self.rules.get(selector)
    }

    pub fn keyframes(&self, name: &str) -> Option<&[Keyframe]> {
        self.keyframe_sets.get(name).map(Vec::as_slice)
    }

    /// Adds declarations for `selector`, overwriting colliding properties.
    pub fn add_rule(&mut self, selector: &str, declarations: &DeclarationMap) {
        self.rules
            .entry(selector.to_string())
            .or_default()
            .extend(declarations.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Appends `other` as if its text followed this stylesheet's text.
    pub fn merge(&mut self, other: Stylesheet) {
        for (selector, declarations) in &other.rules {
            self.add_rule(selector, declarations);
        }
        self.keyframe_sets.extend(other.keyframe_sets);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.keyframe_sets.is_empty()
    }
}
