//! Hardware description converter
//!
//! Keeps the imported description (`hwdesc`) and derives the coarse
//! `hardware` model and host `type` from it, so the rest of the system can
//! query categories without re-parsing free text.

use regex::Regex;
use std::sync::LazyLock;

use crate::converter::Converter;
use crate::models::{ConvertWarning, ConverterResult, Outcome};
use crate::sentinels::{is_blank, is_sentinel, tokenize, virtual_override};

const HWDESC_ALIASES: &[&str] = &[
    "hwdesc",
    "hardware",
    "hardware platform",
    "server type",
    "model",
    "item",
];

const HWDESC_SENTINELS: &[&str] = &["none", "???"];

/// What a hardware description resolved to. `None` fields are unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Host type, e.g. `server`, `switch`, `storage`.
    pub kind: Option<&'static str>,
    /// Hardware model, e.g. `dl380`, `v240`.
    pub hardware: Option<String>,
}

impl Classification {
    /// Returns true if neither type nor model resolved.
    pub fn is_unknown(&self) -> bool {
        self.kind.is_none() && self.hardware.is_none()
    }
}

/// A description pattern. Capture group 1, if present, names the model.
struct HardwareRule {
    pattern: Regex,
    kind: Option<&'static str>,
    prefix: &'static str,
}

impl HardwareRule {
    fn new(pattern: &str, kind: Option<&'static str>, prefix: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("hardware pattern must compile"),
            kind,
            prefix,
        }
    }

    fn classify(&self, description: &str) -> Option<Classification> {
        let captures = self.pattern.captures(description)?;
        let model = captures.get(1).map(|m| {
            let name: String = m
                .as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            format!("{}{}", self.prefix, name.to_ascii_lowercase())
        });
        let hardware = match model {
            Some(model) => Some(model),
            None if !self.prefix.is_empty() => Some(self.prefix.to_string()),
            None => None,
        };
        Some(Classification {
            kind: self.kind,
            hardware,
        })
    }
}

// First match wins, so specific families come before generic ones.
static RULES: LazyLock<Vec<HardwareRule>> = LazyLock::new(|| {
    vec![
        HardwareRule::new(r"(?i)\b(bl\d{3}[a-z]?)\b", Some("blade"), ""),
        HardwareRule::new(r"(?i)\bproliant\s+((?:dl|ml)\s?\d{3})", Some("server"), ""),
        HardwareRule::new(r"(?i)\b((?:dl|ml)\d{3})\b", Some("server"), ""),
        HardwareRule::new(r"(?i)\bpoweredge\s+([a-z]?\d{3,4})", Some("server"), ""),
        HardwareRule::new(r"(?i)\bsun\s*fire\s+([a-z]?\d+)", Some("server"), ""),
        HardwareRule::new(r"(?i)\bnetra\s+([a-z]?\d+)", Some("server"), "netra"),
        HardwareRule::new(r"(?i)\benterprise\s+([mt]\d{4})", Some("server"), ""),
        HardwareRule::new(r"(?i)\bcatalyst\s+(\d{4})", Some("switch"), "catalyst"),
        HardwareRule::new(r"(?i)\bnexus\s+(\d{4})", Some("switch"), "nexus"),
        HardwareRule::new(r"(?i)\b(asa\s?\d{4})", Some("firewall"), ""),
        HardwareRule::new(r"(?i)\b(fas\s?\d{3,4})", Some("storage"), ""),
        HardwareRule::new(r"(?i)\b(cx\d{3})\b", Some("disk"), ""),
        HardwareRule::new(r"(?i)\bbig-?ip\s*(\d{4})", Some("loadbalancer"), "bigip"),
        HardwareRule::new(r"(?i)\bcisco\s+(\d{4})\b", Some("router"), "cisco"),
        HardwareRule::new(r"(?i)\bultra\s*(\d+)\b", None, "ultra"),
        HardwareRule::new(r"(?i)\bblade\b", Some("blade"), ""),
        HardwareRule::new(r"(?i)\b(?:x86|intel|amd64)\b", Some("server"), ""),
    ]
});

/// Classifies a free-text hardware description.
///
/// Underscores read as spaces, so a stored `hwdesc` classifies the same as
/// the description it came from.
pub fn classify(description: &str) -> Classification {
    let description = description.replace('_', " ");
    RULES
        .iter()
        .find_map(|rule| rule.classify(&description))
        .unwrap_or_default()
}

/// Converter for the `hwdesc` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareConverter;

impl Converter for HardwareConverter {
    fn key(&self) -> &str {
        "hwdesc"
    }

    fn aliases(&self) -> &[&str] {
        HWDESC_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::empty();
        };
        if let Some(vm) = virtual_override(raw) {
            return vm.into();
        }
        if is_blank(raw) || is_sentinel(raw, HWDESC_SENTINELS) {
            return Outcome::empty();
        }

        let classification = classify(raw);
        if classification.is_unknown() {
            return Outcome::warned(
                ConverterResult::scalar(raw),
                ConvertWarning::unknown(self.key(), raw),
            );
        }

        let mut pairs = vec![("hwdesc", tokenize(raw))];
        if let Some(hardware) = classification.hardware {
            pairs.push(("hardware", hardware));
        }
        if let Some(kind) = classification.kind {
            pairs.push(("type", kind.to_string()));
        }
        ConverterResult::fanout(pairs).into()
    }
}
