//! # Site Name Normalization
//!
//! Sites are a small closed set with a long history of synonyms: merged
//! buildings, renamed offices, and the occasional street number typed one
//! off. A lookup table handles that better than any heuristic.
//!
//! ## Rules
//!
//! 1. Anything mentioning `virtual` is a VM, not a site.
//! 2. `n/a` and `none` mean no site; nothing is written.
//! 3. The lowercased name is looked up in [`SITE_TABLE`]; a canonical site
//!    maps to itself.
//! 4. Misses are passed through unchanged with an `UnmappedSite` warning so
//!    the operator can see and correct them later.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::converter::Converter;
use crate::models::{ConvertWarning, ConverterResult, Outcome};
use crate::sentinels::{is_blank, is_sentinel, virtual_override};

const SITE_ALIASES: &[&str] = &["site", "location (site)", "location"];

const SITE_SENTINELS: &[&str] = &["n/a", "none"];

/// Known site names and the canonical site each maps to.
pub const SITE_TABLE: &[(&str, &str)] = &[
    ("victoria gardens", "678victoria"),
    ("vg", "678victoria"),
    ("vic.gardens", "678victoria"),
    ("qv", "222lonsdale"),
    ("surry hills", "268canterbury"),
    ("melbourne central e.i.s", "360lonsdale"),
    ("lp - liverpool st", "175liverpool"),
    ("liverpool st", "175liverpool"),
    ("175 liverpool st", "175liverpool"),
    ("sydney", "175liverpool"),
    ("co-lo exhibition street", "300exhibition"),
    ("co-lo", "300exhibition"),
    ("colo", "300exhibition"),
    ("300 exhibition st", "300exhibition"),
    ("exhibition st", "300exhibition"),
    ("george st", "580george"),
    ("dr site", "1822dandenong"),
    ("clayton", "1822dandenong"),
    ("150 lonsdale st", "150lonsdale"),
    ("150 lonsdale", "150lonsdale"),
    // Off-by-one street numbers seen in the wild
    ("151 lonsdale", "150lonsdale"),
    ("152 lonsdale", "150lonsdale"),
    ("8 govan", "8govan"),
    ("303 montague st", "303montague"),
    ("brisbane", "151roma"),
    ("perth", "100hay"),
    ("hobart", "70collins"),
    ("adelaide", "30pirie"),
    ("wollongong", "90crown"),
];

static SITE_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        SITE_TABLE
            .iter()
            .flat_map(|&(name, site)| [(name, site), (site, site)])
            .collect()
    });

/// Returns the canonical site for a known name, ignoring case.
pub fn canonical_site(name: &str) -> Option<&'static str> {
    SITE_MAP.get(name.trim().to_lowercase().as_str()).copied()
}

/// Converter for the `site` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteConverter;

impl Converter for SiteConverter {
    fn key(&self) -> &str {
        "site"
    }

    fn aliases(&self) -> &[&str] {
        SITE_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::empty();
        };
        if let Some(vm) = virtual_override(raw) {
            return vm.into();
        }
        if is_blank(raw) || is_sentinel(raw, SITE_SENTINELS) {
            return Outcome::empty();
        }
        match canonical_site(raw) {
            Some(site) => ConverterResult::scalar(site).into(),
            None => Outcome::warned(
                ConverterResult::scalar(raw),
                ConvertWarning::UnmappedSite {
                    value: raw.to_string(),
                },
            ),
        }
    }
}
