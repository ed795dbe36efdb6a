//! Converters for label-like keys.
//!
//! | Key | Normalization |
//! |-----|---------------|
//! | `service` | Spaces to `_`, `ou=` prefix dropped |
//! | `class` | One of [`CLASSES`] found in the value |
//! | `rack` | Rack-unit suffix dropped |
//! | `dst_patched` | Timezone test marks to `tested` or `failed_test` |
//! | `buserver` | First of [`BACKUP_SERVERS`] named in the value |
//!
//! These are mostly character substitution. Values end up as single
//! tokens so they can be used in queries and generated links.

use crate::converter::Converter;
use crate::models::{ConvertWarning, ConverterResult, Outcome};
use crate::sentinels::{is_blank, tokenize};

const SERVICE_ALIASES: &[&str] = &["service", "environment", "application"];

const CLASS_ALIASES: &[&str] = &["class"];

const RACK_ALIASES: &[&str] = &["rack", "rack/ru"];

const DST_PATCHED_ALIASES: &[&str] = &["tz test"];

const BUSERVER_ALIASES: &[&str] = &["backup up?", "backup system"];

/// Backup servers recognised inside a free-text backup column, in priority
/// order.
pub const BACKUP_SERVERS: &[&str] = &[
    "sunbak03",
    "c1-ntx-back1p",
    "lp-ntx-back01",
    "mg-ntx-back01",
    "c1-ntx-back2p",
];

/// Classes recognised anywhere inside a value, in priority order.
pub const CLASSES: &[&str] = &["dev", "prod", "staging", "test"];

/// Converter for the `service` key.
///
/// Strips the `ou=` prefix left over from directory exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceConverter;

impl Converter for ServiceConverter {
    fn key(&self) -> &str {
        "service"
    }

    fn aliases(&self) -> &[&str] {
        SERVICE_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        match raw {
            Some(value) if !is_blank(value) => {
                let value = tokenize(value.trim());
                let value = value.strip_prefix("ou=").unwrap_or(value.as_str());
                ConverterResult::scalar(value).into()
            }
            _ => Outcome::empty(),
        }
    }
}

/// Converter for the `class` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassConverter;

impl Converter for ClassConverter {
    fn key(&self) -> &str {
        "class"
    }

    fn aliases(&self) -> &[&str] {
        CLASS_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::empty();
        };
        if is_blank(raw) {
            return Outcome::empty();
        }
        let lower = raw.trim().to_ascii_lowercase();
        let class = match lower.as_str() {
            "ou=dev" => Some("dev"),
            "ou=prd" => Some("prod"),
            _ => CLASSES.iter().copied().find(|class| lower.contains(class)),
        };
        match class {
            Some(class) => ConverterResult::scalar(class).into(),
            None => Outcome::warned(
                ConverterResult::scalar(raw),
                ConvertWarning::unknown(self.key(), raw),
            ),
        }
    }
}

/// Converter for the `rack` key.
///
/// Drops a trailing rack-unit position (`r12/ru4` becomes `r12`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RackConverter;

impl Converter for RackConverter {
    fn key(&self) -> &str {
        "rack"
    }

    fn aliases(&self) -> &[&str] {
        RACK_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::empty();
        };
        let mut value = raw.trim();
        if let Some(idx) = value.to_ascii_lowercase().find("/ru") {
            value = value[..idx].trim_end();
        }
        if value.is_empty() {
            return Outcome::empty();
        }
        ConverterResult::scalar(tokenize(value)).into()
    }
}

/// Converter for the `dst_patched` key.
///
/// The timezone test sheet marks a pass with `0` and a failure with `x` or
/// `2`. Anything else means the host was not tested.
#[derive(Debug, Clone, Copy, Default)]
pub struct DstPatchedConverter;

impl Converter for DstPatchedConverter {
    fn key(&self) -> &str {
        "dst_patched"
    }

    fn aliases(&self) -> &[&str] {
        DST_PATCHED_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let value = raw.map(str::trim).unwrap_or_default().to_ascii_lowercase();
        match value.as_str() {
            "0" | "tested" => ConverterResult::scalar("tested").into(),
            "x" | "2" | "failed_test" => ConverterResult::scalar("failed_test").into(),
            _ => Outcome::empty(),
        }
    }
}

/// Converter for the `buserver` key.
///
/// Free text naming a known backup server becomes that server; other text
/// is kept as typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackupServerConverter;

impl Converter for BackupServerConverter {
    fn key(&self) -> &str {
        "buserver"
    }

    fn aliases(&self) -> &[&str] {
        BUSERVER_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::empty();
        };
        if is_blank(raw) {
            return Outcome::empty();
        }
        let lower = raw.to_ascii_lowercase();
        match BACKUP_SERVERS.iter().find(|server| lower.contains(*server)) {
            Some(server) => ConverterResult::scalar(*server).into(),
            None => ConverterResult::scalar(raw.trim()).into(),
        }
    }
}
