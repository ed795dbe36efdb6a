//! Operating system and OS revision converters.
//!
//! Free-text OS descriptions are split into a family (`os`) and a detail
//! (`osrev`). A value that is already a known family is returned as-is,
//! which keeps the converter idempotent over its own output.

use crate::converter::Converter;
use crate::models::{ConvertWarning, ConverterResult, Outcome};
use crate::sentinels::is_blank;

/// Families that short-circuit classification.
pub const OS_FAMILIES: &[&str] = &["solaris", "netware", "aix", "linux", "windows"];

const OS_ALIASES: &[&str] = &["os", "operating system", "operatingsystem", "os version", "o/s"];

const OSREV_ALIASES: &[&str] = &["osrev", "osver", "revision"];

/// Converter for the `os` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsConverter;

impl Converter for OsConverter {
    fn key(&self) -> &str {
        "os"
    }

    fn aliases(&self) -> &[&str] {
        OS_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::empty();
        };
        let value = raw.trim();
        if value.is_empty() {
            return Outcome::empty();
        }
        // "-" means the OS is known to be absent, so it is written as empty.
        if value == "-" {
            return ConverterResult::scalar("").into();
        }

        if let Some(family) = OS_FAMILIES.iter().find(|f| f.eq_ignore_ascii_case(value)) {
            return ConverterResult::scalar(*family).into();
        }

        if value.to_ascii_lowercase().contains("windows") {
            return ConverterResult::fanout([("os", "windows"), ("osrev", value)]).into();
        }

        match split_family(value) {
            Some((family, detail)) => {
                let family = family.to_ascii_lowercase();
                ConverterResult::fanout([("os", family.as_str()), ("osrev", detail)]).into()
            }
            None => Outcome::warned(
                ConverterResult::scalar(raw),
                ConvertWarning::unknown(self.key(), raw),
            ),
        }
    }
}

/// Splits on the first whitespace run into `(family, detail)`.
fn split_family(value: &str) -> Option<(&str, &str)> {
    let idx = value.find(char::is_whitespace)?;
    let (family, rest) = value.split_at(idx);
    let detail = rest.trim_start();
    if detail.is_empty() {
        None
    } else {
        Some((family, detail))
    }
}

/// Converter for the `osrev` key.
///
/// Repairs revisions mangled by spreadsheet exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRevConverter;

impl Converter for OsRevConverter {
    fn key(&self) -> &str {
        "osrev"
    }

    fn aliases(&self) -> &[&str] {
        OSREV_ALIASES
    }

    fn convert(&self, raw: Option<&str>) -> Outcome {
        match raw {
            None => Outcome::empty(),
            Some(value) if is_blank(value) => Outcome::empty(),
            Some(value) => match value.trim() {
                "2003" => ConverterResult::scalar("server_2003").into(),
                // Spreadsheets turn Solaris 5.10 into the number 5.1
                "5.1" => ConverterResult::scalar("5.10").into(),
                _ => ConverterResult::scalar(value).into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(raw: &str) -> Outcome {
        OsConverter.convert(Some(raw))
    }

    #[test]
    fn test_known_family_is_scalar() {
        assert_eq!(os("linux").result, ConverterResult::scalar("linux"));
        assert_eq!(os("Solaris").result, ConverterResult::scalar("solaris"));
    }

    #[test]
    fn test_generic_split() {
        assert_eq!(
            os("redhat 7.2").result,
            ConverterResult::fanout([("os", "redhat"), ("osrev", "7.2")])
        );
    }

    #[test]
    fn test_split_on_whitespace_run() {
        assert_eq!(
            os("suse \t 11 sp2").result,
            ConverterResult::fanout([("os", "suse"), ("osrev", "11 sp2")])
        );
    }

    #[test]
    fn test_windows_keeps_whole_string() {
        assert_eq!(
            os("windows 2012 r2").result,
            ConverterResult::fanout([("os", "windows"), ("osrev", "windows 2012 r2")])
        );
        assert_eq!(
            os("microsoft windows server").result,
            ConverterResult::fanout([("os", "windows"), ("osrev", "microsoft windows server")])
        );
    }

    #[test]
    fn test_windows_revision_is_trimmed() {
        assert_eq!(
            os("  Windows 2012  ").result,
            ConverterResult::fanout([("os", "windows"), ("osrev", "Windows 2012")])
        );
    }

    #[test]
    fn test_dash_is_explicit_empty() {
        assert_eq!(os("-").result, ConverterResult::scalar(""));
        assert!(os("-").warning.is_none());
    }

    #[test]
    fn test_absent_is_empty() {
        assert!(OsConverter.convert(None).result.is_empty());
        assert!(os("").result.is_empty());
    }

    #[test]
    fn test_unknown_single_token_warns() {
        let outcome = os("hpux");
        assert_eq!(outcome.result, ConverterResult::scalar("hpux"));
        assert_eq!(outcome.warning, Some(ConvertWarning::unknown("os", "hpux")));
    }

    #[test]
    fn test_osrev_repairs() {
        assert_eq!(
            OsRevConverter.convert(Some("2003")).result,
            ConverterResult::scalar("server_2003")
        );
        assert_eq!(
            OsRevConverter.convert(Some("5.1")).result,
            ConverterResult::scalar("5.10")
        );
        assert_eq!(
            OsRevConverter.convert(Some("7.2")).result,
            ConverterResult::scalar("7.2")
        );
        assert!(OsRevConverter.convert(None).result.is_empty());
    }
}
