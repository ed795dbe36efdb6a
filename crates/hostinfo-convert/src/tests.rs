//! # Cross-Converter Properties
//!
//! Behaviour that must hold across the whole registry rather than a single
//! converter:
//!
//! 1. **Idempotence**: canonical output converts to itself
//! 2. **Sentinels**: placeholders write nothing (OS `-` excepted)
//! 3. **Virtualization**: `virtual` wins over every other rule
//! 4. **Warnings**: unknown values survive verbatim

use crate::models::{CanonicalAttribute, ConvertWarning, ConverterResult};
use crate::os::OS_FAMILIES;
use crate::registry::ConverterRegistry;

fn attrs(pairs: &[(&str, &str)]) -> Vec<CanonicalAttribute> {
    pairs
        .iter()
        .map(|(k, v)| CanonicalAttribute::new(*k, *v))
        .collect()
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_os_family_idempotent() {
    let registry = ConverterRegistry::builtin();
    for family in OS_FAMILIES {
        let once = registry.convert("os", Some(*family));
        assert_eq!(once.attributes, attrs(&[("os", *family)]));
        let value = once.get("os").unwrap();
        let twice = registry.convert("os", Some(value));
        assert_eq!(once, twice, "family {} should not be re-split", family);
    }
}

#[test]
fn test_tag_converters_idempotent() {
    let registry = ConverterRegistry::builtin();
    for (alias, raw) in [
        ("service", "ou=web farm"),
        ("class", "ou=prd"),
        ("rack", "row a 12/ru4"),
        ("osrev", "5.1"),
    ] {
        let once = registry.convert(alias, Some(raw));
        let key = once.key.clone();
        let value = once.get(&key).unwrap().to_string();
        let twice = registry.convert(alias, Some(&value));
        assert_eq!(twice.get(&key), Some(value.as_str()), "{} {}", alias, raw);
        assert!(twice.warnings.is_empty());
    }
}

#[test]
fn test_hardware_fanout_idempotent() {
    let registry = ConverterRegistry::builtin();
    for raw in ["HP ProLiant DL380 G5", "Sun Fire V240", "Cisco Catalyst 3750", "generic x86 box"] {
        let once = registry.convert("model", Some(raw));
        let stored = once.get("hwdesc").unwrap();
        for again in [stored.to_string(), stored.to_lowercase()] {
            let twice = registry.convert("hwdesc", Some(&again));
            assert!(twice.warnings.is_empty(), "{}", again);
            assert_eq!(twice.get("hardware"), once.get("hardware"), "{}", again);
            assert_eq!(twice.get("type"), once.get("type"), "{}", again);
            assert_eq!(twice.get("hwdesc"), Some(again.as_str()));
        }
    }
}

#[test]
fn test_site_idempotent() {
    let registry = ConverterRegistry::builtin();
    for raw in ["QV", "co-lo", "Sydney", "151 Lonsdale"] {
        let once = registry.convert("site", Some(raw));
        let site = once.get("site").unwrap().to_string();
        let twice = registry.convert("site", Some(&site));
        assert_eq!(once, twice, "{}", raw);
        assert!(twice.warnings.is_empty());
    }
}

#[test]
fn test_dst_patched_idempotent() {
    let registry = ConverterRegistry::builtin();
    for raw in ["0", "x"] {
        let once = registry.convert("tz test", Some(raw));
        let twice = registry.convert("dst_patched", once.get("dst_patched"));
        assert_eq!(once, twice, "{}", raw);
    }
}

// =============================================================================
// Sentinel Discard
// =============================================================================

#[test]
fn test_absent_value_writes_nothing() {
    let registry = ConverterRegistry::builtin();
    for alias in [
        "os",
        "osrev",
        "site",
        "hwdesc",
        "service",
        "class",
        "rack",
        "dst_patched",
        "buserver",
        "serial",
        "asset tag",
    ] {
        let conversion = registry.convert(alias, None);
        assert!(conversion.is_empty(), "{} with None", alias);
        assert!(conversion.warnings.is_empty());
    }
}

#[test]
fn test_per_converter_sentinels() {
    let registry = ConverterRegistry::builtin();
    for (alias, raw) in [
        ("site", "n/a"),
        ("site", "none"),
        ("hwdesc", "none"),
        ("hwdesc", "???"),
    ] {
        let conversion = registry.convert(alias, Some(raw));
        assert!(conversion.is_empty(), "{}={}", alias, raw);
        assert!(conversion.warnings.is_empty(), "{}={}", alias, raw);
    }
}

#[test]
fn test_os_dash_is_explicit_empty() {
    let registry = ConverterRegistry::builtin();
    let conversion = registry.convert("o/s", Some("-"));
    assert_eq!(conversion.attributes, attrs(&[("os", "")]));
}

#[test]
fn test_sentinels_are_not_global() {
    // "n/a" is a site placeholder but means nothing special to hwdesc.
    let registry = ConverterRegistry::builtin();
    let conversion = registry.convert("hwdesc", Some("n/a"));
    assert_eq!(conversion.attributes, attrs(&[("hwdesc", "n/a")]));
    assert_eq!(conversion.warnings.len(), 1);
}

// =============================================================================
// Virtualization Precedence
// =============================================================================

#[test]
fn test_virtual_pair_everywhere_it_applies() {
    let registry = ConverterRegistry::builtin();
    let expected = attrs(&[("type", "virtual"), ("vmtype", "vmware")]);
    for alias in ["site", "hwdesc", "model", "location"] {
        for raw in ["virtual xen clone", "VMware Virtual Platform", "VIRTUAL"] {
            let conversion = registry.convert(alias, Some(raw));
            assert_eq!(conversion.attributes, expected, "{}={}", alias, raw);
            assert!(conversion.warnings.is_empty());
        }
    }
}

// =============================================================================
// Splits, Overrides and Fan-out
// =============================================================================

#[test]
fn test_split_through_registry() {
    let registry = ConverterRegistry::builtin();
    let conversion = registry.convert("OS Version", Some("redhat 7.2"));
    assert_eq!(conversion.attributes, attrs(&[("os", "redhat"), ("osrev", "7.2")]));
}

#[test]
fn test_windows_through_registry() {
    let registry = ConverterRegistry::builtin();
    let conversion = registry.convert("operating system", Some("windows 2012 r2"));
    assert_eq!(
        conversion.attributes,
        attrs(&[("os", "windows"), ("osrev", "windows 2012 r2")])
    );
}

#[test]
fn test_hardware_fanout_sizes() {
    let registry = ConverterRegistry::builtin();
    assert_eq!(
        registry.convert("model", Some("Sun Fire V240")).attributes,
        attrs(&[("hardware", "v240"), ("hwdesc", "Sun_Fire_V240"), ("type", "server")])
    );
    assert_eq!(
        registry.convert("model", Some("Sun Ultra 10")).attributes.len(),
        2
    );
    assert_eq!(
        registry.convert("model", Some("Mystery Box")).attributes,
        attrs(&[("hwdesc", "Mystery Box")])
    );
}

// =============================================================================
// Warnings
// =============================================================================

#[test]
fn test_site_lookup_and_warning() {
    let registry = ConverterRegistry::builtin();

    let qv = registry.convert("Location (Site)", Some("QV"));
    assert_eq!(qv.attributes, attrs(&[("site", "222lonsdale")]));
    assert!(qv.warnings.is_empty());

    let nowhere = registry.convert("site", Some("Nowhere Pty Ltd"));
    assert_eq!(nowhere.attributes, attrs(&[("site", "Nowhere Pty Ltd")]));
    assert_eq!(
        nowhere.warnings,
        vec![ConvertWarning::UnmappedSite {
            value: "Nowhere Pty Ltd".to_string()
        }]
    );
}

#[test]
fn test_converters_are_shareable() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}
    let registry = ConverterRegistry::builtin();
    for converter in registry.converters() {
        assert_send_sync(&converter);
        // Same input, same output.
        assert_eq!(
            converter.convert(Some("linux")),
            converter.convert(Some("linux"))
        );
    }
    assert!(!ConverterResult::scalar("x").is_empty());
}
