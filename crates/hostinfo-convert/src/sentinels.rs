//! Placeholder detection and the virtualization override.
//!
//! Sentinel sets belong to each converter. This module only provides
//! the matching helpers; each converter declares its own list.

use crate::models::ConverterResult;

/// `type` value written for virtual machines.
pub const VIRTUAL_TYPE: &str = "virtual";

/// `vmtype` value written for virtual machines.
pub const VIRTUAL_VMTYPE: &str = "vmware";

/// Returns true for an empty or whitespace-only value.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns true if `value` equals one of `sentinels`, ignoring case and
/// surrounding whitespace.
pub fn is_sentinel(value: &str, sentinels: &[&str]) -> bool {
    let value = value.trim();
    sentinels.iter().any(|s| s.eq_ignore_ascii_case(value))
}

/// Returns the fixed virtual-machine attribute pair if `value` mentions
/// `virtual` anywhere, case-insensitively.
pub fn virtual_override(value: &str) -> Option<ConverterResult> {
    if value.to_ascii_lowercase().contains("virtual") {
        Some(ConverterResult::fanout([
            ("type", VIRTUAL_TYPE),
            ("vmtype", VIRTUAL_VMTYPE),
        ]))
    } else {
        None
    }
}

/// Replaces spaces with underscores so values stay token-safe.
pub fn tokenize(value: &str) -> String {
    value.replace(' ', "_")
}
