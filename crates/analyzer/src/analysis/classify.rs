//! Classify — routes an entry to at most one specialised analyzer.
//!
//! Rules run in a fixed precedence, first match wins. A message may carry
//! several markers at once (an event trace mentioning storage.json, say),
//! so the order is part of the contract.

use super::model::{AnalysisKind, AnalyzableEntry};

pub const EVENT_TRACE_MARKER: &str = "ssoEventData";
pub const STORAGE_FILE_MARKER: &str = "storage.json";
pub const ERROR_ENTRY_TYPE: &str = "error";

pub const APP_START_BANNER: &str = "Starting app Teams";
pub const SESSION_SET_BANNER: &str = "Setting app session to";
pub const RING_BANNER: &str = "User ring is";
pub const TENANT_SWITCH_BANNER: &str = "Switching tenant:";

pub const METADATA_BANNERS: [&str; 4] = [
    APP_START_BANNER,
    SESSION_SET_BANNER,
    RING_BANNER,
    TENANT_SWITCH_BANNER,
];

pub fn classify<'a>(entry_type: &str, message: &'a str) -> AnalyzableEntry<'a> {
    let kind = if message.contains(EVENT_TRACE_MARKER) {
        AnalysisKind::EventTrace
    } else if entry_type == ERROR_ENTRY_TYPE && message.contains(STORAGE_FILE_MARKER) {
        AnalysisKind::Storage
    } else if METADATA_BANNERS.iter().any(|banner| message.contains(banner)) {
        AnalysisKind::Metadata
    } else {
        AnalysisKind::NotApplicable
    };

    AnalyzableEntry::new(kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_trace_wins_over_metadata() {
        let message = "ssoEventData:t::acq:x; Starting app Teams, version: 1";
        assert_eq!(classify("event", message).kind, AnalysisKind::EventTrace);
    }

    #[test]
    fn test_event_trace_wins_over_storage() {
        let message = "ssoEventData:t::sfp:s storage.json";
        assert_eq!(classify("error", message).kind, AnalysisKind::EventTrace);
    }

    #[test]
    fn test_storage_requires_error_type() {
        let message = "Error occurred while opening storage.json";
        assert_eq!(classify("error", message).kind, AnalysisKind::Storage);
        assert_eq!(classify("warning", message).kind, AnalysisKind::NotApplicable);
    }

    #[test]
    fn test_storage_wins_over_metadata() {
        let message = "User ring is general . storage.json";
        assert_eq!(classify("error", message).kind, AnalysisKind::Storage);
        assert_eq!(classify("info", message).kind, AnalysisKind::Metadata);
    }

    #[test]
    fn test_each_metadata_banner() {
        for banner in METADATA_BANNERS {
            let message = format!("prefix {} suffix", banner);
            assert_eq!(classify("info", &message).kind, AnalysisKind::Metadata, "{}", banner);
        }
    }

    #[test]
    fn test_not_applicable_keeps_message() {
        let entry = classify("info", "Window focused");
        assert!(!entry.is_applicable());
        assert_eq!(entry.message, "Window focused");
    }

    #[test]
    fn test_tenant_banner_needs_colon() {
        assert_eq!(classify("info", "Switching tenant now").kind, AnalysisKind::NotApplicable);
    }
}
