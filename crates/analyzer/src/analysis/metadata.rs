//! Metadata — single-pattern field extraction from banner lines.
//!
//! The offsets below mirror the client's banner formats. If a banner stops
//! matching after a client update, treat it as a log-format version change
//! rather than widening the heuristics here.

use super::classify::{APP_START_BANNER, RING_BANNER, SESSION_SET_BANNER};
use super::traits::*;

const VERSION_LABEL: &str = "version";
const REASON_LABEL: &str = "reason";
/// Space-delimited token holding `isHomeTenant:<bool>` in tenant-switch lines.
const TENANT_FLAG_TOKEN_INDEX: usize = 4;
const TENANT_SWITCH_PREFIX: &str = "Switching tenant";

pub struct MetadataAnalyzer;

impl MetadataAnalyzer {
    /// Extract the fields of one banner line.
    pub fn extract(&self, message: &str) -> Option<Analysis> {
        let fields = if message.contains(APP_START_BANNER) {
            app_start_fields(message)?
        } else if message.contains(SESSION_SET_BANNER) {
            vec![(MetadataKey::WebAppSession, session_value(message)?)]
        } else if message.contains(RING_BANNER) {
            vec![(MetadataKey::UserRingInfo, ring_value(message)?)]
        } else if message.contains(TENANT_SWITCH_PREFIX) {
            vec![(MetadataKey::IsHomeTenant, home_tenant_value(message)?)]
        } else {
            return None;
        };

        Some(Analysis::metadata(fields))
    }
}

impl EntryAnalyzer for MetadataAnalyzer {
    fn analyze(&self, message: &str) -> Option<Vec<Analysis>> {
        self.extract(message).map(|analysis| vec![analysis])
    }

    fn kind(&self) -> AnalysisKind {
        AnalysisKind::Metadata
    }
}

/// `Starting app Teams, version: 1.6.00.1381, reason: manual`
fn app_start_fields(message: &str) -> Option<Vec<(MetadataKey, String)>> {
    let csv: Vec<&str> = message.split(',').collect();
    let version = labelled_value(csv.get(1)?, VERSION_LABEL)?;
    let reason = labelled_value(csv.get(2)?, REASON_LABEL)?;

    Some(vec![
        (MetadataKey::AppVersion, version),
        (MetadataKey::AppLaunchReason, reason),
    ])
}

/// Value following `label` plus its one-character separator.
fn labelled_value(field: &str, label: &str) -> Option<String> {
    let start = field.find(label)? + label.len() + 1;
    non_empty(field.get(start..)?)
}

fn session_value(message: &str) -> Option<String> {
    let start = message.find(SESSION_SET_BANNER)? + SESSION_SET_BANNER.len();
    non_empty(message.get(start..)?)
}

/// `User ring is general .` — the ring is the second-to-last token.
fn ring_value(message: &str) -> Option<String> {
    let tokens: Vec<&str> = message.split(' ').collect();
    let index = tokens.len().checked_sub(2)?;
    non_empty(tokens[index])
}

fn home_tenant_value(message: &str) -> Option<String> {
    let token = message.split(' ').nth(TENANT_FLAG_TOKEN_INDEX)?;
    let (_, value) = token.split_once(':')?;
    non_empty(value)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
