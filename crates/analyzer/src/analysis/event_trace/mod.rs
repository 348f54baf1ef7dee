//! Event trace — decoder for the compact `ssoEventData` auth trace.
//!
//! ```text
//! ssoEventData: <title>::acq:https://resource;fp:s;sso_default_fail;caa2000c;200
//! ```
//!
//! Marks are decoded strictly left to right. The only state crossing mark
//! boundaries is [`TraceState`], folded through the sequence and dropped at
//! the end of the entry.

pub mod codes;
pub mod marks;

pub use marks::{decode_mark, Fragment, Mark, TraceState};

use super::classify::EVENT_TRACE_MARKER;
use super::traits::*;

const TITLE_SEPARATOR: &str = "::";
const MARK_SEPARATOR: char = ';';

pub struct EventTraceAnalyzer;

impl EntryAnalyzer for EventTraceAnalyzer {
    fn analyze(&self, message: &str) -> Option<Vec<Analysis>> {
        let Some((title, body)) = split_trace(message) else {
            tracing::debug!("event trace without '::' separator, not decodable");
            return None;
        };

        let (_, fragments) = decode_marks(body);
        Some(aggregate(title, fragments))
    }

    fn kind(&self) -> AnalysisKind {
        AnalysisKind::EventTrace
    }
}

/// Split a trace message into its title and mark list.
///
/// The title is whatever follows the marker (minus its `:` and spacing)
/// up to the first `::`. `None` when the separator is absent.
pub fn split_trace(message: &str) -> Option<(&str, &str)> {
    let start = message.find(EVENT_TRACE_MARKER).map_or(0, |i| i + EVENT_TRACE_MARKER.len());
    let rest = &message[start..];
    let separator = rest.find(TITLE_SEPARATOR)?;

    let title = rest[..separator].trim_start_matches(':').trim();
    let body = &rest[separator + TITLE_SEPARATOR.len()..];
    Some((title, body))
}

/// Decode every mark in order, returning the final state and the fragments.
pub fn decode_marks(body: &str) -> (TraceState, Vec<Fragment>) {
    body.split(MARK_SEPARATOR)
        .filter_map(Mark::parse)
        .fold((TraceState::default(), Vec::new()), |(state, mut fragments), mark| {
            let (state, fragment) = decode_mark(state, &mark);
            fragments.extend(fragment);
            (state, fragments)
        })
}

/// Fold fragments into per-severity findings.
///
/// The verbose finding narrates every fragment and is always present;
/// warning and failure findings hold only their own lines and are dropped
/// when empty.
fn aggregate(title: &str, fragments: Vec<Fragment>) -> Vec<Analysis> {
    let mut verbose = Analysis::new(Severity::Verbose, title);
    let mut warning = Analysis::new(Severity::Warning, title);
    let mut failure = Analysis::new(Severity::Failure, title);

    for fragment in fragments {
        match fragment.severity {
            Severity::Warning => warning.push_line(fragment.line.clone()),
            Severity::Failure => failure.push_line(fragment.line.clone()),
            Severity::Verbose | Severity::Metadata => {}
        }
        verbose.push_line(fragment.line);
    }

    let mut result = vec![verbose];
    result.extend([warning, failure].into_iter().filter(|a| !a.is_empty()));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(message: &str) -> Option<Vec<Analysis>> {
        EventTraceAnalyzer.analyze(message)
    }

    #[test]
    fn test_split_trace_title() {
        let (title, body) = split_trace("ssoEventData:TraceTitle::acq:token1").unwrap();
        assert_eq!(title, "TraceTitle");
        assert_eq!(body, "acq:token1");

        let (title, _) = split_trace("ssoEventData: sso-start 12ms::fp:s").unwrap();
        assert_eq!(title, "sso-start 12ms");
    }

    #[test]
    fn test_missing_separator_is_not_decodable() {
        assert!(split_trace("ssoEventData: acq:token1;fp:s").is_none());
        assert!(analyze("ssoEventData: acq:token1;fp:s").is_none());
    }

    #[test]
    fn test_acq_produces_verbose_only() {
        let result = analyze("ssoEventData:T::acq:token1").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].severity, Severity::Verbose);
        assert_eq!(result[0].title, "T");
        assert!(result[0].explanation[0].contains("acquire the token1 resource token"));
    }

    #[test]
    fn test_verbose_narrates_warnings_too() {
        let result = analyze("ssoEventData:T::acq:token1;fp:s").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].explanation.len(), 2);
        assert!(result[0].explanation[1].contains("show a prompt"));
        assert_eq!(result[1].severity, Severity::Warning);
        assert_eq!(result[1].explanation, vec![result[0].explanation[1].clone()]);
    }

    #[test]
    fn test_trailing_codes_after_default_fail() {
        let result = analyze("ssoEventData:T::sso_default_fail;code1;code2").unwrap();
        let failure = result.iter().find(|a| a.severity == Severity::Failure).unwrap();
        assert_eq!(
            failure.explanation,
            vec![
                "Failed to SSO.".to_string(),
                "SSO failure error code code1.".to_string(),
                "SSO failure status code code2.".to_string(),
            ]
        );
    }

    #[test]
    fn test_pending_codes_consumed_once_each() {
        let (state, fragments) = decode_marks("sso_default_fail;xyz;at;abc;def");
        assert_eq!(state.pending_failure_codes, 0);
        let lines: Vec<_> = fragments.iter().map(|f| f.line.as_str()).collect();
        assert_eq!(lines[1], "SSO failure error code xyz.");
        assert!(lines[2].starts_with("The acquire token call failed"));
        assert_eq!(lines[3], "SSO failure status code abc.");
        assert_eq!(lines[4], "Auth action taken: def.");
    }

    #[test]
    fn test_state_does_not_leak_between_entries() {
        let first = analyze("ssoEventData:T::sso_default_fail").unwrap();
        assert!(first.iter().any(|a| a.severity == Severity::Failure));

        let second = analyze("ssoEventData:T::unknownStep").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].explanation, vec!["Auth action taken: unknownStep.".to_string()]);
    }

    #[test]
    fn test_empty_marks_skipped() {
        let (_, fragments) = decode_marks(";;acq:token1;;");
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_no_op_only_trace_keeps_empty_verbose() {
        let result = analyze("ssoEventData:T::wiaSkipSetting:false").unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].explanation.is_empty());
    }
}
