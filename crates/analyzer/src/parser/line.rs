//! Line parser — rebuilds logical entries from the raw line stream.
//!
//! Every physical line is matched against the client logger's grammar:
//!
//! ```text
//! Mon Jan 02 2023 10:00:00 GMT+0000 (Microsoft Teams) <42> -- event -- message
//! ```
//!
//! A line that does not match is a continuation of the previous entry
//! (stack traces, JSON blobs). Since a later line may still extend the
//! current entry, the parser holds it back until the next matching line
//! arrives or the stream ends.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use grep_matcher::{Captures, Matcher};
use grep_regex::RegexMatcher;

use super::model::{LogEntry, ParseError, ParseStats};

/// Groups: 1 full date, 2 date without weekday, 3 process name, 4 pid, 5 type, 6 message
const ENTRY_GRAMMAR: &str = r"^(\w{3} (\w{3} \d{2} \d{4} \d{2}:\d{2}:\d{2} GMT[+-]\d{4})) \(([^)]+)\) <(\d+)> -- (\w+) -- (.+)";

/// The weekday is matched by the grammar but not cross-checked against the date.
const TIMESTAMP_FORMAT: &str = "%b %d %Y %H:%M:%S GMT%z";

static ENTRY_MATCHER: LazyLock<RegexMatcher> = LazyLock::new(|| {
    RegexMatcher::new(ENTRY_GRAMMAR).expect("entry grammar is a valid regex")
});

/// Parse a single physical line into an entry.
pub fn parse_line(line: &str, sequence: u64) -> Result<LogEntry, ParseError> {
    let matcher = &*ENTRY_MATCHER;
    let mut caps = matcher.new_captures().map_err(|_| ParseError::NoMatch)?;
    let matched = matcher
        .captures(line.as_bytes(), &mut caps)
        .map_err(|_| ParseError::NoMatch)?;
    if !matched {
        return Err(ParseError::NoMatch);
    }

    let group = |index: usize| -> Result<&str, ParseError> {
        caps.get(index)
            .and_then(|m| line.get(m.start()..m.end()))
            .ok_or(ParseError::NoMatch)
    };

    let date = group(1)?;
    let timestamp = parse_timestamp(group(2)?)?;

    Ok(LogEntry {
        date: date.to_string(),
        timestamp,
        process_name: group(3)?.to_string(),
        pid: group(4)?.to_string(),
        entry_type: group(5)?.to_string(),
        message: group(6)?.to_string(),
        sequence,
    })
}

fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| ParseError::InvalidTimestamp(format!("{}: {}", text, e)))
}

/// Push-driven parser state.
///
/// Feed lines with [`LineParser::push`]; each call returns the previous
/// entry once it can no longer grow. Call [`LineParser::finish`] at end of
/// stream to release the last one. Malformed input never aborts the parse:
/// unmatched lines become continuations, or orphans when no entry exists yet.
#[derive(Debug, Default)]
pub struct LineParser {
    pending: Option<LogEntry>,
    orphans: Vec<String>,
    stats: ParseStats,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) -> Option<LogEntry> {
        self.stats.lines_read += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let line_number = self.stats.lines_read;

        match parse_line(line, line_number) {
            Ok(entry) => {
                self.stats.entries += 1;
                self.pending.replace(entry)
            }
            Err(err) => {
                if let Some(current) = self.pending.as_mut() {
                    tracing::trace!(line_number, sequence = current.sequence, "continuation line");
                    current.append_continuation(line);
                    self.stats.continuation_lines += 1;
                } else {
                    tracing::debug!(line_number, error = %err, "orphaned line before first entry");
                    self.orphans.push(line.to_string());
                    self.stats.orphaned_lines += 1;
                }
                None
            }
        }
    }

    /// Release the held-back entry. Safe to call more than once.
    pub fn finish(&mut self) -> Option<LogEntry> {
        self.pending.take()
    }

    /// Lines that arrived before any entry could absorb them.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub fn take_orphans(&mut self) -> Vec<String> {
        std::mem::take(&mut self.orphans)
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Lazy adapter over any line source.
    pub fn entries<I>(self, lines: I) -> Entries<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Entries {
            lines: lines.into_iter(),
            parser: self,
        }
    }
}

/// Finite, non-restartable sequence of entries over a line source.
pub struct Entries<I> {
    lines: I,
    parser: LineParser,
}

impl<I> Entries<I> {
    pub fn into_parser(self) -> LineParser {
        self.parser
    }
}

impl<I> Iterator for Entries<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        for line in self.lines.by_ref() {
            if let Some(entry) = self.parser.push(line.as_ref()) {
                return Some(entry);
            }
        }
        self.parser.finish()
    }
}
