//! Run — wire the reader task, the session and the renderer together.

use std::io::Write;

use futures_util::StreamExt;
use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::{error, info, warn};

use super::reader::{line_stream, spawn_line_reader};
use super::report::{render, RenderError, RenderedReport};
use crate::conf::{AnalyzerConfig, ConfigError};
use crate::filter::{FilterError, RowFilter};
use crate::process::ProcessRegistry;
use crate::session::{AnalysisReport, AnalysisSession};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render report: {0}")]
    Render(#[from] RenderError),
}

/// Drain `reader` through a fresh session.
///
/// A read failure ends the input early; everything received before it is
/// still analyzed and returned.
pub async fn analyze_reader<R>(reader: R, capacity: usize) -> (ProcessRegistry, AnalysisReport)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (rx, handle) = spawn_line_reader(reader, capacity);
    let mut lines = std::pin::pin!(line_stream(rx));
    let mut session = AnalysisSession::new();

    while let Some(line) = lines.next().await {
        session.push_line(&line);
    }

    match handle.await {
        Ok(Ok(sent)) => info!(lines = sent, "input drained"),
        Ok(Err(e)) => warn!(error = %e, "input read failed, report covers the lines read so far"),
        Err(e) => warn!(error = %e, "reader task failed, report covers the lines read so far"),
    }
    session.finish()
}

/// Analyze the configured input file and print the report to stdout.
pub async fn run(config: AnalyzerConfig) -> Result<(), RunError> {
    let path = config
        .input_path
        .clone()
        .ok_or_else(|| ConfigError::Invalid("no input file configured".to_string()))?;

    let filter = build_filter(&config)?;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        error!(path = %path, "failed to open input: {}", e);
        e
    })?;

    let (_, report) = analyze_reader(file, config.channel_capacity).await;

    let rendered = RenderedReport::new(&report, &config, filter.as_ref());
    let output = render(&rendered, config.output)?;

    if let Some(filter) = &filter {
        let (scanned, matched) = filter.stats();
        info!(scanned, matched, "row filter applied");
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn build_filter(config: &AnalyzerConfig) -> Result<Option<RowFilter>, FilterError> {
    let Some(pattern) = config.filter.pattern.as_deref() else {
        return Ok(None);
    };
    let filter = RowFilter::new(pattern, config.filter.case_sensitive, config.filter.mode)?
        .on_column(config.filter.column);
    Ok(Some(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::RowFilterConfig;
    use crate::filter::FilterMode;
    use std::io::Cursor;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Serves `data`, then fails every later read.
    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            let remaining = self.data.get_ref().len() as u64 - self.data.position();
            if remaining == 0 {
                return Poll::Ready(Err(std::io::Error::other("disk gone")));
            }
            Pin::new(&mut self.data).poll_read(cx, buf)
        }
    }

    const LOG: &str = "\
stray line
Mon Jan 02 2023 10:00:00 GMT+0000 (foo) <42> -- event -- ssoEventData:TraceTitle::acq:token1;fp:s
Mon Jan 02 2023 10:00:01 GMT+0000 (foo) <42> -- error -- boom
    at frame (a.js:1:1)\r
Mon Jan 02 2023 10:00:09 GMT+0000 (foo) <7> -- info -- User ring is general .
";

    #[tokio::test]
    async fn test_analyze_reader_matches_in_memory_session() {
        let (registry, report) = analyze_reader(Cursor::new(LOG.as_bytes().to_vec()), 2).await;
        let (expected_registry, expected) = crate::session::analyze_text(LOG);

        assert_eq!(report.rows, expected.rows);
        assert_eq!(report.processes, expected.processes);
        assert_eq!(report.stats, expected.stats);
        assert_eq!(registry.len(), expected_registry.len());
        assert_eq!(report.orphaned_lines, vec!["stray line".to_string()]);
        assert_eq!(report.rows[1].message, "boom\n    at frame (a.js:1:1)");
    }

    #[tokio::test]
    async fn test_read_failure_keeps_lines_already_read() {
        let data = "\
Mon Jan 02 2023 10:00:00 GMT+0000 (foo) <42> -- info -- first
Mon Jan 02 2023 10:00:05 GMT+0000 (foo) <42> -- info -- second
";
        let reader = FailingReader {
            data: Cursor::new(data.as_bytes().to_vec()),
        };
        let (registry, report) = analyze_reader(reader, 4).await;

        let process = registry.get("42").unwrap();
        assert_eq!(process.entries().len(), 2);
        assert_eq!(process.entries()[1].message, "second");
        assert_eq!(report.processes[0].duration, "0h 0m 5s");
        assert_eq!(report.stats.lines_read, 2);
    }

    #[tokio::test]
    async fn test_analyze_reader_empty_input() {
        let (registry, report) = analyze_reader(Cursor::new(Vec::new()), 8).await;
        assert!(registry.is_empty());
        assert!(report.rows.is_empty());
        assert_eq!(report.stats.lines_read, 0);
    }

    #[tokio::test]
    async fn test_run_missing_file_is_io_error() {
        let config = AnalyzerConfig {
            input_path: Some("/nonexistent/teams.log".to_string()),
            ..Default::default()
        };
        let err = run(config).await.unwrap_err();
        assert!(matches!(err, RunError::Io(_)));
    }

    #[test]
    fn test_build_filter_rejects_bad_pattern() {
        let config = AnalyzerConfig {
            filter: RowFilterConfig {
                pattern: Some("(".to_string()),
                mode: FilterMode::Include,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(build_filter(&config).is_err());
        assert!(build_filter(&AnalyzerConfig::default()).unwrap().is_none());
    }
}
