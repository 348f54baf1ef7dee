use super::traits::*;

pub const STORAGE_TITLE: &str = "Local Storage";

/// Failure substrings written by the client's storage layer. "writting" is
/// the client's own spelling.
const STORAGE_FAILURES: [&str; 3] = [
    "Error occurred while opening",
    "File not found for storage.json. Ignore",
    "while writting to ",
];

/// Flags storage.json failures; the raw message is the explanation.
pub struct StorageAnalyzer;

impl EntryAnalyzer for StorageAnalyzer {
    fn analyze(&self, message: &str) -> Option<Vec<Analysis>> {
        if !STORAGE_FAILURES.iter().any(|needle| message.contains(needle)) {
            return None;
        }

        Some(vec![Analysis::with_line(Severity::Failure, STORAGE_TITLE, message)])
    }

    fn kind(&self) -> AnalysisKind {
        AnalysisKind::Storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_is_failure() {
        let message = "Error occurred while opening storage.json: EACCES";
        let result = StorageAnalyzer.analyze(message).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].severity, Severity::Failure);
        assert_eq!(result[0].title, STORAGE_TITLE);
        assert_eq!(result[0].explanation, vec![message.to_string()]);
    }

    #[test]
    fn test_missing_and_write_errors() {
        assert!(StorageAnalyzer.analyze("File not found for storage.json. Ignore if first run").is_some());
        assert!(StorageAnalyzer.analyze("EPERM while writting to storage.json").is_some());
    }

    #[test]
    fn test_other_storage_messages_ignored() {
        assert!(StorageAnalyzer.analyze("Loaded storage.json in 3ms").is_none());
    }
}
