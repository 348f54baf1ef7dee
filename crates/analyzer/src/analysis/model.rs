use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Verbose,
    Warning,
    Failure,
    /// Carries extracted fields instead of explanation text
    Metadata,
}

/// Field names a metadata analysis may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetadataKey {
    AppVersion,
    AppLaunchReason,
    WebAppSession,
    UserRingInfo,
    IsHomeTenant,
}

/// One finding produced by an analyzer.
///
/// `fields` is populated only for [`Severity::Metadata`]; every other
/// severity carries its findings in `explanation`, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub severity: Severity,
    pub title: String,
    pub explanation: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(MetadataKey, String)>,
}

impl Analysis {
    /// Empty finding of a non-metadata severity.
    pub fn new(severity: Severity, title: impl Into<String>) -> Self {
        debug_assert!(severity != Severity::Metadata, "use Analysis::metadata for field analyses");
        Self {
            severity,
            title: title.into(),
            explanation: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_line(severity: Severity, title: impl Into<String>, line: impl Into<String>) -> Self {
        let mut analysis = Self::new(severity, title);
        analysis.push_line(line);
        analysis
    }

    pub fn metadata(fields: Vec<(MetadataKey, String)>) -> Self {
        Self {
            severity: Severity::Metadata,
            title: "Metadata".to_string(),
            explanation: Vec::new(),
            fields,
        }
    }

    /// Empty lines are ignored.
    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if !line.is_empty() {
            self.explanation.push(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.explanation.is_empty() && self.fields.is_empty()
    }

    pub fn field(&self, key: MetadataKey) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn explanation_text(&self) -> String {
        self.explanation.join("\n")
    }
}

/// Which specialised analyzer an entry is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    NotApplicable,
    EventTrace,
    Storage,
    Metadata,
}

/// Classification result; lives only until the chosen analyzer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzableEntry<'a> {
    pub kind: AnalysisKind,
    pub message: &'a str,
}

impl<'a> AnalyzableEntry<'a> {
    pub fn new(kind: AnalysisKind, message: &'a str) -> Self {
        Self { kind, message }
    }

    pub fn is_applicable(&self) -> bool {
        self.kind != AnalysisKind::NotApplicable
    }
}
