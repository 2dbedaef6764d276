use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Severity of a report line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        })
    }
}

/// One line of a [`PopulateReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportEntry {
    pub depth: usize,
    pub level: ReportLevel,
    pub message: String,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str("  ")?;
        }
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Per-member outcome of a populate or deserialize operation.
///
/// Rendered one line per entry, indented by two spaces per depth level.
///
/// ```
/// use od_reflect::document::PopulateReport;
///
/// let mut report = PopulateReport::new();
/// report.success(0, "Field 'x' modified to '9'.");
/// report.error(1, "Field 'z' not found in type 'demo::Point'.");
///
/// assert_eq!(
///     report.to_string(),
///     "[Success] Field 'x' modified to '9'.\n  [Error] Field 'z' not found in type 'demo::Point'.",
/// );
/// assert!(report.has_errors());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    entries: Vec<ReportEntry>,
}

impl PopulateReport {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, depth: usize, level: ReportLevel, message: impl Into<String>) {
        self.entries.push(ReportEntry {
            depth,
            level,
            message: message.into(),
        });
    }

    #[inline]
    pub fn success(&mut self, depth: usize, message: impl Into<String>) {
        self.push(depth, ReportLevel::Success, message);
    }

    #[inline]
    pub fn warning(&mut self, depth: usize, message: impl Into<String>) {
        self.push(depth, ReportLevel::Warning, message);
    }

    #[inline]
    pub fn error(&mut self, depth: usize, message: impl Into<String>) {
        self.push(depth, ReportLevel::Error, message);
    }

    #[inline]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, level: ReportLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.count(ReportLevel::Error)
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == ReportLevel::Error)
    }
}

impl fmt::Display for PopulateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
