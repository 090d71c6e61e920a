//! Case-insensitive file suffix filter.

use std::path::Path;

/// A set of case-insensitive file name suffixes such as `".pdf"`.
///
/// Suffixes are stored lower-cased and dot-prefixed, so `"PDF"`, `"pdf"`
/// and `".pdf"` are equivalent. An empty filter matches every file.
///
/// # Examples
///
/// ```
/// use stagehand_core::ExtensionFilter;
/// use std::path::Path;
///
/// let filter = ExtensionFilter::new([".pdf", "IPYNB"]);
/// assert!(filter.matches(Path::new("week1/Notes.PDF")));
/// assert!(filter.matches(Path::new("lab.ipynb")));
/// assert!(!filter.matches(Path::new("data.csv")));
///
/// assert!(ExtensionFilter::any().matches(Path::new("anything")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// Builds a filter from suffix strings.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut suffixes: Vec<String> = suffixes
            .into_iter()
            .filter_map(|s| normalize_suffix(s.as_ref()))
            .collect();
        suffixes.sort_unstable();
        suffixes.dedup();
        Self { suffixes }
    }

    /// A filter that matches every file.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Returns `true` if no suffix is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Normalized suffixes, sorted.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Returns `true` if the file name of `path` ends with one of the
    /// suffixes, ignoring case.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.suffixes.is_empty() {
            return true;
        }
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

fn normalize_suffix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{lower}"))
    }
}
