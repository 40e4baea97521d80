use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Ordered, case-insensitively unique list of brand or product names.
///
/// Entries are trimmed and never empty; the first spelling of a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandList {
    entries: Vec<String>,
}

/// Products the assistant may name in a recipe.
pub type ApprovedCatalog = BrandList;

/// Brands the assistant must never mention.
pub type BlockedList = BrandList;

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BrandList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref().trim();
                if entry.is_empty() || !seen.insert(entry.to_lowercase()) {
                    None
                } else {
                    Some(entry.to_string())
                }
            })
            .collect();
        Self { entries }
    }

    /// Parse a line-delimited list. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Load a static list at startup. An unreadable file is logged and
    /// treated as an empty list so the service still starts.
    pub fn load_or_empty(path: Option<&Path>, label: &str) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(list) => {
                tracing::info!(list = label, path = %path.display(), entries = list.len(), "Loaded static list");
                list
            }
            Err(e) => {
                tracing::warn!(list = label, error = %e, "Could not load static list, using empty list");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Lowercased entries, used as the matching set during screening.
    pub fn normalized(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_lowercase()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dedupes_case_insensitively_and_drops_blanks() {
        let list = BrandList::new(["Ponche Kuba", "", "  ", "ponche kuba", "Lunazul Blanco "]);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["Ponche Kuba", "Lunazul Blanco"]);
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let list = BrandList::parse("# approved\nSoju Original\n\n  Soju Peach  \n#Soju Grape\n");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["Soju Original", "Soju Peach"]);
    }

    #[test]
    fn normalized_lowercases_entries() {
        let list = BrandList::new(["Blue Agave Spirit", "blue agave SPIRIT"]);
        assert_eq!(list.normalized(), vec!["blue agave spirit"]);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Absolut\nSmirnoff\nabsolut").unwrap();
        let list = BrandList::load(file.path()).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn unreadable_file_becomes_empty_list() {
        let missing = Path::new("/definitely/not/here/blocked.txt");
        assert!(BrandList::load(missing).is_err());
        assert!(BrandList::load_or_empty(Some(missing), "blocked").is_empty());
        assert!(BrandList::load_or_empty(None, "blocked").is_empty());
    }
}
