//! Candidate file sets and per-tool selection

use crate::tools::ToolConfig;

/// Ordered, de-duplicated list of repository-relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    paths: Vec<String>,
}

impl FileSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths.into_iter().map(Into::into).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.paths
    }
}

impl<S: Into<String>> FromIterator<S> for FileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut paths: Vec<String> = Vec::new();
        for path in iter {
            let path = path.into();
            if !path.is_empty() && !paths.contains(&path) {
                paths.push(path);
            }
        }
        Self { paths }
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Subset of `candidates` the tool cares about, in candidate order.
///
/// A tool without extensions takes every candidate.
pub fn select_files(tool: &ToolConfig, candidates: &FileSet) -> FileSet {
    if !tool.has_extension_filter() {
        return candidates.clone();
    }
    candidates.iter().filter(|path| tool.accepts(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::LocationClass;

    fn tool(extensions: &[&str]) -> ToolConfig {
        ToolConfig::new("T", "t", LocationClass::SystemPath).extensions(extensions.iter().copied())
    }

    #[test]
    fn test_file_set_keeps_first_occurrence_order() {
        let files = FileSet::new(["b.ts", "a.ts", "b.ts", "", "c.md"]);
        assert_eq!(files.as_slice(), ["b.ts", "a.ts", "c.md"]);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_no_extensions_selects_all() {
        let files = FileSet::new(["a.ts", "b.md", "Makefile"]);
        assert_eq!(select_files(&tool(&[]), &files), files);
    }

    #[test]
    fn test_selects_by_suffix() {
        let files = FileSet::new(["src/a.ts", "b.md", "src/c.tsx", "d.ts"]);
        let selected = select_files(&tool(&[".ts"]), &files);
        assert_eq!(selected.as_slice(), ["src/a.ts", "d.ts"]);
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        let files = FileSet::new(["A.PHP", "b.php"]);
        let selected = select_files(&tool(&[".php"]), &files);
        assert_eq!(selected.as_slice(), ["b.php"]);
    }

    #[test]
    fn test_files_without_suffix_are_never_selected() {
        let files = FileSet::new(["Makefile", "bin/console", ".php", "dir.php/README"]);
        let selected = select_files(&tool(&[".php"]), &files);
        assert!(selected.is_empty(), "{selected:?}");
    }

    #[test]
    fn test_selection_may_be_empty() {
        let files = FileSet::new(["a.md"]);
        assert!(select_files(&tool(&[".ts", ".tsx"]), &files).is_empty());
    }
}
