//! Named document kinds with filename patterns

use std::path::Path;

/// A kind of document: a display name plus `;`-separated filename patterns
/// using `*` and `?` wildcards (e.g. `"*.csv;*.tsv"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    name: String,
    pattern: String,
}

impl DocumentType {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The individual patterns, trimmed, without empty entries
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.pattern
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// File dialog filter entry, e.g. `"CSV files (*.csv)|*.csv"`
    pub fn to_filter_pattern(&self) -> String {
        format!("{} files ({})|{}", self.name, self.pattern, self.pattern)
    }

    /// Whether the file name of `path` matches any pattern (case-insensitive)
    pub fn matches(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let file_name = file_name.to_lowercase();
        self.patterns()
            .any(|p| wildcard_match(&p.to_lowercase(), &file_name))
    }
}

/// Glob match supporting `*` (any run) and `?` (any single character)
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut star_text = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_text = t;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            star_text += 1;
            t = star_text;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
