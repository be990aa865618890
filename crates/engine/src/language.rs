//! Line classification.
//!
//! Comment detection is a prefix test on the trimmed line. Inline comments,
//! block comments and comment continuation are not recognised.

/// GDScript / Godot shader: `#`
pub const HASH_PREFIXES: &[&str] = &["#"];

/// C#: `//`
pub const DOUBLE_SLASH_PREFIXES: &[&str] = &["//"];

/// Built-in comment markers for a lower-cased, dotted extension.
pub fn builtin_comment_prefixes(ext: &str) -> &'static [&'static str] {
    match ext {
        ".gd" | ".gdshader" => HASH_PREFIXES,
        ".cs" => DOUBLE_SLASH_PREFIXES,
        _ => &[],
    }
}

/// Extension of a file name including its dot, taken from the last `.`.
///
/// A name that is only an extension (`.gd`) still has one. A trailing dot
/// yields `"."`, which never matches a configured extension.
pub fn dotted_extension(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

/// Prefix based full-line comment detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClassifier {
    prefixes: Vec<String>,
}

impl LineClassifier {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().to_string())
                .collect(),
        }
    }

    /// Classifier with the built-in markers for `ext`.
    pub fn for_extension(ext: &str) -> Self {
        Self::new(builtin_comment_prefixes(ext))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            LineKind::Blank
        } else if self.prefixes.iter().any(|p| trimmed.starts_with(p.as_str())) {
            LineKind::Comment
        } else {
            LineKind::Code
        }
    }

    /// 1 for a valid line, 0 for blank and comment lines.
    pub fn process(&self, line: &str) -> usize {
        usize::from(self.classify(line) == LineKind::Code)
    }
}
