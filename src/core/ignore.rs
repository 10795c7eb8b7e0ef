use regex::Regex;
use std::path::Path;

/// A compiled list of ignore patterns.
///
/// A candidate is ignored when any pattern matches it by any of these rules:
/// the pattern equals the file name, the pattern occurs anywhere in the full
/// path, the pattern is `*.ext` and the name ends with `.ext`, or the pattern
/// (with `*` read as "any sequence") matches the whole file name as a regex.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<PatternRule>,
}

#[derive(Debug, Clone)]
struct PatternRule {
    text: String,
    /// `Some(".ext")` for `*.ext` patterns.
    suffix: Option<String>,
    /// `None` when the pattern is not a valid regex.
    regex: Option<Regex>,
}

impl PatternRule {
    fn matches(&self, name: &str, full_path: &str) -> bool {
        if self.text == name || full_path.contains(&self.text) {
            return true;
        }
        if let Some(suffix) = &self.suffix {
            if name.ends_with(suffix.as_str()) {
                return true;
            }
        }
        self.regex.as_ref().is_some_and(|re| re.is_match(name))
    }
}

impl IgnoreMatcher {
    /// Compiles the patterns once. Blank lines and `#` comments are skipped.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();

        for pattern in patterns {
            let trimmed_pattern = pattern.as_ref().trim();
            if trimmed_pattern.is_empty() || trimmed_pattern.starts_with('#') {
                continue;
            }

            let suffix = trimmed_pattern
                .strip_prefix("*.")
                .map(|ext| format!(".{ext}"));

            let source = format!("^{}$", trimmed_pattern.replace('*', ".*"));
            let regex = match Regex::new(&source) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(
                        "Ignore pattern {:?} is not a valid expression, using literal rules only: {}",
                        trimmed_pattern,
                        e
                    );
                    None
                }
            };

            rules.push(PatternRule {
                text: trimmed_pattern.to_string(),
                suffix,
                regex,
            });
        }

        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if `path` should be excluded from the walk.
    pub fn is_match(&self, path: &Path) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// Returns the first pattern that matches `path`, if any.
    pub fn matching_pattern(&self, path: &Path) -> Option<&str> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let full_path = path.to_string_lossy();
        self.rules
            .iter()
            .find(|rule| rule.matches(&name, &full_path))
            .map(|rule| rule.text.as_str())
    }
}
