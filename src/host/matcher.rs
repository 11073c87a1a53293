// Mon Oct 19 2026 - Alex

use crate::types::TypeDescriptor;
use regex::Regex;
use std::fmt;

/// Predicate over a type's stripped qualified name.
#[derive(Debug, Clone)]
pub struct TypeMatcher {
    pattern: Regex,
    exclude_suffix: Option<String>,
}

impl TypeMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            exclude_suffix: None,
        })
    }

    /// Matches names starting with `prefix` taken literally.
    pub fn prefix(prefix: &str) -> Self {
        let pattern = Regex::new(&format!("^{}", regex::escape(prefix))).expect("escaped prefix is a valid regex");
        Self {
            pattern,
            exclude_suffix: None,
        }
    }

    pub fn excluding_suffix(mut self, suffix: &str) -> Self {
        self.exclude_suffix = Some(suffix.to_string());
        self
    }

    pub fn matches_name(&self, name: &str) -> bool {
        let name = crate::types::descriptor::strip_qualifiers(name);
        if let Some(suffix) = &self.exclude_suffix {
            if name.ends_with(suffix.as_str()) {
                return false;
            }
        }
        self.pattern.is_match(name)
    }

    pub fn matches(&self, ty: &TypeDescriptor) -> bool {
        self.matches_name(&ty.name)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl fmt::Display for TypeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern.as_str())?;
        if let Some(suffix) = &self.exclude_suffix {
            write!(f, " except *{}", suffix)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_exclusion() {
        let m = TypeMatcher::prefix("cista::hash_storage").excluding_suffix("::ctrl_t");
        assert!(m.matches_name("cista::hash_storage<int, cista::offset_ptr>"));
        assert!(m.matches_name("const cista::hash_storage<int>"));
        assert!(!m.matches_name("cista::hash_storage<int>::ctrl_t"));
        assert!(!m.matches_name("std::hash_storage"));
    }

    #[test]
    fn test_regex_pattern() {
        let m = TypeMatcher::new(r"^cista::(basic|generic)_string").unwrap();
        assert!(m.matches_name("cista::generic_string<char const*>"));
        assert!(!m.matches_name("cista::basic_vector<char>"));
        assert!(TypeMatcher::new("(").is_err());
    }
}
