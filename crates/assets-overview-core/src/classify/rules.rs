use crate::paths::normalize_relative;
use crate::storage::DbFileRecord;

/// Decides whether a record's path disagrees with the layout a previous
/// version of the CMS stored it under.
pub trait LegacyPathRule: Send + Sync {
    fn is_inconsistent(&self, record: &DbFileRecord) -> bool;
}

/// The legacy layout stored `Filename` as `<prefix><path>`, e.g. `assets/a/cat.jpg`.
/// A record is inconsistent when its legacy path is outside the prefix or,
/// with the prefix removed, differs from the current path.
/// Records without a legacy path are never flagged.
#[derive(Debug, Clone)]
pub struct AssetsPrefixRule {
    prefix: String,
}

impl AssetsPrefixRule {
    pub fn new(prefix: &str) -> Self {
        let mut prefix = normalize_relative(prefix);
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { prefix }
    }
}

impl Default for AssetsPrefixRule {
    fn default() -> Self {
        Self::new("assets/")
    }
}

impl LegacyPathRule for AssetsPrefixRule {
    fn is_inconsistent(&self, record: &DbFileRecord) -> bool {
        let Some(legacy) = record.legacy_filename.as_deref() else {
            return false;
        };
        let legacy = normalize_relative(legacy);
        match legacy.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest != record.path,
            None => true,
        }
    }
}

/// Never flags anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLegacyRule;

impl LegacyPathRule for NoLegacyRule {
    fn is_inconsistent(&self, _record: &DbFileRecord) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, legacy: Option<&str>) -> DbFileRecord {
        DbFileRecord {
            id: 1,
            path: path.to_string(),
            title: String::new(),
            class_name: "File".to_string(),
            parent_id: 0,
            legacy_filename: legacy.map(str::to_string),
            last_edited: None,
        }
    }

    #[test]
    fn test_prefix_rule_matching_paths() {
        let rule = AssetsPrefixRule::default();
        assert!(!rule.is_inconsistent(&record("a/cat.jpg", Some("assets/a/cat.jpg"))));
        assert!(!rule.is_inconsistent(&record("a/cat.jpg", Some("/assets/a/cat.jpg"))));
        assert!(!rule.is_inconsistent(&record("a/cat.jpg", None)));
    }

    #[test]
    fn test_prefix_rule_flags_mismatches() {
        let rule = AssetsPrefixRule::default();
        assert!(rule.is_inconsistent(&record("a/cat.jpg", Some("assets/b/cat.jpg"))));
        assert!(rule.is_inconsistent(&record("a/cat.jpg", Some("assets/a/Cat.jpg"))));
        assert!(rule.is_inconsistent(&record("a/cat.jpg", Some("uploads/a/cat.jpg"))));
    }

    #[test]
    fn test_custom_prefix_and_no_rule() {
        let rule = AssetsPrefixRule::new("public/assets");
        assert!(!rule.is_inconsistent(&record("x.png", Some("public/assets/x.png"))));
        assert!(!NoLegacyRule.is_inconsistent(&record("x.png", Some("elsewhere/x.png"))));
    }
}
