//! Per-category weekly target counts.
//!
//! The target table is process-wide configuration: loaded once at startup,
//! validated against the catalog, then immutable. A category missing from
//! the table falls back to a target of 1 at read time (unknown categories
//! can appear in the catalog between deploys), but startup validation
//! rejects that drift for the categories it can see.

use std::collections::BTreeMap;

/// Fallback target for a category absent from the table.
pub const DEFAULT_TARGET: i64 = 1;

/// Default table matching the corridor's cleaning rota.
const DEFAULTS: &[(&str, i64)] = &[
    ("toilet", 2),
    ("shower", 2),
    ("kitchen", 3),
    ("fridge", 2),
    ("hallway", 1),
    ("laundry", 1),
    ("trash", 2),
    ("other", 1),
];

/// Immutable category → weekly target map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTargets {
    targets: BTreeMap<String, i64>,
}

impl Default for CategoryTargets {
    fn default() -> Self {
        Self {
            targets: DEFAULTS
                .iter()
                .map(|(category, count)| (category.to_string(), *count))
                .collect(),
        }
    }
}

impl CategoryTargets {
    /// Load the table from the `CATEGORY_TARGETS` environment variable
    /// (`category=count,category=count,...`), falling back to the defaults
    /// when unset. A malformed entry fails loudly rather than silently
    /// dropping a category.
    pub fn from_env() -> Result<Self, String> {
        match std::env::var("CATEGORY_TARGETS") {
            Ok(raw) => Self::parse(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parse a `category=count,...` override string.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut targets = BTreeMap::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (category, count) = entry
                .split_once('=')
                .ok_or_else(|| format!("malformed target entry {entry:?}, expected name=count"))?;
            let count: i64 = count
                .trim()
                .parse()
                .map_err(|_| format!("invalid target count in {entry:?}"))?;
            if count < 0 {
                return Err(format!("negative target count in {entry:?}"));
            }
            targets.insert(category.trim().to_string(), count);
        }
        if targets.is_empty() {
            return Err("CATEGORY_TARGETS is set but contains no entries".to_string());
        }
        Ok(Self { targets })
    }

    /// Weekly target for a category, with the fixed fallback for unknowns.
    pub fn target_for(&self, category: &str) -> i64 {
        self.targets.get(category).copied().unwrap_or(DEFAULT_TARGET)
    }

    /// Sum of every configured target: the week's overall task quota.
    pub fn overall_total(&self) -> i64 {
        self.targets.values().sum()
    }

    /// Assert that every category present in the catalog has a configured
    /// target. Run once at startup so the table and the catalog cannot
    /// silently drift apart.
    pub fn validate_against<'a>(
        &self,
        catalog_categories: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), String> {
        let missing: Vec<&str> = catalog_categories
            .into_iter()
            .filter(|category| !self.targets.contains_key(*category))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "catalog categories without a configured target: {}",
                missing.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_total_is_fourteen() {
        assert_eq!(CategoryTargets::default().overall_total(), 14);
    }

    #[test]
    fn default_targets_match_rota() {
        let targets = CategoryTargets::default();
        assert_eq!(targets.target_for("kitchen"), 3);
        assert_eq!(targets.target_for("hallway"), 1);
    }

    #[test]
    fn unknown_category_falls_back_to_one() {
        assert_eq!(CategoryTargets::default().target_for("garden"), 1);
    }

    #[test]
    fn parse_override() {
        let targets = CategoryTargets::parse("toilet=1, kitchen=4").unwrap();
        assert_eq!(targets.target_for("toilet"), 1);
        assert_eq!(targets.target_for("kitchen"), 4);
        assert_eq!(targets.overall_total(), 5);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(CategoryTargets::parse("toilet").is_err());
        assert!(CategoryTargets::parse("toilet=two").is_err());
        assert!(CategoryTargets::parse("toilet=-1").is_err());
        assert!(CategoryTargets::parse("  ").is_err());
    }

    #[test]
    fn validation_flags_uncovered_categories() {
        let targets = CategoryTargets::default();
        assert!(targets.validate_against(["toilet", "kitchen"]).is_ok());
        let err = targets.validate_against(["toilet", "garden"]).unwrap_err();
        assert!(err.contains("garden"));
    }
}
