//! Category and option registry so every feature menu is data, not code.
//!
//! Categories are loaded once at startup and never mutated. Everything else in
//! the crate refers to options by `(CategoryId, index)`.

mod table;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub use table::{builtin_categories, load_category_table, parse_category_table, CategoryTable};

/// Stable identifier for a category (e.g. `time_travel`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a category's payloads are processed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMode {
    /// Keep the person, change what they wear or look like.
    Subject,
    /// Replace the surroundings.
    Scene,
    /// User-typed text; presets only seed the keyboard.
    Freeform,
}

impl CategoryMode {
    pub fn label(self) -> &'static str {
        match self {
            CategoryMode::Subject => "subject",
            CategoryMode::Scene => "scene",
            CategoryMode::Freeform => "freeform",
        }
    }
}

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque text forwarded to the transformation service.
    #[serde(default)]
    pub payload: String,
    /// Inclusive `[start, end]` years for era options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<[i32; 2]>,
}

impl PromptOption {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            payload: payload.into(),
            years: None,
        }
    }

    pub fn with_years(mut self, start: i32, end: i32) -> Self {
        self.years = Some([start, end]);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub mode: CategoryMode,
    pub options: Vec<PromptOption>,
}

impl Category {
    /// First option whose year range covers `year`, after clamping `year` to
    /// the span the options cover. `None` when no option carries years or the
    /// year falls in a gap.
    pub fn option_for_year(&self, year: i32) -> Option<usize> {
        let (first, last) = self
            .options
            .iter()
            .filter_map(|option| option.years)
            .fold(None, |span, [start, end]| match span {
                None => Some((start, end)),
                Some((lo, hi)) => Some((start.min(lo), end.max(hi))),
            })?;
        let year = year.clamp(first, last);
        self.options.iter().position(|option| {
            option
                .years
                .is_some_and(|[start, end]| (start..=end).contains(&year))
        })
    }
}

/// Immutable set of categories in menu order.
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    categories: Vec<Category>,
}

impl OptionRegistry {
    /// Build the registry, refusing any table the menu could not navigate.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            bail!("category table is empty");
        }
        let mut seen = HashSet::new();
        for category in &categories {
            if category.id.as_str().trim().is_empty() {
                bail!("category '{}' has a blank id", category.title);
            }
            if !seen.insert(category.id.clone()) {
                bail!("duplicate category id '{}'", category.id);
            }
            if category.options.is_empty() {
                bail!("category '{}' has no options", category.id);
            }
            if let Some(option) = category
                .options
                .iter()
                .find(|option| option.years.is_some_and(|[start, end]| start > end))
            {
                bail!(
                    "option '{}' in category '{}' has a year range that ends before it starts",
                    option.name,
                    category.id
                );
            }
            if category.mode != CategoryMode::Freeform {
                if let Some(option) = category
                    .options
                    .iter()
                    .find(|option| option.payload.trim().is_empty())
                {
                    bail!(
                        "option '{}' in category '{}' has an empty payload",
                        option.name,
                        category.id
                    );
                }
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_at(&self, index: usize) -> Result<&Category> {
        self.categories
            .get(index)
            .ok_or_else(|| anyhow!("root entry {index} out of range ({})", self.len()))
    }

    pub fn category(&self, id: &CategoryId) -> Result<&Category> {
        self.categories
            .iter()
            .find(|category| &category.id == id)
            .ok_or_else(|| anyhow!("unknown category '{id}'"))
    }

    pub fn option(&self, id: &CategoryId, index: usize) -> Result<&PromptOption> {
        let category = self.category(id)?;
        category.options.get(index).ok_or_else(|| {
            anyhow!(
                "option {index} out of range for category '{id}' ({} options)",
                category.options.len()
            )
        })
    }
}

#[cfg(test)]
pub(crate) fn test_category(id: &str, mode: CategoryMode, payloads: &[&str]) -> Category {
    Category {
        id: CategoryId::new(id),
        title: id.to_string(),
        description: String::new(),
        mode,
        options: payloads
            .iter()
            .enumerate()
            .map(|(idx, payload)| PromptOption::new(format!("{id}-{idx}"), "", *payload))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_table() {
        assert!(OptionRegistry::new(Vec::new()).is_err());
    }

    #[test]
    fn rejects_category_without_options() {
        let err = OptionRegistry::new(vec![
            test_category("eras", CategoryMode::Scene, &["P1"]),
            test_category("outfits", CategoryMode::Subject, &[]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("outfits"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = OptionRegistry::new(vec![
            test_category("eras", CategoryMode::Scene, &["P1"]),
            test_category("eras", CategoryMode::Scene, &["P2"]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_blank_payload_outside_freeform() {
        assert!(
            OptionRegistry::new(vec![test_category("eras", CategoryMode::Scene, &["  "])])
                .is_err()
        );
        assert!(
            OptionRegistry::new(vec![test_category("custom", CategoryMode::Freeform, &[""])])
                .is_ok()
        );
    }

    #[test]
    fn rejects_reversed_year_range() {
        let mut eras = test_category("eras", CategoryMode::Scene, &["P1"]);
        eras.options[0] = PromptOption::new("1920s", "", "P1").with_years(1930, 1920);
        assert!(OptionRegistry::new(vec![eras]).is_err());
    }

    #[test]
    fn year_lookup_clamps_and_prefers_first_match() {
        let mut eras = test_category("eras", CategoryMode::Scene, &[]);
        eras.options = vec![
            PromptOption::new("1800s", "", "P1").with_years(1800, 1850),
            PromptOption::new("1850s", "", "P2").with_years(1850, 1900),
            PromptOption::new("2080s", "", "P3").with_years(2070, 2090),
        ];
        assert_eq!(eras.option_for_year(1820), Some(0));
        // Shared boundary years belong to the earlier era.
        assert_eq!(eras.option_for_year(1850), Some(0));
        assert_eq!(eras.option_for_year(1851), Some(1));
        assert_eq!(eras.option_for_year(1500), Some(0));
        assert_eq!(eras.option_for_year(2500), Some(2));
        assert_eq!(eras.option_for_year(2000), None);
        let plain = test_category("outfits", CategoryMode::Subject, &["O1"]);
        assert_eq!(plain.option_for_year(1900), None);
    }

    #[test]
    fn lookups_follow_table_order() {
        let registry = OptionRegistry::new(vec![
            test_category("eras", CategoryMode::Scene, &["P1", "P2"]),
            test_category("outfits", CategoryMode::Subject, &["O1"]),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.category_at(1).unwrap().id.as_str(), "outfits");
        let eras = CategoryId::new("eras");
        assert_eq!(registry.option(&eras, 1).unwrap().payload, "P2");
        assert!(registry.option(&eras, 2).is_err());
        assert!(registry.category(&CategoryId::new("missing")).is_err());
        assert!(registry.category_at(2).is_err());
    }
}
