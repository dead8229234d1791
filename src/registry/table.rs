use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::Category;

const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");

/// On-disk shape of a category table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Yaml,
    Json,
}

fn table_format(path: &Path) -> Result<TableFormat> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    {
        Some(ext) if ext == "yml" || ext == "yaml" => Ok(TableFormat::Yaml),
        Some(ext) if ext == "json" => Ok(TableFormat::Json),
        _ => bail!(
            "unsupported category table '{}' (expected .yaml, .yml or .json)",
            path.display()
        ),
    }
}

fn parse_with(text: &str, format: TableFormat) -> Result<Vec<Category>> {
    let table: CategoryTable = match format {
        TableFormat::Yaml => serde_yaml::from_str(text).context("invalid YAML category table")?,
        TableFormat::Json => serde_json::from_str(text).context("invalid JSON category table")?,
    };
    Ok(table.categories)
}

/// Parse a table, treating text that starts with `{` as JSON and anything else as YAML.
pub fn parse_category_table(text: &str) -> Result<Vec<Category>> {
    if text.trim_start().starts_with('{') {
        parse_with(text, TableFormat::Json)
    } else {
        parse_with(text, TableFormat::Yaml)
    }
}

/// Load a category table from disk; the extension picks the format.
pub fn load_category_table(path: &Path) -> Result<Vec<Category>> {
    let format = table_format(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read category table {}", path.display()))?;
    parse_with(&text, format).with_context(|| format!("in {}", path.display()))
}

/// Catalog compiled into the binary.
pub fn builtin_categories() -> Result<Vec<Category>> {
    parse_with(BUILTIN_CATALOG, TableFormat::Yaml).context("built-in catalog is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CategoryMode, OptionRegistry};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_table_path(ext: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("promptdeck_table_{nanos}.{ext}"))
    }

    #[test]
    fn builtin_catalog_builds_a_valid_registry() {
        let registry = OptionRegistry::new(builtin_categories().unwrap()).unwrap();
        let modes: Vec<CategoryMode> = registry.categories().iter().map(|c| c.mode).collect();
        assert!(modes.contains(&CategoryMode::Subject));
        assert!(modes.contains(&CategoryMode::Scene));
        assert!(modes.contains(&CategoryMode::Freeform));
    }

    #[test]
    fn builtin_catalog_carries_every_prompt() {
        let counts: Vec<(String, usize)> = builtin_categories()
            .unwrap()
            .iter()
            .map(|category| (category.id.to_string(), category.options.len()))
            .collect();
        let expected = [
            ("time_travel", 17),
            ("virtual_try_on", 30),
            ("biome_transform", 34),
            ("video_game_worlds", 52),
            ("custom_prompt", 11),
        ];
        let expected: Vec<(String, usize)> = expected
            .iter()
            .map(|(id, count)| (id.to_string(), *count))
            .collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn builtin_eras_map_years_to_options() {
        let categories = builtin_categories().unwrap();
        let eras = &categories[0];
        assert!(eras.options.iter().all(|option| option.years.is_some()));
        let name_for = |year| eras.options[eras.option_for_year(year).unwrap()].name.as_str();
        assert_eq!(name_for(2024), "2020s Present Day");
        assert_eq!(name_for(1925), "1920s Roaring Twenties");
        assert_eq!(name_for(1700), "1800s Colonial Era");
        assert_eq!(name_for(2300), "2100s Distant Future");
    }

    #[test]
    fn parses_yaml_table() {
        let yaml = "categories:\n  - id: eras\n    title: Eras\n    mode: scene\n    options:\n      - name: 1920s\n        payload: P1\n";
        let categories = parse_category_table(yaml).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].options[0].payload, "P1");
        assert_eq!(categories[0].options[0].description, "");
    }

    #[test]
    fn parses_json_table() {
        let json = r#"{"categories":[{"id":"outfits","title":"Outfits","mode":"subject","options":[{"name":"Suit","description":"d","payload":"S"}]}]}"#;
        let categories = parse_category_table(json).unwrap();
        assert_eq!(categories[0].mode, CategoryMode::Subject);
    }

    #[test]
    fn rejects_unknown_mode() {
        let yaml = "categories:\n  - id: eras\n    title: Eras\n    mode: sideways\n    options: []\n";
        assert!(parse_category_table(yaml).is_err());
    }

    #[test]
    fn load_picks_format_from_extension() {
        let path = temp_table_path("json");
        fs::write(
            &path,
            r#"{"categories":[{"id":"eras","title":"Eras","mode":"scene","options":[{"name":"a","payload":"P"}]}]}"#,
        )
        .unwrap();
        let categories = load_category_table(&path).unwrap();
        assert_eq!(categories[0].id.as_str(), "eras");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_unsupported_extension() {
        let path = temp_table_path("toml");
        fs::write(&path, "categories = []").unwrap();
        let err = load_category_table(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
        let _ = fs::remove_file(&path);
    }
}
