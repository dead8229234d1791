use super::defaults::{CATEGORY_TABLE_EXTENSIONS, MAX_NAV_COOLDOWN_MS, STDIN_SCRIPT};
use super::AppConfig;
use crate::registry::{builtin_categories, load_category_table, OptionRegistry};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and the files they point at.
    pub fn validate(&mut self) -> Result<()> {
        if self.nav_cooldown_ms > MAX_NAV_COOLDOWN_MS {
            bail!(
                "--nav-cooldown-ms must be between 0 and {MAX_NAV_COOLDOWN_MS} ms, got {}",
                self.nav_cooldown_ms
            );
        }
        if !self.nav_deadzone.is_finite() || self.nav_deadzone <= 0.0 || self.nav_deadzone >= 1.0
        {
            bail!(
                "--nav-deadzone must be greater than 0.0 and less than 1.0, got {}",
                self.nav_deadzone
            );
        }

        if let Some(path) = &self.categories {
            check_category_table_path(path)?;
        }

        if let Some(script) = &self.script {
            if script.trim().is_empty() {
                bail!("--script must not be empty");
            }
            if script != STDIN_SCRIPT && !Path::new(script).is_file() {
                bail!("script file '{script}' does not exist");
            }
        }

        Ok(())
    }

    /// Build the registry from `--categories`, or the built-in catalog.
    pub fn load_registry(&self) -> Result<OptionRegistry> {
        let categories = match &self.categories {
            Some(path) => load_category_table(path)
                .with_context(|| format!("failed to load categories from '{}'", path.display()))?,
            None => builtin_categories()?,
        };
        OptionRegistry::new(categories)
    }
}

fn check_category_table_path(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !CATEGORY_TABLE_EXTENSIONS.contains(&extension.as_str()) {
        bail!(
            "category table '{}' must end in one of: {}",
            path.display(),
            CATEGORY_TABLE_EXTENSIONS.join(", ")
        );
    }
    if !path.is_file() {
        bail!("category table '{}' does not exist", path.display());
    }
    Ok(())
}
