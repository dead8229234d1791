//! Processing-mode selection so each prompt reaches the model that suits it.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::collab::TransformConnection;
use crate::registry::{Category, CategoryId, CategoryMode, OptionRegistry};

/// Downstream transformation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Preserve the person, restyle them.
    Subject,
    /// Replace the environment.
    Scene,
}

impl ProcessingMode {
    pub fn label(self) -> &'static str {
        match self {
            ProcessingMode::Subject => "subject",
            ProcessingMode::Scene => "scene",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelSelector {
    freeform_override: Option<ProcessingMode>,
}

impl ModelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode_for_category(&self, category: &Category) -> ProcessingMode {
        match category.mode {
            CategoryMode::Subject => ProcessingMode::Subject,
            CategoryMode::Scene => ProcessingMode::Scene,
            CategoryMode::Freeform => self.freeform_override.unwrap_or(ProcessingMode::Scene),
        }
    }

    pub fn mode_for(&self, registry: &OptionRegistry, id: &CategoryId) -> Result<ProcessingMode> {
        Ok(self.mode_for_category(registry.category(id)?))
    }

    pub fn freeform_override(&self) -> Option<ProcessingMode> {
        self.freeform_override
    }

    /// Rotate the override `None -> Subject -> Scene -> None`.
    pub fn cycle_freeform_override(&mut self) -> Option<ProcessingMode> {
        self.freeform_override = match self.freeform_override {
            None => Some(ProcessingMode::Subject),
            Some(ProcessingMode::Subject) => Some(ProcessingMode::Scene),
            Some(ProcessingMode::Scene) => None,
        };
        self.freeform_override
    }
}

/// Last mode applied to the connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSwitch {
    active: Option<ProcessingMode>,
}

impl ModeSwitch {
    /// `initial` is the mode the connection is known to start in, if any.
    pub fn new(initial: Option<ProcessingMode>) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Option<ProcessingMode> {
        self.active
    }

    /// Switch the connection into `mode` unless it is already there.
    /// Returns whether a switch was issued.
    pub fn ensure(
        &mut self,
        connection: &mut impl TransformConnection,
        mode: ProcessingMode,
    ) -> bool {
        if self.active == Some(mode) {
            return false;
        }
        connection.set_mode(mode);
        self.active = Some(mode);
        true
    }
}
