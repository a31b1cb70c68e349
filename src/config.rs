//! Run-time configuration: page geometry, reflow thresholds and the visual
//! identity. Every section is optional in the JSON file; missing keys keep
//! their defaults.
use crate::error::PipelineError;
use docstage_paginate::PaginationConfig;
use docstage_style::{IdentityTable, PageGeometry};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub page: PageGeometry,
    pub pagination: PaginationConfig,
    pub identity: IdentityTable,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loading configuration from {}", path.display());
        Self::from_json(&json)
    }

    /// Rejects geometry that leaves no room for content.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let page = &self.page;
        if page.width_mm <= 2.0 * page.margin_mm {
            return Err(PipelineError::Config(format!(
                "page width {}mm leaves no room inside {}mm margins",
                page.width_mm, page.margin_mm
            )));
        }
        if page.content_budget_px() <= 0.0 {
            return Err(PipelineError::Config(format!(
                "content budget {}mm is smaller than the footer clearance",
                page.content_budget_mm
            )));
        }
        if page.content_budget_mm > page.height_mm {
            return Err(PipelineError::Config(format!(
                "content budget {}mm exceeds the page height {}mm",
                page.content_budget_mm, page.height_mm
            )));
        }
        Ok(())
    }
}

/// Reads a JSON array of callout snippets.
pub fn load_callouts(path: impl AsRef<Path>) -> Result<Vec<String>, PipelineError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let snippets: Vec<String> = serde_json::from_str(&json)?;
    log::info!("Loaded {} callout snippets", snippets.len());
    Ok(snippets)
}
