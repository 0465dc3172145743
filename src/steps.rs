//! Development-step templates and project bootstrap
//!
//! New projects get their step checklist minted from an ordered template
//! table. The template source is behind a trait so persistence backends
//! (CSV seed, database, fixture) stay interchangeable.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default path to the step template seed file
pub const DEFAULT_TEMPLATE_PATH: &str = "data/projects/step_templates.csv";

/// Errors surfaced while reading step templates
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// One template row: the three fields a bootstrap copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTemplate {
    pub name: String,
    pub phase: Option<i32>,
    pub development_type: Option<String>,
}

/// A project's development step
///
/// Bootstrap rows carry name/phase/development_type only; dates, spend,
/// and status start blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevelopmentStep {
    pub project_id: u32,
    pub name: String,
    pub phase: Option<i32>,
    pub development_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub planned_spend: Option<f64>,
    pub actual_spend: Option<f64>,
}

impl DevelopmentStep {
    /// Mint a blank step for a project from a template row
    pub fn from_template(project_id: u32, template: &StepTemplate) -> Self {
        Self {
            project_id,
            name: template.name.clone(),
            phase: template.phase,
            development_type: template.development_type.clone(),
            start_date: None,
            end_date: None,
            status: None,
            planned_spend: None,
            actual_spend: None,
        }
    }
}

/// Source of ordered step templates
pub trait StepTemplateProvider {
    fn templates(&self) -> Result<Vec<StepTemplate>, TemplateError>;
}

/// CSV-backed template source
/// Columns: name, phase, dev_type
pub struct CsvStepTemplates {
    path: PathBuf,
}

impl CsvStepTemplates {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Self {
        Self::new(Path::new(DEFAULT_TEMPLATE_PATH))
    }
}

impl StepTemplateProvider for CsvStepTemplates {
    fn templates(&self) -> Result<Vec<StepTemplate>, TemplateError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut templates = Vec::new();

        for result in reader.records() {
            let record = result?;
            let Some(name) = record.get(0).map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };

            templates.push(StepTemplate {
                name: name.to_string(),
                phase: record.get(1).and_then(|s| s.trim().parse().ok()),
                development_type: record
                    .get(2)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            });
        }

        Ok(templates)
    }
}

/// Ensure a project has a step checklist.
///
/// A project that already has steps is returned unchanged; otherwise one
/// blank step per template is minted, in template order. Pure over its
/// inputs; storing the result is the caller's concern.
pub fn bootstrap_steps(
    project_id: u32,
    existing: Vec<DevelopmentStep>,
    provider: &dyn StepTemplateProvider,
) -> Result<Vec<DevelopmentStep>, TemplateError> {
    if !existing.is_empty() {
        return Ok(existing);
    }

    let steps = provider
        .templates()?
        .iter()
        .map(|t| DevelopmentStep::from_template(project_id, t))
        .collect();

    Ok(steps)
}
