//! CSV-based project record loader
//!
//! Reads the seed files in data/projects/ into typed records. Blank
//! cells become None; rows without a parsable id are skipped with a
//! warning rather than failing the whole load.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use log::warn;
use thiserror::Error;

use super::data::{ProjectDefaults, ProjectEconomics, ProjectIncentives, ProjectRecord};

/// Default path to the project seed directory
pub const DEFAULT_DATA_PATH: &str = "data/projects";

/// Errors surfaced while reading seed files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

fn opt_str(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn opt_f64(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record.get(idx).and_then(|s| s.trim().parse().ok())
}

fn opt_u32(record: &csv::StringRecord, idx: usize) -> Option<u32> {
    record.get(idx).and_then(|s| s.trim().parse().ok())
}

fn opt_date(record: &csv::StringRecord, idx: usize) -> Option<NaiveDate> {
    record
        .get(idx)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Load project rows from projects.csv
/// Columns: id, project_name, size_dc_mw, state, county
pub fn load_projects(path: &Path) -> Result<Vec<ProjectRecord>, LoadError> {
    let file = File::open(path.join("projects.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut projects = Vec::new();

    for result in reader.records() {
        let record = result?;
        let Some(id) = opt_u32(&record, 0) else {
            warn!("skipping projects.csv row without a numeric id");
            continue;
        };

        projects.push(ProjectRecord {
            id,
            project_name: opt_str(&record, 1).unwrap_or_default(),
            size_dc_mw: opt_f64(&record, 2),
            state: opt_str(&record, 3),
            county: opt_str(&record, 4),
        });
    }

    Ok(projects)
}

/// Load economics rows from project_economics.csv, keyed by project id
/// Columns: project_id, lease_start, lease_end, term_years, base_rent,
/// escalator_pct
pub fn load_economics(path: &Path) -> Result<HashMap<u32, ProjectEconomics>, LoadError> {
    let file = File::open(path.join("project_economics.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let Some(project_id) = opt_u32(&record, 0) else {
            warn!("skipping project_economics.csv row without a numeric project_id");
            continue;
        };

        rows.insert(
            project_id,
            ProjectEconomics {
                project_id,
                lease_start: opt_date(&record, 1),
                lease_end: opt_date(&record, 2),
                term_years: opt_u32(&record, 3),
                base_rent: opt_f64(&record, 4),
                escalator_pct: opt_f64(&record, 5),
            },
        );
    }

    Ok(rows)
}

/// Load incentive rows from project_incentives.csv, keyed by project id
/// Columns: project_id, itc_eligible_pct, rec_price, rec_tenor_years,
/// ppa_price, ppa_esc_pct, pvsyst_yield_mwh, pvsyst_deg_pct,
/// capex_per_kw, opex_per_kw_yr
pub fn load_incentives(path: &Path) -> Result<HashMap<u32, ProjectIncentives>, LoadError> {
    let file = File::open(path.join("project_incentives.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let Some(project_id) = opt_u32(&record, 0) else {
            warn!("skipping project_incentives.csv row without a numeric project_id");
            continue;
        };

        rows.insert(
            project_id,
            ProjectIncentives {
                project_id,
                itc_eligible_pct: opt_f64(&record, 1),
                rec_price: opt_f64(&record, 2),
                rec_tenor_years: opt_u32(&record, 3),
                ppa_price: opt_f64(&record, 4),
                ppa_esc_pct: opt_f64(&record, 5),
                pvsyst_yield_mwh: opt_f64(&record, 6),
                pvsyst_deg_pct: opt_f64(&record, 7),
                capex_per_kw: opt_f64(&record, 8),
                opex_per_kw_yr: opt_f64(&record, 9),
            },
        );
    }

    Ok(rows)
}

/// All project records, loaded once and queried per request
#[derive(Debug, Clone)]
pub struct ProjectBook {
    projects: Vec<ProjectRecord>,
    economics: HashMap<u32, ProjectEconomics>,
    incentives: HashMap<u32, ProjectIncentives>,
}

impl ProjectBook {
    /// Load all seed files from the default path
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_from(Path::new(DEFAULT_DATA_PATH))
    }

    /// Load all seed files from a specific directory
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            projects: load_projects(path)?,
            economics: load_economics(path)?,
            incentives: load_incentives(path)?,
        })
    }

    /// All known projects, in file order
    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    /// Look up a project by id
    pub fn find(&self, project_id: u32) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Stored economics row for a project, if any
    pub fn economics_for(&self, project_id: u32) -> Option<&ProjectEconomics> {
        self.economics.get(&project_id)
    }

    /// Stored incentives row for a project, if any
    pub fn incentives_for(&self, project_id: u32) -> Option<&ProjectIncentives> {
        self.incentives.get(&project_id)
    }

    /// Defaults snapshot for a known project; None for an unknown id
    pub fn defaults_for(&self, project_id: u32) -> Option<ProjectDefaults> {
        self.find(project_id)?;
        Some(ProjectDefaults::from_records(
            self.economics.get(&project_id),
            self.incentives.get(&project_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_seed_data() {
        let result = ProjectBook::load_default();
        assert!(result.is_ok(), "Failed to load seed data: {:?}", result.err());

        let book = result.unwrap();
        assert!(book.projects().len() >= 3);

        // Project 1 carries the baseline 1 MW assumptions
        let defaults = book.defaults_for(1).unwrap();
        assert_eq!(defaults.year1_mwh, Some(2200.0));
        assert_eq!(defaults.itc_pct, Some(30.0));
        assert_eq!(defaults.lease_annual, Some(12_000.0));
        assert_eq!(defaults.lease_term_years, Some(25));
    }

    #[test]
    fn test_term_derived_when_not_explicit() {
        let book = ProjectBook::load_default().unwrap();

        // Project 3 has lease dates but no explicit term
        let econ = book.economics_for(3).unwrap();
        assert!(econ.term_years.is_none());
        assert_eq!(book.defaults_for(3).unwrap().lease_term_years, Some(30));
    }

    #[test]
    fn test_unknown_project_has_no_defaults() {
        let book = ProjectBook::load_default().unwrap();
        assert!(book.find(9999).is_none());
        assert!(book.defaults_for(9999).is_none());
    }
}
