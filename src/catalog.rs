//! Project catalog: the read-only record set every view is derived from.
//!
//! Populated once at startup, either from the built-in seed or from a JSON
//! file (an array of project records in the same camelCase shape the
//! dashboard serializes). Never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::CatalogError;
use crate::types::{ExpenditureBreakup, Project, ProjectCategory, ProjectStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// Build a catalog, rejecting out-of-range progress and reused ids.
    pub fn new(projects: Vec<Project>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for project in &projects {
            if project.progress > 100 {
                return Err(CatalogError::ProgressOutOfRange {
                    id: project.id.clone(),
                    progress: project.progress,
                });
            }
            if !seen.insert(project.id.as_str()) {
                return Err(CatalogError::DuplicateId(project.id.clone()));
            }
        }
        Ok(Self { projects })
    }

    /// The six-project seed shipped with the dashboard.
    pub fn builtin() -> Self {
        Self {
            projects: seed_projects(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let projects: Vec<Project> = serde_json::from_str(json)?;
        Self::new(projects)
    }

    /// Load a JSON catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        log::info!(
            "Loaded {} projects from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Records in insertion order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

// =============================================================================
// Built-in seed
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn line(category: &str, allocated: u64, spent: u64) -> ExpenditureBreakup {
    ExpenditureBreakup {
        category: category.to_string(),
        allocated,
        spent,
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    name: &str,
    category: ProjectCategory,
    status: ProjectStatus,
    progress: u8,
    (start_date, end_date): (NaiveDate, NaiveDate),
    (total_budget, spent_budget): (u64, u64),
    director: &str,
    description: &str,
    breakup: Vec<ExpenditureBreakup>,
) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        category,
        status,
        progress,
        start_date,
        end_date,
        total_budget,
        spent_budget,
        director: director.to_string(),
        description: description.to_string(),
        breakup,
    }
}

fn seed_projects() -> Vec<Project> {
    vec![
        project(
            "LV-01",
            "Nebula-X Heavy Lift",
            ProjectCategory::LaunchVehicle,
            ProjectStatus::InProgress,
            75,
            (date(2023, 1, 1), date(2025, 12, 31)),
            (450_000_000, 320_000_000),
            "Dr. Sarah Chen",
            "Next generation heavy lift vehicle for lunar missions.",
            vec![
                line("Propulsion R&D", 150_000_000, 120_000_000),
                line("Structural Components", 100_000_000, 85_000_000),
                line("Avionics", 80_000_000, 60_000_000),
                line("Testing & Logistics", 120_000_000, 55_000_000),
            ],
        ),
        project(
            "LV-02",
            "SmallSat Express",
            ProjectCategory::LaunchVehicle,
            ProjectStatus::Delayed,
            40,
            (date(2024, 3, 1), date(2026, 6, 30)),
            (120_000_000, 45_000_000),
            "Robert Miller",
            "Rapid deployment launcher for small satellite constellations.",
            vec![
                line("Engine Development", 40_000_000, 15_000_000),
                line("Platform Systems", 30_000_000, 10_000_000),
                line("Ground Station Integration", 20_000_000, 12_000_000),
                line("Safety & Quality", 30_000_000, 8_000_000),
            ],
        ),
        project(
            "SI-01",
            "GeoScan 360",
            ProjectCategory::SatelliteInfra,
            ProjectStatus::InProgress,
            90,
            (date(2022, 6, 1), date(2024, 12, 31)),
            (280_000_000, 265_000_000),
            "Elena Petrov",
            "High-resolution hyperspectral earth observation satellite network.",
            vec![
                line("Sensor Suite", 120_000_000, 115_000_000),
                line("Data Link System", 60_000_000, 55_000_000),
                line("Solar Array Panels", 40_000_000, 40_000_000),
                line("Payload Integration", 60_000_000, 55_000_000),
            ],
        ),
        project(
            "SI-02",
            "DeepSpace Comms Relay",
            ProjectCategory::SatelliteInfra,
            ProjectStatus::Planning,
            10,
            (date(2025, 1, 1), date(2028, 12, 31)),
            (600_000_000, 20_000_000),
            "Dr. James Wilson",
            "Interplanetary communication relay system for future Mars missions.",
            vec![
                line("Design & Engineering", 150_000_000, 15_000_000),
                line("Long-lead Materials", 250_000_000, 5_000_000),
                line("Software Architecture", 100_000_000, 0),
                line("Integration Facilities", 100_000_000, 0),
            ],
        ),
        project(
            "UF-01",
            "SkyLink Private Mesh",
            ProjectCategory::UserFunded,
            ProjectStatus::Completed,
            100,
            (date(2021, 1, 1), date(2023, 12, 31)),
            (150_000_000, 150_000_000),
            "Mark Thompson",
            "Dedicated private communication network for SkyLink Corp.",
            vec![
                line("Contractor Fees", 50_000_000, 50_000_000),
                line("Launch Services", 60_000_000, 60_000_000),
                line("Licensing & Compliance", 20_000_000, 20_000_000),
                line("Operations Transfer", 20_000_000, 20_000_000),
            ],
        ),
        project(
            "UF-02",
            "UrbanMap RealTime",
            ProjectCategory::UserFunded,
            ProjectStatus::InProgress,
            60,
            (date(2023, 8, 1), date(2025, 2, 28)),
            (85_000_000, 52_000_000),
            "Alice Zhao",
            "Real-time urban mapping and traffic analysis infrastructure.",
            vec![
                line("Satellite Leasing", 30_000_000, 20_000_000),
                line("Cloud Infrastructure", 25_000_000, 15_000_000),
                line("AI Algorithm Dev", 20_000_000, 12_000_000),
                line("Ground Support", 10_000_000, 5_000_000),
            ],
        ),
    ]
}
