use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configuration stored in ~/.astra/config.json
///
/// Every field is optional; an absent file behaves like `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON project catalog replacing the built-in seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub default_role: UserRole,
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Settings for the automated insight panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_insight_model")]
    pub model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Upper bound for one insight request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fallback credential when neither `API_KEY` nor `GEMINI_API_KEY` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_insight_model(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_insight_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

// =============================================================================
// Project records
// =============================================================================

/// Programme line a project is funded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Launch Vehicles")]
    LaunchVehicle,
    #[serde(rename = "Satellite Infrastructure")]
    SatelliteInfra,
    #[serde(rename = "User Funded Projects")]
    UserFunded,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 3] = [
        ProjectCategory::LaunchVehicle,
        ProjectCategory::SatelliteInfra,
        ProjectCategory::UserFunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::LaunchVehicle => "Launch Vehicles",
            ProjectCategory::SatelliteInfra => "Satellite Infrastructure",
            ProjectCategory::UserFunded => "User Funded Projects",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Delayed,
    Planning,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Delayed => "Delayed",
            ProjectStatus::Planning => "Planning",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a project's expenditure breakup. Categories may repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureBreakup {
    pub category: String,
    pub allocated: u64,
    pub spent: u64,
}

/// A funded initiative. Amounts are whole USD; `spent_budget` may exceed
/// `total_budget`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    /// Percentage, 0..=100.
    pub progress: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_budget: u64,
    pub spent_budget: u64,
    pub director: String,
    pub description: String,
    #[serde(default)]
    pub breakup: Vec<ExpenditureBreakup>,
}

/// Agency-wide KPI card values. Always computed over the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub approved_budget: u64,
    pub total_expenditure: u64,
    pub active_missions: usize,
}

// =============================================================================
// Selection inputs
// =============================================================================

/// Sidebar layer: the whole agency or one programme line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryView {
    #[default]
    #[serde(rename = "Overall Dashboard")]
    All,
    #[serde(rename = "Launch Vehicles")]
    LaunchVehicle,
    #[serde(rename = "Satellite Infrastructure")]
    SatelliteInfra,
    #[serde(rename = "User Funded Projects")]
    UserFunded,
}

impl CategoryView {
    pub const ALL: [CategoryView; 4] = [
        CategoryView::All,
        CategoryView::LaunchVehicle,
        CategoryView::SatelliteInfra,
        CategoryView::UserFunded,
    ];

    /// The category this view narrows to, `None` for the overall view.
    pub fn category(&self) -> Option<ProjectCategory> {
        match self {
            CategoryView::All => None,
            CategoryView::LaunchVehicle => Some(ProjectCategory::LaunchVehicle),
            CategoryView::SatelliteInfra => Some(ProjectCategory::SatelliteInfra),
            CategoryView::UserFunded => Some(ProjectCategory::UserFunded),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.category() {
            Some(category) => category.as_str(),
            None => "Overall Dashboard",
        }
    }
}

impl fmt::Display for CategoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "all" | "overall" | "overall-dashboard" => Ok(CategoryView::All),
            "lv" | "launch-vehicle" | "launch-vehicles" => Ok(CategoryView::LaunchVehicle),
            "si" | "satellite-infra" | "satellite-infrastructure" => {
                Ok(CategoryView::SatelliteInfra)
            }
            "uf" | "user-funded" | "user-funded-projects" => Ok(CategoryView::UserFunded),
            _ => Err(format!(
                "unknown category '{}' (expected all, launch-vehicles, satellite-infra, user-funded)",
                s
            )),
        }
    }
}

/// KPI card driving the working-set order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardMetric {
    #[default]
    #[serde(rename = "Total Projects")]
    ProjectCount,
    #[serde(rename = "Approved Budget")]
    Budget,
    Expenditure,
}

impl DashboardMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardMetric::ProjectCount => "Total Projects",
            DashboardMetric::Budget => "Approved Budget",
            DashboardMetric::Expenditure => "Expenditure",
        }
    }
}

impl fmt::Display for DashboardMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "projects" | "count" | "total-projects" | "project-count" => {
                Ok(DashboardMetric::ProjectCount)
            }
            "budget" | "approved-budget" => Ok(DashboardMetric::Budget),
            "expenditure" | "spend" | "spent" => Ok(DashboardMetric::Expenditure),
            _ => Err(format!(
                "unknown metric '{}' (expected projects, budget, expenditure)",
                s
            )),
        }
    }
}

/// Viewer role. Cosmetic: it changes the header badge, never what is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    Chairman,
    #[serde(rename = "Programme Officer")]
    ProgrammeOfficer,
    #[serde(rename = "Project Director")]
    ProjectDirector,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Chairman => "Chairman",
            UserRole::ProgrammeOfficer => "Programme Officer",
            UserRole::ProjectDirector => "Project Director",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "chairman" => Ok(UserRole::Chairman),
            "programme-officer" | "program-officer" | "officer" => Ok(UserRole::ProgrammeOfficer),
            "project-director" | "director" => Ok(UserRole::ProjectDirector),
            _ => Err(format!(
                "unknown role '{}' (expected chairman, programme-officer, project-director)",
                s
            )),
        }
    }
}

/// "Satellite Infrastructure" / "satellite_infra" → "satellite-infrastructure" / "satellite-infra"
fn normalize_token(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Insights
// =============================================================================

/// Automated summary shown beside the registry. Every field is required on
/// the wire; a response missing one is treated as a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub executive_summary: String,
    pub risk_alerts: Vec<String>,
    pub financial_health: String,
}

impl InsightResult {
    /// Content shown when the summarization service cannot be used.
    pub fn fallback() -> Self {
        Self {
            executive_summary: "Unable to generate automated insights at this time.".to_string(),
            risk_alerts: vec!["Manual review required for project schedules.".to_string()],
            financial_health: "Review detailed expenditure tabs.".to_string(),
        }
    }
}
