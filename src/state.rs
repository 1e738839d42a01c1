use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::types::{CategoryView, Config, DashboardMetric, InsightResult, UserRole};

/// What the user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub category: CategoryView,
    pub metric: DashboardMetric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_project_id: Option<String>,
}

/// Insight panel contents. `payload` is replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPanel {
    pub payload: Option<InsightResult>,
    pub is_loading: bool,
}

/// User actions the shell understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    SelectCategory(CategoryView),
    SelectMetric(DashboardMetric),
    OpenProject(String),
    CloseProject,
    SelectRole(UserRole),
}

/// Follow-up the caller owes after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// State changed; re-render.
    Render,
    /// Category changed; re-render and dispatch a new insight request.
    FetchInsights,
}

/// Identifies one dispatched insight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightTicket {
    pub generation: u64,
    pub category: CategoryView,
    pub metric: DashboardMetric,
}

/// Presentation state. Mutated only through [`ShellState::apply`] and the
/// insight ticket pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellState {
    pub selection: Selection,
    pub role: UserRole,
    pub insights: InsightPanel,
    latest_generation: u64,
}

impl ShellState {
    pub fn new(role: UserRole) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Apply one user action. Repeating an action is a no-op.
    ///
    /// Opening a project that is not in `catalog` leaves the state as is.
    pub fn apply(&mut self, action: ShellAction, catalog: &Catalog) -> Effect {
        match action {
            ShellAction::SelectCategory(category) => {
                if self.selection.category == category {
                    return Effect::None;
                }
                self.selection.category = category;
                Effect::FetchInsights
            }
            ShellAction::SelectMetric(metric) => {
                if self.selection.metric == metric {
                    return Effect::None;
                }
                self.selection.metric = metric;
                Effect::Render
            }
            ShellAction::OpenProject(id) => {
                if !catalog.contains(&id) {
                    log::debug!("Ignoring detail request for unknown project {}", id);
                    return Effect::None;
                }
                if self.selection.selected_project_id.as_deref() == Some(id.as_str()) {
                    return Effect::None;
                }
                self.selection.selected_project_id = Some(id);
                Effect::Render
            }
            ShellAction::CloseProject => match self.selection.selected_project_id.take() {
                Some(_) => Effect::Render,
                None => Effect::None,
            },
            ShellAction::SelectRole(role) => {
                if self.role == role {
                    return Effect::None;
                }
                self.role = role;
                Effect::Render
            }
        }
    }

    /// Tag a new insight request and raise the loading flag.
    pub fn begin_insight_request(&mut self) -> InsightTicket {
        self.latest_generation += 1;
        self.insights.is_loading = true;
        InsightTicket {
            generation: self.latest_generation,
            category: self.selection.category,
            metric: self.selection.metric,
        }
    }

    /// Store a settled request's result if it is still the latest one.
    ///
    /// Returns false, leaving the panel untouched, for superseded tickets.
    pub fn complete_insight_request(&mut self, ticket: InsightTicket, result: InsightResult) -> bool {
        if ticket.generation != self.latest_generation {
            log::debug!(
                "Discarding stale insights for {} (generation {}, latest {})",
                ticket.category,
                ticket.generation,
                self.latest_generation
            );
            return false;
        }
        self.insights.payload = Some(result);
        self.insights.is_loading = false;
        true
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }
}

/// Get the canonical config file path (~/.astra/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".astra").join("config.json"))
}

/// Load configuration from ~/.astra/config.json
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!(
            "Config file not found at {}. Defaults apply; create it with: {{ \"insights\": {{ \"enabled\": true }} }}",
            path.display()
        ));
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fresh() -> (ShellState, Catalog) {
        (ShellState::default(), Catalog::builtin())
    }

    #[test]
    fn test_defaults() {
        let state = ShellState::default();
        assert_eq!(state.selection.category, CategoryView::All);
        assert_eq!(state.selection.metric, DashboardMetric::ProjectCount);
        assert_eq!(state.selection.selected_project_id, None);
        assert_eq!(state.role, UserRole::Chairman);
        assert_eq!(state.insights, InsightPanel::default());
    }

    #[test]
    fn test_category_change_requests_insights() {
        let (mut state, catalog) = fresh();
        let effect = state.apply(ShellAction::SelectCategory(CategoryView::SatelliteInfra), &catalog);
        assert_eq!(effect, Effect::FetchInsights);
        assert_eq!(state.selection.category, CategoryView::SatelliteInfra);

        let again = state.apply(ShellAction::SelectCategory(CategoryView::SatelliteInfra), &catalog);
        assert_eq!(again, Effect::None);
    }

    #[test]
    fn test_metric_change_only_renders() {
        let (mut state, catalog) = fresh();
        assert_eq!(
            state.apply(ShellAction::SelectMetric(DashboardMetric::Budget), &catalog),
            Effect::Render
        );
        assert_eq!(
            state.apply(ShellAction::SelectMetric(DashboardMetric::Budget), &catalog),
            Effect::None
        );
        assert_eq!(state.selection.category, CategoryView::All);
    }

    #[test]
    fn test_open_and_close_detail() {
        let (mut state, catalog) = fresh();
        assert_eq!(
            state.apply(ShellAction::OpenProject("LV-02".into()), &catalog),
            Effect::Render
        );
        assert_eq!(state.selection.selected_project_id.as_deref(), Some("LV-02"));
        assert_eq!(
            state.apply(ShellAction::OpenProject("LV-02".into()), &catalog),
            Effect::None
        );
        assert_eq!(state.apply(ShellAction::CloseProject, &catalog), Effect::Render);
        assert_eq!(state.selection.selected_project_id, None);
        assert_eq!(state.apply(ShellAction::CloseProject, &catalog), Effect::None);
    }

    #[test]
    fn test_open_unknown_project_is_ignored() {
        let (mut state, catalog) = fresh();
        state.apply(ShellAction::OpenProject("UF-01".into()), &catalog);
        let before = state.clone();
        assert_eq!(
            state.apply(ShellAction::OpenProject("NOPE".into()), &catalog),
            Effect::None
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_role_is_cosmetic() {
        let (mut state, catalog) = fresh();
        let selection = state.selection.clone();
        assert_eq!(
            state.apply(ShellAction::SelectRole(UserRole::ProjectDirector), &catalog),
            Effect::Render
        );
        assert_eq!(state.selection, selection);
        assert_eq!(state.role, UserRole::ProjectDirector);
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut state = ShellState::default();
        let first = state.begin_insight_request();
        let second = state.begin_insight_request();
        assert!(state.insights.is_loading);
        assert_eq!(second.generation, first.generation + 1);

        let mut newer = InsightResult::fallback();
        newer.executive_summary = "newer".to_string();
        assert!(state.complete_insight_request(second, newer.clone()));
        assert!(!state.insights.is_loading);

        // The earlier request settles last and must not overwrite.
        assert!(!state.complete_insight_request(first, InsightResult::fallback()));
        assert_eq!(state.insights.payload, Some(newer));
        assert!(!state.insights.is_loading);
    }

    #[test]
    fn test_stale_completion_keeps_loading_flag() {
        let mut state = ShellState::default();
        let first = state.begin_insight_request();
        let _second = state.begin_insight_request();
        assert!(!state.complete_insight_request(first, InsightResult::fallback()));
        assert!(state.insights.is_loading);
        assert_eq!(state.insights.payload, None);
    }

    #[test]
    fn test_ticket_records_category() {
        let (mut state, catalog) = fresh();
        state.apply(ShellAction::SelectCategory(CategoryView::UserFunded), &catalog);
        state.apply(ShellAction::SelectMetric(DashboardMetric::Expenditure), &catalog);
        let ticket = state.begin_insight_request();
        assert_eq!(ticket.category, CategoryView::UserFunded);
        assert_eq!(ticket.metric, DashboardMetric::Expenditure);
        assert_eq!(state.latest_generation(), ticket.generation);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"defaultRole": "Project Director", "insights": {{"model": "gemini-test", "timeoutSecs": 2}}}}"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.default_role, UserRole::ProjectDirector);
        assert_eq!(config.insights.model, "gemini-test");
        assert_eq!(config.insights.timeout_secs, 2);
        assert!(config.insights.enabled);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("config.json")).unwrap_err();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config_from(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }
}
