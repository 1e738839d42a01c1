//! Derived dashboard state.
//!
//! Everything the dashboard shows is a pure function of the catalog and the
//! two selection inputs (category view, active metric). No caching and no
//! hidden counters: calling any of these twice with the same inputs returns
//! equal values.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::types::{
    CategoryView, DashboardMetric, DashboardStats, Project, ProjectStatus,
};
use crate::util::{percent_of, truncate_label};

/// Line items consuming more than this share of their allocation are flagged.
pub const CRITICAL_USAGE_PERCENT: f64 = 90.0;

/// One bar pair of the "Resource Dynamics" chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBar {
    pub label: String,
    pub total_budget: u64,
    pub spent_budget: u64,
}

/// One point of the "Mission Readiness" area chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub label: String,
    pub progress: u8,
}

/// A row of the detail view's efficiency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakupRow {
    pub category: String,
    pub allocated: u64,
    pub spent: u64,
    pub usage_percent: f64,
    pub critical: bool,
}

/// Drill-down for a single project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub spend_ratio: f64,
    pub breakup: Vec<BreakupRow>,
}

/// Everything the renderer needs for one frame, minus the insight panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    pub category: CategoryView,
    pub metric: DashboardMetric,
    pub stats: DashboardStats,
    pub projects: Vec<Project>,
    pub budget_chart: Vec<BudgetBar>,
    pub progress_chart: Vec<ProgressPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ProjectDetail>,
}

/// `spent / total`, with a zero budget counting as ratio 0.
pub fn spend_ratio(project: &Project) -> f64 {
    if project.total_budget == 0 {
        0.0
    } else {
        project.spent_budget as f64 / project.total_budget as f64
    }
}

/// Projects visible under `view`, in catalog order.
pub fn filter_by_category(projects: &[Project], view: CategoryView) -> Vec<&Project> {
    match view.category() {
        None => projects.iter().collect(),
        Some(category) => projects.iter().filter(|p| p.category == category).collect(),
    }
}

/// Reorder in place for the active KPI card. Membership never changes and
/// both sorts are stable, so ties keep catalog order.
pub fn order_by_metric(projects: &mut [&Project], metric: DashboardMetric) {
    match metric {
        DashboardMetric::ProjectCount => {}
        DashboardMetric::Budget => {
            projects.sort_by(|a, b| b.total_budget.cmp(&a.total_budget));
        }
        DashboardMetric::Expenditure => {
            projects.sort_by(|a, b| spend_ratio(b).total_cmp(&spend_ratio(a)));
        }
    }
}

/// Category-filtered, metric-ordered projects.
pub fn working_set(
    catalog: &Catalog,
    view: CategoryView,
    metric: DashboardMetric,
) -> Vec<&Project> {
    let mut set = filter_by_category(catalog.projects(), view);
    order_by_metric(&mut set, metric);
    set
}

/// KPI card values over the whole catalog, independent of any selection.
/// Amount totals saturate at `u64::MAX`.
pub fn dashboard_stats(catalog: &Catalog) -> DashboardStats {
    let projects = catalog.projects();
    DashboardStats {
        total_projects: projects.len(),
        approved_budget: projects
            .iter()
            .map(|p| p.total_budget)
            .fold(0u64, u64::saturating_add),
        total_expenditure: projects
            .iter()
            .map(|p| p.spent_budget)
            .fold(0u64, u64::saturating_add),
        active_missions: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::InProgress)
            .count(),
    }
}

pub fn budget_chart(projects: &[&Project]) -> Vec<BudgetBar> {
    projects
        .iter()
        .map(|p| BudgetBar {
            label: truncate_label(&p.name),
            total_budget: p.total_budget,
            spent_budget: p.spent_budget,
        })
        .collect()
}

pub fn progress_chart(projects: &[&Project]) -> Vec<ProgressPoint> {
    projects
        .iter()
        .map(|p| ProgressPoint {
            label: p.name.clone(),
            progress: p.progress,
        })
        .collect()
}

/// Drill-down for `id`; `None` when the id is not in the catalog.
pub fn project_detail(catalog: &Catalog, id: &str) -> Option<ProjectDetail> {
    let project = catalog.get(id)?;
    let breakup = project
        .breakup
        .iter()
        .map(|item| {
            let usage_percent = percent_of(item.spent, item.allocated);
            BreakupRow {
                category: item.category.clone(),
                allocated: item.allocated,
                spent: item.spent,
                usage_percent,
                critical: usage_percent > CRITICAL_USAGE_PERCENT,
            }
        })
        .collect();

    Some(ProjectDetail {
        project: project.clone(),
        spend_ratio: spend_ratio(project),
        breakup,
    })
}

/// Compute every derived value for one selection.
pub fn derive_view(
    catalog: &Catalog,
    view: CategoryView,
    metric: DashboardMetric,
    selected_project_id: Option<&str>,
) -> DerivedView {
    let set = working_set(catalog, view, metric);
    DerivedView {
        category: view,
        metric,
        stats: dashboard_stats(catalog),
        budget_chart: budget_chart(&set),
        progress_chart: progress_chart(&set),
        projects: set.into_iter().cloned().collect(),
        detail: selected_project_id.and_then(|id| project_detail(catalog, id)),
    }
}
