//! Plain-text rendering of a [`DashboardView`].

use std::fmt::Write;

use crate::engine::{BudgetBar, ProgressPoint, ProjectDetail};
use crate::shell::DashboardView;
use crate::state::InsightPanel;
use crate::types::{DashboardMetric, Project};
use crate::util::{format_axis_millions, format_currency};

const BAR_WIDTH: usize = 30;
const PROGRESS_WIDTH: usize = 20;
const RULE_WIDTH: usize = 78;

/// Render the whole dashboard, detail view last when one is open.
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    render_header(&mut out, view);
    render_kpis(&mut out, view);
    render_budget_chart(&mut out, &view.derived.budget_chart);
    render_progress_chart(&mut out, &view.derived.progress_chart);
    render_registry(&mut out, &view.derived.projects);
    render_insights(&mut out, &view.insights);
    if let Some(detail) = &view.derived.detail {
        render_detail(&mut out, detail);
    }
    out
}

fn rule(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "== {} {}", title, "=".repeat(RULE_WIDTH.saturating_sub(title.len() + 4)));
}

fn render_header(out: &mut String, view: &DashboardView) {
    let _ = writeln!(
        out,
        "ASTRA MISSION COMMAND | {} | role: {}",
        view.derived.category, view.role
    );
}

fn render_kpis(out: &mut String, view: &DashboardView) {
    let stats = &view.derived.stats;
    let active = view.derived.metric;
    let cards = [
        (Some(DashboardMetric::ProjectCount), stats.total_projects.to_string()),
        (Some(DashboardMetric::Budget), format_currency(stats.approved_budget)),
        (Some(DashboardMetric::Expenditure), format_currency(stats.total_expenditure)),
        (None, stats.active_missions.to_string()),
    ];

    rule(out, "Key Indicators");
    for (metric, value) in cards {
        let marker = if metric == Some(active) { ">" } else { " " };
        let title = metric.map(|m| m.as_str()).unwrap_or("Active Missions");
        let _ = writeln!(out, "{} {:<18}{:>10}", marker, title, value);
    }
}

fn render_budget_chart(out: &mut String, bars: &[BudgetBar]) {
    rule(out, "Resource Dynamics");
    if bars.is_empty() {
        let _ = writeln!(out, "  (no projects)");
        return;
    }
    let scale = bars
        .iter()
        .map(|b| b.total_budget.max(b.spent_budget))
        .max()
        .unwrap_or(0);

    for bar in bars {
        let _ = writeln!(
            out,
            "  {:<12} budget {:<width$} {}",
            bar.label,
            "#".repeat(scaled(bar.total_budget, scale, BAR_WIDTH)),
            format_axis_millions(bar.total_budget),
            width = BAR_WIDTH
        );
        let _ = writeln!(
            out,
            "  {:<12} spent  {:<width$} {}",
            "",
            "=".repeat(scaled(bar.spent_budget, scale, BAR_WIDTH)),
            format_axis_millions(bar.spent_budget),
            width = BAR_WIDTH
        );
    }
}

fn render_progress_chart(out: &mut String, points: &[ProgressPoint]) {
    rule(out, "Mission Readiness");
    if points.is_empty() {
        let _ = writeln!(out, "  (no projects)");
        return;
    }
    for point in points {
        let filled = scaled(point.progress as u64, 100, PROGRESS_WIDTH);
        let _ = writeln!(
            out,
            "  {:<28} [{}{}] {:>3}%",
            point.label,
            "*".repeat(filled),
            ".".repeat(PROGRESS_WIDTH - filled),
            point.progress
        );
    }
}

fn render_registry(out: &mut String, projects: &[Project]) {
    rule(out, "Project Registry");
    let _ = writeln!(
        out,
        "  {:<6} {:<28} {:<12} {:>4} {:>8} {:>8}  {}",
        "ID", "Name", "Status", "%", "Budget", "Spent", "Director"
    );
    for p in projects {
        let _ = writeln!(
            out,
            "  {:<6} {:<28} {:<12} {:>4} {:>8} {:>8}  {}",
            p.id,
            p.name,
            p.status.as_str(),
            p.progress,
            format_currency(p.total_budget),
            format_currency(p.spent_budget),
            p.director
        );
    }
}

fn render_insights(out: &mut String, panel: &InsightPanel) {
    rule(out, "Automated Insights");
    if panel.is_loading {
        let _ = writeln!(out, "  Analyzing mission data...");
    }
    let Some(insight) = &panel.payload else {
        if !panel.is_loading {
            let _ = writeln!(out, "  No insights yet.");
        }
        return;
    };

    let _ = writeln!(out, "  Summary: {}", insight.executive_summary);
    if !insight.risk_alerts.is_empty() {
        let _ = writeln!(out, "  Risk alerts:");
        for alert in &insight.risk_alerts {
            let _ = writeln!(out, "    ! {}", alert);
        }
    }
    let _ = writeln!(out, "  Financial health: {}", insight.financial_health);
}

fn render_detail(out: &mut String, detail: &ProjectDetail) {
    let p = &detail.project;
    rule(out, &format!("{} ({})", p.name, p.id));
    let _ = writeln!(out, "  {} | {} | director: {}", p.category, p.status, p.director);
    let _ = writeln!(out, "  {} to {}", p.start_date, p.end_date);
    let _ = writeln!(out, "  {}", p.description);
    let _ = writeln!(
        out,
        "  Budget {} | spent {} ({:.1}%) | progress {}%",
        format_currency(p.total_budget),
        format_currency(p.spent_budget),
        detail.spend_ratio * 100.0,
        p.progress
    );

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<28} {:>10} {:>10} {:>8}",
        "Line item", "Allocated", "Spent", "Usage"
    );
    for row in &detail.breakup {
        let flag = if row.critical { "  CRITICAL" } else { "" };
        let _ = writeln!(
            out,
            "  {:<28} {:>10} {:>10} {:>7.1}%{}",
            row.category,
            format_currency(row.allocated),
            format_currency(row.spent),
            row.usage_percent,
            flag
        );
    }
}

/// Width of a bar for `value` on a `scale`-wide axis, capped at `width`.
fn scaled(value: u64, scale: u64, width: usize) -> usize {
    if scale == 0 {
        return 0;
    }
    let cells = (value as f64 / scale as f64 * width as f64).round() as usize;
    cells.min(width)
}
