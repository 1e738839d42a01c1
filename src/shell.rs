//! Presentation shell runtime.
//!
//! Owns the [`ShellState`] behind a mutex shared with in-flight insight
//! tasks. Selection changes apply synchronously; insight requests run on
//! spawned tasks and publish through the generation check, so only the most
//! recently dispatched request can land in the panel.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::catalog::Catalog;
use crate::engine::{derive_view, working_set, DerivedView};
use crate::insights::InsightGateway;
use crate::state::{Effect, InsightPanel, ShellAction, ShellState};
use crate::types::{Project, UserRole};

/// One renderable frame: derived values plus role and insight panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    #[serde(flatten)]
    pub derived: DerivedView,
    pub role: UserRole,
    pub insights: InsightPanel,
}

pub struct Shell {
    catalog: Arc<Catalog>,
    gateway: Arc<InsightGateway>,
    state: Arc<Mutex<ShellState>>,
    updates: Arc<Notify>,
    auto_insights: bool,
}

impl Shell {
    pub fn new(catalog: Arc<Catalog>, gateway: Arc<InsightGateway>, role: UserRole) -> Self {
        Self {
            catalog,
            gateway,
            state: Arc::new(Mutex::new(ShellState::new(role))),
            updates: Arc::new(Notify::new()),
            auto_insights: true,
        }
    }

    /// Stop category changes from dispatching insight requests.
    pub fn without_auto_insights(mut self) -> Self {
        self.auto_insights = false;
        self
    }

    /// Apply a user action. Returns the insight task when the action
    /// triggered one.
    pub fn dispatch(&self, action: ShellAction) -> Option<JoinHandle<()>> {
        log::debug!("Shell action: {:?}", action);
        let effect = self.state.lock().apply(action, &self.catalog);
        match effect {
            Effect::FetchInsights if self.auto_insights => Some(self.refresh_insights()),
            Effect::FetchInsights => None,
            Effect::Render | Effect::None => None,
        }
    }

    /// Dispatch an insight request for the visible working set, in the
    /// order the active metric shows it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh_insights(&self) -> JoinHandle<()> {
        let ticket = self.state.lock().begin_insight_request();
        let projects: Vec<Project> = working_set(&self.catalog, ticket.category, ticket.metric)
            .into_iter()
            .cloned()
            .collect();
        log::debug!(
            "Dispatching insight generation {} for {} ({} projects)",
            ticket.generation,
            ticket.category,
            projects.len()
        );

        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let updates = Arc::clone(&self.updates);
        tokio::spawn(async move {
            let result = gateway.project_insights(&projects).await;
            let applied = state.lock().complete_insight_request(ticket, result);
            if applied {
                updates.notify_one();
            }
        })
    }

    /// Snapshot of everything the renderer needs right now.
    pub fn view(&self) -> DashboardView {
        let state = self.state.lock();
        let selection = &state.selection;
        DashboardView {
            derived: derive_view(
                &self.catalog,
                selection.category,
                selection.metric,
                selection.selected_project_id.as_deref(),
            ),
            role: state.role,
            insights: state.insights.clone(),
        }
    }

    pub fn state(&self) -> ShellState {
        self.state.lock().clone()
    }

    /// Signalled whenever an insight completion is applied.
    pub fn updates(&self) -> Arc<Notify> {
        Arc::clone(&self.updates)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
