use jobs_intel::dashboard::{ChartHandle, DataClient, JobsQuery};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::controller::DashboardShell;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared by the dashboard handlers. The shell is only touched by
/// synchronous code and never held across an await.
#[derive(Clone)]
pub(crate) struct DashboardState {
    pub(crate) client: DataClient,
    pub(crate) shell: Arc<Mutex<DashboardShell>>,
}

impl DashboardState {
    pub(crate) fn new(client: DataClient, shell: DashboardShell) -> Self {
        Self {
            client,
            shell: Arc::new(Mutex::new(shell)),
        }
    }

    pub(crate) fn shell(&self) -> MutexGuard<'_, DashboardShell> {
        self.shell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A chart placeholder bound to a canvas slot in a rendered view.
#[derive(Debug)]
pub(crate) struct ChartMount {
    pub(crate) slot: &'static str,
    pub(crate) kind: &'static str,
}

impl ChartHandle for ChartMount {
    fn destroy(&mut self) {
        debug!(slot = self.slot, kind = self.kind, "chart slot released");
    }
}

/// Query parameters accepted wherever a jobs listing is rendered.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct JobsParams {
    #[serde(default)]
    pub(crate) query: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) job_type: Option<String>,
    #[serde(default)]
    pub(crate) source: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<u32>,
    #[serde(default)]
    pub(crate) force: Option<String>,
}

impl From<JobsParams> for JobsQuery {
    fn from(params: JobsParams) -> Self {
        let defaults = JobsQuery::default();
        JobsQuery {
            query: params.query.map(|q| q.trim().to_string()).unwrap_or_default(),
            job_type: params.job_type.unwrap_or(defaults.job_type),
            source: params.source.unwrap_or(defaults.source),
            page: params.page.filter(|page| *page > 0).unwrap_or(defaults.page),
            force: is_truthy(params.force.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ForceParams {
    #[serde(default)]
    pub(crate) force: Option<String>,
}

pub(crate) fn is_truthy(flag: Option<&str>) -> bool {
    matches!(
        flag.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jobs_params_fill_defaults() {
        let query = JobsQuery::from(JobsParams::default());
        assert_eq!(query, JobsQuery::default());
    }

    #[test]
    fn jobs_params_map_force_and_page() {
        let query = JobsQuery::from(JobsParams {
            query: Some("  rust ".to_string()),
            job_type: Some("remote".to_string()),
            source: Some("Remotive".to_string()),
            page: Some(0),
            force: Some("1".to_string()),
        });
        assert_eq!(query.query, "rust");
        assert_eq!(query.page, 1);
        assert!(query.force);
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(None));
    }
}
