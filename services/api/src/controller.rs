//! Page controller: reacts to route activations by loading data through the
//! [`DataClient`] and assembling the markup for the active view.

use chrono::{DateTime, Utc};
use jobs_intel::dashboard::render::{
    render_job_card, render_news_card, render_ticker, skeletons, DEFAULT_SKELETON_CLASS,
};
use jobs_intel::dashboard::router::RouteListener;
use jobs_intel::dashboard::sanitize::escape_html;
use jobs_intel::dashboard::{
    Activation, ChartRegistry, DataClient, DataClientError, InMemoryViews, JobListing, JobsQuery,
    Location, NewsItem, Route, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::infra::ChartMount;

/// Job cards shown in the dashboard overview.
const DASHBOARD_JOB_CARDS: usize = 5;

/// Canvas slots each view mounts, as `(slot id, chart kind)`.
const CHART_SLOTS: &[(Route, &[(&str, &str)])] = &[
    (
        Route::Trends,
        &[
            ("chart-salary", "salary"),
            ("chart-growing-roles", "growing_roles"),
            ("chart-salary-roles", "salary_roles"),
        ],
    ),
    (
        Route::Insights,
        &[("chart-layoffs", "layoffs"), ("chart-bls", "bls")],
    ),
];

fn chart_slots(route: Route) -> &'static [(&'static str, &'static str)] {
    CHART_SLOTS
        .iter()
        .find(|(owner, _)| *owner == route)
        .map(|(_, slots)| *slots)
        .unwrap_or(&[])
}

/// Application-root navigation state: the router plus the chart slots the
/// active view occupies.
#[derive(Debug)]
pub(crate) struct DashboardShell {
    router: Router<InMemoryViews>,
    charts: ChartRegistry<ChartMount>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ViewChange {
    pub(crate) route: Route,
    pub(crate) title: String,
    pub(crate) activations: Vec<Activation>,
}

impl DashboardShell {
    pub(crate) fn start(initial_token: Option<&str>) -> (Self, Activation) {
        let mut router = Router::new(InMemoryViews::standard(), Location::new(initial_token));
        let listener: RouteListener = Box::new(|route: Route| info!(%route, "view changed"));
        let activation = router.init(listener);

        let mut shell = Self {
            router,
            charts: ChartRegistry::new(),
        };
        shell.mount_charts(activation.route);
        (shell, activation)
    }

    /// Navigates to `token` and delivers the resulting change event.
    /// Navigating to the already-current token yields no activations.
    pub(crate) fn show(&mut self, token: &str) -> ViewChange {
        self.router.navigate(token);
        let activations = self.router.pump();

        let route = self
            .router
            .current()
            .unwrap_or_else(|| self.router.resolve_current_route());
        if !activations.is_empty() {
            self.mount_charts(route);
        }

        ViewChange {
            route,
            title: self.router.host().title().to_string(),
            activations,
        }
    }

    pub(crate) fn current(&self) -> Option<Route> {
        self.router.current()
    }

    pub(crate) fn mounted_charts(&self) -> usize {
        self.charts.len()
    }

    fn mount_charts(&mut self, route: Route) {
        for (slot, kind) in chart_slots(route) {
            self.charts.install(
                slot,
                ChartMount {
                    slot: *slot,
                    kind: *kind,
                },
            );
        }
    }
}

/// Markup for the body of `route`'s view. Backend failures are rendered as
/// a fallback block instead of being returned.
pub(crate) async fn load_view(client: &DataClient, route: Route, query: &JobsQuery) -> String {
    let now = Utc::now();
    match route {
        Route::Dashboard => {
            let overview = JobsQuery {
                page: 1,
                ..query.clone()
            };
            let (news, jobs) =
                tokio::join!(client.fetch_news(false), client.fetch_jobs(&overview));
            let ticker = match news {
                Ok(payload) => render_ticker(&payload.news),
                Err(err) => {
                    warn!(error = %err, "ticker falling back to static headlines");
                    render_ticker(&[])
                }
            };
            let cards = match jobs {
                Ok(payload) => {
                    let shown = payload.jobs.len().min(DASHBOARD_JOB_CARDS);
                    job_cards(&payload.jobs[..shown], now)
                }
                Err(err) => fallback_fragment("jobs", &err),
            };
            format!(
                r#"<div class="ticker-track">{ticker}</div><div class="job-list">{cards}</div>"#
            )
        }
        Route::Jobs => match client.fetch_jobs(query).await {
            Ok(payload) => format!(
                r#"<div class="job-list">{}</div>"#,
                job_cards(&payload.jobs, now)
            ),
            Err(err) => fallback_fragment("jobs", &err),
        },
        Route::News => match client.fetch_news(query.force).await {
            Ok(payload) => format!(
                r#"<div class="news-grid">{}</div>"#,
                news_cards(&payload.news, now)
            ),
            Err(err) => fallback_fragment("news", &err),
        },
        Route::Trends | Route::Insights => chart_canvases(route),
    }
}

pub(crate) fn job_cards(jobs: &[JobListing], now: DateTime<Utc>) -> String {
    if jobs.is_empty() {
        return r#"<div class="empty-state">No jobs match your filters.</div>"#.to_string();
    }
    jobs.iter().map(|job| render_job_card(job, now)).collect()
}

pub(crate) fn news_cards(news: &[NewsItem], now: DateTime<Utc>) -> String {
    if news.is_empty() {
        return r#"<div class="empty-state">No news right now.</div>"#.to_string();
    }
    news.iter().map(|item| render_news_card(item, now)).collect()
}

fn chart_canvases(route: Route) -> String {
    chart_slots(route)
        .iter()
        .map(|(slot, kind)| format!(r#"<canvas id="{slot}" data-chart="{kind}"></canvas>"#))
        .collect()
}

pub(crate) fn fallback_fragment(feed: &str, err: &DataClientError) -> String {
    warn!(feed, error = %err, "rendering fallback for failed feed");
    let status = err
        .status()
        .map(|status| format!(r#" data-status="{status}""#))
        .unwrap_or_default();
    format!(
        r#"<div class="load-error"{status}><p>Unable to load {} right now.</p>{}</div>"#,
        escape_html(feed),
        skeletons(1, DEFAULT_SKELETON_CLASS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_activates_initial_token_and_mounts_its_charts() {
        let (shell, activation) = DashboardShell::start(Some("#trends"));
        assert_eq!(activation.route, Route::Trends);
        assert_eq!(shell.current(), Some(Route::Trends));
        assert_eq!(shell.mounted_charts(), 3);
    }

    #[test]
    fn show_coerces_unknown_routes() {
        let (mut shell, _) = DashboardShell::start(Some("jobs"));
        let change = shell.show("careers");
        assert_eq!(change.route, Route::Dashboard);
        assert_eq!(change.activations.len(), 1);
        assert_eq!(change.title, Route::Dashboard.title());
    }

    #[test]
    fn revisiting_a_view_replaces_its_charts() {
        let (mut shell, _) = DashboardShell::start(None);
        shell.show("insights");
        shell.show("trends");
        shell.show("insights");
        assert_eq!(shell.mounted_charts(), 5);
    }

    #[test]
    fn showing_current_route_is_quiet() {
        let (mut shell, _) = DashboardShell::start(Some("news"));
        let change = shell.show("news");
        assert_eq!(change.route, Route::News);
        assert!(change.activations.is_empty());
    }

    #[test]
    fn fallback_carries_status_code() {
        let err = DataClientError::Status {
            endpoint: "Jobs",
            status: 502,
        };
        let html = fallback_fragment("jobs", &err);
        assert!(html.contains(r#"data-status="502""#));
        assert!(html.contains("Unable to load jobs right now."));
    }

    #[test]
    fn chart_views_render_canvases() {
        let html = chart_canvases(Route::Insights);
        assert_eq!(html.matches("<canvas").count(), 2);
        assert!(chart_canvases(Route::News).is_empty());
    }
}
