use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the dashboard's named views. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Jobs,
    Trends,
    News,
    Insights,
}

/// Page title shown when a route has no entry in [`ROUTE_TITLES`].
pub const GENERIC_TITLE: &str = "IT Intelligence Dashboard";

pub const ROUTE_TITLES: &[(Route, &str)] = &[
    (Route::Dashboard, "Dashboard — IT Jobs Intelligence"),
    (Route::Jobs, "Live Jobs — IT Jobs Intelligence"),
    (Route::Trends, "Market Trends — IT Jobs Intelligence"),
    (Route::News, "Live News — IT Jobs Intelligence"),
    (Route::Insights, "Insights & Strategy — IT Jobs Intelligence"),
];

/// Prefix joined with the route name to address a route's view container.
pub const VIEW_PREFIX: &str = "page-";

impl Route {
    pub const DEFAULT: Route = Route::Dashboard;

    pub const fn ordered() -> [Self; 5] {
        [
            Self::Dashboard,
            Self::Jobs,
            Self::Trends,
            Self::News,
            Self::Insights,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Jobs => "jobs",
            Self::Trends => "trends",
            Self::News => "news",
            Self::Insights => "insights",
        }
    }

    /// Strict lookup of a navigation token. A leading `#` is ignored and the
    /// comparison is case-insensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        let name = token.strip_prefix('#').unwrap_or(token).to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|route| route.as_str() == name)
    }

    /// Lookup that never fails: anything unrecognised becomes [`Route::DEFAULT`].
    pub fn coerce(token: Option<&str>) -> Self {
        token.and_then(Self::from_token).unwrap_or(Self::DEFAULT)
    }

    pub fn title(self) -> &'static str {
        ROUTE_TITLES
            .iter()
            .find(|(route, _)| *route == self)
            .map(|(_, title)| *title)
            .unwrap_or(GENERIC_TITLE)
    }

    pub fn view_id(self) -> String {
        format!("{VIEW_PREFIX}{}", self.as_str())
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_resolve_case_insensitively() {
        assert_eq!(Route::from_token("#News"), Some(Route::News));
        assert_eq!(Route::from_token("insights"), Some(Route::Insights));
        assert_eq!(Route::from_token("#"), None);
    }

    #[test]
    fn unknown_tokens_coerce_to_default() {
        for token in [None, Some(""), Some("#"), Some("settings"), Some("jobs/42"), Some("ñews")] {
            assert_eq!(Route::coerce(token), Route::DEFAULT, "token: {token:?}");
        }
    }

    #[test]
    fn every_route_has_a_title_and_view() {
        for route in Route::ordered() {
            assert_ne!(route.title(), GENERIC_TITLE);
            assert_eq!(route.view_id(), format!("page-{route}"));
        }
    }
}
