//! Hash-style navigation for the dashboard.
//!
//! [`Router`] owns the current route and drives view activation through a
//! [`ViewHost`]. Navigation writes a token into [`Location`]; the resulting
//! change event is queued and only acted on by [`Router::pump`], never inside
//! [`Router::navigate`] itself.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use super::route::Route;

/// Visual state of a view container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewStyle {
    pub opacity: f32,
    pub offset_px: u8,
}

impl ViewStyle {
    pub const HIDDEN: ViewStyle = ViewStyle {
        opacity: 0.0,
        offset_px: 12,
    };
    pub const SETTLED: ViewStyle = ViewStyle {
        opacity: 1.0,
        offset_px: 0,
    };
}

/// Entrance animation applied when the active route actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub from: ViewStyle,
    pub to: ViewStyle,
    pub duration_ms: u32,
}

pub const ENTRANCE: Transition = Transition {
    from: ViewStyle::HIDDEN,
    to: ViewStyle::SETTLED,
    duration_ms: 280,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Everything the router needs from the page: view containers, the document
/// title, navigation affordances and the viewport.
pub trait ViewHost {
    fn has_view(&self, route: Route) -> bool;

    fn hide(&mut self, route: Route);

    /// Marks the view active and leaves it settled. When `entrance` is given
    /// the view starts from `entrance.from` before settling.
    fn show(&mut self, route: Route, entrance: Option<&Transition>);

    fn set_title(&mut self, title: &str);

    /// Highlights affordances targeting `route`, clears the rest, and returns
    /// how many ended up highlighted.
    fn highlight_affordances(&mut self, route: Route) -> usize;

    fn scroll_to_top(&mut self, behavior: ScrollBehavior);
}

/// The persisted navigation token and its pending change events. Tokens are
/// stored without a leading `#` and in lowercase, so `#Trends` and `trends`
/// are the same location.
#[derive(Debug, Clone, Default)]
pub struct Location {
    token: Option<String>,
    pending_changes: usize,
}

impl Location {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: token.map(normalize_token),
            pending_changes: 0,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Writes the token and queues a change event if the value differs.
    pub fn set_token(&mut self, token: &str) -> bool {
        let token = normalize_token(token);
        if self.token.as_deref() == Some(token.as_str()) {
            return false;
        }
        self.token = Some(token);
        self.pending_changes += 1;
        true
    }

    pub fn pending_changes(&self) -> usize {
        self.pending_changes
    }

    fn take_pending(&mut self) -> usize {
        std::mem::take(&mut self.pending_changes)
    }
}

fn normalize_token(token: &str) -> String {
    token.strip_prefix('#').unwrap_or(token).to_ascii_lowercase()
}

/// Result of one activation, handed back to callers for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub route: Route,
    pub previous: Option<Route>,
    pub entered: bool,
    pub view_found: bool,
    pub title: String,
    pub highlighted: usize,
}

pub type RouteListener = Box<dyn FnMut(Route) + Send>;

pub struct Router<H: ViewHost> {
    host: H,
    location: Location,
    current: Option<Route>,
    listener: Option<RouteListener>,
    subscribed: bool,
}

impl<H: ViewHost> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("location", &self.location)
            .field("current", &self.current)
            .field("listener", &self.listener.is_some())
            .field("subscribed", &self.subscribed)
            .finish()
    }
}

impl<H: ViewHost> Router<H> {
    pub fn new(host: H, location: Location) -> Self {
        Self {
            host,
            location,
            current: None,
            listener: None,
            subscribed: false,
        }
    }

    /// Registers `listener`, subscribes to token changes and activates the
    /// route the location currently encodes.
    pub fn init(&mut self, listener: RouteListener) -> Activation {
        self.listener = Some(listener);
        self.subscribed = true;
        self.location.take_pending();
        let route = self.resolve_current_route();
        self.activate(route)
    }

    pub fn resolve_current_route(&self) -> Route {
        Route::coerce(self.location.token())
    }

    /// Requests a route change by rewriting the location token. Unknown
    /// routes are replaced with [`Route::DEFAULT`]. Activation happens on the
    /// next [`Router::pump`].
    pub fn navigate(&mut self, route: &str) {
        let target = Route::coerce(Some(route));
        self.location.set_token(target.as_str());
    }

    /// Delivers queued token-change events. Before [`Router::init`] nothing
    /// is subscribed and queued events are discarded.
    pub fn pump(&mut self) -> Vec<Activation> {
        let pending = self.location.take_pending();
        if !self.subscribed {
            return Vec::new();
        }

        (0..pending)
            .map(|_| {
                let route = self.resolve_current_route();
                self.activate(route)
            })
            .collect()
    }

    pub fn activate(&mut self, route: Route) -> Activation {
        for other in Route::ordered() {
            if other != route && self.host.has_view(other) {
                self.host.hide(other);
            }
        }

        let previous = self.current;
        let entered = previous != Some(route);
        let view_found = self.host.has_view(route);
        if view_found {
            let entrance = entered.then_some(&ENTRANCE);
            self.host.show(route, entrance);
        }

        self.current = Some(route);
        let title = route.title();
        self.host.set_title(title);
        let highlighted = self.host.highlight_affordances(route);
        self.host.scroll_to_top(ScrollBehavior::Smooth);

        debug!(%route, ?previous, entered, view_found, "route activated");

        if let Some(listener) = self.listener.as_mut() {
            listener(route);
        }

        Activation {
            route,
            previous,
            entered,
            view_found,
            title: title.to_string(),
            highlighted,
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.current
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub active: bool,
    pub style: ViewStyle,
    pub entrances: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active: false,
            style: ViewStyle::SETTLED,
            entrances: 0,
        }
    }
}

/// A navigation link declaring its target route by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Affordance {
    pub label: String,
    pub target: String,
    pub highlighted: bool,
}

/// Headless [`ViewHost`] that records view and page state in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryViews {
    views: HashMap<Route, ViewState>,
    affordances: Vec<Affordance>,
    title: String,
    scroll_resets: usize,
    last_scroll: Option<ScrollBehavior>,
}

impl InMemoryViews {
    /// One view and one navigation link per route.
    pub fn standard() -> Self {
        let mut host = Self::with_views(Route::ordered());
        for route in Route::ordered() {
            host.add_affordance(route.as_str(), route.as_str());
        }
        host
    }

    pub fn with_views(routes: impl IntoIterator<Item = Route>) -> Self {
        Self {
            views: routes
                .into_iter()
                .map(|route| (route, ViewState::default()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn add_affordance(&mut self, label: &str, target: &str) {
        self.affordances.push(Affordance {
            label: label.to_string(),
            target: target.to_string(),
            highlighted: false,
        });
    }

    pub fn view(&self, route: Route) -> Option<&ViewState> {
        self.views.get(&route)
    }

    pub fn active_views(&self) -> Vec<Route> {
        Route::ordered()
            .into_iter()
            .filter(|route| self.views.get(route).is_some_and(|view| view.active))
            .collect()
    }

    pub fn affordances(&self) -> &[Affordance] {
        &self.affordances
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn last_scroll(&self) -> Option<ScrollBehavior> {
        self.last_scroll
    }
}

impl ViewHost for InMemoryViews {
    fn has_view(&self, route: Route) -> bool {
        self.views.contains_key(&route)
    }

    fn hide(&mut self, route: Route) {
        if let Some(view) = self.views.get_mut(&route) {
            view.active = false;
        }
    }

    fn show(&mut self, route: Route, entrance: Option<&Transition>) {
        if let Some(view) = self.views.get_mut(&route) {
            if let Some(transition) = entrance {
                view.style = transition.from;
                view.entrances += 1;
            }
            view.active = true;
            view.style = ViewStyle::SETTLED;
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn highlight_affordances(&mut self, route: Route) -> usize {
        let mut highlighted = 0;
        for affordance in &mut self.affordances {
            affordance.highlighted = affordance.target == route.as_str();
            highlighted += usize::from(affordance.highlighted);
        }
        highlighted
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.scroll_resets += 1;
        self.last_scroll = Some(behavior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_listener() -> (RouteListener, Arc<Mutex<Vec<Route>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let listener: RouteListener = Box::new(move |route: Route| {
            sink.lock().expect("listener mutex poisoned").push(route);
        });
        (listener, seen)
    }

    #[test]
    fn init_activates_token_from_location() {
        let mut router = Router::new(InMemoryViews::standard(), Location::new(Some("#trends")));
        let (listener, seen) = recording_listener();

        let activation = router.init(listener);

        assert_eq!(activation.route, Route::Trends);
        assert!(activation.entered);
        assert_eq!(router.host().active_views(), vec![Route::Trends]);
        assert_eq!(router.host().title(), Route::Trends.title());
        assert_eq!(router.host().last_scroll(), Some(ScrollBehavior::Smooth));
        assert_eq!(*seen.lock().unwrap(), vec![Route::Trends]);
    }

    #[test]
    fn hash_prefixed_initial_token_matches_plain_navigation() {
        let mut router = Router::new(InMemoryViews::standard(), Location::new(Some("#Trends")));
        let (listener, seen) = recording_listener();
        router.init(listener);
        assert_eq!(router.location().token(), Some("trends"));

        router.navigate("trends");
        assert_eq!(router.location().pending_changes(), 0);
        assert!(router.pump().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![Route::Trends]);
    }

    #[test]
    fn navigate_defers_activation_until_pump() {
        let mut router = Router::new(InMemoryViews::standard(), Location::default());
        let (listener, seen) = recording_listener();
        router.init(listener);

        router.navigate("news");
        assert_eq!(router.current(), Some(Route::Dashboard));
        assert_eq!(router.location().pending_changes(), 1);

        let activations = router.pump();
        assert_eq!(activations.len(), 1);
        assert_eq!(router.current(), Some(Route::News));
        assert_eq!(*seen.lock().unwrap(), vec![Route::Dashboard, Route::News]);
    }

    #[test]
    fn reactivating_same_route_skips_entrance() {
        let mut router = Router::new(InMemoryViews::standard(), Location::new(Some("jobs")));
        router.init(Box::new(|_: Route| {}));

        let again = router.activate(Route::Jobs);

        assert!(!again.entered);
        let view = router.host().view(Route::Jobs).expect("jobs view");
        assert!(view.active);
        assert_eq!(view.entrances, 1);
        assert_eq!(view.style, ViewStyle::SETTLED);
    }

    #[test]
    fn missing_view_only_skips_the_view_step() {
        let host = InMemoryViews::with_views([Route::Dashboard, Route::Jobs]);
        let mut router = Router::new(host, Location::new(Some("insights")));
        let (listener, seen) = recording_listener();

        let activation = router.init(listener);

        assert_eq!(activation.route, Route::Insights);
        assert!(!activation.view_found);
        assert!(router.host().active_views().is_empty());
        assert_eq!(router.host().title(), Route::Insights.title());
        assert_eq!(router.host().scroll_resets(), 1);
        assert_eq!(router.host().last_scroll(), Some(ScrollBehavior::Smooth));
        assert_eq!(*seen.lock().unwrap(), vec![Route::Insights]);
    }

    #[test]
    fn events_before_init_are_dropped() {
        let mut router = Router::new(InMemoryViews::standard(), Location::default());
        router.navigate("jobs");
        assert!(router.pump().is_empty());
        assert_eq!(router.current(), None);
    }
}
