use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    Login,
    Dashboard,
    Alerts,
    History,
    Device,
    Profile,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Dashboard,
        Route::Alerts,
        Route::History,
        Route::Device,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Alerts => "/alerts",
            Route::History => "/history",
            Route::Device => "/device",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
    }

    /// Everything except the login page needs a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "camelCase")]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    NotFound,
}

/// Guards protected pages and bounces signed-in users off the login page.
pub fn resolve(path: &str, authenticated: bool) -> Navigation {
    match Route::from_path(path) {
        None => Navigation::NotFound,
        Some(route) if route.requires_session() && !authenticated => {
            Navigation::Redirect(Route::Login)
        }
        Some(Route::Login) if authenticated => Navigation::Redirect(Route::Dashboard),
        Some(route) => Navigation::Render(route),
    }
}
