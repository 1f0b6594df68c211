//! Client route table and the authentication guard applied before navigation.

use reqwest::Url;

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
}

pub const ROUTES: &[Route] = &[
    Route {
        name: "landing",
        path: "/",
        requires_auth: false,
    },
    Route {
        name: "login",
        path: LOGIN_PATH,
        requires_auth: false,
    },
    Route {
        name: "register",
        path: "/auth/register",
        requires_auth: false,
    },
    Route {
        name: "dashboard",
        path: "/dashboard",
        requires_auth: true,
    },
    Route {
        name: "profile",
        path: "/profile",
        requires_auth: true,
    },
    Route {
        name: "interview-create",
        path: "/interviews/create",
        requires_auth: true,
    },
    Route {
        name: "interview",
        path: "/interviews/:id",
        requires_auth: true,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    /// Send the user to `to`, which carries the original target as `redirect`.
    Redirect { to: String },
}

/// Finds the route for a target such as `/interviews/42?tab=report`.
/// Static segments must match exactly; `:param` segments match any non-empty segment.
/// Earlier routes win, so `/interviews/create` is not taken as an interview id.
pub fn resolve(target: &str) -> Option<&'static Route> {
    let path = target.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES.iter().find(|route| {
        let pattern: Vec<&str> = route.path.split('/').filter(|s| !s.is_empty()).collect();
        pattern.len() == segments.len()
            && pattern
                .iter()
                .zip(&segments)
                .all(|(p, s)| p.starts_with(':') || p == s)
    })
}

/// Decides whether navigation to `target` may proceed.
/// Protected routes without an authenticated session redirect to login; unknown paths proceed.
pub fn guard(target: &str, authenticated: bool) -> Navigation {
    match resolve(target) {
        Some(route) if route.requires_auth && !authenticated => Navigation::Redirect {
            to: login_redirect(target),
        },
        _ => Navigation::Proceed,
    }
}

/// `/auth/login?redirect=<target>` with the target form-encoded.
pub fn login_redirect(target: &str) -> String {
    let mut url = Url::parse("http://client.local").expect("static base URL is valid");
    url.set_path(LOGIN_PATH);
    url.query_pairs_mut().append_pair("redirect", target);
    match url.query() {
        Some(query) => format!("{LOGIN_PATH}?{query}"),
        None => LOGIN_PATH.to_string(),
    }
}
