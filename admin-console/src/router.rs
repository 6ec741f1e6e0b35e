//! Static route table and the authentication guard applied on navigation

use crate::locales::Locale;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Login,
    Dashboard,
    Media,
    Live,
    AiService,
    VoiceProcessing,
    ImageProcessing,
    Monitor,
    Settings,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    /// Locale key for the page title
    pub title_key: &'static str,
    pub requires_auth: bool,
    pub hide_nav_bar: bool,
    pub hide_footer: bool,
}

impl RouteMeta {
    const fn protected(title_key: &'static str) -> Self {
        Self {
            title_key,
            requires_auth: true,
            hide_nav_bar: false,
            hide_footer: false,
        }
    }

    const fn bare(title_key: &'static str) -> Self {
        Self {
            title_key,
            requires_auth: false,
            hide_nav_bar: true,
            hide_footer: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: RouteName,
    pub meta: RouteMeta,
}

pub static ROUTES: &[Route] = &[
    Route {
        path: LOGIN_PATH,
        name: RouteName::Login,
        meta: RouteMeta::bare("common.login"),
    },
    Route {
        path: HOME_PATH,
        name: RouteName::Dashboard,
        meta: RouteMeta::protected("common.dashboard"),
    },
    Route {
        path: "/media",
        name: RouteName::Media,
        meta: RouteMeta::protected("common.media"),
    },
    Route {
        path: "/live",
        name: RouteName::Live,
        meta: RouteMeta::protected("common.live"),
    },
    Route {
        path: "/ai-service",
        name: RouteName::AiService,
        meta: RouteMeta::protected("ai.title"),
    },
    Route {
        path: "/ai-service/voice",
        name: RouteName::VoiceProcessing,
        meta: RouteMeta::protected("ai.voice"),
    },
    Route {
        path: "/ai-service/image",
        name: RouteName::ImageProcessing,
        meta: RouteMeta::protected("ai.imageProcessing"),
    },
    Route {
        path: "/monitor",
        name: RouteName::Monitor,
        meta: RouteMeta::protected("common.monitor"),
    },
    Route {
        path: "/settings",
        name: RouteName::Settings,
        meta: RouteMeta::protected("common.settings"),
    },
];

pub static NOT_FOUND: Route = Route {
    path: "/:pathMatch(.*)*",
    name: RouteName::NotFound,
    meta: RouteMeta::bare("common.notFound"),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(&'static Route),
    Redirect(&'static str),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Router;

impl Router {
    /// Exact match after trimming a trailing slash; anything else is NotFound
    pub fn resolve(&self, path: &str) -> &'static Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        ROUTES
            .iter()
            .find(|r| r.path == path)
            .unwrap_or(&NOT_FOUND)
    }

    pub fn navigate(&self, path: &str, logged_in: bool) -> Navigation {
        if path.is_empty() || path == "/" {
            return Navigation::Redirect(HOME_PATH);
        }
        let route = self.resolve(path);
        if route.meta.requires_auth && !logged_in {
            return Navigation::Redirect(LOGIN_PATH);
        }
        Navigation::Render(route)
    }
}

/// `"<title> - <app title>"`, or just the app title when the key has no entry
pub fn document_title(route: &Route, locale: Locale, app_title: &str) -> String {
    match locale.lookup(route.meta.title_key) {
        Some(title) => format!("{} - {}", title, app_title),
        None => app_title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_to_dashboard() {
        assert_eq!(Router.navigate("/", true), Navigation::Redirect(HOME_PATH));
        assert_eq!(Router.navigate("/", false), Navigation::Redirect(HOME_PATH));
    }

    #[test]
    fn test_protected_route_requires_login() {
        assert_eq!(
            Router.navigate("/media", false),
            Navigation::Redirect(LOGIN_PATH)
        );
        match Router.navigate("/media/", true) {
            Navigation::Render(route) => assert_eq!(route.name, RouteName::Media),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_path_renders_not_found_without_login() {
        match Router.navigate("/nope?x=1", false) {
            Navigation::Render(route) => {
                assert_eq!(route.name, RouteName::NotFound);
                assert!(route.meta.hide_nav_bar);
                assert!(route.meta.hide_footer);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_document_title() {
        let route = Router.resolve("/login");
        assert_eq!(
            document_title(route, Locale::EnUs, "AV Stream"),
            "Login - AV Stream"
        );
        assert_eq!(
            document_title(Router.resolve("/ai-service/image"), Locale::ZhCn, "AV"),
            "图像处理 - AV"
        );
    }
}
