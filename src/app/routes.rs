//! Client-side routes.
//!
//! The store tracks the route the user is on so that session invalidation and
//! auth guards can send them to the login page, remembering where they were.

use crate::domain::Id;
use reqwest::Url;
use std::fmt;

const LOGIN_PATH: &str = "/login";
const REGISTER_PATH: &str = "/register";

/// A page the user can be on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Login {
        /// Where to go back to after logging in.
        return_url: Option<String>,
    },
    Register,
    PostDetail(Id),
    Write,
    EditPost(Id),
    MyProfile,
    UserProfile(String),
    Search(String),
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl Route {
    /// The login page without a return target.
    #[must_use]
    pub const fn login() -> Self {
        Self::Login { return_url: None }
    }

    /// Path and query string for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login { return_url: None } => LOGIN_PATH.to_string(),
            Self::Login {
                return_url: Some(url),
            } => format!("{LOGIN_PATH}?returnUrl={}", encode(url)),
            Self::Register => REGISTER_PATH.to_string(),
            Self::PostDetail(id) => format!("/posts/{id}"),
            Self::Write => "/write".to_string(),
            Self::EditPost(id) => format!("/write?id={id}"),
            Self::MyProfile => "/profile".to_string(),
            Self::UserProfile(username) => format!("/profile/{}", encode(username)),
            Self::Search(query) => format!("/?search={}", encode(query)),
        }
    }

    /// Parses a path such as `/posts/3` or `/login?returnUrl=%2Fwrite`.
    ///
    /// Returns `None` for paths no page serves.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let url = Url::parse("http://localhost").ok()?.join(path).ok()?;
        let query = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };
        let segments: Vec<String> = url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .map(|s| {
                url::form_urlencoded::parse(s.as_bytes())
                    .next()
                    .map_or_else(|| s.to_string(), |(k, _)| k.into_owned())
            })
            .collect();

        match segments.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            [] => Some(query("search").map_or(Self::Home, Self::Search)),
            ["login"] => Some(Self::Login {
                return_url: query("returnUrl"),
            }),
            ["register"] => Some(Self::Register),
            ["posts", id] => id.parse().ok().map(Self::PostDetail),
            ["write"] => match query("id") {
                Some(id) => id.parse().ok().map(Self::EditPost),
                None => Some(Self::Write),
            },
            ["profile"] => Some(Self::MyProfile),
            ["profile", username] => Some(Self::UserProfile((*username).to_string())),
            _ => None,
        }
    }

    /// Whether the page can be shown without a session.
    ///
    /// Home, search, auth pages, post details and other users' profiles are
    /// public; writing and the caller's own profile are not.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        !matches!(self, Self::Write | Self::EditPost(_) | Self::MyProfile)
    }

    #[must_use]
    pub const fn is_login(&self) -> bool {
        matches!(self, Self::Login { .. })
    }

    /// The login page, remembering `current` unless it is the login page itself.
    #[must_use]
    pub fn login_redirect(current: &Self) -> Self {
        if current.is_login() {
            Self::login()
        } else {
            Self::Login {
                return_url: Some(current.path()),
            }
        }
    }

    /// Where to go after a successful login.
    ///
    /// Honors `return_url` unless it is missing, unparsable, or points back at
    /// the login or register page.
    #[must_use]
    pub fn redirect_after_login(return_url: Option<&str>) -> Self {
        return_url
            .and_then(Self::parse)
            .filter(|route| !route.is_login() && *route != Self::Register)
            .unwrap_or(Self::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Route::Home, "/")]
    #[case(Route::login(), "/login")]
    #[case(Route::PostDetail(12), "/posts/12")]
    #[case(Route::EditPost(12), "/write?id=12")]
    #[case(Route::UserProfile("ada".into()), "/profile/ada")]
    #[case(Route::Search("rust async".into()), "/?search=rust+async")]
    fn paths(#[case] route: Route, #[case] path: &str) {
        assert_eq!(route.path(), path);
        assert_eq!(Route::parse(path), Some(route));
    }

    #[test]
    fn login_redirect_remembers_the_current_page() {
        let redirect = Route::login_redirect(&Route::PostDetail(5));
        assert_eq!(redirect.path(), "/login?returnUrl=%2Fposts%2F5");
        assert_eq!(Route::parse(&redirect.path()), Some(redirect));
    }

    #[test]
    fn login_redirect_from_login_has_no_return_url() {
        assert_eq!(Route::login_redirect(&Route::login()), Route::login());
    }

    #[rstest]
    #[case(Some("/posts/5"), Route::PostDetail(5))]
    #[case(Some("/login"), Route::Home)]
    #[case(Some("/register"), Route::Home)]
    #[case(Some("/nowhere/at/all"), Route::Home)]
    #[case(None, Route::Home)]
    fn redirect_after_login(#[case] return_url: Option<&str>, #[case] expected: Route) {
        assert_eq!(Route::redirect_after_login(return_url), expected);
    }

    #[test]
    fn protected_pages() {
        assert!(Route::Home.is_public());
        assert!(Route::UserProfile("ada".into()).is_public());
        assert!(!Route::MyProfile.is_public());
        assert!(!Route::Write.is_public());
        assert!(!Route::EditPost(1).is_public());
    }
}
