use crate::course::Locale;

pub const DEFAULT_API_HOST: &str = "hexlet.io";

/// Remote endpoints for one assignment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSet {
    pub check_validate_path: String,
    pub check_create_path: String,
}

/// Build both endpoint URLs. `host` may carry a port (`localhost:3000`).
///
/// Malformed hosts are not rejected here; they surface as request errors.
pub fn build_routes(course_slug: &str, lesson_slug: &str, locale: Locale, host: &str) -> RouteSet {
    let base = base_url(locale, host);
    let api = format!("/api_internal/courses/{course_slug}/lessons/{lesson_slug}/assignment");

    RouteSet {
        check_validate_path: format!("{base}{api}/check/validate"),
        check_create_path: format!("{base}{api}/check"),
    }
}

fn base_url(locale: Locale, host: &str) -> String {
    let hostname = host.split(':').next().unwrap_or_default();
    let protocol = if hostname == "localhost" { "http" } else { "https" };
    if locale.is_default() {
        format!("{protocol}://{host}")
    } else {
        format!("{protocol}://{locale}.{host}")
    }
}
