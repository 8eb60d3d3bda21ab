/// Checks if a host belongs to an allowed domain
///
/// A domain covers itself and every subdomain beneath it. A leading `*.` is
/// accepted and means the same thing, so "*.example.com" and "example.com"
/// are equivalent patterns.
///
/// # Arguments
///
/// * `pattern` - The allowed domain, optionally starting with "*."
/// * `host` - The lowercase host to check
///
/// # Examples
///
/// ```
/// use gleaner::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "docs.example.com"));
/// assert!(matches_domain("*.example.com", "api.v2.example.com"));
/// assert!(!matches_domain("example.com", "notexample.com"));
/// ```
pub fn matches_domain(pattern: &str, host: &str) -> bool {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern);
    if base.is_empty() || host.is_empty() {
        return false;
    }

    host == base
        || host
            .strip_suffix(base)
            .map_or(false, |prefix| prefix.ends_with('.'))
}
