use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gleaner::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Builds the politeness key for a URL: scheme, host and effective port
///
/// Two URLs share robots.txt policy and per-host delay state exactly when
/// their origin keys are equal.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gleaner::url::origin_key;
///
/// let url = Url::parse("https://example.com/a").unwrap();
/// assert_eq!(origin_key(&url), Some("https://example.com:443".to_string()));
/// ```
pub fn origin_key(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    let port = url.port_or_known_default()?;
    Some(format!("{}://{}:{}", url.scheme(), host, port))
}
