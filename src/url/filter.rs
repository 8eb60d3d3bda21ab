//! URL predicates used to restrict which discovered links are crawled

use crate::config::FilterConfig;
use crate::url::matcher::matches_domain;
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use url::Url;

/// Decides whether a URL may be fetched
///
/// Any `Fn(&str) -> bool` closure is a filter, so callers can pass ad-hoc
/// predicates without defining a type.
pub trait UrlFilter {
    /// Returns true if the URL should be crawled
    fn allows(&self, url: &str) -> bool;
}

impl<F> UrlFilter for F
where
    F: Fn(&str) -> bool,
{
    fn allows(&self, url: &str) -> bool {
        self(url)
    }
}

/// Owned, thread-safe filter produced from configuration
pub type BoxedFilter = Box<dyn UrlFilter + Send + Sync>;

/// Accepts URLs whose host equals, or is a subdomain of, an allowed domain
#[derive(Debug, Clone)]
pub struct DomainFilter {
    domains: Vec<String>,
}

impl DomainFilter {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.into().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

impl UrlFilter for DomainFilter {
    fn allows(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        self.domains.iter().any(|d| matches_domain(d, &host))
    }
}

/// Accepts URLs in which any of the regular expressions finds a match
#[derive(Debug, Clone)]
pub struct PatternFilter {
    patterns: Vec<Regex>,
}

impl PatternFilter {
    /// Compiles the patterns, failing on the first invalid expression
    pub fn new<I, S>(patterns: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl UrlFilter for PatternFilter {
    fn allows(&self, url: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(url))
    }
}

/// Accepts a URL only when every inner filter accepts it
struct AllOf(Vec<BoxedFilter>);

impl UrlFilter for AllOf {
    fn allows(&self, url: &str) -> bool {
        self.0.iter().all(|f| f.allows(url))
    }
}

/// Builds a filter restricting URLs to the given domains and their subdomains
///
/// # Examples
///
/// ```
/// use gleaner::url::{domain_filter, UrlFilter};
///
/// let filter = domain_filter(["example.com"]);
/// assert!(filter.allows("https://docs.example.com/a"));
/// assert!(!filter.allows("https://other.org/"));
/// ```
pub fn domain_filter<I, S>(domains: I) -> DomainFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DomainFilter::new(domains)
}

/// Builds a filter accepting URLs matching any of the regular expressions
pub fn pattern_filter<I, S>(patterns: I) -> ConfigResult<PatternFilter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    PatternFilter::new(patterns)
}

/// Builds the combined filter described by a `[filter]` configuration table
///
/// # Returns
///
/// * `Ok(None)` - Neither domains nor patterns are configured
/// * `Ok(Some(filter))` - A filter requiring every configured rule to pass
/// * `Err(ConfigError::InvalidPattern)` - A pattern failed to compile
pub fn build_filter(config: &FilterConfig) -> ConfigResult<Option<BoxedFilter>> {
    let mut filters: Vec<BoxedFilter> = Vec::new();

    if !config.allowed_domains.is_empty() {
        filters.push(Box::new(DomainFilter::new(
            config.allowed_domains.iter().cloned(),
        )));
    }
    if !config.patterns.is_empty() {
        filters.push(Box::new(PatternFilter::new(&config.patterns)?));
    }

    Ok(match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(Box::new(AllOf(filters))),
    })
}
