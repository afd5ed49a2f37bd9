/// Per-tab sort keys derived from a tab's URL, title and state
use std::collections::HashMap;
use std::rc::Rc;

use url::Url;

use crate::prefs::Preferences;
use crate::tab_data::{ContainerInfo, TabId, TabRecord};
use crate::tokens::{split_hostname, split_pathname};

/// URLs of "empty" tabs: new tab pages, blank pages, private browsing
pub const BLANK_URLS: &[&str] = &[
    "about:blank",
    "about:home",
    "about:newtab",
    "about:privatebrowsing",
    "chrome://newtab/",
];

/// Container index for tabs outside any container; sorts before real ones
pub const NO_CONTAINER: i32 = -1;

pub type Tokens = Rc<[String]>;

/// Token caches for one window pass
///
/// Each distinct hostname and pathname is tokenized once. The cache is dropped
/// together with the pass that owns it.
#[derive(Debug, Default)]
pub struct PassCache {
    hosts: HashMap<String, (Tokens, Tokens)>,
    paths: HashMap<String, Tokens>,
}

impl PassCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(tld_tokens, domain_tokens)` for a hostname
    pub fn host_tokens(&mut self, hostname: &str) -> (Tokens, Tokens) {
        if let Some((tld, domain)) = self.hosts.get(hostname) {
            return (Rc::clone(tld), Rc::clone(domain));
        }
        let (tld, domain) = split_hostname(hostname);
        let entry: (Tokens, Tokens) = (tld.into(), domain.into());
        self.hosts.insert(hostname.to_string(), entry.clone());
        entry
    }

    pub fn path_tokens(&mut self, pathname: &str) -> Tokens {
        Rc::clone(
            self.paths
                .entry(pathname.to_string())
                .or_insert_with(|| split_pathname(pathname).into()),
        )
    }

    #[cfg(test)]
    fn cached_hosts(&self) -> usize {
        self.hosts.len()
    }

    #[cfg(test)]
    fn cached_paths(&self) -> usize {
        self.paths.len()
    }
}

/// Stable enumeration of the browser's containers
#[derive(Debug, Clone, Default)]
pub struct ContainerIndex {
    positions: HashMap<String, i32>,
}

impl ContainerIndex {
    pub fn new(containers: &[ContainerInfo]) -> ContainerIndex {
        let positions = containers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.cookie_store_id.clone(), i as i32))
            .collect();
        ContainerIndex { positions }
    }

    pub fn position(&self, cookie_store_id: Option<&str>) -> i32 {
        cookie_store_id
            .and_then(|id| self.positions.get(id))
            .copied()
            .unwrap_or(NO_CONTAINER)
    }
}

/// URL parts as the location API exposes them
#[derive(Debug, Clone, PartialEq, Default)]
struct UrlParts {
    scheme: String,
    hostname: String,
    pathname: String,
    search: String,
    hash: String,
}

impl UrlParts {
    /// Unparsable URLs yield empty parts
    fn parse(raw: &str) -> UrlParts {
        let Ok(url) = Url::parse(raw) else {
            return UrlParts::default();
        };
        UrlParts {
            scheme: format!("{}:", url.scheme()),
            hostname: url.host_str().unwrap_or_default().to_lowercase(),
            pathname: url.path().to_string(),
            search: url
                .query()
                .filter(|q| !q.is_empty())
                .map(|q| format!("?{}", q))
                .unwrap_or_default(),
            hash: url
                .fragment()
                .filter(|f| !f.is_empty())
                .map(|f| format!("#{}", f))
                .unwrap_or_default(),
        }
    }
}

/// Read-only view of one tab, decomposed into comparable fields
#[derive(Debug, Clone, PartialEq)]
pub struct TabDescriptor {
    pub id: TabId,
    pub index: i32,
    pub is_active: bool,
    pub is_pinned: bool,
    pub scheme: String,
    pub has_http_scheme: bool,
    pub hostname: String,
    /// Pathname with leading and trailing slashes removed
    pub pathname: String,
    pub has_pathname: bool,
    /// `None` when query strings are excluded by preference
    pub query_string: Option<String>,
    pub hash: String,
    pub domain_tokens: Tokens,
    pub tld_tokens: Tokens,
    pub path_tokens: Tokens,
    pub title: String,
    pub container_index: i32,
    pub is_blank: bool,
}

impl TabDescriptor {
    pub fn build(
        tab: &TabRecord,
        cache: &mut PassCache,
        containers: &ContainerIndex,
        prefs: &Preferences,
    ) -> TabDescriptor {
        let url = tab.url();
        let parts = UrlParts::parse(url);
        let pathname = parts.pathname.trim_matches('/').to_string();
        let (tld_tokens, domain_tokens) = cache.host_tokens(&parts.hostname);
        let path_tokens = cache.path_tokens(&pathname);

        let container_index = if prefs.group_by_container {
            containers.position(tab.cookie_store_id.as_deref())
        } else {
            NO_CONTAINER
        };

        TabDescriptor {
            id: tab.id,
            index: tab.index,
            is_active: tab.active,
            is_pinned: tab.pinned,
            has_http_scheme: matches!(parts.scheme.as_str(), "http:" | "https:"),
            scheme: parts.scheme,
            hostname: parts.hostname,
            has_pathname: !pathname.is_empty(),
            pathname,
            query_string: prefs.include_query_string.then_some(parts.search),
            hash: parts.hash,
            domain_tokens,
            tld_tokens,
            path_tokens,
            title: tab.title().to_string(),
            container_index,
            is_blank: is_blank_url(url),
        }
    }

    /// Final path segment, if it looks like a slug of the page title
    ///
    /// A slug is accepted when its first character equals the first character
    /// of the title with spaces removed, compared in lowercase.
    pub fn slug(&self) -> Option<&str> {
        let last = self.path_tokens.last()?.as_str();
        let slug_first = last.chars().next()?.to_lowercase().next()?;
        let title_first = self
            .title
            .chars()
            .find(|c| *c != ' ')?
            .to_lowercase()
            .next()?;
        (slug_first == title_first).then_some(last)
    }
}

pub fn is_blank_url(url: &str) -> bool {
    BLANK_URLS.contains(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(url: &str, title: &str) -> TabDescriptor {
        let tab = TabRecord::new(1, 1, 0, url, title);
        TabDescriptor::build(
            &tab,
            &mut PassCache::new(),
            &ContainerIndex::default(),
            &Preferences::default(),
        )
    }

    #[test]
    fn test_build_https() {
        let d = describe("https://www.example.co.uk/news/world/?page=2#top", "World");

        assert_eq!(d.scheme, "https:");
        assert!(d.has_http_scheme);
        assert_eq!(d.hostname, "www.example.co.uk");
        assert_eq!(d.pathname, "news/world");
        assert!(d.has_pathname);
        assert_eq!(d.query_string.as_deref(), Some("?page=2"));
        assert_eq!(d.hash, "#top");
        assert_eq!(&d.tld_tokens[..], ["uk", "co"]);
        assert_eq!(&d.domain_tokens[..], ["example", "www"]);
        assert_eq!(&d.path_tokens[..], ["news", "world"]);
        assert!(!d.is_blank);
        assert_eq!(d.container_index, NO_CONTAINER);
    }

    #[test]
    fn test_build_root_path() {
        let d = describe("https://example.com/", "Example");

        assert_eq!(d.pathname, "");
        assert!(!d.has_pathname);
        assert_eq!(&d.path_tokens[..], [""]);
        assert_eq!(d.query_string.as_deref(), Some(""));
        assert_eq!(d.hash, "");
    }

    #[test]
    fn test_build_about_blank() {
        let d = describe("about:blank", "New Tab");

        assert_eq!(d.scheme, "about:");
        assert!(!d.has_http_scheme);
        assert_eq!(d.hostname, "");
        assert!(d.is_blank);
    }

    #[test]
    fn test_build_malformed_url_degrades() {
        let d = describe("not a url at all", "Broken");

        assert_eq!(d.scheme, "");
        assert_eq!(d.hostname, "");
        assert_eq!(d.pathname, "");
        assert_eq!(d.hash, "");
        assert!(!d.has_http_scheme);
        assert!(!d.is_blank);
    }

    #[test]
    fn test_query_string_gated_by_preference() {
        let tab = TabRecord::new(1, 1, 0, "https://example.com/?q=1", "");
        let prefs = Preferences {
            include_query_string: false,
            ..Preferences::default()
        };
        let d = TabDescriptor::build(&tab, &mut PassCache::new(), &ContainerIndex::default(), &prefs);

        assert_eq!(d.query_string, None);
    }

    #[test]
    fn test_container_index() {
        let containers = ContainerIndex::new(&[
            ContainerInfo {
                cookie_store_id: "firefox-container-1".to_string(),
                name: Some("Personal".to_string()),
            },
            ContainerInfo {
                cookie_store_id: "firefox-container-2".to_string(),
                name: Some("Work".to_string()),
            },
        ]);
        let mut tab = TabRecord::new(1, 1, 0, "https://example.com/", "");
        tab.cookie_store_id = Some("firefox-container-2".to_string());

        let d = TabDescriptor::build(&tab, &mut PassCache::new(), &containers, &Preferences::default());
        assert_eq!(d.container_index, 1);

        let prefs = Preferences {
            group_by_container: false,
            ..Preferences::default()
        };
        let d = TabDescriptor::build(&tab, &mut PassCache::new(), &containers, &prefs);
        assert_eq!(d.container_index, NO_CONTAINER);

        assert_eq!(containers.position(Some("firefox-default")), NO_CONTAINER);
        assert_eq!(containers.position(None), NO_CONTAINER);
    }

    #[test]
    fn test_cache_tokenizes_once() {
        let mut cache = PassCache::new();
        let containers = ContainerIndex::default();
        let prefs = Preferences::default();
        let a = TabRecord::new(1, 1, 0, "https://example.com/a", "");
        let b = TabRecord::new(2, 1, 1, "https://example.com/a?x", "");
        let c = TabRecord::new(3, 1, 2, "https://example.com/b", "");

        let da = TabDescriptor::build(&a, &mut cache, &containers, &prefs);
        let db = TabDescriptor::build(&b, &mut cache, &containers, &prefs);
        TabDescriptor::build(&c, &mut cache, &containers, &prefs);

        assert_eq!(cache.cached_hosts(), 1);
        assert_eq!(cache.cached_paths(), 2);
        assert!(Rc::ptr_eq(&da.domain_tokens, &db.domain_tokens));
        assert!(Rc::ptr_eq(&da.path_tokens, &db.path_tokens));
    }

    #[test]
    fn test_slug_detection() {
        let d = describe("https://blog.example.com/2024/rust-tips", "Rust Tips");
        assert_eq!(d.slug(), Some("rust-tips"));

        let d = describe("https://blog.example.com/2024/12345", "Rust Tips");
        assert_eq!(d.slug(), None);

        let d = describe("https://blog.example.com/2024/tips", "  the Tips");
        assert_eq!(d.slug(), Some("tips"));

        let d = describe("https://blog.example.com/", "Anything");
        assert_eq!(d.slug(), None);
    }

    #[test]
    fn test_blank_urls() {
        assert!(is_blank_url("about:newtab"));
        assert!(is_blank_url("about:privatebrowsing"));
        assert!(!is_blank_url("about:newtab?x"));
        assert!(!is_blank_url("https://example.com/"));
    }
}
