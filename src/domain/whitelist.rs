#![allow(dead_code)]

use url::Url;

/// Redirect-target whitelist.
///
/// Specs are partial or complete URLs:
///
/// ```text
/// "//example.org"           allows any URL at that host, any scheme
/// "https://example.org"     just URLs beginning https://example.org
/// "//example.org/some/path" at that host AND with that specific path
/// "//.example.org"          the host itself or any subdomain of it
/// ```
///
/// A candidate URL is whitelisted when it matches at least one spec. A spec
/// matches when every component it specifies (scheme, userinfo, host, port,
/// path, query, fragment) is exactly equal on the candidate; empty or absent
/// spec components are wildcards. An empty spec list rejects everything.
/// Malformed candidate URLs never match.
#[derive(Debug, Clone, Default)]
pub struct UrlWhitelist {
    specs: Vec<SpecParts>,
}

impl UrlWhitelist {
    pub fn new<S: AsRef<str>>(specs: impl IntoIterator<Item = S>) -> Self {
        Self {
            specs: specs
                .into_iter()
                .map(|s| SpecParts::split(s.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Check a candidate URL against the whitelist.
    pub fn is_whitelisted(&self, candidate: &str) -> bool {
        let Ok(url) = Url::parse(candidate) else {
            return false;
        };

        self.specs.iter().any(|spec| spec.matches(&url))
    }
}

/// The components a whitelist spec may pin down.
///
/// Specs are partial URLs ("//host/path") that a strict parser rejects, so
/// they are split by hand rather than with `Url::parse`.
#[derive(Debug, Clone, Default)]
struct SpecParts {
    scheme: Option<String>,
    userinfo: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<String>,
    fragment: Option<String>,
}

impl SpecParts {
    fn split(spec: &str) -> Self {
        let mut parts = Self::default();
        let mut rest = spec;

        if let Some((before, fragment)) = rest.split_once('#') {
            parts.fragment = non_empty(fragment);
            rest = before;
        }
        if let Some((before, query)) = rest.split_once('?') {
            parts.query = non_empty(query);
            rest = before;
        }

        let authority_and_path = if let Some(after) = rest.strip_prefix("//") {
            after
        } else if let Some((scheme, after)) = rest.split_once("://") {
            parts.scheme = non_empty(scheme);
            after
        } else {
            // No authority marker at all: the whole remainder is a path spec.
            parts.path = non_empty(rest);
            return parts;
        };

        let (authority, path) = match authority_and_path.find('/') {
            Some(idx) => authority_and_path.split_at(idx),
            None => (authority_and_path, ""),
        };
        parts.path = non_empty(path);

        let host_port = match authority.rsplit_once('@') {
            Some((userinfo, host_port)) => {
                parts.userinfo = non_empty(userinfo);
                host_port
            }
            None => authority,
        };

        match host_port.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) && !port.is_empty() => {
                parts.host = non_empty(host);
                parts.port = port.parse().ok();
            }
            _ => parts.host = non_empty(host_port),
        }

        parts
    }

    fn matches(&self, url: &Url) -> bool {
        if let Some(scheme) = &self.scheme {
            if url.scheme() != scheme {
                return false;
            }
        }

        if let Some(userinfo) = &self.userinfo {
            if &candidate_userinfo(url) != userinfo {
                return false;
            }
        }

        if let Some(host) = &self.host {
            let Some(candidate_host) = url.host_str() else {
                return false;
            };
            if !host_matches(host, candidate_host) {
                return false;
            }
        }

        if let Some(port) = self.port {
            if url.port() != Some(port) {
                return false;
            }
        }

        if let Some(path) = &self.path {
            if url.path() != path {
                return false;
            }
        }

        if let Some(query) = &self.query {
            if url.query() != Some(query.as_str()) {
                return false;
            }
        }

        if let Some(fragment) = &self.fragment {
            if url.fragment() != Some(fragment.as_str()) {
                return false;
            }
        }

        true
    }
}

/// A spec host beginning with `.` matches the bare suffix host or any host
/// ending with the dotted suffix.
fn host_matches(spec_host: &str, candidate_host: &str) -> bool {
    match spec_host.strip_prefix('.') {
        Some(bare) => candidate_host == bare || candidate_host.ends_with(spec_host),
        None => candidate_host == spec_host,
    }
}

fn candidate_userinfo(url: &Url) -> String {
    match url.password() {
        Some(password) => format!("{}:{}", url.username(), password),
        None => url.username().to_string(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
