use url::Url;

use crate::signals::{Anchor, host_with_port};

/// Normalize a URL to its origin (scheme + host + optional port).
///
/// Falls back to trimming trailing slashes if the input cannot be parsed.
pub fn normalize_origin(input: &str) -> String {
    match Url::parse(input) {
        Ok(parsed) => parsed
            .origin()
            .ascii_serialization()
            .trim_end_matches('/')
            .to_string(),
        Err(_) => input.trim_end_matches('/').to_string(),
    }
}

/// How relative hrefs are treated when classifying links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeLinks {
    /// Any relative href except a bare fragment (`#...`) is internal
    Lenient,
    /// Only root-relative hrefs (`/...`) are internal
    RootOnly,
}

/// Internal/external link counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

/// Where an href points relative to the page host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    Internal,
    External,
}

/// Classify a single href. Returns `None` for empty hrefs, unparsable absolute
/// URLs and relative hrefs the policy ignores.
pub fn classify_href(href: &str, page_host: &str, policy: RelativeLinks) -> Option<LinkScope> {
    if href.is_empty() {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        let parsed = Url::parse(href).ok()?;
        return Some(if host_with_port(&parsed) == page_host {
            LinkScope::Internal
        } else {
            LinkScope::External
        });
    }

    let internal = match policy {
        RelativeLinks::Lenient => href.starts_with('/') || !href.starts_with('#'),
        RelativeLinks::RootOnly => href.starts_with('/'),
    };
    internal.then_some(LinkScope::Internal)
}

pub fn count_links(anchors: &[Anchor], page_host: &str, policy: RelativeLinks) -> LinkCounts {
    anchors
        .iter()
        .filter_map(|anchor| classify_href(&anchor.href, page_host, policy))
        .fold(LinkCounts::default(), |mut counts, scope| {
            match scope {
                LinkScope::Internal => counts.internal += 1,
                LinkScope::External => counts.external += 1,
            }
            counts
        })
}
