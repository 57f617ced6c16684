//! Technical SEO: transport, crawlability files and page weight

use serde::{Deserialize, Serialize};

use super::{Category, CategoryResult, MAX_SCORE, Tally, yes_no};
use crate::signals::PageSignals;

const MAX_PAGE_BYTES: u64 = 3 * 1024 * 1024;

/// Credited for every page that loaded at all. Navigation failures abort the
/// audit before scoring, so there is no failing branch.
const STATUS_CREDIT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSeo {
    pub score: f64,
    pub max_score: f64,
    pub load_time_ms: f64,
    pub page_size_bytes: u64,
    pub http_requests: usize,
    pub has_robots_txt: bool,
    pub has_sitemap: bool,
    pub is_https: bool,
    pub is_mobile_friendly: bool,
    pub has_viewport: bool,
    pub has_canonical: bool,
    pub http_status_code: u16,
    pub issues: Vec<String>,
}

pub fn score_technical(signals: &PageSignals) -> TechnicalSeo {
    let mut tally = Tally::new(MAX_SCORE);

    let is_https = tally.check(signals.is_https(), 15.0, "Site is not using HTTPS");
    let has_viewport = tally.check(signals.has_viewport, 10.0, "Missing viewport meta tag");
    tally.check(signals.has_robots_txt, 10.0, "robots.txt not found");
    tally.check(signals.has_sitemap, 10.0, "sitemap.xml not found");

    let load_time = signals.load_time_ms;
    if load_time < 2000.0 {
        tally.award(20.0);
    } else if load_time < 3000.0 {
        tally.partial(15.0, "Page load time is moderate (2-3 seconds)");
    } else if load_time < 5000.0 {
        tally.partial(10.0, "Page load time is slow (3-5 seconds)");
    } else {
        tally.partial(
            5.0,
            format!("Page load time is very slow ({:.2} seconds)", load_time / 1000.0),
        );
    }

    if signals.html_bytes < MAX_PAGE_BYTES {
        tally.award(10.0);
    } else {
        tally.flag(format!(
            "Page size is large ({:.2} MB)",
            signals.html_bytes as f64 / (1024.0 * 1024.0)
        ));
    }

    let requests = signals.estimated_requests();
    if requests < 50 {
        tally.award(10.0);
    } else if requests < 100 {
        tally.award(5.0);
    } else {
        tally.flag(format!("High number of HTTP requests ({requests})"));
    }

    let has_canonical = tally.check(signals.has_canonical, 10.0, "Missing canonical tag");
    tally.award(STATUS_CREDIT);

    let (score, issues) = tally.finish();
    TechnicalSeo {
        score,
        max_score: MAX_SCORE,
        load_time_ms: load_time,
        page_size_bytes: signals.html_bytes,
        http_requests: requests,
        has_robots_txt: signals.has_robots_txt,
        has_sitemap: signals.has_sitemap,
        is_https,
        is_mobile_friendly: has_viewport,
        has_viewport,
        has_canonical,
        http_status_code: signals.status_code,
        issues,
    }
}

impl CategoryResult for TechnicalSeo {
    fn category(&self) -> Category {
        Category::Technical
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn max_score(&self) -> f64 {
        self.max_score
    }

    fn issues(&self) -> &[String] {
        &self.issues
    }

    fn facts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("HTTPS", yes_no(self.is_https)),
            ("HTTP status", self.http_status_code.to_string()),
            ("Load time", format!("{:.0} ms", self.load_time_ms)),
            (
                "Page size",
                format!("{:.1} KB", self.page_size_bytes as f64 / 1024.0),
            ),
            ("Estimated requests", self.http_requests.to_string()),
            ("Mobile friendly", yes_no(self.is_mobile_friendly)),
            ("robots.txt", yes_no(self.has_robots_txt)),
            ("sitemap.xml", yes_no(self.has_sitemap)),
            ("Canonical tag", yes_no(self.has_canonical)),
        ]
    }
}
