//! Link structure: internal/external balance, anchor text and breadcrumbs

use serde::{Deserialize, Serialize};

use super::{Category, CategoryResult, MAX_SCORE, Tally, percentage, yes_no};
use crate::signals::{Anchor, PageSignals};
use crate::url_utils::{RelativeLinks, count_links};

const GENERIC_ANCHORS: &[&str] = &["click here", "read more", "here"];

/// Points credited for the broken-link check, which is not performed.
///
/// Verifying every link would mean one request per anchor during the audit;
/// until that exists, the check always passes.
pub const UNCHECKED_BROKEN_LINKS_CREDIT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStructure {
    pub score: f64,
    pub max_score: f64,
    pub internal_links: usize,
    pub external_links: usize,
    /// Always zero: links are not probed
    pub broken_links: usize,
    pub has_breadcrumbs: bool,
    pub descriptive_anchors: bool,
    pub issues: Vec<String>,
}

/// Generic phrases and one- or two-character texts say nothing about the target.
pub fn is_descriptive(text: &str) -> bool {
    let text = text.trim();
    let lower = text.to_lowercase();
    !GENERIC_ANCHORS.contains(&lower.as_str()) && text.chars().count() > 2
}

/// `(descriptive, total)` over anchors that have both an href and visible text
fn anchor_text_counts(anchors: &[Anchor]) -> (usize, usize) {
    anchors
        .iter()
        .filter(|anchor| !anchor.href.is_empty() && !anchor.text.trim().is_empty())
        .fold((0, 0), |(descriptive, total), anchor| {
            (
                descriptive + usize::from(is_descriptive(&anchor.text)),
                total + 1,
            )
        })
}

pub fn score_link_structure(signals: &PageSignals) -> LinkStructure {
    let mut tally = Tally::new(MAX_SCORE);
    let links = count_links(&signals.anchors, &signals.host, RelativeLinks::RootOnly);

    if links.internal >= 5 {
        tally.award(25.0);
    } else if links.internal >= 3 {
        tally.award(15.0);
    } else {
        tally.partial(
            5.0,
            format!("Low internal link count ({})", links.internal),
        );
    }

    match links.external {
        0 => tally.partial(5.0, "No external links"),
        1..=10 => tally.award(15.0),
        _ => tally.partial(10.0, "High number of external links"),
    }

    let (descriptive, total) = anchor_text_counts(&signals.anchors);
    let descriptive_anchors = match percentage(descriptive, total) {
        Some(ratio) if ratio >= 80.0 => {
            tally.award(20.0);
            true
        }
        Some(_) => {
            tally.partial(10.0, "Many links have generic anchor text");
            false
        }
        // Nothing to judge without anchor text.
        None => {
            tally.award(15.0);
            false
        }
    };

    let has_breadcrumbs = tally.check(
        signals.has_breadcrumb_markup,
        20.0,
        "No breadcrumb navigation found",
    );

    tally.award(UNCHECKED_BROKEN_LINKS_CREDIT);

    let (score, issues) = tally.finish();
    LinkStructure {
        score,
        max_score: MAX_SCORE,
        internal_links: links.internal,
        external_links: links.external,
        broken_links: 0,
        has_breadcrumbs,
        descriptive_anchors,
        issues,
    }
}

impl CategoryResult for LinkStructure {
    fn category(&self) -> Category {
        Category::Links
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
            ("Internal links", self.internal_links.to_string()),
            ("External links", self.external_links.to_string()),
            ("Descriptive anchors", yes_no(self.descriptive_anchors)),
            ("Breadcrumbs", yes_no(self.has_breadcrumbs)),
            ("Broken links", "not checked".to_string()),
        ]
    }
}
