//! On-page SEO: title, description, headings and social tags

use serde::{Deserialize, Serialize};

use super::{Category, CategoryResult, MAX_SCORE, Tally, yes_no};
use crate::signals::PageSignals;

const TITLE_BAND: (usize, usize) = (50, 60);
const DESCRIPTION_BAND: (usize, usize) = (150, 160);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnPageSeo {
    pub score: f64,
    pub max_score: f64,
    pub has_title: bool,
    pub title_length: usize,
    pub has_meta_description: bool,
    pub meta_description_length: usize,
    pub has_h1: bool,
    pub h1_count: usize,
    pub h2_count: usize,
    pub has_og_tags: bool,
    pub has_twitter_card: bool,
    pub has_canonical: bool,
    pub keyword_in_title: bool,
    pub proper_heading_hierarchy: bool,
    pub issues: Vec<String>,
}

/// Awards presence points plus a length bonus for a text field.
fn score_length(
    tally: &mut Tally,
    length: usize,
    (min, max): (usize, usize),
    too_short: &str,
    too_long: &str,
) {
    tally.award(15.0);
    if length < min {
        tally.partial(5.0, too_short);
    } else if length > max {
        tally.partial(5.0, too_long);
    } else {
        tally.award(10.0);
    }
}

pub fn score_on_page(signals: &PageSignals) -> OnPageSeo {
    let mut tally = Tally::new(MAX_SCORE);

    let has_title = signals.has_title();
    let title_length = signals.title.chars().count();
    if has_title {
        score_length(
            &mut tally,
            title_length,
            TITLE_BAND,
            "Title tag is too short (< 50 characters)",
            "Title tag is too long (> 60 characters)",
        );
    } else {
        tally.flag("Missing title tag");
    }

    let has_meta_description = !signals.meta_description.is_empty();
    let meta_description_length = signals.meta_description.chars().count();
    if has_meta_description {
        score_length(
            &mut tally,
            meta_description_length,
            DESCRIPTION_BAND,
            "Meta description is too short (< 150 characters)",
            "Meta description is too long (> 160 characters)",
        );
    } else {
        tally.flag("Missing meta description");
    }

    let h1_count = signals.headings.level(1);
    match h1_count {
        0 => tally.flag("Missing H1 tag"),
        1 => tally.award(15.0),
        n => tally.partial(5.0, format!("Multiple H1 tags found ({n})")),
    }

    let h2_count = signals.headings.level(2);
    if h2_count > 0 {
        tally.award(5.0);
    }

    let proper_heading_hierarchy = tally.check(
        signals.headings.is_properly_nested(),
        10.0,
        "Improper heading hierarchy",
    );
    let has_og_tags = tally.check(
        signals.open_graph.is_complete(),
        10.0,
        "Incomplete Open Graph tags",
    );
    let has_twitter_card = tally.check(signals.has_twitter_card, 5.0, "Missing Twitter Card tags");
    let has_canonical = tally.check(signals.has_canonical, 10.0, "Missing canonical tag");

    // No target keyword is supplied, so any non-empty title earns the credit.
    let keyword_in_title = has_title;
    if keyword_in_title {
        tally.award(5.0);
    }

    let (score, issues) = tally.finish();
    OnPageSeo {
        score,
        max_score: MAX_SCORE,
        has_title,
        title_length,
        has_meta_description,
        meta_description_length,
        has_h1: h1_count > 0,
        h1_count,
        h2_count,
        has_og_tags,
        has_twitter_card,
        has_canonical,
        keyword_in_title,
        proper_heading_hierarchy,
        issues,
    }
}

impl CategoryResult for OnPageSeo {
    fn category(&self) -> Category {
        Category::OnPage
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
            ("Title length", self.title_length.to_string()),
            ("Meta description length", self.meta_description_length.to_string()),
            ("H1 count", self.h1_count.to_string()),
            ("H2 count", self.h2_count.to_string()),
            ("Heading hierarchy", yes_no(self.proper_heading_hierarchy)),
            ("Open Graph", yes_no(self.has_og_tags)),
            ("Twitter Card", yes_no(self.has_twitter_card)),
            ("Canonical tag", yes_no(self.has_canonical)),
        ]
    }
}
