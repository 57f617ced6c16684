//! Content quality: length, imagery, linking and readability

use serde::{Deserialize, Serialize};

use super::{Band, Category, CategoryResult, MAX_SCORE, Tally, percentage};
use crate::signals::PageSignals;
use crate::url_utils::{RelativeLinks, count_links};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentQuality {
    pub score: f64,
    pub max_score: f64,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub image_count: usize,
    pub images_with_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub readability_score: f64,
    pub issues: Vec<String>,
}

/// Flesch Reading Ease with syllables approximated as 1.5 per word.
///
/// The sentence count is floored to 1. Returns `None` without words.
pub fn readability(words: usize, sentences: usize) -> Option<f64> {
    if words == 0 {
        return None;
    }
    let words = words as f64;
    let sentences = sentences.max(1) as f64;
    let syllables = words * 1.5;
    Some(206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words))
}

pub fn score_content_quality(signals: &PageSignals) -> ContentQuality {
    let mut tally = Tally::new(MAX_SCORE);

    let word_count = signals.word_count();
    if word_count >= 1000 {
        tally.award(25.0);
    } else if word_count >= 500 {
        tally.partial(15.0, "Content length is moderate (500-1000 words)");
    } else if word_count >= 300 {
        tally.partial(10.0, "Content length is short (300-500 words)");
    } else {
        tally.partial(5.0, format!("Content is too thin ({word_count} words)"));
    }

    if signals.paragraph_count >= 5 {
        tally.award(10.0);
    }

    match percentage(signals.images_with_alt, signals.image_count) {
        // A page without images has nothing to describe.
        None => tally.award(10.0),
        Some(alt) => match Band::of(alt) {
            Band::Complete => tally.award(20.0),
            Band::High => tally.partial(15.0, format!("{alt:.0}% of images have alt text")),
            Band::Medium => tally.partial(10.0, format!("Only {alt:.0}% of images have alt text")),
            Band::Low => tally.partial(5.0, format!("Most images missing alt text ({alt:.0}%)")),
        },
    }

    let links = count_links(&signals.anchors, &signals.host, RelativeLinks::Lenient);
    if links.internal >= 3 {
        tally.award(15.0);
    } else {
        tally.partial(
            5.0,
            format!("Low internal linking ({} links)", links.internal),
        );
    }
    tally.check(
        links.external > 0,
        10.0,
        "No external links to authoritative sources",
    );

    let readability_score = readability(word_count, signals.sentence_count());
    if let Some(ease) = readability_score {
        if ease >= 60.0 {
            tally.award(10.0);
        } else {
            tally.partial(5.0, "Content may be difficult to read");
        }
    }

    let (score, issues) = tally.finish();
    ContentQuality {
        score,
        max_score: MAX_SCORE,
        word_count,
        paragraph_count: signals.paragraph_count,
        image_count: signals.image_count,
        images_with_alt: signals.images_with_alt,
        internal_links: links.internal,
        external_links: links.external,
        readability_score: readability_score.unwrap_or_default(),
        issues,
    }
}

impl CategoryResult for ContentQuality {
    fn category(&self) -> Category {
        Category::Content
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
            ("Words", self.word_count.to_string()),
            ("Paragraphs", self.paragraph_count.to_string()),
            (
                "Images with alt",
                format!("{} / {}", self.images_with_alt, self.image_count),
            ),
            ("Internal links", self.internal_links.to_string()),
            ("External links", self.external_links.to_string()),
            ("Readability", format!("{:.1}", self.readability_score)),
        ]
    }
}
