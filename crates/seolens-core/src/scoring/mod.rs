//! Category scorers
//!
//! Each scorer turns a [`PageSignals`](crate::PageSignals) snapshot into a
//! category result with a score bounded by its point budget and an ordered list
//! of issues. Scorers are pure functions and never fail: missing signals simply
//! take the "not present" branch.

pub mod content;
pub mod links;
pub mod on_page;
pub mod performance;
pub mod schema;
pub mod security;
pub mod technical;
pub mod ux;

pub use content::{ContentQuality, score_content_quality};
pub use links::{LinkStructure, score_link_structure};
pub use on_page::{OnPageSeo, score_on_page};
pub use performance::{MetricReading, WebVitals, score_web_vitals};
pub use schema::{SchemaMarkup, score_schema_markup};
pub use security::{SecurityScore, score_security};
pub use technical::{TechnicalSeo, score_technical};
pub use ux::{UserExperience, score_user_experience};

use serde::{Deserialize, Serialize};

/// Point budget shared by every category
pub const MAX_SCORE: f64 = 100.0;

/// The audit dimensions, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    OnPage,
    Content,
    Links,
    Schema,
    Security,
    UserExperience,
    Performance,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Technical => "Technical SEO",
            Category::OnPage => "On-Page SEO",
            Category::Content => "Content Quality",
            Category::Links => "Link Structure",
            Category::Schema => "Schema Markup",
            Category::Security => "Security",
            Category::UserExperience => "User Experience",
            Category::Performance => "Performance",
        }
    }
}

/// Common view over every category result
pub trait CategoryResult {
    fn category(&self) -> Category;
    fn score(&self) -> f64;
    fn max_score(&self) -> f64;
    fn issues(&self) -> &[String];

    /// Category-specific facts for reports, as `(label, value)` pairs
    fn facts(&self) -> Vec<(&'static str, String)>;

    /// Score as a percentage of the budget
    fn percent(&self) -> f64 {
        if self.max_score() > 0.0 {
            self.score() / self.max_score() * 100.0
        } else {
            0.0
        }
    }
}

/// Running point total for one category
#[derive(Debug)]
pub(crate) struct Tally {
    points: f64,
    max: f64,
    issues: Vec<String>,
}

impl Tally {
    pub(crate) fn new(max: f64) -> Self {
        Self {
            points: 0.0,
            max,
            issues: Vec::new(),
        }
    }

    pub(crate) fn award(&mut self, points: f64) {
        self.points += points;
    }

    pub(crate) fn flag(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// Award reduced points and record why
    pub(crate) fn partial(&mut self, points: f64, issue: impl Into<String>) {
        self.award(points);
        self.flag(issue);
    }

    /// Full points when `passed`, otherwise nothing but the issue
    pub(crate) fn check(&mut self, passed: bool, points: f64, issue: &str) -> bool {
        if passed {
            self.award(points);
        } else {
            self.flag(issue);
        }
        passed
    }

    /// Final score clamped to `[0, max]`, plus the issues in insertion order
    pub(crate) fn finish(self) -> (f64, Vec<String>) {
        (self.points.clamp(0.0, self.max), self.issues)
    }
}

/// `part / total * 100`, or `None` for an empty denominator
pub(crate) fn percentage(part: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64 * 100.0)
}

/// Coverage bands used by percentage-based checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Band {
    Complete,
    High,
    Medium,
    Low,
}

impl Band {
    pub(crate) fn of(percent: f64) -> Self {
        if percent >= 100.0 {
            Band::Complete
        } else if percent >= 75.0 {
            Band::High
        } else if percent >= 50.0 {
            Band::Medium
        } else {
            Band::Low
        }
    }
}

pub(crate) fn yes_no(flag: bool) -> String {
    let answer = if flag { "yes" } else { "no" };
    answer.to_string()
}
