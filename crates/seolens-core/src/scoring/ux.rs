//! User experience: favicon, language, legibility and popups

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Category, CategoryResult, MAX_SCORE, Tally, yes_no};
use crate::signals::PageSignals;

/// Smallest body font size, in CSS pixels, considered comfortable to read
pub const MIN_READABLE_FONT_PX: f64 = 14.0;

static FONT_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([0-9]*\.?[0-9]+)\s*(px|rem|em|pt|%)?\s*$")
        .expect("font size pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExperience {
    pub score: f64,
    pub max_score: f64,
    pub has_favicon: bool,
    pub font_size_readable: bool,
    pub has_lang_attribute: bool,
    pub no_intrusive_popups: bool,
    /// Body font size in pixels, when it could be measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_px: Option<f64>,
    pub issues: Vec<String>,
}

/// Convert a CSS font-size value to pixels.
///
/// Relative units assume the 16px browser default. Unitless values are
/// taken as pixels. Keywords such as `medium` are not measurable.
pub fn font_size_px(value: &str) -> Option<f64> {
    let captures = FONT_SIZE.captures(value)?;
    let number: f64 = captures[1].parse().ok()?;
    let unit = captures
        .get(2)
        .map(|unit| unit.as_str().to_ascii_lowercase());

    let px = match unit.as_deref() {
        None | Some("px") => number,
        Some("em") | Some("rem") => number * 16.0,
        Some("pt") => number * 4.0 / 3.0,
        Some("%") => number * 16.0 / 100.0,
        Some(_) => return None,
    };
    Some(px)
}

pub fn score_user_experience(signals: &PageSignals) -> UserExperience {
    let mut tally = Tally::new(MAX_SCORE);

    let has_favicon = tally.check(signals.has_favicon, 20.0, "Missing favicon");
    let has_lang_attribute = tally.check(
        signals.has_lang_attribute,
        25.0,
        "Missing lang attribute on html tag",
    );

    let font_size = signals.body_font_size.as_deref().and_then(font_size_px);
    let font_size_readable = match font_size {
        Some(px) if px >= MIN_READABLE_FONT_PX => {
            tally.award(25.0);
            true
        }
        Some(_) => {
            tally.partial(10.0, "Font size may be too small for comfortable reading");
            false
        }
        None => {
            tally.award(15.0);
            false
        }
    };

    let no_intrusive_popups = !signals.has_popup;
    if no_intrusive_popups {
        tally.award(30.0);
    } else {
        tally.partial(15.0, "Intrusive popups detected");
    }

    let (score, issues) = tally.finish();
    UserExperience {
        score,
        max_score: MAX_SCORE,
        has_favicon,
        font_size_readable,
        has_lang_attribute,
        no_intrusive_popups,
        font_size_px: font_size,
        issues,
    }
}

impl CategoryResult for UserExperience {
    fn category(&self) -> Category {
        Category::UserExperience
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
        let font = match self.font_size_px {
            Some(px) => format!("{px:.1}px"),
            None => "unknown".to_string(),
        };
        vec![
            ("Favicon", yes_no(self.has_favicon)),
            ("Lang attribute", yes_no(self.has_lang_attribute)),
            ("Body font size", font),
            ("Popups", yes_no(!self.no_intrusive_popups)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_font_units() {
        assert_eq!(font_size_px("16px"), Some(16.0));
        assert_eq!(font_size_px(" 1.5REM "), Some(24.0));
        assert_eq!(font_size_px("0.75em"), Some(12.0));
        assert_eq!(font_size_px("12pt"), Some(16.0));
        assert_eq!(font_size_px("87.5%"), Some(14.0));
        assert_eq!(font_size_px("15"), Some(15.0));
        assert_eq!(font_size_px("medium"), None);
        assert_eq!(font_size_px(""), None);
    }

    #[test]
    fn comfortable_page_scores_full_marks() {
        let result = score_user_experience(&PageSignals {
            has_favicon: true,
            has_lang_attribute: true,
            body_font_size: Some("16px".to_string()),
            ..Default::default()
        });
        assert!(result.font_size_readable);
        assert_eq!(result.score, 100.0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn small_font_is_flagged() {
        let result = score_user_experience(&PageSignals {
            body_font_size: Some("12px".to_string()),
            ..Default::default()
        });
        assert!(!result.font_size_readable);
        // 10 small font + 30 no popups
        assert_eq!(result.score, 40.0);
        assert!(
            result
                .issues
                .contains(&"Font size may be too small for comfortable reading".to_string())
        );
    }

    #[test]
    fn unmeasurable_font_earns_middle_credit() {
        let result = score_user_experience(&PageSignals {
            has_popup: true,
            ..Default::default()
        });
        // 15 unmeasured font + 15 popup
        assert_eq!(result.score, 30.0);
        assert_eq!(
            result.issues,
            vec![
                "Missing favicon",
                "Missing lang attribute on html tag",
                "Intrusive popups detected",
            ]
        );
    }
}
