//! Transport security and mixed content

use serde::{Deserialize, Serialize};

use super::{Category, CategoryResult, MAX_SCORE, Tally, yes_no};
use crate::signals::PageSignals;

/// Points credited for the security-headers check, which is not performed.
///
/// Response headers are not part of [`PageSignals`], so the check always
/// reports that it could not verify them and awards this reduced value.
pub const UNVERIFIED_HEADERS_CREDIT: f64 = 15.0;

pub const UNVERIFIED_HEADERS_ISSUE: &str = "Unable to verify security headers";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScore {
    pub score: f64,
    pub max_score: f64,
    pub is_https: bool,
    /// Mirrors `is_https`; certificates are not inspected separately
    pub has_ssl: bool,
    pub mixed_content: bool,
    pub has_security_headers: bool,
    pub issues: Vec<String>,
}

pub fn score_security(signals: &PageSignals) -> SecurityScore {
    let mut tally = Tally::new(MAX_SCORE);

    let is_https = tally.check(signals.is_https(), 40.0, "Site is not using HTTPS");

    // Mixed content only exists on an HTTPS page.
    let mixed_content = is_https && signals.insecure_resource_count > 0;
    if !is_https {
        tally.award(15.0);
    } else if mixed_content {
        tally.partial(
            10.0,
            "Mixed content detected (HTTP resources on HTTPS page)",
        );
    } else {
        tally.award(30.0);
    }

    tally.partial(UNVERIFIED_HEADERS_CREDIT, UNVERIFIED_HEADERS_ISSUE);

    let (score, issues) = tally.finish();
    SecurityScore {
        score,
        max_score: MAX_SCORE,
        is_https,
        has_ssl: is_https,
        mixed_content,
        has_security_headers: false,
        issues,
    }
}

impl CategoryResult for SecurityScore {
    fn category(&self) -> Category {
        Category::Security
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
            ("Mixed content", yes_no(self.mixed_content)),
            ("Security headers", "not verified".to_string()),
        ]
    }
}
