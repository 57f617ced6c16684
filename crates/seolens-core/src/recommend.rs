//! Recommendation list synthesis

use crate::audit::CategoryScores;
use crate::scoring::CategoryResult;

pub const CRITICAL_TECHNICAL: &str = "CRITICAL: Address technical SEO issues immediately";
pub const CRITICAL_HTTPS: &str = "CRITICAL: Implement HTTPS for security and SEO";
pub const CRITICAL_TITLE: &str = "CRITICAL: Add a title tag to the page";

/// Score below which technical SEO is treated as critical
const CRITICAL_TECHNICAL_BELOW: f64 = 50.0;

/// Every category's issues in report order, headed by the critical items.
///
/// Critical items are pushed to the front one at a time, so a missing title
/// comes first, then HTTPS, then the technical warning.
pub fn synthesize(scores: &CategoryScores) -> Vec<String> {
    let mut recommendations: Vec<String> = scores
        .all()
        .into_iter()
        .flat_map(|result| result.issues().iter().cloned())
        .collect();

    let critical = [
        (
            scores.technical_seo.score < CRITICAL_TECHNICAL_BELOW,
            CRITICAL_TECHNICAL,
        ),
        (!scores.security.is_https, CRITICAL_HTTPS),
        (!scores.on_page_seo.has_title, CRITICAL_TITLE),
    ];
    for (applies, item) in critical {
        if applies {
            recommendations.insert(0, item.to_string());
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::PageSignals;

    #[test]
    fn critical_items_lead_in_reverse_evaluation_order() {
        let scores = CategoryScores::score_all(&PageSignals::for_url("http://example.com/"));
        let recommendations = synthesize(&scores);

        assert_eq!(
            &recommendations[..3],
            [CRITICAL_TITLE, CRITICAL_HTTPS, CRITICAL_TECHNICAL]
        );
        assert_eq!(recommendations[3], "Site is not using HTTPS");
    }

    #[test]
    fn issues_follow_category_order() {
        let signals = PageSignals {
            title: "A reasonably descriptive page title for the landing page".to_string(),
            ..PageSignals::for_url("https://example.com/")
        };
        let scores = CategoryScores::score_all(&signals);
        let recommendations = synthesize(&scores);

        let expected: Vec<String> = scores
            .all()
            .iter()
            .flat_map(|result| result.issues().to_vec())
            .collect();
        // HTTPS, a title and technical at 60: nothing critical
        assert_eq!(scores.technical_seo.score, 60.0);
        assert_eq!(recommendations, expected);
    }

    #[test]
    fn performance_issues_come_last() {
        let signals = PageSignals {
            performance: Some(crate::signals::PerformanceSignals {
                lcp_ms: 6000.0,
                ..Default::default()
            }),
            ..PageSignals::for_url("https://example.com/")
        };
        let recommendations = synthesize(&CategoryScores::score_all(&signals));
        assert_eq!(
            recommendations.last().map(String::as_str),
            Some("Largest Contentful Paint is poor (6.00 s)")
        );
    }
}
