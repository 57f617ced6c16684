//! Audit pipeline: signals in, graded result out

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{WEIGHTS, overall_score};
use crate::grade::Grade;
use crate::recommend::synthesize;
use crate::scoring::{
    CategoryResult, ContentQuality, LinkStructure, OnPageSeo, SchemaMarkup, SecurityScore,
    TechnicalSeo, UserExperience, WebVitals, score_content_quality, score_link_structure,
    score_on_page, score_schema_markup, score_security, score_technical, score_user_experience,
    score_web_vitals,
};
use crate::signals::PageSignals;

/// Results for every category of one audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub technical_seo: TechnicalSeo,
    pub on_page_seo: OnPageSeo,
    pub content_quality: ContentQuality,
    pub link_structure: LinkStructure,
    pub schema_markup: SchemaMarkup,
    pub security: SecurityScore,
    pub user_experience: UserExperience,
    /// Present only when performance signals were captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<WebVitals>,
}

impl CategoryScores {
    pub fn score_all(signals: &PageSignals) -> Self {
        Self {
            technical_seo: score_technical(signals),
            on_page_seo: score_on_page(signals),
            content_quality: score_content_quality(signals),
            link_structure: score_link_structure(signals),
            schema_markup: score_schema_markup(signals),
            security: score_security(signals),
            user_experience: score_user_experience(signals),
            performance: signals.performance.as_ref().map(score_web_vitals),
        }
    }

    /// The seven weighted categories in report order
    pub fn core(&self) -> [&dyn CategoryResult; 7] {
        [
            &self.technical_seo,
            &self.on_page_seo,
            &self.content_quality,
            &self.link_structure,
            &self.schema_markup,
            &self.security,
            &self.user_experience,
        ]
    }

    /// Core categories followed by performance, when present
    pub fn all(&self) -> Vec<&dyn CategoryResult> {
        let mut results = self.core().to_vec();
        if let Some(performance) = &self.performance {
            results.push(performance);
        }
        results
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub categories: CategoryScores,
    pub overall_score: f64,
    pub grade: Grade,
    pub recommendations: Vec<String>,
}

/// Score a signal snapshot.
///
/// Pure apart from the caller-supplied timestamp: the same signals and
/// timestamp always give the same result.
pub fn audit_signals(signals: &PageSignals, timestamp: DateTime<Utc>) -> AuditResult {
    let categories = CategoryScores::score_all(signals);
    let overall_score = overall_score(&categories.core(), &WEIGHTS);
    let grade = Grade::from_score(overall_score);
    let recommendations = synthesize(&categories);

    tracing::debug!(
        url = %signals.url,
        overall_score,
        %grade,
        recommendations = recommendations.len(),
        "audit scored"
    );

    AuditResult {
        url: signals.url.clone(),
        timestamp,
        categories,
        overall_score,
        grade,
        recommendations,
    }
}

/// Load `url` through `inspector` and score it.
#[cfg(feature = "inspector")]
pub async fn audit_url(
    inspector: &dyn crate::inspector::PageInspector,
    url: &str,
    timestamp: DateTime<Utc>,
) -> Result<AuditResult, crate::inspector::InspectError> {
    tracing::info!(url, "auditing page");
    let signals = inspector.load(url).await?;
    let result = audit_signals(&signals, timestamp);
    tracing::info!(
        url,
        overall_score = result.overall_score,
        grade = %result.grade,
        "audit complete"
    );
    Ok(result)
}
