//! Weighted composite over the core categories

use anyhow::{Result, bail};
use serde::Serialize;

use crate::scoring::{Category, CategoryResult};

const SUM_TOLERANCE: f64 = 1e-9;

/// Category weights for the overall score.
///
/// Performance has no weight: it is reported next to the composite but never
/// folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub technical: f64,
    pub on_page: f64,
    pub content: f64,
    pub links: f64,
    pub schema: f64,
    pub security: f64,
    pub user_experience: f64,
}

pub const WEIGHTS: Weights = Weights {
    technical: 0.30,
    on_page: 0.25,
    content: 0.20,
    links: 0.10,
    schema: 0.05,
    security: 0.05,
    user_experience: 0.05,
};

const _: () = {
    let sum = WEIGHTS.sum();
    assert!(
        sum > 1.0 - SUM_TOLERANCE && sum < 1.0 + SUM_TOLERANCE,
        "category weights must sum to 1.0"
    );
};

impl Weights {
    pub const fn sum(&self) -> f64 {
        self.technical
            + self.on_page
            + self.content
            + self.links
            + self.schema
            + self.security
            + self.user_experience
    }

    pub fn weight_for(&self, category: Category) -> Option<f64> {
        match category {
            Category::Technical => Some(self.technical),
            Category::OnPage => Some(self.on_page),
            Category::Content => Some(self.content),
            Category::Links => Some(self.links),
            Category::Schema => Some(self.schema),
            Category::Security => Some(self.security),
            Category::UserExperience => Some(self.user_experience),
            Category::Performance => None,
        }
    }

    /// Reject negative weights or a total other than 1.0.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("technical", self.technical),
            ("on_page", self.on_page),
            ("content", self.content),
            ("links", self.links),
            ("schema", self.schema),
            ("security", self.security),
            ("user_experience", self.user_experience),
        ];
        if let Some((name, weight)) = weights
            .iter()
            .find(|(_, weight)| !weight.is_finite() || *weight < 0.0)
        {
            bail!("weight for {name} must be a non-negative number, got {weight}");
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            bail!("category weights must sum to 1.0, got {sum}");
        }
        Ok(())
    }
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `Σ percent × weight` over the weighted categories, rounded to two decimals.
///
/// Results without a weight (performance) are skipped.
pub fn overall_score(results: &[&dyn CategoryResult], weights: &Weights) -> f64 {
    let total: f64 = results
        .iter()
        .filter_map(|result| {
            weights
                .weight_for(result.category())
                .map(|weight| result.percent() * weight)
        })
        .sum();
    round2(total)
}
