//! Schema markup: JSON-LD presence and recognized Schema.org types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{Category, CategoryResult, MAX_SCORE, Tally, yes_no};
use crate::signals::PageSignals;

/// Types that earn credit, in reporting order
pub const RECOGNIZED_TYPES: [&str; 5] = [
    "Organization",
    "BreadcrumbList",
    "Article",
    "Product",
    "LocalBusiness",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMarkup {
    pub score: f64,
    pub max_score: f64,
    pub has_schema: bool,
    pub has_json_ld: bool,
    pub schema_types: Vec<String>,
    pub has_organization: bool,
    pub has_breadcrumb: bool,
    pub issues: Vec<String>,
}

/// Distinct recognized types across all JSON-LD blocks.
///
/// Blocks are parsed and every `@type` is collected, including nested
/// entities and `@graph` members. Blocks that are not valid JSON fall back to
/// a plain text search.
pub fn recognized_types(blocks: &[String]) -> Vec<&'static str> {
    let mut found = [false; RECOGNIZED_TYPES.len()];

    for block in blocks {
        match serde_json::from_str::<JsonValue>(block) {
            Ok(value) => collect_types(&value, &mut found),
            Err(err) => {
                tracing::debug!(error = %err, "JSON-LD block is not valid JSON; scanning text");
                if block.contains("\"@type\"") {
                    for (slot, name) in found.iter_mut().zip(RECOGNIZED_TYPES) {
                        *slot |= block.contains(name);
                    }
                }
            }
        }
    }

    RECOGNIZED_TYPES
        .into_iter()
        .zip(found)
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
}

fn collect_types(value: &JsonValue, found: &mut [bool; RECOGNIZED_TYPES.len()]) {
    match value {
        JsonValue::Object(map) => {
            match map.get("@type") {
                Some(JsonValue::String(name)) => mark_type(name, found),
                Some(JsonValue::Array(names)) => names
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .for_each(|name| mark_type(name, found)),
                _ => {}
            }
            map.values().for_each(|child| collect_types(child, found));
        }
        JsonValue::Array(items) => items.iter().for_each(|item| collect_types(item, found)),
        _ => {}
    }
}

fn mark_type(name: &str, found: &mut [bool; RECOGNIZED_TYPES.len()]) {
    // "https://schema.org/Product" and "schema:Product" both mean Product
    let short = name
        .rsplit(['/', '#', ':'])
        .next()
        .unwrap_or(name)
        .trim();
    if let Some(index) = RECOGNIZED_TYPES.iter().position(|known| *known == short) {
        found[index] = true;
    }
}

pub fn score_schema_markup(signals: &PageSignals) -> SchemaMarkup {
    let mut tally = Tally::new(MAX_SCORE);
    let has_json_ld = !signals.json_ld_blocks.is_empty();

    let types = if has_json_ld {
        recognized_types(&signals.json_ld_blocks)
    } else {
        Vec::new()
    };
    let has_organization = types.contains(&"Organization");
    let has_breadcrumb = types.contains(&"BreadcrumbList");

    if has_json_ld {
        tally.award(30.0);

        match types.len() {
            0 => {}
            1 => tally.partial(20.0, "Limited schema markup types"),
            2 => tally.award(30.0),
            _ => tally.award(40.0),
        }

        tally.check(has_organization, 15.0, "Missing Organization schema");
        tally.check(has_breadcrumb, 15.0, "Missing BreadcrumbList schema");
    } else {
        tally.flag("No structured data (schema markup) found");
    }

    let has_microdata = signals.microdata_count > 0;
    if has_microdata && !has_json_ld {
        tally.partial(
            20.0,
            "Using microdata instead of JSON-LD (JSON-LD is preferred)",
        );
    }

    let (score, issues) = tally.finish();
    SchemaMarkup {
        score,
        max_score: MAX_SCORE,
        has_schema: has_json_ld || has_microdata,
        has_json_ld,
        schema_types: types.into_iter().map(str::to_string).collect(),
        has_organization,
        has_breadcrumb,
        issues,
    }
}

impl CategoryResult for SchemaMarkup {
    fn category(&self) -> Category {
        Category::Schema
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
        let types = if self.schema_types.is_empty() {
            "none".to_string()
        } else {
            self.schema_types.join(", ")
        };
        vec![
            ("JSON-LD", yes_no(self.has_json_ld)),
            ("Recognized types", types),
            ("Organization", yes_no(self.has_organization)),
            ("BreadcrumbList", yes_no(self.has_breadcrumb)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_blocks(blocks: &[&str]) -> PageSignals {
        PageSignals {
            json_ld_blocks: blocks.iter().map(|b| b.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn rich_markup_scores_full_marks() {
        let result = score_schema_markup(&with_blocks(&[
            r#"{"@context": "https://schema.org", "@type": "Organization", "name": "Acme"}"#,
            r#"{"@context": "https://schema.org", "@graph": [
                {"@type": "BreadcrumbList", "itemListElement": []},
                {"@type": "Article", "headline": "News"}
            ]}"#,
        ]));

        assert_eq!(
            result.schema_types,
            vec!["Organization", "BreadcrumbList", "Article"]
        );
        assert_eq!(result.score, 100.0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn duplicate_types_count_once() {
        let result = score_schema_markup(&with_blocks(&[
            r#"{"@type": "Product", "name": "One"}"#,
            r#"{"@type": "Product", "name": "Two"}"#,
        ]));

        assert_eq!(result.schema_types, vec!["Product"]);
        // 30 presence + 20 single type
        assert_eq!(result.score, 50.0);
        assert_eq!(
            result.issues,
            vec![
                "Limited schema markup types",
                "Missing Organization schema",
                "Missing BreadcrumbList schema",
            ]
        );
    }

    #[test]
    fn unrecognized_types_earn_presence_only() {
        let result = score_schema_markup(&with_blocks(&[
            r#"{"@context": "https://schema.org", "@type": "WebSite", "name": "Acme"}"#,
        ]));

        assert!(result.has_json_ld);
        assert!(result.schema_types.is_empty());
        assert_eq!(result.score, 30.0);
        assert_eq!(
            result.issues,
            vec!["Missing Organization schema", "Missing BreadcrumbList schema"]
        );
    }

    #[test]
    fn nested_and_prefixed_types_are_found() {
        let types = recognized_types(&[r#"{
            "@type": ["https://schema.org/LocalBusiness"],
            "parentOrganization": {"@type": "schema:Organization"}
        }"#
        .to_string()]);
        assert_eq!(types, vec!["Organization", "LocalBusiness"]);
    }

    #[test]
    fn invalid_json_falls_back_to_text_search() {
        let types = recognized_types(&[r#"{"@type": "Product", "name": "Broken""#.to_string()]);
        assert_eq!(types, vec!["Product"]);
    }

    #[test]
    fn microdata_without_json_ld() {
        let result = score_schema_markup(&PageSignals {
            microdata_count: 4,
            ..Default::default()
        });
        assert!(result.has_schema);
        assert!(!result.has_json_ld);
        assert_eq!(result.score, 20.0);
        assert_eq!(
            result.issues,
            vec![
                "No structured data (schema markup) found",
                "Using microdata instead of JSON-LD (JSON-LD is preferred)",
            ]
        );
    }

    #[test]
    fn nothing_found() {
        let result = score_schema_markup(&PageSignals::default());
        assert_eq!(result.score, 0.0);
        assert!(!result.has_schema);
        assert_eq!(result.issues, vec!["No structured data (schema markup) found"]);
    }
}
