//! Page signals consumed by the category scorers
//!
//! A [`PageSignals`] value is a read-only snapshot of everything extracted from a
//! single page load. Absent facts are represented as zero or empty values, never
//! as errors, so every scorer can treat them as the "not present" branch.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use url::Url;

/// An `<a href>` element with its visible text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub href: String,
    /// Trimmed, whitespace-collapsed link text
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// Heading counts for `<h1>` through `<h6>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts(pub [usize; 6]);

impl HeadingCounts {
    /// Count for heading level `1..=6`; other levels count as zero.
    pub fn level(&self, level: usize) -> usize {
        match level {
            1..=6 => self.0[level - 1],
            _ => 0,
        }
    }

    /// Requires an `<h1>`, and no level from `<h3>` down may appear while its
    /// parent level is missing.
    pub fn is_properly_nested(&self) -> bool {
        if self.level(1) == 0 {
            return false;
        }
        (3..=6).all(|level| self.level(level) == 0 || self.level(level - 1) > 0)
    }
}

/// Open Graph tag presence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraphTags {
    pub title: bool,
    pub description: bool,
    pub image: bool,
}

impl OpenGraphTags {
    pub fn is_complete(&self) -> bool {
        self.title && self.description && self.image
    }
}

/// Snapshot of one page load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSignals {
    pub url: String,
    pub scheme: String,
    /// Host including an explicit port, if any
    pub host: String,
    pub status_code: u16,
    pub load_time_ms: f64,
    /// Byte length of the rendered HTML
    pub html_bytes: u64,

    pub image_count: usize,
    /// Images whose `alt` attribute is present and non-empty
    pub images_with_alt: usize,
    pub script_count: usize,
    pub stylesheet_count: usize,
    /// Images, scripts and stylesheets referenced over plain `http://`
    pub insecure_resource_count: usize,

    pub has_viewport: bool,
    pub has_canonical: bool,
    pub open_graph: OpenGraphTags,
    pub has_twitter_card: bool,
    pub has_favicon: bool,
    pub has_lang_attribute: bool,

    pub title: String,
    pub meta_description: String,
    pub headings: HeadingCounts,

    pub body_text: String,
    pub paragraph_count: usize,
    pub anchors: Vec<Anchor>,
    pub has_breadcrumb_markup: bool,

    pub json_ld_blocks: Vec<String>,
    /// Number of elements carrying an `itemscope` attribute
    pub microdata_count: usize,

    /// Body font size as reported by the page (e.g. `"16px"`), if measurable
    pub body_font_size: Option<String>,
    pub has_popup: bool,

    pub has_robots_txt: bool,
    pub has_sitemap: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceSignals>,
}

impl PageSignals {
    /// Empty signals for `url`, with scheme and host filled in when it parses.
    pub fn for_url(url: &str) -> Self {
        let (scheme, host) = match Url::parse(url) {
            Ok(parsed) => (parsed.scheme().to_string(), host_with_port(&parsed)),
            Err(_) => (String::new(), String::new()),
        };

        Self {
            url: url.to_string(),
            scheme,
            host,
            ..Default::default()
        }
    }

    pub fn is_https(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("https")
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.body_text.split_whitespace().count()
    }

    /// Sentence terminators (`.`, `!`, `?`) in the body text
    pub fn sentence_count(&self) -> usize {
        self.body_text
            .chars()
            .filter(|c| matches!(c, '.' | '!' | '?'))
            .count()
    }

    /// Rough request estimate from the sub-resources present in the markup
    pub fn estimated_requests(&self) -> usize {
        self.image_count + self.script_count + self.stylesheet_count
    }
}

/// `host[:port]` for a parsed URL, keeping only non-default ports
pub fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Largest Contentful Paint attribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcpAttribution {
    pub element: Option<String>,
    pub url: Option<String>,
}

/// Cumulative Layout Shift attribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClsAttribution {
    pub largest_shift_target: Option<String>,
    pub largest_shift_value: f64,
}

/// Interaction to Next Paint attribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InpAttribution {
    pub event_target: Option<String>,
    pub event_type: Option<String>,
}

/// Navigation timing milestones in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomTiming {
    pub dom_interactive_ms: f64,
    pub dom_content_loaded_ms: f64,
    pub load_event_ms: f64,
}

/// Runtime performance measurements.
///
/// A metric value of `0.0` means "not captured".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSignals {
    pub lcp_ms: f64,
    pub fcp_ms: f64,
    pub cls: f64,
    pub inp_ms: f64,
    pub ttfb_ms: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcp_attribution: Option<LcpAttribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cls_attribution: Option<ClsAttribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inp_attribution: Option<InpAttribution>,

    pub dom_timing: DomTiming,
    /// Total bytes transferred for the page and its resources
    pub transfer_size: u64,
    pub resource_count: usize,
}

impl PerformanceSignals {
    /// Parse the loosely-typed payload produced by an in-page measurement script.
    ///
    /// Expected shape (all keys optional):
    ///
    /// ```json
    /// {
    ///   "lcp": 2100, "fcp": 900, "cls": 0.04, "inp": 120, "ttfb": 300,
    ///   "lcpAttribution": {"element": "img.hero", "url": "https://..."},
    ///   "clsAttribution": {"largestShiftTarget": "div.ad", "largestShiftValue": 0.03},
    ///   "inpAttribution": {"eventTarget": "button#buy", "eventType": "click"},
    ///   "domTiming": {"domInteractive": 800, "domContentLoaded": 950, "loadEvent": 1400},
    ///   "transferSize": 524288, "resourceCount": 42
    /// }
    /// ```
    ///
    /// Numeric fields may also arrive as numeric strings. Malformed, negative or
    /// non-finite values are logged and treated as not captured. Only a payload
    /// that is not a JSON object is rejected.
    pub fn from_payload(payload: &JsonValue) -> Result<Self> {
        let Some(fields) = payload.as_object() else {
            bail!("performance payload must be a JSON object, got {payload}");
        };

        let dom_timing = fields
            .get("domTiming")
            .and_then(JsonValue::as_object)
            .map(|timing| DomTiming {
                dom_interactive_ms: metric(timing, "domInteractive"),
                dom_content_loaded_ms: metric(timing, "domContentLoaded"),
                load_event_ms: metric(timing, "loadEvent"),
            })
            .unwrap_or_default();

        Ok(Self {
            lcp_ms: metric(fields, "lcp"),
            fcp_ms: metric(fields, "fcp"),
            cls: metric(fields, "cls"),
            inp_ms: metric(fields, "inp"),
            ttfb_ms: metric(fields, "ttfb"),
            lcp_attribution: fields
                .get("lcpAttribution")
                .and_then(JsonValue::as_object)
                .map(|attr| LcpAttribution {
                    element: text(attr, "element"),
                    url: text(attr, "url"),
                }),
            cls_attribution: fields
                .get("clsAttribution")
                .and_then(JsonValue::as_object)
                .map(|attr| ClsAttribution {
                    largest_shift_target: text(attr, "largestShiftTarget"),
                    largest_shift_value: metric(attr, "largestShiftValue"),
                }),
            inp_attribution: fields
                .get("inpAttribution")
                .and_then(JsonValue::as_object)
                .map(|attr| InpAttribution {
                    event_target: text(attr, "eventTarget"),
                    event_type: text(attr, "eventType"),
                }),
            dom_timing,
            transfer_size: metric(fields, "transferSize") as u64,
            resource_count: metric(fields, "resourceCount") as usize,
        })
    }

    /// Overlay captured values from `other` on top of `self`.
    ///
    /// Used to combine what the inspector measured over HTTP with vitals
    /// collected elsewhere.
    pub fn merged_with(self, other: PerformanceSignals) -> Self {
        fn pick(base: f64, over: f64) -> f64 {
            if over > 0.0 { over } else { base }
        }

        Self {
            lcp_ms: pick(self.lcp_ms, other.lcp_ms),
            fcp_ms: pick(self.fcp_ms, other.fcp_ms),
            cls: pick(self.cls, other.cls),
            inp_ms: pick(self.inp_ms, other.inp_ms),
            ttfb_ms: pick(self.ttfb_ms, other.ttfb_ms),
            lcp_attribution: other.lcp_attribution.or(self.lcp_attribution),
            cls_attribution: other.cls_attribution.or(self.cls_attribution),
            inp_attribution: other.inp_attribution.or(self.inp_attribution),
            dom_timing: DomTiming {
                dom_interactive_ms: pick(
                    self.dom_timing.dom_interactive_ms,
                    other.dom_timing.dom_interactive_ms,
                ),
                dom_content_loaded_ms: pick(
                    self.dom_timing.dom_content_loaded_ms,
                    other.dom_timing.dom_content_loaded_ms,
                ),
                load_event_ms: pick(self.dom_timing.load_event_ms, other.dom_timing.load_event_ms),
            },
            transfer_size: other.transfer_size.max(self.transfer_size),
            resource_count: other.resource_count.max(self.resource_count),
        }
    }
}

fn metric(fields: &Map<String, JsonValue>, key: &str) -> f64 {
    let parsed = match fields.get(key) {
        None | Some(JsonValue::Null) => return 0.0,
        Some(JsonValue::Number(number)) => number.as_f64(),
        Some(JsonValue::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            tracing::warn!(
                field = key,
                raw = %fields[key],
                "discarding malformed performance value"
            );
            0.0
        }
    }
}

fn text(fields: &Map<String, JsonValue>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn for_url_splits_scheme_and_host() {
        let signals = PageSignals::for_url("https://example.com:8443/path");
        assert_eq!(signals.scheme, "https");
        assert_eq!(signals.host, "example.com:8443");
        assert!(signals.is_https());

        let plain = PageSignals::for_url("http://example.com/");
        assert_eq!(plain.host, "example.com");
        assert!(!plain.is_https());
    }

    #[test]
    fn for_url_tolerates_garbage() {
        let signals = PageSignals::for_url("not a url");
        assert!(signals.scheme.is_empty());
        assert!(signals.host.is_empty());
    }

    #[test]
    fn counts_words_and_sentences() {
        let signals = PageSignals {
            body_text: "One two three. Four five!  Six?".to_string(),
            ..Default::default()
        };
        assert_eq!(signals.word_count(), 6);
        assert_eq!(signals.sentence_count(), 3);
    }

    #[test]
    fn heading_nesting_requires_h1_and_parents() {
        assert!(HeadingCounts([1, 2, 3, 0, 0, 0]).is_properly_nested());
        assert!(HeadingCounts([1, 0, 0, 0, 0, 0]).is_properly_nested());
        assert!(!HeadingCounts([0, 2, 0, 0, 0, 0]).is_properly_nested());
        assert!(!HeadingCounts([1, 0, 1, 0, 0, 0]).is_properly_nested());
        assert!(!HeadingCounts([1, 1, 1, 0, 1, 0]).is_properly_nested());
        // h2 may be absent when nothing below it is used
        assert!(HeadingCounts([2, 0, 0, 0, 0, 0]).is_properly_nested());
    }

    #[test]
    fn payload_parses_numbers_and_numeric_strings() {
        let payload = json!({
            "lcp": 2100,
            "fcp": "900.5",
            "cls": 0.04,
            "ttfb": 310,
            "transferSize": 524288,
            "resourceCount": 42,
            "domTiming": {"domInteractive": 800, "loadEvent": 1400},
            "inpAttribution": {"eventTarget": "button#buy", "eventType": "click"}
        });

        let perf = PerformanceSignals::from_payload(&payload).unwrap();
        assert_eq!(perf.lcp_ms, 2100.0);
        assert_eq!(perf.fcp_ms, 900.5);
        assert_eq!(perf.cls, 0.04);
        assert_eq!(perf.inp_ms, 0.0);
        assert_eq!(perf.ttfb_ms, 310.0);
        assert_eq!(perf.transfer_size, 524_288);
        assert_eq!(perf.resource_count, 42);
        assert_eq!(perf.dom_timing.dom_interactive_ms, 800.0);
        assert_eq!(perf.dom_timing.dom_content_loaded_ms, 0.0);
        assert_eq!(
            perf.inp_attribution.unwrap().event_type.as_deref(),
            Some("click")
        );
        assert!(perf.lcp_attribution.is_none());
    }

    #[test]
    fn payload_defaults_malformed_values() {
        let payload = json!({
            "lcp": "fast",
            "fcp": -5,
            "cls": [0.1],
            "inp": true,
            "ttfb": null
        });

        let perf = PerformanceSignals::from_payload(&payload).unwrap();
        assert_eq!(perf, PerformanceSignals::default());
    }

    #[test]
    fn payload_rejects_non_objects() {
        assert!(PerformanceSignals::from_payload(&json!([1, 2, 3])).is_err());
        assert!(PerformanceSignals::from_payload(&json!("lcp=2000")).is_err());
    }

    #[test]
    fn merge_prefers_captured_overrides() {
        let measured = PerformanceSignals {
            ttfb_ms: 250.0,
            transfer_size: 10_000,
            resource_count: 12,
            ..Default::default()
        };
        let collected = PerformanceSignals {
            lcp_ms: 1900.0,
            cls: 0.02,
            ..Default::default()
        };

        let merged = measured.merged_with(collected);
        assert_eq!(merged.ttfb_ms, 250.0);
        assert_eq!(merged.lcp_ms, 1900.0);
        assert_eq!(merged.cls, 0.02);
        assert_eq!(merged.transfer_size, 10_000);
        assert_eq!(merged.resource_count, 12);
    }
}
