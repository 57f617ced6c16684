//! # seolens-core
//!
//! Core library for auditing a single web page against SEO, content, security
//! and performance heuristics.
//!
//! This library provides:
//! - HTML signal extraction into a [`PageSignals`] snapshot
//! - Seven weighted category scorers plus optional Core Web Vitals scoring
//! - Overall score, letter grade and a prioritized recommendation list
//! - Markdown rendering of the resulting [`AuditResult`]
//!
//! ## Features
//!
//! - `inspector` (default): async [`HttpInspector`] that loads pages over HTTP
//!   and probes `robots.txt` / `sitemap.xml`
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use seolens_core::{audit_signals, extract_signals};
//! use url::Url;
//!
//! # fn example() -> anyhow::Result<()> {
//! let html = r#"<html lang="en"><head><title>Example</title></head>
//!     <body><h1>Hello</h1></body></html>"#;
//!
//! let signals = extract_signals(html, &Url::parse("https://example.com/")?);
//! let audit = audit_signals(&signals, Utc::now());
//! println!("{} ({})", audit.overall_score, audit.grade);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod audit;
pub mod extract;
pub mod grade;
pub mod rating;
pub mod recommend;
pub mod report;
pub mod scoring;
pub mod signals;
pub mod url_utils;

#[cfg(feature = "inspector")]
pub mod inspector;

// Re-export commonly used types
pub use aggregate::{WEIGHTS, Weights, overall_score};
pub use audit::{AuditResult, CategoryScores, audit_signals};
pub use extract::{extract_json_ld_blocks, extract_signals, sanitize_html};
pub use grade::Grade;
pub use rating::{Metric, Rating};
pub use report::render_markdown;
pub use scoring::{Category, CategoryResult};
pub use signals::{Anchor, HeadingCounts, OpenGraphTags, PageSignals, PerformanceSignals};

#[cfg(feature = "inspector")]
pub use audit::audit_url;

#[cfg(feature = "inspector")]
pub use inspector::{HttpInspector, InspectError, InspectorConfig, PageInspector};
