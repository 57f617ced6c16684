//! Core Web Vitals ratings
//!
//! Each metric maps onto a three-tier rating using the published thresholds.
//! A value sitting exactly on a threshold belongs to the better tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative rating of a single measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rated performance metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Lcp,
    Fcp,
    Cls,
    Inp,
    Ttfb,
}

impl Metric {
    pub const ALL: [Metric; 5] = [Metric::Lcp, Metric::Fcp, Metric::Cls, Metric::Inp, Metric::Ttfb];

    /// `(good, needs_improvement)` upper bounds
    pub const fn thresholds(self) -> (f64, f64) {
        match self {
            Metric::Lcp => (2500.0, 4000.0),
            Metric::Fcp => (1800.0, 3000.0),
            Metric::Cls => (0.10, 0.25),
            Metric::Ttfb => (800.0, 1800.0),
            Metric::Inp => (200.0, 500.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Lcp => "Largest Contentful Paint",
            Metric::Fcp => "First Contentful Paint",
            Metric::Cls => "Cumulative Layout Shift",
            Metric::Inp => "Interaction to Next Paint",
            Metric::Ttfb => "Time to First Byte",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Metric::Lcp => "LCP",
            Metric::Fcp => "FCP",
            Metric::Cls => "CLS",
            Metric::Inp => "INP",
            Metric::Ttfb => "TTFB",
        }
    }

    pub fn rate(self, value: f64) -> Rating {
        let (good, needs_improvement) = self.thresholds();
        if value <= good {
            Rating::Good
        } else if value <= needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }

    /// Human-readable value: seconds for timings, three decimals for CLS
    pub fn format_value(self, value: f64) -> String {
        match self {
            Metric::Cls => format!("{value:.3}"),
            Metric::Inp | Metric::Ttfb => format!("{value:.0} ms"),
            Metric::Lcp | Metric::Fcp => format!("{:.2} s", value / 1000.0),
        }
    }
}

pub fn rate_lcp(ms: f64) -> Rating {
    Metric::Lcp.rate(ms)
}

pub fn rate_fcp(ms: f64) -> Rating {
    Metric::Fcp.rate(ms)
}

pub fn rate_cls(value: f64) -> Rating {
    Metric::Cls.rate(value)
}

pub fn rate_ttfb(ms: f64) -> Rating {
    Metric::Ttfb.rate(ms)
}

pub fn rate_inp(ms: f64) -> Rating {
    Metric::Inp.rate(ms)
}
