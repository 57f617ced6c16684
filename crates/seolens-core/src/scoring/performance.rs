//! Runtime performance (Core Web Vitals)
//!
//! Scored only when the inspector captured [`PerformanceSignals`]. Each rated
//! metric is worth 20 points; when fewer than five metrics were captured the
//! raw total is rescaled so that a page is not punished for what could not be
//! measured. CLS always counts, since an unmeasured layout shift means none
//! was observed.

use serde::{Deserialize, Serialize};

use super::{Category, CategoryResult, MAX_SCORE, Tally};
use crate::rating::{Metric, Rating};
use crate::signals::{
    ClsAttribution, DomTiming, InpAttribution, LcpAttribution, PerformanceSignals,
};

const POINTS_PER_METRIC: f64 = 20.0;
const MAX_RESOURCES: usize = 100;
const MAX_TRANSFER_BYTES: u64 = 5 * 1024 * 1024;

/// One rated measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub metric: Metric,
    pub value: f64,
    pub rating: Rating,
}

impl MetricReading {
    pub fn new(metric: Metric, value: f64) -> Self {
        Self {
            metric,
            value,
            rating: metric.rate(value),
        }
    }

    pub fn points(&self) -> f64 {
        match self.rating {
            Rating::Good => POINTS_PER_METRIC,
            Rating::NeedsImprovement => 12.0,
            Rating::Poor => 4.0,
        }
    }

    pub fn formatted_value(&self) -> String {
        self.metric.format_value(self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebVitals {
    pub score: f64,
    pub max_score: f64,
    /// Sum of metric points before rescaling
    pub raw_score: f64,
    pub captured_metrics: usize,
    pub readings: Vec<MetricReading>,
    pub transfer_size: u64,
    pub resource_count: usize,
    pub dom_timing: DomTiming,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcp_attribution: Option<LcpAttribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cls_attribution: Option<ClsAttribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inp_attribution: Option<InpAttribution>,
    pub issues: Vec<String>,
}

impl WebVitals {
    pub fn reading(&self, metric: Metric) -> Option<&MetricReading> {
        self.readings.iter().find(|reading| reading.metric == metric)
    }
}

fn captured_readings(perf: &PerformanceSignals) -> Vec<MetricReading> {
    Metric::ALL
        .into_iter()
        .filter_map(|metric| {
            let value = match metric {
                Metric::Lcp => perf.lcp_ms,
                Metric::Fcp => perf.fcp_ms,
                Metric::Cls => return Some(MetricReading::new(metric, perf.cls)),
                Metric::Inp => perf.inp_ms,
                Metric::Ttfb => perf.ttfb_ms,
            };
            (value > 0.0).then(|| MetricReading::new(metric, value))
        })
        .collect()
}

pub fn score_web_vitals(perf: &PerformanceSignals) -> WebVitals {
    let mut tally = Tally::new(MAX_SCORE);
    let readings = captured_readings(perf);

    let raw_score: f64 = readings.iter().map(MetricReading::points).sum();
    let captured_metrics = readings.len();
    let possible = captured_metrics as f64 * POINTS_PER_METRIC;
    if captured_metrics < Metric::ALL.len() {
        tally.award(raw_score / possible * MAX_SCORE);
    } else {
        tally.award(raw_score);
    }

    for reading in &readings {
        let value = reading.formatted_value();
        match reading.rating {
            Rating::Good => {}
            Rating::NeedsImprovement => {
                tally.flag(format!("{} needs improvement ({value})", reading.metric.name()))
            }
            Rating::Poor => tally.flag(format!("{} is poor ({value})", reading.metric.name())),
        }
    }

    if perf.resource_count > MAX_RESOURCES {
        tally.flag(format!(
            "High number of resources loaded ({})",
            perf.resource_count
        ));
    }
    if perf.transfer_size > MAX_TRANSFER_BYTES {
        tally.flag(format!(
            "Total transfer size is large ({:.2} MB)",
            perf.transfer_size as f64 / (1024.0 * 1024.0)
        ));
    }

    let (score, issues) = tally.finish();
    WebVitals {
        score,
        max_score: MAX_SCORE,
        raw_score,
        captured_metrics,
        readings,
        transfer_size: perf.transfer_size,
        resource_count: perf.resource_count,
        dom_timing: perf.dom_timing,
        lcp_attribution: perf.lcp_attribution.clone(),
        cls_attribution: perf.cls_attribution.clone(),
        inp_attribution: perf.inp_attribution.clone(),
        issues,
    }
}

impl CategoryResult for WebVitals {
    fn category(&self) -> Category {
        Category::Performance
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
        let mut facts: Vec<(&'static str, String)> = self
            .readings
            .iter()
            .map(|reading| {
                (
                    reading.metric.abbreviation(),
                    format!("{} ({})", reading.formatted_value(), reading.rating),
                )
            })
            .collect();

        if let Some(element) = self
            .lcp_attribution
            .as_ref()
            .and_then(|attr| attr.element.clone())
        {
            facts.push(("LCP element", element));
        }
        if let Some(target) = self
            .cls_attribution
            .as_ref()
            .and_then(|attr| attr.largest_shift_target.clone())
        {
            facts.push(("Largest layout shift", target));
        }
        if let Some(attr) = &self.inp_attribution {
            if let (Some(target), Some(kind)) = (&attr.event_target, &attr.event_type) {
                facts.push(("Slowest interaction", format!("{kind} on {target}")));
            }
        }
        if self.dom_timing.dom_content_loaded_ms > 0.0 {
            facts.push((
                "DOMContentLoaded",
                format!("{:.0} ms", self.dom_timing.dom_content_loaded_ms),
            ));
        }
        if self.transfer_size > 0 {
            facts.push((
                "Transfer size",
                format!("{:.1} KB", self.transfer_size as f64 / 1024.0),
            ));
        }
        if self.resource_count > 0 {
            facts.push(("Resources", self.resource_count.to_string()));
        }
        facts
    }
}
