use chrono::{DateTime, TimeZone, Utc};
use seolens_core::scoring::{
    score_content_quality, score_link_structure, score_on_page, score_schema_markup,
    score_security, score_technical, score_user_experience, score_web_vitals,
};
use seolens_core::{
    Anchor, AuditResult, CategoryResult, Grade, HeadingCounts, OpenGraphTags, PageSignals,
    PerformanceSignals, WEIGHTS, audit_signals, extract_signals,
};
use url::Url;

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn maximal_signals() -> PageSignals {
    let mut anchors: Vec<Anchor> = (0..8)
        .map(|i| Anchor::new(format!("/guide/{i}"), format!("Guide chapter {i}")))
        .collect();
    anchors.push(Anchor::new("https://developer.mozilla.org/", "MDN reference"));

    PageSignals {
        status_code: 200,
        load_time_ms: 850.0,
        html_bytes: 120_000,
        image_count: 6,
        images_with_alt: 6,
        script_count: 4,
        stylesheet_count: 2,
        has_viewport: true,
        has_canonical: true,
        open_graph: OpenGraphTags {
            title: true,
            description: true,
            image: true,
        },
        has_twitter_card: true,
        has_favicon: true,
        has_lang_attribute: true,
        title: "t".repeat(55),
        meta_description: "d".repeat(155),
        headings: HeadingCounts([1, 4, 6, 0, 0, 0]),
        body_text: "Short clear words here. ".repeat(300),
        paragraph_count: 20,
        anchors,
        has_breadcrumb_markup: true,
        json_ld_blocks: vec![
            r#"{"@context":"https://schema.org","@graph":[
                {"@type":"Organization","name":"Acme"},
                {"@type":"BreadcrumbList","itemListElement":[]},
                {"@type":"Article","headline":"Guide"}]}"#
                .to_string(),
        ],
        body_font_size: Some("16px".to_string()),
        has_robots_txt: true,
        has_sitemap: true,
        performance: Some(PerformanceSignals {
            lcp_ms: 1200.0,
            fcp_ms: 700.0,
            cls: 0.01,
            inp_ms: 90.0,
            ttfb_ms: 200.0,
            ..Default::default()
        }),
        ..PageSignals::for_url("https://acme.test/guide")
    }
}

fn all_results(signals: &PageSignals) -> Vec<Box<dyn CategoryResult>> {
    let mut results: Vec<Box<dyn CategoryResult>> = vec![
        Box::new(score_technical(signals)),
        Box::new(score_on_page(signals)),
        Box::new(score_content_quality(signals)),
        Box::new(score_link_structure(signals)),
        Box::new(score_schema_markup(signals)),
        Box::new(score_security(signals)),
        Box::new(score_user_experience(signals)),
    ];
    if let Some(perf) = &signals.performance {
        results.push(Box::new(score_web_vitals(perf)));
    }
    results
}

#[test]
fn scores_stay_within_budget() {
    let empty = PageSignals::default();
    let maximal = maximal_signals();
    let hostile = PageSignals {
        load_time_ms: 60_000.0,
        html_bytes: 50 * 1024 * 1024,
        image_count: 400,
        script_count: 300,
        headings: HeadingCounts([9, 0, 4, 0, 7, 0]),
        anchors: (0..50)
            .map(|i| Anchor::new(format!("https://spam{i}.test/"), "here"))
            .collect(),
        has_popup: true,
        body_font_size: Some("9px".to_string()),
        performance: Some(PerformanceSignals {
            lcp_ms: 9000.0,
            fcp_ms: 7000.0,
            cls: 0.9,
            inp_ms: 2000.0,
            ttfb_ms: 5000.0,
            resource_count: 500,
            transfer_size: 80 * 1024 * 1024,
            ..Default::default()
        }),
        ..PageSignals::for_url("http://spam.test/")
    };

    for signals in [&empty, &maximal, &hostile] {
        for result in all_results(signals) {
            assert!(
                (0.0..=result.max_score()).contains(&result.score()),
                "{} out of range: {}",
                result.category().label(),
                result.score()
            );
        }
    }
}

#[test]
fn maximal_page_earns_an_a_plus() {
    let audit = audit_signals(&maximal_signals(), timestamp());

    assert_eq!(audit.categories.technical_seo.score, 100.0);
    assert_eq!(audit.categories.on_page_seo.score, 100.0);
    assert_eq!(audit.categories.link_structure.score, 100.0);
    assert_eq!(audit.categories.schema_markup.score, 100.0);
    assert_eq!(audit.categories.user_experience.score, 100.0);
    assert_eq!(audit.categories.performance.as_ref().unwrap().score, 100.0);
    assert_eq!(audit.grade, Grade::APlus);
    assert!(audit.overall_score >= 90.0 && audit.overall_score <= 100.0);
}

#[test]
fn healthy_technical_page_scores_100() {
    let signals = PageSignals {
        has_viewport: true,
        has_robots_txt: true,
        has_sitemap: true,
        load_time_ms: 1500.0,
        html_bytes: 500 * 1024,
        image_count: 20,
        script_count: 10,
        stylesheet_count: 5,
        has_canonical: true,
        ..PageSignals::for_url("https://example.com/")
    };
    let result = score_technical(&signals);
    assert_eq!(result.score, 100.0);
    assert!(result.issues.is_empty());
}

#[test]
fn audits_are_idempotent() {
    let signals = maximal_signals();
    let first = audit_signals(&signals, timestamp());
    let second = audit_signals(&signals, timestamp());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn overall_score_has_two_decimals() {
    let audit = audit_signals(&PageSignals::for_url("https://example.com/"), timestamp());
    let scaled = audit.overall_score * 100.0;
    assert!((scaled - scaled.round()).abs() < 1e-6);
}

#[test]
fn weights_are_consistent() {
    assert!(WEIGHTS.validate().is_ok());
    assert!((WEIGHTS.sum() - 1.0).abs() < 1e-9);
}

#[test]
fn performance_does_not_move_the_overall_score() {
    let without = PageSignals {
        performance: None,
        ..maximal_signals()
    };
    let with_poor = PageSignals {
        performance: Some(PerformanceSignals {
            lcp_ms: 9000.0,
            ..Default::default()
        }),
        ..maximal_signals()
    };

    let a = audit_signals(&without, timestamp());
    let b = audit_signals(&with_poor, timestamp());
    assert_eq!(a.overall_score, b.overall_score);
    assert!(a.categories.performance.is_none());
    assert_eq!(
        b.recommendations.last().map(String::as_str),
        Some("Largest Contentful Paint is poor (9.00 s)")
    );
}

#[test]
fn json_uses_snake_case_category_keys() {
    let audit = audit_signals(&maximal_signals(), timestamp());
    let json = serde_json::to_value(&audit).unwrap();

    assert_eq!(json["grade"], "A+");
    assert_eq!(json["url"], "https://acme.test/guide");
    assert!(json["technical_seo"]["is_mobile_friendly"].as_bool().unwrap());
    assert!(json["on_page_seo"]["keyword_in_title"].as_bool().unwrap());
    assert_eq!(json["schema_markup"]["schema_types"].as_array().unwrap().len(), 3);
    assert!(json["security"]["has_ssl"].as_bool().unwrap());
    assert!(json["user_experience"]["font_size_readable"].as_bool().unwrap());
    assert!(json["performance"]["readings"].is_array());

    let back: AuditResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.grade, Grade::APlus);
}

#[test]
fn extracted_page_flows_through_the_pipeline() {
    let html = r#"<!DOCTYPE html><html lang="en"><head>
        <title>Acme Widgets: durable hand-made widgets for every workshop</title>
        <meta name="viewport" content="width=device-width">
        <link rel="canonical" href="https://acme.test/">
        <link rel="icon" href="/favicon.ico">
        </head><body>
        <h1>Widgets</h1><h2>Range</h2>
        <p>Our widgets last. They are made by hand.</p>
        <a href="/catalogue">Full catalogue</a>
        <a href="https://example.org/">Independent review</a>
        </body></html>"#;

    let signals = extract_signals(html, &Url::parse("https://acme.test/").unwrap());
    let audit = audit_signals(&signals, timestamp());

    assert!(audit.categories.on_page_seo.has_title);
    assert_eq!(audit.categories.link_structure.internal_links, 1);
    assert_eq!(audit.categories.link_structure.external_links, 1);
    assert!(audit.categories.user_experience.has_favicon);
    assert!(!audit.recommendations.iter().any(|r| r.starts_with("CRITICAL: Add a title")));
    assert_eq!(audit.grade, Grade::from_score(audit.overall_score));
}
