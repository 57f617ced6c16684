//! HTML signal extraction
//!
//! Turns a fetched or rendered HTML document into [`PageSignals`]. Everything
//! here is a static read of the markup: computed styles and runtime state are
//! approximated from inline styles and `<style>` rules.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::signals::{Anchor, HeadingCounts, OpenGraphTags, PageSignals};

static SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("invalid script selector"));
static IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("invalid img selector"));
static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("invalid anchor selector"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("invalid title selector"));
static BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("invalid body selector"));
static STYLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("style").expect("invalid style selector"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("invalid description selector")
});

static RE_INLINE_FONT_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)font-size\s*:\s*([^;]+)").expect("invalid font-size regex"));
static RE_BODY_RULE_FONT_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:^|[}\s,])body\s*\{[^}]*?font-size\s*:\s*([^;}]+)")
        .expect("invalid body rule regex")
});
static RE_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

const INSECURE_RESOURCES: &str = "img[src^='http://'], script[src^='http://'], \
     link[rel~='stylesheet'][href^='http://']";
const BREADCRUMBS: &str =
    "[itemtype*='BreadcrumbList'], nav[aria-label*='readcrumb'], .breadcrumb";
const POPUPS: &str = "[class*='modal'][style*='display'], [class*='popup'][style*='display']";

/// Extract every static signal from `html`, loaded from `page_url`.
///
/// Network-derived facts (status, load time, robots.txt and sitemap probes,
/// performance) are left at their defaults for the caller to fill in.
pub fn extract_signals(html: &str, page_url: &Url) -> PageSignals {
    let document = Html::parse_document(html);

    let (image_count, images_with_alt) = count_images(&document);
    let open_graph = OpenGraphTags {
        title: select_exists(&document, "meta[property='og:title']"),
        description: select_exists(&document, "meta[property='og:description']"),
        image: select_exists(&document, "meta[property='og:image']"),
    };

    PageSignals {
        html_bytes: html.len() as u64,
        image_count,
        images_with_alt,
        script_count: count_elements(&document, "script"),
        stylesheet_count: count_elements(&document, "link[rel~='stylesheet']"),
        insecure_resource_count: count_elements(&document, INSECURE_RESOURCES),
        has_viewport: select_exists(&document, "meta[name='viewport']"),
        has_canonical: select_exists(&document, "link[rel='canonical']"),
        open_graph,
        has_twitter_card: select_exists(&document, "meta[name='twitter:card']"),
        has_favicon: select_exists(&document, "link[rel*='icon']"),
        has_lang_attribute: select_exists(&document, "html[lang]"),
        title: document_title(&document),
        meta_description: meta_description(&document),
        headings: heading_counts(&document),
        body_text: body_text(html),
        paragraph_count: count_elements(&document, "p"),
        anchors: anchors(&document),
        has_breadcrumb_markup: select_exists(&document, BREADCRUMBS),
        json_ld_blocks: extract_json_ld_blocks(&document),
        microdata_count: count_elements(&document, "[itemscope]"),
        body_font_size: body_font_size(&document),
        has_popup: select_exists(&document, POPUPS),
        ..PageSignals::for_url(page_url.as_str())
    }
}

/// Extract JSON-LD script blocks from a parsed document.
///
/// Empty blocks are kept as empty strings: the script tag alone counts as
/// structured data being present.
pub fn extract_json_ld_blocks(document: &Html) -> Vec<String> {
    document
        .select(&SCRIPT)
        .filter_map(|element| {
            let script_type = element
                .value()
                .attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_default();

            // Use contains() to catch variations like "application/ld+json; charset=utf-8"
            script_type
                .contains("ld+json")
                .then(|| element.text().collect::<String>().trim().to_string())
        })
        .collect()
}

/// Sanitize HTML by removing script, style, and other non-visible blocks
pub fn sanitize_html(html: &str) -> String {
    static RE_TAG_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?is)<script[^>]*?>[\s\S]*?</script>",
            r"(?is)<style[^>]*?>[\s\S]*?</style>",
            r"(?is)<noscript[^>]*?>[\s\S]*?</noscript>",
            r"(?is)<template[^>]*?>[\s\S]*?</template>",
        ]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("invalid block regex"))
        .collect()
    });
    static RE_COMMENT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)<!--.*?-->").expect("invalid comment regex"));

    let mut clean = html.to_string();
    for re in RE_TAG_BLOCKS.iter() {
        clean = re.replace_all(&clean, "").into_owned();
    }

    RE_COMMENT.replace_all(&clean, "").into_owned()
}

/// Visible body text with whitespace collapsed
fn body_text(html: &str) -> String {
    let visible = Html::parse_document(&sanitize_html(html));
    visible
        .select(&BODY)
        .next()
        .map(|body| collapse_whitespace(&body.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn document_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn meta_description(document: &Html) -> String {
    document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn heading_counts(document: &Html) -> HeadingCounts {
    let mut counts = [0; 6];
    for (level, count) in counts.iter_mut().enumerate() {
        *count = count_elements(document, &format!("h{}", level + 1));
    }
    HeadingCounts(counts)
}

/// `(total, with non-empty alt)`
fn count_images(document: &Html) -> (usize, usize) {
    document.select(&IMAGE).fold((0, 0), |(total, with_alt), image| {
        let has_alt = image
            .value()
            .attr("alt")
            .is_some_and(|alt| !alt.is_empty());
        (total + 1, with_alt + usize::from(has_alt))
    })
}

fn anchors(document: &Html) -> Vec<Anchor> {
    document
        .select(&ANCHOR)
        .map(|anchor| {
            let href = anchor.value().attr("href").unwrap_or_default().trim();
            Anchor::new(href, element_text(anchor))
        })
        .collect()
}

/// Inline `style` on `<body>` first, then a `body { ... }` rule in a `<style>` block
fn body_font_size(document: &Html) -> Option<String> {
    let inline = document
        .select(&BODY)
        .next()
        .and_then(|body| body.value().attr("style"))
        .and_then(|style| RE_INLINE_FONT_SIZE.captures(style))
        .map(|captures| captures[1].trim().to_string());

    inline.or_else(|| {
        document.select(&STYLE).find_map(|style| {
            let css = style.text().collect::<String>();
            RE_BODY_RULE_FONT_SIZE
                .captures(&css)
                .map(|captures| captures[1].trim().to_string())
        })
    })
}

fn select_exists(document: &Html, selector_str: &str) -> bool {
    if let Ok(selector) = Selector::parse(selector_str) {
        document.select(&selector).next().is_some()
    } else {
        tracing::warn!(selector = selector_str, "unparsable selector");
        false
    }
}

fn count_elements(document: &Html, selector_str: &str) -> usize {
    if let Ok(selector) = Selector::parse(selector_str) {
        document.select(&selector).count()
    } else {
        tracing::warn!(selector = selector_str, "unparsable selector");
        0
    }
}
