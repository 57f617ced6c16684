//! Markdown rendering of an [`AuditResult`]

use std::fmt::Write;

use crate::aggregate::WEIGHTS;
use crate::audit::AuditResult;
use crate::scoring::{Category, CategoryResult};

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 22;

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Technical => "⚙️",
        Category::OnPage => "🏷️",
        Category::Content => "📝",
        Category::Links => "🔗",
        Category::Schema => "🧩",
        Category::Security => "🔒",
        Category::UserExperience => "🧭",
        Category::Performance => "⚡",
    }
}

fn render_score_table(buf: &mut String, results: &[&dyn CategoryResult]) {
    buf.push_str("| Category | Score | Weight |\n");
    buf.push_str("|---|---:|---:|\n");
    for result in results {
        let weight = WEIGHTS
            .weight_for(result.category())
            .map(|weight| format!("{:.0}%", weight * 100.0))
            .unwrap_or_else(|| "reported only".to_string());
        let _ = writeln!(
            buf,
            "| {} | {:.0} / {:.0} | {} |",
            result.category().label(),
            result.score(),
            result.max_score(),
            weight
        );
    }
    buf.push('\n');
}

fn render_category(buf: &mut String, result: &dyn CategoryResult) {
    let category = result.category();
    push_section_header(
        buf,
        category_icon(category),
        &format!(
            "{} ({:.0}/{:.0})",
            category.label(),
            result.score(),
            result.max_score()
        ),
    );
    for (label, value) in result.facts() {
        push_key_value(buf, label, &value);
    }

    if !result.issues().is_empty() {
        buf.push_str("\nIssues:\n");
        for issue in result.issues() {
            let _ = writeln!(buf, "- {issue}");
        }
    }
    buf.push('\n');
}

/// Human- and LLM-readable report: summary, score table, one section per
/// category, then the recommendations in priority order.
pub fn render_markdown(audit: &AuditResult) -> String {
    let mut output = String::new();

    push_section_header(&mut output, "🔎", &format!("SEO Audit: {}", audit.url));
    push_key_value(&mut output, "Audited", &audit.timestamp.to_rfc3339());
    push_key_value(
        &mut output,
        "Overall score",
        &format!("{:.2} / 100", audit.overall_score),
    );
    push_key_value(&mut output, "Grade", audit.grade.as_str());
    output.push('\n');

    let results = audit.categories.all();
    render_score_table(&mut output, &results);

    for result in &results {
        render_category(&mut output, *result);
    }

    push_section_header(&mut output, "✅", "Recommendations");
    if audit.recommendations.is_empty() {
        output.push_str("No issues found.\n");
    } else {
        for (index, recommendation) in audit.recommendations.iter().enumerate() {
            let _ = writeln!(output, "{}. {recommendation}", index + 1);
        }
    }

    output
}
