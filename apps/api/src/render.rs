//! HTML pages for the browser form: the upload form and the results view.

use std::fmt::Write;

use crate::analysis::AnalysisReport;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>FitCheck — Resume vs Job Description</title>
<style>
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
textarea { width: 100%; min-height: 12rem; }
.error { background: #fdecea; border: 1px solid #f5c2c0; padding: .75rem; }
.matched li { color: #2e8b57; }
.missing li { color: #cd5c5c; }
img { max-width: 100%; border: 1px solid #ddd; }
</style>
</head>
<body>
<h1>FitCheck</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

const UPLOAD_FORM: &str = r#"<form method="post" action="/" enctype="multipart/form-data">
<p><label>Resume (.pdf or .txt): <input type="file" name="file" required></label></p>
<p><label>Job description:<br><textarea name="job_description" required></textarea></label></p>
<p><button type="submit">Analyze</button></p>
</form>
"#;

/// The upload form, optionally preceded by an error message.
pub fn upload_page(error: Option<&str>) -> String {
    let mut html = String::from(PAGE_HEAD);
    if let Some(error) = error {
        let _ = writeln!(html, r#"<p class="error">{}</p>"#, escape(error));
    }
    html.push_str(UPLOAD_FORM);
    html.push_str(PAGE_TAIL);
    html
}

/// The results view for one analysis, followed by a fresh form.
pub fn results_page(report: &AnalysisReport) -> String {
    let result = &report.result;
    let mut html = String::from(PAGE_HEAD);

    html.push_str("<h2>Results</h2>\n");
    if let Some(name) = &report.resume_filename {
        let _ = writeln!(html, "<p>Resume: <strong>{}</strong></p>", escape(name));
    }
    let _ = writeln!(
        html,
        "<p>Similarity score: <strong>{:.1}%</strong></p>",
        result.similarity_score * 100.0
    );
    let _ = writeln!(
        html,
        "<p>Keyword match: <strong>{:.1}%</strong> ({} of {})</p>",
        result.match_percentage,
        result.matched_keywords.len(),
        result.total_keywords
    );

    push_list(&mut html, "Matched keywords", "matched", &result.matched_keywords);
    push_list(
        &mut html,
        "Missing keywords",
        "missing",
        &report.improvement.missing_keywords,
    );

    let _ = writeln!(html, "<h3>Suggestion</h3>\n<p>{}</p>", escape(&report.improvement.suggestion));
    push_list(&mut html, "AI interview tips", "tips", &report.ai_tips.tips);

    let _ = writeln!(
        html,
        r#"<h3>Chart</h3>
<img src="{}?v={}" alt="Similarity and keyword match chart">"#,
        escape(&report.chart.url),
        report.analysis_id
    );

    html.push_str("<h2>Analyze another</h2>\n");
    html.push_str(UPLOAD_FORM);
    html.push_str(PAGE_TAIL);
    html
}

fn push_list(html: &mut String, title: &str, class: &str, items: &[String]) {
    let _ = writeln!(html, "<h3>{title}</h3>");
    if items.is_empty() {
        html.push_str("<p>None</p>\n");
        return;
    }
    let _ = writeln!(html, r#"<ul class="{class}">"#);
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", escape(item));
    }
    html.push_str("</ul>\n");
}

/// Escapes text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
