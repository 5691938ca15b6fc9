//! Server-rendered review page. Plain semantic HTML; styling hooks are class
//! names only.

use std::fmt::Write as _;

use uuid::Uuid;

use crate::disclosure::{DisclosureCoordinator, DisclosureError};
use crate::feedback::presentation::{CategoryView, FeedbackView, TipsView};
use crate::views::home::ResumeSummary;
use crate::views::session::ViewSession;

const SCANNING_PLACEHOLDER: &str = "/images/resume-scan-2.gif";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="Detailed overview of your resume">
</head>
<body>
<main>
    <nav class="resume-nav"><a href="/" class="back-button">Back to Homepage</a></nav>
{body}
</main>
</body>
</html>
"#,
        title = escape(title)
    )
}

/// Page shown while authentication is still being determined.
pub fn render_pending(resume_id: &str) -> String {
    let body = format!(
        r#"    <section class="feedback-section">
        <h2>Resume Review</h2>
        <img src="{SCANNING_PLACEHOLDER}" alt="Loading review for {}" class="scanning">
    </section>
"#,
        escape(resume_id)
    );
    page("Resume Review", &body)
}

pub fn render_view(session: &ViewSession) -> Result<String, DisclosureError> {
    let mut body = String::new();

    body.push_str("    <section class=\"preview-section\">\n");
    if let Some((resume, image)) = session.preview() {
        let _ = writeln!(
            body,
            r#"        <a href="{}" target="_blank" rel="noopener noreferrer"><img src="{}" title="resume" alt="Resume preview"></a>"#,
            resume.href(),
            image.href()
        );
    }
    body.push_str("    </section>\n");

    body.push_str("    <section class=\"feedback-section\">\n        <h2>Resume Review</h2>\n");
    if let Some(heading) = &session.heading {
        let _ = writeln!(body, "        <p class=\"resume-heading\">{}</p>", escape(heading));
    }
    match &session.feedback {
        Some(feedback) => {
            let view = FeedbackView::new(feedback);
            render_summary(&mut body, &view);
            render_ats(&mut body, &view.ats);
            render_details(&mut body, session.id, &session.disclosure, &view.details)?;
        }
        None => {
            let _ = writeln!(
                body,
                r#"        <img src="{SCANNING_PLACEHOLDER}" alt="Analyzing resume" class="scanning">"#
            );
        }
    }
    body.push_str("    </section>\n");

    Ok(page("Resumind | Review", &body))
}

fn render_summary(out: &mut String, view: &FeedbackView) {
    let _ = writeln!(
        out,
        r#"        <div class="summary"><h3>Your Resume Score</h3><p class="score tone-{}">{}/100</p><ul>"#,
        view.overall_tier.tone(),
        view.overall_score
    );
    for category in std::iter::once(&view.ats).chain(view.details.iter()) {
        let _ = writeln!(
            out,
            r#"            <li>{} <span class="tone-{}">{}/100</span></li>"#,
            escape(category.title),
            category.tier.tone(),
            category.score
        );
    }
    out.push_str("        </ul></div>\n");
}

fn render_ats(out: &mut String, ats: &CategoryView) {
    let _ = writeln!(
        out,
        r#"        <div class="ats tone-{}"><h3>ATS Score - {}/100</h3>"#,
        ats.tier.tone(),
        ats.score
    );
    render_tips(out, &ats.tips);
    out.push_str("        </div>\n");
}

fn render_details(
    out: &mut String,
    view_id: Uuid,
    coordinator: &DisclosureCoordinator,
    details: &[CategoryView],
) -> Result<(), DisclosureError> {
    out.push_str("        <div class=\"accordion\">\n");
    for category in details {
        let header = coordinator.header(category.item_id)?;
        let body = coordinator.body(category.item_id)?;

        let _ = writeln!(
            out,
            r#"            <div class="accordion-item" id="{id}">
            <form method="post" action="/views/{view_id}/panels/{id}/toggle">
                <button type="submit" aria-expanded="{expanded}">
                    <h3>{title}</h3> <span class="badge tone-{tone}">{badge}</span> <span class="tone-{tone}">{score}</span>/100
                </button>
            </form>"#,
            id = header.item_id(),
            expanded = header.expanded(),
            title = escape(category.title),
            tone = category.tier.tone(),
            badge = category.badge,
            score = category.score,
        );
        if let Some(tips) = body.render_with(|| {
            let mut s = String::new();
            render_tips(&mut s, &category.tips);
            s
        }) {
            out.push_str(&tips);
        }
        out.push_str("            </div>\n");
    }
    out.push_str("        </div>\n");
    Ok(())
}

fn render_tips(out: &mut String, tips: &TipsView) {
    match tips {
        TipsView::Placeholder(text) => {
            let _ = writeln!(out, r#"            <p class="no-feedback">{}</p>"#, escape(text));
        }
        TipsView::Tips(items) => {
            out.push_str("            <ul class=\"tips\">\n");
            for tip in items {
                let explanation = tip
                    .explanation
                    .as_deref()
                    .map(|e| format!("<p class=\"explanation\">{}</p>", escape(e)))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    r#"                <li class="tip tip-{kind}"><img src="{icon}" alt="tip icon"><p>{text}</p>{explanation}</li>"#,
                    kind = tip.kind.as_str(),
                    icon = tip.icon,
                    text = escape(&tip.text),
                );
            }
            out.push_str("            </ul>\n");
        }
    }
}

/// Landing page listing every stored resume.
pub fn render_home(resumes: &[ResumeSummary]) -> String {
    let mut body = String::from(
        r#"    <section class="main-section">
        <h1>Track Your Application &amp; Resume Ratings</h1>
"#,
    );
    if resumes.is_empty() {
        body.push_str("        <h2>No resumes found. Upload your first resume to get feedback.</h2>\n");
    } else {
        body.push_str("        <h2>Review your submissions and check AI-powered feedback.</h2>\n");
        body.push_str("        <div class=\"resumes-section\">\n");
        for resume in resumes {
            let heading = resume.company_name.as_deref().unwrap_or("Resume");
            let _ = writeln!(
                body,
                r#"            <a href="/resume/{href}" class="resume-card">
                <h2>{heading}</h2>"#,
                href = escape(&urlencoding::encode(&resume.id)),
                heading = escape(heading),
            );
            if let Some(title) = &resume.job_title {
                let _ = writeln!(body, "                <h3>{}</h3>", escape(title));
            }
            let _ = writeln!(
                body,
                r#"                <span class="score-badge {tone}">{score}/100 {label}</span>
            </a>"#,
                tone = resume.tier.tone(),
                score = resume.overall_score,
                label = resume.tier.label(),
            );
        }
        body.push_str("        </div>\n");
    }
    body.push_str("    </section>\n");
    page("Resumind", &body)
}
