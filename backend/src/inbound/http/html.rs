//! HTML rendering for console pages.
//!
//! Pages are small enough that string assembly is sufficient. Every piece of
//! text passes through [`escape`] before it reaches the document.

use crate::domain::{Breadcrumb, DetailBody, DetailPanel, UserDetailPage};

/// Escape text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Shared chrome: document title, breadcrumb trail, then `body`.
fn layout(title: &str, breadcrumbs: &[Breadcrumb], body: &str) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape(title)
    );
    if !breadcrumbs.is_empty() {
        html.push_str("<nav aria-label=\"breadcrumb\">\n<ol class=\"breadcrumb\">\n");
        for crumb in breadcrumbs {
            let item = match (crumb.link, crumb.is_current) {
                (Some(link), false) => format!(
                    "<li class=\"breadcrumb-item\"><a href=\"{}\">{}</a></li>\n",
                    escape(link),
                    escape(crumb.label)
                ),
                _ => format!(
                    "<li class=\"breadcrumb-item\" aria-current=\"page\">{}</li>\n",
                    escape(crumb.label)
                ),
            };
            html.push_str(&item);
        }
        html.push_str("</ol>\n</nav>\n");
    }
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn panel(panel: &DetailPanel) -> String {
    let mut html = format!(
        "<section class=\"panel\">\n<h2>{}</h2>\n<ul class=\"fields\">\n",
        escape(panel.title)
    );
    for field in &panel.fields {
        html.push_str(&format!(
            "<li><strong>{}</strong> <span>{}</span></li>\n",
            escape(field.label),
            escape(&field.text)
        ));
    }
    html.push_str("</ul>\n</section>\n");
    html
}

/// Render the user detail page.
pub fn render_user_detail_page(page: &UserDetailPage) -> String {
    let mut body = page
        .error
        .as_deref()
        .map(|error| {
            format!(
                "<div class=\"alert alert-error\" role=\"alert\">{}</div>\n",
                escape(error)
            )
        })
        .unwrap_or_default();
    match &page.body {
        DetailBody::Loading => body.push_str(
            "<div class=\"loading\" role=\"progressbar\" aria-busy=\"true\" style=\"display:flex;justify-content:center\"><span class=\"spinner\"></span></div>\n",
        ),
        DetailBody::Empty => {}
        DetailBody::Panel(detail) => body.push_str(&panel(detail)),
    }
    layout(page.title, &page.breadcrumbs, &body)
}

/// Render the page shown when a guard denies access.
pub fn render_denied_page(reason: &str) -> String {
    let body = format!(
        "<div class=\"alert alert-error\" role=\"alert\">Access denied: {}</div>\n",
        escape(reason)
    );
    layout("Access denied", &[], &body)
}
