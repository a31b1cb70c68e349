//! Assembly of the final HTML document from paginated content.
//!
//! The content pages arrive already laid out; this module only wraps them in
//! page chrome (footer with logo and number) and adds the cover and back
//! surfaces around them.
use docstage_markup::escape_html;
use docstage_paginate::Page;
use docstage_style::vocabulary::{DOCUMENT_LANG, LOGO_ALT, LOGO_PATH};
use std::fmt::Write;

/// What the cover surface shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Cover<'a> {
    pub title: &'a str,
    pub caption: &'a str,
    pub description: Option<&'a str>,
    pub date: Option<&'a str>,
}

fn logo() -> String {
    format!(r#"<img src="{}" alt="{}">"#, escape_html(LOGO_PATH), escape_html(LOGO_ALT))
}

fn decorations(out: &mut String) {
    out.push_str(r#"<div class="cover-decorations"><div class="deco-1"></div><div class="deco-2"></div><div class="deco-3"></div></div>"#);
}

fn cover_heading(out: &mut String, caption: &str, title: &str) {
    let _ = write!(
        out,
        r#"<p class="cover-caption">{}</p><div class="cover-line"></div><h1 class="cover-title">{}</h1>"#,
        escape_html(&caption.to_uppercase()),
        escape_html(title)
    );
}

pub fn cover_page(cover: &Cover<'_>) -> String {
    let mut out = String::from(r#"<div class="cover-page">"#);
    decorations(&mut out);
    out.push_str(r#"<div class="cover-content">"#);
    cover_heading(&mut out, cover.caption, cover.title);
    if let Some(description) = cover.description.filter(|d| !d.trim().is_empty()) {
        let _ = write!(out, r#"<p class="cover-description">{}</p>"#, escape_html(description));
    }
    out.push_str("</div>");

    let _ = write!(out, r#"<div class="cover-footer"><div class="cover-logo">{}</div>"#, logo());
    if let Some(date) = cover.date.filter(|d| !d.trim().is_empty()) {
        let _ = write!(out, r#"<span class="cover-date">{}</span>"#, escape_html(date));
    }
    out.push_str("</div></div>\n");
    out
}

/// The back surface repeats the cover without description or date.
pub fn back_page(title: &str, caption: &str) -> String {
    let mut out = String::from(r#"<div class="back-page">"#);
    decorations(&mut out);
    out.push_str(r#"<div class="cover-content">"#);
    cover_heading(&mut out, caption, title);
    let _ = write!(out, r#"</div><div class="cover-logo">{}</div></div>"#, logo());
    out.push('\n');
    out
}

pub fn content_page(page: &Page) -> String {
    let mut out = String::from(r#"<div class="page"><div class="page-content">"#);
    for fragment in &page.fragments {
        out.push_str(&fragment.to_markup());
        out.push('\n');
    }
    let _ = write!(
        out,
        r#"</div><div class="page-footer">{}<span class="page-number">{}</span></div></div>"#,
        logo(),
        page.number
    );
    out.push('\n');
    out
}

/// Builds the complete document. `back` is inserted verbatim after the last content page.
pub fn assemble(title: &str, stylesheet: &str, cover: &Cover<'_>, pages: &[Page], back: Option<&str>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"{DOCUMENT_LANG}\">\n<head>\n<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>{}</title>\n<style>\n{stylesheet}</style>\n</head>\n<body>\n",
        escape_html(title)
    );
    out.push_str(&cover_page(cover));
    for page in pages {
        out.push_str(&content_page(page));
    }
    if let Some(back) = back {
        out.push_str(back);
    }
    out.push_str("</body>\n</html>\n");
    out
}
