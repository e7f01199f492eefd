//! Queries over rendered pages, in the spirit of DOM testing helpers.

use scraper::{Html, Selector};

fn select<'a>(doc: &'a Html, selector: &str) -> Vec<scraper::ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("valid selector");
    doc.select(&selector).collect()
}

/// Trimmed text content of every element matching `selector`
pub fn texts(html: &str, selector: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    select(&doc, selector)
        .into_iter()
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .collect()
}

/// Value of `attr` on every matching element that carries it
pub fn attrs(html: &str, selector: &str, attr: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    select(&doc, selector)
        .into_iter()
        .filter_map(|el| el.value().attr(attr).map(str::to_owned))
        .collect()
}

/// Whether the first element matching `selector` has `class`
pub fn has_class(html: &str, selector: &str, class: &str) -> bool {
    let doc = Html::parse_document(html);
    select(&doc, selector)
        .first()
        .is_some_and(|el| el.value().classes().any(|c| c == class))
}
