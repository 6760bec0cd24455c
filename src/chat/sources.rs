//! Citation rendering for retrieved passages

use std::collections::BTreeSet;

use crate::models::Passage;

/// Render a single passage's source metadata as a human-readable citation.
///
/// Strips a trailing `.pdf`, turns `_` and `-` into spaces, and appends the
/// page when known. Returns `None` for passages without source metadata.
pub fn render_citation(passage: &Passage) -> Option<String> {
    let raw = passage.source_document.trim();
    if raw.is_empty() {
        return None;
    }

    let name = raw.strip_suffix(".pdf").unwrap_or(raw);
    let cleaned = name.replace(['_', '-'], " ").trim().to_string();

    let citation = match passage.page_number {
        Some(page) => format!("{cleaned}, Page {page}"),
        None => cleaned,
    };

    Some(citation)
}

/// Format a set of passages into one deduplicated citation line.
///
/// Citations are deduplicated by their fully-rendered string and joined with
/// `"; "`. Ordering follows the rendered strings, not the passage order;
/// callers must not depend on citation order. Returns `None` when no passage
/// carried source metadata.
pub fn format_sources(passages: &[Passage]) -> Option<String> {
    let citations: BTreeSet<String> = passages.iter().filter_map(render_citation).collect();

    if citations.is_empty() {
        None
    } else {
        Some(citations.into_iter().collect::<Vec<_>>().join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pdf_name_with_page() {
        let p = Passage::new("...", "organic_pest-control.pdf").with_page(42);
        assert_eq!(
            render_citation(&p).as_deref(),
            Some("organic pest control, Page 42")
        );
    }

    #[test]
    fn test_render_non_pdf_name_without_page() {
        let p = Passage::new("...", "soil-handbook");
        assert_eq!(render_citation(&p).as_deref(), Some("soil handbook"));
    }

    #[test]
    fn test_render_empty_source_is_none() {
        let p = Passage::new("...", "  ");
        assert_eq!(render_citation(&p), None);
    }

    #[test]
    fn test_format_sources_deduplicates_rendered_strings() {
        // Different raw names, identical once rendered
        let a = Passage::new("a", "bean_guide.pdf").with_page(3);
        let b = Passage::new("b", "bean-guide.pdf").with_page(3);
        let formatted = format_sources(&[a, b]).unwrap();
        assert_eq!(formatted, "bean guide, Page 3");
    }

    #[test]
    fn test_format_sources_joins_with_semicolon() {
        let a = Passage::new("a", "bean_guide.pdf");
        let b = Passage::new("b", "rice_manual.pdf").with_page(7);
        let formatted = format_sources(&[a, b]).unwrap();
        assert_eq!(formatted, "bean guide; rice manual, Page 7");
    }

    #[test]
    fn test_format_sources_without_metadata_is_none() {
        let a = Passage::new("a", "");
        let b = Passage::new("b", "");
        assert_eq!(format_sources(&[a, b]), None);
    }
}
