// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use regex::Regex;

use crate::extractors::keywords::{self as kw, Term};
use crate::extractors::PageClassification;
use crate::utils::error::AppError;

/// Keyword terms highlighted in debug output, with the label used as CSS suffix.
pub const DEBUG_TERMS: &[(Term, &str)] = &[
    (kw::PEDAGOGICAL_PROJECT, "curriculum"),
    (kw::CURRICULUM_MATRIX, "curriculum"),
    (kw::FACULTY_BODY, "curriculum"),
    (kw::WORK_REGIME, "curriculum"),
    (kw::SYLLABUS_LABEL, "curriculum"),
    (kw::BASIC_BIBLIOGRAPHY, "curriculum"),
    (kw::ELECTIVE_DISCIPLINES, "curriculum"),
    (kw::COMPUTER_SCIENCE, "schedule"),
    (kw::MONDAY, "schedule"),
    (kw::TUESDAY, "schedule"),
    (kw::WEDNESDAY, "schedule"),
    (kw::ACADEMIC_CALENDAR, "calendar"),
    (kw::STATUTE_HISTORY, "history"),
    (kw::COUNCIL_RESOLUTION, "history"),
];

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Saves page text to a file with debug highlights. Overlapping highlights
/// after the first are ignored.
pub fn save_debug_html(
    text: &str,
    filename: &Path,
    page: u32,
    class: PageClassification,
    highlights: &[(usize, usize, &str)],
) -> Result<(), AppError> {
    let mut file = File::create(filename)?;

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
    debug_html.push_str("pre { white-space: pre-wrap; }\n");
    debug_html.push_str(".highlight-curriculum { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-schedule { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-calendar { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-history { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");
    debug_html.push_str(&format!(
        "<h1 class=\"page-{}\">Page {} classified as {}</h1>\n<pre>",
        class.as_str(),
        page,
        class.as_str()
    ));

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos {
            continue;
        }
        debug_html.push_str(&escape(&text[last_pos..start]));

        let css_class = match highlight_type {
            "curriculum" => "highlight-curriculum",
            "schedule" => "highlight-schedule",
            "calendar" => "highlight-calendar",
            "history" => "highlight-history",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type
        ));
        debug_html.push_str(&escape(&text[start..end]));
        debug_html.push_str("</span>");

        last_pos = end;
    }

    if last_pos < text.len() {
        debug_html.push_str(&escape(&text[last_pos..]));
    }

    debug_html.push_str("</pre>\n</body>\n</html>");
    file.write_all(debug_html.as_bytes())?;

    tracing::debug!("Saved debug HTML to {}", filename.display());
    Ok(())
}

/// Writes an annotated copy of a page's text with every classifier keyword
/// highlighted, matched case-insensitively.
pub fn create_debug_html(
    text: &str,
    filename: &Path,
    page: u32,
    class: PageClassification,
    terms: &[(Term, &str)],
) -> Result<(), AppError> {
    let mut highlights = Vec::new();

    for (term, highlight_type) in terms {
        for spelling in term.iter() {
            let pattern = format!("(?i){}", regex::escape(spelling));
            let re = Regex::new(&pattern).map_err(|e| {
                AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
            })?;
            for mat in re.find_iter(text) {
                highlights.push((mat.start(), mat.end(), *highlight_type));
            }
        }
    }

    save_debug_html(text, filename, page, class, &highlights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_keywords_are_wrapped_and_text_escaped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page_3.html");

        create_debug_html(
            "Calendário Acadêmico <2024> & Segunda",
            &path,
            3,
            PageClassification::Calendar,
            DEBUG_TERMS,
        )
        .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Page 3 classified as calendar"));
        assert!(html.contains("<span class=\"highlight-calendar\""));
        assert!(html.contains(">Calendário Acadêmico</span>"));
        assert!(html.contains("&lt;2024&gt; &amp; "));
        assert!(html.contains("<span class=\"highlight-schedule\""));
    }

    #[test]
    fn test_overlapping_highlights_keep_the_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.html");

        save_debug_html(
            "abcdef",
            &path,
            1,
            PageClassification::Unknown,
            &[(0, 4, "custom"), (2, 6, "custom")],
        )
        .unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert_eq!(html.matches("<span").count(), 1);
        assert!(html.contains(">abcd</span>ef</pre>"));
    }
}
