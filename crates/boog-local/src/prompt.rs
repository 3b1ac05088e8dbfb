use boog_core::SearchResult;
use std::fmt::Write as _;

pub const GROUNDED_SYSTEM_PROMPT: &str = "You are Boog, a sassy but helpful research cat. \
Answer concisely and accurately using only the numbered web sources you are given.";

/// Separates the model's answer from the source list.
pub const SOURCES_DIVIDER: &str = "\n\n---\nSources:\n";

fn display_title(r: &SearchResult) -> &str {
    if r.title.trim().is_empty() {
        &r.url
    } else {
        r.title.trim()
    }
}

/// Render the user prompt for a grounded answer.
///
/// Callers must not pass an empty `results`.
pub fn build(query: &str, results: &[SearchResult]) -> String {
    let mut out = String::new();
    out.push_str(
        "Answer the question using ONLY the numbered sources below.\n\
         Cite every fact inline with the bracketed number of its source, e.g. [1].\n\
         If a claim is not supported by the sources, say explicitly that it is unsupported.\n\n\
         Sources:\n",
    );
    for (i, r) in results.iter().enumerate() {
        let _ = write!(
            out,
            "[{}] {}\nURL: {}\n{}\n\n",
            i + 1,
            display_title(r),
            r.url,
            r.snippet.trim()
        );
    }
    let _ = write!(out, "Question: {}", query.trim());
    out
}

/// Human-readable numbered source list appended after a grounded answer.
pub fn sources_footer(results: &[SearchResult]) -> String {
    let mut out = String::from(SOURCES_DIVIDER);
    for (i, r) in results.iter().enumerate() {
        let _ = writeln!(out, "{}. {} — {}", i + 1, display_title(r), r.url);
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(title: &str, url: &str, snippet: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn numbered_markers_precede_their_urls() {
        let rs = vec![
            r("A", "https://a.example", "alpha"),
            r("B", "https://b.example", "beta"),
        ];
        let p = build("what?", &rs);
        let m1 = p.find("[1]").unwrap();
        let m2 = p.find("[2]").unwrap();
        let u1 = p.find("https://a.example").unwrap();
        let u2 = p.find("https://b.example").unwrap();
        assert!(m1 < u1 && u1 < m2 && m2 < u2);
        assert!(p.contains("[1] A\nURL: https://a.example\nalpha"));
        assert!(p.ends_with("Question: what?"));
    }

    #[test]
    fn preface_demands_citations_and_flags() {
        let p = build("q", &[r("A", "u", "s")]);
        assert!(p.contains("ONLY the numbered sources"));
        assert!(p.contains("bracketed number"));
        assert!(p.contains("unsupported"));
    }

    #[test]
    fn missing_title_falls_back_to_url() {
        let p = build("q", &[r("  ", "https://only.url", "s")]);
        assert!(p.contains("[1] https://only.url\nURL: https://only.url"));
        let f = sources_footer(&[r("", "https://only.url", "s")]);
        assert!(f.ends_with("1. https://only.url — https://only.url"));
    }

    #[test]
    fn footer_lists_title_and_url() {
        let f = sources_footer(&[r("T", "U", "S"), r("T2", "U2", "S2")]);
        assert_eq!(f, "\n\n---\nSources:\n1. T — U\n2. T2 — U2");
    }
}
