//! Best-effort field parsing of raw citation strings.

use regex::Regex;

use crate::model::Reference;

struct Patterns {
    leading_marker: Regex,
    year: Regex,
    doi: Regex,
    url: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            leading_marker: Regex::new(r"^(?:\[\d+\]|\d+\.)\s+").unwrap(),
            year: Regex::new(r"\b(19|20)\d{2}\b").unwrap(),
            doi: Regex::new(r"\b10\.\d{4,}/\S+").unwrap(),
            url: Regex::new(r"https?://\S+").unwrap(),
        }
    }
}

/// Parse a raw citation line into a [`Reference`]. Every field is optional;
/// an unrecognizable citation still yields a record carrying the raw text.
pub fn parse_reference(raw: &str, order: usize) -> Reference {
    let patterns = Patterns::new();
    let mut reference = Reference::raw(raw, order);

    // Body without the "[N]" or "N." list marker.
    let body = patterns.leading_marker.replace(raw.trim(), "").to_string();

    if let Some(m) = patterns.year.find(&body) {
        reference.year = m.as_str().parse().ok();
    }
    if let Some(m) = patterns.doi.find(&body) {
        reference.doi = Some(m.as_str().trim_end_matches(['.', ',']).to_string());
    }
    if let Some(m) = patterns.url.find(&body) {
        reference.url = Some(m.as_str().trim_end_matches(['.', ',']).to_string());
    }

    // "Authors. Title. Venue, year." shaped citations: the first
    // period-terminated segment is the author list, the second the title.
    let segments: Vec<&str> = body
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.len() >= 2 {
        let author_segment = segments[0];
        if author_segment.chars().any(|c| c.is_alphabetic()) && author_segment.len() < 120 {
            reference.authors = Some(
                author_segment
                    .split(|c| c == ',' || c == ';')
                    .map(|a| a.trim().trim_start_matches("and ").trim())
                    .filter(|a| !a.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }
        let title = segments[1].trim_end_matches('.');
        if !title.is_empty() && !title.starts_with("http") {
            reference.title = Some(title.to_string());
        }
        if segments.len() >= 3 {
            let venue = segments[2].trim_end_matches('.');
            // A venue segment that is only a year or a URL carries no name.
            if !venue.is_empty()
                && !venue.starts_with("http")
                && venue.parse::<u16>().is_err()
            {
                reference.venue = Some(venue.to_string());
            }
        }
    }

    reference
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_citation() {
        let r = parse_reference(
            "[3] Smith, J., Doe, A. Attention Is All You Need. NeurIPS, 2017.",
            2,
        );
        assert_eq!(r.order, 2);
        assert_eq!(r.raw_citation, "[3] Smith, J., Doe, A. Attention Is All You Need. NeurIPS, 2017.");
        assert_eq!(r.year, Some(2017));
        assert_eq!(r.title.as_deref(), Some("Attention Is All You Need"));
        let authors = r.authors.unwrap();
        assert_eq!(authors[0], "Smith");
        assert!(authors.len() >= 2);
    }

    #[test]
    fn test_doi_and_url() {
        let r = parse_reference(
            "1. Jones. A Study. Journal of Tests, 2020. doi 10.1234/abcd.5, https://example.org/paper.",
            0,
        );
        assert_eq!(r.doi.as_deref(), Some("10.1234/abcd.5"));
        assert_eq!(r.url.as_deref(), Some("https://example.org/paper"));
        assert_eq!(r.year, Some(2020));
    }

    #[test]
    fn test_unstructured_citation_keeps_raw() {
        let r = parse_reference("some unparseable reference text", 5);
        assert_eq!(r.raw_citation, "some unparseable reference text");
        assert!(r.title.is_none());
        assert!(r.year.is_none());
        assert!(r.doi.is_none());
    }
}
