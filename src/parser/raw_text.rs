//! Last-resort raw text extraction from PDF bytes.
//!
//! Used when no structural backend can open the document. Tries an external
//! `pdftotext` binary first, then falls through a chain of byte-level
//! heuristics of decreasing fidelity. Always returns a string; a fully
//! unparseable input yields a "Failed to extract text" message, never an
//! error.

use std::path::Path;
use std::process::Command;

use regex::Regex;

/// Extract best-effort plain text from a PDF file.
pub fn extract_text_from_pdf<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    if let Some(text) = try_pdftotext(path) {
        log::info!("extracted text with pdftotext");
        return text;
    }

    match std::fs::read(path) {
        Ok(data) => extract_text_from_bytes(&data),
        Err(e) => format!("Failed to extract text: {}", e),
    }
}

/// Extract best-effort plain text from in-memory PDF bytes.
pub fn extract_text_from_bytes(data: &[u8]) -> String {
    // Latin-1 view of the bytes: every byte maps to a char, so the regex
    // passes below never hit invalid UTF-8.
    let pdf_str: String = data.iter().map(|&b| b as char).collect();

    let mut text = extract_from_streams(&pdf_str);

    if text.trim().is_empty() {
        log::info!("stream extraction yielded no results, trying text-show fragments");
        text = extract_tj_fragments(&pdf_str);
    }

    if text.trim().is_empty() {
        text = extract_parenthesized(&pdf_str);
    }

    if text.trim().is_empty() {
        log::info!("falling back to basic word search");
        text = extract_alpha_runs(&pdf_str);
    }

    if text.trim().is_empty() {
        return "Failed to extract text: no recognizable content".to_string();
    }

    // Residual text-show operators survive the fragment passes.
    strip_tj_markers(&text)
}

/// Run `pdftotext` if it is installed; None when unavailable or failing.
fn try_pdftotext(path: &Path) -> Option<String> {
    let tmp = tempfile::NamedTempFile::new().ok()?;
    let status = Command::new("pdftotext")
        .arg(path)
        .arg(tmp.path())
        .status()
        .ok()?;
    if !status.success() {
        return None;
    }
    let text = std::fs::read_to_string(tmp.path()).ok()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Keep lines between stream/endstream markers whose alphanumeric density
/// exceeds 30% and whose trimmed length is at least 3.
fn extract_from_streams(pdf_str: &str) -> String {
    let stream_re = Regex::new(r"(?s)stream\s+(.*?)\s+endstream").unwrap();
    let mut kept = Vec::new();

    for cap in stream_re.captures_iter(pdf_str) {
        let cleaned: String = cap[1]
            .chars()
            .map(|c| {
                if c.is_control() && c != '\n' && c != '\r' && c != '\t' {
                    ' '
                } else {
                    c
                }
            })
            .collect();

        for line in cleaned.lines() {
            let trimmed = line.trim();
            let alpha_count = line.chars().filter(|c| c.is_alphanumeric()).count();
            if trimmed.len() >= 3 && alpha_count as f32 / line.len().max(1) as f32 > 0.3 {
                kept.push(trimmed.to_string());
            }
        }
    }

    kept.join("\n")
}

/// Parenthesized fragments immediately followed by the Tj text-show operator,
/// grouped into pseudo-paragraphs that break after sentence-final fragments.
fn extract_tj_fragments(pdf_str: &str) -> String {
    let tj_re = Regex::new(r"(?s)\((.*?)\)[\s\r\n]*Tj").unwrap();
    let date_re = Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").unwrap();
    let time_re = Regex::new(r"^\d{1,2}:\d{1,2}(:\d{1,2})?$").unwrap();

    let mut fragments = Vec::new();
    for cap in tj_re.captures_iter(pdf_str) {
        let frag = &cap[1];
        if frag.len() < 2 {
            continue;
        }
        if frag.chars().filter(|c| c.is_alphanumeric()).count() < 2 {
            continue;
        }
        if date_re.is_match(frag) || time_re.is_match(frag) {
            continue;
        }
        fragments.push(frag.to_string());
    }

    if fragments.is_empty() {
        return String::new();
    }

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for frag in fragments {
        let ends_sentence = frag.ends_with('.');
        current.push(frag);
        if ends_sentence {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

/// All parenthesized fragments, with heading/paragraph classification. Short
/// Title-Case fragments that do not end a sentence become `## ` headings.
fn extract_parenthesized(pdf_str: &str) -> String {
    let paren_re = Regex::new(r"(?s)\((.*?)\)").unwrap();

    let mut matches = Vec::new();
    for cap in paren_re.captures_iter(pdf_str) {
        let frag = &cap[1];
        if frag.len() < 5 || !frag.contains(' ') {
            continue;
        }
        let alnum = frag.chars().filter(|c| c.is_alphanumeric()).count();
        if (alnum as f32) / (frag.len() as f32) < 0.5 {
            continue;
        }
        matches.push(frag.to_string());
    }

    let mut out: Vec<String> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    for frag in matches {
        let trimmed = frag.trim();
        if trimmed.len() < 50 && is_title_case(trimmed) && !trimmed.ends_with('.') {
            if !paragraphs.is_empty() {
                out.push(paragraphs.join("\n\n"));
                paragraphs.clear();
            }
            out.push(format!("\n## {}\n", trimmed));
        } else {
            paragraphs.push(frag);
        }
    }
    if !paragraphs.is_empty() {
        out.push(paragraphs.join("\n\n"));
    }

    out.join("\n")
}

/// Every alphabetic run of length >= 3, digits dropped first.
fn extract_alpha_runs(pdf_str: &str) -> String {
    let no_digits: String = pdf_str
        .chars()
        .map(|c| if c.is_ascii_digit() { ' ' } else { c })
        .collect();
    let word_re = Regex::new(r"[A-Za-z]{3,}").unwrap();
    word_re
        .find_iter(&no_digits)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_tj_markers(text: &str) -> String {
    let tj_re = Regex::new(r"\s+Tj").unwrap();
    tj_re.replace_all(text, "").to_string()
}

/// Every word starts with an uppercase letter followed by lowercase letters.
fn is_title_case(text: &str) -> bool {
    let mut saw_word = false;
    for word in text.split_whitespace() {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() => {
                if !first.is_uppercase() {
                    return false;
                }
                if chars.any(|c| c.is_alphabetic() && c.is_uppercase()) {
                    return false;
                }
                saw_word = true;
            }
            _ => continue,
        }
    }
    saw_word
}
