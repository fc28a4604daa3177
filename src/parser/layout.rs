//! Page layout extraction.
//!
//! Walks the content stream of each page and recovers text spans with their
//! position, font size, and bold flag, then groups them into lines and blocks.
//! The academic heuristics in [`crate::parser::academic`] run on these blocks.

use std::collections::HashMap;

use crate::error::Result;
use crate::parser::backend::{ContentOp, Operand, PageId, StructureBackend};

/// A run of text with uniform position and style.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    /// X position of the left edge.
    pub x: f32,
    /// Y position of the baseline.
    pub y: f32,
    /// Effective font size in points.
    pub font_size: f32,
    /// Base font name, e.g. "Times-Bold".
    pub font_name: String,
    pub is_bold: bool,
}

impl TextSpan {
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        Self {
            text,
            x,
            y,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Approximate rendered width.
    pub fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.font_size * 0.5
    }
}

/// Spans sharing a baseline, ordered left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub x: f32,
    pub y: f32,
    /// Largest span size on the line.
    pub font_size: f32,
}

impl TextLine {
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let font_size = spans
            .iter()
            .map(|s| s.font_size)
            .fold(0.0f32, f32::max);
        Self {
            spans,
            x,
            y,
            font_size,
        }
    }

    /// Combined text, inserting a space where the horizontal gap between
    /// adjacent spans is wide enough to read as word separation.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.width());
                let needs_space = gap > span.font_size * 0.15
                    && !prev.text.ends_with(' ')
                    && !span.text.starts_with(' ');
                if needs_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }
        result
    }

    /// True when most of the line's characters come from a bold font.
    pub fn is_bold(&self) -> bool {
        let bold: usize = self
            .spans
            .iter()
            .filter(|s| s.is_bold)
            .map(|s| s.text.len())
            .sum();
        let total: usize = self.spans.iter().map(|s| s.text.len()).sum();
        total > 0 && bold * 2 > total
    }

    pub fn is_uppercase(&self) -> bool {
        let text = self.text();
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
    }
}

/// A paragraph-level group of lines.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Largest font size appearing in the block.
    pub fn max_font_size(&self) -> f32 {
        self.lines
            .iter()
            .map(|l| l.font_size)
            .fold(0.0f32, f32::max)
    }

    pub fn is_bold(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(|l| l.is_bold())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.text().trim().is_empty()
    }

    /// Spans in reading order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }
}

/// Text matrix state while walking a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extracts positioned text from pages of a [`StructureBackend`].
pub struct LayoutAnalyzer<'a, B: StructureBackend> {
    backend: &'a B,
}

impl<'a, B: StructureBackend> LayoutAnalyzer<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Blocks of a page, sorted top to bottom.
    pub fn page_blocks(&self, page: PageId) -> Result<Vec<TextBlock>> {
        let spans = self.page_spans(page)?;
        let lines = group_spans_into_lines(spans);
        Ok(group_lines_into_blocks(lines))
    }

    /// All text spans on a page with position and font information.
    pub fn page_spans(&self, page: PageId) -> Result<Vec<TextSpan>> {
        let fonts = self.backend.fonts(page)?;
        let font_names: HashMap<Vec<u8>, String> = fonts
            .into_iter()
            .map(|f| (f.resource_name, f.base_font))
            .collect();

        let ops = self.backend.content_ops(page)?;
        Ok(self.interpret_ops(page, &ops, &font_names))
    }

    fn interpret_ops(
        &self,
        page: PageId,
        ops: &[ContentOp],
        font_names: &HashMap<Vec<u8>, String>,
    ) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut matrix = TextMatrix::default();
        let mut line_matrix = TextMatrix::default();
        let mut current_font: Vec<u8> = Vec::new();
        let mut current_size = 12.0f32;
        let mut leading = 12.0f32;
        let mut in_text = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    matrix = TextMatrix::default();
                    line_matrix = matrix.clone();
                    in_text = true;
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let Some(Operand::Name(name)) = op.operands.first() {
                        current_font = name.clone();
                    }
                    if let Some(size) = op.operands.get(1).and_then(|o| o.as_number()) {
                        current_size = size;
                    }
                }
                "TL" => {
                    if let Some(l) = op.operands.first().and_then(|o| o.as_number()) {
                        leading = l;
                    }
                }
                "Tm" => {
                    let nums: Vec<f32> =
                        op.operands.iter().filter_map(|o| o.as_number()).collect();
                    if nums.len() == 6 {
                        line_matrix.set(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                        matrix = line_matrix.clone();
                    }
                }
                "Td" | "TD" => {
                    let nums: Vec<f32> =
                        op.operands.iter().filter_map(|o| o.as_number()).collect();
                    if nums.len() == 2 {
                        if op.operator == "TD" {
                            leading = -nums[1];
                        }
                        line_matrix.translate(nums[0], nums[1]);
                        matrix = line_matrix.clone();
                    }
                }
                "T*" => {
                    line_matrix.next_line(leading);
                    matrix = line_matrix.clone();
                }
                "Tj" | "'" | "\"" => {
                    if !in_text {
                        continue;
                    }
                    if op.operator != "Tj" {
                        line_matrix.next_line(leading);
                        matrix = line_matrix.clone();
                    }
                    // For ", the string is the third operand after spacing values
                    let text_op = if op.operator == "\"" {
                        op.operands.get(2)
                    } else {
                        op.operands.first()
                    };
                    if let Some(Operand::Text(bytes)) = text_op {
                        let text = self.backend.decode_text(page, &current_font, bytes);
                        if !text.trim().is_empty() {
                            spans.push(self.make_span(
                                text,
                                &matrix,
                                current_size,
                                &current_font,
                                font_names,
                            ));
                        }
                    }
                }
                "TJ" => {
                    if !in_text {
                        continue;
                    }
                    if let Some(Operand::Array(items)) = op.operands.first() {
                        let mut combined = String::new();
                        for item in items {
                            match item {
                                Operand::Text(bytes) => {
                                    combined.push_str(&self.backend.decode_text(
                                        page,
                                        &current_font,
                                        bytes,
                                    ));
                                }
                                // Negative adjustments beyond this magnitude
                                // render as a word gap.
                                Operand::Int(_) | Operand::Real(_) => {
                                    if let Some(adj) = item.as_number() {
                                        if adj < -200.0 && !combined.ends_with(' ') {
                                            combined.push(' ');
                                        }
                                    }
                                }
                                _ => {}
                            }
                        }
                        if !combined.trim().is_empty() {
                            spans.push(self.make_span(
                                combined,
                                &matrix,
                                current_size,
                                &current_font,
                                font_names,
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        spans
    }

    fn make_span(
        &self,
        text: String,
        matrix: &TextMatrix,
        size: f32,
        font: &[u8],
        font_names: &HashMap<Vec<u8>, String>,
    ) -> TextSpan {
        let (x, y) = matrix.position();
        let effective_size = size * matrix.scale();
        let font_name = font_names
            .get(font)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        TextSpan::new(text, x, y, effective_size, font_name)
    }
}

/// Group spans into baselines. Spans within 30% of the font size of the
/// current baseline Y land on the same line.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upward, so descending Y is top-to-bottom reading order.
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }
    lines
}

/// Group lines into blocks on vertical gaps and font size changes.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<TextBlock> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = average_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            let spacing = (prev.y - line.y).abs();
            let size_change = (prev.font_size - line.font_size).abs() > 1.0;
            if spacing > avg_spacing * 1.5 || size_change {
                blocks.push(TextBlock {
                    lines: std::mem::take(&mut current),
                });
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(TextBlock { lines: current });
    }

    blocks.retain(|b| !b.is_empty());
    blocks
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();
    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32, font: &str) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, font.to_string())
    }

    #[test]
    fn test_bold_detection_from_font_name() {
        assert!(span("x", 0.0, 0.0, 10.0, "Times-Bold").is_bold);
        assert!(span("x", 0.0, 0.0, 10.0, "Helvetica-Black").is_bold);
        assert!(!span("x", 0.0, 0.0, 10.0, "Times-Roman").is_bold);
    }

    #[test]
    fn test_line_grouping_by_baseline() {
        let spans = vec![
            span("world", 50.0, 700.0, 10.0, "F1"),
            span("Hello", 10.0, 700.5, 10.0, "F1"),
            span("Below", 10.0, 680.0, 10.0, "F1"),
        ];
        let lines = group_spans_into_lines(spans);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[0].text, "Hello");
        assert_eq!(lines[1].text(), "Below");
    }

    #[test]
    fn test_line_text_inserts_space_on_gap() {
        let lines = group_spans_into_lines(vec![
            span("Hello", 10.0, 700.0, 10.0, "F1"),
            span("world", 60.0, 700.0, 10.0, "F1"),
        ]);
        assert_eq!(lines[0].text(), "Hello world");
    }

    #[test]
    fn test_line_uppercase() {
        let line = TextLine::from_spans(vec![span("RELATED WORK", 0.0, 0.0, 10.0, "F1")]);
        assert!(line.is_uppercase());
        let line = TextLine::from_spans(vec![span("Related Work", 0.0, 0.0, 10.0, "F1")]);
        assert!(!line.is_uppercase());
    }

    #[test]
    fn test_block_grouping_splits_on_large_gap() {
        let lines = group_spans_into_lines(vec![
            span("Title", 10.0, 720.0, 16.0, "F1"),
            span("First paragraph line one", 10.0, 700.0, 10.0, "F1"),
            span("line two", 10.0, 688.0, 10.0, "F1"),
            span("Second paragraph", 10.0, 640.0, 10.0, "F1"),
        ]);
        let blocks = group_lines_into_blocks(lines);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text(), "Title");
        assert!((blocks[0].max_font_size() - 16.0).abs() < 0.01);
        assert_eq!(blocks[2].text(), "Second paragraph");
    }

    #[test]
    fn test_blocks_sorted_top_to_bottom() {
        let lines = group_spans_into_lines(vec![
            span("bottom", 10.0, 100.0, 10.0, "F1"),
            span("middle", 10.0, 660.0, 10.0, "F1"),
            span("top", 10.0, 700.0, 16.0, "F1"),
        ]);
        let blocks = group_lines_into_blocks(lines);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text(), "top");
        assert_eq!(blocks.last().unwrap().text(), "bottom");
    }

    #[test]
    fn test_block_bold() {
        let block = TextBlock {
            lines: vec![TextLine::from_spans(vec![span(
                "METHODS",
                0.0,
                0.0,
                12.0,
                "Arial-Bold",
            )])],
        };
        assert!(block.is_bold());
    }
}
