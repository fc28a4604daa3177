//! PDF structure backend abstraction.
//!
//! The layout heuristics only need pages, fonts, decoded content operations,
//! and text decoding. Putting those behind a trait keeps `lopdf` out of the
//! academic parser and makes the "no structure library available" fallback
//! path exercisable in tests.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A font referenced by a page.
#[derive(Debug, Clone)]
pub struct FontRef {
    /// Resource name, the key used by `Tf` operators.
    pub resource_name: Vec<u8>,
    /// Base font name, e.g. "Helvetica-Bold".
    pub base_font: String,
}

/// Operand of a content stream operation.
#[derive(Debug, Clone)]
pub enum Operand {
    Int(i64),
    Real(f32),
    Name(Vec<u8>),
    Text(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    /// Numeric value, if this operand is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Operand::Int(i) => Some(*i as f32),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single decoded content-stream operation.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<Operand>,
}

/// Access to a PDF's page/font/content structure.
///
/// The underlying document handle is released when the backend is dropped,
/// which covers every exit path of the parser including error returns.
pub trait StructureBackend {
    /// All pages as page number -> page id, in page order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Fonts referenced by a page.
    fn fonts(&self, page: PageId) -> Result<Vec<FontRef>>;

    /// Decoded content operations for a page.
    fn content_ops(&self, page: PageId) -> Result<Vec<ContentOp>>;

    /// Decode a text byte string using the named font's encoding, falling
    /// back to simple decoding when the encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Whether the document is encrypted.
    fn is_encrypted(&self) -> bool {
        false
    }
}

/// Simple text decoding when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| c.try_into().ok().map(u16::from_be_bytes))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// [`StructureBackend`] backed by `lopdf`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path. Rejects files without a PDF header before
    /// attempting a full structural parse.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        crate::detect::detect_format_from_path(&path)?;
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Ok(Self { doc })
    }

    /// Raw decompressed content stream bytes, handling both single-stream
    /// and array-of-streams pages.
    fn page_content_bytes(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string())),
                _ => Err(Error::PdfParse("invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            Object::Stream(s) => s
                .decompressed_content()
                .map_err(|e| Error::PdfParse(e.to_string())),
            _ => Err(Error::PdfParse("invalid content stream".to_string())),
        }
    }
}

impl StructureBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn fonts(&self, page: PageId) -> Result<Vec<FontRef>> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| {
                let base_font = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                FontRef {
                    resource_name: name.clone(),
                    base_font,
                }
            })
            .collect())
    }

    fn content_ops(&self, page: PageId) -> Result<Vec<ContentOp>> {
        let data = self.page_content_bytes(page)?;
        let content =
            lopdf::content::Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }
}

fn convert_object(obj: &Object) -> Operand {
    match obj {
        Object::Integer(i) => Operand::Int(*i),
        Object::Real(r) => Operand::Real(*r),
        Object::Name(n) => Operand::Name(n.clone()),
        Object::String(b, _) => Operand::Text(b.clone()),
        Object::Array(arr) => Operand::Array(arr.iter().map(convert_object).collect()),
        _ => Operand::Other,
    }
}
