//! Document processing pipeline.
//!
//! Orchestrates the parse strategies (remote service, layout heuristics,
//! raw byte extraction) as an ordered fallback chain, then runs structured
//! extraction and section-tree assembly over whichever markdown the chain
//! produced.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::error::{Error, Result};
use crate::extract::extract_structured_data;
use crate::model::{ParsedDocument, ProcessingStatus};
use crate::parser::{
    extract_text_from_bytes, extract_text_from_pdf, processing_error_markdown, AcademicParser,
    ParseOptions,
};
use crate::remote::{OutputFormat, RemoteConfig, RemoteParseClient};
use crate::tree::{assemble, AssemblyStrategy, LastSeenByLevel, SectionForest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A PDF handed to the pipeline.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes { data: Vec<u8>, name: String },
}

impl DocumentSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentSource::Path(path.into())
    }

    pub fn bytes(data: Vec<u8>, name: impl Into<String>) -> Self {
        DocumentSource::Bytes {
            data,
            name: name.into(),
        }
    }

    /// Display name for logging.
    pub fn name(&self) -> String {
        match self {
            DocumentSource::Path(p) => p.display().to_string(),
            DocumentSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// One way of turning a PDF into markdown.
///
/// Strategies are tried in order; a failing strategy hands over to the
/// next one unless the error is not fallback-eligible.
pub trait ParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse<'a>(&'a self, source: &'a DocumentSource) -> BoxFuture<'a, Result<String>>;
}

/// Strategy backed by the remote parsing service.
pub struct RemoteStrategy {
    client: RemoteParseClient,
}

impl RemoteStrategy {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        Ok(Self {
            client: RemoteParseClient::new(config)?,
        })
    }
}

impl ParseStrategy for RemoteStrategy {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn parse<'a>(&'a self, source: &'a DocumentSource) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            match source {
                DocumentSource::Path(path) => {
                    self.client.parse_pdf(path, OutputFormat::Markdown).await
                }
                DocumentSource::Bytes { data, name } => {
                    self.client
                        .parse_bytes(data.clone(), name.clone(), OutputFormat::Markdown)
                        .await
                }
            }
        })
    }
}

/// Strategy running the local layout heuristics. Degrades internally and
/// therefore never fails, which makes it a terminal chain entry.
pub struct LayoutStrategy {
    parser: AcademicParser,
}

impl LayoutStrategy {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            parser: AcademicParser::new(options),
        }
    }
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl ParseStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn parse<'a>(&'a self, source: &'a DocumentSource) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            Ok(match source {
                DocumentSource::Path(path) => self.parser.parse_path(path),
                DocumentSource::Bytes { data, name } => self.parser.parse_bytes_named(data, name),
            })
        })
    }
}

/// Last-resort strategy: raw byte-level text extraction plus the fallback
/// heuristics. Never fails.
pub struct RawTextStrategy {
    parser: AcademicParser,
}

impl Default for RawTextStrategy {
    fn default() -> Self {
        Self {
            parser: AcademicParser::default(),
        }
    }
}

impl ParseStrategy for RawTextStrategy {
    fn name(&self) -> &'static str {
        "raw-text"
    }

    fn parse<'a>(&'a self, source: &'a DocumentSource) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let text = match source {
                DocumentSource::Path(path) => extract_text_from_pdf(path),
                DocumentSource::Bytes { data, .. } => extract_text_from_bytes(data),
            };
            Ok(self.parser.parse_fallback_text(&text))
        })
    }
}

/// Try each strategy in order until one produces markdown.
pub async fn parse_with_fallback(
    strategies: &[Box<dyn ParseStrategy>],
    source: &DocumentSource,
) -> Result<String> {
    let mut last_error: Option<Error> = None;

    for strategy in strategies {
        match strategy.parse(source).await {
            Ok(markdown) => {
                log::info!("strategy '{}' parsed {}", strategy.name(), source.name());
                return Ok(markdown);
            }
            Err(e) if e.is_fallback_eligible() => {
                log::warn!("strategy '{}' failed: {e}", strategy.name());
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::AllStrategiesFailed(Box::new(last_error.unwrap_or(
        Error::Other("no parse strategies configured".to_string()),
    ))))
}

/// The pipeline's final product.
#[derive(Debug)]
pub struct ProcessedDocument {
    /// Primary markdown artifact.
    pub markdown: String,
    /// Flat structured data extracted from the markdown.
    pub document: ParsedDocument,
    /// Hierarchical section forest.
    pub tree: SectionForest,
    pub status: ProcessingStatus,
}

/// Single-document processing pipeline. Holds no shared mutable state;
/// one instance can serve concurrent documents.
pub struct DocumentPipeline {
    strategies: Vec<Box<dyn ParseStrategy>>,
    assembly: Box<dyn AssemblyStrategy + Send + Sync>,
}

impl DocumentPipeline {
    /// Local-only pipeline: layout heuristics, then raw extraction.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(LayoutStrategy::default()),
                Box::new(RawTextStrategy::default()),
            ],
            assembly: Box::new(LastSeenByLevel),
        }
    }

    /// Pipeline preferring the remote service, with local fallbacks.
    pub fn with_remote(config: RemoteConfig) -> Result<Self> {
        Ok(Self {
            strategies: vec![
                Box::new(RemoteStrategy::new(config)?),
                Box::new(LayoutStrategy::default()),
                Box::new(RawTextStrategy::default()),
            ],
            assembly: Box::new(LastSeenByLevel),
        })
    }

    /// Build a pipeline from explicit strategies, in fallback order.
    pub fn from_strategies(strategies: Vec<Box<dyn ParseStrategy>>) -> Self {
        Self {
            strategies,
            assembly: Box::new(LastSeenByLevel),
        }
    }

    /// Replace the tree assembly strategy.
    pub fn with_assembly<S: AssemblyStrategy + Send + Sync + 'static>(
        mut self,
        strategy: S,
    ) -> Self {
        self.assembly = Box::new(strategy);
        self
    }

    /// Run the full pipeline. Always returns a document; parse failure is
    /// reported through the status field, never as a propagated error.
    pub async fn process(&self, source: DocumentSource) -> ProcessedDocument {
        match parse_with_fallback(&self.strategies, &source).await {
            Ok(markdown) => self.finish(markdown, ProcessingStatus::Completed),
            Err(e) => {
                log::error!("all parse strategies failed for {}: {e}", source.name());
                let status = ProcessingStatus::Failed {
                    error: e.to_string(),
                };
                self.finish(processing_error_markdown(&e), status)
            }
        }
    }

    fn finish(&self, markdown: String, status: ProcessingStatus) -> ProcessedDocument {
        let document = extract_structured_data(&markdown).into_document();
        let tree = SectionForest::new(assemble(&document.sections, &*self.assembly));
        ProcessedDocument {
            markdown,
            document,
            tree,
            status,
        }
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}
