//! HTTP client for the external parsing service.
//!
//! Submits a PDF with an academic-paper instruction payload, polls the job
//! with a bounded budget, and normalizes the heterogeneous result envelopes
//! into a single string. Upload failure, job failure, and poll timeout are
//! distinct errors so the caller's fallback chain can react; this adapter
//! never silently returns empty content.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Instruction payload sent with every upload, demanding verbatim and
/// structure-preserving extraction.
pub const ACADEMIC_INSTRUCTION: &str = "\
The provided document is an academic research paper or scientific publication.

Please ensure:
1. Include ALL the original text with no summarization or omissions
2. Preserve the hierarchical structure of sections and subsections exactly as they appear
3. Handle multiple columns properly, maintaining correct reading order
4. Extract tables and figures with their captions in full
5. Format mathematical equations in LaTeX (between $ symbols)
6. Preserve all citations and references exactly as they appear
7. Distinguish between abstract, main content, and footnotes
8. Properly identify section headings and maintain their hierarchy
9. Extract metadata like title, authors, and publication details

IMPORTANT: Do NOT summarize sections or content. Preserve ALL original text verbatim while maintaining structure.
Focus on producing a complete, well-structured conversion that captures every detail of the original document.";

/// Requested result format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }

    /// Refusal scrubbing only applies to prose formats.
    fn scrubbed(&self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::Text)
    }
}

/// Connection and budget configuration, passed at construction. One client
/// per configuration; no process-wide instance.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_polls: u32,
    pub poll_interval: Duration,
    pub upload_timeout: Duration,
    pub status_timeout: Duration,
    pub result_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_polls: 30,
            poll_interval: Duration::from_secs(2),
            upload_timeout: Duration::from_secs(120),
            status_timeout: Duration::from_secs(30),
            result_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_poll_budget(mut self, max_polls: u32, interval: Duration) -> Self {
        self.max_polls = max_polls;
        self.poll_interval = interval;
        self
    }
}

/// One status observation of a parsing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPoll {
    Pending,
    Success,
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
    error: Option<String>,
}

impl StatusResponse {
    fn classify(&self) -> JobPoll {
        match self.status.as_deref() {
            Some("SUCCESS") | Some("completed") => JobPoll::Success,
            Some("failed") | Some("error") | Some("FAILED") => JobPoll::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ),
            _ => JobPoll::Pending,
        }
    }
}

/// Poll a status source until it reports a terminal state, with a hard
/// attempt budget. Returns the number of polls consumed on success.
///
/// Generic over the status source so the budget semantics are testable
/// without a live endpoint.
pub async fn poll_until_complete<F, Fut>(
    mut check: F,
    max_polls: u32,
    interval: Duration,
) -> Result<u32>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobPoll>>,
{
    for attempt in 1..=max_polls {
        match check().await? {
            JobPoll::Success => return Ok(attempt),
            JobPoll::Failed(message) => return Err(Error::RemoteJobFailed(message)),
            JobPoll::Pending => {
                if attempt < max_polls {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
    Err(Error::RemotePollTimeout(
        max_polls as u64 * interval.as_secs(),
    ))
}

/// Client for the remote parsing service.
pub struct RemoteParseClient {
    config: RemoteConfig,
    http: reqwest::Client,
}

impl RemoteParseClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::RemoteUpload(e.to_string()))?;
        Ok(Self { config, http })
    }

    /// Parse a PDF file and return its content in the requested format.
    pub async fn parse_pdf<P: AsRef<Path>>(
        &self,
        path: P,
        format: OutputFormat,
    ) -> Result<String> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::RemoteUpload(format!("could not read {}: {e}", path.display())))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());
        self.parse_bytes(data, filename, format).await
    }

    /// Parse in-memory PDF bytes.
    pub async fn parse_bytes(
        &self,
        data: Vec<u8>,
        filename: String,
        format: OutputFormat,
    ) -> Result<String> {
        let job_id = self.upload(data, filename).await?;
        log::info!("remote parse job {job_id} created");

        let polls = poll_until_complete(
            || self.check_status(&job_id),
            self.config.max_polls,
            self.config.poll_interval,
        )
        .await?;
        log::debug!("job {job_id} completed after {polls} polls");

        let body = self.fetch_result(&job_id, format).await?;
        let content = normalize_envelope(&body, format);
        if format.scrubbed() {
            Ok(scrub_refusals(&content))
        } else {
            Ok(content)
        }
    }

    async fn upload(&self, data: Vec<u8>, filename: String) -> Result<String> {
        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(filename)
            .mime_str("application/pdf")
            .map_err(|e| Error::RemoteUpload(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("parsing_instruction", ACADEMIC_INSTRUCTION);

        let response = self
            .http
            .post(format!("{}/api/parsing/upload", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .timeout(self.config.upload_timeout)
            .send()
            .await
            .map_err(|e| Error::RemoteUpload(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::RemoteUpload(e.to_string()))?;

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteUpload(e.to_string()))?;
        upload
            .id
            .ok_or_else(|| Error::RemoteUpload("no job ID returned from upload".to_string()))
    }

    async fn check_status(&self, job_id: &str) -> Result<JobPoll> {
        let response = self
            .http
            .get(format!(
                "{}/api/parsing/job/{job_id}",
                self.config.base_url
            ))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.status_timeout)
            .send()
            .await
            .map_err(|e| Error::RemoteResult(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::RemoteResult(e.to_string()))?;

        let status: StatusResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteResult(e.to_string()))?;
        Ok(status.classify())
    }

    async fn fetch_result(&self, job_id: &str, format: OutputFormat) -> Result<String> {
        let response = self
            .http
            .get(format!(
                "{}/api/parsing/job/{job_id}/result/{}",
                self.config.base_url,
                format.as_str()
            ))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.result_timeout)
            .send()
            .await
            .map_err(|e| Error::RemoteResult(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::RemoteResult(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| Error::RemoteResult(e.to_string()))
    }
}

/// Normalize the result body: the service may return the content directly,
/// under a format-named key, or under a legacy `markdown` key.
fn normalize_envelope(body: &str, format: OutputFormat) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        // Not JSON at all: the body is the content.
        Err(_) => return body.to_string(),
    };

    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string());
    }

    match &value {
        Value::Object(map) => {
            if let Some(Value::String(content)) = map.get(format.as_str()) {
                return content.clone();
            }
            if format == OutputFormat::Markdown {
                if let Some(Value::String(content)) = map.get("markdown") {
                    return content.clone();
                }
            }
            log::warn!(
                "result envelope missing '{}' field, returning raw JSON",
                format.as_str()
            );
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string())
        }
        Value::String(content) if content.len() > 10 => content.clone(),
        _ => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
    }
}

const REFUSAL_PATTERNS: &[&str] = &[
    "i'm sorry",
    "i can't assist",
    "i cannot assist",
    "i apologize",
    "can't help",
    "cannot help",
];

/// Drop refusal boilerplate a generative backend may inject, together with
/// the lines that follow it, resuming at the next section boundary (`---`
/// or a heading).
fn scrub_refusals(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;

    for line in text.lines() {
        let lower = line.to_lowercase();
        if REFUSAL_PATTERNS.iter().any(|p| lower.contains(p)) {
            skipping = true;
            continue;
        }
        if line.trim() == "---" || line.starts_with('#') {
            skipping = false;
        }
        if !skipping {
            kept.push(line);
        }
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_poll_success_after_two_pending() {
        let calls = AtomicU32::new(0);
        let polls = poll_until_complete(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    Ok(if n < 3 { JobPoll::Pending } else { JobPoll::Success })
                }
            },
            30,
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(polls, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_budget_exhausted_is_timeout() {
        let result = poll_until_complete(
            || async { Ok(JobPoll::Pending) },
            5,
            Duration::ZERO,
        )
        .await;

        assert!(matches!(result, Err(Error::RemotePollTimeout(_))));
    }

    #[tokio::test]
    async fn test_poll_failure_surfaces_error() {
        let result = poll_until_complete(
            || async { Ok(JobPoll::Failed("parse exploded".to_string())) },
            30,
            Duration::ZERO,
        )
        .await;

        match result {
            Err(Error::RemoteJobFailed(message)) => assert_eq!(message, "parse exploded"),
            other => panic!("expected job failure, got {other:?}"),
        }
    }

    #[test]
    fn test_status_classification() {
        let status = |s: &str| StatusResponse {
            status: Some(s.to_string()),
            error: None,
        };
        assert_eq!(status("SUCCESS").classify(), JobPoll::Success);
        assert_eq!(status("completed").classify(), JobPoll::Success);
        assert_eq!(status("PENDING").classify(), JobPoll::Pending);
        assert!(matches!(status("FAILED").classify(), JobPoll::Failed(_)));
        assert!(matches!(status("error").classify(), JobPoll::Failed(_)));
    }

    #[test]
    fn test_normalize_format_keyed_envelope() {
        let body = r##"{"markdown": "# Title\n\nBody"}"##;
        assert_eq!(
            normalize_envelope(body, OutputFormat::Markdown),
            "# Title\n\nBody"
        );
    }

    #[test]
    fn test_normalize_direct_string() {
        let body = r##""# A markdown document body""##;
        assert_eq!(
            normalize_envelope(body, OutputFormat::Markdown),
            "# A markdown document body"
        );
    }

    #[test]
    fn test_normalize_raw_text_passthrough() {
        let body = "# Not JSON at all\n\ncontent";
        assert_eq!(normalize_envelope(body, OutputFormat::Markdown), body);
    }

    #[test]
    fn test_scrub_refusal_until_heading() {
        let text = "# Intro\nGood line.\nI'm sorry, but I can't assist with that.\ndropped line\n# Next\nKept line.";
        let cleaned = scrub_refusals(text);
        assert!(cleaned.contains("Good line."));
        assert!(!cleaned.contains("sorry"));
        assert!(!cleaned.contains("dropped line"));
        assert!(cleaned.contains("# Next\nKept line."));
    }

    #[test]
    fn test_scrub_resets_at_separator() {
        let text = "I apologize for the confusion.\nlost\n---\nkept after separator";
        let cleaned = scrub_refusals(text);
        assert!(!cleaned.contains("lost"));
        assert!(cleaned.contains("---"));
        assert!(cleaned.contains("kept after separator"));
    }

    #[test]
    fn test_scrub_keeps_clean_text() {
        let text = "# Title\n\nNothing wrong here.";
        assert_eq!(scrub_refusals(text), text);
    }
}
