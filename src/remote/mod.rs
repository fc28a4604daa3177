//! Remote document-parsing service adapter.

mod client;

pub use client::{
    poll_until_complete, JobPoll, OutputFormat, RemoteConfig, RemoteParseClient,
    ACADEMIC_INSTRUCTION,
};
