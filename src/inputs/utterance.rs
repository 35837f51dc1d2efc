//! Finalized-utterance source
//!
//! Reads recognizer output line by line from any async reader. Each line is
//! either plain text or a recognizer result object (`{"text": "..."}`).
//! Blank results and malformed payloads yield nothing; the stream keeps going.

use std::io::ErrorKind;
use std::path::Path;
use std::pin::Pin;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Longest accepted line; longer ones are dropped.
pub const MAX_LINE_BYTES: usize = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// One utterance per line.
    #[default]
    Text,
    /// One recognizer result object per line.
    Json,
}

#[derive(Debug, Deserialize)]
struct RecognizerResult {
    #[serde(default)]
    text: String,
}

/// Lower-cased, trimmed utterance; `None` for blank or malformed payloads.
pub fn parse_payload(line: &str, format: PayloadFormat) -> Option<String> {
    let text = match format {
        PayloadFormat::Text => line.to_string(),
        PayloadFormat::Json => match serde_json::from_str::<RecognizerResult>(line) {
            Ok(result) => result.text,
            Err(e) => {
                debug!(error = %e, "discarding malformed recognizer payload");
                return None;
            }
        },
    };

    let text = text.trim().to_lowercase();
    (!text.is_empty()).then_some(text)
}

pub type BoxedReader = Pin<Box<dyn AsyncRead + Send>>;

/// Lazy, non-restartable stream of utterances.
pub struct UtteranceSource<R> {
    frames: FramedRead<R, LinesCodec>,
    format: PayloadFormat,
}

impl<R: AsyncRead + Unpin> UtteranceSource<R> {
    pub fn new(reader: R, format: PayloadFormat) -> Self {
        Self {
            frames: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_BYTES)),
            format,
        }
    }

    /// Next finalized utterance, or `None` once the input is exhausted.
    pub async fn next_utterance(&mut self) -> Option<String> {
        loop {
            match self.frames.next().await? {
                Ok(line) => {
                    if let Some(text) = parse_payload(&line, self.format) {
                        return Some(text);
                    }
                }
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!(max = MAX_LINE_BYTES, "discarding oversized recognizer line");
                    // FramedRead yields one `None` after a decode error, then resumes
                    let _ = self.frames.next().await;
                }
                Err(LinesCodecError::Io(e)) if e.kind() == ErrorKind::InvalidData => {
                    debug!(error = %e, "discarding non-UTF-8 recognizer line");
                    let _ = self.frames.next().await;
                }
                Err(LinesCodecError::Io(e)) => {
                    warn!(error = %e, "utterance source failed");
                    return None;
                }
            }
        }
    }
}

impl UtteranceSource<BoxedReader> {
    /// File at `path`, or stdin when `None`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Startup` if the file cannot be opened
    pub async fn open(path: Option<&Path>, format: PayloadFormat) -> Result<Self> {
        let reader: BoxedReader = match path {
            Some(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    let path = path.display();
                    Error::Startup(format!("cannot open utterance source {}: {}", path, e))
                })?;
                Box::pin(file)
            }
            None => Box::pin(tokio::io::stdin()),
        };
        Ok(Self::new(reader, format))
    }
}
