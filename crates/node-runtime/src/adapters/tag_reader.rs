//! # Tag Reader
//!
//! Source of scanned identifiers. The runtime binary reads one identifier
//! per line from stdin in place of the RFID reader.

use async_trait::async_trait;
use shared_types::Identifier;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

#[async_trait]
pub trait TagReader: Send {
    /// Next scanned identifier, or `None` when the reader is gone.
    async fn next_tag(&mut self) -> Option<Identifier>;
}

/// Newline-delimited identifiers. Blank lines are skipped and lines that
/// are not valid identifiers are logged and skipped.
pub struct LineTagReader<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineTagReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineTagReader<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> TagReader for LineTagReader<R> {
    async fn next_tag(&mut self) -> Option<Identifier> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    warn!("Tag reader failed: {}", e);
                    return None;
                }
            };

            let tag = line.trim();
            if tag.is_empty() {
                continue;
            }
            match Identifier::new(tag) {
                Ok(identifier) => return Some(identifier),
                Err(e) => warn!("Ignoring unreadable tag {:?}: {}", tag, e),
            }
        }
    }
}
