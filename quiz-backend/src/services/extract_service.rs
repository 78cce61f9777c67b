use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Turns an uploaded document into plain text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Extracts text with poppler's `pdftotext`, streaming the document over stdin
/// so uploads never touch the filesystem.
#[derive(Clone)]
pub struct PdftotextExtractor {
    bin: String,
}

impl PdftotextExtractor {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl TextExtractor for PdftotextExtractor {
    async fn extract_text(&self, data: &[u8]) -> Result<String> {
        if !data.starts_with(b"%PDF") {
            return Err(Error::Unprocessable("Invalid PDF file content".into()));
        }

        let mut child = Command::new(&self.bin)
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                tracing::error!("Failed to run {}: {}", self.bin, e);
                Error::Internal(format!("{} not available", self.bin))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Internal("pdftotext stdin unavailable".into()))?;
        let input = data.to_vec();
        let writer = tokio::spawn(async move { stdin.write_all(&input).await });

        let output = child.wait_with_output().await?;
        // pdftotext may bail out before consuming all input; a broken pipe here is expected.
        if let Ok(Err(e)) = writer.await {
            tracing::debug!("pdftotext stdin closed early: {}", e);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("pdftotext failed ({}): {}", output.status, stderr.trim());
            return Err(Error::Unprocessable(
                "Could not read the PDF. It may be encrypted or corrupt.".into(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
