//! CLI runner - executes commands

use crate::auth::{StaticTokenProvider, TokenResult};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::DocumentsClient;
use crate::config::{load_config, ClientConfig};
use crate::document::DocumentWrapper;
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{CursorItem, PaginatedCursor};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        debug!("{} {}: {:?}", crate::NAME, crate::VERSION, self.cli.command);
        match &self.cli.command {
            Commands::List {
                partition,
                limit,
                lazy,
            } => self.list(partition, *limit, *lazy).await,
            Commands::Page {
                partition,
                continuation,
            } => self.page(partition, continuation.as_deref()).await,
        }
    }

    /// Build a client holding the credential for `partition`
    fn client(&self, partition: &str) -> Result<DocumentsClient> {
        let config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        let token_path = self
            .cli
            .token_file
            .as_ref()
            .ok_or_else(|| Error::config("--token-file is required"))?;
        let token = read_token(token_path)?;
        let tokens = StaticTokenProvider::new().with_token(partition, token);

        DocumentsClient::from_config(&config, Arc::new(tokens))
    }

    /// List every document of a partition
    async fn list(&self, partition: &str, limit: Option<usize>, lazy: bool) -> Result<()> {
        let client = self.client(partition)?;
        let cursor: PaginatedCursor<Value> = if lazy {
            client.list_lazy(partition).await
        } else {
            client.list(partition).await
        };

        // The cursor blocks at page boundaries, so it runs off the async workers.
        let format = self.cli.format;
        let count = tokio::task::spawn_blocking(move || {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            drain(cursor, limit, format, &mut out)
        })
        .await
        .map_err(|e| Error::Other(format!("Listing task failed: {e}")))??;

        info!("Listed {} documents from partition {}", count, partition);
        Ok(())
    }

    /// Print one page and the token for the next one
    async fn page(&self, partition: &str, continuation: Option<&str>) -> Result<()> {
        let client = self.client(partition)?;
        let mut cursor: PaginatedCursor<Value> = match continuation {
            Some(token) => client.resume(partition, token).await,
            None => client.list_lazy(partition).await,
        };

        let documents = cursor
            .next_page()
            .await
            .map_err(|e| Error::Other(format!("Fetching page failed: {e}")))?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        for doc in documents {
            write_document(&mut out, doc, self.cli.format)?;
        }
        let count = documents.len();

        match cursor.continuation_token() {
            Some(token) => eprintln!("{count} documents, next page: --continuation '{token}'"),
            None => eprintln!("{count} documents, last page"),
        }
        Ok(())
    }
}

/// Read a credential file
fn read_token(path: &Path) -> Result<TokenResult> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid token file '{}'", path.display()))
}

/// Write documents from a cursor until it is exhausted or `limit` is reached
fn drain<W: Write>(
    mut cursor: PaginatedCursor<Value>,
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut W,
) -> Result<usize> {
    let mut count = 0;
    while cursor.has_more() && limit.map_or(true, |max| count < max) {
        match cursor.next() {
            CursorItem::Item(doc) => {
                write_document(out, &doc, format)?;
                count += 1;
            }
            CursorItem::Exhausted | CursorItem::Failed(_) => break,
        }
    }

    // has_more() is already false when the first page failed
    if let Some(e) = cursor.error() {
        return Err(Error::Other(format!(
            "Listing failed after {count} documents: {e}"
        )));
    }
    Ok(count)
}

fn write_document<W: Write>(
    out: &mut W,
    doc: &DocumentWrapper<Value>,
    format: OutputFormat,
) -> Result<()> {
    let line = match format {
        OutputFormat::Json => serde_json::to_string(doc)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(doc)?,
    };
    writeln!(out, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_write_document_json_line() {
        let ts = Utc.timestamp_opt(1_550_000_000, 0).unwrap();
        let doc = DocumentWrapper::new(json!({"k": 1}), "readonly", "a", None, ts);

        let mut out = Vec::new();
        write_document(&mut out, &doc, OutputFormat::Json).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["id"], "a");
        assert_eq!(parsed["deserialized_value"]["k"], 1);
    }

    #[test]
    fn test_drain_failed_cursor_reports_error() {
        let cursor = PaginatedCursor::failed(FetchError::transport("offline"));
        let mut out = Vec::new();
        let err = drain(cursor, None, OutputFormat::Json, &mut out).unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_read_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(
            &path,
            r#"{"partition":"readonly","dbAccount":"acct","dbName":"db","dbCollectionName":"c","token":"sig"}"#,
        )
        .unwrap();

        let token = read_token(&path).unwrap();
        assert_eq!(token.db_account, "acct");

        let err = read_token(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));

        fs::write(&path, "{}").unwrap();
        let err = read_token(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid token file"));
    }
}
