//! Keyword spreadsheet export and the object-store sink that holds the files.
//!
//! The sink is chosen by `EXPORT_STORE_URL`:
//!
//! ```text
//! memory://                                   in-process, lost on restart
//! file:///var/lib/manage-api/export           local directory
//! s3://bucket?region=us-east-1                S3
//! s3://bucket?endpoint=http://minio:9000      S3-compatible (MinIO)
//! ```

pub mod sheet;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions};
use url::Url;
use uuid::Uuid;

use crate::config::ExportConfig;
use crate::database::models::KeywordRow;

pub use sheet::{build_workbook, HEADERS, XLSX_CONTENT_TYPE};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export file not found: {0}")]
    NotFound(String),

    #[error("invalid export file name: {0}")]
    InvalidKey(String),

    #[error("object store error: {0}")]
    Backend(#[from] object_store::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("export store configuration error: {0}")]
    Config(String),
}

/// A stored export ready to be streamed back
pub struct ExportObject {
    pub content_type: String,
    pub stream: BoxStream<'static, Result<Bytes, ExportError>>,
}

/// Where finished spreadsheets are written and read back from.
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn put(&self, file_name: &str, bytes: Bytes, content_type: &str) -> Result<(), ExportError>;

    /// Missing objects are reported as [`ExportError::NotFound`].
    async fn get(&self, file_name: &str) -> Result<ExportObject, ExportError>;
}

pub struct ObjectStoreSink {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    // LocalFileSystem rejects attributes
    stores_content_type: bool,
}

impl ObjectStoreSink {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>, stores_content_type: bool) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
            stores_content_type,
        }
    }

    pub fn in_memory(prefix: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), prefix, true)
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        let url = Url::parse(&config.store_url)
            .map_err(|e| ExportError::Config(format!("{}: {}", config.store_url, e)))?;

        let sink = match url.scheme() {
            "memory" => Self::in_memory(config.prefix.clone()),
            "file" => {
                let dir = url.path();
                std::fs::create_dir_all(dir)
                    .map_err(|e| ExportError::Config(format!("cannot create {}: {}", dir, e)))?;
                let store = LocalFileSystem::new_with_prefix(dir)?;
                Self::new(Arc::new(store), config.prefix.clone(), false)
            }
            "s3" => {
                let bucket = url
                    .host_str()
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| ExportError::Config("s3 url has no bucket".to_string()))?;
                let param = |key: &str| {
                    url.query_pairs()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.into_owned())
                };

                // Credentials come from AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY or instance metadata
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(param("region").unwrap_or_else(|| "us-east-1".to_string()));
                if let Some(endpoint) = param("endpoint") {
                    builder = builder.with_endpoint(endpoint).with_allow_http(true);
                }
                Self::new(Arc::new(builder.build()?), config.prefix.clone(), true)
            }
            other => return Err(ExportError::Config(format!("unsupported export store scheme '{}'", other))),
        };

        tracing::info!(store = %url.scheme(), prefix = %sink.prefix, "Export sink ready");
        Ok(sink)
    }

    fn path(&self, file_name: &str) -> Result<Path, ExportError> {
        validate_file_name(file_name)?;
        if self.prefix.is_empty() {
            Ok(Path::from(file_name))
        } else {
            Ok(Path::from(format!("{}/{}", self.prefix, file_name)))
        }
    }
}

#[async_trait]
impl ExportSink for ObjectStoreSink {
    async fn put(&self, file_name: &str, bytes: Bytes, content_type: &str) -> Result<(), ExportError> {
        let path = self.path(file_name)?;
        let mut options = PutOptions::default();
        if self.stores_content_type {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            options.attributes = attributes;
        }
        self.store.put_opts(&path, bytes.into(), options).await?;
        tracing::debug!(key = %path, "Export stored");
        Ok(())
    }

    async fn get(&self, file_name: &str) -> Result<ExportObject, ExportError> {
        let path = self.path(file_name)?;
        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Err(ExportError::NotFound(file_name.to_string())),
            Err(e) => return Err(e.into()),
        };

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| {
                let value: &str = v.as_ref();
                value.to_string()
            })
            .unwrap_or_else(|| XLSX_CONTENT_TYPE.to_string());
        let stream = result.into_stream().map(|chunk| chunk.map_err(ExportError::from)).boxed();

        Ok(ExportObject { content_type, stream })
    }
}

/// Renders joined keyword rows and stores the workbook. Returns the file name
/// to hand back for download.
pub async fn write_export(sink: &dyn ExportSink, rows: Vec<serde_json::Value>) -> Result<String, ExportError> {
    let rows: Vec<KeywordRow> = rows
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| ExportError::Spreadsheet(format!("unreadable keyword row: {}", e)))?;
    let count = rows.len();

    let bytes = tokio::task::spawn_blocking(move || build_workbook(&rows))
        .await
        .map_err(|e| ExportError::Spreadsheet(format!("workbook task failed: {}", e)))??;

    let file_name = generate_file_name();
    sink.put(&file_name, Bytes::from(bytes), XLSX_CONTENT_TYPE).await?;
    tracing::info!(file_name = %file_name, rows = count, "Keyword export written");
    Ok(file_name)
}

/// `keywords-<unix seconds>-<uuid>.xlsx`
pub fn generate_file_name() -> String {
    format!("keywords-{}-{}.xlsx", Utc::now().timestamp(), Uuid::new_v4().simple())
}

/// Accepts only a bare `.xlsx` name: no separators, no parent references.
pub fn validate_file_name(file_name: &str) -> Result<(), ExportError> {
    let invalid = |reason: &str| Err(ExportError::InvalidKey(format!("{} ({})", file_name, reason)));

    if file_name.is_empty() {
        return invalid("empty");
    }
    if file_name.contains('/') || file_name.contains('\\') {
        return invalid("path separator");
    }
    if file_name.contains("..") {
        return invalid("parent reference");
    }
    if !file_name.ends_with(".xlsx") || file_name.len() == ".xlsx".len() {
        return invalid("not an .xlsx file");
    }
    Ok(())
}
