use anyhow::{Context, Result};
use axum::body::Bytes;
use ipinfo_shared::{Record, Schema};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{HtmlMode, WebConfig};
use crate::error::PipelineError;
use crate::lookup_client::LookupClient;
use crate::render;

/// fetch -> parse -> render, for one configured schema and HTML mode.
pub struct Pipeline {
    schema: Schema,
    html_mode: HtmlMode,
    source: Source,
}

enum Source {
    Live(LookupClient),
    /// Taken once before the listener starts; never refreshed.
    Snapshot { body: Bytes, record: Arc<Record> },
}

impl Pipeline {
    pub async fn from_config(config: &WebConfig) -> Result<Self> {
        if config.snapshot {
            Self::snapshot(config).await
        } else {
            Self::live(config)
        }
    }

    pub fn live(config: &WebConfig) -> Result<Self> {
        let client = LookupClient::new(&config.upstream)?;
        info!("Lookup API: {} ({} schema)", client.url(), config.upstream.schema);

        Ok(Self {
            schema: config.upstream.schema,
            html_mode: config.html_mode,
            source: Source::Live(client),
        })
    }

    pub async fn snapshot(config: &WebConfig) -> Result<Self> {
        let client = LookupClient::new(&config.upstream)?;
        let schema = config.upstream.schema;
        info!("Taking startup snapshot from {}", client.url());

        let body = client
            .fetch()
            .await
            .context("Failed to fetch startup snapshot")?;
        let record = parse(schema, &body).context("Failed to parse startup snapshot")?;
        info!("Snapshot ready for {}", record.ip());

        Ok(Self {
            schema,
            html_mode: config.html_mode,
            source: Source::Snapshot {
                body,
                record: Arc::new(record),
            },
        })
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn html_mode(&self) -> HtmlMode {
        self.html_mode
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self.source, Source::Snapshot { .. })
    }

    /// Upstream bytes, untouched.
    pub async fn raw(&self) -> Result<Bytes, PipelineError> {
        match &self.source {
            Source::Live(client) => client.fetch().await,
            Source::Snapshot { body, .. } => Ok(body.clone()),
        }
    }

    pub async fn record(&self) -> Result<Arc<Record>, PipelineError> {
        match &self.source {
            Source::Live(client) => {
                let body = client.fetch().await?;
                Ok(Arc::new(parse(self.schema, &body)?))
            }
            Source::Snapshot { record, .. } => Ok(Arc::clone(record)),
        }
    }

    pub async fn html(&self) -> Result<String, PipelineError> {
        let record = self.record().await?;
        render::render_html(&record, self.html_mode)
    }
}

fn parse(schema: Schema, body: &[u8]) -> Result<Record, PipelineError> {
    let record =
        Record::parse(schema, body).map_err(|source| PipelineError::Parse { schema, source })?;

    if let Some(message) = record.soft_failure() {
        warn!("Lookup API reported failure for {}: {}", record.ip(), message);
    }

    Ok(record)
}
