//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::http::{ApiClient, CallContext, ClientConfig};
use anyhow::{Context, Result};
use futures::StreamExt;
use serde_json::Value;
use std::io::{self, Write};

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
        let client = self.client()?;

        match &self.cli.command {
            Commands::Status => self.status(&client).await,
            Commands::Get {
                segments,
                query,
                retry,
            } => self.get(&client, segments, query, *retry).await,
            Commands::List {
                model,
                segments,
                query,
                max_items,
            } => self.list(&client, model, segments, query, *max_items).await,
        }
    }

    /// Build the client from flags and environment
    pub fn client(&self) -> Result<ApiClient> {
        let config = ClientConfig::builder()
            .base_url(&self.cli.base_url)
            .auth_token(&self.cli.auth_token)
            .enabled(self.cli.enabled)
            .request_id_header(&self.cli.request_id_header)
            .timeout(self.cli.timeout)
            .build();

        let client = ApiClient::new(config).context("Invalid client configuration")?;

        Ok(match self.context() {
            Some(context) => client.with_context(context),
            None => client,
        })
    }

    fn context(&self) -> Option<CallContext> {
        let cli = &self.cli;
        if cli.request_id.is_none() && cli.span_id.is_none() && cli.trace_id.is_none() {
            return None;
        }

        let mut context = CallContext::new();
        if let Some(id) = &cli.request_id {
            context = context.request_id(id);
        }
        if let Some(id) = &cli.span_id {
            context = context.span_id(id);
        }
        if let Some(id) = &cli.trace_id {
            context = context.trace_id(id);
        }
        Some(context)
    }

    async fn status(&self, client: &ApiClient) -> Result<()> {
        let status = client
            .get_status()
            .await
            .context("Failed to query API status")?;
        self.emit(status.as_ref())
    }

    async fn get(
        &self,
        client: &ApiClient,
        segments: &[String],
        query: &[(String, String)],
        retry: bool,
    ) -> Result<()> {
        let call = query.iter().fold(
            client.req().segments(segments).get(),
            |call, (key, value)| call.query(key, value),
        );

        let result = if retry {
            call.send_with_retry().await
        } else {
            call.send().await
        };
        let result = result.with_context(|| format!("GET {} failed", call.path()))?;

        self.emit(result.as_ref())
    }

    async fn list(
        &self,
        client: &ApiClient,
        model: &str,
        segments: &[String],
        query: &[(String, String)],
        max_items: Option<usize>,
    ) -> Result<()> {
        let path = if segments.is_empty() {
            client.req().segment(model)
        } else {
            client.req().segments(segments)
        };
        let find = query
            .iter()
            .fold(path.get(), |call, (key, value)| call.query(key, value));

        let mut items = client
            .iter_collection(model, find)
            .take(max_items.unwrap_or(usize::MAX));

        let mut count = 0usize;
        while let Some(item) = items.next().await {
            let item = item.with_context(|| format!("Failed to list {model} after {count} items"))?;
            self.emit(Some(&item))?;
            count += 1;
        }

        tracing::info!(model = %model, count, "Listed {} {}", count, model);
        Ok(())
    }

    fn emit(&self, value: Option<&Value>) -> Result<()> {
        let Some(value) = value else {
            tracing::debug!("Client disabled, nothing to print");
            return Ok(());
        };

        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        Ok(())
    }
}
