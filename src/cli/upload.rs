//! CLI entry-point that posts a local file to a running server.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use tracing::{info, instrument};

/// Args for the `upload` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// File to upload.
    #[arg(long)]
    pub file: PathBuf,
    /// Base URL of the server.
    #[arg(long, default_value = "http://localhost:8000")]
    pub url: String,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.txt")
        .to_string();
    let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
    let endpoint = format!("{}/upload_file", args.url.trim_end_matches('/'));

    let response = Client::new()
        .post(&endpoint)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("post to {endpoint}"))?;
    let status = response.status();
    let body = response.text().await?;
    info!(%status, "upload finished");
    println!("{body}");
    println!("{}", status.as_u16());
    if !status.is_success() {
        bail!("upload rejected with status {status}");
    }
    Ok(())
}
