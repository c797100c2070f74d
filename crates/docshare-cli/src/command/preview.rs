//! `preview`: fetch a document through its share link and show it.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;
use docshare_client::{ApiClient, PreviewView};
use docshare_core::types::{DocumentId, DocumentRef};

use super::documents::safe_file_name;
use super::output;
use crate::TRACING_TARGET_COMMAND;

/// Arguments of `preview`.
#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    /// Document identifier (requires login).
    #[arg(required_unless_present = "link", conflicts_with = "link")]
    pub id: Option<String>,
    /// Public share link or handle (no login needed).
    #[arg(long)]
    pub link: Option<String>,
    /// Also write the previewed bytes to this path.
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

pub async fn preview(client: &ApiClient, args: PreviewArgs) -> anyhow::Result<()> {
    let document = match (args.id, args.link) {
        (_, Some(link)) => DocumentRef::new("shared", "").with_sharing_handle(&link),
        (Some(id), None) => client
            .get_document(&DocumentId::new(id))
            .await
            .context("failed to load document")?,
        (None, None) => bail!("either a document id or --link is required"),
    };

    let view = PreviewView::new(client.clone());
    let result = show(&view, &document, args.save).await;
    view.close().await;
    result
}

async fn show(
    view: &PreviewView,
    document: &DocumentRef,
    save: Option<PathBuf>,
) -> anyhow::Result<()> {
    view.open(document).await.context("preview failed")?;

    let content = view
        .render()
        .await
        .context("preview closed before rendering")?
        .context("failed to render preview")?;
    print!("{}", output::preview(&content));

    if let Some(path) = save {
        let saved = view
            .with_ready(|_, resource| {
                let path = if path.is_dir() {
                    path.join(safe_file_name(resource.suggested_filename()))
                } else {
                    path
                };
                resource.bytes().map(|bytes| (path, bytes))
            })
            .await
            .flatten();

        let Some((path, bytes)) = saved else {
            bail!("preview content is no longer available");
        };

        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))?;

        tracing::debug!(
            target: TRACING_TARGET_COMMAND,
            path = %path.display(),
            size = bytes.len(),
            "Preview saved"
        );
        println!("Saved {} bytes to {}", bytes.len(), path.display());
    }

    Ok(())
}
