//! Document commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use docshare_client::{ApiClient, DownloadedFile, UploadDocument};
use docshare_core::types::{DocumentId, DocumentUpdate, ShareRequest, UploadMetadata};

use super::prompt::confirm;
use super::{EditArgs, UploadArgs, output};
use crate::TRACING_TARGET_COMMAND;

pub async fn dashboard(client: &ApiClient) -> anyhow::Result<()> {
    let summary = client.dashboard().await.context("failed to load dashboard")?;
    print!("{}", output::dashboard(&summary));
    Ok(())
}

pub async fn my_files(client: &ApiClient) -> anyhow::Result<()> {
    let documents = client
        .visible_files()
        .await
        .context("failed to list your files")?;
    print!("{}", output::documents(&documents));
    Ok(())
}

pub async fn team_files(client: &ApiClient) -> anyhow::Result<()> {
    let documents = client
        .visible_team_files()
        .await
        .context("failed to list team files")?;
    print!("{}", output::documents(&documents));
    Ok(())
}

pub async fn search(client: &ApiClient, query: &str) -> anyhow::Result<()> {
    let documents = client.search(query).await.context("search failed")?;
    print!("{}", output::documents(&documents));
    Ok(())
}

pub async fn show(client: &ApiClient, id: String) -> anyhow::Result<()> {
    let document = client
        .get_document(&DocumentId::new(id))
        .await
        .context("failed to load document")?;
    print!("{}", output::document(&document));
    Ok(())
}

pub async fn upload(client: &ApiClient, args: UploadArgs) -> anyhow::Result<()> {
    let mut upload = UploadDocument::from_path(&args.path)
        .await
        .context("failed to read file")?
        .with_metadata(UploadMetadata {
            name: args.name,
            description: args.description,
            team_shared: args.team,
        });
    if let Some(content_type) = args.content_type {
        upload = upload.with_content_type(content_type);
    }

    let document = client.upload(upload).await.context("upload failed")?;
    println!("Uploaded '{}' (id {}).", document.name, document.id);
    Ok(())
}

pub async fn download(
    client: &ApiClient,
    id: String,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let document = client
        .get_document(&DocumentId::new(id))
        .await
        .context("failed to load document")?;
    let file = client
        .download(&document)
        .await
        .context("download failed")?;
    save(file, output).await
}

pub async fn shared_download(
    client: &ApiClient,
    link: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let file = client
        .shared_download(link)
        .await
        .context("download failed")?;
    save(file, output).await
}

pub async fn share(
    client: &ApiClient,
    id: String,
    users: &str,
    team: bool,
) -> anyhow::Result<()> {
    let id = DocumentId::new(id);
    let request = ShareRequest::from_user_list(id.clone(), users, team);
    let document = client
        .share(&id, &request)
        .await
        .context("failed to update sharing")?;

    println!("Sharing updated for '{}'.", document.name);
    if let Some(handle) = &document.sharing_handle {
        println!("Share link handle: {handle}");
    }
    Ok(())
}

pub async fn edit(client: &ApiClient, args: EditArgs) -> anyhow::Result<()> {
    let id = DocumentId::new(args.id);
    let current = client
        .get_document(&id)
        .await
        .context("failed to load document")?;

    let mut update = DocumentUpdate::from(&current);
    if let Some(name) = args.name {
        update.name = name;
    }
    if let Some(description) = args.description {
        update.description = description;
    }
    if let Some(team) = args.team {
        update.team_shared = team;
    }

    let document = client
        .update_document(&id, &update)
        .await
        .context("failed to update document")?;
    println!("Updated '{}'.", document.name);
    Ok(())
}

pub async fn delete(client: &ApiClient, id: String, yes: bool) -> anyhow::Result<()> {
    let id = DocumentId::new(id);
    if !confirm(
        &format!("Are you sure you want to delete document {id}?"),
        yes,
    )? {
        println!("Aborted.");
        return Ok(());
    }

    client
        .delete_document(&id)
        .await
        .context("failed to delete document")?;
    println!("Deleted document {id}.");
    Ok(())
}

/// Writes a downloaded file to `output`, or to its suggested name.
async fn save(file: DownloadedFile, output: Option<PathBuf>) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| safe_file_name(&file.filename));
    tokio::fs::write(&path, &file.bytes)
        .await
        .with_context(|| format!("failed to write '{}'", path.display()))?;

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        path = %path.display(),
        size = file.bytes.len(),
        "File saved"
    );
    println!("Saved {} bytes to {}", file.bytes.len(), path.display());
    Ok(())
}

/// Keeps only the last component of a server-supplied name.
pub(super) fn safe_file_name(name: &str) -> PathBuf {
    Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(docshare_core::preview::PLACEHOLDER_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_strips_directories() {
        assert_eq!(safe_file_name("../../etc/passwd"), PathBuf::from("passwd"));
        assert_eq!(safe_file_name("report.pdf"), PathBuf::from("report.pdf"));
        assert_eq!(safe_file_name(".."), PathBuf::from("file"));
    }

    #[tokio::test]
    async fn test_save_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let file = DownloadedFile {
            bytes: b"abc".to_vec().into(),
            filename: "ignored.bin".into(),
            content_type: None,
        };

        save(file, Some(target.clone())).await.unwrap();
        assert_eq!(std::fs::read(target).unwrap(), b"abc");
    }
}
