//! Plain-text rendering of command results.

use std::collections::BTreeSet;
use std::fmt::Write;

use docshare_client::{DashboardSummary, PreviewContent};
use docshare_core::preview::{CsvTable, format_file_size};
use docshare_core::types::{DocumentRef, Role, SessionIdentity, UserAccount};

/// Renders rows as left-aligned columns separated by two spaces.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = line(&widths, headers.iter().copied());
    out.push('\n');
    for row in rows {
        out.push_str(&line(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out
}

/// Renders a document listing.
pub fn documents(documents: &[DocumentRef]) -> String {
    if documents.is_empty() {
        return "No documents found.\n".to_owned();
    }

    let rows: Vec<Vec<String>> = documents
        .iter()
        .map(|doc| {
            vec![
                doc.id.to_string(),
                doc.name.clone(),
                doc.file_type.clone().unwrap_or_default(),
                format_file_size(doc.file_size),
                doc.owner.clone().unwrap_or_default(),
                flag(doc.team_shared),
                doc.created_at
                    .map(|ts| ts.strftime("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    table(
        &["ID", "NAME", "TYPE", "SIZE", "OWNER", "TEAM", "CREATED"],
        &rows,
    )
}

/// Renders the details of one document.
pub fn document(doc: &DocumentRef) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", doc.id);
    let _ = writeln!(out, "Name:        {}", doc.name);
    if let Some(description) = doc.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "Description: {description}");
    }
    let _ = writeln!(out, "File:        {}", doc.display_file_name());
    if let Some(file_type) = &doc.file_type {
        let _ = writeln!(out, "Type:        {file_type}");
    }
    let _ = writeln!(out, "Size:        {}", format_file_size(doc.file_size));
    if let Some(owner) = &doc.owner {
        let _ = writeln!(out, "Owner:       {owner}");
    }
    let _ = writeln!(out, "Team shared: {}", flag(doc.team_shared));
    let _ = writeln!(
        out,
        "Share link:  {}",
        doc.sharing_handle
            .as_ref()
            .map_or_else(|| "none".to_owned(), ToString::to_string)
    );
    out
}

/// Renders a user listing.
pub fn users(users: &[UserAccount]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_owned();
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.to_string(),
                user.username.clone(),
                user.email.clone(),
                full_name(user.first_name.as_deref(), user.last_name.as_deref()),
                roles(&user.roles),
                flag(user.active),
            ]
        })
        .collect();

    table(&["ID", "USERNAME", "EMAIL", "NAME", "ROLES", "ACTIVE"], &rows)
}

/// Renders the current identity.
pub fn identity(identity: &SessionIdentity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Username: {}", identity.username);
    if let Some(email) = &identity.email {
        let _ = writeln!(out, "Email:    {email}");
    }
    let name = full_name(identity.first_name.as_deref(), identity.last_name.as_deref());
    if !name.is_empty() {
        let _ = writeln!(out, "Name:     {name}");
    }
    let _ = writeln!(out, "Role:     {}", identity.role_label());
    out
}

/// Renders the dashboard summary.
pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "My files:   {}", summary.my_files_count);
    let _ = writeln!(out, "Team files: {}", summary.team_files_count);
    let _ = writeln!(out, "Total size: {}", format_file_size(summary.total_size));
    out.push('\n');
    out.push_str("Recent files:\n");
    out.push_str(&documents(&summary.recent));
    out
}

/// Renders a CSV preview with its truncation notice.
pub fn csv(table_data: &CsvTable) -> String {
    let headers: Vec<&str> = table_data.headers.iter().map(String::as_str).collect();
    let mut out = table(&headers, &table_data.rows);
    if let Some(notice) = table_data.truncation_notice() {
        let _ = writeln!(out, "\n{notice}");
    }
    out
}

/// Renders preview content for the terminal.
pub fn preview(content: &PreviewContent) -> String {
    let mut out = String::new();
    match content {
        PreviewContent::Text { file_name, text } => {
            let _ = writeln!(out, "── {file_name} ──");
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        PreviewContent::Csv { file_name, table } => {
            let _ = writeln!(out, "── {file_name} ──");
            out.push_str(&csv(table));
        }
        PreviewContent::Image { alt, .. } => {
            let _ = writeln!(out, "Image: {alt}");
            out.push_str(SAVE_HINT);
        }
        PreviewContent::Pdf { title, .. } => {
            let _ = writeln!(out, "PDF document: {title}");
            out.push_str(SAVE_HINT);
        }
        PreviewContent::Audio { mime, .. } => {
            let _ = writeln!(out, "Audio ({mime})");
            out.push_str(SAVE_HINT);
        }
        PreviewContent::Video { mime, .. } => {
            let _ = writeln!(out, "Video ({mime})");
            out.push_str(SAVE_HINT);
        }
        PreviewContent::Office(info) => {
            let _ = writeln!(out, "{}", info.kind);
            let _ = writeln!(out, "File: {}", info.file_name);
            let _ = writeln!(out, "Size: {}", info.size);
            out.push_str("This document cannot be previewed here; use --save to download it.\n");
        }
        PreviewContent::Unsupported { name, mime, size } => {
            out.push_str("Preview not available for this file type.\n");
            let _ = writeln!(out, "File: {name}");
            let _ = writeln!(out, "Type: {mime}");
            let _ = writeln!(out, "Size: {size}");
        }
    }
    out
}

fn line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (index, cell) in cells.enumerate() {
        let width = widths.get(index).copied().unwrap_or_default();
        let _ = write!(out, "{cell:<width$}  ");
    }
    out.trim_end().to_owned()
}

const SAVE_HINT: &str = "Use --save <PATH> to write the content to a file.\n";

fn flag(value: bool) -> String {
    String::from(if value { "yes" } else { "no" })
}

fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn roles(roles: &BTreeSet<Role>) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use docshare_client::preview::{OfficeInfo, OfficeKind};

    use super::*;

    #[test]
    fn test_table_alignment() {
        let out = table(
            &["ID", "NAME"],
            &[vec!["1".into(), "alpha".into()], vec!["22".into(), "b".into()]],
        );
        assert_eq!(out, "ID  NAME\n1   alpha\n22  b\n");
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(documents(&[]), "No documents found.\n");
    }

    #[test]
    fn test_document_listing_sizes() {
        let doc = DocumentRef::new(3u64, "Report").with_file_size(1536);
        let out = documents(&[doc]);
        assert!(out.contains("1.5 KB"));
        assert!(out.starts_with("ID"));
    }

    #[test]
    fn test_csv_notice() {
        let mut text = String::from("a,b\n");
        for i in 0..60 {
            text.push_str(&format!("{i},{i}\n"));
        }
        let out = csv(&CsvTable::parse(&text, 50));
        assert!(out.ends_with("Showing first 50 rows of 60 total rows\n"));
    }

    #[test]
    fn test_office_preview() {
        let out = preview(&PreviewContent::Office(OfficeInfo {
            kind: OfficeKind::Excel,
            file_name: "budget.xlsx".into(),
            url: "blob:docshare/x".into(),
            mime: "application/vnd.ms-excel".into(),
            size: "2 KB".into(),
        }));
        assert!(out.starts_with("Microsoft Excel Spreadsheet\n"));
        assert!(out.contains("budget.xlsx"));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
        assert_eq!(full_name(None, Some("")), "");
    }
}
