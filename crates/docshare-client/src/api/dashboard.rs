//! Overview of the current user's documents.

use std::cmp::Reverse;
use std::collections::HashSet;

use docshare_core::Result;
use docshare_core::types::DocumentRef;

use crate::client::ApiClient;

/// Number of documents listed in [`DashboardSummary::recent`].
pub const RECENT_LIMIT: usize = 5;

/// Counts and recent activity shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    /// Number of documents owned by the current user.
    pub my_files_count: usize,
    /// Number of team-shared documents.
    pub team_files_count: usize,
    /// Combined size of the owned documents in bytes.
    pub total_size: u64,
    /// Most recently created documents, newest first.
    pub recent: Vec<DocumentRef>,
}

impl DashboardSummary {
    /// Builds the summary from both listings.
    ///
    /// Documents present in both lists are counted once in `recent`.
    /// Documents without a creation time sort last.
    pub fn from_listings(my_files: &[DocumentRef], team_files: &[DocumentRef]) -> Self {
        let total_size = my_files.iter().map(|doc| doc.file_size).sum();

        let mut seen = HashSet::new();
        let mut recent: Vec<DocumentRef> = my_files
            .iter()
            .chain(team_files)
            .filter(|doc| seen.insert(doc.id.clone()))
            .cloned()
            .collect();
        recent.sort_by_key(|doc| Reverse(doc.created_at));
        recent.truncate(RECENT_LIMIT);

        Self {
            my_files_count: my_files.len(),
            team_files_count: team_files.len(),
            total_size,
            recent,
        }
    }
}

impl ApiClient {
    /// Fetches both listings concurrently and summarizes them.
    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let (my_files, team_files) = tokio::try_join!(self.my_files(), self.team_files())?;
        Ok(DashboardSummary::from_listings(&my_files, &team_files))
    }
}
