use crate::model::entry::TimesheetEntry;
use anyhow::Result;
use async_trait::async_trait;

/// Record-fetch collaborator: returns all timesheet entries for one user.
/// Implementations own transport and validation; the service layer only
/// assumes the returned entries are well formed.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn fetch_entries(&self, user_id: &str) -> Result<Vec<TimesheetEntry>>;
}
