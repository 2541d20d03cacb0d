use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::entry::{EntryKind, TimesheetEntry};
use crate::repository::traits::EntryRepository;
use crate::time::parse_entry_date;

const ENTRIES_FILE_NAME: &str = "worklog_entries.json";

// Raw store record, with `kind` and `date` as plain strings. Validation into
// a typed TimesheetEntry happens when records are loaded, so one bad row
// never fails a whole fetch.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoredRecord {
    pub user_id: String,
    pub kind: String,
    pub date: String,
    #[serde(default)]
    pub project: Option<String>,
    pub duration: f64,
}

impl StoredRecord {
    fn into_entry(self) -> Result<TimesheetEntry> {
        let date = parse_entry_date(&self.date)?;
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(anyhow!(
                "invalid duration {} for entry on {}",
                self.duration,
                self.date
            ));
        }
        Ok(TimesheetEntry {
            kind: EntryKind::from_label(&self.kind),
            date,
            project: self.project.unwrap_or_default(),
            duration: self.duration,
        })
    }
}

#[derive(Clone)]
pub struct FileEntryRepository {
    file_path: PathBuf,
}

impl FileEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".worklog")
            }
        };
        fs::create_dir_all(&path)?;
        path.push(ENTRIES_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<StoredRecord>::new())?;
            writer.flush()?;
        }

        Ok(FileEntryRepository { file_path: path })
    }

    fn read_records(&self) -> Result<Vec<StoredRecord>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records: Vec<StoredRecord> = serde_json::from_reader(reader)?;
        Ok(records)
    }

    fn write_records(&self, records: &[StoredRecord]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    pub fn append_record(&self, record: StoredRecord) -> Result<()> {
        let mut records = self.read_records()?;
        records.push(record);
        self.write_records(&records)
    }

    /// Sorted distinct user ids present in the store.
    pub fn list_users(&self) -> Result<Vec<String>> {
        let records = self.read_records()?;
        let users: BTreeSet<String> = records.into_iter().map(|r| r.user_id).collect();
        Ok(users.into_iter().collect())
    }
}

#[async_trait]
impl EntryRepository for FileEntryRepository {
    async fn fetch_entries(&self, user_id: &str) -> Result<Vec<TimesheetEntry>> {
        let records = self.read_records()?;

        let mut entries = Vec::new();
        for record in records.into_iter().filter(|r| r.user_id == user_id) {
            match record.into_entry() {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(user_id, error = %err, "skipping malformed timesheet record"),
            }
        }

        entries.sort_by_key(|e| e.date);
        Ok(entries)
    }
}
