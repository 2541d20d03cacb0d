use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Attendance,
    Absence,
    // Anything the backend reports outside the two known kinds. Such entries
    // count toward total duration only.
    Other,
}

impl EntryKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Attendance" => EntryKind::Attendance,
            "Absence" => EntryKind::Absence,
            _ => EntryKind::Other,
        }
    }
}

// One dated duration record for a single user. `date` is a plain calendar
// day; every comparison and arithmetic step downstream stays on NaiveDate so
// no timezone conversion can shift a day boundary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimesheetEntry {
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub project: String,
    pub duration: f64,
}

impl TimesheetEntry {
    pub fn new(kind: EntryKind, date: NaiveDate, project: impl Into<String>, duration: f64) -> Self {
        Self {
            kind,
            date,
            project: project.into(),
            duration,
        }
    }
}
