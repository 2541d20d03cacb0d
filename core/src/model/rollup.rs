use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::entry::{EntryKind, TimesheetEntry};
use crate::time::{format_week_range, week_date_range};

// Sums shared by every bucket level. Project durations are accumulated for
// attendance entries only; key order carries no meaning.
#[derive(Serialize, Debug, Clone, Default)]
pub struct BucketTotals {
    pub duration: f64,
    pub attendance: f64,
    pub absence: f64,
    pub projects: HashMap<String, f64>,
}

impl BucketTotals {
    pub(crate) fn add(&mut self, entry: &TimesheetEntry) {
        self.duration += entry.duration;
        match entry.kind {
            EntryKind::Attendance => {
                self.attendance += entry.duration;
                *self.projects.entry(entry.project.clone()).or_insert(0.0) += entry.duration;
            }
            EntryKind::Absence => {
                self.absence += entry.duration;
            }
            EntryKind::Other => {}
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct YearBucket {
    pub year: i32,
    pub totals: BucketTotals,
}

#[derive(Serialize, Debug, Clone)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    // Lowercase English short name ("jan"), as the dashboards keyed months.
    pub name: String,
    pub totals: BucketTotals,
}

#[derive(Serialize, Debug, Clone)]
pub struct WeekBucket {
    pub week: i64,
    pub totals: BucketTotals,
}

// A day sits in exactly one week bucket and exactly one (year, month)
// bucket; the two hierarchies are independent groupings of the same days.
#[derive(Serialize, Debug, Clone)]
pub struct DayBucket {
    pub week: i64,
    pub date: NaiveDate,
    pub totals: BucketTotals,
}

// Full rollup for one user, all four levels in chronological order. Week
// numbers are 1-based and continuous from the week of the earliest entry,
// anchored at `first_week_monday`.
#[derive(Serialize, Debug, Clone)]
pub struct TimesheetRollup {
    pub years: Vec<YearBucket>,
    pub months: Vec<MonthBucket>,
    pub weeks: Vec<WeekBucket>,
    pub days: Vec<DayBucket>,
    pub first_week_monday: NaiveDate,
}

impl TimesheetRollup {
    /// Renders the Monday..Sunday calendar range of a week number, e.g.
    /// "Mon Jan 01 2024 - Sun Jan 07 2024".
    pub fn week_label(&self, week: i64) -> String {
        let (start, end) = week_date_range(self.first_week_monday, week);
        format_week_range(start, end)
    }
}
