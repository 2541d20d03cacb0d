pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use model::entry::{EntryKind, TimesheetEntry};
pub use model::rollup::{
    BucketTotals, DayBucket, MonthBucket, TimesheetRollup, WeekBucket, YearBucket,
};
pub use repository::{EntryRepository, FileEntryRepository, StoredRecord};
pub use service::dashboard_data::{ChartData, DashboardDataService};
pub use usecase::rollup::build_rollup;
