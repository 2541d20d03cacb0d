use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::model::entry::TimesheetEntry;
use crate::model::rollup::{
    BucketTotals, DayBucket, MonthBucket, TimesheetRollup, WeekBucket, YearBucket,
};
use crate::time::{monday_of, month_short_name, week_number};

#[derive(Default)]
struct YearAcc {
    totals: BucketTotals,
    months: BTreeMap<u32, BucketTotals>,
}

#[derive(Default)]
struct WeekAcc {
    totals: BucketTotals,
    days: BTreeMap<NaiveDate, BucketTotals>,
}

/// Buckets entries into year/month/week/day rollups. Returns `None` for an
/// empty slice; callers surface that as the no-data outcome instead of an
/// aggregation over nothing.
///
/// Week numbering anchors at the Monday of the earliest entry date. The
/// earliest date is computed explicitly, so input order does not matter.
pub fn build_rollup(entries: &[TimesheetEntry]) -> Option<TimesheetRollup> {
    let reference = entries.iter().map(|e| e.date).min()?;
    let first_week_monday = monday_of(reference);

    // Two independent hierarchies over the same days: calendar (year ->
    // month) and continuous Monday-anchored weeks (week -> day).
    let mut years: BTreeMap<i32, YearAcc> = BTreeMap::new();
    let mut weeks: BTreeMap<i64, WeekAcc> = BTreeMap::new();

    for entry in entries {
        let week = week_number(entry.date, first_week_monday);

        let year_acc = years.entry(entry.date.year()).or_default();
        year_acc.totals.add(entry);
        year_acc
            .months
            .entry(entry.date.month())
            .or_default()
            .add(entry);

        let week_acc = weeks.entry(week).or_default();
        week_acc.totals.add(entry);
        week_acc.days.entry(entry.date).or_default().add(entry);
    }

    let mut year_items = Vec::new();
    let mut month_items = Vec::new();
    for (year, acc) in years {
        for (month, totals) in acc.months {
            month_items.push(MonthBucket {
                year,
                month,
                name: month_short_name(month).to_string(),
                totals,
            });
        }
        year_items.push(YearBucket {
            year,
            totals: acc.totals,
        });
    }

    let mut week_items = Vec::new();
    let mut day_items = Vec::new();
    for (week, acc) in weeks {
        for (date, totals) in acc.days {
            day_items.push(DayBucket { week, date, totals });
        }
        week_items.push(WeekBucket {
            week,
            totals: acc.totals,
        });
    }

    Some(TimesheetRollup {
        years: year_items,
        months: month_items,
        weeks: week_items,
        days: day_items,
        first_week_monday,
    })
}
