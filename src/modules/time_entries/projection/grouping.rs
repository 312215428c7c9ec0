// Grouping engine: flat holders in, display rows out.
//
// Rules
// - Single: every holder is its own row.
// - ByDateAndTask: neighbouring holders (input is newest first) with the same local date, project,
//   task, description and billable flag collapse into one group. A running holder never shares a
//   group with a stopped one.
// - Date headers go once per day, right before that day's rows, carrying the day's total
//   (running estimate included) and whether anything in it is running.
//
// Round trip
// - ungroup(group(s)) returns the holders of `s` in their original order.
//
// Group identity
// - Signature plus the id of the run's oldest entry. Newer entries joining or leaving a run keep
//   its identity, and so do other runs of the same day.

use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::projection::holders::{
    DateHolder, DisplayRow, GroupKey, GroupSignature, TimeEntryGroup, TimeEntryHolder,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupMethod {
    Single,
    #[default]
    ByDateAndTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEntryGrouper {
    method: GroupMethod,
    offset: FixedOffset,
}

impl TimeEntryGrouper {
    pub fn new(method: GroupMethod, offset: FixedOffset) -> Self {
        Self { method, offset }
    }

    pub fn group(&self, holders: Vec<TimeEntryHolder>) -> Vec<DisplayRow> {
        match self.method {
            GroupMethod::Single => holders.into_iter().map(DisplayRow::Entry).collect(),
            GroupMethod::ByDateAndTask => self.group_by_date_and_task(holders),
        }
    }

    /// Date rows carry no holders and are dropped.
    pub fn ungroup(&self, rows: Vec<DisplayRow>) -> Vec<TimeEntryHolder> {
        rows.into_iter()
            .flat_map(|row| match row {
                DisplayRow::Date(_) => Vec::new(),
                DisplayRow::Entry(holder) => vec![holder],
                DisplayRow::Group(group) => group.entries,
            })
            .collect()
    }

    fn group_by_date_and_task(&self, holders: Vec<TimeEntryHolder>) -> Vec<DisplayRow> {
        let mut runs: Vec<(GroupSignature, Vec<TimeEntryHolder>)> = Vec::new();

        for holder in holders {
            let signature = GroupSignature::of(&holder, self.offset);
            match runs.last_mut() {
                Some((current, entries)) if *current == signature => entries.push(holder),
                _ => runs.push((signature, vec![holder])),
            }
        }

        runs.into_iter()
            .filter_map(|(signature, entries)| {
                let anchor = entries.last()?.record.id.clone();
                Some(DisplayRow::Group(TimeEntryGroup {
                    key: GroupKey { signature, anchor },
                    entries,
                }))
            })
            .collect()
    }

    /// Rows of one day must be contiguous, which holds for newest-first input.
    pub fn with_date_headers(&self, rows: Vec<DisplayRow>) -> Vec<DisplayRow> {
        let rows: Vec<DisplayRow> = rows
            .into_iter()
            .filter(|row| !matches!(row, DisplayRow::Date(_)))
            .collect();

        let mut sectioned = Vec::with_capacity(rows.len() + rows.len() / 4 + 1);
        for day in rows.chunk_by(|a, b| a.local_date(self.offset) == b.local_date(self.offset)) {
            let Some(first) = day.first() else {
                continue;
            };
            sectioned.push(DisplayRow::Date(DateHolder {
                date: first.local_date(self.offset),
                duration: day.iter().map(DisplayRow::duration).sum(),
                is_running: day.iter().any(DisplayRow::is_running),
            }));
            sectioned.extend(day.iter().cloned());
        }
        sectioned
    }
}

/// Full log projection of a state: visible records newest first, grouped, with date headers.
pub fn project_log(state: &AppState) -> Vec<DisplayRow> {
    let mut records: Vec<_> = state.time_entries.live().collect();
    records.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.id.cmp(&a.id)));

    let holders = records
        .into_iter()
        .map(|r| TimeEntryHolder::new(r.clone(), &state.reference, state.time_entries.now))
        .collect();

    let grouper = TimeEntryGrouper::new(state.settings.group_method, state.settings.utc_offset);
    grouper.with_date_headers(grouper.group(holders))
}
