// Display rows of the time entry log.
//
// Row kinds
// - TimeEntryHolder: one record plus the names and colors it points at.
// - TimeEntryGroup: a run of holders sharing date, project, task, description and billable flag.
// - DateHolder: section summary for one calendar day.
//
// Identity
// - Holder: record id. Group: grouping key. Date: the day. RowIdentity keeps the kind in the
//   identity so rows of different kinds never match.

use crate::modules::time_entries::core::record::TimeEntryRecord;
use crate::modules::time_entries::core::reference::ReferenceData;
use crate::shared::core::diffable::Diffable;
use crate::shared::core::primitives::EntityId;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Names and colors joined in at projection time so rows never resolve foreign keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntryInfo {
    pub workspace_name: Option<String>,
    pub project_name: Option<String>,
    pub project_color: Option<u32>,
    pub client_name: Option<String>,
    pub task_name: Option<String>,
}

impl TimeEntryInfo {
    pub fn resolve(record: &TimeEntryRecord, reference: &ReferenceData) -> Self {
        let project = record
            .project_id
            .as_ref()
            .and_then(|id| reference.projects.get(id));
        let client = project
            .and_then(|p| p.client_id.as_ref())
            .and_then(|id| reference.clients.get(id));
        Self {
            workspace_name: reference
                .workspaces
                .get(&record.workspace_id)
                .map(|w| w.name.clone()),
            project_name: project.map(|p| p.name.clone()),
            project_color: project.map(|p| p.color),
            client_name: client.map(|c| c.name.clone()),
            task_name: record
                .task_id
                .as_ref()
                .and_then(|id| reference.tasks.get(id))
                .map(|t| t.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntryHolder {
    pub record: TimeEntryRecord,
    pub info: TimeEntryInfo,
    /// Elapsed seconds at projection time; running entries include the estimate up to `now`.
    pub duration: i64,
}

impl TimeEntryHolder {
    pub fn new(record: TimeEntryRecord, reference: &ReferenceData, now: DateTime<Utc>) -> Self {
        let info = TimeEntryInfo::resolve(&record, reference);
        let duration = record.elapsed_seconds(now);
        Self {
            record,
            info,
            duration,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.record.start
    }

    pub fn is_running(&self) -> bool {
        self.record.is_running()
    }
}

/// Everything two neighbouring holders must share to be merged into one group.
///
/// `running` belongs to it: a running entry never merges with stopped ones, so stopping one changes
/// its group identity and the list sees a remove plus an insert rather than an update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupSignature {
    pub date: NaiveDate,
    pub project_id: Option<EntityId>,
    pub task_id: Option<EntityId>,
    pub description: String,
    pub billable: bool,
    pub running: bool,
}

impl GroupSignature {
    pub fn of(holder: &TimeEntryHolder, offset: FixedOffset) -> Self {
        let record = &holder.record;
        Self {
            date: record.local_date(offset),
            project_id: record.project_id.clone(),
            task_id: record.task_id.clone(),
            description: record.description.clone(),
            billable: record.billable,
            running: record.is_running(),
        }
    }
}

/// `anchor` is the id of the run's oldest entry, which separates runs with the same signature on
/// the same day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub signature: GroupSignature,
    pub anchor: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntryGroup {
    pub key: GroupKey,
    /// Constituents in their original relative order.
    pub entries: Vec<TimeEntryHolder>,
}

impl TimeEntryGroup {
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(TimeEntryHolder::id).collect()
    }

    pub fn duration(&self) -> i64 {
        self.entries.iter().map(|e| e.duration).sum()
    }

    pub fn is_running(&self) -> bool {
        self.entries.iter().any(TimeEntryHolder::is_running)
    }

    /// Most recently started constituent; the earliest listed wins a tie.
    pub fn representative(&self) -> Option<&TimeEntryHolder> {
        self.entries
            .iter()
            .reduce(|best, e| if e.start() > best.start() { e } else { best })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHolder {
    pub date: NaiveDate,
    pub duration: i64,
    pub is_running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    Date(DateHolder),
    Entry(TimeEntryHolder),
    Group(TimeEntryGroup),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowIdentity {
    Date(NaiveDate),
    Entry(EntityId),
    Group(GroupKey),
}

impl DisplayRow {
    pub fn duration(&self) -> i64 {
        match self {
            DisplayRow::Date(date) => date.duration,
            DisplayRow::Entry(holder) => holder.duration,
            DisplayRow::Group(group) => group.duration(),
        }
    }

    pub fn is_running(&self) -> bool {
        match self {
            DisplayRow::Date(date) => date.is_running,
            DisplayRow::Entry(holder) => holder.is_running(),
            DisplayRow::Group(group) => group.is_running(),
        }
    }

    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        match self {
            DisplayRow::Date(date) => date.date,
            DisplayRow::Entry(holder) => holder.record.local_date(offset),
            DisplayRow::Group(group) => group.key.signature.date,
        }
    }
}

impl Diffable for TimeEntryHolder {
    type Identity = EntityId;

    fn identity(&self) -> EntityId {
        self.record.id.clone()
    }

    fn same_content_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl Diffable for TimeEntryGroup {
    type Identity = GroupKey;

    fn identity(&self) -> GroupKey {
        self.key.clone()
    }

    fn same_content_as(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Diffable for DateHolder {
    type Identity = NaiveDate;

    fn identity(&self) -> NaiveDate {
        self.date
    }

    fn same_content_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl Diffable for DisplayRow {
    type Identity = RowIdentity;

    fn identity(&self) -> RowIdentity {
        match self {
            DisplayRow::Date(date) => RowIdentity::Date(date.identity()),
            DisplayRow::Entry(holder) => RowIdentity::Entry(holder.identity()),
            DisplayRow::Group(group) => RowIdentity::Group(group.identity()),
        }
    }

    fn same_content_as(&self, other: &Self) -> bool {
        match (self, other) {
            (DisplayRow::Date(a), DisplayRow::Date(b)) => a.same_content_as(b),
            (DisplayRow::Entry(a), DisplayRow::Entry(b)) => a.same_content_as(b),
            (DisplayRow::Group(a), DisplayRow::Group(b)) => a.same_content_as(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod holders_tests {
    use super::*;
    use crate::modules::time_entries::core::reference::{ClientData, ProjectData, TaskData};
    use crate::tests::fixtures::records::{TimeEntryRecordBuilder, at};
    use chrono::Offset;
    use rstest::rstest;

    #[rstest]
    fn it_should_join_reference_names() {
        let mut reference = ReferenceData::default();
        reference.projects.insert(
            "p-1".into(),
            ProjectData {
                id: "p-1".into(),
                workspace_id: "ws-1".into(),
                client_id: Some("c-1".into()),
                name: "Website".into(),
                color: 3,
            },
        );
        reference.clients.insert(
            "c-1".into(),
            ClientData {
                id: "c-1".into(),
                workspace_id: "ws-1".into(),
                name: "Acme".into(),
            },
        );
        reference.tasks.insert(
            "t-1".into(),
            TaskData {
                id: "t-1".into(),
                project_id: "p-1".into(),
                name: "Design".into(),
            },
        );
        let record = TimeEntryRecordBuilder::new()
            .project_id("p-1")
            .task_id("t-1")
            .build();
        let info = TimeEntryInfo::resolve(&record, &reference);
        assert_eq!(info.project_name.as_deref(), Some("Website"));
        assert_eq!(info.project_color, Some(3));
        assert_eq!(info.client_name.as_deref(), Some("Acme"));
        assert_eq!(info.task_name.as_deref(), Some("Design"));
        assert_eq!(info.workspace_name, None);
    }

    #[rstest]
    fn it_should_discriminate_row_kinds_in_identity() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let date = DisplayRow::Date(DateHolder {
            date: day,
            duration: 0,
            is_running: false,
        });
        let holder = TimeEntryHolder::new(
            TimeEntryRecordBuilder::new().id("2024-01-01").build(),
            &ReferenceData::default(),
            at("2024-01-01T00:00:00Z"),
        );
        let entry = DisplayRow::Entry(holder);
        assert!(!date.same_identity_as(&entry));
        assert!(!date.same_content_as(&entry));
    }

    #[rstest]
    fn it_should_pick_the_most_recent_representative() {
        let reference = ReferenceData::default();
        let now = at("2024-01-01T12:00:00Z");
        let older = TimeEntryHolder::new(
            TimeEntryRecordBuilder::new()
                .id("a")
                .start(at("2024-01-01T08:00:00Z"))
                .build(),
            &reference,
            now,
        );
        let newer = TimeEntryHolder::new(
            TimeEntryRecordBuilder::new()
                .id("b")
                .start(at("2024-01-01T10:00:00Z"))
                .build(),
            &reference,
            now,
        );
        let group = TimeEntryGroup {
            key: GroupKey {
                signature: GroupSignature::of(&older, chrono::Utc.fix()),
                anchor: "a".into(),
            },
            entries: vec![older, newer],
        };
        assert_eq!(group.representative().map(TimeEntryHolder::id), Some("b"));
        assert_eq!(group.ids(), vec!["a", "b"]);
    }
}
