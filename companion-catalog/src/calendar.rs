//! Calendar and course schedule ingestion
//!
//! Converts raw calendar events and scheduled sessions into dated entries.
//! A record whose date cannot be normalized is skipped with a warning; the
//! rest of the batch is kept.

use chrono::NaiveDate;
use companion_common::{parse_date, IdList};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::records::{CalendarEventRecord, CourseScheduleRecord};

/// Characters of the session title used as a code of last resort
const TITLE_CODE_LEN: usize = 8;

/// Dated calendar entry (exam session, holiday, deadline)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Grouping key: owner reference, else owner type, else event code
    pub category: String,
    pub date: NaiveDate,
}

/// One timetable slot of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledSession {
    pub date: NaiveDate,
    pub week: i64,
    pub day_name: String,
    pub year_option: String,
    pub series: Vec<String>,
    pub course_code: String,
    pub course_name: String,
    pub start_time: String,
    pub end_time: String,
    pub teachers: Vec<String>,
    pub rooms: Vec<String>,
}

impl CalendarEntry {
    pub fn from_record(record: &CalendarEventRecord) -> companion_common::Result<Self> {
        let date = parse_date(&record.date)?;

        let mut description = format!("{} - {}", record.start_time, record.end_time);
        if let Some(owner_ref) = non_blank(record.owner_ref.as_deref()) {
            description.push_str("\nRef: ");
            description.push_str(owner_ref);
        }
        if let Some(group) = non_blank(record.group_code.as_deref()) {
            description.push_str("\nGroupe: ");
            description.push_str(group);
        }

        let category = record
            .owner_ref
            .as_deref()
            .or(record.owner_type.as_deref())
            .unwrap_or(&record.code)
            .to_string();

        let title = if record.title.trim().is_empty() {
            record.code.clone()
        } else {
            record.title.clone()
        };

        Ok(Self {
            id: format!("{}_{}", record.id, record.date),
            title,
            description,
            category,
            date,
        })
    }
}

impl ScheduledSession {
    pub fn from_record(record: &CourseScheduleRecord) -> companion_common::Result<Self> {
        let date = parse_date(&record.date)?;

        let mut series = parse_list_field(record.series_json.as_deref());
        if series.is_empty() {
            series.push(record.group_no.clone());
        }

        let course_code = non_blank(Some(record.course_raccourci_id.as_str()))
            .or_else(|| non_blank(record.sous_course_id.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| record.title.chars().take(TITLE_CODE_LEN).collect());

        Ok(Self {
            date,
            week: record.week,
            day_name: record.day_name.clone(),
            year_option: record.year_option_id.clone(),
            series,
            course_code,
            course_name: record.title.clone(),
            start_time: record.start_time.clone(),
            end_time: record.end_time.clone(),
            teachers: parse_list_field(record.teachers_json.as_deref()),
            rooms: IdList::parse(record.room_ids.as_deref()).into_vec(),
        })
    }
}

/// Convert calendar events, skipping undatable ones, sorted by date
pub fn ingest_calendar(records: &[CalendarEventRecord]) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = records
        .iter()
        .filter_map(|record| match CalendarEntry::from_record(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(id = record.id, date = %record.date, error = %e, "Skipping calendar event");
                None
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.date);
    debug!(received = records.len(), kept = entries.len(), "Ingested calendar");
    entries
}

/// Convert scheduled sessions, skipping undatable ones, sorted by date
pub fn ingest_schedule(records: &[CourseScheduleRecord]) -> Vec<ScheduledSession> {
    let mut sessions: Vec<ScheduledSession> = records
        .iter()
        .filter_map(|record| match ScheduledSession::from_record(record) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(id = record.id, date = %record.date, error = %e, "Skipping scheduled session");
                None
            }
        })
        .collect();

    sessions.sort_by_key(|session| session.date);
    debug!(received = records.len(), kept = sessions.len(), "Ingested schedule");
    sessions
}

/// JSON array of scalars, else a delimited identifier list
fn parse_list_field(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = non_blank(raw) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Err(_) => IdList::parse(Some(raw)).into_vec(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
