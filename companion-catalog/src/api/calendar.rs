//! Calendar and timetable endpoints
//!
//! These read straight through to the back end on every call; nothing here
//! touches the catalog cache.

use axum::{extract::State, Json};

use super::credential::UpstreamCredential;
use super::error::ApiResult;
use crate::calendar::{ingest_calendar, ingest_schedule, CalendarEntry, ScheduledSession};
use crate::fetch::{decode_records, Resource};
use crate::records::{CalendarEventRecord, CourseScheduleRecord};
use crate::AppState;

/// GET /api/calendar
pub async fn get_calendar(
    State(state): State<AppState>,
    credential: UpstreamCredential,
) -> ApiResult<Json<Vec<CalendarEntry>>> {
    let items = state
        .fetcher
        .fetch(&state.base_url, Resource::Calendar, credential.as_deref())
        .await?;
    let records: Vec<CalendarEventRecord> = decode_records(Resource::Calendar, items)?;

    Ok(Json(ingest_calendar(&records)))
}

/// GET /api/schedule
pub async fn get_schedule(
    State(state): State<AppState>,
    credential: UpstreamCredential,
) -> ApiResult<Json<Vec<ScheduledSession>>> {
    let items = state
        .fetcher
        .fetch(&state.base_url, Resource::CourseSchedule, credential.as_deref())
        .await?;
    let records: Vec<CourseScheduleRecord> = decode_records(Resource::CourseSchedule, items)?;

    Ok(Json(ingest_schedule(&records)))
}
