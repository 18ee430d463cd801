//! Raw record types returned by the REST back end
//!
//! One struct per resource, mirroring the JSON field names the back end
//! emits. Decoding is lenient: unknown fields are ignored, optional fields
//! default as documented on each field, scalar text fields accept numbers
//! and booleans as well as strings, and numeric fields that do not parse
//! decode as absent rather than failing the whole resource.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Language assumed when a record does not carry one
pub const DEFAULT_LANGUAGE: &str = "fr";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Course row (`/api/courses`)
///
/// Several rows may share a `course_id` (one per formation the course is
/// taught in); the first row is canonical. `blocId` and `formationId` are
/// numeric foreign keys on the wire and are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(deserialize_with = "required_string")]
    pub course_id: String,
    #[serde(deserialize_with = "required_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub credits: Option<i64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub mandatory: bool,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub bloc_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub formation_id: Option<String>,
    #[serde(default = "default_language", deserialize_with = "lenient_language")]
    pub language: String,
}

/// Course detail sheet (`/api/course-details`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailsRecord {
    #[serde(deserialize_with = "required_string")]
    pub course_id: String,
    /// Responsible teacher identifier list (usually a single id)
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub responsable: Option<String>,
    /// Delimited formation identifiers
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub formation_ids: Option<String>,
    #[serde(default, rename = "hoursQ1", deserialize_with = "lenient_opt_string")]
    pub hours_q1: Option<String>,
    #[serde(default, rename = "hoursQ2", deserialize_with = "lenient_opt_string")]
    pub hours_q2: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub contribution: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub learning_outcomes: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub teaching_methods: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub evaluation_methods: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub course_material: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub bibliography: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub bloc_id: Option<String>,
}

/// Sub-course, the source of organized activities (`/api/sous-courses`)
///
/// Hours arrive as integers and are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCourseRecord {
    #[serde(deserialize_with = "required_string")]
    pub sous_course_id: String,
    #[serde(deserialize_with = "required_string")]
    pub course_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, rename = "hoursQ1", deserialize_with = "lenient_string")]
    pub hours_q1: String,
    #[serde(default, rename = "hoursQ2", deserialize_with = "lenient_string")]
    pub hours_q2: String,
    /// Delimited teacher identifiers
    #[serde(default, deserialize_with = "lenient_string")]
    pub teachers_ids: String,
    #[serde(default = "default_language", deserialize_with = "lenient_language")]
    pub language: String,
}

/// Evaluated activity (`/api/course-evaluations`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    #[serde(deserialize_with = "required_string")]
    pub evaluated_activity_id: String,
    #[serde(deserialize_with = "required_string")]
    pub course_id: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
    #[serde(default, rename = "typeQ1", deserialize_with = "lenient_opt_string")]
    pub type_q1: Option<String>,
    #[serde(default, rename = "typeQ2", deserialize_with = "lenient_opt_string")]
    pub type_q2: Option<String>,
    #[serde(default, rename = "typeQ3", deserialize_with = "lenient_opt_string")]
    pub type_q3: Option<String>,
    /// Delimited identifiers of the sub-courses this evaluation covers
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sous_course_ids: Option<String>,
    /// Delimited teacher identifiers
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub teachers_ids: Option<String>,
}

/// Professor (`/api/professors`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorRecord {
    #[serde(deserialize_with = "required_string")]
    pub professor_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
}

impl ProfessorRecord {
    /// `"LAST First"`, or the professor identifier when both names are blank
    pub fn display_name(&self) -> String {
        let last = Some(self.last_name.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase);
        let first = Some(self.first_name.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let name = [last, first]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.professor_id.clone()
        } else {
            name
        }
    }
}

/// Block of a study programme (`/api/blocs`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    #[serde(deserialize_with = "required_string")]
    pub bloc_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// Formation, i.e. study programme (`/api/formations`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationRecord {
    #[serde(deserialize_with = "required_string")]
    pub formation_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// Calendar event (`/api/calendar`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "required_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub group_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub owner_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub owner_ref: Option<String>,
}

/// Scheduled course session (`/api/course-schedule`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseScheduleRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_week")]
    pub week: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year_option_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group_no: String,
    /// JSON array or delimited list of series
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub series_json: Option<String>,
    #[serde(deserialize_with = "required_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub day_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course_raccourci_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// JSON array or delimited list of teachers
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub teachers_json: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub room_ids: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sous_course_id: Option<String>,
}

/// Text of a scalar: strings as-is, numbers and booleans in their JSON form.
///
/// Null, arrays and objects have no text.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_language<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?
        .filter(|language| !language.trim().is_empty())
        .unwrap_or_else(default_language))
}

/// Identifiers and other fields a record is useless without
fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).ok_or_else(|| D::Error::custom("expected a string or number"))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "oui"),
        _ => false,
    };
    Ok(flag)
}

/// Number or numeric string; anything else is treated as absent.
///
/// A decimal comma (`"12,5"`) is accepted.
fn lenient_number(value: Option<Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(Option::<Value>::deserialize(deserializer)?))
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(Option::<Value>::deserialize(deserializer)?)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64))
}

fn lenient_week<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.unwrap_or_default())
}
