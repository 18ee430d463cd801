//! Catalog join
//!
//! Denormalizes the seven independently fetched record sets into one
//! [`CourseDetailView`] per distinct course id.
//!
//! # Algorithm
//! 1. Group sub-courses, evaluations and detail sheets by owning course id,
//!    index sub-courses by their own id, and group course rows by id
//!    (first row canonical).
//! 2. Build professor, block and formation name lookups.
//! 3. For each course id, assemble activities, program, hours, bloc,
//!    responsible teacher and sections.
//! 4. Return views sorted ascending by course code.
//!
//! The join is pure and never fails: missing relations degrade to empty
//! lists or absent fields, unresolved names pass through as raw ids, and
//! unresolved sub-course links are dropped.

use std::collections::{BTreeMap, HashMap};

use companion_common::display::{format_hours, format_weight, join_with_and};
use companion_common::IdList;
use tracing::debug;

use crate::names::NameLookup;
use crate::records::{
    BlockRecord, CourseDetailsRecord, CourseRecord, EvaluationRecord, FormationRecord,
    ProfessorRecord, SubCourseRecord,
};
use crate::views::{CourseDetailView, EvaluatedActivity, OrganizedActivity, SectionKind, SectionMap};

/// The seven record sets a catalog is built from
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    pub courses: Vec<CourseRecord>,
    pub details: Vec<CourseDetailsRecord>,
    pub sub_courses: Vec<SubCourseRecord>,
    pub evaluations: Vec<EvaluationRecord>,
    pub professors: Vec<ProfessorRecord>,
    pub blocks: Vec<BlockRecord>,
    pub formations: Vec<FormationRecord>,
}

/// Per-resource record counts, reported with every snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SourceCounts {
    pub courses: usize,
    pub details: usize,
    pub sub_courses: usize,
    pub evaluations: usize,
    pub professors: usize,
    pub blocks: usize,
    pub formations: usize,
}

impl CatalogSources {
    pub fn counts(&self) -> SourceCounts {
        SourceCounts {
            courses: self.courses.len(),
            details: self.details.len(),
            sub_courses: self.sub_courses.len(),
            evaluations: self.evaluations.len(),
            professors: self.professors.len(),
            blocks: self.blocks.len(),
            formations: self.formations.len(),
        }
    }
}

/// Indices and lookups shared by every course of one join
struct JoinContext<'a> {
    sub_courses_by_course: HashMap<&'a str, Vec<&'a SubCourseRecord>>,
    sub_course_by_id: HashMap<&'a str, &'a SubCourseRecord>,
    evaluations_by_course: HashMap<&'a str, Vec<&'a EvaluationRecord>>,
    details_by_course: HashMap<&'a str, &'a CourseDetailsRecord>,
    professors: NameLookup,
    blocks: NameLookup,
    formations: NameLookup,
}

impl<'a> JoinContext<'a> {
    fn new(sources: &'a CatalogSources) -> Self {
        let mut sub_courses_by_course: HashMap<&str, Vec<&SubCourseRecord>> = HashMap::new();
        let mut sub_course_by_id: HashMap<&str, &SubCourseRecord> = HashMap::new();
        for sub in &sources.sub_courses {
            sub_courses_by_course
                .entry(sub.course_id.as_str())
                .or_default()
                .push(sub);
            sub_course_by_id.entry(sub.sous_course_id.as_str()).or_insert(sub);
        }

        let mut evaluations_by_course: HashMap<&str, Vec<&EvaluationRecord>> = HashMap::new();
        for evaluation in &sources.evaluations {
            evaluations_by_course
                .entry(evaluation.course_id.as_str())
                .or_default()
                .push(evaluation);
        }

        // First detail sheet wins when a course has several
        let mut details_by_course: HashMap<&str, &CourseDetailsRecord> = HashMap::new();
        for detail in &sources.details {
            details_by_course.entry(detail.course_id.as_str()).or_insert(detail);
        }

        Self {
            sub_courses_by_course,
            sub_course_by_id,
            evaluations_by_course,
            details_by_course,
            professors: NameLookup::professors(&sources.professors),
            blocks: NameLookup::blocks(&sources.blocks),
            formations: NameLookup::formations(&sources.formations),
        }
    }

    fn build_view(&self, course_id: &str, entries: &[&CourseRecord]) -> Option<CourseDetailView> {
        let course = *entries.first()?;
        let detail = self.details_by_course.get(course_id).copied();

        let organized_activities = self
            .sub_courses_by_course
            .get(course_id)
            .map(|subs| subs.iter().map(|sub| self.organized_activity(sub)).collect())
            .unwrap_or_default();

        let evaluated_activities = self
            .evaluations_by_course
            .get(course_id)
            .map(|evals| {
                evals
                    .iter()
                    .map(|evaluation| self.evaluated_activity(evaluation, &course.title))
                    .collect()
            })
            .unwrap_or_default();

        let responsable = detail.and_then(|d| {
            self.professors
                .resolve_all(&IdList::parse(d.responsable.as_deref()))
                .into_iter()
                .next()
        });

        Some(CourseDetailView {
            code: course.course_id.clone(),
            title: course.title.clone(),
            credits: course.credits.map(|c| c.to_string()),
            hours: detail.and_then(|d| format_hours(d.hours_q1.as_deref(), d.hours_q2.as_deref())),
            mandatory: course.mandatory,
            bloc: self.bloc_display(course, detail),
            program: self.program_display(entries, detail),
            responsable,
            language: course.language.to_lowercase(),
            organized_activities,
            evaluated_activities,
            sections: build_sections(detail),
        })
    }

    fn organized_activity(&self, sub: &SubCourseRecord) -> OrganizedActivity {
        OrganizedActivity {
            code: sub.sous_course_id.clone(),
            title: sub.title.clone(),
            hours_q1: non_blank(&sub.hours_q1),
            hours_q2: non_blank(&sub.hours_q2),
            teachers: self
                .professors
                .resolve_all(&IdList::parse(Some(sub.teachers_ids.as_str()))),
            language: sub.language.clone(),
        }
    }

    fn evaluated_activity(&self, evaluation: &EvaluationRecord, course_title: &str) -> EvaluatedActivity {
        let linked: Vec<&SubCourseRecord> = IdList::parse(evaluation.sous_course_ids.as_deref())
            .iter()
            .filter_map(|id| self.sub_course_by_id.get(id.as_str()).copied())
            .collect();

        let linked_titles: Vec<&str> = linked.iter().map(|sub| sub.title.as_str()).collect();
        let linked_activities = linked
            .iter()
            .map(|sub| format!("{} {}", sub.sous_course_id, sub.title))
            .collect();

        EvaluatedActivity {
            code: evaluation.evaluated_activity_id.clone(),
            title: evaluation_title(&linked_titles, course_title, &evaluation.evaluated_activity_id),
            weight: evaluation.weight.map(format_weight),
            type_q1: evaluation.type_q1.clone(),
            type_q2: evaluation.type_q2.clone(),
            type_q3: evaluation.type_q3.clone(),
            teachers: self
                .professors
                .resolve_all(&IdList::parse(evaluation.teachers_ids.as_deref())),
            linked_activities,
        }
    }

    /// Formation names from every course row plus the detail sheet, joined with `", "`
    fn program_display(&self, entries: &[&CourseRecord], detail: Option<&CourseDetailsRecord>) -> Option<String> {
        let row_ids = entries.iter().filter_map(|c| c.formation_id.clone());
        let detail_ids = IdList::parse(detail.and_then(|d| d.formation_ids.as_deref())).into_vec();

        let mut names: Vec<String> = Vec::new();
        for id in row_ids.chain(detail_ids) {
            let name = self.formations.resolve(&id).trim().to_string();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    /// Detail sheet bloc, then course row bloc; raw id when no name is known
    fn bloc_display(&self, course: &CourseRecord, detail: Option<&CourseDetailsRecord>) -> Option<String> {
        let detail_bloc = detail.and_then(|d| d.bloc_id.as_deref()).filter(|id| !id.trim().is_empty());
        let course_bloc = course.bloc_id.as_deref().filter(|id| !id.trim().is_empty());

        detail_bloc
            .and_then(|id| self.blocks.get(id))
            .or_else(|| course_bloc.and_then(|id| self.blocks.get(id)))
            .or(detail_bloc)
            .or(course_bloc)
            .map(str::to_string)
    }
}

/// Join the record sets into course views sorted by course code
pub fn join_catalog(sources: &CatalogSources) -> Vec<CourseDetailView> {
    let context = JoinContext::new(sources);

    // BTreeMap keeps course ids in ascending ordinal order
    let mut courses_by_id: BTreeMap<&str, Vec<&CourseRecord>> = BTreeMap::new();
    for course in &sources.courses {
        courses_by_id
            .entry(course.course_id.as_str())
            .or_default()
            .push(course);
    }

    let views: Vec<CourseDetailView> = courses_by_id
        .iter()
        .filter_map(|(course_id, entries)| context.build_view(course_id, entries))
        .collect();

    debug!(
        course_rows = sources.courses.len(),
        views = views.len(),
        professors = context.professors.len(),
        "Joined catalog"
    );

    views
}

/// Compose an evaluated activity title from the titles of its linked sub-courses.
///
/// Without links the evaluation id is used (or the course title when the id
/// is blank). With links, the distinct trimmed titles are joined with "et"
/// and prefixed with `"{course} — "` unless they already mention the course.
///
/// # Examples
///
/// ```
/// use companion_catalog::join::evaluation_title;
///
/// assert_eq!(evaluation_title(&["TP1", "TP2"], "Algorithmique", "EV1"), "Algorithmique — TP1 et TP2");
/// assert_eq!(evaluation_title(&[], "Algorithmique", "EX1"), "EX1");
/// ```
pub fn evaluation_title(linked_titles: &[&str], course_title: &str, fallback: &str) -> String {
    let mut cleaned: Vec<&str> = Vec::new();
    for title in linked_titles.iter().map(|t| t.trim()) {
        if !title.is_empty() && !cleaned.contains(&title) {
            cleaned.push(title);
        }
    }

    if cleaned.is_empty() {
        return if fallback.trim().is_empty() {
            course_title.to_string()
        } else {
            fallback.to_string()
        };
    }

    let joined = join_with_and(&cleaned);
    if joined.to_lowercase().contains(&course_title.to_lowercase()) {
        joined
    } else {
        format!("{} — {}", course_title, joined)
    }
}

fn build_sections(detail: Option<&CourseDetailsRecord>) -> SectionMap {
    let mut sections = SectionMap::default();
    let Some(detail) = detail else {
        return sections;
    };

    for kind in SectionKind::ALL {
        let body = match kind {
            SectionKind::Contribution => &detail.contribution,
            SectionKind::LearningOutcomes => &detail.learning_outcomes,
            SectionKind::Content => &detail.content,
            SectionKind::TeachingMethods => &detail.teaching_methods,
            SectionKind::EvaluationMethods => &detail.evaluation_methods,
            SectionKind::CourseMaterial => &detail.course_material,
            SectionKind::Bibliography => &detail.bibliography,
        };
        sections.insert_non_blank(kind.title(), body.as_deref());
    }
    sections
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
