//! Integration tests for the catalog join
//!
//! Tests cover:
//! - Output ordering by course code
//! - Courses without any relation
//! - Activities, titles, weights and teacher resolution
//! - Program, bloc, hours, responsible teacher and sections

mod common;

use companion_catalog::fetch::{decode_records, Resource};
use companion_catalog::join::{join_catalog, CatalogSources};
use companion_catalog::records::CourseRecord;
use companion_catalog::views::CourseDetailView;
use serde_json::json;

fn fixture_sources() -> CatalogSources {
    let mut data = common::fixture();
    let mut take = |resource: Resource| data.remove(&resource).unwrap_or_default();

    CatalogSources {
        courses: decode_records(Resource::Courses, take(Resource::Courses)).unwrap(),
        details: decode_records(Resource::CourseDetails, take(Resource::CourseDetails)).unwrap(),
        sub_courses: decode_records(Resource::SubCourses, take(Resource::SubCourses)).unwrap(),
        evaluations: decode_records(Resource::Evaluations, take(Resource::Evaluations)).unwrap(),
        professors: decode_records(Resource::Professors, take(Resource::Professors)).unwrap(),
        blocks: decode_records(Resource::Blocks, take(Resource::Blocks)).unwrap(),
        formations: decode_records(Resource::Formations, take(Resource::Formations)).unwrap(),
    }
}

fn course(code: &str) -> CourseRecord {
    serde_json::from_value(json!({"courseId": code, "title": format!("Cours {}", code)})).unwrap()
}

fn find<'a>(views: &'a [CourseDetailView], code: &str) -> &'a CourseDetailView {
    views
        .iter()
        .find(|v| v.code == code)
        .unwrap_or_else(|| panic!("course {} missing", code))
}

// =============================================================================
// Ordering and stability
// =============================================================================

#[test]
fn test_views_sorted_by_code() {
    let views = join_catalog(&fixture_sources());
    let codes: Vec<&str> = views.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["1ZZZ00", "4EIDB40", "4EIPR10"]);
}

#[test]
fn test_reverse_input_still_sorted() {
    let sources = CatalogSources {
        courses: vec![course("C"), course("B"), course("A"), course("AA")],
        ..Default::default()
    };

    let codes: Vec<String> = join_catalog(&sources).into_iter().map(|v| v.code).collect();
    assert_eq!(codes, vec!["A", "AA", "B", "C"]);
}

#[test]
fn test_course_without_relations() {
    let views = join_catalog(&fixture_sources());
    let orphan = find(&views, "1ZZZ00");

    assert!(orphan.organized_activities.is_empty());
    assert!(orphan.evaluated_activities.is_empty());
    assert!(orphan.sections.is_empty());
    assert_eq!(orphan.hours, None);
    assert_eq!(orphan.program, None);
    assert_eq!(orphan.responsable, None);
    assert_eq!(orphan.bloc, None);
    assert_eq!(orphan.language, "fr");
}

#[test]
fn test_empty_sources() {
    assert!(join_catalog(&CatalogSources::default()).is_empty());
}

#[test]
fn test_duplicate_course_rows_collapse_to_first() {
    let views = join_catalog(&fixture_sources());
    assert_eq!(views.len(), 3);

    let algo = find(&views, "4EIPR10");
    assert_eq!(algo.title, "Algorithmique");
    assert!(algo.mandatory);
    assert_eq!(algo.credits.as_deref(), Some("5"));
}

// =============================================================================
// Activities
// =============================================================================

#[test]
fn test_organized_activities() {
    let views = join_catalog(&fixture_sources());
    let activities = &find(&views, "4EIPR10").organized_activities;
    assert_eq!(activities.len(), 2);

    let tp1 = &activities[0];
    assert_eq!(tp1.code, "4EIPR11");
    assert_eq!(tp1.hours_q1.as_deref(), Some("15"));
    assert_eq!(tp1.hours_q2, None);
    assert_eq!(tp1.teachers, vec!["BONNET Eric", "xyz"]);
    assert_eq!(tp1.language, "fr");

    let tp2 = &activities[1];
    assert_eq!(tp2.hours_q1, None);
    assert_eq!(tp2.hours_q2.as_deref(), Some("10"));
    assert_eq!(tp2.teachers, vec!["LHOEST Denis"]);
    assert_eq!(tp2.language, "en");
}

#[test]
fn test_evaluated_activity_with_links() {
    let views = join_catalog(&fixture_sources());
    let evaluation = &find(&views, "4EIPR10").evaluated_activities[0];

    assert_eq!(evaluation.code, "EV1");
    assert_eq!(evaluation.title, "Algorithmique — TP1 et TP2");
    assert_eq!(evaluation.weight.as_deref(), Some("20"));
    assert_eq!(evaluation.type_q1.as_deref(), Some("Écrit"));
    assert_eq!(evaluation.teachers, vec!["BONNET Eric"]);
    // NOPE does not resolve and is dropped
    assert_eq!(evaluation.linked_activities, vec!["4EIPR11 TP1", "4EIPR12 TP2"]);
}

#[test]
fn test_evaluated_activity_without_links() {
    let views = join_catalog(&fixture_sources());
    let evaluation = &find(&views, "4EIPR10").evaluated_activities[1];

    assert_eq!(evaluation.title, "EX1");
    assert_eq!(evaluation.weight.as_deref(), Some("12.5"));
    assert!(evaluation.linked_activities.is_empty());
    assert!(evaluation.teachers.is_empty());
}

#[test]
fn test_unparseable_weight_is_absent() {
    let mut sources = fixture_sources();
    sources.evaluations = decode_records(
        Resource::Evaluations,
        vec![json!({"evaluatedActivityId": "EV9", "courseId": "4EIPR10", "weight": "beaucoup"})],
    )
    .unwrap();

    let views = join_catalog(&sources);
    let evaluation = &find(&views, "4EIPR10").evaluated_activities[0];
    assert_eq!(evaluation.weight, None);
}

// =============================================================================
// Course level fields
// =============================================================================

#[test]
fn test_program_union_resolved_and_deduplicated() {
    let views = join_catalog(&fixture_sources());
    assert_eq!(
        find(&views, "4EIPR10").program.as_deref(),
        Some("Informatique, 7, Gestion")
    );
}

#[test]
fn test_bloc_falls_back_to_course_row_mapping() {
    // Detail bloc 2 has no name, numeric course bloc 1 does
    let views = join_catalog(&fixture_sources());
    assert_eq!(find(&views, "4EIPR10").bloc.as_deref(), Some("Bloc 1"));
}

#[test]
fn test_bloc_raw_id_when_unmapped() {
    let mut sources = fixture_sources();
    sources.blocks.clear();

    let views = join_catalog(&sources);
    assert_eq!(find(&views, "4EIPR10").bloc.as_deref(), Some("2"));
}

#[test]
fn test_hours_responsable_and_language() {
    let views = join_catalog(&fixture_sources());

    let algo = find(&views, "4EIPR10");
    assert_eq!(algo.hours.as_deref(), Some("Q1 30h | Q2 15h"));
    assert_eq!(algo.responsable.as_deref(), Some("BONNET Eric"));

    let db = find(&views, "4EIDB40");
    assert_eq!(db.language, "en");
    assert_eq!(db.credits.as_deref(), Some("4"));
}

#[test]
fn test_sections_skip_blank_bodies() {
    let views = join_catalog(&fixture_sources());
    let sections = &find(&views, "4EIPR10").sections;

    let titles: Vec<&str> = sections.titles().collect();
    assert_eq!(titles, vec!["Contribution au programme", "Bibliographie"]);
    assert_eq!(sections.get("Bibliographie"), Some("Knuth, TAOCP"));
}

#[test]
fn test_first_detail_sheet_wins() {
    let mut sources = fixture_sources();
    sources.details.push(
        serde_json::from_value(json!({"courseId": "4EIPR10", "responsable": "DLH"})).unwrap(),
    );

    let views = join_catalog(&sources);
    assert_eq!(find(&views, "4EIPR10").responsable.as_deref(), Some("BONNET Eric"));
}
