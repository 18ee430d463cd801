//! Denormalized course views produced by the catalog join

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Free-text sections of a course sheet, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Contribution,
    LearningOutcomes,
    Content,
    TeachingMethods,
    EvaluationMethods,
    CourseMaterial,
    Bibliography,
}

impl SectionKind {
    /// All sections in display order
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Contribution,
        SectionKind::LearningOutcomes,
        SectionKind::Content,
        SectionKind::TeachingMethods,
        SectionKind::EvaluationMethods,
        SectionKind::CourseMaterial,
        SectionKind::Bibliography,
    ];

    /// Section heading shown to students
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Contribution => "Contribution au programme",
            SectionKind::LearningOutcomes => "Acquis d’apprentissage spécifiques",
            SectionKind::Content => "Description du contenu",
            SectionKind::TeachingMethods => "Méthodes d'enseignement",
            SectionKind::EvaluationMethods => "Méthodes d'évaluation",
            SectionKind::CourseMaterial => "Support de cours",
            SectionKind::Bibliography => "Bibliographie",
        }
    }
}

/// Ordered section title → body mapping
///
/// Insertion order is kept and blank bodies are never stored. Serializes
/// as a JSON object whose keys appear in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap(Vec<(String, String)>);

impl SectionMap {
    /// Insert a section unless its body is blank
    pub fn insert_non_blank(&mut self, title: &str, body: Option<&str>) {
        if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
            self.0.push((title.to_string(), body.to_string()));
        }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, body)| body.as_str())
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(title, _)| title.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(t, b)| (t.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (title, body) in &self.0 {
            map.serialize_entry(title, body)?;
        }
        map.end()
    }
}

/// Teaching sub-unit of a course (lab, tutorial, lecture part)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizedActivity {
    pub code: String,
    pub title: String,
    pub hours_q1: Option<String>,
    pub hours_q2: Option<String>,
    pub teachers: Vec<String>,
    pub language: String,
}

/// Gradable component of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluatedActivity {
    pub code: String,
    pub title: String,
    pub weight: Option<String>,
    pub type_q1: Option<String>,
    pub type_q2: Option<String>,
    pub type_q3: Option<String>,
    pub teachers: Vec<String>,
    /// `"{sub-course id} {sub-course title}"` for every resolvable link
    pub linked_activities: Vec<String>,
}

/// One fully joined course sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDetailView {
    pub code: String,
    pub title: String,
    pub credits: Option<String>,
    pub hours: Option<String>,
    pub mandatory: bool,
    pub bloc: Option<String>,
    pub program: Option<String>,
    pub responsable: Option<String>,
    pub language: String,
    pub organized_activities: Vec<OrganizedActivity>,
    pub evaluated_activities: Vec<EvaluatedActivity>,
    pub sections: SectionMap,
}
