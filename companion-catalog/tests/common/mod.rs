//! Shared fixtures for companion-catalog integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use companion_catalog::fetch::{FetchError, RecordFetcher, Resource};
use serde_json::{json, Value};

/// In-memory back end that counts calls and can be told to fail
pub struct FakeFetcher {
    data: Mutex<HashMap<Resource, Vec<Value>>>,
    fail_on: Mutex<Option<Resource>>,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Resource, Option<String>)>>,
}

impl FakeFetcher {
    pub fn new(data: HashMap<Resource, Vec<Value>>) -> Self {
        Self {
            data: Mutex::new(data),
            fail_on: Mutex::new(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fixture() -> Self {
        Self::new(fixture())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_on(&self, resource: Option<Resource>) {
        *self.fail_on.lock().unwrap() = resource;
    }

    pub fn set(&self, resource: Resource, items: Vec<Value>) {
        self.data.lock().unwrap().insert(resource, items);
    }

    /// Number of fetch calls so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, Resource, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordFetcher for FakeFetcher {
    async fn fetch(
        &self,
        base_url: &str,
        resource: Resource,
        credential: Option<&str>,
    ) -> Result<Vec<Value>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            base_url.to_string(),
            resource,
            credential.map(str::to_string),
        ));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if *self.fail_on.lock().unwrap() == Some(resource) {
            return Err(FetchError::Status {
                resource,
                status: 503,
                body: "maintenance".to_string(),
            });
        }

        Ok(self
            .data
            .lock()
            .unwrap()
            .get(&resource)
            .cloned()
            .unwrap_or_default())
    }
}

/// Small but complete back end: three courses, one with every relation
///
/// Foreign keys and sub-course hours are numbers, as the back end sends them.
pub fn fixture() -> HashMap<Resource, Vec<Value>> {
    let mut data = HashMap::new();

    data.insert(
        Resource::Courses,
        vec![
            json!({"id": 1, "courseId": "4EIPR10", "courseRaccourciId": "PR10",
                   "title": "Algorithmique", "credits": 5, "periods": 4, "detailsUrl": null,
                   "mandatory": true, "blocId": 1, "formationId": 1, "language": "fr"}),
            json!({"id": 2, "courseId": "4EIDB40", "title": "Bases de données", "credits": "4",
                   "language": "EN", "blocId": null, "formationId": null}),
            json!({"id": 3, "courseId": "4EIPR10", "title": "Algorithmique (ELEC)",
                   "formationId": 7, "detailsUrl": "https://example.invalid/pr10"}),
            json!({"courseId": "1ZZZ00", "title": "Cours orphelin"}),
        ],
    );
    data.insert(
        Resource::CourseDetails,
        vec![json!({
            "courseId": "4EIPR10",
            "responsable": "EBO",
            "formationIds": "1; 3",
            "hoursQ1": "30",
            "hoursQ2": "15h",
            "contribution": "Bases du raisonnement algorithmique",
            "content": "   ",
            "bibliography": "Knuth, TAOCP",
            "blocId": "2"
        })],
    );
    data.insert(
        Resource::SubCourses,
        vec![
            json!({"id": 11, "sousCourseId": "4EIPR11", "courseId": "4EIPR10", "title": "TP1",
                   "hoursQ1": 15, "teachersIds": "ebo; xyz"}),
            json!({"id": 12, "sousCourseId": "4EIPR12", "courseId": "4EIPR10", "title": "TP2",
                   "hoursQ1": null, "hoursQ2": 10, "teachersIds": "dlh", "language": "en"}),
        ],
    );
    data.insert(
        Resource::Evaluations,
        vec![
            json!({"evaluatedActivityId": "EV1", "courseId": "4EIPR10", "weight": 20,
                   "typeQ1": "Écrit", "sousCourseIds": "4EIPR11/4EIPR12/NOPE",
                   "teachersIds": "EBO"}),
            json!({"evaluatedActivityId": "EX1", "courseId": "4EIPR10", "weight": "12,5"}),
        ],
    );
    data.insert(
        Resource::Professors,
        vec![
            json!({"professorId": "EBO", "firstName": "Eric", "lastName": "Bonnet"}),
            json!({"professorId": "DLH", "firstName": "Denis", "lastName": "Lhoest"}),
        ],
    );
    data.insert(
        Resource::Blocks,
        vec![json!({"id": 1, "blocId": "1", "name": "Bloc 1", "formationIds": "1"})],
    );
    data.insert(
        Resource::Formations,
        vec![
            json!({"id": 1, "formationId": 1, "name": "Informatique", "imageUrl": null}),
            json!({"id": 3, "formationId": "3", "name": "Gestion"}),
        ],
    );
    data.insert(
        Resource::Calendar,
        vec![
            json!({"id": 2, "code": "EXAM", "title": "Examens", "date": "2025-06-02",
                   "startTime": "08:00", "endTime": "18:00", "ownerType": "year"}),
            json!({"id": 1, "code": "RENTREE", "title": "", "date": "15/09/2025",
                   "startTime": "09:00", "endTime": "12:00", "ownerRef": "3BE",
                   "groupCode": "A"}),
            json!({"id": 3, "code": "BAD", "title": "Broken", "date": "someday",
                   "startTime": "", "endTime": ""}),
        ],
    );
    data.insert(
        Resource::CourseSchedule,
        vec![json!({
            "id": 9, "week": 3, "yearOptionId": "3BE", "groupNo": "G1",
            "seriesJson": "[\"A\",\"B\"]", "date": "2025-02-03", "dayName": "Lundi",
            "startTime": "08:15", "endTime": "10:15", "courseRaccourciId": "PR10",
            "title": "Algorithmique", "teachersJson": "ebo; dlh", "roomIds": "1E01|1E02"
        })],
    );

    data
}
