//! Single-flight catalog cache
//!
//! Holds at most one joined [`CatalogSnapshot`], keyed by the base URL it was
//! fetched from. All loads go through one async mutex, so concurrent callers
//! arriving while a fetch is in progress wait for it and then observe its
//! result instead of starting a second fetch.
//!
//! A snapshot is only replaced after all seven fetches succeed and the join
//! completes; a failed load leaves the previous snapshot (or none) in place.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::fetch::{decode_records, FetchError, RecordFetcher, Resource};
use crate::join::{join_catalog, CatalogSources, SourceCounts};
use crate::records::{
    BlockRecord, CourseDetailsRecord, CourseRecord, EvaluationRecord, FormationRecord,
    ProfessorRecord, SubCourseRecord,
};
use crate::views::CourseDetailView;

/// Lifecycle of a [`CatalogCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    Empty,
    Loading,
    Ready,
}

impl CacheState {
    fn as_u8(self) -> u8 {
        match self {
            CacheState::Empty => 0,
            CacheState::Loading => 1,
            CacheState::Ready => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => CacheState::Loading,
            2 => CacheState::Ready,
            _ => CacheState::Empty,
        }
    }
}

/// One joined catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub base_url: String,
    pub loaded_at: DateTime<Utc>,
    pub counts: SourceCounts,
    /// Sorted ascending by course code
    pub courses: Vec<CourseDetailView>,
}

impl CatalogSnapshot {
    /// Course with exactly this code
    pub fn get(&self, code: &str) -> Option<&CourseDetailView> {
        self.courses
            .binary_search_by(|view| view.code.as_str().cmp(code))
            .ok()
            .and_then(|index| self.courses.get(index))
    }

    /// First course whose code or title contains `query`
    ///
    /// Matching ignores case and spaces, so `"4eidb 40"` finds `"4EIDB40"`.
    pub fn find_course(&self, query: &str) -> Option<&CourseDetailView> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return None;
        }

        self.courses.iter().find(|view| {
            normalize_query(&view.code).contains(&needle)
                || normalize_query(&view.title).contains(&needle)
        })
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

fn normalize_query(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Restores the published state when a load finishes, fails or is cancelled
struct PhaseGuard<'a> {
    phase: &'a AtomicU8,
    settled: CacheState,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.store(self.settled.as_u8(), Ordering::SeqCst);
    }
}

/// Catalog cache shared by every request of the service
pub struct CatalogCache {
    fetcher: Arc<dyn RecordFetcher>,
    slot: Mutex<Option<Arc<CatalogSnapshot>>>,
    phase: AtomicU8,
}

impl CatalogCache {
    pub fn new(fetcher: Arc<dyn RecordFetcher>) -> Self {
        Self {
            fetcher,
            slot: Mutex::new(None),
            phase: AtomicU8::new(CacheState::Empty.as_u8()),
        }
    }

    pub fn state(&self) -> CacheState {
        CacheState::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Current snapshot, without fetching
    ///
    /// Waits for an in-progress load to finish.
    pub async fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.slot.lock().await.clone()
    }

    /// Drop the cached snapshot
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            debug!("Catalog cache invalidated");
        }
        self.phase.store(CacheState::Empty.as_u8(), Ordering::SeqCst);
    }

    /// Cached snapshot for `base_url`, fetching and joining it when needed
    pub async fn load(
        &self,
        base_url: &str,
        credential: Option<&str>,
    ) -> Result<Arc<CatalogSnapshot>, FetchError> {
        let mut slot = self.slot.lock().await;

        if let Some(snapshot) = slot.as_ref() {
            if snapshot.base_url == base_url {
                debug!(base_url = %base_url, courses = snapshot.len(), "Catalog cache hit");
                return Ok(Arc::clone(snapshot));
            }
            debug!(
                cached = %snapshot.base_url,
                requested = %base_url,
                "Base URL changed, reloading catalog"
            );
        }

        let snapshot = self.fetch_and_join(slot.is_some(), base_url, credential).await?;
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Fetch and join unconditionally, replacing the cached snapshot on success
    pub async fn refresh(
        &self,
        base_url: &str,
        credential: Option<&str>,
    ) -> Result<Arc<CatalogSnapshot>, FetchError> {
        let mut slot = self.slot.lock().await;

        let snapshot = self.fetch_and_join(slot.is_some(), base_url, credential).await?;
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Runs with the slot lock held
    async fn fetch_and_join(
        &self,
        had_snapshot: bool,
        base_url: &str,
        credential: Option<&str>,
    ) -> Result<Arc<CatalogSnapshot>, FetchError> {
        let mut guard = PhaseGuard {
            phase: &self.phase,
            settled: if had_snapshot {
                CacheState::Ready
            } else {
                CacheState::Empty
            },
        };
        self.phase.store(CacheState::Loading.as_u8(), Ordering::SeqCst);

        let started = Instant::now();
        let result = tokio::try_join!(
            self.fetch_records::<CourseRecord>(base_url, Resource::Courses, credential),
            self.fetch_records::<CourseDetailsRecord>(base_url, Resource::CourseDetails, credential),
            self.fetch_records::<SubCourseRecord>(base_url, Resource::SubCourses, credential),
            self.fetch_records::<EvaluationRecord>(base_url, Resource::Evaluations, credential),
            self.fetch_records::<ProfessorRecord>(base_url, Resource::Professors, credential),
            self.fetch_records::<BlockRecord>(base_url, Resource::Blocks, credential),
            self.fetch_records::<FormationRecord>(base_url, Resource::Formations, credential),
        );

        let (courses, details, sub_courses, evaluations, professors, blocks, formations) =
            match result {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        base_url = %base_url,
                        resource = %e.resource(),
                        error = %e,
                        "Catalog load failed, keeping previous state"
                    );
                    return Err(e);
                }
            };

        let sources = CatalogSources {
            courses,
            details,
            sub_courses,
            evaluations,
            professors,
            blocks,
            formations,
        };
        let counts = sources.counts();
        let courses = join_catalog(&sources);

        info!(
            base_url = %base_url,
            courses = counts.courses,
            details = counts.details,
            sub_courses = counts.sub_courses,
            evaluations = counts.evaluations,
            professors = counts.professors,
            blocks = counts.blocks,
            formations = counts.formations,
            views = courses.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Catalog loaded"
        );

        guard.settled = CacheState::Ready;
        Ok(Arc::new(CatalogSnapshot {
            base_url: base_url.to_string(),
            loaded_at: Utc::now(),
            counts,
            courses,
        }))
    }

    async fn fetch_records<T: DeserializeOwned>(
        &self,
        base_url: &str,
        resource: Resource,
        credential: Option<&str>,
    ) -> Result<Vec<T>, FetchError> {
        let items = self.fetcher.fetch(base_url, resource, credential).await?;
        decode_records(resource, items)
    }
}
