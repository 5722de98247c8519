//! Popularity counters for the tracked projects: read from storage, lazily synthesize and
//! persist on a miss, never refresh on a hit.

use crate::error::StoreError;
use crate::model::{NewProjectStats, StatCounts};
use crate::store::Storage;
use rand::Rng;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Inclusive ranges used when a project has no stored counters yet.
#[derive(Clone, Debug)]
pub struct StatRanges {
    pub stars: RangeInclusive<i32>,
    pub forks: RangeInclusive<i32>,
    pub watchers: RangeInclusive<i32>,
}

impl Default for StatRanges {
    fn default() -> Self {
        StatRanges {
            stars: 1..=10,
            forks: 0..=4,
            watchers: 1..=15,
        }
    }
}

/// Cosmetic counters; any RNG will do.
pub fn synthesize_stats<R: Rng>(project_id: &str, ranges: &StatRanges, rng: &mut R) -> NewProjectStats {
    NewProjectStats {
        project_id: project_id.to_string(),
        stars: rng.gen_range(ranges.stars.clone()),
        forks: rng.gen_range(ranges.forks.clone()),
        watchers: rng.gen_range(ranges.watchers.clone()),
    }
}

pub struct ProjectStatsService<'a> {
    store: &'a dyn Storage,
    ranges: StatRanges,
}

impl<'a> ProjectStatsService<'a> {
    pub fn new(store: &'a dyn Storage) -> Self {
        ProjectStatsService {
            store,
            ranges: StatRanges::default(),
        }
    }

    pub fn with_ranges(mut self, ranges: StatRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Counters for every project id, populating storage for the ones never seen before.
    pub async fn counts_for(&self, project_ids: &[String]) -> Result<BTreeMap<String, StatCounts>, StoreError> {
        let mut out = BTreeMap::new();
        for project_id in project_ids {
            let counts = match self.store.get_project_stats(project_id).await? {
                Some(stored) => StatCounts::from(&stored),
                None => {
                    // thread_rng is !Send, keep it out of the await below.
                    let fresh = synthesize_stats(project_id, &self.ranges, &mut rand::thread_rng());
                    tracing::info!(project_id = %project_id, "seeding project stats");
                    let saved = self.store.update_project_stats(fresh).await?;
                    StatCounts::from(&saved)
                }
            };
            out.insert(project_id.clone(), counts);
        }
        Ok(out)
    }
}
