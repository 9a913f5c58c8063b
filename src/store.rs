//! Record store: the two fetched collections and their fetch lifecycle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::{Feed, Record};

/// Fetch lifecycle of one feed: Idle -> Loading -> Ready/Failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedSlot {
    pub records: Vec<Record>,
    pub status: FetchStatus,
    /// Bumped on every load request; completions carrying an older value
    /// are dropped.
    pub generation: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecordStore {
    ranked: FeedSlot,
    gallery: FeedSlot,
}

impl RecordStore {
    pub fn slot(&self, feed: Feed) -> &FeedSlot {
        match feed {
            Feed::Ranked => &self.ranked,
            Feed::Gallery => &self.gallery,
        }
    }

    fn slot_mut(&mut self, feed: Feed) -> &mut FeedSlot {
        match feed {
            Feed::Ranked => &mut self.ranked,
            Feed::Gallery => &mut self.gallery,
        }
    }

    pub fn collection(&self, feed: Feed) -> &[Record] {
        &self.slot(feed).records
    }

    pub fn len(&self, feed: Feed) -> usize {
        self.slot(feed).records.len()
    }

    pub fn status(&self, feed: Feed) -> &FetchStatus {
        &self.slot(feed).status
    }

    pub fn get(&self, feed: Feed, index: usize) -> Option<&Record> {
        self.slot(feed).records.get(index)
    }

    pub fn begin_load(&mut self, feed: Feed) -> u64 {
        let slot = self.slot_mut(feed);
        slot.generation = slot.generation.wrapping_add(1);
        slot.status = FetchStatus::Loading;
        slot.generation
    }

    pub fn apply_loaded(&mut self, feed: Feed, generation: u64, records: Vec<Record>) -> bool {
        let slot = self.slot_mut(feed);
        if slot.generation != generation {
            return false;
        }
        slot.records = records;
        slot.status = FetchStatus::Ready;
        true
    }

    /// Records the failure; the previous collection stays in place.
    pub fn apply_failed(&mut self, feed: Feed, generation: u64, error: String) -> bool {
        let slot = self.slot_mut(feed);
        if slot.generation != generation {
            return false;
        }
        slot.status = FetchStatus::Failed(error);
        true
    }
}
