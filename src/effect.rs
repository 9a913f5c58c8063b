//! Effects - side effects declared by the reducer

use crate::api::RetryPolicy;
use crate::record::Feed;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch and decode one feed; the result carries `generation` back
    LoadFeed {
        feed: Feed,
        generation: u64,
        url: String,
        retry: RetryPolicy,
    },
    /// Sleep, then emit `AutoscrollTick(generation)`
    ScrollSchedule { generation: u64, interval_ms: u64 },
    /// Drop any pending autoscroll tick
    ScrollCancel,
}
