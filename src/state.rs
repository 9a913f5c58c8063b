//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api::RetryPolicy;
use crate::autoscroll::Autoscroll;
use crate::config::FeedConfig;
use crate::record::{Feed, Record};
use crate::slots::{SelectionSlots, SlotLabel};
use crate::store::RecordStore;
use crate::viewer::Viewer;

/// Title flicker cadence.
pub const TICK_MS: u64 = 400;

/// Width of one gallery card, borders included.
pub const GALLERY_CARD_WIDTH: u16 = 18;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Board,
    Roster,
    Gallery,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Board => Focus::Roster,
            Focus::Roster => Focus::Gallery,
            Focus::Gallery => Focus::Board,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Board => Focus::Gallery,
            Focus::Roster => Focus::Board,
            Focus::Gallery => Focus::Roster,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub store: RecordStore,
    pub viewer: Viewer,
    pub slots: SelectionSlots,
    pub autoscroll: Autoscroll,
    /// User preference; the loop itself only runs once the gallery has data.
    pub autoscroll_enabled: bool,
    pub focus: Focus,
    /// Slot that roster and gallery picks are confirmed into.
    pub active_slot: SlotLabel,
    pub roster_selected: usize,
    pub gallery_cursor: usize,
    pub ranked_url: String,
    pub gallery_url: String,
    pub retry: RetryPolicy,
    pub tick_count: u32,
    pub terminal_width: u16,
}

impl AppState {
    pub fn with_config(config: &FeedConfig) -> Self {
        Self {
            store: RecordStore::default(),
            viewer: Viewer::default(),
            slots: SelectionSlots::default(),
            autoscroll: Autoscroll::new(config.scroll_step, config.scroll_interval_ms),
            autoscroll_enabled: true,
            focus: Focus::default(),
            active_slot: SlotLabel::A,
            roster_selected: 0,
            gallery_cursor: 0,
            ranked_url: config.ranked_url.clone(),
            gallery_url: config.gallery_url.clone(),
            retry: config.retry_policy(),
            tick_count: 0,
            terminal_width: 80,
        }
    }

    pub fn feed_url(&self, feed: Feed) -> &str {
        match feed {
            Feed::Ranked => &self.ranked_url,
            Feed::Gallery => &self.gallery_url,
        }
    }

    /// Record currently shown by the viewer, if it is open.
    pub fn viewed_record(&self) -> Option<&Record> {
        let session = self.viewer.session()?;
        self.store.get(session.feed, session.index)
    }

    /// Gallery strip inner width; the strip spans the terminal minus borders.
    pub fn gallery_viewport(&self) -> u32 {
        u32::from(self.terminal_width.saturating_sub(2))
    }

    pub fn gallery_content_width(&self) -> u32 {
        self.store.len(Feed::Gallery) as u32 * u32::from(GALLERY_CARD_WIDTH)
    }

    pub fn sync_scroll_extent(&mut self) -> bool {
        let content = self.gallery_content_width();
        let viewport = self.gallery_viewport();
        self.autoscroll.set_extent(content, viewport)
    }

    pub fn title_flash(&self) -> bool {
        self.tick_count % 2 == 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(&FeedConfig::default())
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let feed_section = |feed: Feed, title: &str| {
            let slot = self.store.slot(feed);
            DebugSection::new(title)
                .entry("url", ron_string(&self.feed_url(feed)))
                .entry("status", ron_string(&slot.status))
                .entry("records", ron_string(&slot.records.len()))
                .entry("generation", ron_string(&slot.generation))
        };
        let slot_name = |label: SlotLabel| self.slots.get(label).map(|record| record.name.clone());
        vec![
            feed_section(Feed::Ranked, "Ranked"),
            feed_section(Feed::Gallery, "Gallery"),
            DebugSection::new("Viewer")
                .entry("session", ron_string(&self.viewer.session()))
                .entry(
                    "record",
                    ron_string(&self.viewed_record().map(|record| record.name.clone())),
                ),
            DebugSection::new("Slots")
                .entry("A", ron_string(&slot_name(SlotLabel::A)))
                .entry("B", ron_string(&slot_name(SlotLabel::B)))
                .entry("active", ron_string(&self.active_slot)),
            DebugSection::new("Autoscroll")
                .entry("enabled", ron_string(&self.autoscroll_enabled))
                .entry("running", ron_string(&self.autoscroll.running))
                .entry("offset", ron_string(&self.autoscroll.offset))
                .entry("content", ron_string(&self.autoscroll.content_width))
                .entry("viewport", ron_string(&self.autoscroll.viewport_width))
                .entry("generation", ron_string(&self.autoscroll.generation)),
            DebugSection::new("UI")
                .entry("focus", ron_string(&self.focus))
                .entry("roster_selected", ron_string(&self.roster_selected))
                .entry("gallery_cursor", ron_string(&self.gallery_cursor)),
        ]
    }
}
