//! Actions: user intents, fetch results and timer ticks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::{Feed, Record};
use crate::slots::SlotLabel;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: fetch both feeds once
    Init,

    // ===== Feed category =====
    /// Re-fetch both feeds; responses to earlier requests are dropped
    FeedsReload,

    FeedDidLoad {
        feed: Feed,
        generation: u64,
        records: Vec<Record>,
    },

    FeedDidError {
        feed: Feed,
        generation: u64,
        error: String,
    },

    // ===== Viewer category =====
    /// Open the ranked collection on behalf of a slot card
    ViewerOpenSlot(SlotLabel),

    /// Open the ranked collection at a roster row
    ViewerOpenRoster(usize),

    /// Open the gallery collection at a card
    ViewerOpenGallery(usize),

    ViewerPrev,
    ViewerNext,
    ViewerToggleMode,

    /// Put the record under the cursor into the targeted slot and close
    ViewerConfirm,

    ViewerClose,

    // ===== Slot category =====
    /// Choose which slot roster and gallery picks go to
    SlotSelect(SlotLabel),

    // ===== Focus category =====
    FocusNext,
    FocusPrev,

    // ===== Roster category =====
    RosterSelect(usize),

    // ===== Gallery category =====
    GalleryCursorPrev,
    GalleryCursorNext,

    // ===== Autoscroll category =====
    AutoscrollToggle,

    /// Timer fired for the loop with this generation
    AutoscrollTick(u64),

    // ===== UI terminal category =====
    UiTerminalResize(u16, u16),

    // ===== Uncategorized (global) =====
    /// Periodic tick for the title flicker
    Tick,

    Quit,
}
