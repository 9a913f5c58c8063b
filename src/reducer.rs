//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::autoscroll::ScrollStep;
use crate::effect::Effect;
use crate::record::Feed;
use crate::state::{AppState, GALLERY_CARD_WIDTH};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Feed actions =====
        Action::Init | Action::FeedsReload => {
            DispatchResult::changed_with_many(vec![
                load_feed(state, Feed::Ranked),
                load_feed(state, Feed::Gallery),
            ])
        }

        Action::FeedDidLoad {
            feed,
            generation,
            records,
        } => {
            if !state.store.apply_loaded(feed, generation, records) {
                tracing::debug!(feed = feed.label(), generation, "dropping stale response");
                return DispatchResult::unchanged();
            }
            let len = state.store.len(feed);
            state.viewer.collection_replaced(feed, len);
            match feed {
                Feed::Ranked => {
                    state.roster_selected = clamp_index(state.roster_selected, len);
                    DispatchResult::changed()
                }
                Feed::Gallery => {
                    state.gallery_cursor = clamp_index(state.gallery_cursor, len);
                    state.sync_scroll_extent();
                    if state.autoscroll_enabled {
                        // A new collection restarts the loop from its current offset.
                        DispatchResult::changed_with(start_scroll(state))
                    } else {
                        DispatchResult::changed()
                    }
                }
            }
        }

        Action::FeedDidError {
            feed,
            generation,
            error,
        } => {
            if !state.store.apply_failed(feed, generation, error.clone()) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(feed = feed.label(), %error, "feed unavailable");
            DispatchResult::changed()
        }

        // ===== Viewer actions =====
        Action::ViewerOpenSlot(label) => {
            state.active_slot = label;
            let len = state.store.len(Feed::Ranked);
            state
                .viewer
                .open_for(Feed::Ranked, len, label.default_index(), Some(label));
            DispatchResult::changed()
        }

        Action::ViewerOpenRoster(index) => {
            let len = state.store.len(Feed::Ranked);
            let target = Some(state.active_slot);
            if state.viewer.open_for(Feed::Ranked, len, index, target) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ViewerOpenGallery(index) => {
            let len = state.store.len(Feed::Gallery);
            let target = Some(state.active_slot);
            if state.viewer.open_for(Feed::Gallery, len, index, target) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ViewerPrev => {
            let len = viewer_len(state);
            changed_if(state.viewer.previous(len))
        }

        Action::ViewerNext => {
            let len = viewer_len(state);
            changed_if(state.viewer.next(len))
        }

        Action::ViewerToggleMode => changed_if(state.viewer.toggle_display_mode()),

        Action::ViewerConfirm => {
            let Some(feed) = state.viewer.feed() else {
                return DispatchResult::unchanged();
            };
            let Some((label, record)) = state.viewer.confirm(state.store.collection(feed)) else {
                return DispatchResult::unchanged();
            };
            tracing::debug!(slot = ?label, record = %record.name, "slot filled");
            state.slots.set(label, record);
            DispatchResult::changed()
        }

        Action::ViewerClose => changed_if(state.viewer.close()),

        // ===== Slot actions =====
        Action::SlotSelect(label) => {
            if state.active_slot == label {
                return DispatchResult::unchanged();
            }
            state.active_slot = label;
            DispatchResult::changed()
        }

        // ===== Focus actions =====
        Action::FocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            state.focus = state.focus.prev();
            DispatchResult::changed()
        }

        // ===== Roster actions =====
        Action::RosterSelect(index) => {
            let index = clamp_index(index, state.store.len(Feed::Ranked));
            if index == state.roster_selected {
                return DispatchResult::unchanged();
            }
            state.roster_selected = index;
            DispatchResult::changed()
        }

        // ===== Gallery actions =====
        Action::GalleryCursorPrev => move_gallery_cursor(state, false),
        Action::GalleryCursorNext => move_gallery_cursor(state, true),

        // ===== Autoscroll actions =====
        Action::AutoscrollToggle => {
            state.autoscroll_enabled = !state.autoscroll_enabled;
            if state.autoscroll_enabled {
                DispatchResult::changed_with(start_scroll(state))
            } else {
                state.autoscroll.stop();
                DispatchResult::changed_with(Effect::ScrollCancel)
            }
        }

        Action::AutoscrollTick(generation) => {
            if !state.autoscroll.is_live(generation) {
                return DispatchResult::unchanged();
            }
            let step = state.autoscroll.tick(generation);
            if step == ScrollStep::Wrapped {
                tracing::trace!("gallery autoscroll wrapped");
            }
            // Idle ticks keep the loop alive without a redraw.
            let mut result = DispatchResult::changed_with(Effect::ScrollSchedule {
                generation,
                interval_ms: state.autoscroll.interval_ms,
            });
            result.changed = step != ScrollStep::Idle;
            result
        }

        // ===== UI actions =====
        Action::UiTerminalResize(width, _height) => {
            state.terminal_width = width;
            state.sync_scroll_extent();
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn load_feed(state: &mut AppState, feed: Feed) -> Effect {
    let generation = state.store.begin_load(feed);
    Effect::LoadFeed {
        feed,
        generation,
        url: state.feed_url(feed).to_string(),
        retry: state.retry,
    }
}

fn start_scroll(state: &mut AppState) -> Effect {
    let generation = state.autoscroll.start();
    Effect::ScrollSchedule {
        generation,
        interval_ms: state.autoscroll.interval_ms,
    }
}

fn viewer_len(state: &AppState) -> usize {
    state
        .viewer
        .feed()
        .map(|feed| state.store.len(feed))
        .unwrap_or_default()
}

fn move_gallery_cursor(state: &mut AppState, forward: bool) -> DispatchResult<Effect> {
    let len = state.store.len(Feed::Gallery);
    if len == 0 {
        return DispatchResult::unchanged();
    }
    let cursor = state.gallery_cursor % len;
    state.gallery_cursor = if forward {
        (cursor + 1) % len
    } else {
        (cursor + len - 1) % len
    };
    let card = u32::from(GALLERY_CARD_WIDTH);
    state
        .autoscroll
        .reveal(state.gallery_cursor as u32 * card, card);
    DispatchResult::changed()
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

fn changed_if(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}
