//! Detail viewer state machine.
//!
//! The viewer never holds records itself, only the identity of the collection
//! it was opened on. Every transition that needs the collection length takes
//! it as an argument so the store stays the single owner of the data.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::{Feed, Record};
use crate::slots::SlotLabel;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DisplayMode {
    /// The six base stats.
    #[default]
    Stats,
    /// Types, height, weight and abilities.
    Descriptive,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Stats => DisplayMode::Descriptive,
            DisplayMode::Descriptive => DisplayMode::Stats,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViewerSession {
    pub feed: Feed,
    pub index: usize,
    pub slot_target: Option<SlotLabel>,
    pub mode: DisplayMode,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Viewer {
    #[default]
    Closed,
    Open(ViewerSession),
}

impl Viewer {
    pub fn is_open(&self) -> bool {
        matches!(self, Viewer::Open(_))
    }

    pub fn session(&self) -> Option<&ViewerSession> {
        match self {
            Viewer::Open(session) => Some(session),
            Viewer::Closed => None,
        }
    }

    pub fn feed(&self) -> Option<Feed> {
        self.session().map(|session| session.feed)
    }

    pub fn index(&self) -> Option<usize> {
        self.session().map(|session| session.index)
    }

    pub fn mode(&self) -> Option<DisplayMode> {
        self.session().map(|session| session.mode)
    }

    /// Opens on `feed` at `index`, clamping an out-of-range index to 0.
    /// Returns `false` and stays closed when the collection is empty.
    pub fn open_for(
        &mut self,
        feed: Feed,
        len: usize,
        index: usize,
        slot_target: Option<SlotLabel>,
    ) -> bool {
        if len == 0 {
            return false;
        }
        let index = if index < len { index } else { 0 };
        *self = Viewer::Open(ViewerSession {
            feed,
            index,
            slot_target,
            mode: DisplayMode::Stats,
        });
        true
    }

    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Viewer::Closed;
        was_open
    }

    pub fn previous(&mut self, len: usize) -> bool {
        match self {
            Viewer::Open(session) if len > 0 => {
                session.index = (session.index % len + len - 1) % len;
                true
            }
            _ => false,
        }
    }

    pub fn next(&mut self, len: usize) -> bool {
        match self {
            Viewer::Open(session) if len > 0 => {
                session.index = (session.index % len + 1) % len;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_display_mode(&mut self) -> bool {
        match self {
            Viewer::Open(session) => {
                session.mode = session.mode.toggle();
                true
            }
            Viewer::Closed => false,
        }
    }

    /// Takes the record under the cursor for the targeted slot and closes.
    /// Without a slot target nothing happens and the viewer stays open.
    pub fn confirm(&mut self, collection: &[Record]) -> Option<(SlotLabel, Record)> {
        let session = self.session()?;
        let target = session.slot_target?;
        let record = collection.get(session.index)?.clone();
        self.close();
        Some((target, record))
    }

    /// Re-anchors an open session after its collection was replaced.
    pub fn collection_replaced(&mut self, feed: Feed, len: usize) -> bool {
        let Viewer::Open(session) = self else {
            return false;
        };
        if session.feed != feed {
            return false;
        }
        if len == 0 {
            return self.close();
        }
        if session.index >= len {
            session.index = len - 1;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .map(|name| Record {
                name: name.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn open(len: usize, index: usize, target: Option<SlotLabel>) -> Viewer {
        let mut viewer = Viewer::default();
        assert!(viewer.open_for(Feed::Ranked, len, index, target));
        viewer
    }

    #[test]
    fn next_wraps_after_last() {
        let mut viewer = open(3, 0, Some(SlotLabel::A));
        viewer.next(3);
        viewer.next(3);
        assert_eq!(viewer.index(), Some(2));
        viewer.next(3);
        assert_eq!(viewer.index(), Some(0));
    }

    #[test]
    fn previous_wraps_before_first() {
        let mut viewer = open(3, 0, None);
        viewer.previous(3);
        assert_eq!(viewer.index(), Some(2));
    }

    #[test]
    fn len_steps_of_next_is_identity() {
        for len in 1..8 {
            for start in 0..len {
                let mut viewer = open(len, start, None);
                for _ in 0..len {
                    viewer.next(len);
                }
                assert_eq!(viewer.index(), Some(start), "len={len} start={start}");
            }
        }
    }

    #[test]
    fn previous_undoes_next() {
        for len in 1..6 {
            for start in 0..len {
                let mut viewer = open(len, start, None);
                viewer.next(len);
                viewer.previous(len);
                assert_eq!(viewer.index(), Some(start));
                viewer.previous(len);
                viewer.next(len);
                assert_eq!(viewer.index(), Some(start));
            }
        }
    }

    #[test]
    fn open_clamps_out_of_range_index() {
        let viewer = open(3, 9, None);
        assert_eq!(viewer.index(), Some(0));
        assert_eq!(viewer.mode(), Some(DisplayMode::Stats));
    }

    #[test]
    fn open_on_empty_collection_stays_closed() {
        let mut viewer = Viewer::default();
        assert!(!viewer.open_for(Feed::Gallery, 0, 0, Some(SlotLabel::A)));
        assert!(!viewer.is_open());
    }

    #[test]
    fn navigation_on_empty_collection_is_noop() {
        let mut viewer = open(2, 1, None);
        assert!(!viewer.next(0));
        assert!(!viewer.previous(0));
        assert_eq!(viewer.index(), Some(1));
    }

    #[test]
    fn toggle_twice_restores_mode_and_keeps_index() {
        let mut viewer = open(4, 2, None);
        viewer.toggle_display_mode();
        assert_eq!(viewer.mode(), Some(DisplayMode::Descriptive));
        viewer.toggle_display_mode();
        assert_eq!(viewer.mode(), Some(DisplayMode::Stats));
        assert_eq!(viewer.index(), Some(2));
        assert!(viewer.is_open());
    }

    #[test]
    fn closed_viewer_ignores_navigation() {
        let mut viewer = open(3, 1, None);
        assert!(viewer.close());
        assert!(!viewer.next(3));
        assert!(!viewer.previous(3));
        assert!(!viewer.toggle_display_mode());
        assert_eq!(viewer, Viewer::Closed);
    }

    #[test]
    fn confirm_yields_record_under_cursor_and_closes() {
        let collection = records(&["R0", "R1", "R2"]);
        let mut viewer = open(3, 0, Some(SlotLabel::B));
        viewer.next(3);
        let (label, record) = viewer.confirm(&collection).unwrap();
        assert_eq!(label, SlotLabel::B);
        assert_eq!(record.name, "R1");
        assert!(!viewer.is_open());
    }

    #[test]
    fn confirm_without_target_is_noop() {
        let collection = records(&["R0"]);
        let mut viewer = open(1, 0, None);
        assert!(viewer.confirm(&collection).is_none());
        assert!(viewer.is_open());
    }

    #[test]
    fn replaced_collection_clamps_or_closes() {
        let mut viewer = open(5, 4, None);
        assert!(viewer.collection_replaced(Feed::Ranked, 2));
        assert_eq!(viewer.index(), Some(1));
        assert!(!viewer.collection_replaced(Feed::Gallery, 0));
        assert!(viewer.is_open());
        assert!(viewer.collection_replaced(Feed::Ranked, 0));
        assert!(!viewer.is_open());
    }
}
