//! The two fighter slots.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SlotLabel {
    A,
    B,
}

impl SlotLabel {
    pub fn title(self) -> &'static str {
        match self {
            SlotLabel::A => "FIGHTER 1",
            SlotLabel::B => "FIGHTER 2",
        }
    }

    /// Ranked index the slot card opens the viewer on.
    pub fn default_index(self) -> usize {
        match self {
            SlotLabel::A => 0,
            SlotLabel::B => 1,
        }
    }
}

/// Both slots start empty and are only ever overwritten.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionSlots {
    a: Option<Record>,
    b: Option<Record>,
}

impl SelectionSlots {
    pub fn set(&mut self, label: SlotLabel, record: Record) {
        match label {
            SlotLabel::A => self.a = Some(record),
            SlotLabel::B => self.b = Some(record),
        }
    }

    pub fn get(&self, label: SlotLabel) -> Option<&Record> {
        match label {
            SlotLabel::A => self.a.as_ref(),
            SlotLabel::B => self.b.as_ref(),
        }
    }

    pub fn is_filled(&self, label: SlotLabel) -> bool {
        self.get(label).is_some()
    }

    pub fn both_filled(&self) -> bool {
        self.is_filled(SlotLabel::A) && self.is_filled(SlotLabel::B)
    }
}
