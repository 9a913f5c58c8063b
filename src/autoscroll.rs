//! Self-resetting horizontal scroll driver for the gallery strip.
//!
//! The loop itself is a keyed runtime task that sleeps and emits
//! `Action::AutoscrollTick(generation)`. This type only holds the scroll
//! position and decides whether a given tick is still live.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollStep {
    Advanced,
    /// Reached the end and jumped back to the start.
    Wrapped,
    /// Stale tick, stopped loop, or nothing to scroll.
    Idle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Autoscroll {
    pub running: bool,
    pub offset: u32,
    pub step: u32,
    pub interval_ms: u64,
    pub content_width: u32,
    pub viewport_width: u32,
    pub generation: u64,
}

impl Default for Autoscroll {
    fn default() -> Self {
        Self::new(1, 60)
    }
}

impl Autoscroll {
    pub fn new(step: u32, interval_ms: u64) -> Self {
        Self {
            running: false,
            offset: 0,
            step: step.max(1),
            interval_ms: interval_ms.max(1),
            content_width: 0,
            viewport_width: 0,
            generation: 0,
        }
    }

    /// Starts or restarts the loop. Ticks from any earlier loop go stale.
    pub fn start(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        self.generation
    }

    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.generation = self.generation.wrapping_add(1);
        was_running
    }

    pub fn is_live(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    fn max_offset(&self) -> u32 {
        self.content_width.saturating_sub(self.viewport_width)
    }

    pub fn overflows(&self) -> bool {
        self.content_width > self.viewport_width
    }

    pub fn set_extent(&mut self, content_width: u32, viewport_width: u32) -> bool {
        if self.content_width == content_width && self.viewport_width == viewport_width {
            return false;
        }
        self.content_width = content_width;
        self.viewport_width = viewport_width;
        self.offset = self.offset.min(self.max_offset());
        true
    }

    /// Moves the offset the least amount needed to show `[start, start + width)`.
    pub fn reveal(&mut self, start: u32, width: u32) -> bool {
        let before = self.offset;
        if start < self.offset {
            self.offset = start;
        } else if start + width > self.offset + self.viewport_width {
            self.offset = (start + width).saturating_sub(self.viewport_width);
        }
        self.offset = self.offset.min(self.max_offset());
        self.offset != before
    }

    pub fn tick(&mut self, generation: u64) -> ScrollStep {
        if !self.is_live(generation) || !self.overflows() {
            return ScrollStep::Idle;
        }
        if self.offset + self.viewport_width >= self.content_width {
            self.offset = 0;
            return ScrollStep::Wrapped;
        }
        self.offset = (self.offset + self.step).min(self.max_offset());
        ScrollStep::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resets_within_260_ticks() {
        let mut scroll = Autoscroll::new(2, 60);
        scroll.set_extent(1000, 500);
        let gen = scroll.start();
        let mut wrapped_at = None;
        for tick in 1..=260 {
            if scroll.tick(gen) == ScrollStep::Wrapped && wrapped_at.is_none() {
                wrapped_at = Some(tick);
            }
        }
        assert_eq!(wrapped_at, Some(251));
    }

    #[test]
    fn stop_freezes_offset() {
        let mut scroll = Autoscroll::new(2, 60);
        scroll.set_extent(1000, 500);
        let gen = scroll.start();
        for _ in 0..10 {
            scroll.tick(gen);
        }
        assert_eq!(scroll.offset, 20);
        scroll.stop();
        for _ in 0..300 {
            assert_eq!(scroll.tick(gen), ScrollStep::Idle);
        }
        assert_eq!(scroll.offset, 20);
    }

    #[test]
    fn restart_invalidates_old_generation() {
        let mut scroll = Autoscroll::new(1, 60);
        scroll.set_extent(100, 10);
        let old = scroll.start();
        let new = scroll.start();
        assert_eq!(scroll.tick(old), ScrollStep::Idle);
        assert_eq!(scroll.tick(new), ScrollStep::Advanced);
        assert_eq!(scroll.offset, 1);
    }

    #[test]
    fn no_overflow_never_resets() {
        let mut scroll = Autoscroll::new(5, 60);
        scroll.set_extent(300, 500);
        let gen = scroll.start();
        for _ in 0..100 {
            assert_eq!(scroll.tick(gen), ScrollStep::Idle);
        }
        assert_eq!(scroll.offset, 0);
    }

    #[test]
    fn last_step_is_clamped_to_end() {
        let mut scroll = Autoscroll::new(7, 60);
        scroll.set_extent(20, 10);
        let gen = scroll.start();
        assert_eq!(scroll.tick(gen), ScrollStep::Advanced);
        assert_eq!(scroll.tick(gen), ScrollStep::Advanced);
        assert_eq!(scroll.offset, 10);
        assert_eq!(scroll.tick(gen), ScrollStep::Wrapped);
        assert_eq!(scroll.offset, 0);
    }

    #[test]
    fn reveal_scrolls_card_into_view() {
        let mut scroll = Autoscroll::new(1, 60);
        scroll.set_extent(180, 50);
        assert!(scroll.reveal(72, 18));
        assert_eq!(scroll.offset, 40);
        assert!(!scroll.reveal(54, 18));
        assert!(scroll.reveal(0, 18));
        assert_eq!(scroll.offset, 0);
    }

    #[test]
    fn shrinking_extent_clamps_offset() {
        let mut scroll = Autoscroll::new(10, 60);
        scroll.set_extent(100, 10);
        let gen = scroll.start();
        for _ in 0..8 {
            scroll.tick(gen);
        }
        assert!(scroll.set_extent(40, 10));
        assert_eq!(scroll.offset, 30);
        assert!(!scroll.set_extent(40, 10));
    }
}
