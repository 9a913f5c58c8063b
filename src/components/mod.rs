pub mod battle_board;
pub mod battle_screen;
pub mod detail_viewer;
pub mod gallery_strip;
pub mod roster_list;
pub mod slot_card;
pub mod theme;
pub mod vs_title;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use battle_board::{BattleBoard, BattleBoardProps};
pub use battle_screen::{BattleScreen, BattleScreenProps};
pub use detail_viewer::{DetailViewer, DetailViewerProps};
pub use gallery_strip::{GalleryStrip, GalleryStripProps};
pub use roster_list::{RosterList, RosterListProps};
pub use slot_card::{SlotCard, SlotCardProps, EMPTY_SLOT_MARK};
pub use vs_title::{VsTitle, VsTitleProps};
