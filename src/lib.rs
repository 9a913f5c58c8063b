//! pokebattle - pick two fighters from a ranked list and a scrolling gallery
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod autoscroll;
pub mod components;
pub mod config;
pub mod effect;
pub mod logging;
pub mod record;
pub mod reducer;
pub mod slots;
pub mod sprite;
pub mod sprite_backend;
pub mod state;
pub mod store;
pub mod viewer;
