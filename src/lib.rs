//! Color catalog engine: tint/shade ramps, document color scanning, and
//! luminance-sorted category buckets behind a small command layer.

pub mod cli;
pub mod color;
pub mod error;
pub mod icon;
pub mod panel;
pub mod pipeline;
pub mod store;
pub mod tui;
pub mod view;
