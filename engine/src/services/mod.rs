//! Analysis services
//!
//! Data flows one way: samples -> scoring -> {days, windows, slots} ->
//! notifier -> alert feed.

pub mod days;
pub mod notifier;
pub mod scoring;
pub mod slots;
pub mod windows;
