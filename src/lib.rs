// SPDX-License-Identifier: MPL-2.0
//! `dropplay` is a minimal drag-and-drop video viewer built with the Iced GUI
//! framework.
//!
//! Drop a video on the window and it plays. The keyboard controls seeking,
//! volume, playback, fullscreen and rotation, and every action is confirmed
//! by a short overlay message.

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod media;
pub mod ui;
pub mod video_player;

#[cfg(test)]
pub(crate) mod test_utils;
