// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! The window is a single screen driven by [`viewer::Viewer`], which routes
//! every input to the components below and reports deferred work back to
//! the application shell.
//!
//! # Components
//!
//! - [`drop_zone`] - First video of a drag gesture
//! - [`commands`] - Keyboard shortcuts
//! - [`overlay`] - Transient action messages
//! - [`auto_hide`] - Seek bar visibility
//! - [`fullscreen`] - Window mode coordinator
//!
//! # Shared Infrastructure
//!
//! - [`state`] - Countdown deadlines and rotation angle
//! - [`widgets`] - Video surface and seek bar

pub mod auto_hide;
pub mod commands;
pub mod drop_zone;
pub mod fullscreen;
pub mod overlay;
pub mod state;
pub mod viewer;
pub mod widgets;
