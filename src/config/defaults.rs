// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Playback**: Keyboard seek and volume steps
//! - **Overlay**: Action message lifetime and control auto-hide timeout
//! - **Volume**: Audio volume bounds

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Seconds skipped by one seek key press.
pub const DEFAULT_SEEK_STEP_SECS: f64 = 5.0;

/// Minimum seek step (in seconds).
pub const MIN_SEEK_STEP_SECS: f64 = 0.5;

/// Maximum seek step (in seconds).
pub const MAX_SEEK_STEP_SECS: f64 = 60.0;

// ==========================================================================
// Volume Defaults
// ==========================================================================

/// Volume applied to every freshly loaded clip (muted).
pub const INITIAL_VOLUME: f32 = 0.0;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume adjustment step per key press (5%).
pub const DEFAULT_VOLUME_STEP: f32 = 0.05;

/// Largest accepted volume step from the config file.
pub const MAX_VOLUME_STEP: f32 = 0.5;

// ==========================================================================
// Overlay/Timeout Defaults
// ==========================================================================

/// How long an action message stays on screen (in milliseconds).
pub const DEFAULT_OVERLAY_MESSAGE_MS: u64 = 2000;

/// Minimum action message lifetime (in milliseconds).
pub const MIN_OVERLAY_MESSAGE_MS: u64 = 250;

/// Maximum action message lifetime (in milliseconds).
pub const MAX_OVERLAY_MESSAGE_MS: u64 = 10_000;

/// Inactivity period before the seek bar hides (in seconds).
pub const DEFAULT_CONTROLS_TIMEOUT_SECS: u64 = 3;

/// Minimum controls timeout (in seconds).
pub const MIN_CONTROLS_TIMEOUT_SECS: u64 = 1;

/// Maximum controls timeout (in seconds).
pub const MAX_CONTROLS_TIMEOUT_SECS: u64 = 30;
