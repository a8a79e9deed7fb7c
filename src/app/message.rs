// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::ui::commands::KeyPress;
use crate::ui::fullscreen::WindowMode;
use crate::ui::viewer::TimerKind;
use crate::video_player::PlaybackMessage;
use iced::window;
use std::path::PathBuf;

/// Native window input, already stripped of toolkit details.
#[derive(Debug, Clone)]
pub enum Input {
    FileHovered,
    FileDropped(PathBuf),
    FilesHoveredLeft,
    KeyPressed(KeyPress),
    PointerMoved,
    Resized,
    CloseRequested,
}

/// Messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Input from the window with the given id.
    Window { id: window::Id, input: Input },
    SeekBarClicked(f64),
    TimerElapsed(TimerKind),
    /// Mode the window reported back.
    WindowModeObserved(WindowMode),
    Playback(PlaybackMessage),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `ja`, `en-US`).
    pub lang: Option<String>,
    /// Optional video to open on startup.
    pub file_path: Option<PathBuf>,
}
