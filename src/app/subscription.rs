// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Native window events are reduced to [`Input`] here, so the viewer never
//! sees toolkit types. Playback runs as a second subscription keyed by the
//! active source.

use super::message::{Input, Message};
use crate::ui::commands::{Key, KeyPress};
use crate::ui::viewer::Viewer;
use crate::video_player::VideoPlayer;
use iced::{event, keyboard, mouse, window, Subscription};

/// Routes window, pointer and keyboard events to the viewer.
pub fn window_events() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| {
        let input = match event {
            event::Event::Window(window_event) => match window_event {
                window::Event::FileHovered(_) => Input::FileHovered,
                window::Event::FileDropped(path) => Input::FileDropped(path),
                window::Event::FilesHoveredLeft => Input::FilesHoveredLeft,
                window::Event::Resized(_) => Input::Resized,
                window::Event::CloseRequested => Input::CloseRequested,
                _ => return None,
            },
            event::Event::Mouse(mouse::Event::CursorMoved { .. }) => Input::PointerMoved,
            event::Event::Keyboard(keyboard::Event::KeyPressed {
                modified_key,
                modifiers,
                ..
            }) => {
                if status == event::Status::Captured {
                    return None;
                }
                Input::KeyPressed(key_press(&modified_key, modifiers))
            }
            _ => return None,
        };
        Some(Message::Window {
            id: window_id,
            input,
        })
    })
}

/// Playback events of the active clip. Empty once the window is closing.
pub fn playback(viewer: &Viewer<VideoPlayer>) -> Subscription<Message> {
    if viewer.is_closed() {
        return Subscription::none();
    }
    viewer
        .media()
        .and_then(|media| media.element().subscription())
        .map_or_else(Subscription::none, |subscription| {
            subscription.map(Message::Playback)
        })
}

/// Converts an Iced key press. `key` must already include Shift, so `H`
/// stays distinct from `h`.
pub(crate) fn key_press(key: &keyboard::Key, modifiers: keyboard::Modifiers) -> KeyPress {
    let key = match key {
        keyboard::Key::Named(keyboard::key::Named::Space) => Key::Space,
        keyboard::Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Character(c),
                _ => Key::Other,
            }
        }
        _ => Key::Other,
    };

    KeyPress {
        key,
        command_modifier: modifiers.control() || modifiers.alt() || modifiers.logo(),
    }
}
