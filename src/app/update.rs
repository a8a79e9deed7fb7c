// SPDX-License-Identifier: MPL-2.0
//! Update logic for the application.
//!
//! Messages are translated into viewer events, and the effects the viewer
//! reports come back out as Iced tasks.

use super::message::{Input, Message};
use crate::ui::viewer::{Effect, Event, Viewer};
use crate::video_player::{PlaybackEvent, VideoPlayer};
use iced::{window, Task};
use std::time::Instant;

type ViewerEvent = Event<PlaybackEvent>;

/// Handles one message and returns the follow-up work.
pub fn update(
    viewer: &mut Viewer<VideoPlayer>,
    window_id: &mut Option<window::Id>,
    message: Message,
) -> Task<Message> {
    match message {
        Message::Window { id, input } => {
            *window_id = Some(id);
            handle_input(viewer, id, input)
        }
        Message::SeekBarClicked(fraction) => {
            dispatch(viewer, *window_id, Event::SeekBarClicked(fraction))
        }
        Message::TimerElapsed(kind) => dispatch(viewer, *window_id, Event::TimerElapsed(kind)),
        Message::WindowModeObserved(mode) => {
            dispatch(viewer, *window_id, Event::WindowModeObserved(mode))
        }
        Message::Playback(message) => dispatch(
            viewer,
            *window_id,
            Event::Playback {
                source: message.source,
                event: message.event,
            },
        ),
    }
}

fn handle_input(viewer: &mut Viewer<VideoPlayer>, id: window::Id, input: Input) -> Task<Message> {
    let event = match input {
        Input::FileHovered => Event::FileHovered,
        Input::FileDropped(path) => Event::FileDropped(path),
        Input::FilesHoveredLeft => Event::FilesHoveredLeft,
        Input::KeyPressed(press) => Event::KeyPressed(press),
        Input::PointerMoved => Event::PointerMoved,
        Input::Resized => Event::WindowResized,
        Input::CloseRequested => {
            // Release the decoders before the window goes away
            let _ = viewer.handle(Event::CloseRequested, Instant::now());
            return window::close(id);
        }
    };
    dispatch(viewer, Some(id), event)
}

/// Feeds an event to the viewer and schedules the effects it returns.
pub fn dispatch(
    viewer: &mut Viewer<VideoPlayer>,
    window_id: Option<window::Id>,
    event: ViewerEvent,
) -> Task<Message> {
    let effects = viewer.handle(event, Instant::now());
    Task::batch(
        effects
            .into_iter()
            .map(|effect| effect_task(effect, window_id)),
    )
}

fn effect_task(effect: Effect, window_id: Option<window::Id>) -> Task<Message> {
    match effect {
        Effect::Schedule { kind, delay } => {
            // Sleep is built on the executor, not on the UI thread
            Task::perform(async move { tokio::time::sleep(delay).await }, move |()| {
                Message::TimerElapsed(kind)
            })
        }
        Effect::SetWindowMode(mode) => match window_id {
            Some(id) => window::set_mode(id, mode.into()).chain(observe_mode(id)),
            None => {
                tracing::debug!(?mode, "no window yet, mode change skipped");
                Task::none()
            }
        },
        Effect::QueryWindowMode => window_id.map_or_else(Task::none, observe_mode),
    }
}

/// Reads back the mode the window is really in.
fn observe_mode(id: window::Id) -> Task<Message> {
    window::mode(id).map(|mode| Message::WindowModeObserved(mode.into()))
}
