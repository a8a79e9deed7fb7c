// SPDX-License-Identifier: MPL-2.0
//! Application root state and the Iced boot sequence.
//!
//! `App` holds the viewer and the localization bundle. All behaviour lives in
//! the viewer; this module only adapts it to Iced's update/view/subscription
//! loop.

mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Input, Message};

use crate::config;
use crate::i18n::I18n;
use crate::ui::viewer::{Event, Viewer, ViewerSettings};
use crate::video_player::{self, VideoPlayer};
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;

pub struct App {
    pub i18n: I18n,
    viewer: Viewer<VideoPlayer>,
    window_id: Option<window::Id>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("has_media", &self.viewer.media().is_some())
            .field("closed", &self.viewer.is_closed())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 650;
pub const WINDOW_DEFAULT_WIDTH: u32 = 800;
pub const MIN_WINDOW_HEIGHT: u32 = 240;
pub const MIN_WINDOW_WIDTH: u32 = 320;

/// Builds the window settings. Close requests are handled by the app so the
/// playback pipeline is released before the window disappears.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads the config, picks the locale and opens the clip given on the
    /// command line, if any.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang, &config);
        if let Some(key) = config_warning {
            tracing::warn!(message = %i18n.tr(&key), "settings ignored");
        }

        if let Err(e) = video_player::init_ffmpeg() {
            tracing::error!(error = %e, "video decoding unavailable");
        }

        let mut app = Self {
            i18n,
            viewer: Viewer::new(ViewerSettings::from_config(&config)),
            window_id: None,
        };

        let task = match flags.file_path {
            Some(path) => update::dispatch(&mut app.viewer, None, Event::OpenPath(path)),
            None => Task::none(),
        };

        (app, task)
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match self
            .viewer
            .media()
            .and_then(|media| media.path().file_name())
            .and_then(|name| name.to_str())
        {
            Some(file_name) => format!("{file_name} - {app_name}"),
            None => app_name,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::update(&mut self.viewer, &mut self.window_id, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(&self.viewer, &self.i18n)
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::window_events(),
            subscription::playback(&self.viewer),
        ])
    }
}
