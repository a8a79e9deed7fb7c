// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The window is a single black surface: the video (or the drop prompt when
//! nothing is loaded), the overlay message in the top-right corner and the
//! seek bar along the bottom edge.

use super::Message;
use crate::i18n::I18n;
use crate::ui::viewer::Viewer;
use crate::ui::widgets::{SeekBar, SEEK_BAR_HEIGHT};
use crate::video_player::VideoPlayer;
use iced::widget::{canvas, column, container, row, stack, text, Space};
use iced::{Alignment, Background, Color, Element, Length};

const OVERLAY_TEXT_SIZE: f32 = 18.0;
const OVERLAY_PADDING: f32 = 8.0;
const OVERLAY_MARGIN: f32 = 16.0;
const PROMPT_TEXT_SIZE: f32 = 24.0;
const HINT_TEXT_SIZE: f32 = 14.0;

pub fn view<'a>(viewer: &'a Viewer<VideoPlayer>, i18n: &'a I18n) -> Element<'a, Message> {
    let content: Element<'a, Message> = match viewer.media() {
        Some(media) => media.element().surface().view(viewer.rotation()),
        None => drop_prompt(i18n),
    };

    let seek_bar = canvas(SeekBar::new(
        viewer.progress().unwrap_or(0.0),
        viewer.media().is_some() && viewer.controls_visible(),
        Message::SeekBarClicked,
    ))
    .width(Length::Fill)
    .height(Length::Fixed(SEEK_BAR_HEIGHT));

    let overlay_row: Element<'a, Message> = match viewer.overlay_text() {
        Some(message) => row![
            Space::new().width(Length::Fill),
            container(
                text(message.render(i18n))
                    .size(OVERLAY_TEXT_SIZE)
                    .color(Color::WHITE)
            )
            .padding(OVERLAY_PADDING)
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.6))),
                ..container::Style::default()
            }),
        ]
        .padding(OVERLAY_MARGIN)
        .into(),
        None => Space::new().width(Length::Fill).into(),
    };

    let chrome = column![
        overlay_row,
        Space::new().width(Length::Fill).height(Length::Fill),
        seek_bar,
    ]
    .width(Length::Fill)
    .height(Length::Fill);

    container(stack![content, chrome])
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(Color::BLACK)),
            ..container::Style::default()
        })
        .into()
}

fn drop_prompt(i18n: &I18n) -> Element<'_, Message> {
    let prompt = column![
        text(i18n.tr("drop-zone-prompt"))
            .size(PROMPT_TEXT_SIZE)
            .color(Color::WHITE),
        text(i18n.tr("drop-zone-hint"))
            .size(HINT_TEXT_SIZE)
            .color(Color::from_rgb(0.7, 0.7, 0.7)),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    container(prompt)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
