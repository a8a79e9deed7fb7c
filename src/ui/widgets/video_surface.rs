// SPDX-License-Identifier: MPL-2.0
//! Surface showing the latest decoded frame of the playing clip.
//!
//! Frames are letterboxed into the available space and rotated as a whole,
//! so a quarter turn fits the rotated bounding box into the window.

use crate::ui::state::RotationAngle;
use iced::widget::{container, image, Space};
use iced::{Color, ContentFit, Element, Length, Radians, Rotation};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct VideoSurface {
    handle: Option<image::Handle>,
    width: u32,
    height: u32,
}

impl VideoSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the displayed frame with RGBA pixels.
    pub fn set_frame(&mut self, rgba_data: Arc<Vec<u8>>, width: u32, height: u32) {
        // Take the buffer without copying when the decoder dropped its reference
        let data = Arc::try_unwrap(rgba_data).unwrap_or_else(|arc| (*arc).clone());
        self.handle = Some(image::Handle::from_rgba(width, height, data));
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) {
        self.handle = None;
        self.width = 0;
        self.height = 0;
    }

    #[must_use]
    pub fn has_frame(&self) -> bool {
        self.handle.is_some()
    }

    /// Frame size in pixels, `(0, 0)` without a frame.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn view<'a, Message: 'a>(&'a self, rotation: RotationAngle) -> Element<'a, Message> {
        let content: Element<'a, Message> = match &self.handle {
            Some(handle) => image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .rotation(Rotation::Solid(Radians(rotation.radians())))
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => Space::new().width(Length::Fill).height(Length::Fill).into(),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme: &iced::Theme| container::Style {
                background: Some(Color::BLACK.into()),
                ..Default::default()
            })
            .into()
    }
}
