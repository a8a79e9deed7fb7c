// SPDX-License-Identifier: MPL-2.0
//! Thin clickable progress bar pinned to the bottom of the window.

use iced::widget::canvas::{self, Frame, Geometry};
use iced::widget::Action;
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};

/// Height of the bar in logical pixels.
pub const SEEK_BAR_HEIGHT: f32 = 8.0;

const TRACK_ALPHA: f32 = 0.4;

/// Canvas program drawing the played fraction of the clip.
pub struct SeekBar<Message> {
    progress: f32,
    visible: bool,
    on_seek: fn(f64) -> Message,
}

impl<Message> SeekBar<Message> {
    pub fn new(progress: f64, visible: bool, on_seek: fn(f64) -> Message) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0) as f32,
            visible,
            on_seek,
        }
    }

    fn track_color(&self) -> Color {
        let alpha = if self.visible { TRACK_ALPHA } else { 0.0 };
        Color::from_rgba(0.5, 0.5, 0.5, alpha)
    }

    fn fill_color(&self) -> Color {
        let alpha = if self.visible { 1.0 } else { 0.0 };
        Color::from_rgba(1.0, 1.0, 1.0, alpha)
    }
}

/// Fraction of the bar under `x`, clamped to `[0, 1]`.
#[must_use]
pub fn fraction_at(x: f32, width: f32) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    f64::from((x / width).clamp(0.0, 1.0))
}

impl<Message: Clone> canvas::Program<Message> for SeekBar<Message> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let fraction = fraction_at(position.x, bounds.width);
                Some(Action::publish((self.on_seek)(fraction)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), self.track_color());
        if self.progress > 0.0 {
            frame.fill_rectangle(
                Point::ORIGIN,
                Size::new(bounds.width * self.progress, bounds.height),
                self.fill_color(),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}
