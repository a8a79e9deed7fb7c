// SPDX-License-Identifier: MPL-2.0
pub mod seek_bar;
pub mod video_surface;

pub use seek_bar::{SeekBar, SEEK_BAR_HEIGHT};
pub use video_surface::VideoSurface;
