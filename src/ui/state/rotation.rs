// SPDX-License-Identifier: MPL-2.0
//! Display rotation of the video surface.

/// Rotation angle in 90° increments.
///
/// Always one of 0°, 90°, 180° or 270°.
///
/// # Example
///
/// ```
/// use dropplay::ui::state::RotationAngle;
///
/// let angle = RotationAngle::default().rotate_clockwise();
/// assert_eq!(angle.degrees(), 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationAngle(u16);

impl RotationAngle {
    #[must_use]
    pub fn degrees(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn radians(self) -> f32 {
        f32::from(self.0).to_radians()
    }

    /// Advances by +90° modulo 360°.
    #[must_use]
    pub fn rotate_clockwise(self) -> Self {
        Self((self.0 + 90) % 360)
    }
}
