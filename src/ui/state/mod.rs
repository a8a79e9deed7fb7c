// SPDX-License-Identifier: MPL-2.0
//! Small state primitives shared by the viewer components.

pub mod countdown;
pub mod rotation;

pub use countdown::{Countdown, Expiry};
pub use rotation::RotationAngle;
