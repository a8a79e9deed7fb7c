// SPDX-License-Identifier: MPL-2.0
//! Fullscreen coordinator.
//!
//! Tracks the window mode and asks for the opposite one on toggle. The
//! tracked mode is a guess until the window reports its real mode, which
//! happens after every request and every resize. A report that changes the
//! mode, or the first one after a request, counts as a mode change.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    #[default]
    Windowed,
    Fullscreen,
}

impl From<WindowMode> for iced::window::Mode {
    fn from(mode: WindowMode) -> Self {
        match mode {
            WindowMode::Windowed => iced::window::Mode::Windowed,
            WindowMode::Fullscreen => iced::window::Mode::Fullscreen,
        }
    }
}

impl From<iced::window::Mode> for WindowMode {
    fn from(mode: iced::window::Mode) -> Self {
        match mode {
            iced::window::Mode::Fullscreen => WindowMode::Fullscreen,
            iced::window::Mode::Windowed | iced::window::Mode::Hidden => WindowMode::Windowed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fullscreen {
    mode: WindowMode,
    pending: bool,
}

impl Fullscreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mode to request: the opposite of the last known one.
    pub fn toggle(&mut self) -> WindowMode {
        self.mode = match self.mode {
            WindowMode::Windowed => WindowMode::Fullscreen,
            WindowMode::Fullscreen => WindowMode::Windowed,
        };
        self.pending = true;
        self.mode
    }

    /// Adopts the mode reported by the window. Returns `true` when the
    /// report answers a request or shows a mode change made elsewhere.
    pub fn observe(&mut self, actual: WindowMode) -> bool {
        let changed = actual != self.mode;
        self.mode = actual;
        std::mem::take(&mut self.pending) || changed
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.mode == WindowMode::Fullscreen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates_modes() {
        let mut fullscreen = Fullscreen::new();

        assert_eq!(fullscreen.toggle(), WindowMode::Fullscreen);
        assert!(fullscreen.is_fullscreen());
        assert_eq!(fullscreen.toggle(), WindowMode::Windowed);
        assert!(!fullscreen.is_fullscreen());
    }

    #[test]
    fn only_first_report_after_toggle_counts() {
        let mut fullscreen = Fullscreen::new();
        assert!(!fullscreen.observe(WindowMode::Windowed));

        fullscreen.toggle();
        assert!(fullscreen.observe(WindowMode::Fullscreen));
        assert!(!fullscreen.observe(WindowMode::Fullscreen));
    }

    #[test]
    fn denied_request_is_corrected() {
        let mut fullscreen = Fullscreen::new();
        fullscreen.toggle();

        fullscreen.observe(WindowMode::Windowed);

        assert!(!fullscreen.is_fullscreen());
        assert_eq!(fullscreen.toggle(), WindowMode::Fullscreen);
    }

    #[test]
    fn external_exit_counts_as_change() {
        let mut fullscreen = Fullscreen::new();
        fullscreen.toggle();
        fullscreen.observe(WindowMode::Fullscreen);

        assert!(fullscreen.observe(WindowMode::Windowed));
        assert!(!fullscreen.is_fullscreen());
    }

    #[test]
    fn converts_between_iced_modes() {
        assert_eq!(
            iced::window::Mode::from(WindowMode::Fullscreen),
            iced::window::Mode::Fullscreen
        );
        assert_eq!(
            WindowMode::from(iced::window::Mode::Hidden),
            WindowMode::Windowed
        );
    }
}
