//! Popup presenter state: Hidden ⇄ Visible, anchored near the pointer.

use crate::place::PlaceInfo;
use glam::Vec2;

/// Offset from the pointer to the popup's top-left corner, logical pixels.
pub const POINTER_OFFSET_PX: Vec2 = Vec2::new(15.0, 15.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupPhase {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Default)]
pub struct PopupState {
    phase: PopupPhase,
    anchor: Vec2,
    content: Option<PlaceInfo>,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PopupPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase == PopupPhase::Visible
    }

    /// Top-left corner of the popup, logical pixels.
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn content(&self) -> Option<&PlaceInfo> {
        self.content.as_ref()
    }

    /// Shows (or refreshes) the popup at `pointer + POINTER_OFFSET_PX`.
    pub fn show(&mut self, place: PlaceInfo, pointer: Vec2) {
        self.content = Some(place);
        self.anchor = pointer + POINTER_OFFSET_PX;
        self.phase = PopupPhase::Visible;
    }

    /// Moves a visible popup along with the pointer; no-op when hidden.
    pub fn follow(&mut self, pointer: Vec2) {
        if self.is_visible() {
            self.anchor = pointer + POINTER_OFFSET_PX;
        }
    }

    /// Hides the popup and drops its content.
    pub fn hide(&mut self) {
        if self.phase == PopupPhase::Visible {
            log::trace!("popup hidden");
        }
        self.phase = PopupPhase::Hidden;
        self.content = None;
    }

    /// The fixed-format text block, or `None` while hidden.
    pub fn text(&self) -> Option<String> {
        if !self.is_visible() {
            return None;
        }
        self.content.as_ref().map(|p| {
            format!(
                "{}\nTimezone: {}\nTime: {}",
                p.country, p.timezone, p.local_time
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place() -> PlaceInfo {
        PlaceInfo {
            country: "Testland".into(),
            timezone: "Etc/GMT-1".into(),
            local_time: "12:00:00".into(),
        }
    }

    #[test]
    fn starts_hidden() {
        let p = PopupState::new();
        assert_eq!(p.phase(), PopupPhase::Hidden);
        assert!(p.text().is_none());
    }

    #[test]
    fn show_follow_hide() {
        let mut p = PopupState::new();
        p.follow(Vec2::new(1.0, 1.0));
        assert_eq!(p.anchor(), Vec2::ZERO);

        p.show(place(), Vec2::new(100.0, 50.0));
        assert!(p.is_visible());
        assert_eq!(p.anchor(), Vec2::new(115.0, 65.0));
        assert_eq!(
            p.text().unwrap(),
            "Testland\nTimezone: Etc/GMT-1\nTime: 12:00:00"
        );

        p.follow(Vec2::new(10.0, 20.0));
        assert_eq!(p.anchor(), Vec2::new(25.0, 35.0));

        p.hide();
        assert_eq!(p.phase(), PopupPhase::Hidden);
        assert!(p.content().is_none());
        assert!(p.text().is_none());
    }
}
