// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pointer interaction state machine
//!
//! Turns raw pointer events into highlighter actions. A press arms drag
//! detection; the first move while pressed still hovers, later ones clear
//! the hover channel, and the release only selects if no drag happened.

use crate::config::MultipleSelectKey;

/// Primary (left) mouse button index
pub const PRIMARY_BUTTON: u8 = 0;

/// Modifier keys held during a pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    /// Whether the configured multi-select key is held
    pub fn is_pressed(&self, key: MultipleSelectKey) -> bool {
        match key {
            MultipleSelectKey::None => false,
            MultipleSelectKey::Shift => self.shift,
            MultipleSelectKey::Ctrl => self.ctrl,
        }
    }
}

/// Pointer event delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Down,
    Move,
    Up {
        button: u8,
        modifiers: Modifiers,
        /// Whether the release happened over the render surface
        on_surface: bool,
    },
    DoubleClick,
}

/// Interaction state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerState {
    #[default]
    Idle,
    /// Button held; `moved` once a drag has been detected
    ArmedForDrag { moved: bool },
}

/// What the highlighter should do in response to an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    Ignore,
    /// Ray-cast select into the hover channel
    Hover,
    /// Drop the hover channel's fills
    ClearHover,
    /// Ray-cast select into the select channel
    Select { exclusive: bool },
    /// Clear the select channel, then select into the double-click channel
    DoubleClickSelect,
}

impl PointerState {
    /// Apply an event and return the resulting action
    pub fn handle(&mut self, event: PointerEvent, multiple: MultipleSelectKey) -> PointerAction {
        match event {
            PointerEvent::Down => {
                *self = PointerState::ArmedForDrag { moved: false };
                PointerAction::Ignore
            }
            PointerEvent::Move => match *self {
                PointerState::Idle => PointerAction::Hover,
                PointerState::ArmedForDrag { moved: false } => {
                    *self = PointerState::ArmedForDrag { moved: true };
                    PointerAction::Hover
                }
                PointerState::ArmedForDrag { moved: true } => PointerAction::ClearHover,
            },
            PointerEvent::Up {
                button,
                modifiers,
                on_surface,
            } => {
                let dragged = matches!(*self, PointerState::ArmedForDrag { moved: true });
                *self = PointerState::Idle;
                if dragged || button != PRIMARY_BUTTON || !on_surface {
                    return PointerAction::Ignore;
                }
                let exclusive = !modifiers.is_pressed(multiple);
                PointerAction::Select { exclusive }
            }
            PointerEvent::DoubleClick => PointerAction::DoubleClickSelect,
        }
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerState::ArmedForDrag { moved: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(modifiers: Modifiers) -> PointerEvent {
        PointerEvent::Up {
            button: PRIMARY_BUTTON,
            modifiers,
            on_surface: true,
        }
    }

    #[test]
    fn test_click_selects_exclusively() {
        let mut state = PointerState::default();
        assert_eq!(
            state.handle(PointerEvent::Down, MultipleSelectKey::Ctrl),
            PointerAction::Ignore
        );
        assert_eq!(
            state.handle(up(Modifiers::default()), MultipleSelectKey::Ctrl),
            PointerAction::Select { exclusive: true }
        );
        assert_eq!(state, PointerState::Idle);
    }

    #[test]
    fn test_modifier_click_adds() {
        let mut state = PointerState::default();
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        state.handle(PointerEvent::Down, MultipleSelectKey::Ctrl);
        assert_eq!(
            state.handle(up(ctrl), MultipleSelectKey::Ctrl),
            PointerAction::Select { exclusive: false }
        );

        // Ctrl is not the configured key here
        state.handle(PointerEvent::Down, MultipleSelectKey::Shift);
        assert_eq!(
            state.handle(up(ctrl), MultipleSelectKey::Shift),
            PointerAction::Select { exclusive: true }
        );

        state.handle(PointerEvent::Down, MultipleSelectKey::None);
        assert_eq!(
            state.handle(up(ctrl), MultipleSelectKey::None),
            PointerAction::Select { exclusive: true }
        );
    }

    #[test]
    fn test_drag_suppresses_click() {
        let mut state = PointerState::default();
        let key = MultipleSelectKey::Ctrl;
        state.handle(PointerEvent::Down, key);
        assert_eq!(state.handle(PointerEvent::Move, key), PointerAction::Hover);
        assert!(state.is_dragging());
        assert_eq!(
            state.handle(PointerEvent::Move, key),
            PointerAction::ClearHover
        );
        assert_eq!(
            state.handle(up(Modifiers::default()), key),
            PointerAction::Ignore
        );
        assert_eq!(state, PointerState::Idle);
        assert_eq!(state.handle(PointerEvent::Move, key), PointerAction::Hover);
    }

    #[test]
    fn test_other_buttons_and_off_surface() {
        let mut state = PointerState::default();
        let key = MultipleSelectKey::Ctrl;
        state.handle(PointerEvent::Down, key);
        let right = PointerEvent::Up {
            button: 2,
            modifiers: Modifiers::default(),
            on_surface: true,
        };
        assert_eq!(state.handle(right, key), PointerAction::Ignore);

        state.handle(PointerEvent::Down, key);
        let outside = PointerEvent::Up {
            button: PRIMARY_BUTTON,
            modifiers: Modifiers::default(),
            on_surface: false,
        };
        assert_eq!(state.handle(outside, key), PointerAction::Ignore);
        assert_eq!(state, PointerState::Idle);
    }

    #[test]
    fn test_double_click() {
        let mut state = PointerState::default();
        assert_eq!(
            state.handle(PointerEvent::DoubleClick, MultipleSelectKey::Ctrl),
            PointerAction::DoubleClickSelect
        );
        assert_eq!(state, PointerState::Idle);
    }
}
