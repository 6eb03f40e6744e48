use glam::DVec2;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent},
};

use crate::{common::projection::ScreenPoint, data::Size};

/// Pointer and viewport events the globe reacts to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GlobeEvent {
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp,
    PointerLeave,
    Resize(Size<f64>),
}

fn screen_point(position: PhysicalPosition<f64>) -> ScreenPoint {
    DVec2::new(position.x, position.y)
}

/// Maps winit window events onto [`GlobeEvent`]s.
///
/// Mouse button events carry no position, so the last cursor position is
/// remembered. Only the first active touch drives the globe.
#[derive(Clone, Debug, Default)]
pub struct InputTranslator {
    cursor: Option<ScreenPoint>,
    active_touch: Option<u64>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<GlobeEvent> {
        match *event {
            WindowEvent::CursorMoved { position, .. } => {
                let point = screen_point(position);
                self.cursor = Some(point);
                Some(GlobeEvent::PointerMove(point))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.cursor.map(GlobeEvent::PointerDown),
                ElementState::Released => Some(GlobeEvent::PointerUp),
            },
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Some(GlobeEvent::PointerLeave)
            }
            WindowEvent::Resized(size) => Some(GlobeEvent::Resize(Size::from(size).to_f64())),
            WindowEvent::Touch(Touch {
                phase,
                location,
                id,
                ..
            }) => self.translate_touch(phase, screen_point(location), id),
            _ => None,
        }
    }

    fn translate_touch(
        &mut self,
        phase: TouchPhase,
        location: ScreenPoint,
        id: u64,
    ) -> Option<GlobeEvent> {
        match (phase, self.active_touch) {
            (TouchPhase::Started, None) => {
                self.active_touch = Some(id);
                Some(GlobeEvent::PointerDown(location))
            }
            (TouchPhase::Moved, Some(active)) if active == id => {
                Some(GlobeEvent::PointerMove(location))
            }
            (TouchPhase::Ended, Some(active)) if active == id => {
                self.active_touch = None;
                Some(GlobeEvent::PointerUp)
            }
            (TouchPhase::Cancelled, Some(active)) if active == id => {
                self.active_touch = None;
                Some(GlobeEvent::PointerLeave)
            }
            _ => None,
        }
    }
}

/// Convenience for hosts that don't track touches or button presses.
pub fn translate_window_event(event: &WindowEvent) -> Option<GlobeEvent> {
    InputTranslator::new().translate(event)
}

#[cfg(test)]
mod tests {
    use winit::{dpi::PhysicalSize, event::DeviceId};

    use super::*;

    fn device_id() -> DeviceId {
        unsafe { DeviceId::dummy() }
    }

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device_id(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn left_button(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device_id(),
            state,
            button: MouseButton::Left,
        }
    }

    fn touch(phase: TouchPhase, id: u64, x: f64, y: f64) -> WindowEvent {
        WindowEvent::Touch(Touch {
            device_id: device_id(),
            phase,
            location: PhysicalPosition::new(x, y),
            force: None,
            id,
        })
    }

    #[test]
    fn mouse_press_uses_last_cursor_position() {
        let mut translator = InputTranslator::new();
        assert_eq!(translator.translate(&left_button(ElementState::Pressed)), None);

        assert_eq!(
            translator.translate(&cursor_moved(10.0, 20.0)),
            Some(GlobeEvent::PointerMove(DVec2::new(10.0, 20.0)))
        );
        assert_eq!(
            translator.translate(&left_button(ElementState::Pressed)),
            Some(GlobeEvent::PointerDown(DVec2::new(10.0, 20.0)))
        );
        assert_eq!(
            translator.translate(&left_button(ElementState::Released)),
            Some(GlobeEvent::PointerUp)
        );
    }

    #[test]
    fn other_buttons_are_ignored() {
        let event = WindowEvent::MouseInput {
            device_id: device_id(),
            state: ElementState::Pressed,
            button: MouseButton::Right,
        };
        assert_eq!(InputTranslator::new().translate(&event), None);
    }

    #[test]
    fn leave_and_resize() {
        let mut translator = InputTranslator::new();
        assert_eq!(
            translator.translate(&WindowEvent::CursorLeft {
                device_id: device_id()
            }),
            Some(GlobeEvent::PointerLeave)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(GlobeEvent::Resize(Size {
                width: 800.0,
                height: 600.0
            }))
        );
    }

    #[test]
    fn only_the_first_touch_drives_the_globe() {
        let mut translator = InputTranslator::new();
        assert_eq!(
            translator.translate(&touch(TouchPhase::Started, 1, 5.0, 5.0)),
            Some(GlobeEvent::PointerDown(DVec2::new(5.0, 5.0)))
        );
        assert_eq!(translator.translate(&touch(TouchPhase::Started, 2, 9.0, 9.0)), None);
        assert_eq!(translator.translate(&touch(TouchPhase::Moved, 2, 8.0, 8.0)), None);
        assert_eq!(
            translator.translate(&touch(TouchPhase::Moved, 1, 6.0, 6.0)),
            Some(GlobeEvent::PointerMove(DVec2::new(6.0, 6.0)))
        );
        assert_eq!(
            translator.translate(&touch(TouchPhase::Ended, 1, 6.0, 6.0)),
            Some(GlobeEvent::PointerUp)
        );
    }
}
