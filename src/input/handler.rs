use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::collections::VecDeque;

use crate::game::{Direction, FruitKind, Intent, IntentSource};

/// Minimum drag distance, in terminal cells, that counts as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: u16 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Intent(Intent),
    Quit,
    None,
}

/// Turns terminal events into intents and queues them for the game session
pub struct InputHandler {
    queue: VecDeque<Intent>,
    swipe_start: Option<(u16, u16)>,
    swipe_threshold: u16,
    speed_step: f64,
}

impl InputHandler {
    pub fn new(speed_step: f64) -> Self {
        Self {
            queue: VecDeque::new(),
            swipe_start: None,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            speed_step,
        }
    }

    /// Handle any terminal event. Returns true when the user asked to quit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }
                match self.handle_key_event(key) {
                    KeyAction::Intent(intent) => self.queue.push_back(intent),
                    KeyAction::Quit => return true,
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => {
                if let Some(direction) = self.handle_mouse_event(mouse) {
                    self.queue.push_back(Intent::Turn(direction));
                }
            }
            _ => {}
        }
        false
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let turn = |direction| KeyAction::Intent(Intent::Turn(direction));

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Run controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::Intent(Intent::TogglePause)
            }
            KeyCode::Enter => KeyAction::Intent(Intent::Start),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Intent(Intent::Reset),

            // Speed
            KeyCode::Char('+') | KeyCode::Char('=') => {
                KeyAction::Intent(Intent::AdjustSpeed(self.speed_step))
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                KeyAction::Intent(Intent::AdjustSpeed(-self.speed_step))
            }

            // Fruit mode
            KeyCode::Char('1') => KeyAction::Intent(Intent::SelectFruit(FruitKind::Normal)),
            KeyCode::Char('2') => KeyAction::Intent(Intent::SelectFruit(FruitKind::Bonus)),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Track left-button drags and report a direction once a drag ends far
    /// enough from where it started.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<Direction> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe_start = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (start_col, start_row) = self.swipe_start.take()?;
                let dx = i32::from(mouse.column) - i32::from(start_col);
                let dy = i32::from(mouse.row) - i32::from(start_row);
                swipe_direction(dx, dy, i32::from(self.swipe_threshold))
            }
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl IntentSource for InputHandler {
    fn next_intent(&mut self) -> Option<Intent> {
        self.queue.pop_front()
    }
}

/// Map a drag vector to the dominant axis. Drags no longer than `threshold`
/// on either axis are ignored; ties go to the vertical axis.
pub fn swipe_direction(dx: i32, dy: i32, threshold: i32) -> Option<Direction> {
    if dx.abs() <= threshold && dy.abs() <= threshold {
        return None;
    }

    let direction = if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    };

    Some(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::default();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Up)),
            KeyAction::Intent(Intent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Down)),
            KeyAction::Intent(Intent::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Left)),
            KeyAction::Intent(Intent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Right)),
            KeyAction::Intent(Intent::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::default();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('w'))),
            KeyAction::Intent(Intent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('a'))),
            KeyAction::Intent(Intent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            KeyAction::Intent(Intent::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('d'))),
            KeyAction::Intent(Intent::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_run_controls() {
        let handler = InputHandler::default();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char(' '))),
            KeyAction::Intent(Intent::TogglePause)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Enter)),
            KeyAction::Intent(Intent::Start)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('R'))),
            KeyAction::Intent(Intent::Reset)
        );
    }

    #[test]
    fn test_speed_and_fruit_keys() {
        let handler = InputHandler::new(2.0);

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('+'))),
            KeyAction::Intent(Intent::AdjustSpeed(2.0))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('-'))),
            KeyAction::Intent(Intent::AdjustSpeed(-2.0))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('2'))),
            KeyAction::Intent(Intent::SelectFruit(FruitKind::Bonus))
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::default();

        assert_eq!(handler.handle_key_event(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(key(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::default();
        assert_eq!(handler.handle_key_event(key(KeyCode::Char('x'))), KeyAction::None);
    }

    #[test]
    fn test_events_are_queued() {
        let mut handler = InputHandler::default();

        assert!(!handler.handle_event(Event::Key(key(KeyCode::Up))));
        assert!(!handler.handle_event(Event::Key(key(KeyCode::Char(' ')))));
        assert!(handler.handle_event(Event::Key(key(KeyCode::Char('q')))));

        assert_eq!(handler.next_intent(), Some(Intent::Turn(Direction::Up)));
        assert_eq!(handler.next_intent(), Some(Intent::TogglePause));
        assert_eq!(handler.next_intent(), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut handler = InputHandler::default();
        let mut release = key(KeyCode::Up);
        release.kind = KeyEventKind::Release;

        handler.handle_event(Event::Key(release));
        assert_eq!(handler.next_intent(), None);
    }

    #[test]
    fn test_swipe_direction() {
        assert_eq!(swipe_direction(5, 1, 2), Some(Direction::Right));
        assert_eq!(swipe_direction(-5, 1, 2), Some(Direction::Left));
        assert_eq!(swipe_direction(1, 4, 2), Some(Direction::Down));
        assert_eq!(swipe_direction(0, -3, 2), Some(Direction::Up));
        assert_eq!(swipe_direction(2, -2, 2), None);
    }

    #[test]
    fn test_mouse_drag_becomes_turn() {
        let mut handler = InputHandler::default();

        handler.handle_event(Event::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)));
        handler.handle_event(Event::Mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10, 4)));

        assert_eq!(handler.next_intent(), Some(Intent::Turn(Direction::Up)));
    }

    #[test]
    fn test_mouse_up_without_down_ignored() {
        let mut handler = InputHandler::default();
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0)),
            None
        );
    }
}
