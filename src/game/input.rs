use crossterm::event::KeyCode;
use minifb::Key;

/// The 17 logical control actions. Raw key codes decode into these via the
/// fixed tables below; the game state only ever sees `(Action, pressed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RollLeft,
    RollRight,
    RollCenter,
    PitchLeft,
    PitchRight,
    PitchCenter,
    YawLeft,
    YawRight,
    YawCenter,
    ThrustUp,
    ThrustDown,
    ThrustCenter,
    ViewBackRight,
    ViewFrontLeft,
    ViewTop,
    ViewStatic,
    ViewOrbit,
}

/// Window-mode bindings. A partial mapping by design: unmapped keys decode
/// to `None` and are silently ignored.
pub fn action_for_window_key(key: Key) -> Option<Action> {
    Some(match key {
        Key::A => Action::RollLeft,
        Key::D => Action::RollRight,
        Key::F => Action::RollCenter,
        Key::W => Action::PitchLeft,
        Key::S => Action::PitchRight,
        Key::Key2 => Action::PitchCenter,
        Key::Q => Action::YawLeft,
        Key::E => Action::YawRight,
        Key::R => Action::YawCenter,
        Key::Up => Action::ThrustUp,
        Key::Down => Action::ThrustDown,
        Key::Space => Action::ThrustCenter,
        Key::L => Action::ViewBackRight,
        Key::U => Action::ViewFrontLeft,
        Key::I => Action::ViewTop,
        Key::K => Action::ViewStatic,
        Key::O => Action::ViewOrbit,
        _ => return None,
    })
}

/// Terminal-mode bindings, same layout as the window table.
pub fn action_for_terminal_key(code: KeyCode) -> Option<Action> {
    Some(match code {
        KeyCode::Char('a') | KeyCode::Char('A') => Action::RollLeft,
        KeyCode::Char('d') | KeyCode::Char('D') => Action::RollRight,
        KeyCode::Char('f') | KeyCode::Char('F') => Action::RollCenter,
        KeyCode::Char('w') | KeyCode::Char('W') => Action::PitchLeft,
        KeyCode::Char('s') | KeyCode::Char('S') => Action::PitchRight,
        KeyCode::Char('2') => Action::PitchCenter,
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::YawLeft,
        KeyCode::Char('e') | KeyCode::Char('E') => Action::YawRight,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::YawCenter,
        KeyCode::Up => Action::ThrustUp,
        KeyCode::Down => Action::ThrustDown,
        KeyCode::Char(' ') => Action::ThrustCenter,
        KeyCode::Char('l') | KeyCode::Char('L') => Action::ViewBackRight,
        KeyCode::Char('u') | KeyCode::Char('U') => Action::ViewFrontLeft,
        KeyCode::Char('i') | KeyCode::Char('I') => Action::ViewTop,
        KeyCode::Char('k') | KeyCode::Char('K') => Action::ViewStatic,
        KeyCode::Char('o') | KeyCode::Char('O') => Action::ViewOrbit,
        _ => return None,
    })
}
