use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction
{
    Up,
    Down,
    Left,
    Right,
}

impl Direction
{
    pub fn delta(self) -> (i32, i32)
    {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction
    {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn all() -> [Direction; 4]
    {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input
{
    Move(Direction),
    /// Enter or Space.
    Action,
    /// Secondary action such as flagging a cell or asking for a hint.
    Alternate,
    Char(char),
    Backspace,
    Pause,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme
{
    /// Arrows, WASD and HJKL move; letters are commands.
    Arcade,
    /// Only arrows move; printable characters are passed through and Tab
    /// pauses.
    Text,
}

pub fn map_key(key: KeyEvent, scheme: KeyScheme) -> Option<Input>
{
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Input::Quit),
        KeyCode::Up => Some(Input::Move(Direction::Up)),
        KeyCode::Down => Some(Input::Move(Direction::Down)),
        KeyCode::Left => Some(Input::Move(Direction::Left)),
        KeyCode::Right => Some(Input::Move(Direction::Right)),
        KeyCode::Enter => Some(Input::Action),
        KeyCode::Backspace => Some(Input::Backspace),
        KeyCode::Tab => match scheme {
            KeyScheme::Text => Some(Input::Pause),
            KeyScheme::Arcade => Some(Input::Alternate),
        },
        KeyCode::Char(ch) => match scheme {
            KeyScheme::Text => Some(Input::Char(ch)),
            KeyScheme::Arcade => Some(map_arcade_char(ch)),
        },
        _ => None,
    }
}

fn map_arcade_char(ch: char) -> Input
{
    match ch.to_ascii_lowercase() {
        'w' | 'k' => Input::Move(Direction::Up),
        's' | 'j' => Input::Move(Direction::Down),
        'a' | 'h' => Input::Move(Direction::Left),
        'd' | 'l' => Input::Move(Direction::Right),
        ' ' => Input::Action,
        'f' => Input::Alternate,
        'p' => Input::Pause,
        'q' => Input::Quit,
        other => Input::Char(other),
    }
}

const TURN_QUEUE: usize = 2;

/// Pending direction changes for grid movers. Turns are checked against the
/// last queued direction so two quick presses cannot reverse the mover.
#[derive(Debug, Clone)]
pub struct TurnBuffer
{
    current: Direction,
    pending: VecDeque<Direction>,
}

impl TurnBuffer
{
    pub fn new(initial: Direction) -> Self
    {
        Self {
            current: initial,
            pending: VecDeque::with_capacity(TURN_QUEUE),
        }
    }

    pub fn push(&mut self, dir: Direction) -> bool
    {
        let last = self.pending.back().copied().unwrap_or(self.current);
        if dir == last || dir == last.opposite() || self.pending.len() >= TURN_QUEUE {
            return false;
        }
        self.pending.push_back(dir);
        true
    }

    /// Applies the next queued turn, if any, and returns the heading to use.
    pub fn advance(&mut self) -> Direction
    {
        if let Some(next) = self.pending.pop_front() {
            self.current = next;
        }
        self.current
    }
}
