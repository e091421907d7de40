use crate::engine::collision::{clear_rows, full_rows};
use crate::engine::render::{Canvas, Rgb, BLUE, CYAN, GREEN, MAGENTA, ORANGE, RED, YELLOW};
use crate::engine::{Direction, Game, Grid, Input, Point, Status};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

pub const WIDTH: usize = 10;
pub const HEIGHT: usize = 20;
const DROP_INTERVALS_MS: [u64; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];
const DROP_INTERVAL_FLOOR_MS: u64 = 120;
const LINE_POINTS: [u32; 5] = [0, 100, 300, 500, 800];
const LINES_PER_LEVEL: u32 = 10;
const KICKS: [i32; 5] = [0, -1, 1, -2, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind
{
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind
{
    const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Size of the square box the piece rotates in.
    fn box_size(self) -> i32
    {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    /// Spawn orientation cells inside the rotation box.
    fn base_cells(self) -> [(i32, i32); 4]
    {
        match self {
            PieceKind::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
            PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            PieceKind::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            PieceKind::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            PieceKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            PieceKind::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            PieceKind::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
        }
    }

    fn color(self) -> Rgb
    {
        match self {
            PieceKind::I => CYAN,
            PieceKind::O => YELLOW,
            PieceKind::T => MAGENTA,
            PieceKind::S => GREEN,
            PieceKind::Z => RED,
            PieceKind::J => BLUE,
            PieceKind::L => ORANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece
{
    kind: PieceKind,
    rotation: u8,
    origin: Point,
}

impl Piece
{
    fn spawn(kind: PieceKind) -> Self
    {
        Self {
            kind,
            rotation: 0,
            origin: Point::new((WIDTH as i32 - kind.box_size()) / 2, 0),
        }
    }

    fn cells(&self) -> [Point; 4]
    {
        let n = self.kind.box_size();
        self.kind.base_cells().map(|(mut x, mut y)| {
            for _ in 0..self.rotation % 4 {
                (x, y) = (n - 1 - y, x);
            }
            self.origin.translate(x, y)
        })
    }

    fn shifted(&self, dx: i32, dy: i32) -> Self
    {
        Self {
            origin: self.origin.translate(dx, dy),
            ..*self
        }
    }

    fn rotated(&self) -> Self
    {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..*self
        }
    }
}

pub struct Tetris
{
    board: Grid<Option<PieceKind>>,
    active: Piece,
    next: PieceKind,
    bag: Vec<PieceKind>,
    score: u32,
    lines: u32,
    status: Status,
    rng: StdRng,
}

impl Tetris
{
    pub fn new(seed: u64) -> Self
    {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut bag = Vec::new();
        let first = draw_from_bag(&mut bag, &mut rng);
        let next = draw_from_bag(&mut bag, &mut rng);
        Self {
            board: Grid::new(WIDTH, HEIGHT, None),
            active: Piece::spawn(first),
            next,
            bag,
            score: 0,
            lines: 0,
            status: Status::Running,
            rng,
        }
    }

    pub fn level(&self) -> u32
    {
        self.lines / LINES_PER_LEVEL + 1
    }

    fn fits(&self, piece: &Piece) -> bool
    {
        piece
            .cells()
            .iter()
            .all(|cell| matches!(self.board.get(*cell), Some(None)))
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool
    {
        let moved = self.active.shifted(dx, dy);
        if self.fits(&moved) {
            self.active = moved;
            true
        } else {
            false
        }
    }

    fn rotate(&mut self)
    {
        let turned = self.active.rotated();
        for dx in KICKS {
            let kicked = turned.shifted(dx, 0);
            if self.fits(&kicked) {
                self.active = kicked;
                return;
            }
        }
    }

    fn hard_drop(&mut self)
    {
        let mut rows = 0;
        while self.try_shift(0, 1) {
            rows += 1;
        }
        self.score += rows * 2;
        self.lock();
    }

    fn lock(&mut self)
    {
        for cell in self.active.cells() {
            self.board.set(cell, Some(self.active.kind));
        }
        let rows = full_rows(&self.board);
        let cleared = clear_rows(&mut self.board, &rows);
        if cleared > 0 {
            self.score += LINE_POINTS[cleared.min(4)] * self.level();
            self.lines += cleared as u32;
        }

        let kind = self.next;
        self.next = draw_from_bag(&mut self.bag, &mut self.rng);
        self.active = Piece::spawn(kind);
        if !self.fits(&self.active) {
            self.status = Status::Lost;
        }
    }

    fn ghost(&self) -> Piece
    {
        let mut ghost = self.active;
        while self.fits(&ghost.shifted(0, 1)) {
            ghost = ghost.shifted(0, 1);
        }
        ghost
    }
}

fn draw_from_bag(bag: &mut Vec<PieceKind>, rng: &mut StdRng) -> PieceKind
{
    if bag.is_empty() {
        bag.extend(PieceKind::ALL);
        bag.shuffle(rng);
    }
    bag.pop().unwrap_or(PieceKind::T)
}

impl Game for Tetris
{
    fn title(&self) -> &'static str
    {
        "Tetris"
    }

    fn controls(&self) -> &'static str
    {
        "Left/Right move, Up rotates, Down soft drop, Space hard drop"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        let idx = (self.level() as usize - 1).min(DROP_INTERVALS_MS.len() - 1);
        let extra_levels = u64::from(self.level().saturating_sub(DROP_INTERVALS_MS.len() as u32));
        let ms = DROP_INTERVALS_MS[idx]
            .saturating_sub(extra_levels * 10)
            .max(DROP_INTERVAL_FLOOR_MS);
        Some(Duration::from_millis(ms))
    }

    fn handle_input(&mut self, input: Input)
    {
        if self.status != Status::Running {
            return;
        }
        match input {
            Input::Move(Direction::Left) => {
                self.try_shift(-1, 0);
            }
            Input::Move(Direction::Right) => {
                self.try_shift(1, 0);
            }
            Input::Move(Direction::Up) | Input::Alternate => self.rotate(),
            Input::Move(Direction::Down) => {
                if self.try_shift(0, 1) {
                    self.score += 1;
                }
            }
            Input::Action => self.hard_drop(),
            _ => {}
        }
    }

    fn step(&mut self)
    {
        if self.status == Status::Running && !self.try_shift(0, 1) {
            self.lock();
        }
    }

    fn status(&self) -> Status
    {
        self.status
    }

    fn score(&self) -> u32
    {
        self.score
    }

    fn render(&self) -> Vec<String>
    {
        let mut canvas = Canvas::new(WIDTH * 2, HEIGHT);
        for (point, cell) in self.board.iter() {
            if let Some(kind) = cell {
                canvas.text(point.x as usize * 2, point.y as usize, "[]", Some(kind.color()));
            }
        }
        for cell in self.ghost().cells() {
            canvas.text(cell.x as usize * 2, cell.y as usize, "::", None);
        }
        for cell in self.active.cells() {
            let color = Some(self.active.kind.color());
            canvas.text(cell.x as usize * 2, cell.y as usize, "[]", color);
        }

        let mut lines = canvas.to_framed_lines();
        let mut preview = Canvas::new(8, 2);
        for cell in Piece::spawn(self.next).cells() {
            let x = cell.x - Piece::spawn(self.next).origin.x;
            preview.text(x as usize * 2, cell.y as usize, "[]", Some(self.next.color()));
        }
        let side = [
            format!("Level: {}", self.level()),
            format!("Lines: {}", self.lines),
            "Next:".to_string(),
            preview.row_text(0),
            preview.row_text(1),
        ];
        for (idx, text) in side.iter().enumerate() {
            if let Some(line) = lines.get_mut(idx + 1) {
                line.push_str("  ");
                line.push_str(text);
            }
        }
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Level: {}", self.level()),
            format!("Lines cleared: {}", self.lines),
        ]
    }
}
