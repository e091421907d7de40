use crate::engine::render::{paint_text, Rgb, BLUE, GREEN, GREY, MAGENTA, ORANGE, RED, WHITE, YELLOW};
use crate::engine::{Game, Grid, Input, Point, Status};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty
{
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty
{
    /// Width, height and mine count.
    pub fn dimensions(self) -> (usize, usize, usize)
    {
        match self {
            Difficulty::Beginner => (9, 9, 10),
            Difficulty::Intermediate => (16, 16, 40),
            Difficulty::Expert => (30, 16, 99),
        }
    }
}

impl FromStr for Difficulty
{
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err>
    {
        match value.to_ascii_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "expert" | "hard" => Ok(Difficulty::Expert),
            other => Err(format!(
                "unknown difficulty '{other}', expected beginner, intermediate or expert"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Tile
{
    mine: bool,
    revealed: bool,
    flagged: bool,
    adjacent: u8,
}

pub struct Minesweeper
{
    tiles: Grid<Tile>,
    mines: usize,
    cursor: Point,
    placed: bool,
    seconds: u32,
    revealed: usize,
    exploded: Option<Point>,
    status: Status,
    rng: StdRng,
}

impl Minesweeper
{
    pub fn new(seed: u64, difficulty: Difficulty) -> Self
    {
        let (width, height, mines) = difficulty.dimensions();
        Self::with_size(seed, width, height, mines)
    }

    pub fn with_size(seed: u64, width: usize, height: usize, mines: usize) -> Self
    {
        Self {
            tiles: Grid::new(width, height, Tile::default()),
            mines: mines.min(width * height - 1),
            cursor: Point::new(width as i32 / 2, height as i32 / 2),
            placed: false,
            seconds: 0,
            revealed: 0,
            exploded: None,
            status: Status::Running,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn flags(&self) -> usize
    {
        self.tiles.iter().filter(|(_, tile)| tile.flagged).count()
    }

    /// Places mines anywhere except `safe` and, when the board has room, its
    /// neighbours.
    fn place_mines(&mut self, safe: Point)
    {
        let keep_clear: Vec<Point> = std::iter::once(safe)
            .chain(self.tiles.neighbors8(safe))
            .collect();
        let room = self.tiles.len() - keep_clear.len();
        let candidates: Vec<Point> = self
            .tiles
            .points()
            .filter(|point| {
                if room >= self.mines {
                    !keep_clear.contains(point)
                } else {
                    *point != safe
                }
            })
            .collect();
        let chosen = candidates.into_iter().choose_multiple(&mut self.rng, self.mines);
        for point in chosen {
            self.set_mine(point);
        }
        self.placed = true;
    }

    fn set_mine(&mut self, point: Point)
    {
        if let Some(tile) = self.tiles.get_mut(point) {
            tile.mine = true;
        }
        let neighbours: Vec<Point> = self.tiles.neighbors8(point).collect();
        for neighbour in neighbours {
            if let Some(tile) = self.tiles.get_mut(neighbour) {
                tile.adjacent += 1;
            }
        }
    }

    pub fn reveal(&mut self, point: Point)
    {
        if self.status != Status::Running {
            return;
        }
        if !self.placed {
            self.place_mines(point);
        }
        let Some(tile) = self.tiles.get(point).copied() else {
            return;
        };
        if tile.flagged {
            return;
        }
        if tile.revealed {
            self.chord(point);
        } else {
            self.open(point);
        }
        self.check_win();
    }

    fn open(&mut self, start: Point)
    {
        let mut queue = VecDeque::from([start]);
        while let Some(point) = queue.pop_front() {
            let Some(tile) = self.tiles.get_mut(point) else {
                continue;
            };
            if tile.revealed || tile.flagged {
                continue;
            }
            tile.revealed = true;
            if tile.mine {
                self.exploded = Some(point);
                self.status = Status::Lost;
                return;
            }
            self.revealed += 1;
            if tile.adjacent == 0 {
                queue.extend(self.tiles.neighbors8(point));
            }
        }
    }

    /// Opens the neighbours of a revealed number once enough flags surround it.
    fn chord(&mut self, point: Point)
    {
        let Some(tile) = self.tiles.get(point).copied() else {
            return;
        };
        let neighbours: Vec<Point> = self.tiles.neighbors8(point).collect();
        let flags = neighbours
            .iter()
            .filter(|p| self.tiles.get(**p).is_some_and(|t| t.flagged))
            .count();
        if tile.adjacent == 0 || flags != usize::from(tile.adjacent) {
            return;
        }
        for neighbour in neighbours {
            self.open(neighbour);
            if self.status != Status::Running {
                return;
            }
        }
    }

    pub fn toggle_flag(&mut self, point: Point)
    {
        if self.status != Status::Running {
            return;
        }
        if let Some(tile) = self.tiles.get_mut(point) {
            if !tile.revealed {
                tile.flagged = !tile.flagged;
            }
        }
    }

    fn check_win(&mut self)
    {
        if self.status == Status::Running && self.revealed == self.tiles.len() - self.mines {
            self.status = Status::Won;
            for point in self.tiles.points().collect::<Vec<_>>() {
                if let Some(tile) = self.tiles.get_mut(point) {
                    tile.flagged = tile.mine;
                }
            }
        }
    }

    fn glyph(&self, point: Point, tile: &Tile) -> (String, Rgb)
    {
        let show_mine = tile.mine && self.status != Status::Running;
        if tile.flagged {
            return ("F".to_string(), RED);
        }
        if show_mine {
            let color = if self.exploded == Some(point) { RED } else { WHITE };
            return ("*".to_string(), color);
        }
        if !tile.revealed {
            return ("#".to_string(), GREY);
        }
        match tile.adjacent {
            0 => (".".to_string(), GREY),
            n => (n.to_string(), number_color(n)),
        }
    }
}

fn number_color(n: u8) -> Rgb
{
    match n {
        1 => BLUE,
        2 => GREEN,
        3 => RED,
        4 => MAGENTA,
        5 => ORANGE,
        _ => YELLOW,
    }
}

impl Game for Minesweeper
{
    fn title(&self) -> &'static str
    {
        "Minesweeper"
    }

    fn controls(&self) -> &'static str
    {
        "Arrows move, Space/Enter reveal, f flag"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        self.placed.then_some(Duration::from_secs(1))
    }

    fn handle_input(&mut self, input: Input)
    {
        match input {
            Input::Move(dir) => {
                let next = self.cursor.offset(dir);
                if self.tiles.contains(next) {
                    self.cursor = next;
                }
            }
            Input::Action => self.reveal(self.cursor),
            Input::Alternate => self.toggle_flag(self.cursor),
            _ => {}
        }
    }

    fn step(&mut self)
    {
        if self.status == Status::Running && self.placed {
            self.seconds = self.seconds.saturating_add(1);
        }
    }

    fn status(&self) -> Status
    {
        self.status
    }

    fn score(&self) -> u32
    {
        if self.status != Status::Won {
            return 0;
        }
        let mines = self.mines as u32;
        (mines * 100).saturating_sub(self.seconds).max(mines)
    }

    fn render(&self) -> Vec<String>
    {
        let mut lines = vec![format!(
            "Mines: {}  Flags: {}  Time: {}s",
            self.mines,
            self.flags(),
            self.seconds
        )];
        for y in 0..self.tiles.height() {
            let mut line = String::new();
            for x in 0..self.tiles.width() {
                let point = Point::new(x as i32, y as i32);
                let Some(tile) = self.tiles.get(point) else {
                    continue;
                };
                let (glyph, color) = self.glyph(point, tile);
                if point == self.cursor && self.status == Status::Running {
                    line.push('[');
                    line.push_str(&paint_text(&glyph, color));
                    line.push(']');
                } else {
                    line.push(' ');
                    line.push_str(&paint_text(&glyph, color));
                    line.push(' ');
                }
            }
            lines.push(line);
        }
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Cleared {} of {} safe cells", self.revealed, self.tiles.len() - self.mines),
            format!("Time: {}s", self.seconds),
        ]
    }
}
