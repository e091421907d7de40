use crate::engine::render::{ansi_bg, paint_text, Rgb, BLUE, CYAN, GOLD, GREEN, GREY, MAGENTA, RED, WHITE};
use crate::engine::{Game, Input, Point, Status};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

pub const COLUMNS: i32 = 6;
pub const ROWS: i32 = 4;
pub const TILE_COUNT: usize = 42;
const PAIR_POINTS: u32 = 10;
const HINT_COST: u32 = 5;
const DEAL_ATTEMPTS: usize = 64;

/// Bottom to top: each layer is a rectangle of (x, y) spots, stacked on the
/// one below.
const LAYERS: [(i32, i32, i32, i32); 3] = [(0, 0, 6, 4), (1, 0, 4, 3), (2, 0, 3, 2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face
{
    suit: u8,
    rank: u8,
}

impl Face
{
    fn all() -> Vec<Face>
    {
        let mut faces = Vec::with_capacity(TILE_COUNT / 2);
        for (suit, ranks) in [(0u8, 9u8), (1, 9), (2, 3)] {
            for rank in 1..=ranks {
                faces.push(Face { suit, rank });
            }
        }
        faces
    }

    fn label(self) -> String
    {
        let suit = ['B', 'C', 'D'][self.suit as usize];
        format!("{suit}{}", self.rank)
    }

    fn color(self) -> Rgb
    {
        match self.suit {
            0 => GREEN,
            1 => RED,
            _ => BLUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot
{
    layer: i32,
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tile
{
    slot: Slot,
    face: Face,
    removed: bool,
}

fn layout() -> Vec<Slot>
{
    let mut slots = Vec::with_capacity(TILE_COUNT);
    for (layer, (x0, y0, w, h)) in LAYERS.iter().enumerate() {
        for y in *y0..y0 + h {
            for x in *x0..x0 + w {
                slots.push(Slot { layer: layer as i32, x, y });
            }
        }
    }
    slots
}

/// A slot is free when nothing lies on it and one horizontal side is open.
fn slot_is_free(slot: Slot, occupied: &[Slot]) -> bool
{
    let taken = |layer: i32, x: i32, y: i32| {
        occupied
            .iter()
            .any(|other| other.layer == layer && other.x == x && other.y == y)
    };
    if taken(slot.layer + 1, slot.x, slot.y) {
        return false;
    }
    !taken(slot.layer, slot.x - 1, slot.y) || !taken(slot.layer, slot.x + 1, slot.y)
}

/// Assigns faces by removing random free pairs from the full layout, so the
/// deal is solvable by replaying that order.
fn deal_solvable(rng: &mut StdRng) -> Option<Vec<Tile>>
{
    let mut remaining = layout();
    let mut faces = Face::all();
    faces.shuffle(rng);
    let mut tiles = Vec::with_capacity(TILE_COUNT);
    for face in faces {
        let free: Vec<Slot> = remaining
            .iter()
            .copied()
            .filter(|slot| slot_is_free(*slot, &remaining))
            .collect();
        let picked: Vec<Slot> = free.choose_multiple(rng, 2).copied().collect();
        if picked.len() < 2 {
            return None;
        }
        for slot in picked {
            remaining.retain(|other| *other != slot);
            tiles.push(Tile {
                slot,
                face,
                removed: false,
            });
        }
    }
    Some(tiles)
}

fn deal(rng: &mut StdRng) -> Vec<Tile>
{
    for _ in 0..DEAL_ATTEMPTS {
        if let Some(tiles) = deal_solvable(rng) {
            return tiles;
        }
    }
    tracing::warn!("falling back to a random mahjong deal");
    let mut faces: Vec<Face> = Face::all().into_iter().flat_map(|face| [face, face]).collect();
    faces.shuffle(rng);
    layout()
        .into_iter()
        .zip(faces)
        .map(|(slot, face)| Tile {
            slot,
            face,
            removed: false,
        })
        .collect()
}

pub struct Mahjong
{
    tiles: Vec<Tile>,
    cursor: Point,
    selected: Option<usize>,
    hint: Option<(usize, usize)>,
    hints_used: u32,
    pairs: u32,
    score: u32,
    message: Option<String>,
    status: Status,
}

impl Mahjong
{
    pub fn new(seed: u64) -> Self
    {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            tiles: deal(&mut rng),
            cursor: Point::new(0, 0),
            selected: None,
            hint: None,
            hints_used: 0,
            pairs: 0,
            score: 0,
            message: None,
            status: Status::Running,
        }
    }

    pub fn tiles_left(&self) -> usize
    {
        self.tiles.iter().filter(|tile| !tile.removed).count()
    }

    fn occupied(&self) -> Vec<Slot>
    {
        self.tiles
            .iter()
            .filter(|tile| !tile.removed)
            .map(|tile| tile.slot)
            .collect()
    }

    fn is_free(&self, idx: usize) -> bool
    {
        let tile = &self.tiles[idx];
        !tile.removed && slot_is_free(tile.slot, &self.occupied())
    }

    /// Index of the highest tile still standing at a board position.
    fn top_at(&self, at: Point) -> Option<usize>
    {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| !tile.removed && tile.slot.x == at.x && tile.slot.y == at.y)
            .max_by_key(|(_, tile)| tile.slot.layer)
            .map(|(idx, _)| idx)
    }

    pub fn free_pair(&self) -> Option<(usize, usize)>
    {
        let free: Vec<usize> = (0..self.tiles.len()).filter(|idx| self.is_free(*idx)).collect();
        for (n, a) in free.iter().enumerate() {
            for b in &free[n + 1..] {
                if self.tiles[*a].face == self.tiles[*b].face {
                    return Some((*a, *b));
                }
            }
        }
        None
    }

    fn select(&mut self)
    {
        let Some(idx) = self.top_at(self.cursor) else {
            return;
        };
        if !self.is_free(idx) {
            self.message = Some("That tile is blocked.".to_string());
            return;
        }
        match self.selected {
            Some(prev) if prev == idx => self.selected = None,
            Some(prev) if self.tiles[prev].face == self.tiles[idx].face => {
                self.tiles[prev].removed = true;
                self.tiles[idx].removed = true;
                self.selected = None;
                self.hint = None;
                self.pairs += 1;
                self.score += PAIR_POINTS;
                self.settle();
            }
            _ => self.selected = Some(idx),
        }
    }

    fn show_hint(&mut self)
    {
        self.hint = self.free_pair();
        if self.hint.is_some() {
            self.hints_used += 1;
            self.score = self.score.saturating_sub(HINT_COST);
        }
    }

    fn settle(&mut self)
    {
        if self.tiles_left() == 0 {
            self.status = Status::Won;
        } else if self.free_pair().is_none() {
            self.status = Status::Lost;
        }
    }
}

impl Game for Mahjong
{
    fn title(&self) -> &'static str
    {
        "Mahjong"
    }

    fn controls(&self) -> &'static str
    {
        "Arrows move, Space selects a free tile, f shows a hint (-5)"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        None
    }

    fn handle_input(&mut self, input: Input)
    {
        self.message = None;
        match input {
            Input::Move(dir) => {
                let next = self.cursor.offset(dir);
                if (0..COLUMNS).contains(&next.x) && (0..ROWS).contains(&next.y) {
                    self.cursor = next;
                }
            }
            Input::Action => self.select(),
            Input::Alternate => self.show_hint(),
            _ => {}
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
        let mut lines = vec![format!(
            "Tiles: {}  Pairs: {}  Hints: {}",
            self.tiles_left(),
            self.pairs,
            self.hints_used
        )];
        for y in 0..ROWS {
            let mut line = String::new();
            for x in 0..COLUMNS {
                let at = Point::new(x, y);
                let cell = match self.top_at(at) {
                    Some(idx) => {
                        let tile = &self.tiles[idx];
                        let hinted = self.hint.is_some_and(|(a, b)| a == idx || b == idx);
                        let color = if self.selected == Some(idx) {
                            GOLD
                        } else if hinted {
                            MAGENTA
                        } else if self.is_free(idx) {
                            tile.face.color()
                        } else {
                            GREY
                        };
                        let text = format!("{}{}", tile.face.label(), tile.slot.layer + 1);
                        paint_text(&format!("[{text}]"), color)
                    }
                    None => "  .  ".to_string(),
                };
                if at == self.cursor {
                    line.push_str(&format!("{}{cell}\x1b[0m", ansi_bg(CYAN)));
                } else {
                    line.push_str(&cell);
                }
                line.push(' ');
            }
            lines.push(line);
        }
        lines.push(paint_text("Digit after the face is the stack height.", WHITE));
        if let Some(message) = &self.message {
            lines.push(message.clone());
        }
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Pairs removed: {}", self.pairs),
            format!("Hints used: {}", self.hints_used),
        ]
    }
}
