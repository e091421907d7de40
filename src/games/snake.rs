use crate::engine::input::TurnBuffer;
use crate::engine::render::{Canvas, GREEN, RED};
use crate::engine::{Direction, Game, Grid, Input, Point, Status};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::time::Duration;

pub const WIDTH: usize = 20;
pub const HEIGHT: usize = 15;
const START_LEN: usize = 3;
const FOOD_POINTS: u32 = 10;
const START_INTERVAL_MS: u64 = 150;
const MIN_INTERVAL_MS: u64 = 60;
const SPEEDUP_EVERY: u32 = 5;
const SPEEDUP_MS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct SnakeOptions
{
    pub wrap: bool,
}

pub struct Snake
{
    width: usize,
    height: usize,
    wrap: bool,
    /// Head first.
    body: VecDeque<Point>,
    occupied: Grid<bool>,
    turns: TurnBuffer,
    food: Option<Point>,
    eaten: u32,
    score: u32,
    status: Status,
    rng: StdRng,
}

impl Snake
{
    pub fn new(seed: u64, options: SnakeOptions) -> Self
    {
        Self::with_size(seed, options, WIDTH, HEIGHT)
    }

    pub fn with_size(seed: u64, options: SnakeOptions, width: usize, height: usize) -> Self
    {
        let mut occupied = Grid::new(width, height, false);
        let mid = Point::new(width as i32 / 2, height as i32 / 2);
        let body: VecDeque<Point> = (0..START_LEN as i32)
            .map(|offset| mid.translate(-offset, 0))
            .collect();
        for part in &body {
            occupied.set(*part, true);
        }
        let mut snake = Self {
            width,
            height,
            wrap: options.wrap,
            body,
            occupied,
            turns: TurnBuffer::new(Direction::Right),
            food: None,
            eaten: 0,
            score: 0,
            status: Status::Running,
            rng: StdRng::seed_from_u64(seed),
        };
        snake.spawn_food();
        snake
    }

    pub fn head(&self) -> Point
    {
        self.body[0]
    }

    fn spawn_food(&mut self)
    {
        self.food = self
            .occupied
            .iter()
            .filter(|(_, taken)| !**taken)
            .map(|(point, _)| point)
            .choose(&mut self.rng);
        if self.food.is_none() {
            self.status = Status::Won;
        }
    }

    fn next_head(&self, dir: Direction) -> Option<Point>
    {
        let next = self.head().offset(dir);
        if self.occupied.contains(next) {
            return Some(next);
        }
        if !self.wrap {
            return None;
        }
        Some(Point::new(
            next.x.rem_euclid(self.width as i32),
            next.y.rem_euclid(self.height as i32),
        ))
    }

    #[cfg(test)]
    fn place_food(&mut self, point: Point)
    {
        self.food = Some(point);
    }
}

impl Game for Snake
{
    fn title(&self) -> &'static str
    {
        "Snake"
    }

    fn controls(&self) -> &'static str
    {
        "Arrows/WASD steer"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        let speedups = u64::from(self.eaten / SPEEDUP_EVERY);
        let ms = START_INTERVAL_MS
            .saturating_sub(speedups * SPEEDUP_MS)
            .max(MIN_INTERVAL_MS);
        Some(Duration::from_millis(ms))
    }

    fn handle_input(&mut self, input: Input)
    {
        if let Input::Move(dir) = input {
            self.turns.push(dir);
        }
    }

    fn step(&mut self)
    {
        if self.status != Status::Running {
            return;
        }
        let dir = self.turns.advance();
        let Some(next) = self.next_head(dir) else {
            self.status = Status::Lost;
            return;
        };

        let grows = self.food == Some(next);
        if !grows {
            if let Some(tail) = self.body.pop_back() {
                self.occupied.set(tail, false);
            }
        }
        if self.occupied.get(next).copied().unwrap_or(true) {
            self.status = Status::Lost;
            return;
        }

        self.body.push_front(next);
        self.occupied.set(next, true);
        if grows {
            self.eaten += 1;
            self.score += FOOD_POINTS;
            self.spawn_food();
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
        let mut canvas = Canvas::new(self.width * 2, self.height);
        if let Some(food) = self.food {
            canvas.text(food.x as usize * 2, food.y as usize, "()", Some(RED));
        }
        for (idx, part) in self.body.iter().enumerate() {
            let glyph = if idx == 0 { "@@" } else { "[]" };
            canvas.text(part.x as usize * 2, part.y as usize, glyph, Some(GREEN));
        }
        let mut lines = vec![format!("Length: {}  Food: {}", self.body.len(), self.eaten)];
        lines.extend(canvas.to_framed_lines());
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Length: {}", self.body.len()),
            format!("Food eaten: {}", self.eaten),
        ]
    }
}
