use crate::engine::collision::slide_and_merge;
use crate::engine::render::{paint_text, Rgb, GOLD, GREY, ORANGE, RED, WHITE, YELLOW};
use crate::engine::{Direction, Game, Grid, Input, Point, Status};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

pub const SIZE: usize = 4;
pub const GOAL: u32 = 2048;

pub struct Merge
{
    board: Grid<u32>,
    score: u32,
    moves: u32,
    status: Status,
    rng: StdRng,
}

impl Merge
{
    pub fn new(seed: u64) -> Self
    {
        let mut game = Self {
            board: Grid::new(SIZE, SIZE, 0),
            score: 0,
            moves: 0,
            status: Status::Running,
            rng: StdRng::seed_from_u64(seed),
        };
        game.spawn_tile();
        game.spawn_tile();
        game
    }

    pub fn max_tile(&self) -> u32
    {
        self.board.iter().map(|(_, value)| *value).max().unwrap_or(0)
    }

    fn spawn_tile(&mut self)
    {
        let free = self
            .board
            .iter()
            .filter(|(_, value)| **value == 0)
            .map(|(point, _)| point)
            .choose(&mut self.rng);
        if let Some(point) = free {
            let value = if self.rng.gen_bool(0.9) { 2 } else { 4 };
            self.board.set(point, value);
        }
    }

    /// Cells of one line ordered from the edge tiles slide toward.
    fn line(dir: Direction, idx: usize) -> [Point; SIZE]
    {
        std::array::from_fn(|k| {
            let (i, k) = (idx as i32, k as i32);
            let last = SIZE as i32 - 1;
            match dir {
                Direction::Left => Point::new(k, i),
                Direction::Right => Point::new(last - k, i),
                Direction::Up => Point::new(i, k),
                Direction::Down => Point::new(i, last - k),
            }
        })
    }

    /// Slides the whole board; returns merge points, or None if nothing moved.
    fn slide(board: &mut Grid<u32>, dir: Direction) -> Option<u32>
    {
        let mut changed = false;
        let mut points = 0;
        for idx in 0..SIZE {
            let cells = Self::line(dir, idx);
            let mut values = cells.map(|point| board.get(point).copied().unwrap_or(0));
            let before = values;
            points += slide_and_merge(&mut values);
            if values != before {
                changed = true;
                for (point, value) in cells.iter().zip(values) {
                    board.set(*point, value);
                }
            }
        }
        changed.then_some(points)
    }

    fn can_move(&self) -> bool
    {
        Direction::all()
            .into_iter()
            .any(|dir| Self::slide(&mut self.board.clone(), dir).is_some())
    }

    pub fn shift(&mut self, dir: Direction) -> bool
    {
        if self.status != Status::Running {
            return false;
        }
        let Some(points) = Self::slide(&mut self.board, dir) else {
            return false;
        };
        self.score += points;
        self.moves += 1;
        self.spawn_tile();
        if self.max_tile() >= GOAL {
            self.status = Status::Won;
        } else if !self.can_move() {
            self.status = Status::Lost;
        }
        true
    }
}

fn tile_color(value: u32) -> Rgb
{
    match value {
        0 => GREY,
        2 | 4 => WHITE,
        8 | 16 => YELLOW,
        32 | 64 => ORANGE,
        128..=512 => RED,
        _ => GOLD,
    }
}

impl Game for Merge
{
    fn title(&self) -> &'static str
    {
        "2048"
    }

    fn controls(&self) -> &'static str
    {
        "Arrows/WASD slide the tiles"
    }

    fn step_interval(&self) -> Option<std::time::Duration>
    {
        None
    }

    fn handle_input(&mut self, input: Input)
    {
        if let Input::Move(dir) = input {
            self.shift(dir);
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
        let edge = format!("+{}", "------+".repeat(SIZE));
        let mut lines = vec![edge.clone()];
        for row in self.board.rows() {
            let mut line = String::from("|");
            for value in row {
                let text = if *value == 0 {
                    format!("{:^6}", ".")
                } else {
                    format!("{:^6}", value)
                };
                line.push_str(&paint_text(&text, tile_color(*value)));
                line.push('|');
            }
            lines.push(line);
            lines.push(edge.clone());
        }
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Largest tile: {}", self.max_tile()),
            format!("Moves: {}", self.moves),
        ]
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn with_rows(rows: [[u32; SIZE]; SIZE]) -> Merge
    {
        let mut game = Merge::new(11);
        for (y, row) in rows.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                game.board.set(Point::new(x as i32, y as i32), *value);
            }
        }
        game
    }

    fn tiles(game: &Merge) -> usize
    {
        game.board.iter().filter(|(_, v)| **v != 0).count()
    }

    #[test]
    fn starts_with_two_tiles()
    {
        let game = Merge::new(1);
        assert_eq!(tiles(&game), 2);
        assert!(game.board.iter().all(|(_, v)| matches!(*v, 0 | 2 | 4)));
    }

    #[test]
    fn merging_right_scores_and_spawns()
    {
        let mut game = with_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(game.shift(Direction::Right));
        assert_eq!(game.board.get(Point::new(3, 0)), Some(&4));
        assert_eq!(game.score(), 4);
        assert_eq!(tiles(&game), 2);
    }

    #[test]
    fn columns_slide_down()
    {
        let mut game = with_rows([[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0; 4]]);
        assert!(game.shift(Direction::Down));
        assert_eq!(game.board.get(Point::new(0, 3)), Some(&4));
        assert_eq!(game.board.get(Point::new(0, 2)), Some(&4));
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn blocked_move_changes_nothing()
    {
        let mut game = with_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = game.board.clone();
        assert!(!game.shift(Direction::Left));
        assert_eq!(game.board, before);
        assert_eq!(game.moves, 0);
    }

    #[test]
    fn reaching_the_goal_wins()
    {
        let mut game = with_rows([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        game.shift(Direction::Left);
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.score(), 2048);
    }

    #[test]
    fn full_board_without_merges_is_lost()
    {
        let mut game = with_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [8, 4, 2, 4],
            [32, 8, 16, 0],
        ]);
        // The new tile lands in the freed corner next to 8 and 32.
        assert!(game.shift(Direction::Right));
        assert!(matches!(game.board.get(Point::new(0, 3)), Some(2 | 4)));
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn can_move_detects_merges_on_full_board()
    {
        let game = with_rows([
            [2, 2, 4, 8],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        assert!(game.can_move());
    }
}
