use crate::engine::collision::{paddle_hit_factor, Rect};
use crate::engine::render::{Canvas, Rgb, BLUE, GREEN, ORANGE, RED, WHITE, YELLOW};
use crate::engine::{Direction, Game, Grid, Input, Point, Status};
use std::time::Duration;

pub const WIDTH: usize = 40;
pub const HEIGHT: usize = 24;
const BRICK_COLS: usize = 10;
const BRICK_ROWS: usize = 5;
const BRICK_WIDTH: f32 = WIDTH as f32 / BRICK_COLS as f32;
const BRICK_TOP: f32 = 2.0;
const PADDLE_Y: f32 = HEIGHT as f32 - 2.0;
const PADDLE_WIDTH: f32 = 7.0;
const PADDLE_STEP: f32 = 2.0;
const BALL_SPEED_Y: f32 = 0.5;
const MAX_SPEED_X: f32 = 0.6;
const BALL_RADIUS: f32 = 0.25;
const START_LIVES: u8 = 3;
const STEP_MS: u64 = 33;
const ROW_COLORS: [Rgb; BRICK_ROWS] = [RED, ORANGE, YELLOW, GREEN, BLUE];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ball
{
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

impl Ball
{
    fn hitbox(&self) -> Rect
    {
        let size = 2.0 * BALL_RADIUS;
        Rect::new(self.x - BALL_RADIUS, self.y - BALL_RADIUS, size, size)
    }
}

pub struct Breakout
{
    bricks: Grid<bool>,
    paddle_x: f32,
    ball: Ball,
    served: bool,
    lives: u8,
    score: u32,
    status: Status,
}

impl Default for Breakout
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Breakout
{
    pub fn new() -> Self
    {
        let paddle_x = (WIDTH as f32 - PADDLE_WIDTH) / 2.0;
        Self {
            bricks: Grid::new(BRICK_COLS, BRICK_ROWS, true),
            paddle_x,
            ball: Self::resting_ball(paddle_x),
            served: false,
            lives: START_LIVES,
            score: 0,
            status: Status::Running,
        }
    }

    fn resting_ball(paddle_x: f32) -> Ball
    {
        Ball {
            x: paddle_x + PADDLE_WIDTH / 2.0,
            y: PADDLE_Y - 1.0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn bricks_left(&self) -> usize
    {
        self.bricks.iter().filter(|(_, alive)| **alive).count()
    }

    fn paddle(&self) -> Rect
    {
        Rect::new(self.paddle_x, PADDLE_Y, PADDLE_WIDTH, 1.0)
    }

    fn serve(&mut self)
    {
        if !self.served {
            self.served = true;
            self.ball.vx = MAX_SPEED_X / 2.0;
            self.ball.vy = -BALL_SPEED_Y;
        }
    }

    fn move_paddle(&mut self, dx: f32)
    {
        self.paddle_x = (self.paddle_x + dx).clamp(0.0, WIDTH as f32 - PADDLE_WIDTH);
        if !self.served {
            self.ball = Self::resting_ball(self.paddle_x);
        }
    }

    fn brick_at(&self, x: f32, y: f32) -> Option<Point>
    {
        if x < 0.0 || y < BRICK_TOP {
            return None;
        }
        let cell = Point::new((x / BRICK_WIDTH) as i32, (y - BRICK_TOP) as i32);
        self.bricks.get(cell).copied().unwrap_or(false).then_some(cell)
    }

    fn bounce_walls(&mut self)
    {
        let ball = &mut self.ball;
        if ball.x < 0.0 {
            ball.x = -ball.x;
            ball.vx = ball.vx.abs();
        } else if ball.x >= WIDTH as f32 {
            ball.x = 2.0 * WIDTH as f32 - ball.x - 0.01;
            ball.vx = -ball.vx.abs();
        }
        if ball.y < 0.0 {
            ball.y = -ball.y;
            ball.vy = ball.vy.abs();
        }
    }

    fn hit_bricks(&mut self)
    {
        if let Some(cell) = self.brick_at(self.ball.x, self.ball.y) {
            self.bricks.set(cell, false);
            self.score += 10 * (BRICK_ROWS as u32 - cell.y as u32);
            self.ball.vy = -self.ball.vy;
            if self.bricks_left() == 0 {
                self.status = Status::Won;
            }
        }
    }

    fn hit_paddle(&mut self)
    {
        let paddle = self.paddle();
        let ball = self.ball.hitbox();
        if self.ball.vy > 0.0 && ball.intersects(&paddle) {
            let (hit_x, _) = ball.center();
            let factor = paddle_hit_factor(hit_x, paddle.x, paddle.w);
            self.ball.vx = factor * MAX_SPEED_X;
            self.ball.vy = -self.ball.vy.abs();
            self.ball.y = PADDLE_Y - 0.01;
        }
    }
}

impl Game for Breakout
{
    fn title(&self) -> &'static str
    {
        "Breakout"
    }

    fn controls(&self) -> &'static str
    {
        "Left/Right move the paddle, Space serves"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        Some(Duration::from_millis(STEP_MS))
    }

    fn handle_input(&mut self, input: Input)
    {
        match input {
            Input::Move(Direction::Left) => self.move_paddle(-PADDLE_STEP),
            Input::Move(Direction::Right) => self.move_paddle(PADDLE_STEP),
            Input::Action => self.serve(),
            _ => {}
        }
    }

    fn step(&mut self)
    {
        if self.status != Status::Running || !self.served {
            return;
        }
        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;
        self.bounce_walls();
        self.hit_bricks();
        self.hit_paddle();

        if self.ball.y >= HEIGHT as f32 {
            self.lives = self.lives.saturating_sub(1);
            self.served = false;
            self.ball = Self::resting_ball(self.paddle_x);
            if self.lives == 0 {
                self.status = Status::Lost;
            }
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
        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        for (cell, alive) in self.bricks.iter() {
            if *alive {
                let start = (cell.x as f32 * BRICK_WIDTH) as usize;
                let y = (BRICK_TOP as i32 + cell.y) as usize;
                let color = Some(ROW_COLORS[cell.y as usize]);
                canvas.text(start, y, "[==]", color);
            }
        }
        let paddle_start = self.paddle_x.round() as usize;
        canvas.text(
            paddle_start,
            PADDLE_Y as usize,
            &"=".repeat(PADDLE_WIDTH as usize),
            Some(WHITE),
        );
        canvas.put(self.ball.x as usize, self.ball.y as usize, 'o', Some(WHITE));

        let mut lines = vec![format!(
            "Lives: {}  Bricks: {}{}",
            self.lives,
            self.bricks_left(),
            if self.served { "" } else { "  (Space to serve)" }
        )];
        lines.extend(canvas.to_framed_lines());
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Bricks cleared: {}", BRICK_COLS * BRICK_ROWS - self.bricks_left()),
            format!("Lives left: {}", self.lives),
        ]
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn paddle_stays_inside_field()
    {
        let mut game = Breakout::new();
        for _ in 0..50 {
            game.handle_input(Input::Move(Direction::Left));
        }
        assert_eq!(game.paddle_x, 0.0);
        for _ in 0..50 {
            game.handle_input(Input::Move(Direction::Right));
        }
        assert_eq!(game.paddle_x, WIDTH as f32 - PADDLE_WIDTH);
        assert_eq!(game.ball.x, game.paddle_x + PADDLE_WIDTH / 2.0);
    }

    #[test]
    fn ball_waits_for_serve()
    {
        let mut game = Breakout::new();
        let before = game.ball;
        game.step();
        assert_eq!(game.ball, before);
        game.handle_input(Input::Action);
        game.step();
        assert!(game.ball.y < before.y);
    }

    #[test]
    fn side_walls_reflect()
    {
        let mut game = Breakout::new();
        game.served = true;
        game.ball = Ball {
            x: 0.2,
            y: 12.0,
            vx: -0.5,
            vy: 0.1,
        };
        game.step();
        assert!(game.ball.x >= 0.0);
        assert!(game.ball.vx > 0.0);
    }

    #[test]
    fn brick_hit_removes_brick_and_scores_by_row()
    {
        let mut game = Breakout::new();
        game.served = true;
        game.ball = Ball {
            x: 1.0,
            y: BRICK_TOP + BRICK_ROWS as f32 + 0.2,
            vx: 0.0,
            vy: -0.5,
        };
        game.step();
        assert_eq!(game.bricks_left(), BRICK_COLS * BRICK_ROWS - 1);
        assert_eq!(game.score(), 10);
        assert!(game.ball.vy > 0.0);
        assert_eq!(game.bricks.get(Point::new(0, 4)), Some(&false));
    }

    #[test]
    fn paddle_hit_angle_depends_on_offset()
    {
        let mut game = Breakout::new();
        game.served = true;
        let left_edge = game.paddle_x + 0.5;
        game.ball = Ball {
            x: left_edge,
            y: PADDLE_Y - 0.2,
            vx: 0.0,
            vy: 0.5,
        };
        game.step();
        assert!(game.ball.vy < 0.0);
        assert!(game.ball.vx < 0.0);
    }

    #[test]
    fn ball_beside_the_paddle_falls_through()
    {
        let mut game = Breakout::new();
        game.served = true;
        game.ball = Ball {
            x: game.paddle_x - 1.0,
            y: PADDLE_Y - 0.2,
            vx: 0.0,
            vy: 0.5,
        };
        game.step();
        assert!(game.ball.vy > 0.0);
    }

    #[test]
    fn missing_the_ball_costs_a_life()
    {
        let mut game = Breakout::new();
        game.served = true;
        game.ball = Ball {
            x: 1.0,
            y: HEIGHT as f32 - 0.3,
            vx: 0.0,
            vy: 0.5,
        };
        game.step();
        assert_eq!(game.lives, 2);
        assert!(!game.served);

        game.lives = 1;
        game.served = true;
        game.ball = Ball {
            x: 1.0,
            y: HEIGHT as f32 - 0.3,
            vx: 0.0,
            vy: 0.5,
        };
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn clearing_the_last_brick_wins()
    {
        let mut game = Breakout::new();
        game.bricks = Grid::new(BRICK_COLS, BRICK_ROWS, false);
        game.bricks.set(Point::new(0, 0), true);
        game.served = true;
        game.ball = Ball {
            x: 1.0,
            y: BRICK_TOP + 1.3,
            vx: 0.0,
            vy: -0.5,
        };
        game.step();
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.score(), 50);
    }
}
