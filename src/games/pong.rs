use crate::engine::collision::{paddle_hit_factor, Rect};
use crate::engine::render::{Canvas, CYAN, GREY, ORANGE, WHITE};
use crate::engine::{Direction, Game, Input, Status};
use std::time::Duration;

pub const WIDTH: usize = 60;
pub const HEIGHT: usize = 20;
const PADDLE_HEIGHT: f32 = 4.0;
const PLAYER_X: f32 = 1.0;
const AI_X: f32 = WIDTH as f32 - 2.0;
const PLAYER_STEP: f32 = 1.5;
const AI_MAX_SPEED: f32 = 0.35;
const AI_DEAD_ZONE: f32 = 1.0;
const SERVE_SPEED: f32 = 0.6;
const MAX_SPEED: f32 = 1.2;
const SPEEDUP: f32 = 1.05;
const MAX_VY: f32 = 0.5;
/// Ball size plus paddle width must exceed `MAX_SPEED` or the ball can pass
/// through a paddle in one step.
const BALL_SIZE: f32 = 1.0;
const WINNING_POINTS: u32 = 7;
const WIN_BONUS: u32 = 500;
const STEP_MS: u64 = 33;

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
    fn serve(toward_player: bool, rally: u32) -> Self
    {
        let vy = if rally % 2 == 0 { 0.2 } else { -0.2 };
        Self {
            x: WIDTH as f32 / 2.0,
            y: HEIGHT as f32 / 2.0,
            vx: if toward_player { -SERVE_SPEED } else { SERVE_SPEED },
            vy,
        }
    }

    fn hitbox(&self) -> Rect
    {
        Rect::new(
            self.x - BALL_SIZE / 2.0,
            self.y - BALL_SIZE / 2.0,
            BALL_SIZE,
            BALL_SIZE,
        )
    }
}

pub struct Pong
{
    player_y: f32,
    ai_y: f32,
    ball: Ball,
    player_points: u32,
    ai_points: u32,
    rallies: u32,
    status: Status,
}

impl Default for Pong
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Pong
{
    pub fn new() -> Self
    {
        let middle = (HEIGHT as f32 - PADDLE_HEIGHT) / 2.0;
        Self {
            player_y: middle,
            ai_y: middle,
            ball: Ball::serve(false, 0),
            player_points: 0,
            ai_points: 0,
            rallies: 0,
            status: Status::Running,
        }
    }

    fn clamp_paddle(y: f32) -> f32
    {
        y.clamp(0.0, HEIGHT as f32 - PADDLE_HEIGHT)
    }

    /// Follows the ball only while it approaches and sits outside the dead
    /// zone around the paddle centre.
    fn move_ai(&mut self)
    {
        if self.ball.vx <= 0.0 {
            return;
        }
        let center = self.ai_y + PADDLE_HEIGHT / 2.0;
        let diff = self.ball.y - center;
        if diff.abs() <= AI_DEAD_ZONE {
            return;
        }
        let step = diff.signum() * diff.abs().min(AI_MAX_SPEED);
        self.ai_y = Self::clamp_paddle(self.ai_y + step);
    }

    fn bounce(ball: &mut Ball, paddle: &Rect, toward_right: bool)
    {
        let (_, hit_y) = ball.hitbox().center();
        let factor = paddle_hit_factor(hit_y, paddle.y, paddle.h);
        let speed = (ball.vx.abs() * SPEEDUP).min(MAX_SPEED);
        ball.vx = if toward_right { speed } else { -speed };
        ball.vy = factor * MAX_VY;
    }

    fn move_ball(&mut self)
    {
        let ball = &mut self.ball;
        ball.x += ball.vx;
        ball.y += ball.vy;
        if ball.y < 0.0 {
            ball.y = -ball.y;
            ball.vy = ball.vy.abs();
        } else if ball.y >= HEIGHT as f32 {
            ball.y = 2.0 * HEIGHT as f32 - ball.y - 0.01;
            ball.vy = -ball.vy.abs();
        }

        let player = Rect::new(PLAYER_X, self.player_y, 1.0, PADDLE_HEIGHT);
        let ai = Rect::new(AI_X, self.ai_y, 1.0, PADDLE_HEIGHT);
        if ball.vx < 0.0 && ball.hitbox().intersects(&player) {
            Self::bounce(ball, &player, true);
            ball.x = player.x + player.w + BALL_SIZE / 2.0;
        } else if ball.vx > 0.0 && ball.hitbox().intersects(&ai) {
            Self::bounce(ball, &ai, false);
            ball.x = ai.x - BALL_SIZE / 2.0;
        }
    }

    fn award_points(&mut self)
    {
        let scored_by_player = if self.ball.x < 0.0 {
            false
        } else if self.ball.x > WIDTH as f32 {
            true
        } else {
            return;
        };
        if scored_by_player {
            self.player_points += 1;
        } else {
            self.ai_points += 1;
        }
        self.rallies += 1;
        // The side that conceded receives the next serve.
        self.ball = Ball::serve(!scored_by_player, self.rallies);
        if self.player_points >= WINNING_POINTS {
            self.status = Status::Won;
        } else if self.ai_points >= WINNING_POINTS {
            self.status = Status::Lost;
        }
    }
}

impl Game for Pong
{
    fn title(&self) -> &'static str
    {
        "Pong"
    }

    fn controls(&self) -> &'static str
    {
        "Up/Down move your paddle (left)"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        Some(Duration::from_millis(STEP_MS))
    }

    fn handle_input(&mut self, input: Input)
    {
        match input {
            Input::Move(Direction::Up) => {
                self.player_y = Self::clamp_paddle(self.player_y - PLAYER_STEP)
            }
            Input::Move(Direction::Down) => {
                self.player_y = Self::clamp_paddle(self.player_y + PLAYER_STEP)
            }
            _ => {}
        }
    }

    fn step(&mut self)
    {
        if self.status != Status::Running {
            return;
        }
        self.move_ai();
        self.move_ball();
        self.award_points();
    }

    fn status(&self) -> Status
    {
        self.status
    }

    fn score(&self) -> u32
    {
        let bonus = if self.status == Status::Won { WIN_BONUS } else { 0 };
        self.player_points * 100 + bonus
    }

    fn render(&self) -> Vec<String>
    {
        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        for y in (0..HEIGHT).step_by(2) {
            canvas.put(WIDTH / 2, y, ':', Some(GREY));
        }
        for offset in 0..PADDLE_HEIGHT as usize {
            let player_row = self.player_y.round() as usize + offset;
            let ai_row = self.ai_y.round() as usize + offset;
            canvas.put(PLAYER_X as usize, player_row, '|', Some(CYAN));
            canvas.put(AI_X as usize, ai_row, '|', Some(ORANGE));
        }
        if self.ball.x >= 0.0 && self.ball.y >= 0.0 {
            canvas.put(self.ball.x as usize, self.ball.y as usize, 'o', Some(WHITE));
        }
        let mut lines = vec![format!(
            "You {}  -  {} CPU   (first to {})",
            self.player_points, self.ai_points, WINNING_POINTS
        )];
        lines.extend(canvas.to_framed_lines());
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![format!(
            "Final score: you {} - {} CPU",
            self.player_points, self.ai_points
        )]
    }
}
