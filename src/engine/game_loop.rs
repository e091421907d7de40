use super::input::{map_key, Input, KeyScheme};
use super::render::{paint_text, GOLD, GREY};
use super::terminal::{self, TerminalGuard};
use crate::error::Result;
use crossterm::event::KeyCode;
use std::time::{Duration, Instant};

pub const FRAME_MS: u64 = 33;
pub const MAX_CATCH_UP_STEPS: u32 = 5;
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status
{
    Running,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome
{
    pub status: Status,
    pub score: u32,
    /// The player left before the game reached an end state.
    pub quit: bool,
    pub elapsed: Duration,
}

/// A self-contained game state machine. The loop feeds it mapped input and
/// fixed-length steps until `status` leaves `Running`.
pub trait Game
{
    fn title(&self) -> &'static str;

    fn controls(&self) -> &'static str;

    fn key_scheme(&self) -> KeyScheme
    {
        KeyScheme::Arcade
    }

    /// Time between simulation steps, `None` for turn based games.
    fn step_interval(&self) -> Option<Duration>;

    fn handle_input(&mut self, input: Input);

    fn step(&mut self) {}

    fn status(&self) -> Status;

    fn score(&self) -> u32;

    fn render(&self) -> Vec<String>;

    fn summary(&self) -> Vec<String>
    {
        Vec::new()
    }
}

/// Fixed-timestep accumulator. Elapsed wall time is converted into whole
/// steps; a backlog beyond `MAX_CATCH_UP_STEPS` is dropped.
#[derive(Debug, Clone)]
pub struct Ticker
{
    interval: Duration,
    accumulator: Duration,
    last: Instant,
}

impl Ticker
{
    pub fn new(interval: Duration, now: Instant) -> Self
    {
        Self {
            interval: interval.max(MIN_INTERVAL),
            accumulator: Duration::ZERO,
            last: now,
        }
    }

    pub fn interval(&self) -> Duration
    {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration)
    {
        self.interval = interval.max(MIN_INTERVAL);
    }

    pub fn reset(&mut self, now: Instant)
    {
        self.accumulator = Duration::ZERO;
        self.last = now;
    }

    pub fn advance(&mut self, now: Instant) -> u32
    {
        self.accumulator += now.saturating_duration_since(self.last);
        self.last = now;

        let mut steps = 0;
        while self.accumulator >= self.interval && steps < MAX_CATCH_UP_STEPS {
            self.accumulator -= self.interval;
            steps += 1;
        }
        if self.accumulator >= self.interval {
            self.accumulator = Duration::ZERO;
        }
        steps
    }
}

/// Runs `game` on the terminal until it ends or the player quits, then shows
/// the summary with the extra lines returned by `on_finish`.
pub fn run<G, F>(game: &mut G, on_finish: F) -> Result<Outcome>
where
    G: Game + ?Sized,
    F: FnOnce(&Outcome) -> Vec<String>,
{
    let mut term = TerminalGuard::enter()?;
    let start = Instant::now();
    let mut ticker = game.step_interval().map(|interval| Ticker::new(interval, start));
    let mut last_frame: Option<Instant> = None;
    let mut paused = false;
    let mut quit = false;

    loop {
        let now = Instant::now();

        while let Some(key) = terminal::poll_key(Duration::from_millis(0))? {
            match map_key(key, game.key_scheme()) {
                Some(Input::Quit) => {
                    quit = true;
                    break;
                }
                Some(Input::Pause) => {
                    paused = !paused;
                    if let Some(ticker) = ticker.as_mut() {
                        ticker.reset(now);
                    }
                    last_frame = None;
                }
                Some(input) if !paused => game.handle_input(input),
                _ => {}
            }
        }
        if quit || game.status() != Status::Running {
            break;
        }

        if !paused {
            sync_ticker(&mut ticker, game.step_interval(), now);
            let steps = ticker.as_mut().map_or(0, |ticker| ticker.advance(now));
            for _ in 0..steps {
                game.step();
                if game.status() != Status::Running {
                    break;
                }
            }
        }

        if last_frame.is_none_or(|at| at.elapsed() >= Duration::from_millis(FRAME_MS)) {
            term.draw(&frame_lines(game, paused))?;
            last_frame = Some(Instant::now());
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    let outcome = Outcome {
        status: game.status(),
        score: game.score(),
        quit: quit && game.status() == Status::Running,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        game = game.title(),
        score = outcome.score,
        status = ?outcome.status,
        quit = outcome.quit,
        "game finished"
    );

    let mut lines = summary_lines(game, &outcome);
    lines.extend(on_finish(&outcome));
    lines.push(String::new());
    lines.push("Press SPACE to continue.".to_string());
    term.draw(&lines)?;
    terminal::wait_for_key(&[KeyCode::Char(' '), KeyCode::Enter, KeyCode::Esc])?;
    Ok(outcome)
}

fn sync_ticker(ticker: &mut Option<Ticker>, wanted: Option<Duration>, now: Instant)
{
    match (ticker.as_mut(), wanted) {
        (Some(current), Some(interval)) => {
            if current.interval() != interval.max(MIN_INTERVAL) {
                current.set_interval(interval);
            }
        }
        (None, Some(interval)) => *ticker = Some(Ticker::new(interval, now)),
        (Some(_), None) => *ticker = None,
        (None, None) => {}
    }
}

fn frame_lines<G: Game + ?Sized>(game: &G, paused: bool) -> Vec<String>
{
    let mut lines = Vec::new();
    lines.push(format!("KB Arcade - {}", game.title()));
    lines.push(format!(
        "Score: {}{}",
        game.score(),
        if paused {
            format!("  {}", paint_text("PAUSED", GOLD))
        } else {
            String::new()
        }
    ));
    lines.push(String::new());
    lines.extend(game.render());
    lines.push(String::new());
    lines.push(paint_text(game.controls(), GREY));
    lines.push(paint_text("p pauses, ESC quits", GREY));
    lines
}

fn summary_lines<G: Game + ?Sized>(game: &G, outcome: &Outcome) -> Vec<String>
{
    let headline = match (outcome.quit, outcome.status) {
        (true, _) => "Game abandoned",
        (false, Status::Won) => "You win!",
        (false, _) => "Game over",
    };
    let mut lines = vec![
        format!("{} - {}", game.title(), headline),
        String::new(),
        format!("Score: {}", outcome.score),
        format!("Time: {:>5.1}s", outcome.elapsed.as_secs_f32()),
    ];
    lines.extend(game.summary());
    lines
}
