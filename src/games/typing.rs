use crate::engine::render::{lerp, lerp_color, Canvas, Rgb, GOLD, GREEN, ORANGE, RED, YELLOW};
use crate::engine::{Game, Input, KeyScheme, Status};
use crate::words::{BONUS_WORDS, WORDS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const LEVEL_DURATION: Duration = Duration::from_secs(60);
const START_LIVES: u8 = 5;
const MAX_WORDS: usize = 5;
const TICK: Duration = Duration::from_millis(33);
const SPAWN_INTERVAL: Duration = Duration::from_millis(1400);
const BONUS_INTERVAL: u32 = 10;
pub const DEFAULT_WPM: f32 = 20.0;
pub const MIN_WPM: f32 = 5.0;
pub const MAX_WPM: f32 = 120.0;
const FIELD_WIDTH: usize = 60;
const FIELD_HEIGHT: usize = 14;

#[derive(Debug, Clone)]
struct Word
{
    text: String,
    spawned_at: Duration,
    ttl: Duration,
    column: usize,
    is_bonus: bool,
}

impl Word
{
    /// Fraction of the word's lifetime already spent.
    fn urgency(&self, now: Duration) -> f32
    {
        if self.ttl.is_zero() {
            return 1.0;
        }
        let age = now.saturating_sub(self.spawned_at);
        (age.as_secs_f32() / self.ttl.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default, Clone)]
struct Stats
{
    words_typed: u32,
    words_missed: u32,
    keystrokes: u32,
    correct_keystrokes: u32,
    backspaces: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingConfig
{
    start_wpm: f32,
    speed_scale: f32,
}

impl TypingConfig
{
    /// Slower typists get longer-lived words; out of range speeds are clamped.
    pub fn new(start_wpm: f32) -> Self
    {
        let clamped = start_wpm.clamp(MIN_WPM, MAX_WPM);
        let scale = (DEFAULT_WPM / clamped).clamp(0.4, 2.5);
        Self {
            start_wpm: clamped,
            speed_scale: scale,
        }
    }
}

impl Default for TypingConfig
{
    fn default() -> Self
    {
        Self::new(DEFAULT_WPM)
    }
}

pub struct Typing
{
    config: TypingConfig,
    rng: StdRng,
    clock: Duration,
    next_spawn: Duration,
    words: Vec<Word>,
    buffer: String,
    stats: Stats,
    lives: u8,
    bonus_ready: bool,
    words_since_bonus: u32,
    status: Status,
}

impl Typing
{
    pub fn new(seed: u64, config: TypingConfig) -> Self
    {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            clock: Duration::ZERO,
            next_spawn: Duration::ZERO,
            words: Vec::new(),
            buffer: String::new(),
            stats: Stats::default(),
            lives: START_LIVES,
            bonus_ready: false,
            words_since_bonus: 0,
            status: Status::Running,
        }
    }

    /// Share of letter keystrokes that kept the input a prefix of a word.
    pub fn keystroke_accuracy(&self) -> f32
    {
        compute_accuracy(
            self.stats.correct_keystrokes,
            self.stats.keystrokes - self.stats.correct_keystrokes,
        )
    }

    pub fn word_accuracy(&self) -> f32
    {
        compute_accuracy(self.stats.words_typed, self.stats.words_missed)
    }

    fn spawn_word(&mut self)
    {
        let is_bonus = std::mem::take(&mut self.bonus_ready);
        let ttl = word_ttl(&mut self.rng, self.clock, &self.config);
        let list = if is_bonus { BONUS_WORDS } else { WORDS };
        let text = list.choose(&mut self.rng).copied().unwrap_or("alpha");
        let max_col = FIELD_WIDTH.saturating_sub(text.len());
        let column = if max_col == 0 {
            0
        } else {
            self.rng.gen_range(0..=max_col)
        };
        self.words.push(Word {
            text: text.to_string(),
            spawned_at: self.clock,
            ttl,
            column,
            is_bonus,
        });
    }

    fn expire_words(&mut self)
    {
        let now = self.clock;
        let before = self.words.len();
        self.words
            .retain(|word| now.saturating_sub(word.spawned_at) < word.ttl);
        let expired = before - self.words.len();
        if expired > 0 {
            self.lives = self.lives.saturating_sub(expired.min(u8::MAX as usize) as u8);
            self.stats.words_missed += expired as u32;
        }
    }

    fn complete_word(&mut self)
    {
        let Some(index) = self.words.iter().position(|word| word.text == self.buffer) else {
            return;
        };
        let word = self.words.swap_remove(index);
        self.stats.words_typed += 1;
        if word.is_bonus {
            self.lives = (self.lives + 1).min(START_LIVES);
        } else {
            self.words_since_bonus += 1;
            if self.words_since_bonus >= BONUS_INTERVAL {
                self.bonus_ready = true;
                self.words_since_bonus = 0;
            }
        }
        self.buffer.clear();
    }
}

fn word_ttl(rng: &mut impl Rng, elapsed: Duration, config: &TypingConfig) -> Duration
{
    let progress = (elapsed.as_secs_f32() / LEVEL_DURATION.as_secs_f32()).clamp(0.0, 1.0);
    let base = lerp(5.0, 2.0, progress);
    let jitter = rng.gen_range(0.75..1.25);
    let scaled = (base * config.speed_scale).clamp(0.8, 8.0);
    Duration::from_millis((scaled * jitter * 1000.0) as u64)
}

fn scaled_duration(base: Duration, scale: f32) -> Duration
{
    let millis = base.as_secs_f32() * 1000.0 * scale;
    Duration::from_millis(millis.max(100.0) as u64)
}

fn matches_prefix(buffer: &str, words: &[Word]) -> bool
{
    words.iter().any(|word| word.text.starts_with(buffer))
}

fn compute_wpm(words_typed: u32, elapsed: Duration) -> f32
{
    let minutes = elapsed.as_secs_f32() / 60.0;
    if minutes <= 0.0 {
        return 0.0;
    }
    words_typed as f32 / minutes
}

fn compute_accuracy(hits: u32, misses: u32) -> f32
{
    let total = hits + misses;
    if total == 0 {
        return 0.0;
    }
    (hits as f32 / total as f32) * 100.0
}

fn color_for_urgency(progress: f32) -> Rgb
{
    let progress = progress.clamp(0.0, 1.0);
    if progress < 0.33 {
        lerp_color(GREEN, YELLOW, progress / 0.33)
    } else if progress < 0.66 {
        lerp_color(YELLOW, ORANGE, (progress - 0.33) / 0.33)
    } else {
        lerp_color(ORANGE, RED, (progress - 0.66) / 0.34)
    }
}

impl Game for Typing
{
    fn title(&self) -> &'static str
    {
        "Fast Typing"
    }

    fn controls(&self) -> &'static str
    {
        "Type the falling words, Backspace deletes, Enter clears, Tab pauses, Esc quits"
    }

    fn key_scheme(&self) -> KeyScheme
    {
        KeyScheme::Text
    }

    fn step_interval(&self) -> Option<Duration>
    {
        Some(TICK)
    }

    fn handle_input(&mut self, input: Input)
    {
        match input {
            Input::Char(ch) if ch.is_ascii_alphabetic() => {
                self.stats.keystrokes += 1;
                self.buffer.push(ch.to_ascii_lowercase());
                if matches_prefix(&self.buffer, &self.words) {
                    self.stats.correct_keystrokes += 1;
                }
                self.complete_word();
            }
            Input::Backspace => {
                self.stats.backspaces += 1;
                self.buffer.pop();
            }
            Input::Action => self.buffer.clear(),
            _ => {}
        }
    }

    fn step(&mut self)
    {
        if self.status != Status::Running {
            return;
        }
        self.clock += TICK;
        if self.clock >= LEVEL_DURATION {
            self.clock = LEVEL_DURATION;
            self.status = Status::Won;
            return;
        }

        if self.words.is_empty() || self.clock >= self.next_spawn {
            if self.words.len() < MAX_WORDS {
                self.spawn_word();
            }
            self.next_spawn = self.clock + scaled_duration(SPAWN_INTERVAL, self.config.speed_scale);
        }
        self.expire_words();
        if self.lives == 0 {
            self.status = Status::Lost;
        }
    }

    fn status(&self) -> Status
    {
        self.status
    }

    fn score(&self) -> u32
    {
        self.stats.words_typed * 10 + self.keystroke_accuracy().round() as u32
    }

    fn render(&self) -> Vec<String>
    {
        let time_left = (LEVEL_DURATION.as_secs_f32() - self.clock.as_secs_f32()).max(0.0);
        let mut lines = vec![
            format!(
                "Time left: {:>5.1}s  Lives: {}/{}  On screen: {}  Start WPM: {:>4.0}",
                time_left,
                self.lives,
                START_LIVES,
                self.words.len(),
                self.config.start_wpm
            ),
            format!(
                "Typed: {}  Missed: {}  WPM: {:>5.1}  Accuracy: {:>5.1}%",
                self.stats.words_typed,
                self.stats.words_missed,
                compute_wpm(self.stats.words_typed, self.clock),
                self.keystroke_accuracy()
            ),
        ];

        let mut canvas = Canvas::new(FIELD_WIDTH, FIELD_HEIGHT);
        let typed = self.buffer.chars().count();
        for word in &self.words {
            let urgency = word.urgency(self.clock);
            let row = ((FIELD_HEIGHT as f32 - 1.0) * urgency).floor() as usize;
            let prefix_match = typed > 0 && word.text.starts_with(&self.buffer);
            let color = if word.is_bonus { GOLD } else { color_for_urgency(urgency) };
            for (offset, ch) in word.text.chars().enumerate() {
                let fg = if prefix_match && offset < typed { GREEN } else { color };
                canvas.put(word.column + offset, row, ch, Some(fg));
            }
        }
        lines.extend(canvas.to_framed_lines());

        lines.push(format!("Input: {}", self.buffer));
        lines.push(format!(
            "Status: {}",
            if self.buffer.is_empty() {
                "waiting"
            } else if matches_prefix(&self.buffer, &self.words) {
                "ok"
            } else {
                "no match"
            }
        ));
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Duration: {:>5.1}s", self.clock.as_secs_f32()),
            format!("Lives left: {}", self.lives),
            format!("Words typed: {}", self.stats.words_typed),
            format!("Words missed: {}", self.stats.words_missed),
            format!("WPM: {:>5.1}", compute_wpm(self.stats.words_typed, self.clock)),
            format!("Word accuracy: {:>5.1}%", self.word_accuracy()),
            format!("Keystroke accuracy: {:>5.1}%", self.keystroke_accuracy()),
            format!("Keystrokes: {}", self.stats.keystrokes),
            format!("Backspaces: {}", self.stats.backspaces),
        ]
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn word(text: &str, spawned_at: Duration, ttl: Duration) -> Word
    {
        Word {
            text: text.to_string(),
            spawned_at,
            ttl,
            column: 0,
            is_bonus: false,
        }
    }

    fn type_text(game: &mut Typing, text: &str)
    {
        for ch in text.chars() {
            game.handle_input(Input::Char(ch));
        }
    }

    #[test]
    fn start_speed_is_clamped()
    {
        let fast = TypingConfig::new(500.0);
        assert_eq!(fast.start_wpm, MAX_WPM);
        assert_eq!(fast.speed_scale, 0.4);
        let slow = TypingConfig::new(1.0);
        assert_eq!(slow.start_wpm, MIN_WPM);
        assert_eq!(slow.speed_scale, 2.5);
    }

    #[test]
    fn slower_start_speed_gives_longer_lifetimes()
    {
        let slow = TypingConfig::new(10.0);
        let fast = TypingConfig::new(40.0);
        for elapsed in [Duration::ZERO, Duration::from_secs(30), LEVEL_DURATION] {
            let slow_ttl = word_ttl(&mut StdRng::seed_from_u64(3), elapsed, &slow);
            let fast_ttl = word_ttl(&mut StdRng::seed_from_u64(3), elapsed, &fast);
            assert!(slow_ttl > fast_ttl, "{elapsed:?}: {slow_ttl:?} vs {fast_ttl:?}");
        }
    }

    #[test]
    fn lifetimes_shrink_over_the_level()
    {
        let config = TypingConfig::default();
        let ttl_at = |secs: u64| word_ttl(&mut StdRng::seed_from_u64(8), Duration::from_secs(secs), &config);
        let (start, middle, end) = (ttl_at(0), ttl_at(30), ttl_at(60));
        assert!(start > middle && middle > end);
        // 5 s at the start and 2 s at the end, each with up to 25% jitter.
        assert!(start >= Duration::from_millis(3750) && start < Duration::from_millis(6250));
        assert!(end >= Duration::from_millis(1500) && end < Duration::from_millis(2500));
        assert_eq!(ttl_at(90), end);
    }

    #[test]
    fn first_step_spawns_a_word()
    {
        let mut game = Typing::new(1, TypingConfig::default());
        game.step();
        assert_eq!(game.words.len(), 1);
        assert!(WORDS.contains(&game.words[0].text.as_str()));
    }

    #[test]
    fn typing_a_word_clears_it()
    {
        let mut game = Typing::new(2, TypingConfig::default());
        game.step();
        let text = game.words[0].text.clone();
        type_text(&mut game, &text);
        assert_eq!(game.stats.words_typed, 1);
        assert!(game.words.is_empty());
        assert!(game.buffer.is_empty());
        assert_eq!(game.keystroke_accuracy(), 100.0);
        assert_eq!(game.score(), 10 + 100);
    }

    #[test]
    fn wrong_letters_lower_keystroke_accuracy()
    {
        let mut game = Typing::new(3, TypingConfig::default());
        game.words = vec![word("alpha", Duration::ZERO, Duration::from_secs(5))];
        type_text(&mut game, "alx");
        game.handle_input(Input::Backspace);
        type_text(&mut game, "pha");
        assert_eq!(game.stats.words_typed, 1);
        assert_eq!(game.stats.keystrokes, 6);
        assert_eq!(game.stats.backspaces, 1);
        assert!((game.keystroke_accuracy() - 500.0 / 6.0).abs() < 1e-3);
    }

    #[test]
    fn non_letters_are_ignored()
    {
        let mut game = Typing::new(4, TypingConfig::default());
        type_text(&mut game, "1 !");
        assert_eq!(game.stats.keystrokes, 0);
        assert!(game.buffer.is_empty());
    }

    #[test]
    fn expired_word_costs_a_life()
    {
        let mut game = Typing::new(5, TypingConfig::default());
        game.words = vec![word("alpha", Duration::ZERO, Duration::from_millis(20))];
        game.step();
        assert_eq!(game.lives, START_LIVES - 1);
        assert_eq!(game.stats.words_missed, 1);
        assert!(game.words.iter().all(|w| w.text != "alpha" || w.spawned_at > Duration::ZERO));
    }

    #[test]
    fn bonus_word_follows_ten_words_and_restores_a_life()
    {
        let mut game = Typing::new(6, TypingConfig::default());
        game.words_since_bonus = BONUS_INTERVAL - 1;
        game.words = vec![word("alpha", Duration::ZERO, Duration::from_secs(5))];
        type_text(&mut game, "alpha");
        assert!(game.bonus_ready);

        game.step();
        assert!(game.words[0].is_bonus);
        assert!(BONUS_WORDS.contains(&game.words[0].text.as_str()));

        game.lives = 3;
        let text = game.words[0].text.clone();
        type_text(&mut game, &text);
        assert_eq!(game.lives, 4);
    }

    #[test]
    fn surviving_the_level_wins()
    {
        let mut game = Typing::new(7, TypingConfig::default());
        game.clock = LEVEL_DURATION - Duration::from_millis(10);
        game.step();
        assert_eq!(game.status(), Status::Won);
    }

    #[test]
    fn losing_every_life_ends_the_level()
    {
        let mut game = Typing::new(8, TypingConfig::default());
        game.lives = 1;
        game.words = vec![word("alpha", Duration::ZERO, Duration::from_millis(10))];
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn urgency_color_runs_green_to_red()
    {
        assert_eq!(color_for_urgency(0.0), GREEN);
        assert_eq!(color_for_urgency(1.0), RED);
    }
}
