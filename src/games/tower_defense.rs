use crate::engine::render::{paint_text, Canvas, GOLD, GREY, RED, WHITE, YELLOW};
use crate::engine::{Game, Grid, Input, Point, Status};
use std::time::Duration;

pub const WIDTH: usize = 20;
pub const HEIGHT: usize = 11;
const WAYPOINTS: [Point; 6] = [
    Point::new(0, 1),
    Point::new(17, 1),
    Point::new(17, 5),
    Point::new(2, 5),
    Point::new(2, 9),
    Point::new(19, 9),
];
const STEP_MS: u64 = 100;
const START_GOLD: u32 = 60;
const START_LIVES: u32 = 10;
const TOWER_COST: u32 = 25;
const TOWER_RANGE: f32 = 2.5;
const TOWER_DAMAGE: i32 = 1;
const TOWER_RELOAD_STEPS: u32 = 5;
const SPAWN_GAP_STEPS: u32 = 8;
const WAVE_BREAK_STEPS: u32 = 30;
const FINAL_WAVE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terrain
{
    Open,
    Path,
    Tower,
}

#[derive(Debug, Clone, PartialEq)]
struct Creep
{
    /// Distance travelled along the path, in cells.
    progress: f32,
    hp: i32,
    speed: f32,
    bounty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tower
{
    at: Point,
    cooldown: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WaveSpec
{
    count: u32,
    hp: i32,
    bounty: u32,
}

fn wave_spec(wave: u32) -> WaveSpec
{
    WaveSpec {
        count: 4 + 2 * wave,
        hp: 2 + 2 * wave as i32,
        bounty: 2 + wave / 2,
    }
}

fn creep_speed(wave: u32) -> f32
{
    0.15 + 0.01 * wave as f32
}

/// Expands the waypoint list into every cell of the route.
fn trace_path(waypoints: &[Point]) -> Vec<Point>
{
    let mut path = Vec::new();
    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let (dx, dy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
        let mut at = from;
        while at != to {
            path.push(at);
            at = at.translate(dx, dy);
        }
    }
    if let Some(last) = waypoints.last() {
        path.push(*last);
    }
    path
}

pub struct TowerDefense
{
    map: Grid<Terrain>,
    path: Vec<Point>,
    creeps: Vec<Creep>,
    towers: Vec<Tower>,
    cursor: Point,
    wave: u32,
    to_spawn: u32,
    spawn_timer: u32,
    break_timer: u32,
    gold: u32,
    lives: u32,
    kills: u32,
    score: u32,
    status: Status,
}

impl Default for TowerDefense
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl TowerDefense
{
    pub fn new() -> Self
    {
        let path = trace_path(&WAYPOINTS);
        let mut map = Grid::new(WIDTH, HEIGHT, Terrain::Open);
        for cell in &path {
            map.set(*cell, Terrain::Path);
        }
        Self {
            map,
            path,
            creeps: Vec::new(),
            towers: Vec::new(),
            cursor: Point::new(WIDTH as i32 / 2, 3),
            wave: 0,
            to_spawn: 0,
            spawn_timer: 0,
            break_timer: WAVE_BREAK_STEPS,
            gold: START_GOLD,
            lives: START_LIVES,
            kills: 0,
            score: 0,
            status: Status::Running,
        }
    }

    pub fn build(&mut self, at: Point) -> bool
    {
        if self.gold < TOWER_COST || self.map.get(at) != Some(&Terrain::Open) {
            return false;
        }
        self.map.set(at, Terrain::Tower);
        self.towers.push(Tower { at, cooldown: 0 });
        self.gold -= TOWER_COST;
        true
    }

    fn start_next_wave(&mut self)
    {
        if self.wave >= FINAL_WAVE || self.to_spawn > 0 || !self.creeps.is_empty() {
            return;
        }
        self.wave += 1;
        self.to_spawn = wave_spec(self.wave).count;
        self.spawn_timer = 0;
        self.break_timer = WAVE_BREAK_STEPS;
        tracing::debug!(wave = self.wave, "wave started");
    }

    fn spawn(&mut self)
    {
        if self.to_spawn == 0 {
            return;
        }
        if self.spawn_timer > 0 {
            self.spawn_timer -= 1;
            return;
        }
        let spec = wave_spec(self.wave);
        self.creeps.push(Creep {
            progress: 0.0,
            hp: spec.hp,
            speed: creep_speed(self.wave),
            bounty: spec.bounty,
        });
        self.to_spawn -= 1;
        self.spawn_timer = SPAWN_GAP_STEPS;
    }

    fn position(&self, creep: &Creep) -> (f32, f32)
    {
        let last = self.path.len() - 1;
        let idx = (creep.progress.floor() as usize).min(last);
        let next = (idx + 1).min(last);
        let t = creep.progress - idx as f32;
        let (a, b) = (self.path[idx], self.path[next]);
        (
            a.x as f32 + (b.x - a.x) as f32 * t,
            a.y as f32 + (b.y - a.y) as f32 * t,
        )
    }

    fn advance_creeps(&mut self)
    {
        let end = (self.path.len() - 1) as f32;
        for creep in &mut self.creeps {
            creep.progress += creep.speed;
        }
        let before = self.creeps.len();
        self.creeps.retain(|creep| creep.progress < end);
        let leaked = (before - self.creeps.len()) as u32;
        self.lives = self.lives.saturating_sub(leaked);
    }

    /// Each loaded tower hits the creep in range that is furthest along.
    fn fire_towers(&mut self)
    {
        let range_sq = TOWER_RANGE * TOWER_RANGE;
        let positions: Vec<(f32, f32)> = self.creeps.iter().map(|c| self.position(c)).collect();
        for tower in &mut self.towers {
            if tower.cooldown > 0 {
                tower.cooldown -= 1;
                continue;
            }
            let target = self
                .creeps
                .iter()
                .enumerate()
                .filter(|(idx, creep)| {
                    let (x, y) = positions[*idx];
                    let (dx, dy) = (x - tower.at.x as f32, y - tower.at.y as f32);
                    creep.hp > 0 && dx * dx + dy * dy <= range_sq
                })
                .max_by(|a, b| a.1.progress.total_cmp(&b.1.progress))
                .map(|(idx, _)| idx);
            if let Some(idx) = target {
                self.creeps[idx].hp -= TOWER_DAMAGE;
                tower.cooldown = TOWER_RELOAD_STEPS;
            }
        }

        let mut bounty = 0;
        let mut kills = 0;
        self.creeps.retain(|creep| {
            if creep.hp <= 0 {
                bounty += creep.bounty;
                kills += 1;
                false
            } else {
                true
            }
        });
        self.gold += bounty;
        self.kills += kills;
        self.score += bounty * 10;
    }

    fn wave_cleared(&self) -> bool
    {
        self.to_spawn == 0 && self.creeps.is_empty()
    }
}

impl Game for TowerDefense
{
    fn title(&self) -> &'static str
    {
        "Tower Defense"
    }

    fn controls(&self) -> &'static str
    {
        "Arrows move, Space builds a tower (25 gold), f calls the next wave"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        Some(Duration::from_millis(STEP_MS))
    }

    fn handle_input(&mut self, input: Input)
    {
        match input {
            Input::Move(dir) => {
                let next = self.cursor.offset(dir);
                if self.map.contains(next) {
                    self.cursor = next;
                }
            }
            Input::Action => {
                self.build(self.cursor);
            }
            Input::Alternate => self.start_next_wave(),
            _ => {}
        }
    }

    fn step(&mut self)
    {
        if self.status != Status::Running {
            return;
        }
        if self.wave_cleared() {
            if self.wave >= FINAL_WAVE {
                self.score += self.lives * 50;
                self.status = Status::Won;
                return;
            }
            if self.break_timer == 0 {
                self.start_next_wave();
            } else {
                self.break_timer -= 1;
            }
        }
        self.spawn();
        self.advance_creeps();
        self.fire_towers();
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
        self.score
    }

    fn render(&self) -> Vec<String>
    {
        let mut canvas = Canvas::new(WIDTH * 2, HEIGHT);
        for (point, terrain) in self.map.iter() {
            let (glyph, color) = match terrain {
                Terrain::Open => ("  ", None),
                Terrain::Path => ("..", Some(GREY)),
                Terrain::Tower => ("TT", Some(YELLOW)),
            };
            canvas.text(point.x as usize * 2, point.y as usize, glyph, color);
        }
        for creep in &self.creeps {
            let (x, y) = self.position(creep);
            let glyph = if creep.hp > 9 { "##".to_string() } else { format!("c{}", creep.hp) };
            canvas.text(x.round() as usize * 2, y.round() as usize, &glyph, Some(RED));
        }
        let x = self.cursor.x as usize * 2;
        let y = self.cursor.y as usize;
        canvas.paint(x, y, GOLD);
        canvas.paint(x + 1, y, GOLD);

        let next_in = if self.wave_cleared() && self.wave < FINAL_WAVE {
            format!("  next wave in {:.1}s", self.break_timer as f32 * STEP_MS as f32 / 1000.0)
        } else {
            String::new()
        };
        let mut lines = vec![format!(
            "Wave: {}/{}  Lives: {}  Gold: {}  Kills: {}{}",
            self.wave, FINAL_WAVE, self.lives, self.gold, self.kills, next_in
        )];
        lines.extend(canvas.to_framed_lines());
        lines.push(format!(
            "Tower: range {:.1}, damage {}, cost {}",
            TOWER_RANGE, TOWER_DAMAGE, TOWER_COST
        ));
        if self.map.get(self.cursor) == Some(&Terrain::Path) {
            lines.push(paint_text("Cannot build on the path", WHITE));
        }
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        vec![
            format!("Waves reached: {}/{}", self.wave, FINAL_WAVE),
            format!("Creeps destroyed: {}", self.kills),
            format!("Towers built: {}", self.towers.len()),
        ]
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn path_follows_waypoints_cell_by_cell()
    {
        let path = trace_path(&[Point::new(0, 0), Point::new(2, 0), Point::new(2, 2)]);
        assert_eq!(
            path,
            vec![
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(2, 1),
                Point::new(2, 2)
            ]
        );
        let full = trace_path(&WAYPOINTS);
        assert!(full.windows(2).all(|w| (w[0].x - w[1].x).abs() + (w[0].y - w[1].y).abs() == 1));
    }

    #[test]
    fn cannot_build_on_path_or_without_gold()
    {
        let mut game = TowerDefense::new();
        assert!(!game.build(Point::new(0, 1)));
        assert!(game.build(Point::new(5, 3)));
        assert!(!game.build(Point::new(5, 3)));
        assert!(game.build(Point::new(6, 3)));
        assert_eq!(game.gold, START_GOLD - 2 * TOWER_COST);
        assert!(!game.build(Point::new(7, 3)));
    }

    #[test]
    fn first_wave_starts_after_break()
    {
        let mut game = TowerDefense::new();
        for _ in 0..WAVE_BREAK_STEPS {
            game.step();
        }
        assert_eq!(game.wave, 0);
        game.step();
        assert_eq!(game.wave, 1);
        assert_eq!(game.creeps.len(), 1);
    }

    #[test]
    fn calling_wave_early_skips_the_break()
    {
        let mut game = TowerDefense::new();
        game.handle_input(Input::Alternate);
        assert_eq!(game.wave, 1);
        game.handle_input(Input::Alternate);
        assert_eq!(game.wave, 1);
    }

    #[test]
    fn break_after_an_early_wave_is_full_length()
    {
        let mut game = TowerDefense::new();
        for _ in 0..25 {
            game.step();
        }
        game.handle_input(Input::Alternate);
        assert_eq!(game.wave, 1);
        game.to_spawn = 0;
        game.creeps.clear();
        for _ in 0..WAVE_BREAK_STEPS {
            game.step();
        }
        assert_eq!(game.wave, 1);
        game.step();
        assert_eq!(game.wave, 2);
    }

    #[test]
    fn leaking_creeps_cost_lives()
    {
        let mut game = TowerDefense::new();
        let end = (game.path.len() - 1) as f32;
        game.wave = 1;
        game.creeps.push(Creep {
            progress: end - 0.05,
            hp: 5,
            speed: 0.2,
            bounty: 1,
        });
        game.step();
        assert_eq!(game.lives, START_LIVES - 1);
        assert!(game.creeps.is_empty());
    }

    #[test]
    fn towers_target_the_leading_creep_in_range()
    {
        let mut game = TowerDefense::new();
        game.wave = 1;
        game.to_spawn = 1;
        game.spawn_timer = 100;
        assert!(game.build(Point::new(5, 2)));
        // Cells (4,1) and (6,1) are progress 4 and 6 on the path.
        game.creeps.push(Creep {
            progress: 4.0,
            hp: 3,
            speed: 0.0,
            bounty: 2,
        });
        game.creeps.push(Creep {
            progress: 6.0,
            hp: 3,
            speed: 0.0,
            bounty: 2,
        });
        game.fire_towers();
        assert_eq!(game.creeps[0].hp, 3);
        assert_eq!(game.creeps[1].hp, 2);
        assert_eq!(game.towers[0].cooldown, TOWER_RELOAD_STEPS);
    }

    #[test]
    fn kills_pay_bounty_and_score()
    {
        let mut game = TowerDefense::new();
        game.wave = 1;
        assert!(game.build(Point::new(5, 2)));
        let gold = game.gold;
        game.creeps.push(Creep {
            progress: 5.0,
            hp: 1,
            speed: 0.0,
            bounty: 3,
        });
        game.fire_towers();
        assert!(game.creeps.is_empty());
        assert_eq!(game.gold, gold + 3);
        assert_eq!(game.score(), 30);
        assert_eq!(game.kills, 1);
    }

    #[test]
    fn reload_delays_next_shot()
    {
        let mut game = TowerDefense::new();
        assert!(game.build(Point::new(5, 2)));
        game.creeps.push(Creep {
            progress: 5.0,
            hp: 10,
            speed: 0.0,
            bounty: 1,
        });
        for _ in 0..=TOWER_RELOAD_STEPS {
            game.fire_towers();
        }
        assert_eq!(game.creeps[0].hp, 9);
        game.fire_towers();
        assert_eq!(game.creeps[0].hp, 8);
    }

    #[test]
    fn surviving_the_final_wave_wins()
    {
        let mut game = TowerDefense::new();
        game.wave = FINAL_WAVE;
        game.step();
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.score(), START_LIVES * 50);
    }

    #[test]
    fn running_out_of_lives_loses()
    {
        let mut game = TowerDefense::new();
        game.lives = 1;
        game.wave = 1;
        let end = (game.path.len() - 1) as f32;
        game.creeps.push(Creep {
            progress: end,
            hp: 1,
            speed: 0.1,
            bounty: 1,
        });
        game.step();
        assert_eq!(game.status(), Status::Lost);
    }

    #[test]
    fn later_waves_are_tougher()
    {
        let first = wave_spec(1);
        let last = wave_spec(FINAL_WAVE);
        assert!(last.count > first.count);
        assert!(last.hp > first.hp);
        assert!(creep_speed(FINAL_WAVE) > creep_speed(1));
    }
}
