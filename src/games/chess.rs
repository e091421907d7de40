use crate::engine::render::{Canvas, Rgb, BLUE, GOLD, ORANGE, WHITE};
use crate::engine::{Game, Input, Point, Status};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const ROOK_RAYS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const WHITE_SHORT: usize = 0;
const WHITE_LONG: usize = 1;
const BLACK_SHORT: usize = 2;
const BLACK_LONG: usize = 3;

/// Half moves without a capture or pawn move that end the game.
const FIFTY_MOVE_LIMIT: u32 = 100;
const DRAW_POINTS: u32 = 50;

const LIGHT_SQUARE: Rgb = Rgb::new(120, 100, 80);
const DARK_SQUARE: Rgb = Rgb::new(70, 50, 40);
const TARGET_SQUARE: Rgb = Rgb::new(60, 130, 60);
const LAST_MOVE_SQUARE: Rgb = Rgb::new(140, 120, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color
{
    White,
    Black,
}

impl Color
{
    pub fn opposite(self) -> Color
    {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    fn forward(self) -> i8
    {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    fn home_rank(self) -> i8
    {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind
{
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Kind
{
    fn value(self) -> u32
    {
        match self {
            Kind::Pawn => 1,
            Kind::Knight | Kind::Bishop => 3,
            Kind::Rook => 5,
            Kind::Queen => 9,
            Kind::King => 0,
        }
    }

    fn letter(self) -> char
    {
        match self {
            Kind::Pawn => 'P',
            Kind::Knight => 'N',
            Kind::Bishop => 'B',
            Kind::Rook => 'R',
            Kind::Queen => 'Q',
            Kind::King => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece
{
    pub color: Color,
    pub kind: Kind,
}

impl Piece
{
    fn glyph(self) -> char
    {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move
{
    pub from: u8,
    pub to: u8,
    pub promotion: Option<Kind>,
}

impl Move
{
    fn new(from: u8, to: u8) -> Self
    {
        Self {
            from,
            to,
            promotion: None,
        }
    }
}

fn index(file: i8, rank: i8) -> u8
{
    (rank * 8 + file) as u8
}

fn square(file: i8, rank: i8) -> Option<u8>
{
    ((0..8).contains(&file) && (0..8).contains(&rank)).then(|| index(file, rank))
}

fn file_of(sq: u8) -> i8
{
    (sq % 8) as i8
}

fn rank_of(sq: u8) -> i8
{
    (sq / 8) as i8
}

fn square_name(sq: u8) -> String
{
    format!("{}{}", (b'a' + sq % 8) as char, sq / 8 + 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position
{
    board: [Option<Piece>; 64],
    side: Color,
    castling: [bool; 4],
    en_passant: Option<u8>,
    halfmove_clock: u32,
}

impl Position
{
    pub fn empty() -> Self
    {
        Self {
            board: [None; 64],
            side: Color::White,
            castling: [false; 4],
            en_passant: None,
            halfmove_clock: 0,
        }
    }

    pub fn start() -> Self
    {
        use Kind::*;

        let mut pos = Self::empty();
        pos.castling = [true; 4];
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        for (file, kind) in back.into_iter().enumerate() {
            let file = file as i8;
            pos.put(file, 0, Piece { color: Color::White, kind });
            pos.put(file, 1, Piece { color: Color::White, kind: Pawn });
            pos.put(file, 6, Piece { color: Color::Black, kind: Pawn });
            pos.put(file, 7, Piece { color: Color::Black, kind });
        }
        pos
    }

    fn put(&mut self, file: i8, rank: i8, piece: Piece)
    {
        if let Some(sq) = square(file, rank) {
            self.board[sq as usize] = Some(piece);
        }
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece>
    {
        self.board.get(sq as usize).copied().flatten()
    }

    fn at(&self, file: i8, rank: i8) -> Option<Piece>
    {
        square(file, rank).and_then(|sq| self.piece_at(sq))
    }

    fn king_square(&self, color: Color) -> Option<u8>
    {
        let king = Some(Piece { color, kind: Kind::King });
        (0..64u8).find(|sq| self.board[*sq as usize] == king)
    }

    pub fn is_attacked(&self, sq: u8, by: Color) -> bool
    {
        let (file, rank) = (file_of(sq), rank_of(sq));
        let holds = |f: i8, r: i8, kind: Kind| self.at(f, r) == Some(Piece { color: by, kind });

        let pawn_rank = rank - by.forward();
        if holds(file - 1, pawn_rank, Kind::Pawn) || holds(file + 1, pawn_rank, Kind::Pawn) {
            return true;
        }
        if KNIGHT_JUMPS
            .iter()
            .any(|&(df, dr)| holds(file + df, rank + dr, Kind::Knight))
        {
            return true;
        }
        if KING_STEPS
            .iter()
            .any(|&(df, dr)| holds(file + df, rank + dr, Kind::King))
        {
            return true;
        }

        let slides = |rays: &[(i8, i8)], kinds: [Kind; 2]| {
            rays.iter().any(|&(df, dr)| {
                let (mut f, mut r) = (file + df, rank + dr);
                while let Some(next) = square(f, r) {
                    if let Some(piece) = self.piece_at(next) {
                        return piece.color == by && kinds.contains(&piece.kind);
                    }
                    f += df;
                    r += dr;
                }
                false
            })
        };
        slides(&ROOK_RAYS, [Kind::Rook, Kind::Queen]) || slides(&BISHOP_RAYS, [Kind::Bishop, Kind::Queen])
    }

    pub fn in_check(&self) -> bool
    {
        self.king_square(self.side)
            .is_some_and(|king| self.is_attacked(king, self.side.opposite()))
    }

    fn open_for(&self, sq: u8) -> bool
    {
        self.piece_at(sq).map_or(true, |piece| piece.color != self.side)
    }

    fn step_moves(&self, from: u8, steps: &[(i8, i8)], moves: &mut Vec<Move>)
    {
        for &(df, dr) in steps {
            if let Some(to) = square(file_of(from) + df, rank_of(from) + dr) {
                if self.open_for(to) {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }

    fn ray_moves(&self, from: u8, rays: &[(i8, i8)], moves: &mut Vec<Move>)
    {
        for &(df, dr) in rays {
            let (mut f, mut r) = (file_of(from) + df, rank_of(from) + dr);
            while let Some(to) = square(f, r) {
                match self.piece_at(to) {
                    None => moves.push(Move::new(from, to)),
                    Some(piece) => {
                        if piece.color != self.side {
                            moves.push(Move::new(from, to));
                        }
                        break;
                    }
                }
                f += df;
                r += dr;
            }
        }
    }

    fn pawn_moves(&self, from: u8, moves: &mut Vec<Move>)
    {
        let dir = self.side.forward();
        let (file, rank) = (file_of(from), rank_of(from));
        let start_rank = self.side.home_rank() + dir;
        let push = |moves: &mut Vec<Move>, to: u8| {
            let last = rank_of(to) == 0 || rank_of(to) == 7;
            moves.push(Move {
                from,
                to,
                promotion: last.then_some(Kind::Queen),
            });
        };

        if let Some(one) = square(file, rank + dir) {
            if self.piece_at(one).is_none() {
                push(moves, one);
                if rank == start_rank {
                    if let Some(two) = square(file, rank + 2 * dir) {
                        if self.piece_at(two).is_none() {
                            moves.push(Move::new(from, two));
                        }
                    }
                }
            }
        }
        for df in [-1, 1] {
            if let Some(to) = square(file + df, rank + dir) {
                let enemy = self.piece_at(to).is_some_and(|piece| piece.color != self.side);
                if enemy || self.en_passant == Some(to) {
                    push(moves, to);
                }
            }
        }
    }

    fn castle_moves(&self, from: u8, moves: &mut Vec<Move>)
    {
        let color = self.side;
        let home = color.home_rank();
        let enemy = color.opposite();
        if from != index(4, home) || self.is_attacked(from, enemy) {
            return;
        }
        let (short, long) = match color {
            Color::White => (WHITE_SHORT, WHITE_LONG),
            Color::Black => (BLACK_SHORT, BLACK_LONG),
        };
        let rook = Some(Piece { color, kind: Kind::Rook });
        let empty = |files: &[i8]| files.iter().all(|f| self.at(*f, home).is_none());
        let safe = |files: &[i8]| files.iter().all(|f| !self.is_attacked(index(*f, home), enemy));

        if self.castling[short] && self.at(7, home) == rook && empty(&[5, 6]) && safe(&[5, 6]) {
            moves.push(Move::new(from, index(6, home)));
        }
        if self.castling[long] && self.at(0, home) == rook && empty(&[1, 2, 3]) && safe(&[2, 3]) {
            moves.push(Move::new(from, index(2, home)));
        }
    }

    fn pseudo_moves(&self) -> Vec<Move>
    {
        let mut moves = Vec::with_capacity(48);
        for from in 0..64u8 {
            let Some(piece) = self.piece_at(from) else {
                continue;
            };
            if piece.color != self.side {
                continue;
            }
            match piece.kind {
                Kind::Pawn => self.pawn_moves(from, &mut moves),
                Kind::Knight => self.step_moves(from, &KNIGHT_JUMPS, &mut moves),
                Kind::Bishop => self.ray_moves(from, &BISHOP_RAYS, &mut moves),
                Kind::Rook => self.ray_moves(from, &ROOK_RAYS, &mut moves),
                Kind::Queen => {
                    self.ray_moves(from, &ROOK_RAYS, &mut moves);
                    self.ray_moves(from, &BISHOP_RAYS, &mut moves);
                }
                Kind::King => {
                    self.step_moves(from, &KING_STEPS, &mut moves);
                    self.castle_moves(from, &mut moves);
                }
            }
        }
        moves
    }

    /// Moves that do not leave the mover's king attacked.
    pub fn legal_moves(&self) -> Vec<Move>
    {
        let enemy = self.side.opposite();
        self.pseudo_moves()
            .into_iter()
            .filter(|mv| {
                let next = self.apply(*mv);
                next.king_square(self.side)
                    .map_or(true, |king| !next.is_attacked(king, enemy))
            })
            .collect()
    }

    /// Kind of piece a move takes, counting en passant.
    pub fn captured(&self, mv: Move) -> Option<Kind>
    {
        if let Some(piece) = self.piece_at(mv.to) {
            return Some(piece.kind);
        }
        let pawn = self.piece_at(mv.from).is_some_and(|piece| piece.kind == Kind::Pawn);
        (pawn && self.en_passant == Some(mv.to) && file_of(mv.from) != file_of(mv.to))
            .then_some(Kind::Pawn)
    }

    pub fn apply(&self, mv: Move) -> Position
    {
        let mut next = self.clone();
        let Some(piece) = self.piece_at(mv.from) else {
            return next;
        };
        let (from_file, from_rank) = (file_of(mv.from), rank_of(mv.from));
        let to_file = file_of(mv.to);
        let capture = self.captured(mv).is_some();

        next.board[mv.from as usize] = None;
        if piece.kind == Kind::Pawn && self.piece_at(mv.to).is_none() && from_file != to_file {
            next.board[index(to_file, from_rank) as usize] = None;
        }
        if piece.kind == Kind::King && (to_file - from_file).abs() == 2 {
            let (rook_from, rook_to) = if to_file == 6 { (7, 5) } else { (0, 3) };
            let rook = next.board[index(rook_from, from_rank) as usize].take();
            next.board[index(rook_to, from_rank) as usize] = rook;
        }
        next.board[mv.to as usize] = Some(match mv.promotion {
            Some(kind) => Piece { color: piece.color, kind },
            None => piece,
        });

        if piece.kind == Kind::King {
            let rights = match piece.color {
                Color::White => [WHITE_SHORT, WHITE_LONG],
                Color::Black => [BLACK_SHORT, BLACK_LONG],
            };
            for right in rights {
                next.castling[right] = false;
            }
        }
        for corner in [mv.from, mv.to] {
            match corner {
                0 => next.castling[WHITE_LONG] = false,
                7 => next.castling[WHITE_SHORT] = false,
                56 => next.castling[BLACK_LONG] = false,
                63 => next.castling[BLACK_SHORT] = false,
                _ => {}
            }
        }

        let double_push = piece.kind == Kind::Pawn && (rank_of(mv.to) - from_rank).abs() == 2;
        next.en_passant = double_push.then(|| index(from_file, from_rank + piece.color.forward()));
        next.halfmove_clock = if piece.kind == Kind::Pawn || capture {
            0
        } else {
            self.halfmove_clock + 1
        };
        next.side = self.side.opposite();
        next
    }
}

/// Greedy reply: the most valuable capture, otherwise any legal move.
fn engine_move(position: &Position, rng: &mut StdRng) -> Option<Move>
{
    let moves = position.legal_moves();
    let best = moves
        .iter()
        .filter_map(|mv| position.captured(*mv).map(Kind::value))
        .max();
    let pool: Vec<Move> = match best {
        Some(value) => moves
            .iter()
            .copied()
            .filter(|mv| position.captured(*mv).map(Kind::value) == Some(value))
            .collect(),
        None => moves,
    };
    pool.choose(rng).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending
{
    Checkmate(Color),
    Stalemate,
    FiftyMoves,
}

pub struct Chess
{
    position: Position,
    cursor: Point,
    selected: Option<u8>,
    moves: u32,
    last_move: Option<Move>,
    ending: Option<Ending>,
    rng: StdRng,
}

impl Chess
{
    pub fn new(seed: u64) -> Self
    {
        Self {
            position: Position::start(),
            cursor: Point::new(4, 1),
            selected: None,
            moves: 0,
            last_move: None,
            ending: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn cursor_square(&self) -> Option<u8>
    {
        square(self.cursor.x as i8, self.cursor.y as i8)
    }

    fn settle(&mut self) -> bool
    {
        if self.position.legal_moves().is_empty() {
            self.ending = Some(if self.position.in_check() {
                Ending::Checkmate(self.position.side.opposite())
            } else {
                Ending::Stalemate
            });
        } else if self.position.halfmove_clock >= FIFTY_MOVE_LIMIT {
            self.ending = Some(Ending::FiftyMoves);
        }
        if let Some(ending) = self.ending {
            tracing::debug!(?ending, moves = self.moves, "chess game ended");
        }
        self.ending.is_some()
    }

    fn play(&mut self, mv: Move)
    {
        self.position = self.position.apply(mv);
        self.moves += 1;
        self.last_move = Some(mv);
        if self.settle() {
            return;
        }
        if let Some(reply) = engine_move(&self.position, &mut self.rng) {
            self.position = self.position.apply(reply);
            self.last_move = Some(reply);
            self.settle();
        }
    }

    fn activate(&mut self)
    {
        if self.ending.is_some() || self.position.side != Color::White {
            return;
        }
        let Some(at) = self.cursor_square() else {
            return;
        };
        if let Some(from) = self.selected {
            let chosen = self
                .position
                .legal_moves()
                .into_iter()
                .find(|mv| mv.from == from && mv.to == at);
            if let Some(mv) = chosen {
                self.selected = None;
                self.play(mv);
                return;
            }
        }
        let own = self
            .position
            .piece_at(at)
            .is_some_and(|piece| piece.color == Color::White);
        self.selected = (own && self.selected != Some(at)).then_some(at);
    }

    fn targets(&self) -> Vec<u8>
    {
        let Some(from) = self.selected else {
            return Vec::new();
        };
        self.position
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect()
    }
}

impl Game for Chess
{
    fn title(&self) -> &'static str
    {
        "Chess"
    }

    fn controls(&self) -> &'static str
    {
        "Arrows move, Space picks a piece then its destination, f cancels"
    }

    fn step_interval(&self) -> Option<Duration>
    {
        None
    }

    fn handle_input(&mut self, input: Input)
    {
        match input {
            Input::Move(dir) => {
                let (dx, dy) = dir.delta();
                // Rank 8 is drawn at the top, so screen up is rank up.
                let next = Point::new(self.cursor.x + dx, self.cursor.y - dy);
                if (0..8).contains(&next.x) && (0..8).contains(&next.y) {
                    self.cursor = next;
                }
            }
            Input::Action => self.activate(),
            Input::Alternate => self.selected = None,
            _ => {}
        }
    }

    fn status(&self) -> Status
    {
        match self.ending {
            None => Status::Running,
            Some(Ending::Checkmate(Color::White)) => Status::Won,
            Some(_) => Status::Lost,
        }
    }

    fn score(&self) -> u32
    {
        match self.ending {
            Some(Ending::Checkmate(Color::White)) => 1000u32.saturating_sub(10 * self.moves).max(100),
            Some(Ending::Stalemate | Ending::FiftyMoves) => DRAW_POINTS,
            _ => 0,
        }
    }

    fn render(&self) -> Vec<String>
    {
        let targets = self.targets();
        let mut canvas = Canvas::new(24, 8);
        for row in 0..8 {
            let rank = 7 - row as i8;
            for file in 0..8i8 {
                let sq = index(file, rank);
                let here = Point::new(file as i32, rank as i32);
                let bg = if here == self.cursor {
                    BLUE
                } else if self.selected == Some(sq) {
                    GOLD
                } else if targets.contains(&sq) {
                    TARGET_SQUARE
                } else if self.last_move.is_some_and(|mv| mv.from == sq || mv.to == sq) {
                    LAST_MOVE_SQUARE
                } else if (file + rank) % 2 == 1 {
                    LIGHT_SQUARE
                } else {
                    DARK_SQUARE
                };
                let x = file as usize * 3;
                for dx in 0..3 {
                    canvas.paint(x + dx, row, bg);
                }
                if let Some(piece) = self.position.piece_at(sq) {
                    let fg = match piece.color {
                        Color::White => WHITE,
                        Color::Black => ORANGE,
                    };
                    canvas.put(x + 1, row, piece.glyph(), Some(fg));
                }
            }
        }

        let turn = match (self.ending, self.position.in_check()) {
            (Some(_), _) => "Game over".to_string(),
            (None, true) => "White to move (check!)".to_string(),
            (None, false) => "White to move".to_string(),
        };
        let last = self
            .last_move
            .map(|mv| format!("  Last: {}-{}", square_name(mv.from), square_name(mv.to)))
            .unwrap_or_default();
        let mut lines = vec![format!("Move {}  {turn}{last}", self.moves + 1)];
        for (i, line) in canvas.to_framed_lines().into_iter().enumerate() {
            let label = if (1..=8).contains(&i) {
                format!("{} ", 9 - i)
            } else {
                "  ".to_string()
            };
            lines.push(format!("{label}{line}"));
        }
        let files: String = ('a'..='h').map(|c| format!(" {c} ")).collect();
        lines.push(format!("   {files}"));
        lines
    }

    fn summary(&self) -> Vec<String>
    {
        let result = match self.ending {
            Some(Ending::Checkmate(Color::White)) => "Checkmate, you win!",
            Some(Ending::Checkmate(Color::Black)) => "Checkmate, black wins.",
            Some(Ending::Stalemate) => "Draw by stalemate.",
            Some(Ending::FiftyMoves) => "Draw by the fifty-move rule.",
            None => "Game abandoned.",
        };
        vec![result.to_string(), format!("Moves played: {}", self.moves)]
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn sq(name: &str) -> u8
    {
        let bytes = name.as_bytes();
        index((bytes[0] - b'a') as i8, (bytes[1] - b'1') as i8)
    }

    fn mv(from: &str, to: &str) -> Move
    {
        Move::new(sq(from), sq(to))
    }

    fn place(pos: &mut Position, name: &str, color: Color, kind: Kind)
    {
        pos.board[sq(name) as usize] = Some(Piece { color, kind });
    }

    fn has_move(pos: &Position, from: &str, to: &str) -> bool
    {
        pos.legal_moves()
            .iter()
            .any(|m| m.from == sq(from) && m.to == sq(to))
    }

    #[test]
    fn opening_move_counts()
    {
        let start = Position::start();
        let moves = start.legal_moves();
        assert_eq!(moves.len(), 20);
        let replies: usize = moves.iter().map(|m| start.apply(*m).legal_moves().len()).sum();
        assert_eq!(replies, 400);
    }

    #[test]
    fn short_castle_moves_the_rook()
    {
        let mut pos = Position::empty();
        place(&mut pos, "e1", Color::White, Kind::King);
        place(&mut pos, "h1", Color::White, Kind::Rook);
        place(&mut pos, "e8", Color::Black, Kind::King);
        pos.castling[WHITE_SHORT] = true;
        assert!(has_move(&pos, "e1", "g1"));

        let next = pos.apply(mv("e1", "g1"));
        assert_eq!(next.piece_at(sq("f1")).map(|p| p.kind), Some(Kind::Rook));
        assert_eq!(next.piece_at(sq("h1")), None);
        assert!(!next.castling[WHITE_SHORT]);
    }

    #[test]
    fn cannot_castle_through_attacked_square()
    {
        let mut pos = Position::empty();
        place(&mut pos, "e1", Color::White, Kind::King);
        place(&mut pos, "h1", Color::White, Kind::Rook);
        place(&mut pos, "e8", Color::Black, Kind::King);
        place(&mut pos, "f8", Color::Black, Kind::Rook);
        pos.castling[WHITE_SHORT] = true;
        assert!(!has_move(&pos, "e1", "g1"));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn()
    {
        let mut pos = Position::empty();
        place(&mut pos, "e1", Color::White, Kind::King);
        place(&mut pos, "e8", Color::Black, Kind::King);
        place(&mut pos, "e5", Color::White, Kind::Pawn);
        place(&mut pos, "d7", Color::Black, Kind::Pawn);
        pos.side = Color::Black;

        let pos = pos.apply(mv("d7", "d5"));
        assert_eq!(pos.en_passant, Some(sq("d6")));
        assert!(has_move(&pos, "e5", "d6"));
        assert_eq!(pos.captured(mv("e5", "d6")), Some(Kind::Pawn));

        let next = pos.apply(mv("e5", "d6"));
        assert_eq!(next.piece_at(sq("d5")), None);
        assert_eq!(next.piece_at(sq("d6")).map(|p| p.kind), Some(Kind::Pawn));
    }

    #[test]
    fn pawn_promotes_to_queen()
    {
        let mut pos = Position::empty();
        place(&mut pos, "e1", Color::White, Kind::King);
        place(&mut pos, "h8", Color::Black, Kind::King);
        place(&mut pos, "a7", Color::White, Kind::Pawn);
        let promotion = pos
            .legal_moves()
            .into_iter()
            .find(|m| m.from == sq("a7"))
            .unwrap();
        assert_eq!(promotion.promotion, Some(Kind::Queen));
        let next = pos.apply(promotion);
        assert_eq!(
            next.piece_at(sq("a8")),
            Some(Piece { color: Color::White, kind: Kind::Queen })
        );
        assert!(next.in_check());
    }

    #[test]
    fn pinned_piece_cannot_move()
    {
        let mut pos = Position::empty();
        place(&mut pos, "e1", Color::White, Kind::King);
        place(&mut pos, "e2", Color::White, Kind::Bishop);
        place(&mut pos, "e8", Color::Black, Kind::Rook);
        place(&mut pos, "h8", Color::Black, Kind::King);
        assert!(pos.legal_moves().iter().all(|m| m.from != sq("e2")));
    }

    #[test]
    fn fools_mate_loses_for_white()
    {
        let mut game = Chess::new(1);
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            game.position = game.position.apply(mv(from, to));
        }
        assert!(game.settle());
        assert_eq!(game.ending, Some(Ending::Checkmate(Color::Black)));
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn engine_takes_the_most_valuable_piece()
    {
        let mut pos = Position::empty();
        place(&mut pos, "a1", Color::White, Kind::King);
        place(&mut pos, "d4", Color::White, Kind::Queen);
        place(&mut pos, "b4", Color::White, Kind::Pawn);
        place(&mut pos, "c6", Color::Black, Kind::Knight);
        place(&mut pos, "h7", Color::Black, Kind::King);
        pos.side = Color::Black;
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(engine_move(&pos, &mut rng), Some(mv("c6", "d4")));
    }

    #[test]
    fn stalemate_is_a_draw()
    {
        let mut game = Chess::new(2);
        let mut pos = Position::empty();
        place(&mut pos, "a8", Color::Black, Kind::King);
        place(&mut pos, "b6", Color::White, Kind::Queen);
        place(&mut pos, "e1", Color::White, Kind::King);
        pos.side = Color::Black;
        game.position = pos;
        assert!(game.settle());
        assert_eq!(game.ending, Some(Ending::Stalemate));
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.score(), DRAW_POINTS);
    }

    #[test]
    fn fifty_quiet_moves_draw()
    {
        let mut game = Chess::new(3);
        game.position.halfmove_clock = FIFTY_MOVE_LIMIT;
        assert!(game.settle());
        assert_eq!(game.ending, Some(Ending::FiftyMoves));
    }

    #[test]
    fn quick_wins_score_more()
    {
        let mut game = Chess::new(4);
        game.ending = Some(Ending::Checkmate(Color::White));
        game.moves = 30;
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.score(), 700);
        game.moves = 95;
        assert_eq!(game.score(), 100);
    }

    #[test]
    fn cursor_selects_and_plays_a_move()
    {
        let mut game = Chess::new(5);
        game.handle_input(Input::Action);
        assert_eq!(game.selected, Some(sq("e2")));
        game.handle_input(Input::Move(crate::engine::Direction::Up));
        game.handle_input(Input::Move(crate::engine::Direction::Up));
        game.handle_input(Input::Action);
        assert_eq!(game.moves, 1);
        assert_eq!(game.position.side, Color::White);
        assert_eq!(
            game.position.piece_at(sq("e4")),
            Some(Piece { color: Color::White, kind: Kind::Pawn })
        );
        assert_eq!(game.selected, None);
    }
}
