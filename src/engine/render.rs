#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb
{
    pub const fn new(r: u8, g: u8, b: u8) -> Self
    {
        Self { r, g, b }
    }
}

pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const GREY: Rgb = Rgb::new(110, 110, 110);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
pub const GOLD: Rgb = Rgb::new(255, 215, 0);
pub const ORANGE: Rgb = Rgb::new(255, 128, 0);
pub const BLUE: Rgb = Rgb::new(80, 140, 255);
pub const CYAN: Rgb = Rgb::new(0, 220, 220);
pub const MAGENTA: Rgb = Rgb::new(220, 80, 220);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell
{
    pub ch: char,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Cell
{
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: None,
        bg: None,
    };
}

/// Character buffer the games draw into before it is turned into terminal
/// lines.
#[derive(Debug, Clone)]
pub struct Canvas
{
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas
{
    pub fn new(width: usize, height: usize) -> Self
    {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn put(&mut self, x: usize, y: usize, ch: char, fg: Option<Rgb>)
    {
        if x < self.width && y < self.height {
            let cell = &mut self.cells[y * self.width + x];
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    pub fn paint(&mut self, x: usize, y: usize, bg: Rgb)
    {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x].bg = Some(bg);
        }
    }

    pub fn text(&mut self, x: usize, y: usize, text: &str, fg: Option<Rgb>)
    {
        for (offset, ch) in text.chars().enumerate() {
            self.put(x + offset, y, ch, fg);
        }
    }

    #[cfg(test)]
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell>
    {
        if x < self.width && y < self.height {
            Some(&self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Plain characters of one row, useful for assertions.
    pub fn row_text(&self, y: usize) -> String
    {
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .map(|cell| cell.ch)
            .collect()
    }

    /// Renders every row framed by a border.
    pub fn to_framed_lines(&self) -> Vec<String>
    {
        let mut lines = Vec::with_capacity(self.height + 2);
        let edge = format!("+{}+", "-".repeat(self.width));
        lines.push(edge.clone());
        for y in 0..self.height {
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            lines.push(format!("|{}|", render_row(row)));
        }
        lines.push(edge);
        lines
    }
}

/// Emits colour escapes only where the colour changes between cells.
pub fn render_row(row: &[Cell]) -> String
{
    let mut line = String::with_capacity(row.len() + 16);
    let mut active: (Option<Rgb>, Option<Rgb>) = (None, None);
    for cell in row {
        if (cell.fg, cell.bg) != active {
            line.push_str("\x1b[0m");
            if let Some(color) = cell.fg {
                line.push_str(&ansi_fg(color));
            }
            if let Some(color) = cell.bg {
                line.push_str(&ansi_bg(color));
            }
            active = (cell.fg, cell.bg);
        }
        line.push(cell.ch);
    }
    if active != (None, None) {
        line.push_str("\x1b[0m");
    }
    line
}

pub fn ansi_fg(color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

pub fn ansi_bg(color: Rgb) -> String
{
    format!("\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
}

pub fn paint_text(text: &str, color: Rgb) -> String
{
    format!("{}{}\x1b[0m", ansi_fg(color), text)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32
{
    a + (b - a) * t
}

pub fn lerp_color(start: Rgb, end: Rgb, t: f32) -> Rgb
{
    let t = t.clamp(0.0, 1.0);
    Rgb {
        r: lerp(start.r as f32, end.r as f32, t) as u8,
        g: lerp(start.g as f32, end.g as f32, t) as u8,
        b: lerp(start.b as f32, end.b as f32, t) as u8,
    }
}
