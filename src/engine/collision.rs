use super::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect
{
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect
{
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self
    {
        Self { x, y, w, h }
    }

    pub fn intersects(&self, other: &Rect) -> bool
    {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32)
    {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Where along a paddle the ball landed, from -1.0 (leading edge) to 1.0
/// (trailing edge). `pos` and the paddle are measured on the same axis.
pub fn paddle_hit_factor(pos: f32, paddle_start: f32, paddle_len: f32) -> f32
{
    if paddle_len <= 0.0 {
        return 0.0;
    }
    let center = paddle_start + paddle_len / 2.0;
    ((pos - center) / (paddle_len / 2.0)).clamp(-1.0, 1.0)
}

/// Slides the non-zero values of `line` toward index 0, merging equal
/// neighbours once per move. Returns the points earned by merges.
pub fn slide_and_merge(line: &mut [u32]) -> u32
{
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut merged = Vec::with_capacity(line.len());
    let mut points = 0;
    let mut idx = 0;
    while idx < tiles.len() {
        if idx + 1 < tiles.len() && tiles[idx] == tiles[idx + 1] {
            let value = tiles[idx] * 2;
            merged.push(value);
            points += value;
            idx += 2;
        } else {
            merged.push(tiles[idx]);
            idx += 1;
        }
    }
    merged.resize(line.len(), 0);
    line.copy_from_slice(&merged);
    points
}

/// Indices of rows where every cell is occupied.
pub fn full_rows<T>(grid: &Grid<Option<T>>) -> Vec<usize>
{
    (0..grid.height())
        .filter(|&y| grid.row(y).iter().all(Option::is_some))
        .collect()
}

/// Removes the given rows and shifts everything above them down. Returns the
/// number of rows removed.
pub fn clear_rows<T: Clone>(grid: &mut Grid<Option<T>>, rows: &[usize]) -> usize
{
    if rows.is_empty() {
        return 0;
    }
    let width = grid.width();
    let kept: Vec<Vec<Option<T>>> = (0..grid.height())
        .filter(|y| !rows.contains(y))
        .map(|y| grid.row(y).to_vec())
        .collect();
    let removed = grid.height() - kept.len();
    for y in 0..removed {
        grid.row_mut(y).iter_mut().for_each(|cell| *cell = None);
    }
    for (offset, row) in kept.into_iter().enumerate() {
        grid.row_mut(removed + offset)[..width].clone_from_slice(&row);
    }
    removed
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::engine::grid::Point;

    #[test]
    fn rects_touching_edges_do_not_intersect()
    {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(!a.intersects(&Rect::new(2.0, 0.0, 1.0, 1.0)));
        assert!(a.intersects(&Rect::new(1.5, 1.5, 1.0, 1.0)));
        assert_eq!(a.center(), (1.0, 1.0));
    }

    #[test]
    fn hit_factor_spans_paddle()
    {
        assert_eq!(paddle_hit_factor(5.0, 2.0, 6.0), 0.0);
        assert_eq!(paddle_hit_factor(2.0, 2.0, 6.0), -1.0);
        assert_eq!(paddle_hit_factor(20.0, 2.0, 6.0), 1.0);
    }

    #[test]
    fn merges_each_tile_once()
    {
        let mut line = [2, 2, 2, 2];
        assert_eq!(slide_and_merge(&mut line), 8);
        assert_eq!(line, [4, 4, 0, 0]);

        let mut line = [4, 0, 4, 8];
        assert_eq!(slide_and_merge(&mut line), 8);
        assert_eq!(line, [8, 8, 0, 0]);

        let mut line = [0, 2, 0, 4];
        assert_eq!(slide_and_merge(&mut line), 0);
        assert_eq!(line, [2, 4, 0, 0]);
    }

    #[test]
    fn clears_rows_and_drops_the_rest()
    {
        let mut grid: Grid<Option<u8>> = Grid::new(2, 4, None);
        grid.set(Point::new(0, 0), Some(1));
        grid.set(Point::new(0, 2), Some(2));
        grid.set(Point::new(1, 2), Some(2));
        grid.set(Point::new(0, 3), Some(3));
        grid.set(Point::new(1, 3), Some(3));

        let rows = full_rows(&grid);
        assert_eq!(rows, vec![2, 3]);
        assert_eq!(clear_rows(&mut grid, &rows), 2);
        assert_eq!(grid.row(3), &[None, None]);
        assert_eq!(grid.row(2), &[Some(1), None]);
        assert!(full_rows(&grid).is_empty());
    }
}
