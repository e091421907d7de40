use super::input::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point
{
    pub x: i32,
    pub y: i32,
}

impl Point
{
    pub const fn new(x: i32, y: i32) -> Self
    {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction) -> Point
    {
        let (dx, dy) = dir.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn translate(self, dx: i32, dy: i32) -> Point
    {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Fixed size row-major grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T>
{
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T>
{
    pub fn new(width: usize, height: usize, fill: T) -> Self
    {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    #[cfg(test)]
    pub fn fill(&mut self, value: T)
    {
        self.cells.iter_mut().for_each(|cell| *cell = value.clone());
    }
}

impl<T> Grid<T>
{
    pub fn width(&self) -> usize
    {
        self.width
    }

    pub fn height(&self) -> usize
    {
        self.height
    }

    pub fn len(&self) -> usize
    {
        self.cells.len()
    }

    pub fn contains(&self, point: Point) -> bool
    {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    fn index(&self, point: Point) -> Option<usize>
    {
        if self.contains(point) {
            Some(point.y as usize * self.width + point.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, point: Point) -> Option<&T>
    {
        self.index(point).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, point: Point) -> Option<&mut T>
    {
        match self.index(point) {
            Some(idx) => Some(&mut self.cells[idx]),
            None => None,
        }
    }

    /// Returns false when the point is outside the grid.
    pub fn set(&mut self, point: Point, value: T) -> bool
    {
        match self.get_mut(point) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn neighbors8(&self, point: Point) -> impl Iterator<Item = Point> + '_
    {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| point.translate(dx, dy))
            .filter(|p| self.contains(*p))
    }

    pub fn points(&self) -> impl Iterator<Item = Point>
    {
        let width = self.width;
        (0..self.cells.len()).map(move |idx| Point::new((idx % width) as i32, (idx / width) as i32))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)>
    {
        self.points().zip(self.cells.iter())
    }

    pub fn row(&self, y: usize) -> &[T]
    {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T]
    {
        &mut self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]>
    {
        self.cells.chunks(self.width)
    }
}
