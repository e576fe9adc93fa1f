/// A dense 2D grid stored row-major. Unlike a world map it does not wrap:
/// positions outside `width x height` have no neighbors.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of grid");
        y * self.width + x
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Get the 4-connected neighbors (left, right, up, down) inside the grid.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(4);

        if x > 0 {
            result.push((x - 1, y));
        }

        if x + 1 < self.width {
            result.push((x + 1, y));
        }

        if y > 0 {
            result.push((x, y - 1));
        }

        if y + 1 < self.height {
            result.push((x, y + 1));
        }

        result
    }

    /// Get every in-grid position within `radius` on both axes, excluding the
    /// center. A radius of 2 gives the 24-neighborhood, truncated at the edges.
    pub fn neighbors_within(&self, x: usize, y: usize, radius: usize) -> Vec<(usize, usize)> {
        let r = radius as i64;
        let mut result = Vec::with_capacity((2 * radius + 1).pow(2));

        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let nx = x as i64 + dx;
                let ny = y as i64 + dy;

                if self.contains(nx, ny) {
                    result.push((nx as usize, ny as usize));
                }
            }
        }

        result
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let width = self.width;
        (0..self.width * self.height).map(move |idx| (idx % width, idx / width))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }
}
