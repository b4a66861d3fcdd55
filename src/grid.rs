/// Row-major flat grid. No per-cell objects, f32 friendly.
/// The simulation domain is a torus: both axes wrap.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

/// Index one step east with wrap-around.
#[inline]
pub fn east(x: usize, w: usize) -> usize {
    (x + 1) % w
}

/// Index one step west with wrap-around.
#[inline]
pub fn west(x: usize, w: usize) -> usize {
    if x == 0 { w - 1 } else { x - 1 }
}

/// Index one row north with wrap-around.
#[inline]
pub fn north(y: usize, h: usize) -> usize {
    (y + 1) % h
}

/// Index one row south with wrap-around.
#[inline]
pub fn south(y: usize, h: usize) -> usize {
    if y == 0 { h - 1 } else { y - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_at_edges() {
        assert_eq!(east(3, 4), 0);
        assert_eq!(west(0, 4), 3);
        assert_eq!(north(3, 4), 0);
        assert_eq!(south(0, 4), 3);
    }

    #[test]
    fn wrap_in_interior() {
        assert_eq!(east(1, 4), 2);
        assert_eq!(west(2, 4), 1);
        assert_eq!(north(1, 4), 2);
        assert_eq!(south(2, 4), 1);
    }

    #[test]
    fn grid_indexing_row_major() {
        let mut g: Grid<f32> = Grid::new(3, 2);
        g.set(2, 1, 7.0);
        assert_eq!(g.idx(2, 1), 5);
        assert_eq!(g.get(2, 1), 7.0);
        assert_eq!(g.data[5], 7.0);
    }
}
