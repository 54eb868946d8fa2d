use crate::{Position, Size};

/// Dense storage for one layer of region cells, indexed `row * width + col`.
#[derive(Clone, Debug)]
pub(crate) struct Plane<T> {
    size: Size,
    cells: Vec<Option<T>>,
    len: usize,
}

impl<T: Copy> Plane<T> {
    pub fn new(size: Size) -> Self {
        Plane {
            size,
            cells: vec![None; size.area().max(0) as usize],
            len: 0,
        }
    }

    fn idx(&self, p: Position) -> Option<usize> {
        self.size
            .contains(p)
            .then(|| (p.y * self.size.width + p.x) as usize)
    }

    pub fn get(&self, p: Position) -> Option<T> {
        self.idx(p).and_then(|i| self.cells[i])
    }

    pub fn contains(&self, p: Position) -> bool {
        self.get(p).is_some()
    }

    /// Set a cell, return false if the position is out of bounds.
    pub fn insert(&mut self, p: Position, value: T) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.cells[i].replace(value).is_none() {
            self.len += 1;
        }
        true
    }

    pub fn remove(&mut self, p: Position) -> Option<T> {
        let i = self.idx(p)?;
        let ret = self.cells[i].take();
        if ret.is_some() {
            self.len -= 1;
        }
        ret
    }

    pub fn len(&self) -> usize {
        self.len
    }
}
