/// Disjoint set over the pixels of one scanline, with path compression.
/// Every root stays within the row it was built for; `reset` reuses the
/// allocation between rows.
#[derive(Clone, Debug)]
pub struct RowUnionFind {
    parent: Vec<u32>,
}

impl RowUnionFind {
    pub fn new(width: usize) -> Self {
        Self {
            parent: (0..width as u32).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.parent.len()
    }

    pub fn reset(&mut self) {
        for (i, p) in self.parent.iter_mut().enumerate() {
            *p = i as u32;
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }
        let mut cur = x;
        while cur != root {
            let next = self.parent[cur] as usize;
            self.parent[cur] = root as u32;
            cur = next;
        }
        root
    }

    /// Merges the set of `b` into the set of `a`; the surviving root is
    /// `find(a)`, which keeps colour assignment deterministic.
    pub fn unite(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra as u32;
        }
    }
}
