/// Disjoint sets over the indices `0..n`, with union by size and path compression.
///
/// The buffers are kept between blocks; `reset` only reinitializes them.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        let mut uf = Self::default();
        uf.reset(n);
        uf
    }

    /// Makes every index in `0..n` a singleton set.
    pub fn reset(&mut self, n: usize) {
        self.parent.clear();
        self.parent.extend(0..n);
        self.size.clear();
        self.size.resize(n, 1);
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn is_root(&self, a: usize) -> bool {
        self.parent[a] == a
    }

    /// Number of members in the set whose root is `root`.
    #[cfg(test)]
    fn set_size(&self, root: usize) -> usize {
        assert!(self.is_root(root), "{} is not a set root", root);
        self.size[root]
    }

    /// Returns the root of the set containing `a`.
    ///
    /// Panics if `a` is out of range.
    pub fn find(&mut self, a: usize) -> usize {
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut cur = a;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }

        root
    }

    /// Merges the sets rooted at `a` and `b`.
    ///
    /// Both arguments must be roots. The smaller set goes under the larger one;
    /// on a tie `a` goes under `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        assert!(
            self.is_root(a) && self.is_root(b),
            "union called on non-root indices {} and {}",
            a,
            b
        );

        if self.size[a] > self.size[b] {
            self.parent[b] = a;
            self.size[a] += self.size[b];
        } else {
            self.parent[a] = b;
            self.size[b] += self.size[a];
        }
    }
}
