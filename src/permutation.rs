/// An ordering of `n` slot positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    map: Vec<usize>,
}

impl Permutation {
    /// Image of every position, in order.
    pub fn map(&self) -> &[usize] {
        &self.map
    }

    /// `n!`, or `None` when it does not fit in a `usize`.
    pub fn factorial(n: usize) -> Option<usize> {
        (1..=n).try_fold(1usize, |acc, k| acc.checked_mul(k))
    }

    /// Myrvold–Ruskey unranking: a bijection between `0..n!` and the permutations of `n` elements.
    pub fn unrank(n: usize, mut rank: usize) -> Self {
        let mut map = (0..n).collect::<Vec<_>>();
        for i in (1..=n).rev() {
            let j = rank % i;
            rank /= i;
            map.swap(i - 1, j);
        }
        Permutation { map }
    }

    /// Every permutation of `n` elements, each exactly once.
    ///
    /// `None` when `n!` overflows a `usize`, i.e. for `n > 20` on 64-bit targets.
    pub fn all(n: usize) -> Option<impl Iterator<Item = Permutation>> {
        let count = Self::factorial(n)?;
        Some((0..count).map(move |r| Self::unrank(n, r)))
    }
}

/// Every ordered pair `(j, k)` of distinct positions below `n`, lexicographically.
pub fn ordered_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |j| (0..n).filter(move |&k| k != j).map(move |k| (j, k)))
}
