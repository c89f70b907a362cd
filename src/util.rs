/// Fixed-size bit set used as the visited/labeled scratch of graph traversals.
#[derive(Debug, Clone)]
pub struct BitSet {
    bits: Vec<u64>,
    n: usize,
}

impl BitSet {
    pub fn new(n: usize) -> Self {
        let words = n.div_ceil(64);
        Self { bits: vec![0; words], n }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn test(&self, idx: usize) -> bool {
        let (w, b) = (idx / 64, idx % 64);
        (self.bits[w] >> b) & 1 == 1
    }

    /// Sets `idx`, returning whether it was previously unset.
    #[inline]
    pub fn insert(&mut self, idx: usize) -> bool {
        let (w, b) = (idx / 64, idx % 64);
        let mask = 1u64 << b;
        let fresh = self.bits[w] & mask == 0;
        self.bits[w] |= mask;
        fresh
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::BitSet;

    #[test]
    fn insert_reports_first_visit_only() {
        let mut set = BitSet::new(130);
        assert_eq!(set.len(), 130);
        assert!(set.insert(129));
        assert!(!set.insert(129));
        assert!(set.test(129));
        assert!(!set.test(128));
        assert!(set.insert(0));
        assert_eq!(set.count_ones(), 2);
    }
}
