//! Symbol frequency counting.

use std::collections::BTreeMap;

/// Count how often each symbol occurs.
///
/// The map is ordered by symbol, which is the order the tree builder uses to
/// number leaves.
pub fn count_frequencies(symbols: &[u16]) -> BTreeMap<u16, u64> {
    let mut frequencies = BTreeMap::new();
    for &symbol in symbols {
        *frequencies.entry(symbol).or_insert(0) += 1;
    }
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_frequencies() {
        let freq = count_frequencies(&[3, 1, 3, 300, 3, 1]);
        assert_eq!(freq.len(), 3);
        assert_eq!(freq[&1], 2);
        assert_eq!(freq[&3], 3);
        assert_eq!(freq[&300], 1);
        assert_eq!(freq.keys().copied().collect::<Vec<_>>(), vec![1, 3, 300]);
    }

    #[test]
    fn test_count_empty() {
        assert!(count_frequencies(&[]).is_empty());
    }
}
