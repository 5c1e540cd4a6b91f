//! Frequency-built Huffman tree.
//!
//! The tree is an arena of nodes. Construction uses a binary min-heap keyed by
//! `(weight, sequence number)`: leaves are numbered in ascending symbol order,
//! merged nodes continue the numbering in creation order, and the lower number
//! wins a weight tie. Because every node is pushed into the arena in exactly
//! that order, a node's arena index doubles as its sequence number.

use hzw_core::error::{HzwError, Result};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use tracing::trace;

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf {
        symbol: u16,
        weight: u64,
    },
    Internal {
        left: usize,
        right: usize,
        weight: u64,
    },
}

impl Node {
    fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }
}

/// An immutable Huffman tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a tree from symbol frequencies.
    ///
    /// The first node popped from the heap becomes the left child (bit 0),
    /// the second the right child (bit 1).
    ///
    /// # Errors
    ///
    /// [`HzwError::EmptyInput`] if `frequencies` is empty.
    pub fn from_frequencies(frequencies: &BTreeMap<u16, u64>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HzwError::EmptyInput);
        }

        let mut nodes = Vec::with_capacity(frequencies.len() * 2 - 1);
        let mut heap = BinaryHeap::with_capacity(frequencies.len());

        for (&symbol, &weight) in frequencies {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Leaf { symbol, weight });
        }

        let mut root = 0;
        while let Some(Reverse((left_weight, left))) = heap.pop() {
            let Some(Reverse((right_weight, right))) = heap.pop() else {
                root = left;
                break;
            };

            let weight = left_weight.saturating_add(right_weight);
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Internal {
                left,
                right,
                weight,
            });
        }

        trace!(leaves = frequencies.len(), nodes = nodes.len(), "built Huffman tree");

        Ok(Self { nodes, root })
    }

    /// Number of distinct symbols (leaves).
    pub fn symbol_count(&self) -> usize {
        self.nodes.len().div_ceil(2)
    }

    /// Sum of all leaf weights.
    pub fn total_weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Depth of every leaf, keyed by symbol.
    ///
    /// A tree holding a single symbol reports depth 1 for it, so that the
    /// symbol still gets a one-bit code.
    pub fn leaf_depths(&self) -> BTreeMap<u16, u32> {
        let mut depths = BTreeMap::new();
        let mut stack = vec![(self.root, 0u32)];

        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { symbol, .. } => {
                    depths.insert(symbol, depth.max(1));
                }
                Node::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }

        depths
    }

    /// Per-symbol code lengths, limited to `max_length` bits.
    ///
    /// Leaf depths are used unchanged when none exceeds `max_length`.
    /// Otherwise the length histogram is folded into `max_length` and
    /// rebalanced until the Kraft sum is exactly one again, and the lengths
    /// are handed out shortest-first in order of decreasing weight.
    ///
    /// # Errors
    ///
    /// [`HzwError::InvalidConfig`] if `max_length` is zero or too small to
    /// give every symbol a distinct code.
    pub fn code_lengths(&self, max_length: u8) -> Result<BTreeMap<u16, u8>> {
        let depths = self.leaf_depths();

        if max_length == 0 || max_length > 32 || (depths.len() as u64) > (1u64 << max_length) {
            return Err(HzwError::invalid_config(format!(
                "{} symbols cannot be coded in at most {} bits",
                depths.len(),
                max_length
            )));
        }

        let longest = depths.values().copied().max().unwrap_or(0);
        if longest <= u32::from(max_length) {
            return Ok(depths
                .into_iter()
                .map(|(symbol, depth)| (symbol, depth as u8))
                .collect());
        }

        trace!(longest, max_length, "limiting Huffman code lengths");

        let weights: BTreeMap<u16, u64> = self
            .nodes
            .iter()
            .filter_map(|node| match *node {
                Node::Leaf { symbol, weight } => Some((symbol, weight)),
                Node::Internal { .. } => None,
            })
            .collect();

        Ok(limit_lengths(&depths, &weights, max_length))
    }
}

/// Fold over-long depths into `max_length` and restore a complete code.
fn limit_lengths(
    depths: &BTreeMap<u16, u32>,
    weights: &BTreeMap<u16, u64>,
    max_length: u8,
) -> BTreeMap<u16, u8> {
    let max = usize::from(max_length);
    let mut bl_count = vec![0u64; max + 1];
    for &depth in depths.values() {
        bl_count[(depth as usize).min(max)] += 1;
    }

    // Kraft sum in units of 2^-max.
    let capacity = 1u64 << max;
    let mut total: u64 = (1..=max).map(|len| bl_count[len] << (max - len)).sum();

    // Each round drops one unit: one max-length code goes away, and a shorter
    // code splits into two codes one bit longer.
    while total > capacity {
        bl_count[max] -= 1;
        for len in (1..max).rev() {
            if bl_count[len] > 0 {
                bl_count[len] -= 1;
                bl_count[len + 1] += 2;
                break;
            }
        }
        total -= 1;
    }

    let mut order: Vec<(u16, u64, u32)> = depths
        .iter()
        .map(|(&symbol, &depth)| (symbol, weights.get(&symbol).copied().unwrap_or(0), depth))
        .collect();
    order.sort_by_key(|&(symbol, weight, depth)| (Reverse(weight), depth, symbol));

    let mut lengths = BTreeMap::new();
    let mut symbols = order.into_iter().map(|(symbol, _, _)| symbol);
    for len in 1..=max {
        for _ in 0..bl_count[len] {
            if let Some(symbol) = symbols.next() {
                lengths.insert(symbol, len as u8);
            }
        }
    }

    lengths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::count_frequencies;

    fn kraft_units(lengths: &BTreeMap<u16, u8>, max: u8) -> u64 {
        lengths.values().map(|&len| 1u64 << (max - len)).sum()
    }

    fn fibonacci_weights(count: u16) -> BTreeMap<u16, u64> {
        let (mut a, mut b) = (1u64, 1u64);
        (0..count)
            .map(|symbol| {
                let weight = a;
                (a, b) = (b, a + b);
                (symbol, weight)
            })
            .collect()
    }

    #[test]
    fn test_empty_alphabet() {
        assert!(matches!(
            HuffmanTree::from_frequencies(&BTreeMap::new()),
            Err(HzwError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_symbol() {
        let tree = HuffmanTree::from_frequencies(&count_frequencies(&[7, 7, 7])).unwrap();
        assert_eq!(tree.symbol_count(), 1);
        assert_eq!(tree.total_weight(), 3);
        assert_eq!(tree.leaf_depths()[&7], 1);
        assert_eq!(tree.code_lengths(24).unwrap()[&7], 1);
    }

    #[test]
    fn test_tie_break_by_sequence() {
        // a and b (weight 1) merge first; c (weight 2, leaf #2) beats the
        // merged node (weight 2, #3) and lands at depth 1.
        let freq = BTreeMap::from([(10, 1), (20, 1), (30, 2)]);
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let depths = tree.leaf_depths();
        assert_eq!(depths[&30], 1);
        assert_eq!(depths[&10], 2);
        assert_eq!(depths[&20], 2);
    }

    #[test]
    fn test_equal_weights_balanced() {
        let freq: BTreeMap<u16, u64> = (0..8).map(|s| (s, 5)).collect();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        assert!(tree.leaf_depths().values().all(|&d| d == 3));
        assert_eq!(tree.symbol_count(), 8);
    }

    #[test]
    fn test_full_tree_kraft() {
        let symbols: Vec<u16> = (0..5000u32).map(|i| ((i * i) % 301) as u16).collect();
        let tree = HuffmanTree::from_frequencies(&count_frequencies(&symbols)).unwrap();
        let lengths = tree.code_lengths(24).unwrap();
        assert_eq!(kraft_units(&lengths, 24), 1 << 24);
    }

    #[test]
    fn test_length_limiting() {
        let freq = fibonacci_weights(32);
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        assert!(tree.leaf_depths().values().any(|&d| d > 24));

        let lengths = tree.code_lengths(24).unwrap();
        assert_eq!(lengths.len(), 32);
        assert!(lengths.values().all(|&len| (1..=24).contains(&len)));
        assert_eq!(kraft_units(&lengths, 24), 1 << 24);

        // Heavier symbols never get longer codes than lighter ones.
        for (a, wa) in &freq {
            for (b, wb) in &freq {
                if wa > wb {
                    assert!(lengths[a] <= lengths[b]);
                }
            }
        }
    }

    #[test]
    fn test_length_limiting_tight() {
        let freq = fibonacci_weights(12);
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        let lengths = tree.code_lengths(4).unwrap();
        assert!(lengths.values().all(|&len| len <= 4));
        assert_eq!(kraft_units(&lengths, 4), 1 << 4);
    }

    #[test]
    fn test_length_limit_too_small() {
        let freq: BTreeMap<u16, u64> = (0..9).map(|s| (s, 1)).collect();
        let tree = HuffmanTree::from_frequencies(&freq).unwrap();
        assert!(matches!(
            tree.code_lengths(3),
            Err(HzwError::InvalidConfig { .. })
        ));
    }
}
