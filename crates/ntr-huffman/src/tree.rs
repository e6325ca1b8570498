//! Huffman tree arena
//!
//! Nodes live in one flat `Vec` and refer to each other by index, so
//! there are no ownership cycles to manage: children are index pairs
//! and the parent index exists only because the encoder's layout pass
//! walks upwards.

use crate::pqueue::ReversePriorityQueue;

/// Index of a node inside its [`HuffTree`] arena.
pub type NodeId = usize;

/// What a node is.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NodeKind
{
    /// A data symbol.
    Leaf(u8),
    /// Two children, taken on a 0 and a 1 bit respectively.
    Internal(NodeId, NodeId)
}

/// One arena slot.
#[derive(Copy, Clone, Debug)]
pub struct HuffNode
{
    pub kind:   NodeKind,
    pub parent: Option<NodeId>,
    /// Code length of the symbol for leaves, distance from the root
    /// otherwise.
    pub depth:  u8
}

impl HuffNode
{
    pub const fn is_leaf(&self) -> bool
    {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// A Huffman code tree built from symbol frequencies.
pub struct HuffTree
{
    nodes: Vec<HuffNode>,
    root:  NodeId
}

impl HuffTree
{
    /// Build the code tree for the given frequency table, one entry
    /// per symbol value.
    ///
    /// Two reverse priority queues drive construction, one holding
    /// unattached leaves and one holding built internal nodes. The
    /// two cheapest nodes combine until a single root remains; on
    /// priority ties the leaf queue wins, which is what pushes rare
    /// symbols to the deepest codes.
    ///
    /// Symbols that never occur get no leaf. Fewer than two occurring
    /// symbols get dummy zero-frequency leaves so the root always has
    /// two children, which the serialized form requires.
    pub fn from_frequencies(freqs: &[u32]) -> HuffTree
    {
        let mut nodes = Vec::new();
        let mut leaves = ReversePriorityQueue::new();
        let mut internals = ReversePriorityQueue::new();

        for (symbol, freq) in freqs.iter().enumerate()
        {
            if *freq > 0
            {
                let id = nodes.len();
                nodes.push(HuffNode {
                    kind:   NodeKind::Leaf(symbol as u8),
                    parent: None,
                    depth:  0
                });
                leaves.enqueue(*freq, id);
            }
        }

        // pad degenerate alphabets up to two leaves
        let mut dummy = 0_u8;
        while leaves.len() < 2
        {
            while freqs.get(usize::from(dummy)).is_some_and(|f| *f > 0)
            {
                dummy += 1;
            }
            let id = nodes.len();
            nodes.push(HuffNode {
                kind:   NodeKind::Leaf(dummy),
                parent: None,
                depth:  0
            });
            leaves.enqueue(0, id);
            dummy += 1;
        }

        while leaves.len() + internals.len() > 1
        {
            let (p0, child0) = pop_cheapest(&mut leaves, &mut internals);
            let (p1, child1) = pop_cheapest(&mut leaves, &mut internals);

            let id = nodes.len();
            nodes.push(HuffNode {
                kind:   NodeKind::Internal(child0, child1),
                parent: None,
                depth:  0
            });
            nodes[child0].parent = Some(id);
            nodes[child1].parent = Some(id);

            internals.enqueue(p0 + p1, id);
        }

        let root = internals
            .dequeue()
            .or_else(|| leaves.dequeue())
            .map(|(_, id)| id)
            .expect("at least two leaves were queued");

        let mut tree = HuffTree { nodes, root };
        tree.assign_depths();
        tree
    }

    /// Top-down pass setting every node's distance from the root.
    fn assign_depths(&mut self)
    {
        let mut stack = vec![(self.root, 0_u8)];

        while let Some((id, depth)) = stack.pop()
        {
            self.nodes[id].depth = depth;

            if let NodeKind::Internal(child0, child1) = self.nodes[id].kind
            {
                stack.push((child0, depth + 1));
                stack.push((child1, depth + 1));
            }
        }
    }

    pub fn root(&self) -> NodeId
    {
        self.root
    }
    pub fn node(&self, id: NodeId) -> &HuffNode
    {
        &self.nodes[id]
    }
    pub fn len(&self) -> usize
    {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool
    {
        self.nodes.is_empty()
    }
    /// Number of internal nodes.
    pub fn internal_count(&self) -> usize
    {
        self.nodes.iter().filter(|n| !n.is_leaf()).count()
    }
    /// Return true if both children of `id` are leaves.
    pub fn is_leaf_stem(&self, id: NodeId) -> bool
    {
        match self.nodes[id].kind
        {
            NodeKind::Internal(child0, child1) =>
            {
                self.nodes[child0].is_leaf() && self.nodes[child1].is_leaf()
            }
            NodeKind::Leaf(_) => false
        }
    }
    /// Internal nodes in breadth-first order, root first.
    pub fn internal_bfs(&self) -> Vec<NodeId>
    {
        let mut order = Vec::with_capacity(self.internal_count());
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(self.root);

        while let Some(id) = queue.pop_front()
        {
            if let NodeKind::Internal(child0, child1) = self.nodes[id].kind
            {
                order.push(id);
                queue.push_back(child0);
                queue.push_back(child1);
            }
        }
        order
    }
    /// The `(code, length)` pair of every symbol, indexed by symbol
    /// value. Symbols without a leaf keep a zero length.
    ///
    /// Codes follow the tree paths: child 0 is a 0 bit, child 1 a 1
    /// bit, first branch in the most significant position.
    pub fn codes(&self) -> Vec<(u64, u8)>
    {
        let mut codes = vec![(0, 0); 256];
        let mut stack = vec![(self.root, 0_u64, 0_u8)];

        while let Some((id, code, length)) = stack.pop()
        {
            match self.nodes[id].kind
            {
                NodeKind::Leaf(symbol) =>
                {
                    codes[usize::from(symbol)] = (code, length);
                }
                NodeKind::Internal(child0, child1) =>
                {
                    stack.push((child0, code << 1, length + 1));
                    stack.push((child1, (code << 1) | 1, length + 1));
                }
            }
        }
        codes
    }
}

fn pop_cheapest(
    leaves: &mut ReversePriorityQueue<NodeId>, internals: &mut ReversePriorityQueue<NodeId>
) -> (u32, NodeId)
{
    let take_leaf = match (leaves.peek(), internals.peek())
    {
        (Some((leaf_priority, _)), Some((internal_priority, _))) =>
        {
            leaf_priority <= internal_priority
        }
        (Some(_), None) => true,
        (None, _) => false
    };

    if take_leaf
    {
        leaves.dequeue().unwrap()
    }
    else
    {
        internals.dequeue().unwrap()
    }
}

#[cfg(test)]
mod tests
{
    use super::{HuffTree, NodeKind};

    #[test]
    fn frequent_symbols_get_short_codes()
    {
        let mut freqs = vec![0_u32; 256];
        freqs[b'a' as usize] = 100;
        freqs[b'b' as usize] = 10;
        freqs[b'c' as usize] = 10;
        freqs[b'd' as usize] = 1;

        let tree = HuffTree::from_frequencies(&freqs);
        let codes = tree.codes();

        assert!(codes[b'a' as usize].1 <= codes[b'b' as usize].1);
        assert!(codes[b'b' as usize].1 <= codes[b'd' as usize].1);
    }

    #[test]
    fn codes_are_prefix_free()
    {
        let mut freqs = vec![0_u32; 16];
        for (i, f) in freqs.iter_mut().enumerate()
        {
            *f = (i as u32 + 1) * 7 % 13 + 1;
        }

        let tree = HuffTree::from_frequencies(&freqs);
        let codes: Vec<_> = tree
            .codes()
            .into_iter()
            .filter(|(_, length)| *length > 0)
            .collect();

        for (i, (code_a, len_a)) in codes.iter().enumerate()
        {
            for (code_b, len_b) in codes.iter().skip(i + 1)
            {
                let shift = len_a.abs_diff(*len_b);
                let (short, long) = if len_a < len_b
                {
                    (*code_a, *code_b)
                }
                else
                {
                    (*code_b, *code_a)
                };
                assert_ne!(short, long >> shift, "one code prefixes another");
            }
        }
    }

    #[test]
    fn single_symbol_gets_a_sibling()
    {
        let mut freqs = vec![0_u32; 256];
        freqs[0x41] = 9;

        let tree = HuffTree::from_frequencies(&freqs);

        match tree.node(tree.root()).kind
        {
            NodeKind::Internal(child0, child1) =>
            {
                assert!(tree.node(child0).is_leaf());
                assert!(tree.node(child1).is_leaf());
            }
            NodeKind::Leaf(_) => panic!("root must be internal")
        }
        assert_eq!(tree.codes()[0x41].1, 1);
    }

    #[test]
    fn empty_alphabet_still_builds_a_pair()
    {
        let tree = HuffTree::from_frequencies(&[0; 16]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.internal_count(), 1);
    }
}
