//! Huffman encoder
//!
//! Frequency pass, tree construction, tree serialization, then the
//! code bitstream. Serialization is where the work is: every
//! internal node byte stores a 6-bit offset to its child pair, so the
//! node ordering must keep each parent within [`MAX_NODE_OFFSET`]
//! pairs of its children.
//!
//! For the 4-bit alphabet a breadth-first ordering cannot overflow
//! the field (at most 15 internal nodes). The 8-bit alphabet can
//! carry up to 255 internal nodes, where wide trees break
//! breadth-first ordering, so it uses an insertion layout instead:
//! nodes whose children are both leaves impose no forward constraint
//! and sink as far right as possible (deepest first), every other
//! node is inserted as far left as its children allow the moment all
//! its placed children exist, pushing occupants right when a window
//! is full. A final pass re-validates every emitted offset.

use log::debug;
use ntr_core::bytestream::ByteWriter;
use ntr_core::errors::EncodeErrors;

use crate::bitstream::BitWriter32;
use crate::tree::{HuffTree, NodeId, NodeKind};
use crate::{BlockSize, MAX_ENCODE_LENGTH, MAX_NODE_OFFSET};

/// Serialized node slots; enough for the 511 nodes of a full 8-bit
/// tree.
const SLOT_COUNT: usize = 511;

/// Backstop for the layout loop; hitting it means the insertion
/// strategy failed to converge, which gets reported instead of
/// looping.
const MAX_SHIFTS: usize = 1 << 20;

/// Encoder for the Huffman format.
pub struct HuffEncoder<'a>
{
    data:       &'a [u8],
    block_size: BlockSize
}

impl<'a> HuffEncoder<'a>
{
    /// Create a new encoder for the given input and symbol width.
    pub const fn new(data: &'a [u8], block_size: BlockSize) -> HuffEncoder<'a>
    {
        HuffEncoder { data, block_size }
    }

    /// Compress the input, returning the encoded stream.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeErrors>
    {
        if self.data.len() > MAX_ENCODE_LENGTH
        {
            return Err(EncodeErrors::InputTooLarge(
                self.data.len(),
                MAX_ENCODE_LENGTH
            ));
        }

        let mut freqs = vec![0_u32; self.block_size.alphabet_size()];

        match self.block_size
        {
            BlockSize::Four =>
            {
                for byte in self.data
                {
                    freqs[usize::from(byte >> 4)] += 1;
                    freqs[usize::from(byte & 0xF)] += 1;
                }
            }
            BlockSize::Eight =>
            {
                for byte in self.data
                {
                    freqs[usize::from(*byte)] += 1;
                }
            }
        }

        let tree = HuffTree::from_frequencies(&freqs);
        let codes = tree.codes();

        let order = match self.block_size
        {
            BlockSize::Four => tree.internal_bfs(),
            BlockSize::Eight => packed_layout(&tree)?
        };

        let index = validate_layout(&tree, &order)?;

        // exact output size: header, table, bit stream words
        let table_bytes = 2 + 2 * order.len();
        let mut bits = 0_usize;
        for (symbol, freq) in freqs.iter().enumerate()
        {
            bits += *freq as usize * usize::from(codes[symbol].1);
        }
        let total = 8 + table_bytes + bits.div_ceil(32) * 4;

        let mut buffer = vec![0_u8; total];
        let mut stream = ByteWriter::new(&mut buffer);

        stream.write_u8(self.block_size.magic());

        if self.data.is_empty()
        {
            stream.write_u24_le(0);
            stream.write_u32_le(0);
        }
        else
        {
            stream.write_u24_le(self.data.len() as u32);
        }

        stream.write_u8(order.len() as u8);
        stream.write_u8(node_byte(&tree, tree.root(), index[tree.root()]));

        for (i, id) in order.iter().enumerate()
        {
            let NodeKind::Internal(child0, child1) = tree.node(*id).kind
            else
            {
                unreachable!("layout orders internal nodes only")
            };

            for child in [child0, child1]
            {
                match tree.node(child).kind
                {
                    NodeKind::Leaf(symbol) => stream.write_u8(symbol),
                    NodeKind::Internal(..) =>
                    {
                        stream.write_u8(node_byte(&tree, child, index[child] - i - 1));
                    }
                }
            }
        }

        let mut bit_writer = BitWriter32::new();

        match self.block_size
        {
            BlockSize::Four =>
            {
                for byte in self.data
                {
                    let (code, length) = codes[usize::from(byte >> 4)];
                    bit_writer.push(&mut stream, code, length);
                    let (code, length) = codes[usize::from(byte & 0xF)];
                    bit_writer.push(&mut stream, code, length);
                }
            }
            BlockSize::Eight =>
            {
                for byte in self.data
                {
                    let (code, length) = codes[usize::from(*byte)];
                    bit_writer.push(&mut stream, code, length);
                }
            }
        }
        bit_writer.flush(&mut stream);

        let written = stream.position();
        debug!(
            "Huffman: compressed {} bytes into {written} ({} tree nodes)",
            self.data.len(),
            order.len() * 2 + 1
        );
        buffer.truncate(written);

        Ok(buffer)
    }
}

/// Build the byte of an internal node: the child-pair offset plus the
/// two child-is-leaf flags.
fn node_byte(tree: &HuffTree, id: NodeId, offset: usize) -> u8
{
    let NodeKind::Internal(child0, child1) = tree.node(id).kind
    else
    {
        unreachable!("leaf bytes carry the symbol")
    };

    let mut byte = offset as u8;

    if tree.node(child0).is_leaf()
    {
        byte |= 0x80;
    }
    if tree.node(child1).is_leaf()
    {
        byte |= 0x40;
    }
    byte
}

/// Map every ordered node to its pair index and check the offset
/// invariant the serialized form relies on.
fn validate_layout(tree: &HuffTree, order: &[NodeId]) -> Result<Vec<usize>, EncodeErrors>
{
    let mut index = vec![usize::MAX; tree.len()];

    for (i, id) in order.iter().enumerate()
    {
        index[*id] = i;
    }

    if index[tree.root()] > MAX_NODE_OFFSET
    {
        return Err(EncodeErrors::GenericStr(format!(
            "tree layout placed the root at pair {}, past the addressable range",
            index[tree.root()]
        )));
    }

    for id in order
    {
        let NodeKind::Internal(child0, child1) = tree.node(*id).kind
        else
        {
            continue;
        };

        for child in [child0, child1]
        {
            if tree.node(child).is_leaf()
            {
                continue;
            }
            if index[child] <= index[*id]
            {
                return Err(EncodeErrors::Generic(
                    "tree layout ordered a child before its parent"
                ));
            }
            let offset = index[child] - index[*id] - 1;

            if offset > MAX_NODE_OFFSET
            {
                return Err(EncodeErrors::GenericStr(format!(
                    "tree layout put a child {offset} pairs from its parent, past the 6-bit offset"
                )));
            }
        }
    }

    Ok(index)
}

/// Offset-bounded insertion layout for 8-bit trees.
fn packed_layout(tree: &HuffTree) -> Result<Vec<NodeId>, EncodeErrors>
{
    let mut layout = Layout {
        tree,
        slots: vec![None; SLOT_COUNT],
        pos: vec![None; tree.len()],
        shifts: 0
    };

    // deepest leaf-stems first, each settling as far right as
    // possible, pulling their ancestors in behind them
    let stems: Vec<NodeId> = tree
        .internal_bfs()
        .into_iter()
        .rev()
        .filter(|id| tree.is_leaf_stem(*id))
        .collect();

    for stem in stems
    {
        let idx = layout.rightmost_free();
        layout.place(stem, idx);
        layout.settle_ancestors(stem)?;
    }

    let order: Vec<NodeId> = layout.slots.iter().filter_map(|slot| *slot).collect();

    if order.len() != tree.internal_count()
    {
        return Err(EncodeErrors::Generic(
            "tree layout failed to place every internal node"
        ));
    }

    Ok(order)
}

struct Layout<'t>
{
    tree:   &'t HuffTree,
    slots:  Vec<Option<NodeId>>,
    pos:    Vec<Option<usize>>,
    shifts: usize
}

impl<'t> Layout<'t>
{
    fn place(&mut self, id: NodeId, idx: usize)
    {
        self.slots[idx] = Some(id);
        self.pos[id] = Some(idx);
    }
    fn rightmost_free(&self) -> usize
    {
        self.slots
            .iter()
            .rposition(|slot| slot.is_none())
            .expect("a full tree occupies barely half the slots")
    }
    fn first_free_in(&self, lo: usize, hi: usize) -> Option<usize>
    {
        (lo..=hi).find(|idx| self.slots[*idx].is_none())
    }
    /// Positions of the placed internal children of `id`.
    fn child_window(&self, id: NodeId) -> (usize, usize)
    {
        let NodeKind::Internal(child0, child1) = self.tree.node(id).kind
        else
        {
            unreachable!("only internal nodes are laid out")
        };

        let mut lowest = usize::MAX;
        let mut highest = 0;

        for child in [child0, child1]
        {
            if let Some(idx) = self.pos[child]
            {
                lowest = lowest.min(idx);
                highest = highest.max(idx);
            }
        }
        (lowest, highest)
    }
    /// Place `id`, whose placed children already exist, as far left
    /// as the offset bound allows, making room if there is none.
    fn insert(&mut self, id: NodeId) -> Result<(), EncodeErrors>
    {
        loop
        {
            let (cmin, cmax) = self.child_window(id);
            let lo = cmax.saturating_sub(MAX_NODE_OFFSET + 1);

            // the window can be empty (children too far apart) or
            // fully occupied; either way pushing the leftmost child
            // right opens it up
            if cmin == 0
            {
                self.shift_right(cmin)?;
                continue;
            }
            let hi = cmin - 1;

            if lo > hi
            {
                self.shift_right(cmin)?;
                continue;
            }

            match self.first_free_in(lo, hi)
            {
                Some(idx) =>
                {
                    self.place(id, idx);
                    return Ok(());
                }
                None => self.shift_right(cmin)?
            }
        }
    }
    /// Walk up from a just-placed node, inserting every parent whose
    /// children are all accounted for and re-inserting any placed
    /// parent that fell out of range.
    fn settle_ancestors(&mut self, from: NodeId) -> Result<(), EncodeErrors>
    {
        let mut id = from;

        loop
        {
            let Some(parent) = self.tree.node(id).parent
            else
            {
                return Ok(());
            };

            match self.pos[parent]
            {
                Some(parent_idx) =>
                {
                    let idx = self.pos[id].expect("settle starts from a placed node");

                    if idx > parent_idx && idx - parent_idx - 1 <= MAX_NODE_OFFSET
                    {
                        return Ok(());
                    }
                    // the child drifted out of the parent's reach;
                    // the parent moves, never the child
                    self.slots[parent_idx] = None;
                    self.pos[parent] = None;
                    self.insert(parent)?;
                }
                None =>
                {
                    if !self.children_placed(parent)
                    {
                        return Ok(());
                    }
                    self.insert(parent)?;
                }
            }
            id = parent;
        }
    }
    /// Walk up from a moved node re-inserting placed parents the move
    /// pushed out of range. Unplaced parents are left alone: they
    /// belong to the stem loop, and inserting them here could race an
    /// insertion already in progress further up the stack.
    fn repair_ancestors(&mut self, from: NodeId) -> Result<(), EncodeErrors>
    {
        let mut id = from;

        loop
        {
            let Some(parent) = self.tree.node(id).parent
            else
            {
                return Ok(());
            };
            let Some(parent_idx) = self.pos[parent]
            else
            {
                return Ok(());
            };
            let idx = self.pos[id].expect("repair starts from a placed node");

            if idx > parent_idx && idx - parent_idx - 1 <= MAX_NODE_OFFSET
            {
                return Ok(());
            }
            self.slots[parent_idx] = None;
            self.pos[parent] = None;
            self.insert(parent)?;
            id = parent;
        }
    }
    fn children_placed(&self, id: NodeId) -> bool
    {
        let NodeKind::Internal(child0, child1) = self.tree.node(id).kind
        else
        {
            return true;
        };

        [child0, child1]
            .into_iter()
            .all(|child| self.tree.node(child).is_leaf() || self.pos[child].is_some())
    }
    /// Move the occupied run starting at `idx` one slot right, then
    /// re-settle every moved node so ancestor offsets stay in range.
    fn shift_right(&mut self, idx: usize) -> Result<(), EncodeErrors>
    {
        self.shifts += 1;
        if self.shifts > MAX_SHIFTS
        {
            return Err(EncodeErrors::Generic(
                "tree layout did not converge"
            ));
        }

        let free = (idx + 1..SLOT_COUNT)
            .find(|q| self.slots[*q].is_none())
            .ok_or(EncodeErrors::Generic("tree layout ran out of slots"))?;

        let mut moved = Vec::with_capacity(free - idx);

        for q in (idx + 1..=free).rev()
        {
            self.slots[q] = self.slots[q - 1];
            if let Some(node) = self.slots[q]
            {
                self.pos[node] = Some(q);
                moved.push(node);
            }
        }
        self.slots[idx] = None;

        for node in moved
        {
            self.repair_ancestors(node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use nanorand::{Rng, WyRand};

    use super::HuffEncoder;
    use crate::decoder::HuffDecoder;
    use crate::tree::HuffTree;
    use crate::{BlockSize, MAX_NODE_OFFSET};

    fn roundtrip(data: &[u8], block_size: BlockSize)
    {
        let packed = HuffEncoder::new(data, block_size).encode().unwrap();
        let out = HuffDecoder::new(&packed, block_size).decode().unwrap();
        assert_eq!(out, data, "round trip failed for {block_size:?}");
    }

    #[test]
    fn text_round_trips_in_both_widths()
    {
        let data = b"the rain in spain falls mainly on the plain";
        roundtrip(data, BlockSize::Four);
        roundtrip(data, BlockSize::Eight);
    }

    #[test]
    fn empty_input_round_trips()
    {
        roundtrip(&[], BlockSize::Four);
        roundtrip(&[], BlockSize::Eight);
    }

    #[test]
    fn single_symbol_round_trips()
    {
        roundtrip(&[0x41; 257], BlockSize::Four);
        roundtrip(&[0x41; 257], BlockSize::Eight);
    }

    #[test]
    fn full_alphabet_round_trips()
    {
        let data: Vec<u8> = (0..=255).collect();
        roundtrip(&data, BlockSize::Eight);
        roundtrip(&data, BlockSize::Four);
    }

    #[test]
    fn skewed_full_alphabet_round_trips()
    {
        // every byte value present with wildly uneven counts, which
        // builds a deep lopsided 256-leaf tree
        let mut data = Vec::new();
        for value in 0..=255_u16
        {
            let count = 1 + (value * value) % 1031;
            data.extend(std::iter::repeat(value as u8).take(usize::from(count)));
        }
        roundtrip(&data, BlockSize::Eight);
    }

    #[test]
    fn random_data_round_trips()
    {
        let mut rng = WyRand::new_seed(0x2428);
        for size in [1_usize, 2, 255, 256, 257, 4095, 4096, 4097]
        {
            let mut data = vec![0_u8; size];
            rng.fill(&mut data);
            roundtrip(&data, BlockSize::Eight);
            roundtrip(&data, BlockSize::Four);
        }
    }

    #[test]
    fn packed_layout_respects_the_offset_bound()
    {
        let mut freqs = vec![0_u32; 256];
        for (symbol, freq) in freqs.iter_mut().enumerate()
        {
            *freq = 1 + (symbol as u32 * 37) % 101;
        }
        let tree = HuffTree::from_frequencies(&freqs);
        let order = super::packed_layout(&tree).unwrap();
        let index = super::validate_layout(&tree, &order).unwrap();

        // validate_layout already checks; spot-check the bound here
        // so the property is asserted even if validation changes
        for id in &order
        {
            if let crate::tree::NodeKind::Internal(a, b) = tree.node(*id).kind
            {
                for child in [a, b]
                {
                    if !tree.node(child).is_leaf()
                    {
                        assert!(index[child] - index[*id] - 1 <= MAX_NODE_OFFSET);
                    }
                }
            }
        }
    }
}
