//! Sliding-window match search and block selection
//!
//! Both forward encoders drive the same two routines: a longest-match
//! scan over the window behind the cursor, and an exhaustive
//! backwards dynamic program that picks the cheapest block sequence
//! for the whole input given each format's block costs.

/// One block cost tier of a format: matches up to `max_len` bytes
/// long cost `bits` bits (flag bit included).
#[derive(Copy, Clone, Debug)]
pub struct MatchCost
{
    pub max_len: usize,
    pub bits:    u32
}

/// One selected block: a literal when `length == 1`, otherwise a
/// back-reference of `length` bytes at displacement `disp`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParseStep
{
    pub length: usize,
    pub disp:   usize
}

impl ParseStep
{
    pub const fn literal() -> ParseStep
    {
        ParseStep {
            length: 1,
            disp:   0
        }
    }
    pub const fn is_literal(&self) -> bool
    {
        self.length == 1
    }
}

/// Find the longest match for `data[pos..]` inside the window behind
/// `pos`.
///
/// Displacements are scanned from the smallest up and a candidate only
/// replaces the current best when strictly longer, so equal-length
/// matches keep the smallest displacement.
///
/// The match may run past `pos` into the bytes being matched: the
/// decoder replays its own output, so a source overlapping the
/// destination repeats the pattern between them.
///
/// # Returns
/// `(length, displacement)`, with a length of zero when the window is
/// empty.
pub fn longest_match(
    data: &[u8], pos: usize, min_disp: usize, max_disp: usize, max_len: usize
) -> (usize, usize)
{
    let cap = max_len.min(data.len() - pos);
    let window = pos.min(max_disp);

    let mut best_len = 0;
    let mut best_disp = 0;

    for disp in min_disp..=window
    {
        let start = pos - disp;
        let mut length = 0;

        while length < cap && data[start + length] == data[pos + length]
        {
            length += 1;
        }

        if length > best_len
        {
            best_len = length;
            best_disp = disp;

            if best_len == cap
            {
                break;
            }
        }
    }

    (best_len, best_disp)
}

/// Select the cheapest block sequence for the whole input.
///
/// Walks the input back to front computing the minimal bit cost of
/// encoding every suffix, where a literal costs `literal_bits` and a
/// match costs the bits of the first tier whose `max_len` admits it.
/// On equal cost the longer match wins.
///
/// # Returns
/// One [`ParseStep`] per input position; consumers start at position
/// zero and jump by each step's length.
pub fn optimal_parse(
    data: &[u8], min_match: usize, min_disp: usize, max_disp: usize, tiers: &[MatchCost],
    literal_bits: u32
) -> Vec<ParseStep>
{
    let n = data.len();
    let max_len = tiers.last().map_or(0, |t| t.max_len);

    let mut costs = vec![0_u64; n + 1];
    let mut steps = vec![ParseStep::literal(); n];

    for i in (0..n).rev()
    {
        let mut best_cost = costs[i + 1] + u64::from(literal_bits);
        let mut best_step = ParseStep::literal();

        let (mlen, mdisp) = longest_match(data, i, min_disp, max_disp, max_len);

        if mlen >= min_match
        {
            // a match of mlen bytes also serves every shorter length
            // at the same displacement
            for length in min_match..=mlen
            {
                let bits = cost_of(length, tiers);
                let cost = costs[i + length] + u64::from(bits);

                if cost <= best_cost
                {
                    best_cost = cost;
                    best_step = ParseStep {
                        length,
                        disp: mdisp
                    };
                }
            }
        }

        costs[i] = best_cost;
        steps[i] = best_step;
    }

    steps
}

#[inline]
fn cost_of(length: usize, tiers: &[MatchCost]) -> u32
{
    for tier in tiers
    {
        if length <= tier.max_len
        {
            return tier.bits;
        }
    }
    // lengths beyond the last tier cannot be emitted; the search cap
    // prevents them from being proposed
    unreachable!("match length {length} beyond the longest cost tier")
}

#[cfg(test)]
mod tests
{
    use super::{longest_match, optimal_parse, MatchCost};

    #[test]
    fn empty_window_finds_nothing()
    {
        let data = b"abcabc";
        assert_eq!(longest_match(data, 0, 1, 0x1000, 18), (0, 0));
    }

    #[test]
    fn equal_lengths_keep_smallest_displacement()
    {
        // "ab" occurs at 0 and 2; matching at 4 should pick disp 2
        let data = b"ababab";
        assert_eq!(longest_match(data, 4, 1, 0x1000, 2), (2, 2));
    }

    #[test]
    fn pattern_run_crosses_the_cursor()
    {
        let data = b"aaaaaaaa";
        let (len, disp) = longest_match(data, 1, 1, 0x1000, 18);
        assert_eq!(disp, 1);
        assert_eq!(len, 7);
    }

    #[test]
    fn parse_prefers_one_long_match_over_two_short()
    {
        let tiers = [MatchCost {
            max_len: 18,
            bits:    17
        }];
        let data = b"abcdefabcdefabcdef";
        let steps = optimal_parse(data, 3, 1, 0x1000, &tiers, 9);

        // six literals then one 12-byte match at disp 6
        assert!(steps[..6].iter().all(|s| s.is_literal()));
        assert_eq!(steps[6].length, 12);
        assert_eq!(steps[6].disp, 6);
    }
}
