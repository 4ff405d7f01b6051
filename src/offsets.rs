//! Offset-indexed bridging between the per-dictionary hooks and the
//! document-wide payload bitstream.
//!
//! The parser visits dictionaries in whatever order the document's bytes
//! put them, not in ascending offset order, so the decode side can't stream
//! bits straight to the payload sink as they're found. [`OffsetCollector`]
//! buffers a `(rank, k)` tuple per dictionary offset and flushes them in
//! ascending-offset order once parsing finishes.

use std::io;

use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::BTreeMap;

use crate::bitstream::BitSink;

/// Pulls exactly `k` bits from `source` and returns them as a big-integer
/// whose bit `i` equals the `i`-th bit read. If the source runs out
/// mid-pull, the remaining high bits are left 0 rather than erroring.
pub fn pull_integer<F>(mut next_bit: F, k: usize) -> io::Result<BigUint>
where
    F: FnMut() -> io::Result<Option<bool>>,
{
    let mut value = BigUint::zero();
    for i in 0..k {
        match next_bit()? {
            Some(true) => value.set_bit(i as u64, true),
            Some(false) => {}
            None => break,
        }
    }
    Ok(value)
}

/// Collects `(rank, k)` tuples keyed by the source byte offset of each
/// dictionary, then flushes them in ascending offset order — the order the
/// encode side pulled them in, even though the parser visits dictionaries in
/// a different order while reading. Kept separate from the bit sink itself
/// so the sink stays a plain append-only byte writer.
#[derive(Default)]
pub struct OffsetCollector {
    entries: BTreeMap<u64, (BigUint, usize)>,
}

impl OffsetCollector {
    pub fn new() -> Self {
        OffsetCollector {
            entries: BTreeMap::new(),
        }
    }

    /// Records the rank observed for the dictionary starting at `offset`.
    ///
    /// # Panics
    /// Panics if `offset` was already recorded: two dictionaries sharing a
    /// starting byte offset is a parser bug, not a recoverable error.
    pub fn record(&mut self, offset: u64, rank: BigUint, k: usize) {
        let prior = self.entries.insert(offset, (rank, k));
        assert!(
            prior.is_none(),
            "duplicate dictionary offset {offset} recorded by decode collector"
        );
    }

    /// Writes every recorded entry's bits, ascending by offset, LSB-first,
    /// into `sink`.
    pub fn flush<W: io::Write>(&self, sink: &mut BitSink<W>) -> io::Result<()> {
        for (rank, k) in self.entries.values() {
            for i in 0..*k {
                sink.push_bit(rank.bit(i as u64))?;
            }
        }
        sink.flush_byte()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitSource;
    use std::io::Cursor;

    #[test]
    fn pull_integer_reads_k_bits_lsb_first() {
        let mut src = BitSource::new(Cursor::new(vec![0b0000_0101u8]), Some(8));
        let value = pull_integer(|| src.next(), 3).unwrap();
        // bits read: 1,0,1 -> value = 1*2^0 + 0*2^1 + 1*2^2 = 5
        assert_eq!(value, BigUint::from(5u32));
    }

    #[test]
    fn pull_integer_zero_pads_on_early_eof() {
        let mut src = BitSource::new(Cursor::new(vec![0b0000_0001u8]), Some(8));
        // consume the single set bit, then ask for more than remains
        let value = pull_integer(|| src.next(), 16).unwrap();
        assert_eq!(value, BigUint::from(1u32));
    }

    #[test]
    fn collector_flushes_in_ascending_offset_order_regardless_of_insertion_order() {
        let mut collector = OffsetCollector::new();
        collector.record(200, BigUint::from(0b101u32), 3);
        collector.record(50, BigUint::from(0b11u32), 2);
        collector.record(120, BigUint::from(0b0u32), 1);

        let mut sink = BitSink::new(Vec::new());
        collector.flush(&mut sink).unwrap();
        let bytes = sink.into_inner();
        // order: offset 50 (2 bits: 1,1), offset 120 (1 bit: 0), offset 200 (3 bits: 1,0,1)
        // stream: 1,1,0,1,0,1 -> byte = 0b00_101011
        assert_eq!(bytes, vec![0b0010_1011]);
    }

    #[test]
    #[should_panic(expected = "duplicate dictionary offset")]
    fn collector_panics_on_duplicate_offset() {
        let mut collector = OffsetCollector::new();
        collector.record(10, BigUint::zero(), 1);
        collector.record(10, BigUint::zero(), 1);
    }
}
