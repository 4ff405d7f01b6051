//! Wires the PDF parser/writer to the permutation codec and moves payload
//! bytes to/from files or stdio.

use std::io::{self, Read, Write};

use num_bigint::BigUint;
use num_traits::Zero;

use crate::bitstream::{BitSink, BitSource};
use crate::capacity;
use crate::config::PDF_VERSION;
use crate::error::StegoError;
use crate::offsets::{pull_integer, OffsetCollector};
use crate::pdf::hooks::{DictDecodeHook, DictEncodeHook};
use crate::pdf::object::{split_pinned, Dictionary};
use crate::pdf::parser::parse_document;
use crate::pdf::writer::{write_document, write_name, write_value};
use crate::permute;

/// Source of payload bits handed to the encode hook: either a real
/// bit-by-bit reader over the user's payload, or a counter used by the
/// capacity probe, which needs to know how many bits *would* be
/// pulled without supplying real payload content.
enum EncodeBits<R: Read> {
    Real(BitSource<R>),
    Counting(u64),
}

impl<R: Read> EncodeBits<R> {
    fn pull(&mut self, k: usize) -> io::Result<BigUint> {
        match self {
            EncodeBits::Real(source) => pull_integer(|| source.next(), k),
            EncodeBits::Counting(bits) => {
                *bits += k as u64;
                Ok(BigUint::zero())
            }
        }
    }
}

/// The dictionary encode hook: for each dictionary, pulls `k` bits
/// from the payload source, unranks them against the sorted reference, and
/// writes the permuted entries. `/Type`, when present, is always written
/// first and is never permuted.
struct StegoEncodeHook<'a, R: Read> {
    bits: &'a mut EncodeBits<R>,
}

impl<R: Read> DictEncodeHook for StegoEncodeHook<'_, R> {
    fn on_dict_encode(&mut self, dict: &Dictionary, out: &mut dyn Write) -> io::Result<()> {
        let (type_entry, reference) = crate::pdf::object::effective_reference(dict);
        let n = reference.len();
        let k = capacity::available_bits(n);
        let rank = self.bits.pull(k)?;
        let permuted = if k > 0 {
            permute::unrank(&reference, &rank)
        } else {
            reference
        };

        write!(out, "<<")?;
        if let Some((name, value)) = type_entry {
            write!(out, " ")?;
            write_name(name, out)?;
            write!(out, " ")?;
            let mut nested: Option<&mut dyn DictEncodeHook> = Some(&mut *self);
            write_value(value, out, &mut nested)?;
        }
        for (name, value) in permuted {
            write!(out, " ")?;
            write_name(name, out)?;
            write!(out, " ")?;
            let mut nested: Option<&mut dyn DictEncodeHook> = Some(&mut *self);
            write_value(value, out, &mut nested)?;
        }
        write!(out, " >>")
    }
}

/// The dictionary decode hook: for each dictionary, ranks its
/// observed (parsed) order against the sorted reference and records
/// `(offset, rank, k)` for the collector to flush in ascending offset order
/// once parsing completes.
struct StegoDecodeHook<'a> {
    collector: &'a mut OffsetCollector,
}

impl DictDecodeHook for StegoDecodeHook<'_> {
    fn on_dict_decode(&mut self, offset: u64, entries: &Dictionary) {
        let (_type_entry, observed) = split_pinned(entries);
        let n = observed.len();
        let k = capacity::available_bits(n);
        if k == 0 {
            return;
        }
        let mut reference = observed.clone();
        reference.sort_by(|a, b| a.0.cmp(&b.0));
        let rank = permute::rank(&reference, &observed);
        self.collector.record(offset, rank, k);
    }
}

/// `write <input> <output> [payload]`. `payload` is read in full before
/// any output is produced, so a capacity overrun is reported before the
/// output file is touched.
pub fn write_hidden(
    input: &[u8],
    payload: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<(), StegoError> {
    let mut payload_bytes = Vec::new();
    payload
        .read_to_end(&mut payload_bytes)
        .map_err(|e| StegoError::io("read payload", e))?;

    let capacity_bits = probe_capacity_bits(input)?;
    let payload_bits = payload_bytes.len() as u64 * 8;
    if payload_bits > capacity_bits {
        return Err(StegoError::Capacity {
            available_bytes: capacity_bits / 8,
        });
    }

    let doc = parse_document(input, None)?;
    let cursor = io::Cursor::new(payload_bytes);
    let mut bits = EncodeBits::Real(BitSource::new(cursor, Some(payload_bits)));
    let mut hook = StegoEncodeHook { bits: &mut bits };
    write_document(&doc, out, Some(&mut hook), PDF_VERSION)
        .map_err(|e| StegoError::io("write output PDF", e))
}

/// `read <input> [output]`. Always emits `ceil(capacity_bits / 8)`
/// bytes, zero-padded in the final byte.
pub fn read_hidden(input: &[u8], out: &mut dyn Write) -> Result<(), StegoError> {
    let mut collector = OffsetCollector::new();
    {
        let mut hook = StegoDecodeHook {
            collector: &mut collector,
        };
        let _doc = parse_document(input, Some(&mut hook))?;
    }
    let mut sink = BitSink::new(out);
    collector
        .flush(&mut sink)
        .map_err(|e| StegoError::io("write extracted payload", e))
}

/// `capacity <input>`: the document's total capacity in bytes.
pub fn capacity_bytes(input: &[u8]) -> Result<u64, StegoError> {
    Ok(probe_capacity_bits(input)? / 8)
}

/// Runs a full write pass with a counting-only bit source, discards
/// the output bytes, and returns the total bits that would have been
/// pulled.
fn probe_capacity_bits(input: &[u8]) -> Result<u64, StegoError> {
    let doc = parse_document(input, None)?;
    let mut bits = EncodeBits::<io::Empty>::Counting(0);
    let mut hook = StegoEncodeHook { bits: &mut bits };
    let mut sink = io::sink();
    write_document(&doc, &mut sink, Some(&mut hook), PDF_VERSION)
        .map_err(|e| StegoError::io("probe PDF capacity", e))?;
    match bits {
        EncodeBits::Counting(total) => Ok(total),
        EncodeBits::Real(_) => unreachable!("probe always uses a counting source"),
    }
}
