//! Per-dictionary and per-document capacity accounting.

use crate::bigint::{self, MAX_DICT_LEN};

/// Bits a dictionary with `n` permutable entries can carry.
///
/// `k(n) = bit_length(n!) - 1` for `n >= 2`, `0` otherwise. The `-1` is what
/// guarantees every `k`-bit value is `< n!` and therefore a valid rank.
pub fn available_bits(n: usize) -> usize {
    if n < 2 || n > MAX_DICT_LEN {
        return 0;
    }
    let fact = bigint::factorial(n);
    bigint::bit_length(&fact) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_n2_through_n8() {
        let expect = [0usize, 2, 4, 6, 9, 12, 15];
        for (i, &want) in expect.iter().enumerate() {
            let n = i + 2;
            assert_eq!(available_bits(n), want, "n={n}");
        }
    }

    #[test]
    fn below_two_entries_has_no_capacity() {
        assert_eq!(available_bits(0), 0);
        assert_eq!(available_bits(1), 0);
    }

    #[test]
    fn oversized_dictionary_reports_zero_capacity() {
        assert_eq!(available_bits(MAX_DICT_LEN + 1), 0);
    }
}
