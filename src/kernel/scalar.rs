//! Byte-at-a-time reference kernels.

use super::FrequencyTable;

/// Count bytes equal to `target`.
#[inline]
pub fn count(content: &[u8], target: u8) -> usize {
    let mut total = 0;
    for &b in content {
        if b == target {
            total += 1;
        }
    }
    total
}

/// Tally every byte value in one pass.
pub fn frequency_table(content: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for &b in content {
        table.increment(b);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(count(b"aabbbcca", b'b'), 3);
        assert_eq!(count(b"aabbbcca", b'a'), 3);
        assert_eq!(count(b"aabbbcca", b'z'), 0);
        assert_eq!(count(b"", b'a'), 0);
    }

    #[test]
    fn test_frequency_table() {
        let table = frequency_table(b"aabbbcca");
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 3);
        assert_eq!(table.get(b'c'), 2);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 8);
    }
}
