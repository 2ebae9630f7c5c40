//! Buffer, kernel and statistics properties checked through the public API.

use lanecount::statistics::{median, trimmed_stats};
use lanecount::{generate, AlignedBuffer, CounterKernel, Error};

fn fixture() -> AlignedBuffer {
    // Content a,a,b,b,b,c,c,a followed by the zero sentinel.
    AlignedBuffer::from_content(b"aabbbcca", 16).expect("fixture allocates")
}

#[test]
fn alignment_holds_for_all_small_powers_of_two() {
    for alignment in [1usize, 2, 4, 8, 16, 32, 64] {
        for length in [16usize, 17, 63, 64, 1000, 4096] {
            let buf = generate(length, alignment, 7).unwrap();
            assert_eq!(
                buf.address() % alignment,
                0,
                "length {} alignment {}",
                length,
                alignment
            );
            assert_eq!(buf.len(), length);
            assert_eq!(buf.as_slice()[length - 1], 0, "sentinel missing");
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let a = generate(4096, 32, 1234).unwrap();
    let b = generate(4096, 32, 1234).unwrap();
    assert_eq!(a.as_slice(), b.as_slice());

    let c = generate(4096, 32, 1235).unwrap();
    assert_ne!(a.as_slice(), c.as_slice());
}

#[test]
fn determinism_does_not_depend_on_alignment() {
    let a = generate(512, 1, 99).unwrap();
    let b = generate(512, 64, 99).unwrap();
    assert_eq!(a.as_slice(), b.as_slice());
}

#[test]
fn non_power_of_two_alignment_is_rejected() {
    let err = generate(64, 3, 42).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }), "{:?}", err);
}

#[test]
fn kernels_count_fixture() {
    let buf = fixture();
    for kernel in CounterKernel::ALL {
        assert_eq!(kernel.count(&buf, b'b'), 3, "{}", kernel);
        assert_eq!(kernel.count(&buf, b'a'), 3, "{}", kernel);
        assert_eq!(kernel.count(&buf, b'z'), 0, "{}", kernel);
        // The sentinel is never counted.
        assert_eq!(kernel.count(&buf, 0), 0, "{}", kernel);
    }
}

#[test]
fn frequency_table_is_complete() {
    let buf = fixture();
    for kernel in CounterKernel::ALL {
        let table = kernel.frequency_table(&buf);
        assert_eq!(table.total(), 8);
        let entries: Vec<(u8, usize)> = table.iter().collect();
        assert_eq!(entries, vec![(b'a', 3), (b'b', 3), (b'c', 2)], "{}", kernel);
    }
}

#[test]
fn median_even_and_odd() {
    assert_eq!(median(&[2.0, 4.0, 6.0, 8.0]), 5.0);
    assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
}

#[test]
fn trimmed_statistics_drop_outlier() {
    let stats = trimmed_stats(&[10.0, 20.0, 15.0, 1000.0]);
    assert!((stats.mean - 17.5).abs() < 1e-12);
    assert!((stats.std_dev - 2.5).abs() < 1e-12);
}

#[test]
fn degenerate_statistics() {
    let stats = trimmed_stats(&[7.0, 9.0]);
    assert_eq!(stats.mean, 8.0);
    assert_eq!(stats.std_dev, 0.0);
}

#[test]
fn remainder_bytes_are_counted() {
    // 20 content bytes: one full 16-byte step plus a 4-byte tail.
    let buf = generate(21, 8, 5).unwrap();
    for target in 0..=255u8 {
        assert_eq!(
            CounterKernel::Scalar.count(&buf, target),
            CounterKernel::Vectorized.count(&buf, target),
            "target {}",
            target
        );
    }
    let tail = buf.content()[19];
    assert!(CounterKernel::Vectorized.count(&buf, tail) >= 1);
}

#[test]
fn free_releases_buffer() {
    let buf = generate(1024, 64, 1).unwrap();
    buf.free();
}
