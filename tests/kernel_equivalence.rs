//! Randomized scalar/vectorized equivalence over many shapes of input.

use lanecount::buffer::{content_rng, generate_with_mode};
use lanecount::kernel::{scalar, vectorized};
use lanecount::validation::cross_check;
use lanecount::{AlignedBuffer, ContentMode, CounterKernel};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[test]
fn random_slices_agree_at_every_offset() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5eed);
    let data: Vec<u8> = (0..512).map(|_| rng.random()).collect();

    // Unaligned starts and every tail length up to two lanes.
    for start in 0..17 {
        for len in 0..48 {
            let slice = &data[start..start + len];
            for &target in &[data[start], 0u8, 0xFF, 0x80, b'a'] {
                assert_eq!(
                    scalar::count(slice, target),
                    vectorized::count(slice, target),
                    "start {} len {} target {}",
                    start,
                    len,
                    target
                );
            }
        }
    }
}

#[test]
fn all_content_modes_cross_check() {
    let modes = [
        ContentMode::Printable,
        ContentMode::Mixed,
        ContentMode::Biased {
            target: b'e',
            frequency: 0.3,
        },
        ContentMode::Biased {
            target: 0xC3,
            frequency: 1.0,
        },
    ];
    for (i, mode) in modes.into_iter().enumerate() {
        for alignment in [1, 16, 64] {
            let mut rng = content_rng(i as u32);
            let buf = generate_with_mode(3001, alignment, mode, &mut rng).unwrap();
            assert!(cross_check(&buf, None).is_ok(), "{:?}", mode);
            assert!(cross_check(&buf, Some(b'e')).is_ok(), "{:?}", mode);
        }
    }
}

#[test]
fn fully_biased_buffer_counts_every_byte() {
    let mut rng = content_rng(3);
    let mode = ContentMode::Biased {
        target: b'x',
        frequency: 1.0,
    };
    let buf = generate_with_mode(1025, 16, mode, &mut rng).unwrap();
    for kernel in CounterKernel::ALL {
        assert_eq!(kernel.count(&buf, b'x'), 1024);
        assert_eq!(kernel.frequency_table(&buf).distinct(), 1);
    }
}

#[test]
fn high_bytes_are_not_sign_confused() {
    let content: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let buf = AlignedBuffer::from_content(&content, 32).unwrap();
    let s = CounterKernel::Scalar.frequency_table(&buf);
    let v = CounterKernel::Vectorized.frequency_table(&buf);
    assert_eq!(s, v);
    assert_eq!(v.distinct(), 256);
    assert_eq!(v.get(0xFF), 3);
    assert_eq!(v.get(0x00), 4);
}
