//! Owning handle over an over-allocated, manually aligned byte region.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::ptr::NonNull;

use crate::config::is_power_of_two;
use crate::error::{Error, Result};

/// A byte buffer whose first usable byte sits on a requested power-of-two
/// boundary.
///
/// The handle owns the raw allocation (`raw_len = length + alignment - 1`
/// bytes at alignment 1) and records the offset of the aligned view inside
/// it. Dropping the handle releases the raw region, so the aligned view can
/// never outlive it. Content is written once during construction and is
/// read-only afterwards.
pub struct AlignedBuffer {
    raw: NonNull<u8>,
    raw_len: usize,
    offset: usize,
    length: usize,
    alignment: usize,
}

// SAFETY: the region is uniquely owned and never mutated after construction,
// so shared reads from several threads cannot race.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Reserve a zeroed region with `length` usable bytes at `alignment`.
    pub(crate) fn allocate(length: usize, alignment: usize) -> Result<Self> {
        if !is_power_of_two(alignment) {
            return Err(Error::invalid(format!(
                "alignment {} is not a power of two",
                alignment
            )));
        }
        if length == 0 {
            return Err(Error::invalid("buffer length must be at least 1"));
        }

        let raw_len = length
            .checked_add(alignment - 1)
            .ok_or(Error::AllocationFailure {
                requested: usize::MAX,
                alignment,
            })?;
        let layout = Layout::from_size_align(raw_len, 1).map_err(|_| Error::AllocationFailure {
            requested: raw_len,
            alignment,
        })?;

        // SAFETY: layout has non-zero size (length >= 1).
        let ptr = unsafe { alloc_zeroed(layout) };
        let raw = NonNull::new(ptr).ok_or(Error::AllocationFailure {
            requested: raw_len,
            alignment,
        })?;

        let offset = match align_offset(raw.as_ptr() as usize, alignment, length, raw_len) {
            Some(offset) => offset,
            None => {
                // SAFETY: allocated above with this exact layout.
                unsafe { dealloc(raw.as_ptr(), layout) };
                return Err(Error::AllocationFailure {
                    requested: raw_len,
                    alignment,
                });
            }
        };

        Ok(Self {
            raw,
            raw_len,
            offset,
            length,
            alignment,
        })
    }

    /// Build a buffer holding `content` followed by a zero sentinel.
    ///
    /// Useful for fixed inputs in tests and validation; the resulting
    /// `len()` is `content.len() + 1`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a non-power-of-two alignment,
    /// [`Error::AllocationFailure`] if the allocator refuses the region.
    pub fn from_content(content: &[u8], alignment: usize) -> Result<Self> {
        let mut buffer = Self::allocate(content.len() + 1, alignment)?;
        buffer.content_mut().copy_from_slice(content);
        Ok(buffer)
    }

    /// Usable length in bytes, sentinel included.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Always false: a buffer has at least its sentinel byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Requested start alignment.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Address of the first usable byte.
    #[inline]
    pub fn address(&self) -> usize {
        self.as_ptr() as usize
    }

    /// Address of the underlying raw allocation.
    #[inline]
    pub fn raw_address(&self) -> usize {
        self.raw.as_ptr() as usize
    }

    /// Bytes reserved from the allocator.
    #[inline]
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    /// Pointer to the aligned view.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        // SAFETY: offset + length <= raw_len was checked at allocation.
        unsafe { self.raw.as_ptr().add(self.offset) }
    }

    /// The whole aligned view, sentinel included.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the view is initialized (zeroed at allocation) and lives as
        // long as `self`.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.length) }
    }

    /// The countable content: every byte except the trailing sentinel.
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.as_slice()[..self.length - 1]
    }

    /// Whether the aligned view actually satisfies the requested alignment.
    pub fn is_aligned(&self) -> bool {
        self.address() % self.alignment == 0
    }

    /// Mutable access to the content region, used only while filling.
    pub(crate) fn content_mut(&mut self) -> &mut [u8] {
        let len = self.length - 1;
        // SAFETY: exclusive borrow of self; region lies inside the allocation.
        unsafe { std::slice::from_raw_parts_mut(self.raw.as_ptr().add(self.offset), len) }
    }

    /// Release the allocation now instead of at scope end.
    pub fn free(self) {
        drop(self)
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `alloc_zeroed` with this size and align 1,
        // and is released exactly once here.
        unsafe {
            dealloc(
                self.raw.as_ptr(),
                Layout::from_size_align_unchecked(self.raw_len, 1),
            )
        };
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("alignment", &self.alignment)
            .finish()
    }
}

/// Offset of the first address at or after `base` that is a multiple of
/// `alignment` and still has `length` bytes before `base + space`.
fn align_offset(base: usize, alignment: usize, length: usize, space: usize) -> Option<usize> {
    let mask = alignment - 1;
    let aligned = base.checked_add(mask)? & !mask;
    let offset = aligned - base;
    (offset.checked_add(length)? <= space).then_some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_offset_arithmetic() {
        assert_eq!(align_offset(0x1000, 64, 16, 79), Some(0));
        assert_eq!(align_offset(0x1001, 64, 16, 79), Some(63));
        assert_eq!(align_offset(0x1003, 4, 10, 13), Some(1));
        // Not enough room left after bumping to the boundary.
        assert_eq!(align_offset(0x1001, 64, 16, 70), None);
    }

    #[test]
    fn test_allocate_alignment() {
        for alignment in [1, 2, 4, 8, 16, 32, 64, 128, 4096] {
            let buf = AlignedBuffer::allocate(100, alignment).expect("allocate failed");
            assert_eq!(
                buf.address() % alignment,
                0,
                "Pointer {:#x} not {}-byte aligned",
                buf.address(),
                alignment
            );
            assert_eq!(buf.raw_len(), 100 + alignment - 1);
            assert!(buf.address() >= buf.raw_address());
            assert!(buf.address() + buf.len() <= buf.raw_address() + buf.raw_len());
        }
    }

    #[test]
    fn test_allocate_rejects_bad_arguments() {
        assert!(matches!(
            AlignedBuffer::allocate(64, 3),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            AlignedBuffer::allocate(64, 0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            AlignedBuffer::allocate(0, 8),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_allocate_overflow_is_allocation_failure() {
        assert!(matches!(
            AlignedBuffer::allocate(usize::MAX, 64),
            Err(Error::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_from_content_appends_sentinel() {
        let buf = AlignedBuffer::from_content(b"aabbbcca", 32).unwrap();
        assert_eq!(buf.len(), 9);
        assert_eq!(buf.content(), b"aabbbcca");
        assert_eq!(buf.as_slice()[8], 0);
        assert!(buf.is_aligned());
    }

    #[test]
    fn test_fresh_buffer_is_zeroed() {
        let buf = AlignedBuffer::allocate(33, 16).unwrap();
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }
}
