//! Index types for mesh elements.
//!
//! Regions, triangles and sides are identified by type-safe wrappers around an
//! unsigned integer. The integer width is a type parameter, so a mesh can keep
//! region ids in `u16` while its side ids need `u32`: the number of sides is
//! roughly six times the number of regions, and the two counts cross the
//! 16-bit limit at different mesh sizes.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for types that can be used as mesh indices.
///
/// Implemented for `u16`, `u32` and `u64`. The largest value of each type is
/// reserved as the "none" sentinel, so an index type addresses at most
/// `MAX + 1` elements.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The maximum valid index value.
    const MAX: Self;

    /// A sentinel value representing an invalid/null index.
    const INVALID: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert from usize, returning `None` if the value does not fit.
    fn try_from_usize(v: usize) -> Option<Self> {
        if v <= Self::MAX.to_usize() {
            Some(Self::from_usize(v))
        } else {
            None
        }
    }

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Number of distinct elements this index type can address.
    fn capacity() -> usize {
        Self::MAX.to_usize().saturating_add(1)
    }

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl MeshIndex for u16 {
    const MAX: Self = u16::MAX - 1;
    const INVALID: Self = u16::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        debug_assert!(v <= Self::MAX as usize, "index {} too large for u16", v);
        v as u16
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl MeshIndex for u32 {
    const MAX: Self = u32::MAX - 1;
    const INVALID: Self = u32::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        debug_assert!(v <= Self::MAX as usize, "index {} too large for u32", v);
        v as u32
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl MeshIndex for u64 {
    const MAX: Self = u64::MAX - 1;
    const INVALID: Self = u64::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        v as u64
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

/// A type-safe region index (dual of a point).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RegionId<I: MeshIndex = u32>(I);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId<I: MeshIndex = u32>(I);

/// A type-safe side (directed half-edge) index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SideId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            ///
            /// Values that do not fit `I` give the invalid index rather than
            /// wrapping onto another element.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::try_from_usize(index).unwrap_or(I::INVALID))
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Get the raw value of the underlying type.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }

            /// `Some(self)` if valid, `None` for the sentinel.
            #[inline]
            pub fn valid(self) -> Option<Self> {
                if self.is_valid() {
                    Some(self)
                } else {
                    None
                }
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(RegionId, "R");
impl_index_type!(TriangleId, "T");
impl_index_type!(SideId, "S");

impl<I: MeshIndex> SideId<I> {
    /// The triangle this side belongs to (`s / 3`).
    #[inline]
    pub fn triangle(self) -> TriangleId<I> {
        TriangleId::new(self.index() / 3)
    }

    /// The next side counterclockwise around the same triangle.
    #[inline]
    pub fn next(self) -> Self {
        let s = self.index();
        Self::new(if s % 3 == 2 { s - 2 } else { s + 1 })
    }

    /// The previous side around the same triangle.
    #[inline]
    pub fn prev(self) -> Self {
        let s = self.index();
        Self::new(if s % 3 == 0 { s + 2 } else { s - 1 })
    }
}

impl<I: MeshIndex> TriangleId<I> {
    /// The three sides of this triangle, `3t`, `3t + 1`, `3t + 2`.
    #[inline]
    pub fn sides(self) -> [SideId<I>; 3] {
        let s = 3 * self.index();
        [SideId::new(s), SideId::new(s + 1), SideId::new(s + 2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_id() {
        let r: RegionId = RegionId::new(42);
        assert_eq!(r.index(), 42);
        assert!(r.is_valid());

        let invalid: RegionId = RegionId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(invalid.valid(), None);
    }

    #[test]
    fn test_too_large_is_invalid() {
        assert!(RegionId::<u16>::new(65534).is_valid());
        assert!(!RegionId::<u16>::new(65535).is_valid());
        // 65537 would wrap to 1 if truncated.
        let r: RegionId<u16> = RegionId::new(65537);
        assert!(!r.is_valid());
        assert_eq!(r, RegionId::invalid());
        assert!(!SideId::<u16>::from(70_000).is_valid());
        assert!(SideId::<u32>::new(70_000).is_valid());
    }

    #[test]
    fn test_small_indices() {
        let r: RegionId<u16> = RegionId::new(1000);
        assert_eq!(r.index(), 1000);
        assert_eq!(<u16 as MeshIndex>::capacity(), 65535);
        assert_eq!(<u16 as MeshIndex>::try_from_usize(65534), Some(65534));
        assert_eq!(<u16 as MeshIndex>::try_from_usize(65535), None);
        assert_eq!(<u32 as MeshIndex>::try_from_usize(65536), Some(65536));
    }

    #[test]
    fn test_side_arithmetic() {
        let s: SideId = SideId::new(4);
        assert_eq!(s.triangle().index(), 1);
        assert_eq!(s.next().index(), 5);
        assert_eq!(s.next().next().index(), 3);
        assert_eq!(s.prev().index(), 3);
        assert_eq!(SideId::<u32>::new(3).prev().index(), 5);

        let t: TriangleId = TriangleId::new(2);
        let [a, b, c] = t.sides();
        assert_eq!((a.index(), b.index(), c.index()), (6, 7, 8));
    }

    #[test]
    fn test_debug_format() {
        let r: RegionId = RegionId::new(42);
        assert_eq!(format!("{:?}", r), "R(42)");

        let s: SideId<u16> = SideId::invalid();
        assert_eq!(format!("{:?}", s), "S(INVALID)");
    }
}
