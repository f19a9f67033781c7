//! # Cyclic Component Groups
//!
//! A group is the slice of one type storage that holds every record of one
//! archetype. Groups sit back to back inside the storage's arena, in
//! archetype order:
//!
//! ```text
//! arena:  [ group 0 ][ group 1 ][ group 2 ][ free ... ]
//!                     ^base    ^end
//! ```
//!
//! Inside its slice a group is a ring: logical position `0` lives at
//! `base + tip` and reading wraps at `size`:
//!
//! ```text
//! physical:  [ L0 L1 | R0 R1 R2 ]      logical: R0 R1 R2 L0 L1
//!                    ^tip
//! ```
//!
//! The ring lets a group move by `n` slots (to make room for, or close a
//! gap left by, an earlier group) while copying at most `n` records: the
//! records at one edge are carried to the other edge and the tip adjusts.
//!
//! A group never owns memory. Every operation takes the arena slice it
//! lives in, and callers are responsible for ordering moves so a group only
//! writes into slots that are free at that moment.

use std::ops::Range;

use crate::math;

/// Outcome of a batched removal.
///
/// "Right of tip" removals hit the logical prefix (physically at
/// `[tip, size)`); "left of tip" removals hit the wrapped suffix
/// (physically at `[0, tip)`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Compaction {
    /// Removed records that were stored right of the tip.
    pub right_of_tip: usize,
    /// Removed records that were stored left of the tip.
    pub left_of_tip: usize,
}

impl Compaction {
    /// Total slots freed at the end of the group.
    #[inline]
    #[must_use]
    pub const fn total(self) -> usize {
        self.right_of_tip + self.left_of_tip
    }
}

/// Placement of one archetype's records inside a type storage's arena.
///
/// Invariant: `tip < size`, or `tip == 0` when the group is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Group {
    /// Offset of the group's first physical slot in the arena.
    base: usize,
    /// Number of live records.
    size: usize,
    /// Physical offset (relative to `base`) of logical position 0.
    tip: usize,
}

impl Group {
    /// Creates an empty group starting at `base`.
    #[inline]
    #[must_use]
    pub const fn new(base: usize) -> Self {
        Self {
            base,
            size: 0,
            tip: 0,
        }
    }

    /// Offset of the group's first slot.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Number of live records.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Rotation point of the ring.
    #[inline]
    #[must_use]
    pub const fn tip(&self) -> usize {
        self.tip
    }

    /// One past the group's last slot; the next group's base.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.base + self.size
    }

    /// Checks if the group holds no records.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Arena offset of the record at logical position `pos`.
    #[inline]
    #[must_use]
    pub fn physical_index(&self, pos: usize) -> Option<usize> {
        (pos < self.size).then(|| self.base + (self.tip + pos) % self.size)
    }

    /// Length of the physically contiguous run that starts at `pos`.
    ///
    /// Runs break at the tip: the logical prefix ends at the physical end of
    /// the group and the suffix continues from its physical start.
    #[inline]
    #[must_use]
    pub fn contiguous_run(&self, pos: usize) -> usize {
        if pos >= self.size {
            return 0;
        }
        let right_len = self.size - self.tip;
        if pos < right_len {
            right_len - pos
        } else {
            self.size - pos
        }
    }

    /// Arena ranges holding the records, in logical order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> [Range<usize>; 2] {
        [
            self.base + self.tip..self.base + self.size,
            self.base..self.base + self.tip,
        ]
    }

    /// Reads the record at logical position `pos`.
    #[inline]
    pub fn get<'a, T>(&self, buf: &'a [T], pos: usize) -> Option<&'a T> {
        self.physical_index(pos).and_then(|i| buf.get(i))
    }

    /// Mutable access to the record at logical position `pos`.
    #[inline]
    pub fn get_mut<'a, T>(&self, buf: &'a mut [T], pos: usize) -> Option<&'a mut T> {
        self.physical_index(pos).and_then(move |i| buf.get_mut(i))
    }

    /// Writes a batch at the logical end of the group.
    ///
    /// Must follow [`shift_clockwise`](Self::shift_clockwise) with the same
    /// count. Records that fit in the slots reserved behind the tip go there;
    /// the rest are written past the live end, so the slots
    /// `[end, end + records.len() - reserved)` must be free.
    pub fn append<T: Copy>(&mut self, buf: &mut [T], records: &[T]) {
        let count = records.len();
        let left = math::min(count, self.tip);
        let right = count - left;
        let base = self.base;

        // Past the live end
        let end = base + self.size;
        buf[end..end + right].copy_from_slice(&records[..right]);
        // Wrap-around write just behind the tip
        buf[base + self.tip - left..base + self.tip].copy_from_slice(&records[right..]);

        self.size += right;
    }

    /// Reserves up to `count` slots immediately before the tip.
    ///
    /// The first records left of the tip are carried past the live end and
    /// the rest of the left segment slides down, opening a gap that ends at
    /// the tip. Base and tip do not move; `size` grows by the reserved amount.
    ///
    /// Returns the number of slots reserved (at most `tip`). The slots
    /// `[end, end + reserved)` must be free.
    pub fn shift_clockwise<T: Copy>(&mut self, buf: &mut [T], count: usize) -> usize {
        let reserved = math::min(count, self.tip);
        if reserved > 0 {
            let base = self.base;
            buf.copy_within(base..base + reserved, base + self.size);
            buf.copy_within(base + reserved..base + self.tip, base);
            self.size += reserved;
        }
        reserved
    }

    /// Moves the group `count` slots towards the end of the arena.
    ///
    /// Copies `min(size, count)` records. The slots
    /// `[end, end + count)` must be free.
    pub fn roll_clockwise<T: Copy>(&mut self, buf: &mut [T], count: usize) {
        if count == 0 {
            return;
        }
        let moved = math::min(self.size, count);
        let stride = math::max(self.size, count);
        buf.copy_within(self.base..self.base + moved, self.base + stride);
        if count < self.size {
            self.tip = (self.tip + self.size - count) % self.size;
        }
        self.base += count;
    }

    /// Moves the group `count` slots towards the start of the arena.
    ///
    /// Copies `min(size, count)` records. The slots
    /// `[base - count, base)` must be free.
    pub fn roll_counter_clockwise<T: Copy>(&mut self, buf: &mut [T], count: usize) {
        if count == 0 {
            return;
        }
        debug_assert!(count <= self.base, "rolled past the start of the arena");
        let moved = math::min(self.size, count);
        let src = self.base + self.size - moved;
        buf.copy_within(src..src + moved, self.base - count);
        if count < self.size {
            self.tip = (self.tip + count) % self.size;
        }
        self.base -= count;
    }

    /// Removes the records at the given logical positions.
    ///
    /// `positions` must be sorted ascending, unique and below `size`;
    /// anything else is a caller bug (checked in debug builds only).
    ///
    /// Survivors keep their relative order and are moved in blocks: each
    /// run between two removed positions is copied once. Afterwards the
    /// group still starts at the same base and every freed slot sits at its
    /// end, ready to be reclaimed by rolling later groups back.
    pub fn remove_by_positions<T: Copy>(&mut self, buf: &mut [T], positions: &[usize]) -> Compaction {
        debug_assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "removal positions must be sorted and unique"
        );
        debug_assert!(
            positions.last().map_or(true, |&p| p < self.size),
            "removal position out of range"
        );
        if positions.is_empty() {
            return Compaction::default();
        }

        let base = self.base;
        let tip = self.tip;
        let end = base + self.size;
        let right_len = self.size - tip;
        let split = positions.partition_point(|&p| p < right_len);
        let (right, left) = positions.split_at(split);

        // Right of the tip: close gaps towards the tip, freeing the tail
        if let Some(&first) = right.first() {
            let phys = |p: usize| base + tip + p;
            let mut dst = phys(first);
            for (i, &hole) in right.iter().enumerate() {
                let src = phys(hole) + 1;
                let next = right.get(i + 1).map_or(end, |&p| phys(p));
                if next > src {
                    buf.copy_within(src..next, dst);
                    dst += next - src;
                }
            }
        }

        // Left of the tip: close gaps towards the tip, freeing the head
        if let Some(&last) = left.last() {
            let phys = |p: usize| base + p - right_len;
            let mut dst_end = phys(last) + 1;
            for i in (0..left.len()).rev() {
                let hole = phys(left[i]);
                let prev = if i == 0 { base } else { phys(left[i - 1]) + 1 };
                if hole > prev {
                    let len = hole - prev;
                    buf.copy_within(prev..hole, dst_end - len);
                    dst_end -= len;
                }
            }
        }

        let compaction = Compaction {
            right_of_tip: right.len(),
            left_of_tip: left.len(),
        };
        self.base += compaction.left_of_tip;
        self.tip -= compaction.left_of_tip;
        self.size -= compaction.total();
        self.normalize();

        // Re-seal: pull the group back over the freed head
        self.roll_counter_clockwise(buf, compaction.left_of_tip);
        self.normalize();

        compaction
    }

    #[inline]
    fn normalize(&mut self) {
        if self.tip >= self.size {
            self.tip = 0;
        }
    }
}

/// Read-only view of one group's records.
#[derive(Clone, Copy, Debug)]
pub struct GroupView<'a, T> {
    group: Group,
    data: &'a [T],
}

impl<'a, T> GroupView<'a, T> {
    pub(crate) fn new(group: Group, data: &'a [T]) -> Self {
        Self { group, data }
    }

    /// Placement of the viewed group.
    #[inline]
    #[must_use]
    pub fn group(&self) -> Group {
        self.group
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.group.size()
    }

    /// Checks if the group is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// The two contiguous runs of the group, in logical order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> (&'a [T], &'a [T]) {
        let [head, tail] = self.group.segments();
        (&self.data[head], &self.data[tail])
    }

    /// Record at logical position `pos`.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&'a T> {
        self.group.get(self.data, pos)
    }

    /// Iterates records in logical order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        let (head, tail) = self.segments();
        head.iter().chain(tail.iter())
    }
}

impl<T: Copy> GroupView<'_, T> {
    /// Copies the records out in logical order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
}
