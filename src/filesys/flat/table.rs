//! Fixed-capacity slot tables and their on-disk encoding

use core::array;

/// A table position, either free or holding an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<T> {
    Empty,
    Occupied(T),
}

impl<T> Slot<T> {
    pub fn entry(&self) -> Option<&T> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            Slot::Empty => None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Fixed-width record stored in consecutive slots of a table sector run
pub trait Record: Sized {
    /// Bytes each slot occupies on disk
    const SIZE: usize;

    /// Writes the entry into `raw`, which is exactly `SIZE` zeroed bytes
    fn encode(&self, raw: &mut [u8]);

    /// Returns `None` when the slot's used flag is clear
    fn decode(raw: &[u8]) -> Option<Self>;
}

/// `N` slots filled strictly in order of allocation; entries never leave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<T, const N: usize> {
    slots: [Slot<T>; N],
}

impl<T, const N: usize> Default for Table<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Table<T, N> {
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self {
            slots: array::from_fn(|_| Slot::Empty),
        }
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Slot::entry)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Occupied slots with their indices, lowest index first
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.entry().map(|entry| (i, entry)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Slot::Occupied(entry) => Some((i, entry)),
                Slot::Empty => None,
            })
    }

    /// Index of the first occupied slot matching `pred`
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().find(|(_, entry)| pred(*entry)).map(|(i, _)| i)
    }

    /// Lowest empty slot at or after `from`
    pub fn first_empty(&self, from: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, slot)| !slot.is_occupied())
            .map(|(i, _)| i)
    }

    /// Stores `entry` in slot `index`, replacing whatever was there
    pub fn occupy(&mut self, index: usize, entry: T) {
        self.slots[index] = Slot::Occupied(entry);
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record, const N: usize> Table<T, N> {
    /// Serializes every slot into `buf`; empty slots and the tail stay zero
    pub fn encode_into(&self, buf: &mut [u8]) {
        buf.fill(0);
        for (slot, raw) in self.slots.iter().zip(buf.chunks_exact_mut(T::SIZE)) {
            if let Slot::Occupied(entry) = slot {
                entry.encode(raw);
            }
        }
    }

    /// Rebuilds a table from bytes produced by `encode_into`
    pub fn decode_from(buf: &[u8]) -> Self {
        Self {
            slots: array::from_fn(|i| {
                buf.get(i * T::SIZE..(i + 1) * T::SIZE)
                    .and_then(T::decode)
                    .map_or(Slot::Empty, Slot::Occupied)
            }),
        }
    }
}
