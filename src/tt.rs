//! Transposition cache shared by the search worker and perft.
//!
//! Keys are Zobrist fingerprints. A probe hit is only a hint: fingerprints
//! can collide, so callers check the payload kind and depth before trusting
//! an entry.
//!
//! This implementation uses lockless hashing so a background search and the
//! command thread can share it through an `Arc`. Each slot is stored as an
//! atomic u64 pair with XOR verification, so a torn write reads as a miss
//! instead of a corrupted entry.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::Move;

const MB: usize = 1024 * 1024;

/// Number of slots per bucket for collision resolution
const BUCKET_SIZE: usize = 4;

/// Largest node count a perft entry can hold
pub const PERFT_NODES_MAX: u64 = (1 << 52) - 1;

// Packed entry format (64 bits):
// - bits 0-15:  move (u16, 0 = no move)      } search entries
// - bits 16-31: score (i16 as u16)           }
// - bits 0-51:  node count                   } perft entries
// - bit 52:     occupied (never zero when written)
// - bits 53-54: kind (0 exact, 1 lower, 2 upper, 3 perft)
// - bits 56-63: depth
const OCCUPIED: u64 = 1 << 52;
const KIND_SHIFT: u32 = 53;
const KIND_PERFT: u64 = 3;
const DEPTH_SHIFT: u32 = 56;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact, // Score is the exact value
    Lower, // Score is at least this value (failed high - score >= beta)
    Upper, // Score is at most this value (failed low - score <= alpha)
}

impl Bound {
    fn to_bits(self) -> u64 {
        match self {
            Bound::Exact => 0,
            Bound::Lower => 1,
            Bound::Upper => 2,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v {
            0 => Bound::Exact,
            1 => Bound::Lower,
            _ => Bound::Upper,
        }
    }
}

/// What an entry remembers about its position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payload {
    Search {
        score: i16,
        best_move: Option<Move>,
        bound: Bound,
    },
    Perft {
        nodes: u64,
    },
}

impl Payload {
    fn is_perft(&self) -> bool {
        matches!(self, Payload::Perft { .. })
    }
}

/// One cached result, tagged with its fingerprint and the depth it was computed at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: u64,
    pub depth: u8,
    pub payload: Payload,
}

impl CacheEntry {
    /// A search result. Depth and score are clamped to the storable range.
    #[must_use]
    pub fn search(key: u64, depth: u32, score: i32, bound: Bound, best_move: Option<Move>) -> Self {
        CacheEntry {
            key,
            depth: depth.min(u8::MAX as u32) as u8,
            payload: Payload::Search {
                score: score.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
                best_move,
                bound,
            },
        }
    }

    /// A perft subtree count, or `None` when it does not fit an entry
    #[must_use]
    pub fn perft(key: u64, depth: u32, nodes: u64) -> Option<Self> {
        if nodes > PERFT_NODES_MAX || depth > u8::MAX as u32 {
            return None;
        }
        Some(CacheEntry {
            key,
            depth: depth as u8,
            payload: Payload::Perft { nodes },
        })
    }

    fn pack(&self) -> u64 {
        let body = match self.payload {
            Payload::Search {
                score,
                best_move,
                bound,
            } => {
                let mv = best_move.map_or(0, Move::as_u16) as u64;
                mv | ((score as u16 as u64) << 16) | (bound.to_bits() << KIND_SHIFT)
            }
            Payload::Perft { nodes } => nodes | (KIND_PERFT << KIND_SHIFT),
        };
        body | OCCUPIED | ((self.depth as u64) << DEPTH_SHIFT)
    }

    fn unpack(key: u64, data: u64) -> Self {
        let kind = (data >> KIND_SHIFT) & 0x3;
        let payload = if kind == KIND_PERFT {
            Payload::Perft {
                nodes: data & PERFT_NODES_MAX,
            }
        } else {
            Payload::Search {
                score: ((data >> 16) & 0xFFFF) as u16 as i16,
                best_move: Move::from_u16((data & 0xFFFF) as u16),
                bound: Bound::from_bits(kind),
            }
        };
        CacheEntry {
            key,
            depth: (data >> DEPTH_SHIFT) as u8,
            payload,
        }
    }
}

/// A single slot using lockless hashing.
///
/// Stores (key ^ data) and data separately. On read, (stored_key ^ data)
/// must equal the probe key, which rejects slots caught mid-write.
#[repr(C)]
struct Slot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn new() -> Self {
        Slot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn write(&self, key: u64, packed: u64) {
        // Data first, then key_xor
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(key ^ packed, Ordering::Relaxed);
    }

    fn read(&self, key: u64) -> Option<CacheEntry> {
        // Opposite order from write
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);

        if data != 0 && key_xor ^ data == key {
            Some(CacheEntry::unpack(key, data))
        } else {
            None
        }
    }

    fn wipe(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }

    fn raw(&self) -> u64 {
        self.data.load(Ordering::Relaxed)
    }

    fn depth(&self) -> u8 {
        (self.raw() >> DEPTH_SHIFT) as u8
    }
}

#[repr(C)]
struct Bucket {
    slots: [Slot; BUCKET_SIZE],
}

impl Bucket {
    fn new() -> Self {
        Bucket {
            slots: [Slot::new(), Slot::new(), Slot::new(), Slot::new()],
        }
    }
}

/// Occupancy and traffic figures for operator inspection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub buckets: usize,
    pub slots: usize,
    pub bytes: usize,
    pub occupied: usize,
    pub search_entries: usize,
    pub perft_entries: usize,
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

impl CacheStats {
    /// Occupied slots in per mille (0-1000)
    #[must_use]
    pub fn per_mille(&self) -> usize {
        if self.slots == 0 {
            0
        } else {
            self.occupied * 1000 / self.slots
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "hashtable size {} MB buckets {} slots {} entry bytes {}",
            self.bytes / MB,
            self.buckets,
            self.slots,
            mem::size_of::<Slot>()
        )?;
        writeln!(
            f,
            "hashtable used {} ({}.{}%) search {} perft {}",
            self.occupied,
            self.per_mille() / 10,
            self.per_mille() % 10,
            self.search_entries,
            self.perft_entries
        )?;
        write!(
            f,
            "hashtable probes {} hits {} stores {}",
            self.probes, self.hits, self.stores
        )
    }
}

/// Fixed-capacity, replace-on-collision fingerprint -> entry store.
///
/// Capacity is chosen once at creation. Multiple threads can read and write
/// without locks; `clear` must not race with a reader, which the engine
/// controller guarantees by never clearing while a session is live.
pub struct TranspositionCache {
    buckets: Vec<Bucket>,
    mask: usize,
    probes: AtomicU64,
    hits: AtomicU64,
    stores: AtomicU64,
}

impl TranspositionCache {
    /// Create a cache using at most `size_mb` megabytes (at least 1).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * MB;
        let fit = (bytes / mem::size_of::<Bucket>()).max(1);
        // Largest power of two that fits, so indexing is a mask
        let num_buckets = 1usize << (usize::BITS - 1 - fit.leading_zeros());

        let buckets = (0..num_buckets).map(|_| Bucket::new()).collect();
        log::debug!(
            "transposition cache created: {} buckets ({} MB requested)",
            num_buckets,
            size_mb
        );

        TranspositionCache {
            buckets,
            mask: num_buckets - 1,
            probes: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            stores: AtomicU64::new(0),
        }
    }

    fn bucket(&self, key: u64) -> &Bucket {
        &self.buckets[(key as usize) & self.mask]
    }

    /// Total number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len() * BUCKET_SIZE
    }

    /// Look up the entry written for exactly this fingerprint.
    pub fn probe(&self, key: u64) -> Option<CacheEntry> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        let found = self.bucket(key).slots.iter().find_map(|slot| slot.read(key));
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Store an entry.
    ///
    /// Replacement policy, in order:
    /// 1. A slot holding the same fingerprint is overwritten when the new
    ///    depth is at least the stored depth or the payload kind differs;
    ///    otherwise the write is dropped.
    /// 2. The first empty slot.
    /// 3. The shallowest slot, lowest index on ties.
    pub fn store(&self, entry: CacheEntry) {
        let packed = entry.pack();
        let bucket = self.bucket(entry.key);

        for slot in &bucket.slots {
            if let Some(existing) = slot.read(entry.key) {
                if entry.depth >= existing.depth
                    || entry.payload.is_perft() != existing.payload.is_perft()
                {
                    slot.write(entry.key, packed);
                    self.stores.fetch_add(1, Ordering::Relaxed);
                }
                return;
            }
        }

        let target = bucket
            .slots
            .iter()
            .find(|slot| slot.raw() == 0)
            .or_else(|| bucket.slots.iter().min_by_key(|slot| slot.depth()));

        if let Some(slot) = target {
            slot.write(entry.key, packed);
            self.stores.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Empty every slot without reallocating. Starts a new epoch: nothing
    /// written before the clear can be probed afterwards.
    pub fn clear(&self) {
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                slot.wipe();
            }
        }
        self.probes.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.stores.store(0, Ordering::Relaxed);
        log::debug!("transposition cache cleared");
    }

    /// Number of occupied slots (exact count)
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.stats().occupied
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut search_entries = 0;
        let mut perft_entries = 0;
        for bucket in &self.buckets {
            for slot in &bucket.slots {
                let data = slot.raw();
                if data == 0 {
                    continue;
                }
                if (data >> KIND_SHIFT) & 0x3 == KIND_PERFT {
                    perft_entries += 1;
                } else {
                    search_entries += 1;
                }
            }
        }

        CacheStats {
            buckets: self.buckets.len(),
            slots: self.capacity(),
            bytes: self.buckets.len() * mem::size_of::<Bucket>(),
            occupied: search_entries + perft_entries,
            search_entries,
            perft_entries,
            probes: self.probes.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
        }
    }

    /// Diagnostic text for `hashtable print`
    #[must_use]
    pub fn describe(&self) -> String {
        self.stats().to_string()
    }
}

impl Drop for TranspositionCache {
    fn drop(&mut self) {
        log::debug!(
            "transposition cache released ({} buckets)",
            self.buckets.len()
        );
    }
}
