//! Instrumented value containers for contrasting relocation strategies.
//!
//! This library contains two wrapper types that own the same fixed-layout
//! record through different strategies: one embeds the record by value
//! and can only be relocated by duplicating it, the other holds it behind
//! an exclusively owned heap allocation that can be handed over without
//! copying a byte. An append-only sequence with a fixed doubling growth
//! schedule routes every relocation through the wrapper's own strategy,
//! and every lifecycle event lands in a shared counter set, so the cost
//! of each strategy can be asserted rather than eyeballed from a console
//! trace.

/// A fixed-layout record used as the unit of freight.
///
/// The array field exists only to give the record bulk; the workloads
/// leave it zeroed and cycle the four scalar fields instead. Duplication
/// is memberwise via the derived `Copy`.
#[derive(Clone, Copy)]
pub struct Payload {
    pub bulk: [i32; 100],
    pub a: i32,
    pub b: f32,
    pub c: f64,
    pub d: char,
}

impl Default for Payload {
    fn default() -> Self {
        Payload {
            bulk: [0; 100],
            a: 0,
            b: 0.0,
            c: 0.0,
            d: '\0',
        }
    }
}

impl Payload {
    /// Overwrites the scalar fields with `index` cast into each type.
    pub fn stamp(&mut self, index: usize) {
        self.a = index as i32;
        self.b = index as f32;
        self.c = index as f64;
        self.d = char::from(index as u8);
    }

    /// The four scalar fields, in declaration order.
    pub fn scalars(&self) -> (i32, f32, f64, char) {
        (self.a, self.b, self.c, self.d)
    }
}

/// A type that can be carried from old backing storage to new storage.
///
/// Implementations decide what the trip costs: a deep duplication of the
/// payload, or a handover of its ownership. The source is consumed either
/// way; whatever it still owns afterwards drops in place.
pub trait Relocate: Sized {
    /// Produces the instance that lands in the new storage.
    fn relocate(self) -> Self;
}

/// An append-only sequence with a fixed doubling growth schedule.
///
/// Capacity grows 0, 1, 2, 4, ... and every growth step carries each
/// resident element through `Relocate::relocate`, so the number of
/// relocations after a given number of pushes is exactly reproducible.
/// `std::vec::Vec` runs no element code when it grows; routing growth
/// through the trait is what makes each strategy's cost observable.
/// Insertion itself also relocates, matching what the growth step does
/// to residents: a duplicating type pays one duplication per push, a
/// transferring type pays one handover.
pub struct PacketStack<T: Relocate> {
    local: Vec<T>,
    cap: usize,
}

impl<T: Relocate> PacketStack<T> {
    /// Appends an element, relocating it into the backing storage.
    pub fn push(&mut self, item: T) {
        if self.local.len() == self.cap {
            self.grow();
        }
        self.local.push(item.relocate());
    }

    /// The capacity the growth schedule has reached.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    fn grow(&mut self) {
        // The schedule is tracked separately from `Vec::capacity` so an
        // allocator rounding the request up cannot perturb the counts.
        self.cap = std::cmp::max(1, 2 * self.cap);
        let mut grown = Vec::with_capacity(self.cap);
        for item in self.local.drain(..) {
            grown.push(item.relocate());
        }
        self.local = grown;
    }
}

impl<T: Relocate> std::ops::Deref for PacketStack<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        &self.local[..]
    }
}

impl<T: Relocate> Default for PacketStack<T> {
    fn default() -> Self {
        Self {
            local: Vec::new(),
            cap: 0,
        }
    }
}

/// Lifecycle counters. No locks, just atomics.
pub mod stats {
    use core::sync::atomic::{AtomicU64, Ordering};

    macro_rules! lifecycle_counters {
        ($($field:ident: $doc:expr,)*) => (
            /// Monotonic event counters. One set serves one workload;
            /// the packets of that workload share it by `Arc`.
            #[derive(Debug, Default)]
            pub struct OpCounters {
                $(#[doc = $doc] $field: AtomicU64,)*
            }

            /// A point-in-time copy of `OpCounters`.
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
            pub struct OpSnapshot {
                $(#[doc = $doc] pub $field: u64,)*
            }

            impl OpCounters {
                pub const fn new() -> Self {
                    Self { $($field: AtomicU64::new(0),)* }
                }

                paste::paste! { $(
                    #[inline(always)]
                    pub fn [<record_ $field>](&self) {
                        self.$field.fetch_add(1, Ordering::Relaxed);
                    }
                )* }

                pub fn snapshot(&self) -> OpSnapshot {
                    OpSnapshot {
                        $($field: self.$field.load(Ordering::Relaxed),)*
                    }
                }
            }

            impl core::fmt::Display for OpSnapshot {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    let mut sep = "";
                    $(
                        write!(f, "{}{}={}", sep, stringify!($field), self.$field)?;
                        sep = " ";
                    )*
                    let _ = sep;
                    Ok(())
                }
            }
        )
    }

    lifecycle_counters! {
        fresh: "Constructions from a payload record.",
        cloned: "Deep duplications (copy construction).",
        transferred: "Ownership handovers (move construction or assignment).",
        dropped: "Destructor runs, emptied sources included.",
        released: "Heap blocks returned to the allocator.",
    }
}

/// The two wrapper variants under test.
pub mod packet {
    use std::sync::Arc;

    use thiserror::Error;

    use super::stats::OpCounters;
    use super::{Payload, Relocate};

    /// Returned when reading a packet whose payload was transferred away.
    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("packet payload was transferred away")]
    pub struct EmptyPacket;

    /// Owns its payload by value; relocation must duplicate it.
    ///
    /// No cheap handover exists. Every trip into new storage costs a
    /// full duplication of the embedded record followed by the
    /// destruction of the source.
    pub struct ClonePacket {
        payload: Payload,
        ops: Arc<OpCounters>,
    }

    impl ClonePacket {
        /// A packet around a zeroed record. Records no event; it exists
        /// to satisfy container plumbing, not to be read.
        pub fn zeroed(ops: Arc<OpCounters>) -> Self {
            ClonePacket {
                payload: Payload::default(),
                ops,
            }
        }

        /// Duplicates `payload` into a new packet.
        pub fn new(payload: &Payload, ops: Arc<OpCounters>) -> Self {
            ops.record_fresh();
            log::trace!("ClonePacket regular constructor");
            ClonePacket {
                payload: *payload,
                ops,
            }
        }

        /// The four scalar fields of the embedded record.
        pub fn scalars(&self) -> (i32, f32, f64, char) {
            self.payload.scalars()
        }

        /// Prints the scalar fields as one labeled line.
        pub fn print_data(&self) {
            let (a, b, c, d) = self.scalars();
            println!("values a={} b={} c={} d={:?}", a, b, c, d);
        }
    }

    impl Clone for ClonePacket {
        fn clone(&self) -> Self {
            self.ops.record_cloned();
            log::trace!("ClonePacket copy constructor");
            ClonePacket {
                payload: self.payload,
                ops: Arc::clone(&self.ops),
            }
        }
    }

    impl Drop for ClonePacket {
        fn drop(&mut self) {
            self.ops.record_dropped();
            log::trace!("ClonePacket destructor");
        }
    }

    impl Relocate for ClonePacket {
        fn relocate(self) -> Self {
            // Duplication is the only way across; the source drops
            // behind us.
            self.clone()
        }
    }

    /// Owns its payload behind an exclusively owned heap allocation.
    ///
    /// Relocation hands the allocation over and leaves the source empty;
    /// duplication allocates a fresh block. An emptied packet is safe to
    /// drop and releases nothing, so no block is ever freed twice.
    pub struct BoxPacket {
        payload: Option<Box<Payload>>,
        ops: Arc<OpCounters>,
    }

    impl BoxPacket {
        /// An empty packet. No allocation, no event.
        pub fn empty(ops: Arc<OpCounters>) -> Self {
            BoxPacket { payload: None, ops }
        }

        /// Duplicates `payload` into a freshly allocated block.
        pub fn new(payload: &Payload, ops: Arc<OpCounters>) -> Self {
            ops.record_fresh();
            log::trace!("BoxPacket regular constructor");
            BoxPacket {
                payload: Some(Box::new(*payload)),
                ops,
            }
        }

        /// Whether the payload has been transferred away.
        pub fn is_empty(&self) -> bool {
            self.payload.is_none()
        }

        /// Borrows the owned record, if any.
        pub fn payload(&self) -> Option<&Payload> {
            self.payload.as_deref()
        }

        /// Takes the payload out of `self`, leaving it empty.
        ///
        /// The move-construction path: no allocation, no byte copy, and
        /// exactly one owner afterwards.
        pub fn take(&mut self) -> Self {
            self.ops.record_transferred();
            log::trace!("BoxPacket move constructor");
            BoxPacket {
                payload: self.payload.take(),
                ops: Arc::clone(&self.ops),
            }
        }

        /// Replaces `self`'s payload with `src`'s, releasing any block
        /// `self` held and leaving `src` empty.
        pub fn assign_from(&mut self, src: &mut BoxPacket) {
            if let Some(block) = self.payload.take() {
                self.ops.record_released();
                drop(block);
            }
            self.payload = src.payload.take();
            self.ops.record_transferred();
            log::trace!("BoxPacket move assignment");
        }

        /// The four scalar fields of the owned record.
        pub fn scalars(&self) -> Result<(i32, f32, f64, char), EmptyPacket> {
            self.payload.as_deref().map(Payload::scalars).ok_or(EmptyPacket)
        }

        /// Prints the scalar fields as one labeled line.
        pub fn print_data(&self) -> Result<(), EmptyPacket> {
            let (a, b, c, d) = self.scalars()?;
            println!("values a={} b={} c={} d={:?}", a, b, c, d);
            Ok(())
        }
    }

    impl Clone for BoxPacket {
        fn clone(&self) -> Self {
            self.ops.record_cloned();
            log::trace!("BoxPacket copy constructor");
            BoxPacket {
                payload: self.payload.as_deref().map(|p| Box::new(*p)),
                ops: Arc::clone(&self.ops),
            }
        }
    }

    impl Drop for BoxPacket {
        fn drop(&mut self) {
            if let Some(block) = self.payload.take() {
                self.ops.record_released();
                drop(block);
            }
            self.ops.record_dropped();
            log::trace!("BoxPacket destructor");
        }
    }

    impl Relocate for BoxPacket {
        fn relocate(mut self) -> Self {
            // The emptied source drops behind us, releasing nothing.
            self.take()
        }
    }
}

/// The driving routines the demonstration and the harness both run.
pub mod workload {
    use std::sync::Arc;

    use smallvec::SmallVec;

    use super::packet::{BoxPacket, ClonePacket};
    use super::stats::{OpCounters, OpSnapshot};
    use super::{PacketStack, Payload};

    /// Fills a stack with duplicating packets and reports the lifecycle
    /// counts once the stack has been torn down.
    ///
    /// One transient record lives on this routine's stack; each iteration
    /// re-stamps its scalars with the loop index and pushes a packet
    /// built from it.
    pub fn run_clone(size: usize) -> OpSnapshot {
        let ops = Arc::new(OpCounters::new());
        let mut stack = PacketStack::default();
        let mut record = Payload::default();
        for index in 0..size {
            record.stamp(index);
            stack.push(ClonePacket::new(&record, Arc::clone(&ops)));
        }
        drop(stack);
        ops.snapshot()
    }

    /// Same schedule as `run_clone`, with transferring packets.
    pub fn run_box(size: usize) -> OpSnapshot {
        let ops = Arc::new(OpCounters::new());
        let mut stack = PacketStack::default();
        let mut record = Payload::default();
        for index in 0..size {
            record.stamp(index);
            stack.push(BoxPacket::new(&record, Arc::clone(&ops)));
        }
        drop(stack);
        ops.snapshot()
    }

    /// Pushes duplicating packets into a native small-buffer vector.
    ///
    /// Native containers relocate by bitwise move: the spill from the
    /// inline buffer to the heap runs no element code at all, so the
    /// duplication counter stays at zero however often it grows.
    pub fn run_native_baseline(size: usize) -> OpSnapshot {
        let ops = Arc::new(OpCounters::new());
        let mut buffer: SmallVec<[ClonePacket; 8]> = SmallVec::new();
        let mut record = Payload::default();
        for index in 0..size {
            record.stamp(index);
            buffer.push(ClonePacket::new(&record, Arc::clone(&ops)));
        }
        drop(buffer);
        ops.snapshot()
    }

    /// Relocations performed by the doubling-from-zero schedule after
    /// `size` pushes: one per resident element at each growth step.
    pub fn expected_relocations(size: usize) -> u64 {
        let mut cap = 0u64;
        let mut moved = 0u64;
        for len in 0..size as u64 {
            if len == cap {
                moved += len;
                cap = std::cmp::max(1, 2 * cap);
            }
        }
        moved
    }
}
