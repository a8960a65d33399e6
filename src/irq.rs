//! Interrupt pending flag
//!
//! The Si4463 pulls NIRQ low while any enabled interrupt is pending. The
//! application attaches a falling-edge handler to that pin and calls
//! [`PendingFlag::notify_edge`] from it. Nothing else happens in interrupt
//! context: all bus traffic stays on the main loop.
//!
//! # Example
//! ```no_run
//! use si4463::PendingFlag;
//!
//! static RADIO_IRQ: PendingFlag = PendingFlag::new();
//!
//! // Called from the NIRQ pin interrupt.
//! fn on_nirq_falling() {
//!     RADIO_IRQ.notify_edge();
//! }
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::CriticalSection;

/// Single-bit flag shared between the edge handler and the main loop.
///
/// The handler only ever sets it. The main loop only ever clears it, and only
/// inside a critical section, so an edge can never be consumed by the handler
/// itself. Any number of edges between two clears collapse into one wake-up.
///
/// Only atomic loads and stores are used, which keeps the type available on
/// cores without compare-and-swap.
#[derive(Debug)]
pub struct PendingFlag {
    set: AtomicBool,
}

impl PendingFlag {
    /// Creates a cleared flag.
    pub const fn new() -> Self {
        Self {
            set: AtomicBool::new(false),
        }
    }

    /// Marks an interrupt as pending. Safe to call from interrupt context.
    #[inline]
    pub fn notify_edge(&self) {
        self.set.store(true, Ordering::Release);
    }

    /// Whether an edge arrived since the last [`take`](Self::take).
    #[inline]
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    /// Clears the flag, returning whether it was set.
    ///
    /// Requires a critical section token: the check and the clear must not be
    /// split by the handler. An edge that is held off by the critical section
    /// sets the flag again once it ends and causes one extra, harmless wake-up.
    pub fn take(&self, _cs: CriticalSection<'_>) -> bool {
        let was_set = self.set.load(Ordering::Acquire);
        if was_set {
            self.set.store(false, Ordering::Release);
        }
        was_set
    }
}

impl Default for PendingFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{fence, AtomicUsize};
    use std::thread;

    fn take(flag: &PendingFlag) -> bool {
        critical_section::with(|cs| flag.take(cs))
    }

    #[test]
    fn starts_clear() {
        let flag = PendingFlag::new();
        assert!(!flag.is_set());
        assert!(!take(&flag));
    }

    #[test]
    fn repeated_edges_collapse_into_one_wake() {
        let flag = PendingFlag::new();
        for _ in 0..5 {
            flag.notify_edge();
        }

        assert!(take(&flag));
        assert!(!take(&flag));
    }

    #[test]
    fn edge_after_clear_is_kept() {
        let flag = PendingFlag::new();
        flag.notify_edge();
        assert!(take(&flag));

        flag.notify_edge();
        assert!(flag.is_set());
        assert!(take(&flag));
    }

    #[test]
    fn edge_during_critical_section_survives_the_clear() {
        let flag = PendingFlag::new();
        flag.notify_edge();

        critical_section::with(|cs| {
            assert!(flag.take(cs));
            // Handler held off until the critical section ends.
            flag.notify_edge();
        });

        assert!(take(&flag));
    }

    // The producer publishes an event (the chip status) before raising the
    // flag. The consumer only reads events after taking the flag. Whatever the
    // interleaving, the last event must be observed through some wake-up.
    #[test]
    fn no_event_lost_when_racing_the_clear() {
        static FLAG: PendingFlag = PendingFlag::new();
        static PUBLISHED: AtomicUsize = AtomicUsize::new(0);
        const EVENTS: usize = 10_000;

        let producer = thread::spawn(|| {
            for n in 1..=EVENTS {
                PUBLISHED.store(n, Ordering::Release);
                FLAG.notify_edge();
            }
        });

        let mut seen = 0;
        let mut wakes = 0;
        while !producer.is_finished() {
            if take(&FLAG) {
                fence(Ordering::SeqCst);
                wakes += 1;
                seen = PUBLISHED.load(Ordering::Acquire);
            }
            thread::yield_now();
        }
        producer.join().unwrap();
        if take(&FLAG) {
            wakes += 1;
            seen = PUBLISHED.load(Ordering::Acquire);
        }

        assert_eq!(seen, EVENTS, "lost the final edge");
        assert!(wakes >= 1 && wakes <= EVENTS);
        assert!(!take(&FLAG));
    }
}
