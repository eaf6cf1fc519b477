//! # Ticket Queue
//!
//! FIFO mutual exclusion by chained hand-off.
//!
//! Every acquisition allocates a fresh binary lock (the ticket's *gate*)
//! that is claimed as part of construction. The queue remembers only a
//! weak reference to the most recently issued gate; each new ticket waits
//! once on its immediate predecessor's gate and then forgets it. Releasing
//! a ticket (dropping it) therefore unblocks exactly the next-registered
//! waiter, and nobody else.
//!
//! There is deliberately no timeout variant. Callers wanting bounded waits
//! must build that above this primitive.

use std::sync::{Arc, Weak};

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};

/// A ticket's internal binary lock. Held from construction until the
/// ticket is released.
type Gate = Mutex<()>;

/// An owning guard over a [`Gate`]. Keeps the gate allocation alive for as
/// long as the ticket itself.
type GateGuard = ArcMutexGuard<RawMutex, ()>;

/// One waiter's position in a [`TicketQueue`].
///
/// Holding a `Ticket` means owning the critical section guarded by the
/// queue it came from. Dropping it (or calling [`Ticket::release`]) ends
/// the critical section and unblocks the immediate successor, if any.
///
/// A ticket may be moved to, and released on, a different thread than the
/// one that acquired it. Within one thread, tickets from the same queue
/// must be released in acquisition order; releasing out of order is a
/// logic error that scrambles succession.
#[must_use = "dropping a ticket immediately ends its critical section"]
pub struct Ticket {
    /// The claimed gate. Dropping the guard is the release.
    _gate: GateGuard,
}

impl Ticket {
    /// Ends the critical section now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

/// Fair, order-preserving mutual exclusion.
///
/// `acquire()` calls are served in exactly the order they were admitted;
/// admission itself is serialized by a short-lived internal lock whose
/// critical section is a pointer swap, so admission never blocks on the
/// work done inside anyone's critical section.
///
/// The queue holds no owning reference to any ticket: an idle queue is
/// just a dead weak pointer, and tickets outlive or predecease the queue
/// freely.
///
/// ## Usage
///
/// ```rust
/// use turnstile_core::TicketQueue;
///
/// let queue = TicketQueue::new();
/// let ticket = queue.acquire();
/// // ... critical section ...
/// drop(ticket); // next waiter (if any) proceeds
/// ```
pub struct TicketQueue {
    /// Admission lock around the weak reference to the most recently
    /// issued gate.
    tail: Mutex<Weak<Gate>>,
}

impl TicketQueue {
    /// Creates an idle queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tail: Mutex::new(Weak::new()),
        }
    }

    /// Takes the next position in the queue, blocking until every earlier
    /// ticket has been released.
    ///
    /// The wait is a single block on the immediate predecessor's gate;
    /// the predecessor's gate is dropped again the moment it is observed
    /// released, never retained.
    ///
    /// Cannot fail: a fatal error in the underlying lock primitive is a
    /// non-recoverable process error (parking_lot aborts internally).
    pub fn acquire(&self) -> Ticket {
        // Claiming before publishing: the gate is freshly allocated, so
        // this lock cannot contend.
        let gate = Arc::new(Mutex::new(()));
        let guard = gate.lock_arc();

        // Admission: swap ourselves in as the new tail. O(1) under the
        // admission lock.
        let predecessor = {
            let mut tail = self.tail.lock();
            let prev = tail.upgrade();
            *tail = Arc::downgrade(&gate);
            prev
        };

        // Wait for the predecessor to be released, then let its gate go.
        // This only detects release; it never takes ownership.
        if let Some(prev) = predecessor {
            drop(prev.lock());
        }

        Ticket { _gate: guard }
    }
}

impl Default for TicketQueue {
    fn default() -> Self {
        Self::new()
    }
}
