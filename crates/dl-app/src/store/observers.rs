use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use dl_core::wizard::WizardState;

pub(crate) type Listener = Arc<dyn Fn(&WizardState) + Send + Sync>;

/// Handle returned by [`crate::WizardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Delivery {
    /// Newest committed state not yet handed to listeners.
    pending: Option<(u64, Arc<WizardState>)>,
    /// Thread currently running delivery rounds.
    deliverer: Option<ThreadId>,
    /// Revision of the last state handed to listeners.
    delivered: u64,
}

/// Listener registry.
///
/// Delivery is serialized: one thread at a time runs rounds, always with the
/// newest committed state, so listeners never see the state go backwards.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    delivery: Mutex<Delivery>,
}

/// Releases the deliverer slot if a listener panics mid-round.
struct DelivererSlot<'a> {
    observers: &'a Observers,
    thread: ThreadId,
}

impl Drop for DelivererSlot<'_> {
    fn drop(&mut self) {
        let mut delivery = self.observers.delivery();
        if delivery.deliverer == Some(self.thread) {
            delivery.deliverer = None;
        }
    }
}

impl Observers {
    fn listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivery(&self) -> MutexGuard<'_, Delivery> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners().len()
    }

    /// Hand the state committed as `revision` to every listener.
    ///
    /// Uncontended, all listeners have run when this returns. When another
    /// thread is already delivering, the state is queued and that thread
    /// delivers it (or a newer one) after its current round. A mutation made
    /// from inside a listener is queued the same way and delivered once the
    /// listener returns.
    pub(crate) fn notify(&self, revision: u64, state: Arc<WizardState>) {
        let current = thread::current().id();
        {
            let mut delivery = self.delivery();
            if revision <= delivery.delivered {
                return;
            }
            let newer = delivery
                .pending
                .as_ref()
                .map_or(true, |(queued, _)| *queued < revision);
            if newer {
                delivery.pending = Some((revision, state));
            }
            if delivery.deliverer.is_some() {
                return;
            }
            delivery.deliverer = Some(current);
        }

        let _slot = DelivererSlot {
            observers: self,
            thread: current,
        };

        loop {
            let state = {
                let mut delivery = self.delivery();
                match delivery.pending.take() {
                    Some((revision, state)) => {
                        delivery.delivered = revision;
                        state
                    }
                    None => {
                        delivery.deliverer = None;
                        return;
                    }
                }
            };
            self.run_round(&state);
        }
    }

    /// Call every listener in subscription order.
    ///
    /// The list is copied first so listeners may subscribe, unsubscribe or
    /// read the store while being notified.
    fn run_round(&self, state: &WizardState) {
        let listeners: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::wizard::SubscriptionPlan;
    use std::sync::atomic::AtomicUsize;

    fn with_plan(plan: SubscriptionPlan) -> Arc<WizardState> {
        Arc::new(WizardState {
            selected_plan: Some(plan),
            ..Default::default()
        })
    }

    #[test]
    fn test_add_notify_remove() {
        let observers = Observers::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let id = observers.add(Arc::new(move |_: &WizardState| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        observers.notify(1, Arc::new(WizardState::default()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(observers.remove(id));
        assert!(!observers.remove(id));
        assert_eq!(observers.len(), 0);

        observers.notify(2, Arc::new(WizardState::default()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let observers = Observers::default();
        let a = observers.add(Arc::new(|_: &WizardState| {}));
        let b = observers.add(Arc::new(|_: &WizardState| {}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_stale_revision_is_not_delivered() {
        let observers = Observers::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        observers.add(Arc::new(move |state: &WizardState| {
            sink.lock().unwrap().push(state.selected_plan);
        }));

        observers.notify(2, with_plan(SubscriptionPlan::BestMates));
        observers.notify(1, with_plan(SubscriptionPlan::JustMates));

        assert_eq!(*seen.lock().unwrap(), vec![Some(SubscriptionPlan::BestMates)]);
    }

    #[test]
    fn test_notify_from_listener_is_delivered_after_round() {
        let observers = Arc::new(Observers::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let inner = Arc::downgrade(&observers);
        observers.add(Arc::new(move |state: &WizardState| {
            sink.lock().unwrap().push(state.selected_plan);
            if state.selected_plan == Some(SubscriptionPlan::JustMates) {
                if let Some(inner) = inner.upgrade() {
                    inner.notify(2, with_plan(SubscriptionPlan::GoodMates));
                }
            }
        }));

        observers.notify(1, with_plan(SubscriptionPlan::JustMates));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some(SubscriptionPlan::JustMates), Some(SubscriptionPlan::GoodMates)]
        );
    }

    #[test]
    fn test_panicking_listener_does_not_block_later_rounds() {
        let observers = Arc::new(Observers::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        observers.add(Arc::new(move |state: &WizardState| {
            counter.fetch_add(1, Ordering::SeqCst);
            if state.is_frozen {
                panic!("listener failure");
            }
        }));

        let panicking = observers.clone();
        let result = std::thread::spawn(move || {
            panicking.notify(
                1,
                Arc::new(WizardState {
                    is_frozen: true,
                    ..Default::default()
                }),
            );
        })
        .join();
        assert!(result.is_err());

        observers.notify(2, Arc::new(WizardState::default()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
