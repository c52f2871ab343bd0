//! Debounced composition of per-column filter state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::{FilterColumn, FilterContent, Filters, SharedFilterState, TRACING_TARGET};
use crate::{Error, Result};

/// Default debounce window for filter writes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// A write buffered until its column's timer expires.
#[derive(Debug)]
struct Pending {
    value: Option<FilterContent>,
    generation: u64,
    timer: CancellationToken,
}

#[derive(Debug)]
struct Slot {
    state: SharedFilterState,
    pending: Mutex<Option<Pending>>,
}

impl Slot {
    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Inner<C: FilterColumn> {
    slots: BTreeMap<C, Slot>,
    debounce: Duration,
    shutdown: CancellationToken,
    generation: AtomicU64,
}

impl<C: FilterColumn> Inner<C> {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Commits the pending write of `column` if it is still the one scheduled
    /// under `generation`.
    ///
    /// The slot stays locked while the value is persisted, so a concurrent
    /// clear or shutdown is ordered entirely before or after the commit.
    fn commit(&self, column: C, generation: u64) {
        let Some(slot) = self.slots.get(&column) else {
            return;
        };

        let mut pending = slot.lock();
        if self.shutdown.is_cancelled()
            || !pending.as_ref().is_some_and(|p| p.generation == generation)
        {
            return;
        }

        if let Some(pending) = pending.take() {
            tracing::debug!(
                target: TRACING_TARGET,
                column = %column,
                cleared = pending.value.is_none(),
                "Committing debounced filter value"
            );
            slot.state.set(pending.value);
        }
    }
}

/// Aggregates one persisted state accessor per filter column.
///
/// Writes are debounced per column: each write resets that column's timer,
/// and only the latest value is committed when the timer expires. Dropping
/// the composer discards every pending write.
pub struct FilterComposer<C: FilterColumn> {
    inner: Arc<Inner<C>>,
    runtime: Handle,
}

impl<C: FilterColumn> fmt::Debug for FilterComposer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterComposer")
            .field("columns", &self.inner.slots.keys().collect::<Vec<_>>())
            .field("debounce", &self.inner.debounce)
            .finish_non_exhaustive()
    }
}

impl<C: FilterColumn> FilterComposer<C> {
    /// Binds every column of `C` to the accessor returned by `factory`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new<F>(debounce: Duration, factory: F) -> Result<Self>
    where
        F: Fn(C) -> SharedFilterState,
    {
        let runtime = Handle::try_current().map_err(|error| {
            Error::configuration()
                .with_message("filter composition requires a tokio runtime")
                .with_source(error)
        })?;

        let slots = C::iter()
            .map(|column| {
                let slot = Slot {
                    state: factory(column),
                    pending: Mutex::new(None),
                };
                (column, slot)
            })
            .collect();

        let inner = Inner {
            slots,
            debounce,
            shutdown: CancellationToken::new(),
            generation: AtomicU64::new(0),
        };

        Ok(Self {
            inner: Arc::new(inner),
            runtime,
        })
    }

    /// Returns the debounce window.
    #[inline]
    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }

    /// Returns the current filters, including writes not yet committed.
    pub fn filters(&self) -> Filters<C> {
        let mut filters = Filters::new();
        for (column, slot) in &self.inner.slots {
            let value = match slot.lock().as_ref() {
                Some(pending) => pending.value.clone(),
                None => slot.state.get(),
            };
            filters.set(*column, value);
        }
        filters
    }

    /// Returns the filters as currently persisted.
    pub fn persisted_filters(&self) -> Filters<C> {
        let mut filters = Filters::new();
        for (column, slot) in &self.inner.slots {
            filters.set(*column, slot.state.get());
        }
        filters
    }

    /// Returns whether any column has a write waiting for its timer.
    pub fn has_pending(&self) -> bool {
        self.inner.slots.values().any(|slot| slot.lock().is_some())
    }

    /// Schedules a write of `value` to `column`.
    ///
    /// A write already pending for the same column is superseded.
    pub fn set_filter_value(&self, column: C, value: Option<FilterContent>) {
        if self.inner.shutdown.is_cancelled() {
            tracing::debug!(
                target: TRACING_TARGET,
                column = %column,
                "Ignoring filter write after shutdown"
            );
            return;
        }

        let Some(slot) = self.inner.slots.get(&column) else {
            return;
        };

        let generation = self.inner.next_generation();
        let timer = self.inner.shutdown.child_token();

        {
            let mut pending = slot.lock();
            if let Some(previous) = pending.take() {
                previous.timer.cancel();
            }
            *pending = Some(Pending {
                value,
                generation,
                timer: timer.clone(),
            });
        }

        tracing::trace!(
            target: TRACING_TARGET,
            column = %column,
            generation = generation,
            "Filter write scheduled"
        );

        let inner = Arc::clone(&self.inner);
        let debounce = inner.debounce;
        self.runtime.spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(debounce) => inner.commit(column, generation),
            }
        });
    }

    /// Clears every column immediately, discarding pending writes.
    pub fn clear_filters(&self) {
        for (column, slot) in &self.inner.slots {
            let mut guard = slot.lock();
            if let Some(pending) = guard.take() {
                pending.timer.cancel();
            }
            slot.state.set(None);
            drop(guard);

            tracing::trace!(target: TRACING_TARGET, column = %column, "Filter cleared");
        }

        tracing::debug!(target: TRACING_TARGET, "Filters cleared");
    }

    /// Commits every pending write without waiting for its timer.
    pub fn flush(&self) {
        for (column, slot) in &self.inner.slots {
            let mut guard = slot.lock();
            if let Some(pending) = guard.take() {
                pending.timer.cancel();
                tracing::debug!(
                    target: TRACING_TARGET,
                    column = %column,
                    "Flushing pending filter value"
                );
                slot.state.set(pending.value);
            }
        }
    }

    /// Cancels every pending write without committing it.
    ///
    /// Later writes are ignored.
    pub fn shutdown(&self) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }

        self.inner.shutdown.cancel();
        let mut discarded = 0;
        for slot in self.inner.slots.values() {
            if slot.lock().take().is_some() {
                discarded += 1;
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            discarded = discarded,
            "Filter composer shut down"
        );
    }
}

impl<C: FilterColumn> Drop for FilterComposer<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
