//! The parameter store: single source of truth for parameter values.
//!
//! Every read and write of synthesizer state goes through a
//! [`ParameterStore`]. Writes are validated against the store's
//! [`ParameterCatalog`]: values are clamped to the parameter's range and
//! rounded for integer parameters, so a stored value can never violate its
//! definition.
//!
//! # Threading
//!
//! The store is built for the single-threaded, frame-driven model of the
//! synthesizer: UI handlers, the LFO engine and the shader bridge all run
//! on one logical thread and share the store through an `Rc`. All methods
//! take `&self`; values live in `Cell`s. A host that splits UI and rendering
//! across threads must put the store behind a mutex or an actor boundary.
//!
//! # Notifications
//!
//! Subscribers are called synchronously, in subscription order, for every
//! accepted change with `(key, new_value, old_value)`. A write that does
//! not change the stored value notifies no one.
//!
//! A subscriber may write back into the store from inside its callback.
//! Nested notification is bounded by a depth limit; writes beyond the limit
//! are still stored, but their notifications are dropped with a warning.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use wavewarp_core::ParameterStore;
//!
//! let store = ParameterStore::standard();
//! let changes = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&changes);
//! let subscription = store.subscribe(move |_key, _new, _old| counter.set(counter.get() + 1));
//!
//! store.set("speedLevel", 11.0); // clamped to 5
//! assert_eq!(store.get("speedLevel"), Some(5.0));
//! assert_eq!(changes.get(), 1);
//!
//! subscription.unsubscribe();
//! store.set("speedLevel", 2.0);
//! assert_eq!(changes.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use serde::ser::{Serialize, Serializer};

use crate::parameter_info::{names, ParameterCatalog, ParameterDefinition, ParameterId};

/// Default bound on nested notifications caused by subscribers writing back
/// into the store.
pub const DEFAULT_NOTIFY_DEPTH_LIMIT: usize = 8;

/// Callback invoked with `(key, new_value, old_value)`.
pub type SubscriberFn = dyn Fn(&str, f64, f64);

struct Subscriber {
    id: u64,
    callback: Rc<SubscriberFn>,
}

type SubscriberList = RefCell<Vec<Subscriber>>;

// =============================================================================
// ParameterStore
// =============================================================================

/// Validated, observable parameter state.
///
/// The set of keys is fixed by the catalog at construction and never grows
/// or shrinks.
pub struct ParameterStore {
    catalog: ParameterCatalog,
    /// One value per catalog entry, in catalog order.
    values: Vec<Cell<f64>>,
    subscribers: Rc<SubscriberList>,
    next_subscriber_id: Cell<u64>,
    notify_depth: Cell<usize>,
    notify_depth_limit: usize,
}

impl ParameterStore {
    /// Create a store holding every parameter's default value.
    pub fn new(catalog: ParameterCatalog) -> Self {
        let values = catalog.iter().map(|d| Cell::new(d.default)).collect();

        Self {
            catalog,
            values,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscriber_id: Cell::new(0),
            notify_depth: Cell::new(0),
            notify_depth_limit: DEFAULT_NOTIFY_DEPTH_LIMIT,
        }
    }

    /// Create a store starting from defaults, then apply `initial`.
    ///
    /// Initial values go through the normal clamping path. Unknown keys are
    /// logged and skipped.
    pub fn with_values<I, K>(catalog: ParameterCatalog, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let store = Self::new(catalog);
        store.set_multiple(initial);
        store
    }

    /// The standard catalog with the synthesizer's start-up values.
    pub fn standard() -> Self {
        use names::*;

        Self::with_values(
            ParameterCatalog::standard(),
            [
                (CARRIER_FREQ_X, 0.5),
                (CARRIER_FREQ_Y, 0.5),
                (MODULATOR_FREQ, 0.5),
                (MODULATION_INDEX, 1.0),
                (AMPLITUDE_MODULATION_INDEX, 1.0),
                (MODULATION_CENTER_X, 0.0),
                (MODULATION_CENTER_Y, 0.0),
                (LFO_FREQUENCY, 0.1),
                (LFO_AMPLITUDE, 0.5),
                (SPEED_LEVEL, 1.0),
                (INTENSITY_LEVEL, 3.0),
            ],
        )
    }

    /// Set the bound on nested notifications.
    ///
    /// A limit of 1 disables notifications triggered from inside callbacks.
    /// A write past the limit is stored but notifies no subscriber at all,
    /// including subscribers that never write back. Those see the last
    /// notified value, not the stored one, until the next change.
    pub fn with_notify_depth_limit(mut self, limit: usize) -> Self {
        self.notify_depth_limit = limit.max(1);
        self
    }

    // === Metadata ===

    /// The catalog this store validates against.
    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    /// Look up a parameter's definition.
    pub fn definition(&self, key: &str) -> Option<&ParameterDefinition> {
        self.catalog.get(key)
    }

    // === Reads ===

    /// Get a parameter value.
    ///
    /// Returns `None` and logs a warning if the key does not exist.
    pub fn get(&self, key: &str) -> Option<f64> {
        match self.catalog.id(key) {
            Some(id) => Some(self.values[id.index()].get()),
            None => {
                log::warn!("Parameter \"{key}\" does not exist");
                None
            }
        }
    }

    /// Get a parameter value by ID.
    pub fn get_by_id(&self, id: ParameterId) -> Option<f64> {
        self.values.get(id.index()).map(Cell::get)
    }

    /// Get a parameter value formatted for display.
    pub fn display(&self, key: &str) -> Option<String> {
        let id = self.catalog.id(key)?;
        let def = self.catalog.by_id(id)?;
        Some(def.display(self.values[id.index()].get()))
    }

    /// Take an owned snapshot of every parameter.
    ///
    /// Mutating the snapshot never affects the store.
    pub fn get_all(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            values: self
                .catalog
                .names()
                .zip(self.values.iter().map(Cell::get))
                .collect(),
        }
    }

    // === Writes ===

    /// Set a parameter value with validation.
    ///
    /// The value is clamped to the parameter's range and rounded for integer
    /// parameters. If the result differs from the stored value, it is stored
    /// and subscribers are notified. Returns `true` if the value changed.
    ///
    /// Unknown keys and NaN are logged and ignored.
    pub fn set(&self, key: &str, value: f64) -> bool {
        match self.catalog.id(key) {
            Some(id) => self.set_by_id(id, value),
            None => {
                log::warn!("Parameter \"{key}\" does not exist");
                false
            }
        }
    }

    /// Set a parameter value by ID. See [`set`](Self::set).
    pub fn set_by_id(&self, id: ParameterId, value: f64) -> bool {
        let Some(def) = self.catalog.by_id(id) else {
            log::warn!("Parameter {id} does not exist");
            return false;
        };

        if value.is_nan() {
            log::warn!("Ignoring NaN written to parameter \"{}\"", def.name);
            return false;
        }

        let new_value = def.clamp(value);
        let slot = &self.values[id.index()];
        let old_value = slot.get();
        if old_value == new_value {
            return false;
        }

        slot.set(new_value);
        self.notify(def.name, new_value, old_value);
        true
    }

    /// Set several parameters, in iteration order.
    ///
    /// Each entry is validated independently; there is no atomicity across
    /// the batch.
    pub fn set_multiple<I, K>(&self, updates: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        for (key, value) in updates {
            self.set(key.as_ref(), value);
        }
    }

    /// Reset a parameter to its default value through the normal `set` path.
    ///
    /// Returns `true` if the value changed.
    pub fn reset(&self, key: &str) -> bool {
        match self.catalog.id(key) {
            Some(id) => self.reset_by_id(id),
            None => {
                log::warn!("Parameter \"{key}\" does not exist");
                false
            }
        }
    }

    fn reset_by_id(&self, id: ParameterId) -> bool {
        match self.catalog.by_id(id) {
            Some(def) => self.set_by_id(id, def.default),
            None => false,
        }
    }

    /// Reset every parameter to its default, in catalog order.
    pub fn reset_all(&self) {
        for index in 0..self.catalog.len() {
            self.reset_by_id(ParameterId(index));
        }
    }

    // === Subscriptions ===

    /// Register a change callback.
    ///
    /// The callback receives `(key, new_value, old_value)` for every accepted
    /// change. Call [`Subscription::unsubscribe`] on the returned handle to
    /// remove it; dropping the handle keeps the callback registered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&str, f64, f64) + 'static,
    {
        let id = self.next_subscriber_id.get();
        self.next_subscriber_id.set(id + 1);

        self.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(callback),
        });

        Subscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.borrow().iter().any(|s| s.id == id)
    }

    fn notify(&self, key: &str, new_value: f64, old_value: f64) {
        let depth = self.notify_depth.get();
        if depth >= self.notify_depth_limit {
            log::warn!(
                "Notification depth limit ({}) reached for \"{key}\"; subscribers not notified",
                self.notify_depth_limit
            );
            return;
        }

        // Callbacks may subscribe or unsubscribe, so iterate over a copy and
        // hold no borrow while calling out.
        let snapshot: Vec<(u64, Rc<SubscriberFn>)> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| (s.id, Rc::clone(&s.callback)))
            .collect();

        self.notify_depth.set(depth + 1);
        for (id, callback) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            let result = catch_unwind(AssertUnwindSafe(|| callback(key, new_value, old_value)));
            if result.is_err() {
                log::error!("Error in parameter subscriber for \"{key}\"");
            }
        }
        self.notify_depth.set(depth);
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParameterCatalog::standard())
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("values", &self.get_all())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle returned by [`ParameterStore::subscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl Subscription {
    /// Remove exactly this subscription's callback.
    ///
    /// Safe to call more than once, and after the store is gone.
    pub fn unsubscribe(&self) {
        if let Some(list) = self.subscribers.upgrade() {
            list.borrow_mut().retain(|s| s.id != self.id);
        }
    }
}

// =============================================================================
// ParameterSnapshot
// =============================================================================

/// Owned copy of every parameter value, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSnapshot {
    values: Vec<(&'static str, f64)>,
}

impl ParameterSnapshot {
    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Overwrite a value in this copy. Has no effect on the store.
    ///
    /// Returns `false` if the key is not present.
    pub fn insert(&mut self, key: &str, value: f64) -> bool {
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                entry.1 = value;
                true
            }
            None => false,
        }
    }

    /// Iterate over `(key, value)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render as a JSON object keyed by parameter name.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for ParameterSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter().map(|(k, v)| (*k, *v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_info::names::*;

    type Log = Rc<RefCell<Vec<(String, f64, f64)>>>;

    fn recorder(store: &ParameterStore) -> (Log, Subscription) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let subscription = store.subscribe(move |key, new, old| {
            sink.borrow_mut().push((key.to_string(), new, old));
        });
        (log, subscription)
    }

    #[test]
    fn test_standard_initial_values() {
        let store = ParameterStore::standard();
        assert_eq!(store.get(CARRIER_FREQ_X), Some(0.5));
        assert_eq!(store.get(MODULATION_INDEX), Some(1.0));
        assert_eq!(store.get(SPEED_LEVEL), Some(1.0));
        assert_eq!(store.get(INTENSITY_LEVEL), Some(3.0));
    }

    #[test]
    fn test_unknown_key_is_soft_failure() {
        let store = ParameterStore::standard();
        let (log, _sub) = recorder(&store);

        assert_eq!(store.get("brightness"), None);
        assert!(!store.set("brightness", 1.0));
        assert!(!store.reset("brightness"));
        assert!(log.borrow().is_empty());
        assert_eq!(store.get_all().len(), 11);
    }

    #[test]
    fn test_set_clamps_every_parameter() {
        let store = ParameterStore::standard();
        let probes = [-1e9, -1.0, 0.0, 0.37, 2.5, 4.99, 7.5, 1e9];

        for def in store.catalog().iter() {
            for &v in &probes {
                store.set(def.name, v);
                let stored = store.get(def.name).unwrap();
                assert!(stored >= def.min && stored <= def.max, "{} = {}", def.name, stored);
                if def.is_integer {
                    assert_eq!(stored.fract(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_speed_level_clamps_to_max() {
        let store = ParameterStore::standard();
        assert_eq!(store.get(SPEED_LEVEL), Some(1.0));
        store.set(SPEED_LEVEL, 1.0 + 10.0);
        assert_eq!(store.get(SPEED_LEVEL), Some(5.0));
    }

    #[test]
    fn test_infinite_values_clamp_and_nan_is_rejected() {
        let store = ParameterStore::standard();
        store.set(MODULATION_INDEX, f64::INFINITY);
        assert_eq!(store.get(MODULATION_INDEX), Some(5.0));
        store.set(MODULATION_INDEX, f64::NEG_INFINITY);
        assert_eq!(store.get(MODULATION_INDEX), Some(0.0));

        assert!(!store.set(MODULATION_INDEX, f64::NAN));
        assert_eq!(store.get(MODULATION_INDEX), Some(0.0));
    }

    #[test]
    fn test_same_value_does_not_notify() {
        let store = ParameterStore::standard();
        let (log, _sub) = recorder(&store);

        let current = store.get(CARRIER_FREQ_X).unwrap();
        assert!(!store.set(CARRIER_FREQ_X, current));

        // Clamps onto the stored value: still no change
        store.set(SPEED_LEVEL, 5.0);
        log.borrow_mut().clear();
        store.set(SPEED_LEVEL, 42.0);

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_change_notifies_each_subscriber_once() {
        let store = ParameterStore::standard();
        let (first, _a) = recorder(&store);
        let (second, _b) = recorder(&store);

        assert!(store.set(MODULATION_INDEX, 9.0));

        let expected = vec![(MODULATION_INDEX.to_string(), 5.0, 1.0)];
        assert_eq!(*first.borrow(), expected);
        assert_eq!(*second.borrow(), expected);
    }

    #[test]
    fn test_subscribers_called_in_subscription_order() {
        let store = ParameterStore::standard();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            store.subscribe(move |_, _, _| order.borrow_mut().push(tag));
        }

        store.set(LFO_AMPLITUDE, 2.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let store = ParameterStore::standard();
        let (kept, _keep) = recorder(&store);
        let (removed, subscription) = recorder(&store);

        subscription.unsubscribe();
        subscription.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);

        store.set(LFO_FREQUENCY, 3.0);
        assert!(removed.borrow().is_empty());
        assert_eq!(kept.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped() {
        let store = ParameterStore::standard();
        let (_log, subscription) = recorder(&store);
        drop(store);
        subscription.unsubscribe();
    }

    #[test]
    fn test_unsubscribe_from_inside_callback_skips_later_subscriber() {
        let store = ParameterStore::standard();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim_slot = Rc::clone(&slot);
        store.subscribe(move |_, _, _| {
            if let Some(sub) = victim_slot.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let (victim_log, victim) = recorder(&store);
        *slot.borrow_mut() = Some(victim);

        store.set(MODULATOR_FREQ, 3.0);
        assert!(victim_log.borrow().is_empty());
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let store = ParameterStore::standard();
        store.subscribe(|_, _, _| panic!("subscriber failure"));
        let (log, _sub) = recorder(&store);

        assert!(store.set(CARRIER_FREQ_Y, 4.0));
        assert_eq!(store.get(CARRIER_FREQ_Y), Some(4.0));
        assert_eq!(log.borrow().len(), 1);

        // Store still works after the failure
        assert!(store.set(CARRIER_FREQ_Y, 5.0));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_reentrant_writes_are_bounded() {
        let store = Rc::new(ParameterStore::standard().with_notify_depth_limit(4));
        let calls = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&store);
        let counter = Rc::clone(&calls);
        store.subscribe(move |key, new, _| {
            counter.set(counter.get() + 1);
            if let Some(store) = weak.upgrade() {
                store.set(key, new + 0.1);
            }
        });

        store.set(MODULATION_INDEX, 1.5);

        assert_eq!(calls.get(), 4);
        // Writes past the limit are still stored
        let value = store.get(MODULATION_INDEX).unwrap();
        assert!((value - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_depth_limit_silences_every_subscriber() {
        let store = Rc::new(ParameterStore::standard().with_notify_depth_limit(2));

        let weak = Rc::downgrade(&store);
        store.subscribe(move |key, new, _| {
            if let Some(store) = weak.upgrade() {
                store.set(key, new + 0.1);
            }
        });
        let (log, _sub) = recorder(&store);

        store.set(MODULATION_INDEX, 1.5);

        let stored = store.get(MODULATION_INDEX).unwrap();
        assert!((stored - 1.7).abs() < 1e-9);

        // The display subscriber saw the nested write first, then the outer
        // one, and never the write past the limit.
        let seen: Vec<f64> = log.borrow().iter().map(|(_, new, _)| *new).collect();
        assert_eq!(seen.len(), 2);
        assert!((seen[0] - 1.6).abs() < 1e-9);
        assert!((seen[1] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_get_all_is_a_copy() {
        let store = ParameterStore::standard();
        let mut snapshot = store.get_all();

        assert!(snapshot.insert(CARRIER_FREQ_X, 9.0));
        assert!(!snapshot.insert("brightness", 1.0));
        assert_eq!(snapshot.get(CARRIER_FREQ_X), Some(9.0));
        assert_eq!(store.get(CARRIER_FREQ_X), Some(0.5));
    }

    #[test]
    fn test_snapshot_json_keeps_catalog_order() {
        let store = ParameterStore::standard();
        let json = store.get_all().to_json();

        assert!(json.starts_with("{\"carrierFreqX\":0.5,"));
        assert!(json.ends_with("\"lfoAmplitude\":0.5}"));
    }

    #[test]
    fn test_set_multiple_applies_in_order() {
        let store = ParameterStore::standard();
        let (log, _sub) = recorder(&store);

        store.set_multiple([
            (CARRIER_FREQ_X, 3.0),
            ("brightness", 1.0),
            (INTENSITY_LEVEL, 0.2),
        ]);

        let keys: Vec<String> = log.borrow().iter().map(|(k, _, _)| k.clone()).collect();
        assert_eq!(keys, vec![CARRIER_FREQ_X.to_string(), INTENSITY_LEVEL.to_string()]);
        assert_eq!(store.get(INTENSITY_LEVEL), Some(1.0));
    }

    #[test]
    fn test_reset_uses_definition_default() {
        let store = ParameterStore::standard();
        let (log, _sub) = recorder(&store);

        // Start-up value differs from the catalog default
        assert!(store.reset(CARRIER_FREQ_X));
        assert_eq!(store.get(CARRIER_FREQ_X), Some(2.0));
        assert_eq!(log.borrow().last().cloned(), Some((CARRIER_FREQ_X.to_string(), 2.0, 0.5)));

        store.reset_all();
        for def in store.catalog().iter() {
            assert_eq!(store.get(def.name), Some(def.default));
        }
    }

    #[test]
    fn test_display_uses_formatter() {
        let store = ParameterStore::standard();
        assert_eq!(store.display(CARRIER_FREQ_X).as_deref(), Some("0.50"));
        assert_eq!(store.display(INTENSITY_LEVEL).as_deref(), Some("3"));
        assert_eq!(store.display("brightness"), None);
    }
}
