//! Process-wide registry of chain transports.
//!
//! [`ConnectionPool`] owns the mapping from chain id to live transport
//! handles, mediates creation/teardown through a [`ConnectionFactory`], and
//! fans connectivity-state changes out to registered observers. All three
//! registries (persistent connections, one-shot cache, subscriber lists)
//! share one `std::sync::Mutex`; every public method is a single critical
//! section that never spans an `.await`, and subscriber delivery happens on
//! the dispatcher task strictly after the lock is released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::dispatcher::{StateDispatcher, StateNotification};
use super::subscriber::{ConnectionStateSubscriber, SubscriberRegistry};
use crate::domain::{ChainConfig, ChainId, ConnectionState};
use crate::error::FactoryError;
use crate::transport::{ChainTransport, ConnectionFactory, RequestTransport};

#[derive(Debug, Default)]
struct Registries {
    connections: HashMap<ChainId, Arc<dyn ChainTransport>>,
    one_shots: HashMap<ChainId, Arc<dyn RequestTransport>>,
    subscribers: SubscriberRegistry,
}

/// Shared pool internals: the registry lock plus the delivery queue.
///
/// Transports reach back into this through a [`StateSink`], which holds it
/// weakly so a live transport never keeps a dropped pool alive.
#[derive(Debug)]
pub(crate) struct PoolInner {
    registries: Mutex<Registries>,
    dispatcher: StateDispatcher,
}

impl PoolInner {
    fn registries(&self) -> MutexGuard<'_, Registries> {
        self.registries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Relays a transport-raised transition to the chain's subscribers.
    ///
    /// Snapshots the subscriber list under the lock, releases it, then
    /// enqueues delivery; dead weak entries are skipped by the dispatcher
    /// and physically removed only on the next (un)subscribe call.
    pub(crate) fn relay(&self, chain_id: &ChainId, state: ConnectionState) {
        let targets = self.registries().subscribers.snapshot(chain_id);
        if targets.is_empty() {
            return;
        }
        self.dispatcher.enqueue(StateNotification {
            chain_id: chain_id.clone(),
            state,
            targets,
        });
    }
}

/// Conduit for transport-raised state transitions back into the pool.
///
/// Handed to every transport at creation time. The transport carries its own
/// [`ChainId`], so relay needs no reverse lookup over the registry.
#[derive(Debug, Clone)]
pub struct StateSink {
    inner: Weak<PoolInner>,
}

impl StateSink {
    pub(crate) fn attached(inner: &Arc<PoolInner>) -> Self {
        Self {
            inner: Arc::downgrade(inner),
        }
    }

    /// Sink with no pool behind it; emissions vanish. Used by transports
    /// constructed outside a pool (tests, ad-hoc tooling).
    #[must_use]
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Reports a state transition for the given chain.
    pub fn emit(&self, chain_id: &ChainId, state: ConnectionState) {
        if let Some(inner) = self.inner.upgrade() {
            inner.relay(chain_id, state);
        }
    }
}

/// Process-wide connection pool.
///
/// Constructed once at the composition root and passed by handle to every
/// consumer; cloning is cheap and clones share the same registries. The pool
/// relays state transitions but never drives the transport state machine
/// itself, and it never retries failed creation: configuration errors
/// propagate to the caller as-is.
///
/// # Concurrency
///
/// - Any thread may call any method; registry access is serialized by one
///   non-reentrant lock held only for the duration of the call.
/// - Subscriber callbacks run on the dispatcher task after the lock is
///   released, so a callback may freely call back into the pool.
/// - Per-chain notification order matches transport emission order; no
///   ordering holds across different chains.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    factory: Arc<dyn ConnectionFactory>,
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Creates an empty pool backed by the given factory.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime (the delivery task is
    /// spawned here).
    #[must_use]
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            factory,
            inner: Arc::new(PoolInner {
                registries: Mutex::new(Registries::default()),
                dispatcher: StateDispatcher::spawn(),
            }),
        }
    }

    /// Creates (or updates in place) the persistent connection for a chain.
    ///
    /// On first call for a chain id the factory builds a transport, the pool
    /// registers it and starts its connect loop. Subsequent calls for the
    /// same chain id hand the EXISTING handle to the factory's update path
    /// and return it: callers must not assume a fresh handle.
    ///
    /// # Errors
    ///
    /// Returns the factory's [`FactoryError`] unwrapped when the chain
    /// configuration cannot back a transport. Never retried internally.
    pub fn setup_connection(
        &self,
        chain: &ChainConfig,
    ) -> Result<Arc<dyn ChainTransport>, FactoryError> {
        let connection = {
            let mut registries = self.inner.registries();
            if let Some(existing) = registries.connections.get(&chain.chain_id) {
                self.factory.update_connection(existing, chain);
                tracing::debug!(chain = %chain.chain_id, "connection updated in place");
                return Ok(Arc::clone(existing));
            }
            let connection = self
                .factory
                .create_connection(chain, StateSink::attached(&self.inner))?;
            registries
                .connections
                .insert(chain.chain_id.clone(), Arc::clone(&connection));
            connection
        };
        connection.connect();
        tracing::info!(chain = %chain.chain_id, name = %chain.name, "connection set up");
        Ok(connection)
    }

    /// Forcibly disconnects and removes the chain's persistent connection.
    ///
    /// No-op if the chain was never set up. Subscribers are not notified of
    /// the removal itself; removal is a structural event, not a
    /// connectivity-state event.
    pub fn clear_connection(&self, chain_id: &ChainId) {
        let removed = self.inner.registries().connections.remove(chain_id);
        if let Some(connection) = removed {
            connection.disconnect(true);
            tracing::info!(chain = %chain_id, "connection cleared");
        }
    }

    /// Stops network activity for a chain without forgetting it.
    ///
    /// Drops any cached one-shot transport and force-disconnects the
    /// persistent connection, which stays registered (and can be resumed by
    /// [`ConnectionPool::connect_all`] or the transport's own `connect`).
    pub fn deactivate_connection(&self, chain_id: &ChainId) {
        let persistent = {
            let mut registries = self.inner.registries();
            registries.one_shots.remove(chain_id);
            registries.connections.get(chain_id).map(Arc::clone)
        };
        if let Some(connection) = persistent {
            connection.disconnect(true);
        }
        tracing::debug!(chain = %chain_id, "chain deactivated");
    }

    /// Pure lookup of the chain's persistent connection.
    #[must_use]
    pub fn connection(&self, chain_id: &ChainId) -> Option<Arc<dyn ChainTransport>> {
        self.inner.registries().connections.get(chain_id).map(Arc::clone)
    }

    /// Returns a transport for one ad-hoc request against the chain.
    ///
    /// Fallback chain: cached one-shot (factory-updated in place) → freshly
    /// created one-shot → the persistent connection's request capability →
    /// `None`. A one-shot lookup therefore never fails merely because ad-hoc
    /// creation failed while a capable persistent connection exists.
    #[must_use]
    pub fn one_shot(&self, chain: &ChainConfig) -> Option<Arc<dyn RequestTransport>> {
        let mut registries = self.inner.registries();
        if let Some(existing) = registries.one_shots.get(&chain.chain_id) {
            self.factory.update_one_shot(existing, chain);
            return Some(Arc::clone(existing));
        }
        match self.factory.create_one_shot(chain) {
            Ok(transport) => {
                registries
                    .one_shots
                    .insert(chain.chain_id.clone(), Arc::clone(&transport));
                Some(transport)
            }
            Err(error) => {
                tracing::debug!(
                    chain = %chain.chain_id,
                    %error,
                    "one-shot creation failed, falling back to persistent connection"
                );
                registries
                    .connections
                    .get(&chain.chain_id)
                    .and_then(|connection| Arc::clone(connection).request_transport())
            }
        }
    }

    /// Registers a subscriber for a chain's state transitions.
    ///
    /// Registration is weak (the pool never extends the subscriber's
    /// lifetime) and idempotent by reference identity. The new subscriber
    /// receives the chain's current state (or the idle default when no
    /// connection exists yet) asynchronously, so consumers never poll for
    /// initial state.
    pub fn subscribe(
        &self,
        subscriber: &Arc<dyn ConnectionStateSubscriber>,
        chain_id: &ChainId,
    ) {
        let current = {
            let mut registries = self.inner.registries();
            if !registries.subscribers.add(chain_id, subscriber) {
                return;
            }
            registries
                .connections
                .get(chain_id)
                .map_or_else(ConnectionState::idle, |connection| connection.state())
        };
        self.inner.dispatcher.enqueue(StateNotification {
            chain_id: chain_id.clone(),
            state: current,
            targets: vec![Arc::downgrade(subscriber)],
        });
    }

    /// Removes a subscriber from a chain by reference identity.
    ///
    /// Safe to call for a subscriber that was never registered.
    pub fn unsubscribe(
        &self,
        subscriber: &Arc<dyn ConnectionStateSubscriber>,
        chain_id: &ChainId,
    ) {
        self.inner.registries().subscribers.remove(chain_id, subscriber);
    }

    /// Force-disconnects every managed persistent connection.
    ///
    /// Fire-and-forget: returns once the disconnect requests are issued.
    /// Registry membership is unchanged.
    pub fn disconnect_all(&self) {
        let connections = self.snapshot_connections();
        tracing::info!(count = connections.len(), "disconnecting all chains");
        for connection in connections {
            connection.disconnect(true);
        }
    }

    /// Starts the connect loop of every managed persistent connection.
    pub fn connect_all(&self) {
        let connections = self.snapshot_connections();
        tracing::info!(count = connections.len(), "reconnecting all chains");
        for connection in connections {
            connection.connect();
        }
    }

    /// Snapshot of every managed chain and its current connectivity state.
    ///
    /// Transport state locks nest inside the registry lock here; transports
    /// never hold their state lock while relaying, so the order is safe.
    #[must_use]
    pub fn chain_states(&self) -> Vec<(ChainId, ConnectionState)> {
        self.inner
            .registries()
            .connections
            .iter()
            .map(|(chain_id, connection)| (chain_id.clone(), connection.state()))
            .collect()
    }

    fn snapshot_connections(&self) -> Vec<Arc<dyn ChainTransport>> {
        self.inner.registries().connections.values().map(Arc::clone).collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use url::Url;

    use crate::transport::factory::mock::MockFactory;

    fn chain(id: &str) -> ChainConfig {
        let node = Url::parse("ws://127.0.0.1:9944/").ok().unwrap_or_else(|| {
            panic!("valid url");
        });
        ChainConfig::new(id, id.to_uppercase(), vec![node])
    }

    fn pool_with_mock() -> (ConnectionPool, Arc<MockFactory>) {
        let factory = Arc::new(MockFactory::default());
        let shared = Arc::clone(&factory);
        let pool = ConnectionPool::new(shared);
        (pool, factory)
    }

    fn connected(raw: &str) -> ConnectionState {
        let url = Url::parse(raw).ok().unwrap_or_else(|| {
            panic!("valid url");
        });
        ConnectionState::Connected { url }
    }

    async fn settle<F: Fn() -> bool>(condition: F) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not met within deadline");
    }

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<(ChainId, ConnectionState)>>,
    }

    impl Recording {
        fn events(&self) -> Vec<(ChainId, ConnectionState)> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl ConnectionStateSubscriber for Recording {
        fn on_state_change(&self, chain_id: &ChainId, state: &ConnectionState) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((chain_id.clone(), state.clone()));
        }
    }

    fn recorder() -> (Arc<Recording>, Arc<dyn ConnectionStateSubscriber>) {
        let recording = Arc::new(Recording::default());
        let shared = Arc::clone(&recording);
        let subscriber: Arc<dyn ConnectionStateSubscriber> = shared;
        (recording, subscriber)
    }

    #[tokio::test]
    async fn setup_then_lookup_returns_the_same_handle() {
        let (pool, _factory) = pool_with_mock();
        let created = pool.setup_connection(&chain("polkadot")).ok().unwrap_or_else(|| {
            panic!("setup failed");
        });

        let looked_up = pool.connection(&ChainId::from("polkadot"));
        let Some(looked_up) = looked_up else {
            panic!("expected a registered connection");
        };
        assert!(Arc::ptr_eq(&created, &looked_up));
    }

    #[tokio::test]
    async fn second_setup_updates_the_existing_handle_in_place() {
        let (pool, factory) = pool_with_mock();
        let first = pool.setup_connection(&chain("polkadot")).ok().unwrap_or_else(|| {
            panic!("setup failed");
        });
        let second = pool.setup_connection(&chain("polkadot")).ok().unwrap_or_else(|| {
            panic!("setup failed");
        });

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.transports().len(), 1);
        assert_eq!(factory.connection_updates.load(Ordering::SeqCst), 1);
        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        assert_eq!(transport.reconfigure_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lookup_of_unknown_chain_is_none() {
        let (pool, _factory) = pool_with_mock();
        assert!(pool.connection(&ChainId::from("never-set-up")).is_none());
    }

    #[tokio::test]
    async fn setup_failure_propagates_and_registers_nothing() {
        let (pool, factory) = pool_with_mock();
        factory.fail_connection.store(true, Ordering::SeqCst);

        let result = pool.setup_connection(&chain("polkadot"));
        assert!(matches!(result, Err(FactoryError::NoNodes(_))));
        assert!(pool.connection(&ChainId::from("polkadot")).is_none());
    }

    #[tokio::test]
    async fn clear_disconnects_and_forgets() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));

        pool.clear_connection(&ChainId::from("polkadot"));

        assert!(pool.connection(&ChainId::from("polkadot")).is_none());
        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        let disconnects = transport
            .disconnects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        assert_eq!(disconnects, vec![true]);
    }

    #[tokio::test]
    async fn clear_of_unknown_chain_is_noop() {
        let (pool, _factory) = pool_with_mock();
        pool.clear_connection(&ChainId::from("never-set-up"));
    }

    #[tokio::test]
    async fn deactivate_stops_activity_but_keeps_the_chain() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let _ = pool.one_shot(&chain("polkadot"));
        assert_eq!(factory.one_shots().len(), 1);

        pool.deactivate_connection(&ChainId::from("polkadot"));

        // Persistent connection force-disconnected but still registered.
        assert!(pool.connection(&ChainId::from("polkadot")).is_some());
        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        assert_eq!(transport.disconnect_count(), 1);

        // One-shot cache entry dropped: the next lookup creates afresh.
        let _ = pool.one_shot(&chain("polkadot"));
        assert_eq!(factory.one_shots().len(), 2);
    }

    #[tokio::test]
    async fn one_shot_cache_hit_preserves_identity() {
        let (pool, factory) = pool_with_mock();
        let first = pool.one_shot(&chain("polkadot"));
        let second = pool.one_shot(&chain("polkadot"));

        let (Some(first), Some(second)) = (first, second) else {
            panic!("expected cached one-shot transports");
        };
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.one_shots().len(), 1);
        assert_eq!(factory.one_shot_updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn one_shot_creation_failure_falls_back_to_persistent() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        factory.fail_one_shot.store(true, Ordering::SeqCst);

        let transport = pool.one_shot(&chain("polkadot"));
        let Some(transport) = transport else {
            panic!("expected the persistent fallback");
        };
        let reply = transport
            .request(crate::transport::RpcCall::bare("system_health"))
            .await
            .ok()
            .unwrap_or_else(|| {
                panic!("mock request failed");
            });
        assert_eq!(
            reply.get("via").and_then(serde_json::Value::as_str),
            Some("persistent")
        );
    }

    #[tokio::test]
    async fn one_shot_fallback_requires_request_capability() {
        let (pool, factory) = pool_with_mock();
        factory.persistent_without_requests.store(true, Ordering::SeqCst);
        let _ = pool.setup_connection(&chain("polkadot"));
        factory.fail_one_shot.store(true, Ordering::SeqCst);

        assert!(pool.one_shot(&chain("polkadot")).is_none());
    }

    #[tokio::test]
    async fn one_shot_without_any_connection_is_none() {
        let (pool, factory) = pool_with_mock();
        factory.fail_one_shot.store(true, Ordering::SeqCst);

        assert!(pool.one_shot(&chain("polkadot")).is_none());
    }

    #[tokio::test]
    async fn subscribe_delivers_current_state_exactly_once() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        transport.emit(connected("ws://127.0.0.1:9944/"));

        let (recording, subscriber) = recorder();
        pool.subscribe(&subscriber, &ChainId::from("polkadot"));

        settle(|| recording.events().len() == 1).await;
        tokio::time::sleep(Duration::from_millis(25)).await;
        let events = recording.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events.first().map(|(_, state)| state.status_str()),
            Some("connected")
        );
    }

    #[tokio::test]
    async fn subscribe_before_setup_delivers_the_idle_default() {
        let (pool, _factory) = pool_with_mock();
        let (recording, subscriber) = recorder();

        pool.subscribe(&subscriber, &ChainId::from("polkadot"));

        settle(|| recording.events().len() == 1).await;
        assert_eq!(
            recording.events().first().map(|(_, state)| state.clone()),
            Some(ConnectionState::idle())
        );
    }

    #[tokio::test]
    async fn duplicate_subscribe_notifies_once_per_transition() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let (recording, subscriber) = recorder();

        pool.subscribe(&subscriber, &ChainId::from("polkadot"));
        pool.subscribe(&subscriber, &ChainId::from("polkadot"));
        settle(|| recording.events().len() == 1).await;

        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        transport.emit(connected("ws://127.0.0.1:9944/"));

        settle(|| recording.events().len() == 2).await;
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(recording.events().len(), 2);
    }

    #[tokio::test]
    async fn unsubscribe_stops_that_subscriber_only() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let (left_recording, left) = recorder();
        let (right_recording, right) = recorder();
        pool.subscribe(&left, &ChainId::from("polkadot"));
        pool.subscribe(&right, &ChainId::from("polkadot"));
        settle(|| left_recording.events().len() == 1 && right_recording.events().len() == 1).await;

        pool.unsubscribe(&left, &ChainId::from("polkadot"));
        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        transport.emit(connected("ws://127.0.0.1:9944/"));

        settle(|| right_recording.events().len() == 2).await;
        assert_eq!(left_recording.events().len(), 1);
    }

    #[tokio::test]
    async fn transitions_are_relayed_in_emission_order() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let (recording, subscriber) = recorder();
        pool.subscribe(&subscriber, &ChainId::from("polkadot"));
        settle(|| recording.events().len() == 1).await;

        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        let url = Url::parse("ws://127.0.0.1:9944/").ok().unwrap_or_else(|| {
            panic!("valid url");
        });
        transport.emit(ConnectionState::Connecting { url: url.clone() });
        transport.emit(ConnectionState::Connected { url });

        settle(|| recording.events().len() == 3).await;
        let order: Vec<&'static str> = recording
            .events()
            .iter()
            .map(|(_, state)| state.status_str())
            .collect();
        assert_eq!(order, vec!["not_connected", "connecting", "connected"]);
    }

    #[tokio::test]
    async fn suspend_resume_cycle_touches_every_chain_and_drops_none() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let _ = pool.setup_connection(&chain("kusama"));

        pool.disconnect_all();
        for transport in factory.transports() {
            assert_eq!(transport.disconnect_count(), 1);
        }

        pool.connect_all();
        for transport in factory.transports() {
            // One connect from setup, one from the resume sweep.
            assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 2);
        }

        assert!(pool.connection(&ChainId::from("polkadot")).is_some());
        assert!(pool.connection(&ChainId::from("kusama")).is_some());
    }

    struct Reentrant {
        pool: ConnectionPool,
        observed: Mutex<Vec<bool>>,
    }

    impl Reentrant {
        fn observed(&self) -> Vec<bool> {
            self.observed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl ConnectionStateSubscriber for Reentrant {
        fn on_state_change(&self, chain_id: &ChainId, _state: &ConnectionState) {
            // Calling back into the pool from a delivery must not deadlock.
            let looked_up = self.pool.connection(chain_id).is_some();
            self.observed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(looked_up);
        }
    }

    #[tokio::test]
    async fn delivery_happens_outside_the_registry_lock() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));

        let reentrant = Arc::new(Reentrant {
            pool: pool.clone(),
            observed: Mutex::new(Vec::new()),
        });
        let shared = Arc::clone(&reentrant);
        let subscriber: Arc<dyn ConnectionStateSubscriber> = shared;
        pool.subscribe(&subscriber, &ChainId::from("polkadot"));
        settle(|| reentrant.observed().len() == 1).await;

        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        transport.emit(connected("ws://127.0.0.1:9944/"));

        settle(|| reentrant.observed().len() == 2).await;
        assert!(reentrant.observed().iter().all(|looked_up| *looked_up));
    }

    #[tokio::test]
    async fn chain_states_snapshots_every_registered_chain() {
        let (pool, factory) = pool_with_mock();
        let _ = pool.setup_connection(&chain("polkadot"));
        let _ = pool.setup_connection(&chain("kusama"));
        let transport = factory.transports().into_iter().next().unwrap_or_else(|| {
            panic!("transport recorded");
        });
        transport.emit(connected("ws://127.0.0.1:9944/"));

        let mut states = pool.chain_states();
        states.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        assert_eq!(states.len(), 2);
        let statuses: Vec<&'static str> =
            states.iter().map(|(_, state)| state.status_str()).collect();
        assert_eq!(statuses, vec!["not_connected", "connected"]);
    }
}
