//! # Cart Store
//!
//! Owns the live cart, publishes it to observers and writes it through to
//! the key-value store.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Caller                 CartStore (Mutex<Cart>)        Writer task      │
//! │  ──────                 ───────────────────────        ───────────      │
//! │                                                                         │
//! │  add_to_cart() ───────► cart.add() ──┬─► watch: CartSnapshot           │
//! │  remove_from_cart()                  │                                  │
//! │  increase_quantity()                 └─► mpsc: Save(items) ──► kv.set  │
//! │  decrease_quantity()                                                    │
//! │                                                                         │
//! │  clear_cart() ────────► cart.clear() ──► mpsc: Delete ──────► kv.delete│
//! │                                                                         │
//! │  flush().await ───────────────────────► mpsc: Flush ──► ack when done  │
//! │                                                                         │
//! │  NOTE: Mutators never wait on the database. Write failures are          │
//! │        logged and dropped; the in-memory cart stays authoritative.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Ordering
//! A single writer task applies commands in the order the mutators queued
//! them. Saves that pile up while a write is in flight are coalesced to
//! the newest one, so an older snapshot can never overwrite a newer one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use storefront_core::{Cart, CartItem, CoreResult, Money, Product, RuleSet, CART_STORAGE_KEY};
use storefront_db::KvRepository;

// =============================================================================
// Snapshot
// =============================================================================

/// Cart totals summary for observers and API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
    pub original_total_cents: i64,
    pub savings_cents: i64,
    /// Formatted total, e.g. `R$ 35,00`
    pub total_display: String,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total().cents(),
            original_total_cents: cart.original_total().cents(),
            savings_cents: cart.savings().cents(),
            total_display: cart.total().to_string(),
        }
    }
}

/// What observers see after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl CartSnapshot {
    /// The discounted amount to pay.
    pub fn total(&self) -> Money {
        Money::from_cents(self.totals.total_cents)
    }
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            items: cart.items().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

// =============================================================================
// Writer Task
// =============================================================================

#[derive(Debug)]
enum PendingWrite {
    Save(Vec<CartItem>),
    Delete,
}

#[derive(Debug)]
enum PersistCommand {
    Write(PendingWrite),
    Flush(oneshot::Sender<()>),
}

/// Applies queued writes until every sender is dropped.
async fn run_writer(kv: KvRepository, mut rx: mpsc::UnboundedReceiver<PersistCommand>) {
    debug!("Cart writer started");

    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = rx.try_recv() {
            batch.push(next);
        }

        let mut latest: Option<PendingWrite> = None;
        for command in batch {
            match command {
                PersistCommand::Write(write) => latest = Some(write),
                PersistCommand::Flush(ack) => {
                    if let Some(write) = latest.take() {
                        apply_write(&kv, write).await;
                    }
                    // Receiver may have given up waiting
                    let _ = ack.send(());
                }
            }
        }

        if let Some(write) = latest {
            apply_write(&kv, write).await;
        }
    }

    debug!("Cart writer stopped");
}

async fn apply_write(kv: &KvRepository, write: PendingWrite) {
    let result = match write {
        PendingWrite::Save(items) => {
            debug!(items = items.len(), "Persisting cart");
            kv.set_json(CART_STORAGE_KEY, &items).await
        }
        PendingWrite::Delete => {
            debug!("Deleting persisted cart");
            kv.delete(CART_STORAGE_KEY).await.map(|_| ())
        }
    };

    if let Err(e) = result {
        warn!(error = %e, "Failed to persist cart");
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The live cart plus its observers and write-through persistence.
///
/// Created once at startup and shared by reference; there is no global
/// instance. Must be created inside a Tokio runtime, since it spawns the
/// writer task.
///
/// ## Usage
/// ```rust,ignore
/// let store = CartStore::restore(db.kv(), RuleSet::active()).await;
/// let mut updates = store.subscribe();
///
/// store.add_to_cart(&bread, 2)?;
/// assert_eq!(updates.borrow_and_update().totals.total_quantity, 2);
///
/// store.flush().await;
/// ```
#[derive(Debug)]
pub struct CartStore {
    cart: Mutex<Cart>,
    rules: RuleSet,
    snapshot_tx: watch::Sender<CartSnapshot>,
    open_tx: watch::Sender<bool>,
    persist_tx: mpsc::UnboundedSender<PersistCommand>,
}

impl CartStore {
    /// Creates a store around `cart` and starts its writer task.
    pub fn new(kv: KvRepository, rules: RuleSet, cart: Cart) -> Self {
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(kv, persist_rx));

        let (snapshot_tx, _) = watch::channel(CartSnapshot::from(&cart));
        let (open_tx, _) = watch::channel(false);

        CartStore {
            cart: Mutex::new(cart),
            rules,
            snapshot_tx,
            open_tx,
            persist_tx,
        }
    }

    /// Loads the persisted cart once and builds the store around it.
    ///
    /// A missing key gives an empty cart. So does a read or decode failure,
    /// which is logged and otherwise ignored.
    pub async fn restore(kv: KvRepository, rules: RuleSet) -> Self {
        let cart = match kv.get_json::<Vec<CartItem>>(CART_STORAGE_KEY).await {
            Ok(Some(items)) => {
                let cart = Cart::from_items(items);
                info!(items = cart.item_count(), "Restored persisted cart");
                cart
            }
            Ok(None) => {
                debug!("No persisted cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load persisted cart, starting empty");
                Cart::new()
            }
        };

        CartStore::new(kv, rules, cart)
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Adds `quantity` units of `product`.
    ///
    /// A product already in the cart keeps the discount it was added with;
    /// a new one gets whatever the active rules give it now.
    pub fn add_to_cart(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        self.mutate(|cart| cart.add(product, quantity, &self.rules).map(|()| true))?;
        Ok(())
    }

    /// Removes a product line. Returns `false` if it was not in the cart.
    pub fn remove_from_cart(&self, product_id: &str) -> bool {
        self.mutate_infallible(|cart| cart.remove(product_id))
    }

    /// Adds one unit. Returns `false` if the product was not in the cart.
    pub fn increase_quantity(&self, product_id: &str) -> CoreResult<bool> {
        self.mutate(|cart| cart.increase(product_id))
    }

    /// Removes one unit, dropping the line at zero. Returns `false` if the
    /// product was not in the cart.
    pub fn decrease_quantity(&self, product_id: &str) -> bool {
        self.mutate_infallible(|cart| cart.decrease(product_id))
    }

    /// Empties the cart and deletes the persisted copy.
    pub fn clear_cart(&self) {
        let mut cart = self.lock();
        cart.clear();
        self.publish(&cart);
        self.schedule(PendingWrite::Delete);
    }

    // -------------------------------------------------------------------------
    // Readers
    // -------------------------------------------------------------------------

    /// Current contents and totals.
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Discounted total of the current cart.
    pub fn total_price(&self) -> Money {
        self.lock().total()
    }

    /// Runs `f` against the cart under the lock.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Rules applied to newly added products.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Receives the latest snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot_tx.subscribe()
    }

    // -------------------------------------------------------------------------
    // Drawer visibility
    // -------------------------------------------------------------------------

    pub fn is_cart_open(&self) -> bool {
        *self.open_tx.borrow()
    }

    pub fn open_cart(&self) {
        self.set_open(true);
    }

    pub fn close_cart(&self) {
        self.set_open(false);
    }

    pub fn toggle_cart(&self) {
        self.open_tx.send_modify(|open| *open = !*open);
    }

    /// Receives the drawer flag whenever it changes.
    pub fn subscribe_open(&self) -> watch::Receiver<bool> {
        self.open_tx.subscribe()
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Waits until every write queued so far has been applied (or has
    /// failed and been logged).
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.persist_tx.send(PersistCommand::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // A panic mid-mutation leaves a structurally valid Vec behind
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a mutation under the lock. When it reports a change, observers
    /// are notified and a save is queued before the lock is released.
    fn mutate<F>(&self, f: F) -> CoreResult<bool>
    where
        F: FnOnce(&mut Cart) -> CoreResult<bool>,
    {
        let mut cart = self.lock();
        let changed = f(&mut cart)?;
        if changed {
            self.publish(&cart);
            self.schedule(PendingWrite::Save(cart.items().to_vec()));
        }
        Ok(changed)
    }

    fn mutate_infallible<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let mut cart = self.lock();
        let changed = f(&mut cart);
        if changed {
            self.publish(&cart);
            self.schedule(PendingWrite::Save(cart.items().to_vec()));
        }
        changed
    }

    fn publish(&self, cart: &Cart) {
        self.snapshot_tx.send_replace(CartSnapshot::from(cart));
    }

    fn schedule(&self, write: PendingWrite) {
        if self.persist_tx.send(PersistCommand::Write(write)).is_err() {
            warn!("Cart writer is gone, change will not be persisted");
        }
    }

    fn set_open(&self, value: bool) {
        self.open_tx.send_if_modified(|open| {
            let changed = *open != value;
            *open = value;
            changed
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
