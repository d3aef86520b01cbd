//! Keeps a holder stocked with one restraint item.
//!
//! Spawning is asynchronous. A latch guarded by its own lock makes sure only
//! one request is outstanding at a time; it is cleared whether the request
//! fails on the spot or its completion comes back.

use std::sync::Arc;

use parking_lot::Mutex;
use protocol::{HolderId, ItemId};
use tracing::{debug, error, info};

use crate::error::{CuffError, Result};

pub type SpawnCallback = Box<dyn FnOnce(Result<ItemId>) + Send>;

pub trait ItemCatalog: Send + Sync {
	fn contains(&self, item_id: &str) -> bool;

	/// Starts spawning `item_id`. `done` runs exactly once unless this
	/// returns an error.
	fn spawn(&self, item_id: &str, done: SpawnCallback) -> Result<()>;
}

pub trait Holder: Send + Sync {
	fn id(&self) -> HolderId;

	fn snap(&self, item: ItemId) -> Result<()>;

	fn set_ragdoll_layer(&self, item: ItemId) -> Result<()>;
}

pub struct CuffPouch {
	item_id: String,
	catalog: Arc<dyn ItemCatalog>,
	holder: Arc<dyn Holder>,
	waiting: Arc<Mutex<bool>>,
}

impl CuffPouch {
	pub fn new(
		item_id: impl Into<String>,
		catalog: Arc<dyn ItemCatalog>,
		holder: Arc<dyn Holder>,
	) -> Self {
		Self {
			item_id: item_id.into(),
			catalog,
			holder,
			waiting: Arc::new(Mutex::new(false)),
		}
	}

	pub fn is_waiting(&self) -> bool {
		*self.waiting.lock()
	}

	/// Stocks the holder for the first time.
	pub fn start(&self) -> bool {
		self.spawn_and_snap()
	}

	/// The holder lost its item.
	pub fn on_unsnapped(&self, item: ItemId) -> bool {
		debug!(holder = %self.holder.id(), %item, "item taken from pouch");
		self.spawn_and_snap()
	}

	/// Requests a replacement unless one is already on its way. Returns
	/// whether a request went out.
	pub fn spawn_and_snap(&self) -> bool {
		{
			let mut waiting = self.waiting.lock();
			if *waiting {
				return false;
			}
			*waiting = true;
		}
		match self.request() {
			Ok(()) => true,
			Err(e) => {
				error!(item = %self.item_id, error = %e, "spawn failed");
				*self.waiting.lock() = false;
				false
			}
		}
	}

	fn request(&self) -> Result<()> {
		if !self.catalog.contains(&self.item_id) {
			return Err(CuffError::ItemNotFound(self.item_id.clone()));
		}
		let holder = self.holder.clone();
		let waiting = self.waiting.clone();
		let item_id = self.item_id.clone();
		self.catalog.spawn(
			&self.item_id,
			Box::new(move |spawned| {
				match spawned.and_then(|item| stock(holder.as_ref(), item)) {
					Ok(item) => info!(item = %item_id, id = %item, holder = %holder.id(), "spawned and snapped"),
					Err(e) => error!(item = %item_id, error = %e, "could not stock pouch"),
				}
				*waiting.lock() = false;
			}),
		)
	}
}

fn stock(holder: &dyn Holder, item: ItemId) -> Result<ItemId> {
	holder.snap(item)?;
	holder.set_ragdoll_layer(item)?;
	Ok(item)
}
