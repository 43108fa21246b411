//! Hot-swappable configuration handle.
//!
//! Tracking decisions happen on every keystroke while configuration may be
//! replaced at any moment (file reload, settings command). Readers take a fresh
//! snapshot per decision and never hold one across events.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::Config;

/// Shared, lock-free handle to the current [`Config`].
#[derive(Debug, Clone)]
pub struct SharedConfig {
	snap: Arc<ArcSwap<Config>>,
}

impl SharedConfig {
	/// Wraps an initial configuration.
	pub fn new(config: Config) -> Self {
		Self {
			snap: Arc::new(ArcSwap::from_pointee(config)),
		}
	}

	/// Loads the current snapshot.
	pub fn snapshot(&self) -> Arc<Config> {
		self.snap.load_full()
	}

	/// Replaces the configuration wholesale.
	pub fn store(&self, config: Config) {
		self.snap.store(Arc::new(config));
	}

	/// Applies `f` to a copy of the current configuration and publishes it.
	pub fn update(&self, f: impl Fn(&mut Config)) {
		self.snap.rcu(|current| {
			let mut next = Config::clone(current);
			f(&mut next);
			next
		});
	}
}

impl Default for SharedConfig {
	fn default() -> Self {
		Self::new(Config::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_update_is_visible_to_clones() {
		let shared = SharedConfig::default();
		let reader = shared.clone();
		assert!(reader.snapshot().completions_enabled("html"));

		shared.update(|c| c.abbreviation.completions = false);
		assert!(!reader.snapshot().completions_enabled("html"));
	}

	#[test]
	fn test_old_snapshot_is_stable() {
		let shared = SharedConfig::default();
		let before = shared.snapshot();
		shared.update(|c| c.abbreviation.jsx_prefix = "<<".into());
		assert_eq!(before.abbreviation.jsx_prefix, "<");
		assert_eq!(shared.snapshot().abbreviation.jsx_prefix, "<<");
	}
}
