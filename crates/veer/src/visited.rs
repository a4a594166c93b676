//! Bounded, persisted log of previously-seen URLs and route patterns.

use std::rc::Rc;

/// Persisted list store, keyed by namespace.
///
/// The browser-backed implementation (in `veer-dom`) serializes each
/// list as a JSON array in `localStorage`; tests use
/// [`MemoryListStore`](crate::testing::MemoryListStore).
pub trait ListStore {
	/// Reads the list stored under `key`. Missing keys yield an empty
	/// list.
	fn read_list(&self, key: &str) -> Vec<String>;

	/// Replaces the list stored under `key`.
	fn write_list(&self, key: &str, values: &[String]);
}

/// An append-mostly set of visited keys backed by a [`ListStore`].
///
/// The log is capped; when an accepted addition would exceed the cap,
/// the oldest entry is evicted. Every accepted addition is written
/// through to the store immediately.
pub struct VisitedLog {
	store: Rc<dyn ListStore>,
	key: String,
	cap: usize,
	entries: Vec<String>,
}

impl std::fmt::Debug for VisitedLog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VisitedLog")
			.field("key", &self.key)
			.field("cap", &self.cap)
			.field("len", &self.entries.len())
			.finish()
	}
}

impl VisitedLog {
	/// Loads the log for `key` from the store, discarding empty entries.
	pub fn load(store: Rc<dyn ListStore>, key: impl Into<String>, cap: usize) -> Self {
		let key = key.into();
		let entries: Vec<String> = store
			.read_list(&key)
			.into_iter()
			.filter(|entry| !entry.is_empty())
			.collect();

		Self {
			store,
			key,
			cap,
			entries,
		}
	}

	/// Records a key.
	///
	/// Duplicates are ignored unless `force` is set. Returns whether the
	/// entry was appended.
	pub fn add(&mut self, value: &str, force: bool) -> bool {
		if value.is_empty() {
			return false;
		}
		if !force && self.contains(value) {
			return false;
		}

		self.entries.push(value.to_string());
		while self.entries.len() > self.cap {
			self.entries.remove(0);
		}
		self.store.write_list(&self.key, &self.entries);
		true
	}

	/// Returns whether a key is in the log.
	pub fn contains(&self, value: &str) -> bool {
		self.entries.iter().any(|entry| entry == value)
	}

	/// Returns the logged keys, oldest first.
	pub fn snapshot(&self) -> &[String] {
		&self.entries
	}

	/// Returns the number of logged keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether the log is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MemoryListStore;

	fn log_with_cap(cap: usize) -> (Rc<MemoryListStore>, VisitedLog) {
		let store = Rc::new(MemoryListStore::default());
		let log = VisitedLog::load(store.clone(), "visited", cap);
		(store, log)
	}

	#[test]
	fn test_add_and_contains() {
		let (_, mut log) = log_with_cap(100);

		assert!(log.add("/a", false));
		assert!(log.contains("/a"));
		assert!(!log.contains("/b"));
	}

	#[test]
	fn test_add_is_idempotent_without_force() {
		let (_, mut log) = log_with_cap(100);

		assert!(log.add("/a", false));
		assert!(!log.add("/a", false));
		assert_eq!(log.len(), 1);
	}

	#[test]
	fn test_force_appends_duplicates() {
		let (_, mut log) = log_with_cap(100);

		assert!(log.add("/a", false));
		assert!(log.add("/a", true));
		assert_eq!(log.len(), 2);
	}

	#[test]
	fn test_cap_evicts_oldest() {
		let (_, mut log) = log_with_cap(3);

		log.add("/a", false);
		log.add("/b", false);
		log.add("/c", false);
		log.add("/d", false);

		assert_eq!(log.len(), 3);
		assert!(!log.contains("/a"));
		assert_eq!(log.snapshot(), &["/b", "/c", "/d"]);
	}

	#[test]
	fn test_never_exceeds_cap() {
		let (_, mut log) = log_with_cap(5);

		for i in 0..50 {
			log.add(&format!("/page/{}", i), false);
			assert!(log.len() <= 5);
		}
	}

	#[test]
	fn test_writes_through_to_store() {
		let (store, mut log) = log_with_cap(100);

		log.add("/a", false);
		log.add("/b", false);

		assert_eq!(store.read_list("visited"), vec!["/a", "/b"]);
	}

	#[test]
	fn test_load_filters_empty_entries() {
		let store = Rc::new(MemoryListStore::default());
		store.write_list("visited", &["/a".to_string(), String::new(), "/b".to_string()]);

		let log = VisitedLog::load(store, "visited", 100);
		assert_eq!(log.snapshot(), &["/a", "/b"]);
	}

	#[test]
	fn test_empty_value_rejected() {
		let (_, mut log) = log_with_cap(100);
		assert!(!log.add("", false));
		assert!(log.is_empty());
	}
}
