use std::rc::Rc;

use crate::objects::str_obj::StrObj;
use crate::values::Value;

/// The max ratio of used slots (tombstones included) to capacity before the
/// entries array grows.
const TABLE_MAX_LOAD: f64 = 0.75;

/// A key-value slot. A slot is in one of three states: empty (no key, `Nil`
/// value), tombstone (no key, non-`Nil` value), or occupied.
#[derive(Clone)]
struct Entry {
  key: Option<Rc<StrObj>>,
  value: Value,
}

impl Entry {
  fn empty() -> Self {
    Entry { key: None, value: Value::Nil }
  }

  fn is_tombstone(&self) -> bool {
    self.key.is_none() && !matches!(self.value, Value::Nil)
  }
}

/// An open-addressed hash table keyed by interned strings.
///
/// Probing is linear and wraps modulo capacity. Because keys are interned,
/// lookups compare handle identity only; `find_string` is the one entry
/// point that compares bytes, and exists to bootstrap interning itself.
#[derive(Default)]
pub struct Table {
  /// Occupied slots plus tombstones.
  count: usize,
  entries: Vec<Entry>,
}

impl Table {
  /// The size of the entries array.
  pub fn capacity(&self) -> usize {
    self.entries.len()
  }

  /// The number of slots counted against the load factor. Tombstones are
  /// included until the next resize reclaims them.
  pub fn count(&self) -> usize {
    self.count
  }

  /// Inserts or updates a key.
  ///
  /// # Parameters
  /// - `key`: The interned key to write.
  /// - `value`: The value to store under the key.
  ///
  /// # Returns
  /// `bool`: True when the key was not present before this call.
  pub fn set(&mut self, key: Rc<StrObj>, value: Value) -> bool {
    if (self.count + 1) as f64 > self.capacity() as f64 * TABLE_MAX_LOAD {
      self.adjust_capacity();
    }

    let index = Self::find_entry(&self.entries, &key);
    let entry = &mut self.entries[index];
    let is_new = entry.key.is_none();

    // A reused tombstone was already counted against the load factor.
    if is_new && !entry.is_tombstone() {
      self.count += 1;
    }

    *entry = Entry { key: Some(key), value };
    is_new
  }

  /// Looks up the value stored under a key.
  pub fn get(&self, key: &Rc<StrObj>) -> Option<&Value> {
    if self.count == 0 {
      return None;
    }

    let index = Self::find_entry(&self.entries, key);
    let entry = &self.entries[index];
    entry.key.as_ref().map(|_| &entry.value)
  }

  /// Removes a key, leaving a tombstone in its slot so that probe chains
  /// running through it stay intact.
  ///
  /// # Returns
  /// `bool`: True when the key was present.
  pub fn delete(&mut self, key: &Rc<StrObj>) -> bool {
    if self.count == 0 {
      return false;
    }

    let index = Self::find_entry(&self.entries, key);
    if self.entries[index].key.is_none() {
      return false;
    }

    self.entries[index] = Entry { key: None, value: Value::Bool(true) };
    true
  }

  /// Resolves a string key by content rather than identity: the interning
  /// lookup. Candidates are rejected on length, then hash, then bytes.
  ///
  /// # Parameters
  /// - `chars`: The string content to look for.
  /// - `hash`: The FNV-1a hash of `chars`.
  pub fn find_string(&self, chars: &str, hash: u32) -> Option<Rc<StrObj>> {
    if self.count == 0 {
      return None;
    }

    let capacity = self.capacity();
    let mut index = hash as usize % capacity;

    loop {
      let entry = &self.entries[index];

      match &entry.key {
        None => {
          // A truly-empty slot ends the probe chain; a tombstone does not.
          if !entry.is_tombstone() {
            return None;
          }
        }
        Some(key) => {
          if key.chars.len() == chars.len() && key.hash == hash && key.chars == chars {
            return Some(Rc::clone(key));
          }
        }
      }

      index = (index + 1) % capacity;
    }
  }

  /// Finds the slot a key lives in, or the slot an insert of it should use.
  /// The first tombstone seen is remembered so inserts can reuse it.
  fn find_entry(entries: &[Entry], key: &Rc<StrObj>) -> usize {
    let capacity = entries.len();
    let mut index = key.hash as usize % capacity;
    let mut tombstone: Option<usize> = None;

    loop {
      let entry = &entries[index];

      match &entry.key {
        Some(k) if Rc::ptr_eq(k, key) => return index,
        Some(_) => {}
        None => {
          if !entry.is_tombstone() {
            return tombstone.unwrap_or(index);
          }

          if tombstone.is_none() {
            tombstone = Some(index);
          }
        }
      }

      index = (index + 1) % capacity;
    }
  }

  /// Grows the entries array (doubling, seeded at 8) and re-probes every
  /// occupied slot into it. Tombstones are reclaimed here, so the count is
  /// rebuilt from the survivors.
  fn adjust_capacity(&mut self) {
    let capacity = if self.capacity() < 8 { 8 } else { self.capacity() * 2 };
    let mut entries = vec![Entry::empty(); capacity];

    self.count = 0;
    for entry in std::mem::take(&mut self.entries) {
      if let Some(key) = entry.key {
        let dest = Self::find_entry(&entries, &key);
        entries[dest] = Entry { key: Some(key), value: entry.value };
        self.count += 1;
      }
    }

    self.entries = entries;
  }
}
