use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use crate::objects::Object;
use crate::values::Value;

const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;

/// An immutable string object. Instances are interned: at most one exists
/// per distinct byte content, so handle identity doubles as equality.
pub struct StrObj {
  pub chars: String,
  /// The precomputed FNV-1a hash of `chars`.
  pub hash: u32,
}

impl StrObj {
  pub fn new(chars: String) -> Self {
    let hash = hash_string(&chars);
    StrObj { chars, hash }
  }

  pub fn len(&self) -> usize {
    self.chars.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chars.is_empty()
  }
}

/// Hashes a string with the 32-bit FNV-1a function.
pub fn hash_string(text: &str) -> u32 {
  let mut hash = FNV_OFFSET_BASIS;

  for byte in text.bytes() {
    hash ^= byte as u32;
    hash = hash.wrapping_mul(FNV_PRIME);
  }

  hash
}

impl From<Rc<StrObj>> for Value {
  fn from(v: Rc<StrObj>) -> Self {
    Value::Obj(Object::Str(v))
  }
}

impl Debug for StrObj {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "'{}'", self.chars)
  }
}
