use std::rc::Rc;

use grace_core::objects::str_obj::{hash_string, StrObj};
use grace_core::objects::Object;
use grace_core::table::Table;
use grace_core::values::Value;


/// The managed object heap.
///
/// Owns every object allocated during a session: the allocation list keeps
/// each object alive until the heap is dropped (there is no collection
/// before teardown), and the intern table guarantees at most one canonical
/// `StrObj` per distinct byte content.
#[derive(Default)]
pub struct Heap {
  /// Every allocated object, in allocation order.
  objects: Vec<Object>,
  /// The string intern table. Presence of a key is the interning witness;
  /// the stored values are always `Nil`.
  strings: Table,
}

impl Heap {
  /// Interns a string from a borrowed slice, copying the bytes only when no
  /// canonical object exists for them yet.
  ///
  /// # Parameters
  /// - `chars`: The string content to intern.
  ///
  /// # Returns
  /// `Rc<StrObj>`: The canonical object for the given content.
  pub fn copy_string(&mut self, chars: &str) -> Rc<StrObj> {
    let hash = hash_string(chars);

    match self.strings.find_string(chars, hash) {
      Some(interned) => interned,
      None => self.allocate_string(chars.to_owned(), hash),
    }
  }

  /// Interns a string that already owns its buffer. The buffer is dropped
  /// when an equal string was interned before; otherwise it becomes the
  /// canonical object without another copy.
  pub fn take_string(&mut self, chars: String) -> Rc<StrObj> {
    let hash = hash_string(&chars);

    match self.strings.find_string(&chars, hash) {
      Some(interned) => interned,
      None => self.allocate_string(chars, hash),
    }
  }

  /// The number of objects currently owned by the heap.
  pub fn objects_count(&self) -> usize {
    self.objects.len()
  }

  fn allocate_string(&mut self, chars: String, hash: u32) -> Rc<StrObj> {
    let obj = Rc::new(StrObj { chars, hash });
    self.objects.push(Object::Str(Rc::clone(&obj)));
    self.strings.set(Rc::clone(&obj), Value::Nil);
    obj
  }
}
