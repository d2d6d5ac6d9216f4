use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

pub mod func_obj;
pub mod str_obj;

use func_obj::FuncObj;
use str_obj::StrObj;

/// The kinds of heap-allocated objects.
pub enum ObjectKind {
  Str,
  Func,
}

/// A handle to a heap-allocated object.
#[derive(Clone)]
pub enum Object {
  Str(Rc<StrObj>),
  Func(Rc<FuncObj>),
}

impl Object {
  pub fn kind(&self) -> ObjectKind {
    match self {
      Object::Str(_) => ObjectKind::Str,
      Object::Func(_) => ObjectKind::Func,
    }
  }

  /// Tries to extract the underlying `StrObj` handle in this object.
  pub fn as_str_obj(&self) -> Option<&Rc<StrObj>> {
    match self {
      Object::Str(obj) => Some(obj),
      _ => None,
    }
  }
}

impl PartialEq for Object {
  /// Objects compare by heap identity. Interning makes this equivalent to
  /// byte equality for strings.
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Object::Str(a), Object::Str(b)) => Rc::ptr_eq(a, b),
      (Object::Func(a), Object::Func(b)) => Rc::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl Display for Object {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Object::Str(s) => write!(f, "{}", s.chars),
      Object::Func(func) => match &func.name {
        Some(name) => write!(f, "<fn {}>", name.chars),
        None => write!(f, "<script>"),
      },
    }
  }
}

impl Debug for Object {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Object::Str(s) => write!(f, "{:?}", s),
      Object::Func(_) => write!(f, "{}", self),
    }
  }
}
