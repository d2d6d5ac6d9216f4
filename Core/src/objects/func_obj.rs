use std::rc::Rc;

use crate::chunk::Chunk;
use crate::objects::str_obj::StrObj;
use crate::objects::Object;
use crate::values::Value;

/// A compiled function: its arity, its code, and its interned name (`None`
/// for the top-level script). The compiler does not yet emit the
/// instructions that construct these at runtime.
pub struct FuncObj {
  pub arity: u8,
  pub chunk: Chunk,
  pub name: Option<Rc<StrObj>>,
}

impl From<FuncObj> for Value {
  fn from(v: FuncObj) -> Self {
    Value::Obj(Object::Func(Rc::new(v)))
  }
}
