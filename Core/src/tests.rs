use std::rc::Rc;

use crate::bytecode::{disassemble_chunk, OpCode};
use crate::chunk::Chunk;
use crate::errors::{report_errors_list, ErrorReport, ErrorSite};
use crate::objects::func_obj::FuncObj;
use crate::objects::str_obj::{hash_string, StrObj};
use crate::objects::Object;
use crate::table::Table;
use crate::tokens::{make_identifier_kind, TokenKind};
use crate::values::Value;

fn interned(chars: &str) -> Rc<StrObj> {
  Rc::new(StrObj::new(chars.to_string()))
}

#[test]
fn values_of_different_kinds_are_never_equal() {
  let pairs = [
    (Value::Nil, Value::Bool(false)),
    (Value::Bool(false), Value::Number(0.0)),
    (Value::Number(0.0), Value::Nil),
    (Value::Obj(Object::Str(interned("0"))), Value::Number(0.0)),
  ];

  for (left, right) in pairs {
    if left == right {
      panic!("{:?} and {:?} should not be equal.", left, right);
    }
  }
}

#[test]
fn only_nil_and_false_are_falsy() {
  assert!(Value::Nil.is_falsy());
  assert!(Value::Bool(false).is_falsy());

  assert!(!Value::Bool(true).is_falsy());
  assert!(!Value::Number(0.0).is_falsy());
  assert!(!Value::Obj(Object::Str(interned(""))).is_falsy());
}

#[test]
fn string_equality_is_handle_identity() {
  let a = interned("grace");
  let b = interned("grace");

  // Same bytes, different heap objects: a table or `==` must not conflate
  // them. Interning is what collapses these in the running system.
  assert_eq!(Value::from(Rc::clone(&a)), Value::from(Rc::clone(&a)));
  assert_ne!(Value::from(a), Value::from(b));
}

#[test]
fn value_display_matches_print_output() {
  assert_eq!(format!("{}", Value::Nil), "nil");
  assert_eq!(format!("{}", Value::Bool(true)), "true");
  assert_eq!(format!("{}", Value::Number(7.0)), "7");
  assert_eq!(format!("{}", Value::Number(2.5)), "2.5");
  assert_eq!(format!("{}", Value::from(interned("str"))), "str");
}

#[test]
fn function_display_uses_name_or_script() {
  let named = Value::from(FuncObj {
    arity: 0,
    chunk: Chunk::default(),
    name: Some(interned("clock")),
  });
  let script = Value::from(FuncObj { arity: 0, chunk: Chunk::default(), name: None });

  assert_eq!(format!("{}", named), "<fn clock>");
  assert_eq!(format!("{}", script), "<script>");
}

#[test]
fn table_set_then_get_round_trips() {
  let mut table = Table::default();
  let key = interned("answer");

  assert!(table.set(Rc::clone(&key), Value::Number(42.0)));

  match table.get(&key) {
    Some(Value::Number(n)) => assert_eq!(*n, 42.0),
    _ => panic!("Key should be present after set."),
  }
}

#[test]
fn table_set_reports_whether_the_key_was_new() {
  let mut table = Table::default();
  let key = interned("x");

  assert!(table.set(Rc::clone(&key), Value::Number(1.0)));
  assert!(!table.set(Rc::clone(&key), Value::Number(2.0)));

  match table.get(&key) {
    Some(Value::Number(n)) => assert_eq!(*n, 2.0),
    _ => panic!("Key should hold the updated value."),
  }
}

#[test]
fn table_lookups_are_by_identity_not_content() {
  let mut table = Table::default();
  let canonical = interned("name");
  let impostor = interned("name");

  table.set(Rc::clone(&canonical), Value::Bool(true));

  assert!(table.get(&canonical).is_some());
  assert!(table.get(&impostor).is_none());
}

#[test]
fn table_delete_leaves_probe_chains_intact() {
  let mut table = Table::default();
  let keys: Vec<Rc<StrObj>> = (0..32).map(|i| interned(&format!("key{}", i))).collect();

  for key in &keys {
    table.set(Rc::clone(key), Value::Number(1.0));
  }

  // Deleting from the middle must not cut off any key that probed past the
  // deleted slot.
  assert!(table.delete(&keys[11]));
  assert!(!table.delete(&keys[11]));
  assert!(table.get(&keys[11]).is_none());

  for (i, key) in keys.iter().enumerate() {
    if i != 11 && table.get(key).is_none() {
      panic!("Key 'key{}' was lost after an unrelated delete.", i);
    }
  }
}

#[test]
fn table_count_includes_tombstones_until_resize() {
  let mut table = Table::default();
  let first = interned("first");
  let second = interned("second");

  table.set(Rc::clone(&first), Value::Nil);
  table.set(Rc::clone(&second), Value::Nil);
  assert_eq!(table.count(), 2);

  table.delete(&first);
  assert_eq!(table.count(), 2);

  // Growing re-probes only live entries, dropping the tombstone.
  for i in 0..16 {
    table.set(interned(&format!("grow{}", i)), Value::Nil);
  }
  assert_eq!(table.count(), 17);
  assert!(table.get(&second).is_some());
}

#[test]
fn table_grows_by_doubling_from_eight() {
  let mut table = Table::default();
  assert_eq!(table.capacity(), 0);

  table.set(interned("a"), Value::Nil);
  assert_eq!(table.capacity(), 8);

  for i in 0..6 {
    table.set(interned(&format!("b{}", i)), Value::Nil);
  }
  assert_eq!(table.capacity(), 16);
}

#[test]
fn find_string_resolves_by_content() {
  let mut table = Table::default();
  let key = interned("shared");
  table.set(Rc::clone(&key), Value::Nil);

  let hash = hash_string("shared");
  match table.find_string("shared", hash) {
    Some(found) => assert!(Rc::ptr_eq(&found, &key)),
    None => panic!("Content lookup should find the stored key."),
  }

  assert!(table.find_string("missing", hash_string("missing")).is_none());
}

#[test]
fn find_string_rejects_hash_collisions_by_bytes() {
  let mut table = Table::default();
  // A forged key whose hash collides with "real" but whose bytes differ.
  let fake = Rc::new(StrObj { chars: "fake".to_string(), hash: hash_string("real") });
  table.set(fake, Value::Nil);

  assert!(table.find_string("real", hash_string("real")).is_none());
}

#[test]
fn chunk_keeps_lines_parallel_to_instructions() {
  let mut chunk = Chunk::default();
  chunk.push_byte(OpCode::LoadImmNil as u8, 1);
  chunk.push_short(0xABCD, 2);

  assert_eq!(chunk.len(), 3);
  assert_eq!(chunk.get_line(0), 1);
  assert_eq!(chunk.get_line(1), 2);
  assert_eq!(chunk.get_line(2), 2);
}

#[test]
fn chunk_shorts_are_big_endian() {
  let mut chunk = Chunk::default();
  chunk.push_short(0x0102, 1);

  assert_eq!(chunk.get_byte(0), 0x01);
  assert_eq!(chunk.get_byte(1), 0x02);
  assert_eq!(chunk.get_short(0), 0x0102);

  chunk.patch_short(0, 0xFFFE);
  assert_eq!(chunk.get_short(0), 0xFFFE);
}

#[test]
fn chunk_identifier_slots_are_deduplicated() {
  let mut chunk = Chunk::default();
  let name = interned("counter");
  let other = interned("total");

  let first = chunk.add_identifier(Rc::clone(&name));
  let second = chunk.add_identifier(Rc::clone(&name));
  let third = chunk.add_identifier(other);

  assert_eq!(first, second);
  assert_ne!(first, third);
  assert_eq!(chunk.pool_size(), 2);

  match chunk.get_constant(first) {
    Value::Obj(Object::Str(s)) => assert!(Rc::ptr_eq(s, &name)),
    _ => panic!("Identifier slots should hold the interned name."),
  }
}

#[test]
fn op_codes_survive_byte_round_trips() {
  let ops = [OpCode::Add, OpCode::LoadConstant, OpCode::JumpIfFalse, OpCode::LoopJump, OpCode::Return];

  for op in ops {
    assert_eq!(OpCode::from_byte(op as u8), op);
  }
}

#[test]
fn disassembler_lists_operands_and_jump_targets() {
  let mut chunk = Chunk::default();
  let idx = chunk.add_constant(Value::Number(3.5)) as u8;
  chunk.push_byte(OpCode::LoadConstant as u8, 1);
  chunk.push_byte(idx, 1);
  chunk.push_byte(OpCode::JumpIfFalse as u8, 1);
  chunk.push_short(1, 1);
  chunk.push_byte(OpCode::Return as u8, 2);

  let listing = disassemble_chunk(&chunk, "test");

  assert!(listing.starts_with("== test ==\n"));
  assert!(listing.contains("LoadConstant"));
  assert!(listing.contains("3.5"));
  assert!(listing.contains("-> 6"));
  assert!(listing.contains("Return"));
}

#[test]
fn error_reports_render_in_diagnostic_format() {
  let errors = vec![
    ErrorReport {
      line: 3,
      site: ErrorSite::At("fern".to_string()),
      message: "Expect expression.".to_string(),
    },
    ErrorReport { line: 9, site: ErrorSite::AtEnd, message: "Expect ';' after value.".to_string() },
    ErrorReport { line: 1, site: ErrorSite::Plain, message: "Unterminated string.".to_string() },
  ];

  let mut sink: Vec<u8> = vec![];
  report_errors_list(&errors, &mut sink);
  let text = String::from_utf8(sink).unwrap();

  assert!(text.contains("\n[line 3] Error at 'fern': Expect expression.\n"));
  assert!(text.contains("\n[line 9] Error at end: Expect ';' after value.\n"));
  assert!(text.contains("\n[line 1] Error: Unterminated string.\n"));
}

#[test]
fn keywords_map_to_their_token_kinds() {
  assert_eq!(make_identifier_kind("var"), TokenKind::VAR_KW);
  assert_eq!(make_identifier_kind("print"), TokenKind::PRINT_KW);
  assert_eq!(make_identifier_kind("nil"), TokenKind::NIL_LIT);
  assert_eq!(make_identifier_kind("true"), TokenKind::TRUE_LIT);
  assert_eq!(make_identifier_kind("variable"), TokenKind::IDENTIFIER);
  assert_eq!(make_identifier_kind("prints"), TokenKind::IDENTIFIER);
}
