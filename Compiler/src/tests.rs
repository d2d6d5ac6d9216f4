use std::rc::Rc;

use grace_core::bytecode::OpCode;
use grace_core::chunk::Chunk;
use grace_core::errors::ErrorReport;
use grace_core::objects::Object;
use grace_core::values::Value;
use grace_objects::Heap;

use crate::Compiler;

fn compile_source(src: &str) -> Result<Chunk, Vec<ErrorReport>> {
  let chars: Vec<char> = src.chars().collect();
  let mut heap = Heap::default();
  Compiler::compile(&chars, &mut heap)
}

fn compile_ok(src: &str) -> Chunk {
  match compile_source(src) {
    Ok(chunk) => chunk,
    Err(_) => panic!("Compiler Had Errors."),
  }
}

fn compile_err(src: &str) -> Vec<ErrorReport> {
  match compile_source(src) {
    Ok(_) => panic!("Compiler should have reported errors."),
    Err(errors) => errors,
  }
}

fn bytes_of(chunk: &Chunk) -> Vec<u8> {
  (0..chunk.len()).map(|i| chunk.get_byte(i)).collect()
}

#[test]
fn arithmetic_respects_precedence() {
  let chunk = compile_ok("1 + 2 * 3;");

  // The multiplication binds tighter, so it lands before the addition.
  let expected = vec![
    OpCode::LoadConstant as u8,
    0,
    OpCode::LoadConstant as u8,
    1,
    OpCode::LoadConstant as u8,
    2,
    OpCode::Multiply as u8,
    OpCode::Add as u8,
    OpCode::PopStackTop as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);
}

#[test]
fn grouping_overrides_precedence() {
  let chunk = compile_ok("-(1 + 2);");

  let expected = vec![
    OpCode::LoadConstant as u8,
    0,
    OpCode::LoadConstant as u8,
    1,
    OpCode::Add as u8,
    OpCode::Negate as u8,
    OpCode::PopStackTop as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);
}

#[test]
fn relaxed_comparisons_compile_to_inverted_pairs() {
  let chunk = compile_ok("1 <= 2;");

  let expected = vec![
    OpCode::LoadConstant as u8,
    0,
    OpCode::LoadConstant as u8,
    1,
    OpCode::GreaterThan as u8,
    OpCode::LogicNot as u8,
    OpCode::PopStackTop as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);
}

#[test]
fn literals_compile_to_immediate_loads() {
  let chunk = compile_ok("true;");

  let expected = vec![
    OpCode::LoadImmTrue as u8,
    OpCode::PopStackTop as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);
  assert_eq!(chunk.pool_size(), 0);
}

#[test]
fn repeated_string_literals_share_one_interned_object() {
  let chars: Vec<char> = "\"twin\" + \"twin\";".chars().collect();
  let mut heap = Heap::default();

  let chunk = match Compiler::compile(&chars, &mut heap) {
    Ok(chunk) => chunk,
    Err(_) => panic!("Compiler Had Errors."),
  };

  let left = chunk.get_constant(0);
  let right = chunk.get_constant(1);
  match (left, right) {
    (Value::Obj(Object::Str(a)), Value::Obj(Object::Str(b))) => assert!(Rc::ptr_eq(a, b)),
    _ => panic!("String literals should compile to string constants."),
  }

  assert_eq!(heap.objects_count(), 1);
}

#[test]
fn global_declarations_define_through_the_identifier_index() {
  let chunk = compile_ok("var a = 1; print a;");

  let expected = vec![
    OpCode::LoadConstant as u8,
    1,
    OpCode::DefineGlobal as u8,
    0,
    OpCode::GetGlobal as u8,
    0,
    OpCode::Print as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);

  // One slot for the name, one for the initializer.
  assert_eq!(chunk.pool_size(), 2);
}

#[test]
fn repeated_global_references_share_one_pool_slot() {
  let chunk = compile_ok("a; a; a;");

  assert_eq!(chunk.pool_size(), 1);
  assert_eq!(chunk.get_byte(0), OpCode::GetGlobal as u8);
  assert_eq!(chunk.get_byte(1), chunk.get_byte(4));
  assert_eq!(chunk.get_byte(1), chunk.get_byte(7));
}

#[test]
fn locals_resolve_to_stack_slots() {
  let chunk = compile_ok("{ var a = 1; print a; }");

  let expected = vec![
    OpCode::LoadConstant as u8,
    0,
    OpCode::GetLocal as u8,
    0,
    OpCode::Print as u8,
    OpCode::PopStackTop as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);

  // Locals never touch the identifier index.
  assert_eq!(chunk.pool_size(), 1);
}

#[test]
fn shadowed_locals_get_their_own_slot() {
  let chunk = compile_ok("{ var a = 1; { var a = 2; print a; } print a; }");

  let expected = vec![
    OpCode::LoadConstant as u8,
    0,
    OpCode::LoadConstant as u8,
    1,
    OpCode::GetLocal as u8,
    1,
    OpCode::Print as u8,
    OpCode::PopStackTop as u8,
    OpCode::GetLocal as u8,
    0,
    OpCode::Print as u8,
    OpCode::PopStackTop as u8,
    OpCode::Return as u8,
  ];
  assert_eq!(bytes_of(&chunk), expected);
}

#[test]
fn if_else_jumps_are_patched_to_branch_boundaries() {
  let chunk = compile_ok("if (true) print 1; else print 2;");

  assert_eq!(chunk.get_byte(0), OpCode::LoadImmTrue as u8);
  assert_eq!(chunk.get_byte(1), OpCode::JumpIfFalse as u8);
  assert_eq!(chunk.get_byte(4), OpCode::PopStackTop as u8);
  assert_eq!(chunk.get_byte(8), OpCode::JumpForward as u8);

  // The conditional jump lands on the pop that opens the else branch; the
  // unconditional one skips the else branch entirely.
  let then_target = 4 + chunk.get_short(2) as usize;
  assert_eq!(chunk.get_byte(then_target), OpCode::PopStackTop as u8);
  assert_eq!(then_target, 11);

  let else_target = 11 + chunk.get_short(9) as usize;
  assert_eq!(chunk.get_byte(else_target), OpCode::Return as u8);
}

#[test]
fn missing_expression_is_reported() {
  let errors = compile_err("print ;");

  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].message, "Expect expression.");
}

#[test]
fn invalid_assignment_target_is_reported() {
  let errors = compile_err("1 = 2;");

  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].message, "Invalid assignment target.");
}

#[test]
fn reading_a_local_in_its_own_initializer_is_reported() {
  let errors = compile_err("{ var a = a; }");

  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].message, "Can't read local variable in its own initializer.");
}

#[test]
fn redeclaring_a_local_in_the_same_scope_is_reported() {
  let errors = compile_err("{ var a = 1; var a = 2; }");

  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].message, "Already a variable with this name in this scope.");
}

#[test]
fn shadowing_in_an_inner_scope_is_allowed() {
  compile_ok("{ var a = 1; { var a = 2; } }");
}

#[test]
fn panic_mode_suppresses_cascades_until_a_statement_boundary() {
  let errors = compile_err("print; print 9;");

  // The second statement compiles cleanly after synchronization, so only
  // the first failure is reported.
  assert_eq!(errors.len(), 1);
  assert_eq!(errors[0].message, "Expect expression.");
}

#[test]
fn scanner_errors_surface_as_compile_errors() {
  let errors = compile_err("print \"abc");

  assert_eq!(errors[0].message, "Unterminated string.");
}

#[test]
fn constant_pool_overflow_is_reported() {
  let source: String = (0..=256).map(|i| format!("{};", i)).collect();
  let errors = compile_err(&source);

  assert_eq!(errors[0].message, "Too many constants in one chunk");
}

#[test]
fn local_overflow_is_reported() {
  let mut source = String::from("{");
  for i in 0..257 {
    source.push_str(&format!("var l{} = 0;", i));
  }
  source.push('}');

  let errors = compile_err(&source);
  assert_eq!(errors[0].message, "Too many local variables in function.");
}

#[test]
fn oversized_jumps_are_reported() {
  // Each `x = x;` compiles to five bytes and no constants, so this body
  // pushes the then-branch well past what a 16-bit offset can skip.
  let source = format!("if (true) {{ {} }}", "x = x;".repeat(13200));
  let errors = compile_err(&source);

  assert_eq!(errors[0].message, "Too much code to jump over.");
}
