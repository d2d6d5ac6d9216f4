use num_traits::FromPrimitive;

use crate::chunk::Chunk;

/// The set of instructions supported by the virtual machine.
///
/// **NOTE:** Changing the order in which members are declared creates
/// incompatibilities between different versions of the interpreter.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[derive(num_derive::FromPrimitive)]
#[repr(u8)]
pub enum OpCode {
  // Instructions with zero chunk operands.
  Add,
  Divide,
  Equals,
  GreaterThan,
  LessThan,
  LoadImmFalse,
  LoadImmNil,
  LoadImmTrue,
  LogicNot,
  Multiply,
  Negate,
  PopStackTop,
  Print,
  Return,
  Subtract,

  // Instructions with one chunk operand.
  // These instructions use the next byte from the chunk as their operand.
  DefineGlobal,
  GetGlobal,
  GetLocal,
  LoadConstant,
  SetGlobal,
  SetLocal,

  // Instructions with two chunk operands.
  // These instructions use the next two bytes (a short) as their operand.
  JumpForward,
  JumpIfFalse,
  LoopJump,
}

impl OpCode {
  /// Decodes a raw chunk byte into its instruction.
  pub fn from_byte(byte: u8) -> OpCode {
    // The compiler only ever emits bytes from this enum at instruction
    // positions, so decoding cannot fail on a well-formed chunk.
    FromPrimitive::from_u8(byte).unwrap()
  }
}

/// Disassembles a full chunk into a human-readable instruction listing.
///
/// # Parameters
/// - `chunk`: The chunk to disassemble.
/// - `name`: The header name for the listing.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
  let mut text = format!("== {} ==\n", name);

  let mut offset = 0;
  while offset < chunk.len() {
    offset = disassemble_instruction(chunk, offset, &mut text);
  }

  text
}

/// Disassembles the single instruction at `offset`, appending one line to
/// `text`.
///
/// # Returns
/// `usize`: The offset of the next instruction.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, text: &mut String) -> usize {
  text.push_str(&format!("{:04} ", offset));

  let line = chunk.get_line(offset);
  if offset > 0 && line == chunk.get_line(offset - 1) {
    text.push_str("   | ");
  } else {
    text.push_str(&format!("{:>4} ", line));
  }

  let instr = OpCode::from_byte(chunk.get_byte(offset));
  match instr {
    // Constant-loading instructions render the pool value next to the operand.
    OpCode::DefineGlobal | OpCode::GetGlobal | OpCode::LoadConstant | OpCode::SetGlobal => {
      let idx = chunk.get_byte(offset + 1) as usize;
      let constant = chunk.get_constant(idx);
      text.push_str(&format!("{:<16} {:>4} ({:?})\n", format!("{:?}", instr), idx, constant));
      offset + 2
    }

    // Local-slot instructions carry a bare stack index.
    OpCode::GetLocal | OpCode::SetLocal => {
      let slot = chunk.get_byte(offset + 1);
      text.push_str(&format!("{:<16} {:>4}\n", format!("{:?}", instr), slot));
      offset + 2
    }

    // Jumps render the target they transfer control to.
    OpCode::JumpForward | OpCode::JumpIfFalse => {
      let jump = chunk.get_short(offset + 1) as usize;
      text.push_str(&format!("{:<16} {:>4} -> {}\n", format!("{:?}", instr), jump, offset + 3 + jump));
      offset + 3
    }
    OpCode::LoopJump => {
      let jump = chunk.get_short(offset + 1) as usize;
      text.push_str(&format!("{:<16} {:>4} -> {}\n", format!("{:?}", instr), jump, offset + 3 - jump));
      offset + 3
    }

    _ => {
      text.push_str(&format!("{:?}\n", instr));
      offset + 1
    }
  }
}
