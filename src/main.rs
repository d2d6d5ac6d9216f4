use std::io::{self, BufRead, Write};
use std::{env, fs, process};

use grace_compiler::Compiler;
use grace_core::bytecode::disassemble_chunk;
use grace_core::errors::report_errors_list;
use grace_core::{InterpretResult, VERSION};
use grace_objects::Heap;
use grace_vm::VM;

fn main() {
  // structure: grace <flags?> <filename?>
  let args = env::args().collect::<Vec<String>>();

  match args.as_slice() {
    [_] => run_repl(),
    [_, file] => run_file(file),
    [_, flag, file] if flag == "--bytecode" => show_bytecode(file),
    _ => {
      eprintln!("Usage: grace [--bytecode] [script]");
      process::exit(64);
    }
  }
}

/// Runs a script file, mapping the interpretation result to the
/// conventional process exit codes.
fn run_file(filename: &str) {
  let source = read_file(filename);

  let stdout = io::stdout();
  let stderr = io::stderr();
  let mut out = stdout.lock();
  let mut err = stderr.lock();

  let mut vm = VM::new(&mut out, &mut err);
  match vm.interpret(&source) {
    InterpretResult::CompileError => process::exit(65),
    InterpretResult::RuntimeError => process::exit(70),
    InterpretResult::Ok => {}
  }
}

/// An interactive session. One virtual machine lives for the whole session,
/// so globals defined on one line stay visible on the next.
fn run_repl() {
  println!("Grace {}", VERSION);

  let stdout = io::stdout();
  let stderr = io::stderr();
  let mut out = stdout.lock();
  let mut err = stderr.lock();
  let mut vm = VM::new(&mut out, &mut err);

  let stdin = io::stdin();
  loop {
    print!("> ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
      Ok(0) | Err(_) => break,
      Ok(_) => {}
    }

    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    vm.interpret(line);
  }
}

/// Compiles a script and prints its disassembly without running it.
fn show_bytecode(filename: &str) {
  let source = read_file(filename);
  let chars: Vec<char> = source.chars().collect();
  let mut heap = Heap::default();

  match Compiler::compile(&chars, &mut heap) {
    Ok(chunk) => print!("{}", disassemble_chunk(&chunk, "<script>")),
    Err(errors) => {
      let stderr = io::stderr();
      let mut err = stderr.lock();
      report_errors_list(&errors, &mut err);
      process::exit(65);
    }
  }
}

fn read_file(filename: &str) -> String {
  match fs::read_to_string(filename) {
    Ok(contents) => contents,
    Err(error) => {
      match error.kind() {
        io::ErrorKind::NotFound => eprintln!("File '{}' not found.", filename),
        io::ErrorKind::PermissionDenied => eprintln!("Need permission to open '{}'.", filename),
        _ => eprintln!("Unexpected error when opening file '{}'.", filename),
      };

      process::exit(74);
    }
  }
}
