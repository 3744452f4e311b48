use std::fmt::Write;

use crate::bytecode::{Op, Program};

/// Print disassembly of a program
pub fn print_program(program: &Program) {
    print!("{}", format_program(program));
}

/// Indexed listing with the stack height after each instruction.
///
/// ```text
/// ════════════════════════════════════════
///  program
///  9 instructions, arity 1
/// ════════════════════════════════════════
/// 0000  AR 0        ; depth 0
/// 0001  PU          ; depth 1
/// ```
pub fn format_program(program: &Program) -> String {
    let mut out = String::new();

    // writing to a String cannot fail
    let _ = writeln!(out, "════════════════════════════════════════");
    let _ = writeln!(out, " program");
    let _ = writeln!(
        out,
        " {} instructions, arity {}",
        program.len(),
        program.arity()
    );
    let _ = writeln!(out, "════════════════════════════════════════");

    let mut depth: i64 = 0;
    for (ip, op) in program.ops().iter().enumerate() {
        match op {
            Op::Push => depth += 1,
            Op::Pop => depth -= 1,
            _ => {}
        }
        let text = op.to_string();
        if depth < 0 {
            let _ = writeln!(out, "{:04}  {:<10}  ; underflow", ip, text);
        } else {
            let _ = writeln!(out, "{:04}  {:<10}  ; depth {}", ip, text, depth);
        }
    }

    out
}
