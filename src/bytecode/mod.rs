pub mod asm;
pub mod compile;
pub mod disasm;
pub mod ir;
pub mod op;
pub mod stack_check;

pub use asm::AsmError;
pub use compile::generate;
pub use ir::Program;
pub use op::Op;
