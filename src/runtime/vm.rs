use tracing::{debug, trace};

use crate::bytecode::stack_check::{StackCheckError, check_ops};
use crate::bytecode::{Op, Program};
use crate::lang::node::BinOp;
use crate::runtime::runtime_error::RuntimeError;

#[derive(Debug, Clone)]
pub struct VmConfig {
    pub max_stack_size: usize,
    /// Run the static stack check before executing.
    pub verify: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_stack_size: 10_000,
            verify: true,
        }
    }
}

/// Registers and stack of one execution.
///
/// Created fresh for every run, so a `Program` never shares state between
/// executions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    /// Primary register; holds the result when execution ends.
    pub r0: i64,
    /// Secondary register; right-hand operand of arithmetic.
    pub r1: i64,
    pub stack: Vec<i64>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes one instruction.
    pub fn step(
        &mut self,
        ip: usize,
        op: &Op,
        args: &[i64],
        max_stack_size: usize,
    ) -> Result<(), RuntimeError> {
        match op {
            Op::Imm(n) => self.r0 = *n,
            Op::Arg(slot) => {
                self.r0 = *args.get(*slot).ok_or(RuntimeError::IndexOutOfRange {
                    ip,
                    slot: *slot,
                    len: args.len(),
                })?;
            }
            Op::Swap => std::mem::swap(&mut self.r0, &mut self.r1),
            Op::Push => {
                if self.stack.len() >= max_stack_size {
                    return Err(RuntimeError::StackLimitExceeded {
                        ip,
                        limit: max_stack_size,
                    });
                }
                self.stack.push(self.r0);
            }
            Op::Pop => {
                self.r0 = self
                    .stack
                    .pop()
                    .ok_or(RuntimeError::StackUnderflow { ip })?;
            }
            Op::Add => self.arith(ip, BinOp::Add)?,
            Op::Sub => self.arith(ip, BinOp::Sub)?,
            Op::Mul => self.arith(ip, BinOp::Mul)?,
            Op::Div => self.arith(ip, BinOp::Div)?,
        }
        Ok(())
    }

    /// r0 := r0 op r1
    fn arith(&mut self, ip: usize, op: BinOp) -> Result<(), RuntimeError> {
        self.r0 = op
            .apply(self.r0, self.r1)
            .ok_or(RuntimeError::DivisionByZero { ip })?;
        Ok(())
    }
}

/// Stack machine interpreter.
///
/// Holds only configuration; every call to `run` or `execute` builds its own
/// `Machine`, so one `Vm` and one `Program` can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Vm {
    config: VmConfig,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Runs `program` and returns the primary register.
    pub fn run(&self, program: &Program, args: &[i64]) -> Result<i64, RuntimeError> {
        self.execute(program, args).map(|machine| machine.r0)
    }

    /// Runs `program` and returns the final machine state.
    pub fn execute(&self, program: &Program, args: &[i64]) -> Result<Machine, RuntimeError> {
        if self.config.verify {
            check_ops(program.ops()).map_err(|e| match e {
                StackCheckError::Underflow { ip, .. } => RuntimeError::StackUnderflow { ip },
            })?;
        }

        let mut machine = Machine::new();

        for (ip, op) in program.ops().iter().enumerate() {
            machine.step(ip, op, args, self.config.max_stack_size)?;
            trace!(
                ip,
                %op,
                r0 = machine.r0,
                r1 = machine.r1,
                depth = machine.stack.len(),
                "step"
            );
        }

        debug!(result = machine.r0, steps = program.len(), "program finished");
        Ok(machine)
    }
}

/// Runs `program` against `args` with the default configuration.
pub fn simulate(program: &Program, args: &[i64]) -> Result<i64, RuntimeError> {
    Vm::new().run(program, args)
}
