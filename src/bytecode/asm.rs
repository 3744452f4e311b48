//! Textual assembly: one instruction per line, `IM 3`, `AR 0`, `SW`, `PU`,
//! `PO`, `AD`, `SU`, `MU`, `DI`.

use std::str::FromStr;

use thiserror::Error;

use crate::bytecode::{Op, Program};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asm error: line {line}: {message}")]
pub struct AsmError {
    pub message: String,
    /// 1-based; 0 when parsing a single instruction.
    pub line: usize,
}

impl AsmError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: 0,
        }
    }

    fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

fn operand<T: FromStr>(mnemonic: &str, operand: Option<&str>) -> Result<T, AsmError> {
    let text = operand.ok_or_else(|| AsmError::new(format!("'{}' needs an operand", mnemonic)))?;
    text.parse()
        .map_err(|_| AsmError::new(format!("invalid operand for '{}': {}", mnemonic, text)))
}

impl FromStr for Op {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let mnemonic = parts
            .next()
            .ok_or_else(|| AsmError::new("empty instruction"))?;
        let arg = parts.next();

        let op = match mnemonic {
            "IM" => Op::Imm(operand(mnemonic, arg)?),
            "AR" => Op::Arg(operand(mnemonic, arg)?),
            "SW" => Op::Swap,
            "PU" => Op::Push,
            "PO" => Op::Pop,
            "AD" => Op::Add,
            "SU" => Op::Sub,
            "MU" => Op::Mul,
            "DI" => Op::Div,
            other => return Err(AsmError::new(format!("unknown mnemonic: {}", other))),
        };

        let extra = if matches!(op, Op::Imm(_) | Op::Arg(_)) {
            parts.next()
        } else {
            arg
        };
        if let Some(extra) = extra {
            return Err(AsmError::new(format!(
                "unexpected operand for '{}': {}",
                mnemonic, extra
            )));
        }

        Ok(op)
    }
}

impl FromStr for Program {
    type Err = AsmError;

    /// Parses a listing as produced by `Display for Program`. Blank lines are
    /// ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| line.parse::<Op>().map_err(|e| e.at_line(i + 1)))
            .collect::<Result<Vec<_>, _>>()
            .map(Program::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_mnemonic() {
        assert_eq!("IM 42".parse::<Op>().unwrap(), Op::Imm(42));
        assert_eq!("IM -3".parse::<Op>().unwrap(), Op::Imm(-3));
        assert_eq!("AR 1".parse::<Op>().unwrap(), Op::Arg(1));
        assert_eq!("SW".parse::<Op>().unwrap(), Op::Swap);
        assert_eq!("PU".parse::<Op>().unwrap(), Op::Push);
        assert_eq!("PO".parse::<Op>().unwrap(), Op::Pop);
        assert_eq!("AD".parse::<Op>().unwrap(), Op::Add);
        assert_eq!("SU".parse::<Op>().unwrap(), Op::Sub);
        assert_eq!("MU".parse::<Op>().unwrap(), Op::Mul);
        assert_eq!("DI".parse::<Op>().unwrap(), Op::Div);
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!("  AR   0 ".parse::<Op>().unwrap(), Op::Arg(0));
    }

    #[test]
    fn test_missing_operand() {
        let err = "IM".parse::<Op>().unwrap_err();
        assert!(err.message.contains("needs an operand"));
    }

    #[test]
    fn test_negative_slot_rejected() {
        let err = "AR -1".parse::<Op>().unwrap_err();
        assert!(err.message.contains("invalid operand"));
    }

    #[test]
    fn test_extra_operand() {
        assert!("PU 1".parse::<Op>().is_err());
        assert!("IM 1 2".parse::<Op>().is_err());
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = "XX".parse::<Op>().unwrap_err();
        assert_eq!(err.message, "unknown mnemonic: XX");
    }

    #[test]
    fn test_program_listing() {
        let program: Program = "IM 2\nPU\n\nAR 0\nPU\n".parse().unwrap();
        assert_eq!(program.ops(), [Op::Imm(2), Op::Push, Op::Arg(0), Op::Push]);
    }

    #[test]
    fn test_program_error_reports_line() {
        let err = "IM 2\nPU\nNOPE\n".parse::<Program>().unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.to_string(), "asm error: line 3: unknown mnemonic: NOPE");
    }

    #[test]
    fn test_display_parses_back() {
        let program = Program::new(vec![
            Op::Arg(0),
            Op::Push,
            Op::Imm(-9),
            Op::Push,
            Op::Pop,
            Op::Swap,
            Op::Pop,
            Op::Mul,
            Op::Push,
        ]);
        assert_eq!(program.to_string().parse::<Program>().unwrap(), program);
    }
}
