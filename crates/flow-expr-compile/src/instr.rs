//! Bit-packed instruction words.
//!
//! One instruction is one 16-bit word: a 3-bit opcode tag in bits 15..13
//! and a 13-bit operand in bits 12..0. The tag values and operand layout
//! are a wire contract with the flow virtual machine; changing either
//! breaks every previously built project.
//!
//! Constructors bounds-check the operand and refuse to truncate: a
//! resolved index of 8192 or more is an [`IndexOutOfRange`] error, never
//! a silently wrapped word.
//!
//! [`IndexOutOfRange`]: crate::ExpressionError::IndexOutOfRange

use crate::error::{ExpressionError, Result};

/// Push a constant-pool value.
pub const TAG_PUSH_CONSTANT: u16 = 0;
/// Push a component input by ordinal.
pub const TAG_PUSH_INPUT: u16 = 1;
/// Push a flow local variable by ordinal.
pub const TAG_PUSH_LOCAL_VAR: u16 = 2;
/// Push a project global variable by ordinal.
pub const TAG_PUSH_GLOBAL_VAR: u16 = 3;
/// Apply an operator by operation index.
pub const TAG_OPERATION: u16 = 4;
/// Terminate the instruction stream.
pub const TAG_END: u16 = 5;

/// Number of operand bits.
const OPERAND_BITS: u16 = 13;

/// Largest encodable operand (0..=8191).
pub const MAX_OPERAND: u16 = (1 << OPERAND_BITS) - 1;

fn encode(tag: u16, what: &'static str, index: usize) -> Result<u16> {
    if index > MAX_OPERAND as usize {
        return Err(ExpressionError::IndexOutOfRange { what, index });
    }
    Ok((tag << OPERAND_BITS) | index as u16)
}

/// `PUSH_CONSTANT` with a constant-pool index.
pub fn push_constant(index: usize) -> Result<u16> {
    encode(TAG_PUSH_CONSTANT, "constant pool", index)
}

/// `PUSH_INPUT` with a component input ordinal.
pub fn push_input(index: usize) -> Result<u16> {
    encode(TAG_PUSH_INPUT, "component input", index)
}

/// `PUSH_LOCAL_VAR` with a flow local ordinal.
pub fn push_local_var(index: usize) -> Result<u16> {
    encode(TAG_PUSH_LOCAL_VAR, "local variable", index)
}

/// `PUSH_GLOBAL_VAR` with a project global ordinal.
pub fn push_global_var(index: usize) -> Result<u16> {
    encode(TAG_PUSH_GLOBAL_VAR, "global variable", index)
}

/// `OPERATION` with an operation index.
pub fn operation(index: usize) -> Result<u16> {
    encode(TAG_OPERATION, "operation", index)
}

/// `END` terminator. Carries no operand.
pub fn end() -> u16 {
    TAG_END << OPERAND_BITS
}

/// Opcode tag of an instruction word.
pub fn tag(word: u16) -> u16 {
    word >> OPERAND_BITS
}

/// Operand of an instruction word.
pub fn operand(word: u16) -> u16 {
    word & MAX_OPERAND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_packs_tag_and_operand() {
        assert_eq!(push_constant(0).unwrap(), 0);
        assert_eq!(push_input(0).unwrap(), 8192);
        assert_eq!(push_local_var(1).unwrap(), 16385);
        assert_eq!(push_global_var(3).unwrap(), 24579);
        assert_eq!(operation(2).unwrap(), 32770);
        assert_eq!(end(), 40960);
    }

    #[test]
    fn decode_round_trips() {
        let word = push_global_var(1234).unwrap();
        assert_eq!(tag(word), TAG_PUSH_GLOBAL_VAR);
        assert_eq!(operand(word), 1234);
    }

    #[test]
    fn operand_limit_enforced() {
        assert!(push_constant(8191).is_ok());
        assert_eq!(
            push_constant(8192),
            Err(ExpressionError::IndexOutOfRange {
                what: "constant pool",
                index: 8192
            })
        );
    }
}
