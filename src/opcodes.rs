/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::ast::AddressingMode;

/// Static description of one mnemonic: its opcode/funct fields and the
/// addressing modes it accepts on each side, encoded as a bitmask over
/// `AddressingMode::bit()`.
#[derive(Debug, Copy, Clone)]
pub struct OpcodeInfo {
    pub name: &'static str,
    pub opcode: u8,
    pub funct: u8,
    pub n_operands: usize,
    pub src_mask: u8,
    pub dst_mask: u8,
}

const IMM: u8 = AddressingMode::Immediate.bit();
const DIR: u8 = AddressingMode::Direct.bit();
const REL: u8 = AddressingMode::Relative.bit();
const REG: u8 = AddressingMode::Register.bit();

const NONE: u8 = 0;
const IMM_DIR_REG: u8 = IMM | DIR | REG;
const DIR_REG: u8 = DIR | REG;
const DIR_REL: u8 = DIR | REL;

macro_rules! op {
    ($name:expr, $opcode:expr, $funct:expr, $n:expr, $src:expr, $dst:expr) => {
        OpcodeInfo {
            name: $name,
            opcode: $opcode,
            funct: $funct,
            n_operands: $n,
            src_mask: $src,
            dst_mask: $dst,
        }
    };
}

/// The fixed 16-entry opcode table for this instruction set.
pub static OPCODES: &[OpcodeInfo] = &[
    op!("mov", 0, 0, 2, IMM_DIR_REG, DIR_REG),
    op!("cmp", 1, 0, 2, IMM_DIR_REG, IMM_DIR_REG),
    op!("add", 2, 1, 2, IMM_DIR_REG, DIR_REG),
    op!("sub", 2, 2, 2, IMM_DIR_REG, DIR_REG),
    op!("lea", 4, 0, 2, DIR, DIR_REG),
    op!("clr", 5, 1, 1, NONE, DIR_REG),
    op!("not", 5, 2, 1, NONE, DIR_REG),
    op!("inc", 5, 3, 1, NONE, DIR_REG),
    op!("dec", 5, 4, 1, NONE, DIR_REG),
    op!("jmp", 9, 1, 1, NONE, DIR_REL),
    op!("bne", 9, 2, 1, NONE, DIR_REL),
    op!("jsr", 9, 3, 1, NONE, DIR_REL),
    op!("red", 12, 0, 1, NONE, DIR_REG),
    op!("prn", 13, 0, 1, NONE, IMM_DIR_REG),
    op!("rts", 14, 0, 0, NONE, NONE),
    op!("stop", 15, 0, 0, NONE, NONE),
];

pub fn find(name: &str) -> Option<&'static OpcodeInfo> {
    OPCODES.iter().find(|op| op.name == name)
}

pub fn is_mnemonic(name: &str) -> bool {
    find(name).is_some()
}

impl OpcodeInfo {
    pub fn accepts_src(&self, mode: AddressingMode) -> bool {
        self.src_mask & mode.bit() != 0
    }

    pub fn accepts_dst(&self, mode: AddressingMode) -> bool {
        self.dst_mask & mode.bit() != 0
    }
}

pub const REGISTER_COUNT: u8 = 8;

pub fn register_number(name: &str) -> Option<u8> {
    let rest = name.strip_prefix('r')?;
    let n: u8 = rest.parse().ok()?;
    if n < REGISTER_COUNT { Some(n) } else { None }
}

pub fn is_register_name(name: &str) -> bool {
    register_number(name).is_some()
}

/// Reserved words that can never be used as a label, extern, or entry
/// symbol: the 16 mnemonics, the register names, and the directive keywords.
pub fn is_reserved_name(name: &str) -> bool {
    is_mnemonic(name) || is_register_name(name) || is_directive_keyword(name)
}

/// Reserved words that can never be used as a macro name: the mnemonics and
/// directive keywords. Unlike labels, macro names are not checked against
/// register names.
pub fn is_reserved_macro_name(name: &str) -> bool {
    is_mnemonic(name) || is_directive_keyword(name)
}

fn is_directive_keyword(name: &str) -> bool {
    matches!(name, "data" | "string" | "extern" | "entry" | "mcro" | "mcroend")
}
