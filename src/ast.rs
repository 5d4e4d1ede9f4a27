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

/// One addressing-mode form an operand can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `#N` — immediate constant.
    Immediate(i32),
    /// `label` — direct addressing.
    Direct(String),
    /// `&label` — relative (PC-relative) addressing.
    Relative(String),
    /// `rN`, N in 0..=7 — register addressing.
    Register(u8),
}

impl Operand {
    pub fn mode(&self) -> AddressingMode {
        match self {
            Operand::Immediate(_) => AddressingMode::Immediate,
            Operand::Direct(_) => AddressingMode::Direct,
            Operand::Relative(_) => AddressingMode::Relative,
            Operand::Register(_) => AddressingMode::Register,
        }
    }
}

/// The four addressing modes, numbered to match their mode-field encoding
/// in the instruction word.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate = 0,
    Direct = 1,
    Relative = 2,
    Register = 3,
}

impl AddressingMode {
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `.data N, N, ...`
    Data(Vec<i32>),
    /// `.string "..."`
    Str(String),
    /// `.extern label`
    Extern(String),
    /// `.entry label`
    Entry(String),
}

/// The parsed body of a non-blank, non-comment line of the intermediate file,
/// after any leading `label:` has been stripped off.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Instruction { mnemonic: String, operands: Vec<Operand> },
    Directive(Directive),
    /// A label with nothing following it on the line.
    Empty,
}

/// A single parsed line of the intermediate (`.am`) file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub line_number: usize,
    pub label: Option<String>,
    pub statement: Statement,
}
