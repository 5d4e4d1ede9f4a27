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

//! Bit-layout helpers for the 24-bit machine word:
//!
//! ```text
//! 23..18  opcode (6)
//! 17..16  source mode (2)
//! 15..13  source register (3)
//! 12..11  destination mode (2)
//! 10..8   destination register (3)
//! 7..3    function code (5)
//! 2..0    ARE (3)
//! ```

pub const WORD_MASK: u32 = 0xFF_FFFF;
pub const LITERAL_MASK: i64 = 0x1F_FFFF; // 21 bits

pub const ARE_ABSOLUTE: u32 = 0b100;
pub const ARE_RELOCATABLE: u32 = 0b010;
pub const ARE_EXTERNAL: u32 = 0b001;

pub const BASE_ADDRESS: i64 = 100;

#[allow(clippy::too_many_arguments)]
pub fn header_word(
    opcode: u8,
    src_mode: u8,
    src_reg: u8,
    dst_mode: u8,
    dst_reg: u8,
    funct: u8,
) -> u32 {
    let mut word = 0u32;
    word |= (opcode as u32 & 0x3F) << 18;
    word |= (src_mode as u32 & 0x3) << 16;
    word |= (src_reg as u32 & 0x7) << 13;
    word |= (dst_mode as u32 & 0x3) << 11;
    word |= (dst_reg as u32 & 0x7) << 8;
    word |= (funct as u32 & 0x1F) << 3;
    word |= ARE_ABSOLUTE;
    word & WORD_MASK
}

/// One immediate-operand extra word: the 21-bit two's-complement literal in
/// bits 23..3, ARE `A`.
pub fn immediate_word(value: i32) -> u32 {
    let bits = (value as i64) & LITERAL_MASK;
    ((bits as u32) << 3 | ARE_ABSOLUTE) & WORD_MASK
}

/// A patched direct-mode word for a non-extern target: `(value & 0x1FFFFF) << 3 | ARE_R`.
pub fn direct_patch_word(value: i64) -> u32 {
    (((value & LITERAL_MASK) as u32) << 3 | ARE_RELOCATABLE) & WORD_MASK
}

/// A patched direct-mode word for an extern target: only the ARE `E` bit set.
pub fn extern_patch_word() -> u32 {
    ARE_EXTERNAL
}

/// A patched relative-mode word: `((target - instr_ic) & 0x1FFFFF) << 3 | ARE_A`.
pub fn relative_patch_word(target: i64, instr_ic: i64) -> u32 {
    let offset = (target - instr_ic) & LITERAL_MASK;
    ((offset as u32) << 3 | ARE_ABSOLUTE) & WORD_MASK
}
