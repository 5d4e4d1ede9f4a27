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

pub mod placeholder;
pub mod symbol_table;
pub mod word_encoder;

use crate::ast::{Directive, Operand, Statement};
use crate::errors::AssemblerError;
use crate::opcodes;
use crate::parser;
use placeholder::{Placeholder, PlaceholderMode};
use symbol_table::{MarkEntryResult, SymbolAttr, SymbolTable};

/// Per-file state shared by the first and second pass. Lives for exactly
/// one input file and is discarded before the next one begins.
#[derive(Default)]
pub struct AssemblerContext {
    pub symbols: SymbolTable,
    pub placeholders: Vec<Placeholder>,
    pub code: Vec<u32>,
    pub data: Vec<u32>,
}

pub struct FirstPassOutput {
    pub context: AssemblerContext,
    pub ic_final: i64,
}

pub struct SecondPassOutput {
    pub entries: Vec<(String, i64)>,
    pub externs: Vec<(String, i64)>,
}

/// Parses the intermediate text, builds the symbol table, encodes
/// instructions and data, and records placeholders for unresolved symbolic
/// references. Continues past most errors to report every diagnostic in the
/// file; callers must check the returned error list before trusting
/// `context`.
pub fn run_first_pass(am_text: &str) -> (FirstPassOutput, Vec<AssemblerError>) {
    let mut errors = Vec::new();
    let mut ctx = AssemblerContext::default();
    let mut ic: i64 = word_encoder::BASE_ADDRESS;
    let mut dc: i64 = 0;

    for (line_number, text) in iter_statement_lines(am_text) {
        let parsed = match parser::parse_line(line_number, text) {
            Ok(p) => p,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        if let Statement::Directive(Directive::Extern(name)) = &parsed.statement {
            handle_extern(name, line_number, &mut ctx, &mut errors);
            continue;
        }

        if matches!(parsed.statement, Statement::Empty) {
            // A label with nothing following it on the line gets no symbol
            // and consumes no code/data.
            continue;
        }

        let is_entry_line = matches!(parsed.statement, Statement::Directive(Directive::Entry(_)));

        // A label on a `.entry` line is silently ignored, same as on
        // `.extern` — the entry's own operand is the symbol that matters,
        // not any label prefixing the directive line itself.
        if let (Some(label), false) = (&parsed.label, is_entry_line) {
            if opcodes::is_reserved_name(label) {
                errors.push(AssemblerError::ReservedLabelName {
                    line: line_number,
                    name: label.clone(),
                });
            } else {
                let (attr, value) = match &parsed.statement {
                    Statement::Directive(Directive::Data(_)) | Statement::Directive(Directive::Str(_)) => {
                        (SymbolAttr::Data, dc)
                    }
                    _ => (SymbolAttr::Code, ic),
                };
                if !ctx.symbols.add(label, value, attr) {
                    errors.push(AssemblerError::DuplicateSymbol {
                        line: line_number,
                        name: label.clone(),
                    });
                }
            }
        }

        match parsed.statement {
            Statement::Directive(Directive::Data(values)) => {
                for v in values {
                    ctx.data.push(((v as i64) as u32) & word_encoder::WORD_MASK);
                    dc += 1;
                }
            }
            Statement::Directive(Directive::Str(s)) => {
                for b in s.bytes() {
                    ctx.data.push(b as u32);
                    dc += 1;
                }
                ctx.data.push(0);
                dc += 1;
            }
            Statement::Directive(Directive::Entry(_)) => {}
            Statement::Directive(Directive::Extern(_)) => unreachable!("handled above"),
            Statement::Empty => unreachable!("handled above"),
            Statement::Instruction { mnemonic, operands } => {
                encode_instruction(&mnemonic, &operands, line_number, &mut ic, &mut ctx, &mut errors);
            }
        }
    }

    if errors.is_empty() {
        ctx.symbols.relocate_data_symbols(ic);
    }

    (FirstPassOutput { context: ctx, ic_final: ic }, errors)
}

fn handle_extern(name: &str, line_number: usize, ctx: &mut AssemblerContext, errors: &mut Vec<AssemblerError>) {
    if opcodes::is_reserved_name(name) {
        errors.push(AssemblerError::ReservedDirectiveName {
            line: line_number,
            name: name.to_string(),
            directive: "extern",
        });
        return;
    }
    if !ctx.symbols.add(name, 0, SymbolAttr::Extern) {
        errors.push(AssemblerError::DuplicateExtern {
            line: line_number,
            name: name.to_string(),
        });
    }
}

fn encode_instruction(
    mnemonic: &str,
    operands: &[Operand],
    line_number: usize,
    ic: &mut i64,
    ctx: &mut AssemblerContext,
    errors: &mut Vec<AssemblerError>,
) {
    let Some(op_info) = opcodes::find(mnemonic) else {
        errors.push(AssemblerError::UnknownMnemonic {
            line: line_number,
            mnemonic: mnemonic.to_string(),
        });
        return;
    };

    let (src, dst) = match (op_info.n_operands, operands.len()) {
        (0, 0) => (None, None),
        (1, 1) => (None, Some(&operands[0])),
        (2, 2) => (Some(&operands[0]), Some(&operands[1])),
        (expected, found) => {
            errors.push(AssemblerError::WrongOperandCount {
                line: line_number,
                mnemonic: mnemonic.to_string(),
                expected,
                found,
            });
            return;
        }
    };

    if let Some(s) = src {
        if !op_info.accepts_src(s.mode()) {
            errors.push(AssemblerError::IllegalSourceMode {
                line: line_number,
                mnemonic: mnemonic.to_string(),
            });
            return;
        }
    }
    if let Some(d) = dst {
        if !op_info.accepts_dst(d.mode()) {
            errors.push(AssemblerError::IllegalDestMode {
                line: line_number,
                mnemonic: mnemonic.to_string(),
            });
            return;
        }
    }

    let (src_mode, src_reg) = operand_fields(src);
    let (dst_mode, dst_reg) = operand_fields(dst);

    let header = word_encoder::header_word(op_info.opcode, src_mode, src_reg, dst_mode, dst_reg, op_info.funct);
    let header_ic = *ic;
    ctx.code.push(header);
    *ic += 1;

    for operand in [src, dst].into_iter().flatten() {
        match operand {
            Operand::Register(_) => {}
            Operand::Immediate(v) => {
                ctx.code.push(word_encoder::immediate_word(*v));
                *ic += 1;
            }
            Operand::Direct(name) => {
                ctx.placeholders.push(Placeholder {
                    word_index: ctx.code.len(),
                    instr_ic: header_ic,
                    mode: PlaceholderMode::Direct,
                    label: name.clone(),
                    line: line_number,
                });
                ctx.code.push(0);
                *ic += 1;
            }
            Operand::Relative(name) => {
                ctx.placeholders.push(Placeholder {
                    word_index: ctx.code.len(),
                    instr_ic: header_ic,
                    mode: PlaceholderMode::Relative,
                    label: name.clone(),
                    line: line_number,
                });
                ctx.code.push(0);
                *ic += 1;
            }
        }
    }
}

fn operand_fields(op: Option<&Operand>) -> (u8, u8) {
    match op {
        None | Some(Operand::Immediate(_)) => (0, 0),
        Some(Operand::Direct(_)) => (1, 0),
        Some(Operand::Relative(_)) => (2, 0),
        Some(Operand::Register(r)) => (3, *r),
    }
}

/// Runs only when the first pass produced zero errors. Processes `.entry`
/// declarations and patches every recorded placeholder against the now-
/// complete symbol table.
pub fn run_second_pass(am_text: &str, ctx: &mut AssemblerContext) -> (SecondPassOutput, Vec<AssemblerError>) {
    let mut errors = Vec::new();
    let mut entries = Vec::new();

    for (line_number, text) in iter_statement_lines(am_text) {
        let Ok(parsed) = parser::parse_line(line_number, text) else {
            continue;
        };
        let Statement::Directive(Directive::Entry(name)) = parsed.statement else {
            continue;
        };

        match ctx.symbols.mark_entry(&name) {
            MarkEntryResult::NotFound => errors.push(AssemblerError::UndefinedEntry {
                line: line_number,
                name: name.clone(),
            }),
            MarkEntryResult::ExternCannotBeEntry => errors.push(AssemblerError::ExternCannotBeEntry {
                line: line_number,
                name: name.clone(),
            }),
            MarkEntryResult::Ok => {
                let value = ctx.symbols.find(&name).expect("just marked").value;
                entries.push((name, value));
            }
        }
    }

    let mut externs = Vec::new();
    for ph in &ctx.placeholders {
        let Some(symbol) = ctx.symbols.find(&ph.label) else {
            errors.push(AssemblerError::UndefinedSymbol {
                line: ph.line,
                name: ph.label.clone(),
            });
            continue;
        };
        let attr = symbol.attr;
        let value = symbol.value;

        match ph.mode {
            PlaceholderMode::Direct => {
                if attr == SymbolAttr::Extern {
                    ctx.code[ph.word_index] = word_encoder::extern_patch_word();
                    externs.push((ph.label.clone(), word_encoder::BASE_ADDRESS + ph.word_index as i64));
                } else {
                    ctx.code[ph.word_index] = word_encoder::direct_patch_word(value);
                }
            }
            PlaceholderMode::Relative => {
                if attr == SymbolAttr::Extern {
                    errors.push(AssemblerError::ExternUsedRelatively {
                        line: ph.line,
                        name: ph.label.clone(),
                    });
                } else {
                    ctx.code[ph.word_index] = word_encoder::relative_patch_word(value, ph.instr_ic);
                }
            }
        }
    }

    (SecondPassOutput { entries, externs }, errors)
}

/// Walks the intermediate text, pairing each real statement line with the
/// original source line number carried by the preceding `; SRCLINE` marker.
fn iter_statement_lines(am_text: &str) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut current_line_number = 0;
    for line in am_text.lines() {
        if let Some(n) = line.strip_prefix("; SRCLINE ") {
            if let Ok(n) = n.trim().parse::<usize>() {
                current_line_number = n;
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        result.push((current_line_number, line));
    }
    result
}
