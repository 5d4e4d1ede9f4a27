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

pub mod macro_table;

use crate::errors::AssemblerError;
use crate::opcodes;
use macro_table::{MacroTable, is_valid_name_shape};
use std::collections::HashSet;
use std::fmt::Write as _;

const MAX_LINE_LEN: usize = 80;
const MAX_MACRO_BODY: usize = 10_000;

/// Expands macro definitions in `source` and returns the normalized
/// intermediate text. On any error the returned text is empty and the
/// driver must not write an `.am` file for this run.
pub fn pre_assemble(source: &str) -> (String, Vec<AssemblerError>) {
    let mut errors = Vec::new();
    let raw_lines: Vec<&str> = source.lines().collect();

    let declared_labels = scan_label_names(&raw_lines);

    let mut macros = MacroTable::new();
    let mut output = String::new();

    enum MacroState {
        None,
        Open { name: String, body: Vec<String> },
    }
    let mut state = MacroState::None;

    for (idx, raw_line) in raw_lines.iter().enumerate() {
        let line_number = idx + 1;
        if raw_line.len() > MAX_LINE_LEN {
            errors.push(AssemblerError::LineTooLong { line: line_number });
            continue;
        }

        let cleaned = clean_line(raw_line);
        if cleaned.is_empty() {
            continue;
        }

        let mut tokens = cleaned.splitn(2, ' ');
        let first = tokens.next().unwrap_or("");
        let rest = tokens.next().unwrap_or("").trim();

        match &mut state {
            MacroState::Open { name, body } => {
                if first == "mcroend" {
                    if !rest.is_empty() {
                        errors.push(AssemblerError::ExtraMacroTokens {
                            line: line_number,
                            keyword: "mcroend",
                        });
                    }
                    let (name, body) = (std::mem::take(name), std::mem::take(body));
                    macros.define(&name, body);
                    state = MacroState::None;
                } else if first == "mcro" {
                    errors.push(AssemblerError::NestedMacroDefinition { line: line_number });
                } else {
                    // Mirrors the original's running-length check against its
                    // fixed-size body buffer: once a line would overflow it,
                    // the definition is abandoned (not saved) rather than
                    // silently truncated.
                    let current_len: usize = body.iter().map(|l| l.len() + 1).sum();
                    if current_len + cleaned.len() + 1 >= MAX_MACRO_BODY {
                        errors.push(AssemblerError::MacroBodyTooLarge {
                            line: line_number,
                            name: name.clone(),
                        });
                        state = MacroState::None;
                    } else {
                        body.push(cleaned);
                    }
                }
            }
            MacroState::None => {
                if first == "mcro" {
                    match validate_macro_name(rest, line_number, &declared_labels, &macros) {
                        Ok(name) => {
                            if !rest[name.len()..].trim().is_empty() {
                                errors.push(AssemblerError::ExtraMacroTokens {
                                    line: line_number,
                                    keyword: "mcro",
                                });
                            }
                            state = MacroState::Open {
                                name: name.to_string(),
                                body: Vec::new(),
                            };
                        }
                        Err(e) => errors.push(e),
                    }
                } else if first == "mcroend" {
                    // Stray `mcroend` with no open definition is tolerated.
                } else {
                    let (label, content) = split_label(&cleaned);
                    let invoked = content.split(' ').next().unwrap_or("");
                    if let Some(def) = macros.find(invoked) {
                        let label_prefix = label.as_deref().unwrap_or("");
                        for (i, body_line) in def.body.iter().enumerate() {
                            emit_line(&mut output, line_number, &format_expanded(label_prefix, i, body_line));
                        }
                    } else {
                        emit_line(&mut output, line_number, &cleaned);
                    }
                }
            }
        }

        // EOF while a macro definition is still open: tolerated, the
        // partial body is kept (it can never be used again in this file).
        if idx + 1 == raw_lines.len() {
            if let MacroState::Open { name, body } = &mut state {
                let (name, body) = (std::mem::take(name), std::mem::take(body));
                macros.define(&name, body);
            }
        }
    }

    if !errors.is_empty() {
        return (String::new(), errors);
    }

    (output, errors)
}

fn format_expanded(label_prefix: &str, index: usize, body_line: &str) -> String {
    if index == 0 && !label_prefix.is_empty() {
        format!("{label_prefix}: {body_line}")
    } else {
        body_line.to_string()
    }
}

fn emit_line(output: &mut String, line_number: usize, text: &str) {
    writeln!(output, "; SRCLINE {line_number}").unwrap();
    writeln!(output, "{text}").unwrap();
}

fn validate_macro_name(
    rest: &str,
    line_number: usize,
    declared_labels: &HashSet<String>,
    macros: &MacroTable,
) -> Result<&str, AssemblerError> {
    let name = rest.split(' ').next().unwrap_or("");
    if name.is_empty() {
        return Err(AssemblerError::IllegalMacroName { line: line_number });
    }
    if name.len() > 30 {
        return Err(AssemblerError::MacroNameTooLong { line: line_number });
    }
    if !is_valid_name_shape(name) {
        return Err(AssemblerError::IllegalMacroName { line: line_number });
    }
    if opcodes::is_reserved_macro_name(name) {
        return Err(AssemblerError::IllegalMacroName { line: line_number });
    }
    if declared_labels.contains(name) {
        return Err(AssemblerError::MacroLabelCollision {
            line: line_number,
            name: name.to_string(),
        });
    }
    if macros.find(name).is_some() {
        return Err(AssemblerError::DuplicateMacro {
            line: line_number,
            name: name.to_string(),
        });
    }
    Ok(name)
}

/// Strips comments, collapses runs of interior whitespace to a single
/// space, and trims leading/trailing whitespace.
fn clean_line(line: &str) -> String {
    let without_comment = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    };

    let mut out = String::new();
    let mut last_was_space = false;
    for c in without_comment.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

/// Splits a `label:` prefix off the front of an already-cleaned line, if
/// present, returning the bare label name and the remaining content.
fn split_label(cleaned: &str) -> (Option<String>, String) {
    let mut it = cleaned.splitn(2, ' ');
    let first = it.next().unwrap_or("");
    match first.strip_suffix(':') {
        Some(name) => (Some(name.to_string()), it.next().unwrap_or("").trim().to_string()),
        None => (None, cleaned.to_string()),
    }
}

/// Collects every `name:` token appearing at the start of a cleaned line,
/// across the whole file, for macro/label collision checks.
fn scan_label_names(raw_lines: &[&str]) -> HashSet<String> {
    let mut labels = HashSet::new();
    for raw_line in raw_lines {
        let cleaned = clean_line(raw_line);
        if let Some(first) = cleaned.split(' ').next() {
            if let Some(name) = first.strip_suffix(':') {
                if is_valid_name_shape(name) {
                    labels.insert(name.to_string());
                }
            }
        }
    }
    labels
}
