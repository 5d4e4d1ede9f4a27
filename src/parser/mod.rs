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

use crate::ast::{Directive, Operand, ParsedLine, Statement};
use crate::errors::AssemblerError;
use crate::preassembler::macro_table::is_valid_name_shape;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct StatementParser;

/// Parses one already-normalized, non-blank line of the intermediate text.
///
/// Lines are parsed one at a time, rather than the whole file in one pest
/// call, so that a malformed line yields a single diagnostic for that line
/// and does not prevent the rest of the file from being checked.
pub fn parse_line(line_number: usize, text: &str) -> Result<ParsedLine, AssemblerError> {
    let mut pairs = StatementParser::parse(Rule::statement, text).map_err(|e| AssemblerError::Syntax {
        line: line_number,
        message: e.to_string(),
    })?;

    let statement_pair = pairs.next().expect("statement rule always produces one pair");
    let mut inner = statement_pair.into_inner();

    let mut label = None;
    let mut body_pair = None;

    for pair in inner.by_ref() {
        match pair.as_rule() {
            Rule::label => {
                let raw = pair.into_inner().next().unwrap().as_str();
                if raw.len() > 30 {
                    return Err(AssemblerError::LabelTooLong { line: line_number });
                }
                if !is_valid_name_shape(raw) {
                    return Err(AssemblerError::MalformedLabel { line: line_number });
                }
                label = Some(raw.to_string());
            }
            Rule::EOI => {}
            _ => body_pair = Some(pair),
        }
    }

    let statement = match body_pair {
        None => Statement::Empty,
        Some(pair) => build_body(line_number, pair)?,
    };

    Ok(ParsedLine {
        line_number,
        label,
        statement,
    })
}

fn build_body(line_number: usize, pair: Pair<Rule>) -> Result<Statement, AssemblerError> {
    match pair.as_rule() {
        Rule::data_directive => {
            let values = pair
                .into_inner()
                .next()
                .unwrap()
                .into_inner()
                .map(|p| parse_signed_int(line_number, p.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Statement::Directive(Directive::Data(values)))
        }
        Rule::string_directive => {
            let raw = pair.into_inner().next().unwrap().as_str();
            let inner = &raw[1..raw.len() - 1];
            if inner.is_empty() {
                return Err(AssemblerError::BadStringLiteral { line: line_number });
            }
            Ok(Statement::Directive(Directive::Str(inner.to_string())))
        }
        Rule::extern_directive => {
            let name = parse_directive_operand(line_number, pair.into_inner().next(), "extern")?;
            Ok(Statement::Directive(Directive::Extern(name)))
        }
        Rule::entry_directive => {
            let name = parse_directive_operand(line_number, pair.into_inner().next(), "entry")?;
            Ok(Statement::Directive(Directive::Entry(name)))
        }
        Rule::instruction => {
            let mut inner = pair.into_inner();
            let mnemonic = inner.next().unwrap().as_str().to_string();
            let operands = inner
                .map(|p| build_operand(line_number, p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Statement::Instruction { mnemonic, operands })
        }
        other => unreachable!("unexpected top-level rule {other:?}"),
    }
}

fn build_operand(line_number: usize, pair: Pair<Rule>) -> Result<Operand, AssemblerError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::immediate => {
            let n = inner.into_inner().next().unwrap().as_str();
            Ok(Operand::Immediate(parse_signed_int(line_number, n)?))
        }
        Rule::relative => {
            let name = inner.into_inner().next().unwrap().as_str().to_string();
            Ok(Operand::Relative(name))
        }
        Rule::register => {
            let text = inner.as_str();
            let digit = text[1..].parse::<u8>().unwrap();
            if digit >= crate::opcodes::REGISTER_COUNT {
                // `r8`, `r9`, ... match the grammar's register token shape
                // but aren't valid register names; treat them as an
                // ordinary label reference instead of rejecting the line.
                return Ok(Operand::Direct(text.to_string()));
            }
            Ok(Operand::Register(digit))
        }
        Rule::direct => Ok(Operand::Direct(inner.as_str().to_string())),
        other => unreachable!("unexpected operand rule {other:?}"),
    }
}

fn parse_directive_operand(
    line_number: usize,
    arg: Option<Pair<Rule>>,
    directive: &'static str,
) -> Result<String, AssemblerError> {
    let Some(arg) = arg else {
        return Err(AssemblerError::MissingDirectiveOperand { line: line_number, directive });
    };
    let text = arg.as_str();
    if !is_valid_name_shape(text) {
        return Err(AssemblerError::MalformedDirectiveOperand { line: line_number, directive });
    }
    Ok(text.to_string())
}

fn parse_signed_int(line_number: usize, text: &str) -> Result<i32, AssemblerError> {
    text.parse::<i32>().map_err(|_| AssemblerError::BadNumericLiteral {
        line: line_number,
        text: text.to_string(),
    })
}
