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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod opcodes;
pub mod parser;
pub mod preassembler;

use assembler::word_encoder;
use errors::AssemblerError;
use file_reader::FileSystem;
use std::fmt::Write as _;
use std::path::Path;

extern crate pest;
extern crate pest_derive;

/// Outcome of assembling one base name. `errors` is empty iff every stage
/// succeeded and the object (and possibly entry/extern) files were written.
pub struct BaseResult {
    pub base: String,
    pub errors: Vec<AssemblerError>,
}

impl BaseResult {
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the full pre-assembler → first pass → second pass pipeline for one
/// base name, reading `<base>.as` and writing `<base>.am`/`.ob`/`.ent`/`.ext`
/// through `fs`. An error at any stage unconditionally inhibits the later
/// ones and removes any stale output files left over from an earlier
/// successful run.
pub fn assemble_base(base: &str, fs: &impl FileSystem) -> BaseResult {
    let as_path = format!("{base}.as");
    let am_path = format!("{base}.am");
    let ob_path = format!("{base}.ob");
    let ent_path = format!("{base}.ent");
    let ext_path = format!("{base}.ext");

    log::debug!("assembling base '{base}'");

    let source = match fs.read_to_string(Path::new(&as_path)) {
        Ok(s) => s,
        Err(e) => {
            return fail(base, vec![AssemblerError::io(&as_path, &e)]);
        }
    };

    let (am_text, pre_errors) = preassembler::pre_assemble(&source);
    if !pre_errors.is_empty() {
        log::debug!("'{base}': pre-assembler produced {} error(s)", pre_errors.len());
        remove_outputs(fs, &ob_path, &ent_path, &ext_path);
        return fail(base, pre_errors);
    }
    log::trace!("'{base}': pre-assembler emitted {} bytes of intermediate text", am_text.len());

    if let Err(e) = fs.write(Path::new(&am_path), &am_text) {
        return fail(base, vec![AssemblerError::io(&am_path, &e)]);
    }

    let (first_pass_output, first_errors) = assembler::run_first_pass(&am_text);
    if !first_errors.is_empty() {
        log::debug!("'{base}': first pass produced {} error(s)", first_errors.len());
        remove_outputs(fs, &ob_path, &ent_path, &ext_path);
        return fail(base, first_errors);
    }

    let mut context = first_pass_output.context;
    let (second_pass_output, second_errors) = assembler::run_second_pass(&am_text, &mut context);
    if !second_errors.is_empty() {
        log::debug!("'{base}': second pass produced {} error(s)", second_errors.len());
        remove_outputs(fs, &ob_path, &ent_path, &ext_path);
        return fail(base, second_errors);
    }

    if let Err(e) = fs.write(Path::new(&ob_path), &render_object_file(&context)) {
        return fail(base, vec![AssemblerError::io(&ob_path, &e)]);
    }

    if let Err(e) = write_or_remove(fs, &ent_path, &second_pass_output.entries) {
        return fail(base, vec![e]);
    }
    if let Err(e) = write_or_remove(fs, &ext_path, &second_pass_output.externs) {
        return fail(base, vec![e]);
    }

    log::debug!("'{base}': assembled successfully");
    BaseResult {
        base: base.to_string(),
        errors: Vec::new(),
    }
}

fn fail(base: &str, errors: Vec<AssemblerError>) -> BaseResult {
    BaseResult {
        base: base.to_string(),
        errors,
    }
}

fn remove_outputs(fs: &impl FileSystem, ob_path: &str, ent_path: &str, ext_path: &str) {
    let _ = fs.remove(Path::new(ob_path));
    let _ = fs.remove(Path::new(ent_path));
    let _ = fs.remove(Path::new(ext_path));
}

fn write_or_remove(fs: &impl FileSystem, path: &str, items: &[(String, i64)]) -> Result<(), AssemblerError> {
    if items.is_empty() {
        let _ = fs.remove(Path::new(path));
        return Ok(());
    }
    fs.write(Path::new(path), &render_symbol_list(items))
        .map_err(|e| AssemblerError::io(path, &e))
}

fn render_object_file(ctx: &assembler::AssemblerContext) -> String {
    let mut out = String::new();
    writeln!(out, "{} {}", ctx.code.len(), ctx.data.len()).unwrap();
    let mut addr = word_encoder::BASE_ADDRESS;
    for word in ctx.code.iter().chain(ctx.data.iter()) {
        writeln!(out, "{addr:07} {word:06x}").unwrap();
        addr += 1;
    }
    out
}

fn render_symbol_list(items: &[(String, i64)]) -> String {
    let mut out = String::new();
    for (name, addr) in items {
        writeln!(out, "{name} {addr:07}").unwrap();
    }
    out
}
