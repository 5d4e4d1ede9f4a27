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

use asm24::assemble_base;
use asm24::file_reader::AsmFileSystem;
use clap::Parser as clap_parser;
use std::process::ExitCode;

#[derive(clap_parser)]
#[clap(version, author = "Connor Nolan", about = "Two-pass assembler for a 24-bit fixed-width instruction set")]
struct Opts {
    /// Base names to assemble (each resolves to `<base>.as`)
    bases: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    let opts = Opts::parse();
    if opts.bases.is_empty() {
        println!("usage: asm24 <base1> <base2> ...");
        return ExitCode::FAILURE;
    }

    let fs = AsmFileSystem;
    let mut all_succeeded = true;

    for base in &opts.bases {
        let result = assemble_base(base, &fs);
        if result.succeeded() {
            println!("{}: assembled successfully", result.base);
        } else {
            all_succeeded = false;
            for error in &result.errors {
                eprintln!("{}: {}", result.base, error);
            }
            println!("{}: failed with {} error(s)", result.base, result.errors.len());
        }
    }

    if all_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
