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
use asm24::errors::AssemblerError;
use asm24::file_reader::MockFileSystem;

fn run(base: &str, source: &str) -> (asm24::BaseResult, MockFileSystem) {
    let fs = MockFileSystem::new();
    fs.add_file(&format!("{base}.as"), source);
    let result = assemble_base(base, &fs);
    (result, fs)
}

#[test]
fn s1_minimal_stop() {
    let (result, fs) = run("s1", "stop\n");
    assert!(result.succeeded(), "errors: {:?}", result.errors);

    let ob = fs.get_file("s1.ob").expect("object file written");
    let mut lines = ob.lines();
    assert_eq!(lines.next().unwrap(), "1 0");
    assert_eq!(lines.next().unwrap(), "0000100 3c0004");
    assert!(!fs.has_file("s1.ent"));
    assert!(!fs.has_file("s1.ext"));
}

#[test]
fn s2_immediate_and_direct() {
    let source = "MAIN: mov #3, X\n      stop\nX:    .data 7\n";
    let (result, fs) = run("s2", source);
    assert!(result.succeeded(), "errors: {:?}", result.errors);

    let ob = fs.get_file("s2.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    // mov #3, X is three words (header + immediate + direct placeholder),
    // stop is one more: four code words at 100-103, then X's data word at 104.
    assert_eq!(lines[0], "4 1");
    assert_eq!(lines[1], "0000100 000804");
    // word 101: immediate literal 3, ARE A (100)
    assert_eq!(lines[2], "0000101 00001c");
    // word 102: patched direct operand -> X relocated to 104, shifted << 3, ARE R (010)
    assert_eq!(lines[3], "0000102 000342");
    assert_eq!(lines[4], "0000103 3c0004");
    assert_eq!(lines[5], "0000104 000007");
}

#[test]
fn s3_extern_used_relatively_is_error() {
    let source = ".extern SUB\njmp &SUB\nstop\n";
    let (result, fs) = run("s3", source);
    assert!(!result.succeeded());
    assert!(!fs.has_file("s3.ob"));
    assert!(!fs.has_file("s3.ent"));
    assert!(!fs.has_file("s3.ext"));
}

#[test]
fn s4_entry_extern_distinction() {
    let source = ".entry LBL\n.extern EXT\nLBL:  mov EXT, r1\n      stop\n";
    let (result, fs) = run("s4", source);
    assert!(result.succeeded(), "errors: {:?}", result.errors);

    let ob = fs.get_file("s4.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "3 0");
    // word 101 patched for the extern reference: ARE E only
    assert_eq!(lines[2], "0000101 000001");

    let ent = fs.get_file("s4.ent").expect("entry file written");
    assert_eq!(ent.trim(), "LBL 0000100");

    let ext = fs.get_file("s4.ext").expect("extern file written");
    assert_eq!(ext.trim(), "EXT 0000101");
}

#[test]
fn s5_macro_expansion() {
    let source = "mcro GREET\nmov r1, r2\nmcroend\nGREET\nstop\n";
    let (result, fs) = run("s5", source);
    assert!(result.succeeded(), "errors: {:?}", result.errors);

    let am = fs.get_file("s5.am").expect("intermediate file written");
    assert!(am.contains("mov r1, r2"));
    assert!(am.contains("stop"));

    let ob = fs.get_file("s5.ob").unwrap();
    assert_eq!(ob.lines().next().unwrap(), "2 0");
}

#[test]
fn s6_extra_operand_stops_pipeline() {
    let (result, fs) = run("s6", "mov r1, r2, r3\n");
    assert!(!result.succeeded());
    assert!(!fs.has_file("s6.ob"));
    assert!(!fs.has_file("s6.ent"));
    assert!(!fs.has_file("s6.ext"));
}

#[test]
fn stale_outputs_are_removed_on_failure() {
    let fs = MockFileSystem::new();
    fs.add_file("stale.as", "stop\n");
    let first = assemble_base("stale", &fs);
    assert!(first.succeeded());
    assert!(fs.has_file("stale.ob"));

    fs.add_file("stale.as", "mov r1, r2, r3\n");
    let second = assemble_base("stale", &fs);
    assert!(!second.succeeded());
    assert!(!fs.has_file("stale.ob"));
}

#[test]
fn duplicate_extern_symbol_is_an_error() {
    let source = ".extern A\n.extern A\nstop\n";
    let (result, _fs) = run("dup_extern", source);
    assert!(!result.succeeded());
}

#[test]
fn undefined_entry_symbol_is_an_error() {
    let source = ".entry MISSING\nstop\n";
    let (result, _fs) = run("undef_entry", source);
    assert!(!result.succeeded());
}

#[test]
fn two_register_operands_fit_in_one_word() {
    let (result, fs) = run("tworeg", "mov r1, r2\nstop\n");
    assert!(result.succeeded(), "errors: {:?}", result.errors);
    let ob = fs.get_file("tworeg.ob").unwrap();
    assert_eq!(ob.lines().next().unwrap(), "2 0");
}

#[test]
fn string_directive_encodes_bytes_and_terminator() {
    let source = "MSG: .string \"hi\"\n     stop\n";
    let (result, fs) = run("str1", source);
    assert!(result.succeeded(), "errors: {:?}", result.errors);

    let ob = fs.get_file("str1.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "1 3");
    assert_eq!(lines[1], "0000100 3c0004");
    assert_eq!(lines[2], "0000101 000068");
    assert_eq!(lines[3], "0000102 000069");
    assert_eq!(lines[4], "0000103 000000");
}

#[test]
fn empty_string_literal_is_rejected() {
    let (result, fs) = run("emptystr", ".string \"\"\nstop\n");
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::BadStringLiteral { .. }));
    assert!(!fs.has_file("emptystr.ob"));
}

#[test]
fn register_digit_out_of_range_falls_back_to_direct() {
    // r8 is out of the r0-r7 register range, so it's treated as an ordinary
    // label reference rather than a parse error.
    let source = "r8: .data 5\n     mov r8, r1\n     stop\n";
    let (result, fs) = run("r8fallback", source);
    assert!(result.succeeded(), "errors: {:?}", result.errors);

    let ob = fs.get_file("r8fallback.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "3 1");
}

#[test]
fn undefined_register_like_operand_is_undefined_symbol() {
    let (result, _fs) = run("r9undef", "mov r9, r1\nstop\n");
    assert!(!result.succeeded());
    assert!(matches!(
        &result.errors[0],
        AssemblerError::UndefinedSymbol { name, .. } if name == "r9"
    ));
}

#[test]
fn label_too_long_is_rejected() {
    let long_label = "a".repeat(31);
    let source = format!("{long_label}: stop\n");
    let (result, _fs) = run("longlabel", &source);
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::LabelTooLong { .. }));
}

#[test]
fn malformed_label_shape_is_rejected() {
    let (result, _fs) = run("badlabel", "1abc: stop\n");
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::MalformedLabel { .. }));
}

#[test]
fn reserved_mnemonic_as_label_is_rejected() {
    let (result, _fs) = run("reservedlabel", "mov: stop\n");
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::ReservedLabelName { .. }));
}

#[test]
fn extern_without_operand_is_missing_directive_operand() {
    let (result, _fs) = run("externmissing", ".extern\nstop\n");
    assert!(!result.succeeded());
    assert!(matches!(
        result.errors[0],
        AssemblerError::MissingDirectiveOperand { directive: "extern", .. }
    ));
}

#[test]
fn extern_with_malformed_operand_is_rejected() {
    let (result, _fs) = run("externbad", ".extern 1bad\nstop\n");
    assert!(!result.succeeded());
    assert!(matches!(
        result.errors[0],
        AssemblerError::MalformedDirectiveOperand { directive: "extern", .. }
    ));
}

#[test]
fn numeric_literal_overflow_is_rejected() {
    let (result, _fs) = run("bignum", ".data 99999999999\nstop\n");
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::BadNumericLiteral { .. }));
}

#[test]
fn macro_body_too_large_is_rejected() {
    let mut source = String::from("mcro BIG\n");
    for _ in 0..1100 {
        source.push_str("mov r1, r2\n");
    }
    source.push_str("mcroend\nstop\n");

    let (result, _fs) = run("bigmacro", &source);
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::MacroBodyTooLarge { .. }));
}

#[test]
fn duplicate_macro_definition_is_rejected() {
    let source = "mcro DUP\nstop\nmcroend\nmcro DUP\nstop\nmcroend\nstop\n";
    let (result, _fs) = run("dupmacro", source);
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::DuplicateMacro { .. }));
}

#[test]
fn macro_name_matching_mnemonic_is_illegal() {
    let source = "mcro mov\nstop\nmcroend\nstop\n";
    let (result, _fs) = run("macroreserved", source);
    assert!(!result.succeeded());
    assert!(matches!(result.errors[0], AssemblerError::IllegalMacroName { .. }));
}

#[test]
fn idempotent_reassembly_produces_identical_output() {
    let source = "MAIN: mov #3, X\n      stop\nX:    .data 7\n";
    let (first, fs) = run("idem", source);
    assert!(first.succeeded());
    let ob_first = fs.get_file("idem.ob").unwrap();

    let second = assemble_base("idem", &fs);
    assert!(second.succeeded());
    let ob_second = fs.get_file("idem.ob").unwrap();

    assert_eq!(ob_first, ob_second);
}
