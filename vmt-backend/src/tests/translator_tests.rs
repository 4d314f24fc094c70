use crate::command::{command_lines, Command};
use crate::{translate_program, Translator, TranslatorOptions, VmSource};
use pretty_assertions::assert_eq;
use vmt_codegen::{AsmInst, TextEmitter};
use vmt_common::{SourceLocation, TranslateError};

fn source<'a>(filename: &'a str, text: &'a str) -> VmSource<'a> {
    let namespace = filename.trim_end_matches(".vm");
    VmSource { filename, namespace, text }
}

#[test]
fn test_output_is_one_instruction_per_line() {
    let (text, stats) = translate_program(
        &[source("Simple.vm", "push constant 7\npush constant 8\nadd\n")],
        TranslatorOptions::default(),
    )
    .unwrap();

    assert_eq!(text.lines().count(), stats.instructions);
    assert!(text.starts_with("@7\nD=A\n@SP\n"));
    assert!(text.ends_with("M=D+M\n"));
}

#[test]
fn test_bootstrap_comes_first() {
    let options = TranslatorOptions {
        bootstrap: true,
        ..TranslatorOptions::default()
    };
    let (text, _) = translate_program(
        &[
            source("Main.vm", "function Main.main 0\npush constant 1\nreturn\n"),
            source("Sys.vm", "function Sys.init 0\ncall Main.main 0\n"),
        ],
        options,
    )
    .unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(&lines[..4], &["@256", "D=A", "@SP", "M=D"]);
    let bootstrap_return = lines.iter().position(|l| *l == "($ret.1)").unwrap();
    let main = lines.iter().position(|l| *l == "(Main.main)").unwrap();
    let sys = lines.iter().position(|l| *l == "(Sys.init)").unwrap();
    assert!(bootstrap_return < main && main < sys);
}

#[test]
fn test_annotations_precede_each_command() {
    let options = TranslatorOptions {
        bootstrap: true,
        annotate: true,
        ..TranslatorOptions::default()
    };
    let (text, stats) = translate_program(
        &[source("Sys.vm", "function Sys.init 0  // entry\n  push constant 7\n")],
        options,
    )
    .unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "// bootstrap");
    let function = lines.iter().position(|l| *l == "// function Sys.init 0").unwrap();
    assert_eq!(lines[function + 1], "(Sys.init)");
    let push = lines.iter().position(|l| *l == "// push constant 7").unwrap();
    assert_eq!(lines[push + 1], "@7");
    assert_eq!(
        lines.iter().filter(|l| l.starts_with('@') || l.contains('=') || l.contains(';')).count(),
        stats.instructions
    );
}

#[test]
fn test_stats_count_commands_by_kind() {
    let vm = "\
function Main.main 1
push constant 3
push constant 4
lt
eq
call Main.helper 1
return
function Main.helper 0
push argument 0
return
";
    let options = TranslatorOptions {
        bootstrap: true,
        entry_function: "Main.main".to_string(),
        ..TranslatorOptions::default()
    };
    let (_, stats) = translate_program(&[source("Main.vm", vm)], options).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(stats.commands, 10);
    assert_eq!(stats.functions, 2);
    assert_eq!(stats.calls, 2);
    assert_eq!(stats.comparisons, 2);
}

#[test]
fn test_translator_into_instruction_sink() {
    let mut translator = Translator::new(Vec::new(), TranslatorOptions::default()).unwrap();
    translator.begin_file("Main.vm", "Main");
    translator
        .translate_command(&Command::parse("push static 2").unwrap())
        .unwrap();
    assert_eq!(translator.sink().len(), 7);
    assert_eq!(translator.context().static_namespace(), Some("Main"));

    translator
        .translate_command(&Command::parse("function Main.run 0").unwrap())
        .unwrap();
    assert_eq!(translator.context().current_function(), Some("Main.run"));

    let insts = translator.into_sink();
    assert_eq!(insts[0], AsmInst::at("Main.2"));
    assert_eq!(insts[7], AsmInst::label("Main.run"));
    assert_eq!(insts.len(), 8);
}

#[test]
fn test_errors_carry_file_and_line() {
    let err = translate_program(
        &[
            source("Good.vm", "push constant 1\n"),
            source("Bad.vm", "// header\npush constant 1\n\n   pop constant 3\n"),
        ],
        TranslatorOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, TranslateError::MalformedCommand { .. }));
    assert_eq!(err.location(), Some(&SourceLocation::new("Bad.vm", 4)));
}

#[test]
fn test_lowering_errors_carry_location() {
    let cases = [
        ("push temp 8", "IndexOutOfRange"),
        ("push heap 0", "UnknownSegment"),
        ("return", "ProtocolMisuse"),
        ("label A\nlabel A", "DuplicateLabel"),
    ];
    for (vm, kind) in cases {
        let err = translate_program(&[source("Case.vm", vm)], TranslatorOptions::default())
            .unwrap_err();
        let matched = match err {
            TranslateError::IndexOutOfRange { .. } => "IndexOutOfRange",
            TranslateError::UnknownSegment { .. } => "UnknownSegment",
            TranslateError::ProtocolMisuse { .. } => "ProtocolMisuse",
            TranslateError::DuplicateLabel { .. } => "DuplicateLabel",
            _ => "other",
        };
        assert_eq!(matched, kind, "{vm}");
        assert_eq!(err.location().map(|l| l.filename.as_str()), Some("Case.vm"));
    }
}

#[test]
fn test_missing_entry_is_not_checked() {
    // The entry function is only referenced; the assembler resolves it
    let options = TranslatorOptions {
        bootstrap: true,
        ..TranslatorOptions::default()
    };
    assert!(translate_program(&[], options).is_ok());
}

#[test]
fn test_text_emitter_sink_matches_program_text() {
    let vm = "push constant 2\nneg\n";
    let mut translator =
        Translator::new(TextEmitter::new(Vec::new()), TranslatorOptions::default()).unwrap();
    translator.translate_source("Neg.vm", "Neg", vm).unwrap();
    let emitted = String::from_utf8(translator.into_sink().finish().unwrap()).unwrap();

    let (text, _) =
        translate_program(&[source("Neg.vm", vm)], TranslatorOptions::default()).unwrap();
    assert_eq!(emitted, text);
    assert_eq!(command_lines(vm).count(), 2);
}
