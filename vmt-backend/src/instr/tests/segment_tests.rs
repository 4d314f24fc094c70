use super::{execute, ARGUMENT, LOCAL, THAT, THIS};
use crate::command::Segment;
use crate::context::TranslationContext;
use crate::instr::{lower_pop, lower_push};
use pretty_assertions::assert_eq;
use vmt_codegen::{Address, AsmInst, Comp, Dest};
use vmt_common::TranslateError;

fn file_context() -> TranslationContext {
    let mut ctx = TranslationContext::new();
    ctx.begin_file("Test");
    ctx
}

/// Lower a sequence of (push?, segment, index) accesses into one block
fn lower_all(ctx: &TranslationContext, accesses: &[(bool, Segment, u16)]) -> Vec<AsmInst> {
    let mut insts = Vec::new();
    for &(is_push, segment, index) in accesses {
        let lowered = if is_push {
            lower_push(ctx, segment, index)
        } else {
            lower_pop(ctx, segment, index)
        };
        insts.extend(lowered.unwrap());
    }
    insts
}

#[test]
fn test_push_constant_shape() {
    let ctx = file_context();
    let insts = lower_push(&ctx, Segment::Constant, 7).unwrap();
    assert_eq!(
        insts,
        vec![
            AsmInst::at(7u16),
            AsmInst::assign(Dest::D, Comp::A),
            AsmInst::at("SP"),
            AsmInst::assign(Dest::A, Comp::M),
            AsmInst::assign(Dest::M, Comp::D),
            AsmInst::at("SP"),
            AsmInst::assign(Dest::M, Comp::MPlusOne),
        ]
    );
}

#[test]
fn test_pop_local_goes_through_scratch_cell() {
    let ctx = file_context();
    let insts = lower_pop(&ctx, Segment::Local, 2).unwrap();
    assert!(insts.iter().any(|i| matches!(i, AsmInst::At(Address::Symbol(s)) if s == "LCL")));
    assert!(insts.iter().any(|i| matches!(i, AsmInst::At(Address::Symbol(s)) if s == "R13")));
    assert_eq!(insts.last(), Some(&AsmInst::assign(Dest::M, Comp::D)));
}

#[test]
fn test_push_pop_round_trip_through_every_writable_segment() {
    let ctx = file_context();
    for segment in [
        Segment::Local,
        Segment::Argument,
        Segment::This,
        Segment::That,
        Segment::Temp,
        Segment::Static,
    ] {
        let insts = lower_all(
            &ctx,
            &[
                (true, Segment::Constant, 1234),
                (false, segment, 3),
                (true, segment, 3),
            ],
        );
        let cpu = execute(&insts);
        assert_eq!(cpu.stack(), &[1234], "round trip through {segment}");
    }
}

#[test]
fn test_segments_address_the_right_cells() {
    let ctx = file_context();
    let insts = lower_all(
        &ctx,
        &[
            (true, Segment::Constant, 10),
            (false, Segment::Local, 0),
            (true, Segment::Constant, 21),
            (false, Segment::Argument, 1),
            (true, Segment::Constant, 36),
            (false, Segment::This, 6),
            (true, Segment::Constant, 42),
            (false, Segment::That, 5),
            (true, Segment::Constant, 45),
            (false, Segment::Temp, 6),
        ],
    );
    let cpu = execute(&insts);
    assert_eq!(cpu.peek(LOCAL as u16), 10);
    assert_eq!(cpu.peek(ARGUMENT as u16 + 1), 21);
    assert_eq!(cpu.peek(THIS as u16 + 6), 36);
    assert_eq!(cpu.peek(THAT as u16 + 5), 42);
    assert_eq!(cpu.peek(11), 45);
    assert_eq!(cpu.sp(), 256);
}

#[test]
fn test_pointer_segment_retargets_this_and_that() {
    let ctx = file_context();
    let insts = lower_all(
        &ctx,
        &[
            (true, Segment::Constant, 3030),
            (false, Segment::Pointer, 0),
            (true, Segment::Constant, 3040),
            (false, Segment::Pointer, 1),
            (true, Segment::Constant, 32),
            (false, Segment::This, 2),
            (true, Segment::Constant, 46),
            (false, Segment::That, 6),
            (true, Segment::Pointer, 0),
            (true, Segment::Pointer, 1),
        ],
    );
    let cpu = execute(&insts);
    assert_eq!(cpu.peek(3), 3030);
    assert_eq!(cpu.peek(4), 3040);
    assert_eq!(cpu.peek(3032), 32);
    assert_eq!(cpu.peek(3046), 46);
    assert_eq!(cpu.stack(), &[3030, 3040]);
}

#[test]
fn test_static_symbols_use_namespace() {
    let mut ctx = file_context();
    let insts = lower_push(&ctx, Segment::Static, 3).unwrap();
    assert_eq!(insts[0], AsmInst::at("Test.3"));

    ctx.enter_function("Other.run").unwrap();
    let insts = lower_pop(&ctx, Segment::Static, 0).unwrap();
    assert!(insts.contains(&AsmInst::at("Other.0")));
}

#[test]
fn test_static_without_namespace_is_rejected() {
    let ctx = TranslationContext::new();
    assert!(matches!(
        lower_push(&ctx, Segment::Static, 0),
        Err(TranslateError::ProtocolMisuse { .. })
    ));
}

#[test]
fn test_index_limits() {
    let ctx = file_context();
    assert!(lower_push(&ctx, Segment::Temp, 7).is_ok());
    assert!(lower_push(&ctx, Segment::Constant, 32767).is_ok());
    assert!(matches!(
        lower_pop(&ctx, Segment::Temp, 8),
        Err(TranslateError::IndexOutOfRange { index: 8, max: 7, .. })
    ));
    assert!(matches!(
        lower_push(&ctx, Segment::Pointer, 2),
        Err(TranslateError::IndexOutOfRange { index: 2, max: 1, .. })
    ));
    assert!(matches!(
        lower_push(&ctx, Segment::Constant, 32768),
        Err(TranslateError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_pop_constant_is_rejected() {
    let ctx = file_context();
    assert!(matches!(
        lower_pop(&ctx, Segment::Constant, 0),
        Err(TranslateError::MalformedCommand { .. })
    ));
}
