//! Program bootstrap
//!
//! Emitted once, ahead of every input file, when several files are merged into
//! one program: set SP to the stack origin and call the entry function through
//! the ordinary call protocol.

use crate::context::TranslationContext;
use crate::function::calling_convention::lower_call;
use log::info;
use vmt_codegen::abi::SP;
use vmt_codegen::{AsmInst, Comp, Dest, MAX_ADDRESS};
use vmt_common::TranslateError;

/// Lower the bootstrap sequence
///
/// Must run before any file has been started, so the call lives in the
/// bootstrap scope.
pub fn lower_bootstrap(
    ctx: &mut TranslationContext,
    stack_base: u16,
    entry: &str,
) -> Result<Vec<AsmInst>, TranslateError> {
    info!("Lowering bootstrap: SP={stack_base}, entry={entry}");
    if stack_base > MAX_ADDRESS {
        return Err(TranslateError::malformed(format!(
            "stack base {stack_base} is not addressable"
        )));
    }

    let mut insts = vec![
        AsmInst::at(stack_base),
        AsmInst::assign(Dest::D, Comp::A),
        AsmInst::at(SP),
        AsmInst::assign(Dest::M, Comp::D),
    ];
    insts.extend(lower_call(ctx, entry, 0)?);
    Ok(insts)
}
