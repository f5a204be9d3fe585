// Shared prompt fragments. Each module that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Instruction appended to prompts whose output is split on line breaks.
pub const ONE_ITEM_PER_LINE: &str = "\
    Put each item on its own line. \
    Do NOT add a heading, a preamble, or a closing remark. \
    Do NOT use markdown formatting beyond a leading dash.";
