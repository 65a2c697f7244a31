//! `[Name]` blocks followed by raw code lines.

use super::{CheatBlock, CheatInput};

pub fn block(input: &CheatInput) -> CheatBlock {
    CheatBlock {
        name: input.one_line_description(),
        codes: input.code_lines().map(str::to_string).collect(),
    }
}

/// Header, one line per code, then exactly one blank line.
pub fn render(block: &CheatBlock) -> String {
    let mut out = format!("[{}]\n", block.name);
    for code in &block.codes {
        out.push_str(code);
        out.push('\n');
    }
    out.push('\n');
    out
}
