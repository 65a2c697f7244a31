//! Commented fallback block for formats without a known cheat layout.

use super::CheatInput;

/// Comment marker understood by the target format.
pub fn comment_prefix(extension: &str) -> &'static str {
    match extension.trim().to_lowercase().as_str() {
        ".pnach" => "//",
        ".ini" => ";",
        _ => "#",
    }
}

/// Documentation block listing the description and numbered codes.
///
/// The block says outright that it must be restructured by hand.
pub fn render(extension: &str, input: &CheatInput) -> String {
    let c = comment_prefix(extension);
    let mut lines = vec![
        format!("{c} Cheat Helper (generic)"),
        format!("{c} Description: {}", input.one_line_description()),
        format!("{c} Enabled: {}", if input.enabled { "yes" } else { "no" }),
        format!("{c} Codes:"),
    ];
    lines.extend(
        input
            .code_lines()
            .enumerate()
            .map(|(i, code)| format!("{c}   {}. {code}", i + 1)),
    );
    lines.push(format!(
        "{c} Note: this format needs manual structuring. Copy the codes into the layout your emulator expects."
    ));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
