//! Fallback pretty-printer: reconstructs source text for any node the
//! builder or statement translator has no canonical rendering for.
//!
//! There is no Go-specific `go/printer` equivalent available here, so rather
//! than re-deriving formatting from an AST shape, this takes the node's own
//! source slice -- which is already formatted Go source -- and normalizes
//! its indentation to spaces (tab width 4) so it reads like the rest of the
//! canonical rendering.

use tree_sitter::Node;

/// Prints `node`'s source text as a single string, continuation lines
/// re-indented to spaces.
pub fn print(node: Node, source: &str) -> String {
    normalize(&source[node.byte_range()])
}

/// Prints `node`'s source text split on newline, as the statement
/// translator's fallback case does.
///
/// The reference implementation's fallback splits a single-trailing-newline
/// print job and keeps the empty final element; that
/// trailing empty line is an artifact and is dropped here instead of left
/// for callers to trim.
pub fn print_to_lines(node: Node, source: &str) -> Vec<String> {
    let mut lines: Vec<String> = print(node, source).split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Prints an arbitrary byte range of `source` the same way [`print`] prints
/// a node, for constructs (interface method signatures, func-literal
/// headers) that are cheaper to slice directly than to re-assemble from
/// child nodes.
pub fn print_range(source: &str, start: usize, end: usize) -> String {
    normalize(&source[start..end])
}

fn normalize(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() == 1 {
        return detab(lines[0].trim_start());
    }

    let base_indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push(detab(line.trim_start()));
        } else {
            let rest = line.get(base_indent.min(line.len())..).unwrap_or("");
            out.push(detab(rest));
        }
    }
    out.join("\n")
}

fn detab(line: &str) -> String {
    line.replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_is_trimmed() {
        assert_eq!(normalize("   foo(x)"), "foo(x)");
    }

    #[test]
    fn multiline_keeps_relative_indentation() {
        let src = "foo(\n    a,\n    b,\n)";
        assert_eq!(normalize(src), "foo(\n    a,\n    b,\n)");
    }

    #[test]
    fn tabs_become_four_spaces() {
        assert_eq!(normalize("\tfoo"), "    foo");
    }
}
