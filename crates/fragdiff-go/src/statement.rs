//! Statement-to-lines translation: renders a single `block`
//! child to its canonical one-line or multi-line form.
//!
//! Mirrors `nodeToLines`/`blockToLines` in `original_source/godiff.go` node
//! kind for node kind. Anything not explicitly handled here -- which, as in
//! the original, includes most bare expressions (identifiers, binary
//! expressions, selector expressions, ...) -- falls back to
//! [`pretty::print_to_lines`].

use tree_sitter::Node;

use crate::fragment::cat_lines;
use crate::pretty;

pub fn block_to_lines(block: Node, source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cursor = block.walk();
    for stmt in block.named_children(&mut cursor) {
        lines.extend(node_to_lines(stmt, source));
    }
    lines
}

fn indent_all(prefix: &str, mut lines: Vec<String>) -> Vec<String> {
    for l in lines.iter_mut() {
        *l = format!("{prefix}{l}");
    }
    lines
}

pub fn node_to_lines(node: Node, source: &str) -> Vec<String> {
    match node.kind() {
        "if_statement" => if_statement(node, source),
        "for_statement" => for_statement(node, source),
        "assignment_statement" => assignment(node, source, None),
        "short_var_declaration" => assignment(node, source, Some(":=")),
        "block" => block_statement(node, source),
        "return_statement" => return_statement(node, source),
        "defer_statement" => prefixed_call(node, source, "defer"),
        "go_statement" => prefixed_call(node, source, "go"),
        "send_statement" => send_statement(node, source),
        "empty_statement" => Vec::new(),
        "expression_switch_statement" => expression_switch(node, source),
        "type_switch_statement" => type_switch(node, source),
        "composite_literal" => composite_literal(node, source),
        "unary_expression" => unary_expression(node, source),
        "call_expression" => call_expression(node, source),
        "keyed_element" => keyed_element(node, source),
        "func_literal" => func_literal(node, source),
        "expression_case" | "type_case" | "default_case" => case_clause(node, source),
        _ => pretty::print_to_lines(node, source),
    }
}

fn if_statement(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["if".to_string()];
    if let Some(init) = node.child_by_field_name("initializer") {
        lines = cat_lines(lines, " ", node_to_lines(init, source));
        lines = cat_lines(lines, "", vec![";".to_string()]);
    }
    let cond = node.child_by_field_name("condition").expect("if_statement always has a condition");
    lines = cat_lines(lines, " ", node_to_lines(cond, source));
    lines = cat_lines(lines, " ", vec!["{".to_string()]);
    let body = node.child_by_field_name("consequence").expect("if_statement always has a body");
    lines.extend(indent_all("    ", block_to_lines(body, source)));
    lines.push("}".to_string());
    if let Some(alt) = node.child_by_field_name("alternative") {
        lines = cat_lines(lines, "", vec![" else ".to_string()]);
        lines = cat_lines(lines, "", node_to_lines(alt, source));
    }
    lines
}

fn for_clause_parts(clause: Node) -> (Option<Node>, Option<Node>, Option<Node>) {
    (
        clause.child_by_field_name("initializer"),
        clause.child_by_field_name("condition"),
        clause.child_by_field_name("update"),
    )
}

fn for_statement(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["for".to_string()];
    let mut cursor = node.walk();
    let clause = node.children(&mut cursor).find(|c| c.kind() == "for_clause");
    let range = {
        let mut c2 = node.walk();
        node.children(&mut c2).find(|c| c.kind() == "range_clause")
    };

    if let Some(range) = range {
        return range_statement(node, range, source);
    }

    if let Some(clause) = clause {
        let (init, cond, update) = for_clause_parts(clause);
        let mut inner = Vec::new();
        if let Some(init) = init {
            inner = cat_lines(inner, "; ", node_to_lines(init, source));
        }
        if let Some(cond) = cond {
            inner = cat_lines(inner, "; ", node_to_lines(cond, source));
        }
        if let Some(update) = update {
            inner = cat_lines(inner, "; ", node_to_lines(update, source));
        }
        lines = cat_lines(lines, " ", inner);
    } else if let Some(cond) = node.child_by_field_name("condition") {
        lines = cat_lines(lines, " ", node_to_lines(cond, source));
    }

    lines = cat_lines(lines, "", vec![" {".to_string()]);
    let body = node.child_by_field_name("body").expect("for_statement always has a body");
    lines.extend(indent_all("    ", block_to_lines(body, source)));
    lines.push("}".to_string());
    lines
}

fn range_statement(for_node: Node, range: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["for".to_string()];
    let left = range.child_by_field_name("left");
    let mut tok = "=";
    if let Some(left) = left {
        let mut cursor = range.walk();
        let after_left: Vec<Node> = range
            .children(&mut cursor)
            .skip_while(|c| c.id() != left.id())
            .skip(1)
            .collect();
        if let Some(op) = after_left.first() {
            if op.kind() == ":=" {
                tok = ":=";
            }
        }
        let names: Vec<Node> = left
            .named_children(&mut left.walk())
            .collect();
        if let Some(key) = names.first() {
            lines = cat_lines(lines, " ", node_to_lines(*key, source));
        }
        if let Some(value) = names.get(1) {
            lines = cat_lines(lines, ", ", node_to_lines(*value, source));
        }
        lines = cat_lines(lines, "", vec![format!(" {} ", tok)]);
    }
    lines = cat_lines(lines, "", vec!["range".to_string()]);
    let x = range.child_by_field_name("right").expect("range_clause always has a right-hand expression");
    lines = cat_lines(lines, " ", pretty::print_to_lines(x, source));
    lines = cat_lines(lines, "", vec![" {".to_string()]);
    let body = for_node.child_by_field_name("body").expect("for_statement always has a body");
    lines.extend(indent_all("    ", block_to_lines(body, source)));
    lines.push("}".to_string());
    lines
}

fn assignment(node: Node, source: &str, forced_tok: Option<&str>) -> Vec<String> {
    let left = node.child_by_field_name("left");
    let right = node.child_by_field_name("right");

    let mut lines = Vec::new();
    if let Some(left) = left {
        let mut cursor = left.walk();
        for (i, expr) in left.named_children(&mut cursor).enumerate() {
            if i > 0 {
                lines = cat_lines(lines, "", vec![", ".to_string()]);
            }
            lines = cat_lines(lines, "", node_to_lines(expr, source));
        }
    }

    let tok = forced_tok
        .map(str::to_string)
        .or_else(|| match (left, right) {
            (Some(l), Some(r)) => Some(source[l.end_byte()..r.start_byte()].trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "=".to_string());
    lines = cat_lines(lines, "", vec![format!(" {} ", tok)]);

    if let Some(right) = right {
        let mut cursor = right.walk();
        for (i, expr) in right.named_children(&mut cursor).enumerate() {
            if i > 0 {
                lines = cat_lines(lines, "", vec![", ".to_string()]);
            }
            lines = cat_lines(lines, "", node_to_lines(expr, source));
        }
    }
    lines
}

fn block_statement(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["{".to_string()];
    lines.extend(indent_all("    ", block_to_lines(node, source)));
    lines.push("}".to_string());
    lines
}

fn return_statement(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["return".to_string()];
    let mut cursor = node.walk();
    for (i, expr) in node.named_children(&mut cursor).enumerate() {
        let sep = if i == 0 { " " } else { ", " };
        let new_lines = node_to_lines(expr, source);
        lines = append_lines(lines, sep, new_lines);
    }
    lines
}

/// `catLines(a, sep, [single])` when `single` is itself multi-line: the
/// original's `appendLines` joins on the *first* line of `b` like `catLines`,
/// the only difference being it accepts a variadic tail rather than a slice.
fn append_lines(a: Vec<String>, sep: &str, b: Vec<String>) -> Vec<String> {
    cat_lines(a, sep, b)
}

fn prefixed_call(node: Node, source: &str, keyword: &str) -> Vec<String> {
    let mut lines = vec![keyword.to_string()];
    let mut cursor = node.walk();
    let call = node
        .named_children(&mut cursor)
        .last()
        .expect("defer/go statement always wraps a call");
    lines = cat_lines(lines, " ", node_to_lines(call, source));
    lines
}

fn send_statement(node: Node, source: &str) -> Vec<String> {
    let chan = node.child_by_field_name("channel").expect("send_statement always has a channel");
    let value = node.child_by_field_name("value").expect("send_statement always has a value");
    let mut lines = node_to_lines(chan, source);
    lines = cat_lines(lines, " ", vec!["<-".to_string()]);
    lines = cat_lines(lines, " ", node_to_lines(value, source));
    lines
}

fn switch_body_lines(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["{".to_string()];
    let mut cursor = node.walk();
    for case in node.named_children(&mut cursor) {
        if matches!(case.kind(), "expression_case" | "type_case" | "default_case") {
            lines.extend(indent_all("    ", node_to_lines(case, source)));
        }
    }
    lines.push("}".to_string());
    lines
}

fn expression_switch(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["switch".to_string()];
    if let Some(init) = node.child_by_field_name("initializer") {
        lines = append_lines(lines, " ", node_to_lines(init, source));
        lines = append_lines(lines, "", vec![";".to_string()]);
    }
    if let Some(value) = node.child_by_field_name("value") {
        lines = append_lines(lines, " ", node_to_lines(value, source));
    }
    let body = switch_body_lines(node, source);
    lines = append_lines(lines, " ", body);
    lines
}

fn type_switch(node: Node, source: &str) -> Vec<String> {
    let mut lines = vec!["switch".to_string()];
    if let Some(init) = node.child_by_field_name("initializer") {
        lines = append_lines(lines, " ", node_to_lines(init, source));
        lines = append_lines(lines, "", vec![";".to_string()]);
    }
    let mut cursor = node.walk();
    let guard = node.children(&mut cursor).find(|c| c.kind() == "type_switch_guard");
    if let Some(guard) = guard {
        lines = append_lines(lines, " ", pretty::print_to_lines(guard, source));
    }
    let body = switch_body_lines(node, source);
    lines = append_lines(lines, " ", body);
    lines
}

fn composite_literal(node: Node, source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(ty) = node.child_by_field_name("type") {
        lines = pretty::print_to_lines(ty, source);
    }
    lines = append_lines(lines, "", vec!["{".to_string()]);
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for (i, el) in body.named_children(&mut cursor).enumerate() {
            if i > 0 {
                lines = append_lines(lines, "", vec![", ".to_string()]);
            }
            lines = append_lines(lines, "", node_to_lines(el, source));
        }
    }
    lines = append_lines(lines, "", vec!["}".to_string()]);
    lines
}

fn unary_expression(node: Node, source: &str) -> Vec<String> {
    let op = node.child_by_field_name("operator").expect("unary_expression always has an operator");
    let operand = node.child_by_field_name("operand").expect("unary_expression always has an operand");
    let mut lines = vec![text(op, source).to_string()];
    lines = append_lines(lines, "", node_to_lines(operand, source));
    lines
}

fn call_expression(node: Node, source: &str) -> Vec<String> {
    let func = node.child_by_field_name("function").expect("call_expression always has a function");
    let mut lines = node_to_lines(func, source);
    lines = append_lines(lines, "", vec!["(".to_string()]);

    let mut has_ellipsis = false;
    if let Some(args) = node.child_by_field_name("arguments") {
        let mut cursor = args.walk();
        let mut i = 0;
        for child in args.named_children(&mut cursor) {
            if i > 0 {
                lines = append_lines(lines, "", vec![", ".to_string()]);
            }
            lines = append_lines(lines, "", node_to_lines(child, source));
            i += 1;
        }
        let mut c2 = args.walk();
        has_ellipsis = args.children(&mut c2).any(|c| c.kind() == "...");
    }
    if has_ellipsis {
        lines = append_lines(lines, "", vec!["...".to_string()]);
    }
    lines = append_lines(lines, "", vec![")".to_string()]);
    lines
}

fn keyed_element(node: Node, source: &str) -> Vec<String> {
    let key = node.child_by_field_name("key").expect("keyed_element always has a key");
    let value = node.child_by_field_name("value").expect("keyed_element always has a value");
    let mut lines = node_to_lines(key, source);
    lines = append_lines(lines, ": ", node_to_lines(value, source));
    lines
}

fn func_literal(node: Node, source: &str) -> Vec<String> {
    let body = node.child_by_field_name("body").expect("func_literal always has a body");
    let header = pretty::print_range(source, node.start_byte(), body.start_byte());
    let mut lines: Vec<String> = header.split('\n').map(str::to_string).collect();
    lines = append_lines(lines, " ", node_to_lines(body, source));
    lines
}

fn case_clause(node: Node, source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let values_field = if node.kind() == "type_case" { "type" } else { "value" };

    if node.kind() == "default_case" {
        lines.push("default:".to_string());
    } else {
        lines.push("case ".to_string());
        let mut cursor = node.walk();
        let mut i = 0;
        for v in node.children_by_field_name(values_field, &mut cursor) {
            if i > 0 {
                lines = append_lines(lines, "", vec![", ".to_string()]);
            }
            lines = append_lines(lines, "", node_to_lines(v, source));
            i += 1;
        }
        lines = append_lines(lines, "", vec![":".to_string()]);
    }

    let body_start = node
        .children_by_field_name(values_field, &mut node.walk())
        .map(|n| n.end_byte())
        .max()
        .unwrap_or(node.start_byte());
    let mut cursor = node.walk();
    for stmt in node.named_children(&mut cursor) {
        if stmt.start_byte() < body_start {
            continue;
        }
        lines.extend(indent_all("    ", node_to_lines(stmt, source)));
    }
    lines
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}
