//! Converts a parsed Go source file into the three top-level fragment trees
//! (`types`, `vars`, `funcs`) plus the package name and import path list.
//!
//! This is Component D: it owns every decision about how an `ast.Decl`-shaped
//! tree-sitter node becomes a [`Fragment`], mirroring `FileInfo.collect` and
//! the `new*` constructors of `original_source/godiff.go` one for one.

use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node, Parser};

use crate::fragment::{Fragment, Kind};
use crate::pretty;
use crate::statement::block_to_lines;

/// Failure to turn a source file into a usable parse tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load the Go grammar")]
    Grammar,
    #[error("{path} does not look like a Go source file: {detail}")]
    Syntax { path: String, detail: String },
}

/// The three sibling `NONE` fragments (types, vars, funcs), plus the package header.
pub struct FileInfo {
    pub package: String,
    pub imports: Vec<String>,
    pub types: Fragment,
    pub vars: Fragment,
    pub funcs: Fragment,
}

/// Parses `path` and builds its [`FileInfo`].
pub fn parse(path: &Path) -> Result<FileInfo, ParseError> {
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|_| ParseError::Grammar)?;

    let tree = parser.parse(&source, None).ok_or(ParseError::Grammar)?;
    let root = tree.root_node();

    if root.has_error() {
        return Err(ParseError::Syntax {
            path: path.display().to_string(),
            detail: first_error_description(root),
        });
    }

    Ok(collect(root, &source))
}

fn first_error_description(root: Node) -> String {
    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return format!(
                "{} at line {}",
                if node.is_missing() { "missing token" } else { "unexpected token" },
                node.start_position().row + 1
            );
        }
        stack.extend(node.children(&mut cursor));
    }
    "unknown parse error".to_string()
}

fn collect(root: Node, source: &str) -> FileInfo {
    let mut package = String::new();
    let mut imports = Vec::new();
    let mut types = Vec::new();
    let mut vars = Vec::new();
    let mut funcs = Vec::new();

    let mut cursor = root.walk();
    for decl in root.children(&mut cursor) {
        match decl.kind() {
            "package_clause" => {
                if let Some(name) = decl.named_child(0) {
                    package = text(name, source).to_string();
                }
            }
            "import_declaration" => collect_imports(decl, source, &mut imports),
            "type_declaration" => collect_type_specs(decl, source, &mut types),
            "const_declaration" => {
                let specs = collect_value_specs(decl, source, "const_spec");
                vars.push(Fragment::interior(Kind::Const, specs));
            }
            "var_declaration" => {
                for spec in collect_value_specs(decl, source, "var_spec") {
                    vars.push(Fragment::interior(Kind::Var, vec![spec]));
                }
            }
            "function_declaration" | "method_declaration" => {
                funcs.push(new_func_decl(decl, source));
            }
            _ => {}
        }
    }

    FileInfo {
        package,
        imports,
        types: Fragment::interior(Kind::None, types),
        vars: Fragment::interior(Kind::None, vars),
        funcs: Fragment::interior(Kind::None, funcs),
    }
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

fn collect_imports(decl: Node, source: &str, out: &mut Vec<String>) {
    let mut cursor = decl.walk();
    for child in decl.children(&mut cursor) {
        match child.kind() {
            "import_spec" => push_import_spec(child, source, out),
            "import_spec_list" => {
                let mut inner = child.walk();
                for spec in child.children(&mut inner) {
                    if spec.kind() == "import_spec" {
                        push_import_spec(spec, source, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_import_spec(spec: Node, source: &str, out: &mut Vec<String>) {
    let mut cursor = spec.walk();
    for child in spec.children(&mut cursor) {
        if matches!(child.kind(), "interpreted_string_literal" | "raw_string_literal") {
            out.push(text(child, source).to_string());
            return;
        }
    }
}

fn collect_type_specs(decl: Node, source: &str, out: &mut Vec<Fragment>) {
    let mut cursor = decl.walk();
    for child in decl.children(&mut cursor) {
        if child.kind() == "type_spec" {
            out.push(new_type_stmt_info(child, source));
        }
    }
}

fn new_type_stmt_info(spec: Node, source: &str) -> Fragment {
    let name = spec
        .child_by_field_name("name")
        .map(|n| text(n, source))
        .unwrap_or_default();
    let def = spec
        .child_by_field_name("type")
        .map(|n| new_type_def(n, source))
        .unwrap_or(Fragment::Null);
    Fragment::interior(Kind::Type, vec![Fragment::leaf(name, 100), def])
}

/// Builds the typedef fragment for a `type` node: `STRUCT`, `INTERFACE`,
/// `STAR`, or a pretty-printed fallback leaf (weight 50).
fn new_type_def(def: Node, source: &str) -> Fragment {
    match def.kind() {
        "struct_type" => {
            let fields = def
                .child_by_field_name("body")
                .map(|b| new_field_list(b, source))
                .unwrap_or_default();
            Fragment::interior(Kind::Struct, fields)
        }
        "interface_type" => Fragment::interior(Kind::Interface, new_interface_elems(def, source)),
        "pointer_type" => {
            let inner = def.named_child(0).map(|n| new_type_def(n, source)).unwrap_or(Fragment::Null);
            Fragment::interior(Kind::Star, vec![inner])
        }
        _ => Fragment::leaf(pretty::print(def, source), 50),
    }
}

fn new_field_list(list: Node, source: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut cursor = list.walk();
    for field in list.children(&mut cursor) {
        if field.kind() != "field_declaration" {
            continue;
        }
        let names: Vec<Node> = field.children_by_field_name("name", &mut field.walk()).collect();
        let type_node = field.child_by_field_name("type");
        if names.is_empty() {
            // Embedded field: possibly pointer-embedded (`*Base`).
            let embedded_type = embedded_field_type(field, type_node, source);
            out.push(Fragment::interior(Kind::Pair, vec![Fragment::leaf("", 50), embedded_type]));
        } else {
            for name in names {
                let ty = type_node.map(|t| new_type_def(t, source)).unwrap_or(Fragment::Null);
                out.push(Fragment::interior(
                    Kind::Pair,
                    vec![Fragment::leaf(text(name, source), 100), ty],
                ));
            }
        }
    }
    out
}

fn embedded_field_type(field: Node, type_node: Option<Node>, source: &str) -> Fragment {
    let Some(type_node) = type_node else {
        return Fragment::Null;
    };
    let has_star = field
        .children(&mut field.walk())
        .take_while(|c| c.id() != type_node.id())
        .any(|c| c.kind() == "*");
    if has_star {
        Fragment::interior(Kind::Star, vec![new_type_def(type_node, source)])
    } else {
        new_type_def(type_node, source)
    }
}

fn new_interface_elems(iface: Node, source: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut cursor = iface.walk();
    for elem in iface.children(&mut cursor) {
        match elem.kind() {
            "method_elem" => {
                let name = elem
                    .child_by_field_name("name")
                    .map(|n| text(n, source))
                    .unwrap_or_default();
                let params = elem.child_by_field_name("parameters");
                let sig_start = params.map(|p| p.start_byte()).unwrap_or(elem.end_byte());
                let sig = pretty::print_range(source, sig_start, elem.end_byte());
                out.push(Fragment::interior(
                    Kind::Pair,
                    vec![Fragment::leaf(name, 100), Fragment::leaf(sig, 50)],
                ));
            }
            "type_elem" | "type_identifier" | "qualified_type" => {
                // Embedded interface / union element.
                out.push(Fragment::interior(
                    Kind::Pair,
                    vec![Fragment::leaf("", 50), new_type_def(elem, source)],
                ));
            }
            _ => {}
        }
    }
    out
}

/// Builds `DF_PAIR` children for a parameter/result/receiver field list,
/// one per name (or one with an empty name for an unnamed/embedded slot).
fn new_name_types(list: Node, source: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut cursor = list.walk();
    for field in list.children(&mut cursor) {
        match field.kind() {
            "parameter_declaration" => {
                let names: Vec<Node> = field.children_by_field_name("name", &mut field.walk()).collect();
                let type_node = field.child_by_field_name("type");
                if names.is_empty() {
                    let ty = type_node.map(|t| new_type_def(t, source)).unwrap_or(Fragment::Null);
                    out.push(Fragment::interior(Kind::Pair, vec![Fragment::leaf("", 50), ty]));
                } else {
                    for name in names {
                        let ty = type_node.map(|t| new_type_def(t, source)).unwrap_or(Fragment::Null);
                        out.push(Fragment::interior(
                            Kind::Pair,
                            vec![Fragment::leaf(text(name, source), 100), ty],
                        ));
                    }
                }
            }
            "variadic_parameter_declaration" => {
                let name = field.child_by_field_name("name").map(|n| text(n, source));
                let type_node = field.child_by_field_name("type");
                let ty_text = type_node
                    .map(|t| format!("...{}", pretty::print(t, source)))
                    .unwrap_or_else(|| "...".to_string());
                let ty = Fragment::leaf(ty_text, 50);
                let name_leaf = match name {
                    Some(n) => Fragment::leaf(n, 100),
                    None => Fragment::leaf("", 50),
                };
                out.push(Fragment::interior(Kind::Pair, vec![name_leaf, ty]));
            }
            _ => {}
        }
    }
    out
}

fn collect_value_specs(decl: Node, source: &str, spec_kind: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut cursor = decl.walk();
    for spec in decl.children(&mut cursor) {
        if spec.kind() != spec_kind {
            continue;
        }
        let names: Vec<Fragment> = spec
            .children_by_field_name("name", &mut spec.walk())
            .map(|n| Fragment::leaf(text(n, source), 100))
            .collect();
        let ty = spec
            .child_by_field_name("type")
            .map(|t| new_type_def(t, source))
            .unwrap_or(Fragment::Null);
        let values: Vec<Fragment> = spec
            .child_by_field_name("value")
            .map(|list| {
                let mut vs = Vec::new();
                let mut vc = list.walk();
                for v in list.named_children(&mut vc) {
                    vs.push(new_exp_def(v, source));
                }
                vs
            })
            .unwrap_or_default();

        out.push(Fragment::interior(
            Kind::VarLine,
            vec![Fragment::interior(Kind::Names, names), ty, Fragment::interior(Kind::Values, values)],
        ));
    }
    out
}

/// An expression rendered to its own leaf fragment (weight 100), as
/// `newExpDef` does via `go/printer`.
fn new_exp_def(expr: Node, source: &str) -> Fragment {
    Fragment::leaf(pretty::print(expr, source), 100)
}

fn new_func_decl(decl: Node, source: &str) -> Fragment {
    let recv = decl
        .child_by_field_name("receiver")
        .map(|r| {
            let mut parts = new_name_types(r, source);
            // A receiver field list always has exactly one entry; if the
            // grammar ever produced none, treat the receiver as absent
            // rather than building a malformed FUNC child.
            if parts.len() == 1 { parts.remove(0) } else { Fragment::Null }
        })
        .unwrap_or(Fragment::Null);

    let name = decl
        .child_by_field_name("name")
        .map(|n| text(n, source))
        .unwrap_or_default();

    let params = decl
        .child_by_field_name("parameters")
        .map(|p| Fragment::interior(Kind::Names, new_name_types(p, source)))
        .unwrap_or(Fragment::Null);

    let results = decl
        .child_by_field_name("result")
        .map(|r| Fragment::interior(Kind::Results, new_result_types(r, source)))
        .unwrap_or(Fragment::Null);

    let body = decl
        .child_by_field_name("body")
        .map(|b| new_block_decl(b, source))
        .unwrap_or(Fragment::Null);

    Fragment::interior(
        Kind::Func,
        vec![recv, Fragment::leaf(name, 100), params, results, body],
    )
}

/// A function's `result` field is either a `parameter_list` (named or
/// multiple unnamed results) or a bare type node (single unnamed result).
fn new_result_types(result: Node, source: &str) -> Vec<Fragment> {
    if result.kind() == "parameter_list" {
        new_name_types(result, source)
    } else {
        vec![Fragment::interior(
            Kind::Pair,
            vec![Fragment::leaf("", 50), new_type_def(result, source)],
        )]
    }
}

fn new_block_decl(block: Node, source: &str) -> Fragment {
    let lines = block_to_lines(block, source);
    let children = lines.into_iter().map(|l| Fragment::leaf(l, 100)).collect();
    Fragment::interior(Kind::Block, children)
}
