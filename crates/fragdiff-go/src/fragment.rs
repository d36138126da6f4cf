//! The fragment tree: a tagged, weighted tree representation of a Go
//! declaration that knows how to diff and render itself.
//!
//! [`Fragment::Null`] stands in for an absent child slot (a declaration with
//! no receiver, a var spec with no initializer, ...). It is a first-class
//! value, not an `Option`: it participates in [`Fragment::diff`] exactly like
//! any other fragment, with weight zero.

use fragdiff_core::align;

/// The shape of an interior fragment. Children counts and roles are fixed
/// per kind; the builder is responsible for respecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An unordered top-level list: children are concatenated independently.
    None,
    Type,
    Const,
    Var,
    Struct,
    Interface,
    Func,
    Star,
    VarLine,
    Pair,
    Names,
    Values,
    Block,
    Results,
}

impl Kind {
    fn keyword(self) -> &'static str {
        match self {
            Kind::None => "",
            Kind::Type => "type",
            Kind::Const => "const",
            Kind::Var => "var",
            Kind::Struct => "struct",
            Kind::Interface => "interface",
            Kind::Func => "func",
            Kind::Star => "*",
            Kind::VarLine | Kind::Pair | Kind::Names | Kind::Values | Kind::Block | Kind::Results => "",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Fragment {
    Null,
    Leaf {
        text: String,
        weight: i64,
    },
    Interior {
        kind: Kind,
        children: Vec<Fragment>,
    },
}

impl Fragment {
    pub fn leaf(text: impl Into<String>, weight: i64) -> Fragment {
        Fragment::Leaf {
            text: text.into(),
            weight,
        }
    }

    pub fn interior(kind: Kind, children: Vec<Fragment>) -> Fragment {
        Fragment::Interior { kind, children }
    }

    fn leaf_text(&self) -> Option<&str> {
        match self {
            Fragment::Leaf { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Sum of leaf weights reachable from this fragment; zero for [`Fragment::Null`].
    pub fn weight(&self) -> i64 {
        match self {
            Fragment::Null => 0,
            Fragment::Leaf { weight, .. } => *weight,
            Fragment::Interior { children, .. } => children.iter().map(Fragment::weight).sum(),
        }
    }

    /// Cost of turning `self` into `other`. `diff(f, f) == 0` for any `f`;
    /// diffing against [`Fragment::Null`] always costs the other side's full
    /// weight; diffing fragments of different interior kinds (or a leaf
    /// against an interior) always costs the sum of both weights.
    pub fn diff(&self, other: &Fragment) -> i64 {
        match (self, other) {
            (Fragment::Null, _) => other.weight(),
            (_, Fragment::Null) => self.weight(),
            (Fragment::Leaf { text: a, weight: wa }, Fragment::Leaf { text: b, weight: wb }) => {
                if a.is_empty() && b.is_empty() {
                    0
                } else {
                    let d = fragdiff_core::string_edit_distance(a, b);
                    let denom = a.len().max(b.len()) as i64;
                    d * (wa + wb) / denom
                }
            }
            (Fragment::Interior { kind: ka, children: ca }, Fragment::Interior { kind: kb, children: cb })
                if ka == kb =>
            {
                align(
                    ca.len(),
                    cb.len(),
                    |i, j| ca[i].diff(&cb[j]),
                    |i| ca[i].weight(),
                    |j| cb[j].weight(),
                )
                .cost
            }
            _ => self.weight() + other.weight(),
        }
    }

    /// Renders this fragment as a sequence of lines, with `indent` prefixed
    /// to every continuation line a child introduces.
    pub fn render(&self, indent: &str) -> Vec<String> {
        match self {
            Fragment::Null => Vec::new(),
            Fragment::Leaf { text, .. } => leaf_lines(text, indent),
            Fragment::Interior { kind, children } => render_interior(*kind, children, indent),
        }
    }

    /// A single-line summary: the sole line if `render("")` produces one,
    /// `first ... last` if it produces several, or the empty string.
    pub fn one_line(&self) -> String {
        let lines = self.render("");
        match lines.len() {
            0 => String::new(),
            1 => lines[0].clone(),
            _ => format!("{} ... {}", lines[0], lines[lines.len() - 1]),
        }
    }

    /// The children of an interior fragment; empty for [`Fragment::Null`]
    /// and [`Fragment::Leaf`]. The top-level `types`/`vars`/`funcs` trees are
    /// always `NONE` interiors, so this is how callers walk their entries.
    pub fn parts(&self) -> &[Fragment] {
        match self {
            Fragment::Interior { children, .. } => children,
            _ => &[],
        }
    }
}

fn leaf_lines(text: &str, indent: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    for l in lines.iter_mut().skip(1) {
        *l = format!("{indent}{l}");
    }
    lines
}

pub(crate) fn cat(a: &str, sep: &str, b: &str) -> String {
    if !a.is_empty() && !b.is_empty() {
        format!("{a}{sep}{b}")
    } else {
        format!("{a}{b}")
    }
}

/// Joins two line sequences, merging `a`'s last line with `b`'s first line
/// through `sep` when both are non-empty; otherwise a plain concatenation.
pub(crate) fn cat_lines(mut a: Vec<String>, sep: &str, mut b: Vec<String>) -> Vec<String> {
    if !a.is_empty() && !b.is_empty() {
        let last = a.pop().expect("checked non-empty above");
        b[0] = cat(&last, sep, &b[0]);
    }
    a.extend(b);
    a
}

/// A fragment was built with the wrong number of children for its `Kind`.
/// Fatal: the diff metric and renderer assume these arities hold, so a
/// mismatch means the builder itself is wrong, not the input source.
fn assert_arity(kind: Kind, children: &[Fragment], expected: usize) {
    if children.len() != expected {
        panic!("builder error: {kind:?} fragment requires exactly {expected} children, got {}", children.len());
    }
}

fn render_interior(kind: Kind, children: &[Fragment], indent: &str) -> Vec<String> {
    let child_indent = format!("{indent}    ");
    match kind {
        Kind::None => {
            let mut lines = Vec::new();
            for c in children {
                lines.extend(c.render(indent));
            }
            lines
        }

        Kind::Type => {
            assert_arity(kind, children, 2);
            let lines = cat_lines(vec![kind.keyword().to_string()], " ", children[0].render(indent));
            cat_lines(lines, " ", children[1].render(indent))
        }

        Kind::Const if children.len() == 1 => {
            cat_lines(vec![kind.keyword().to_string()], " ", children[0].render(indent))
        }

        Kind::Const => {
            let mut lines = vec![format!("{}(", kind.keyword())];
            for spec in children {
                let block = cat_lines(vec![child_indent.clone()], "", spec.render(&child_indent));
                lines.extend(block);
            }
            lines.push(format!("{indent})"));
            lines
        }

        Kind::Var => {
            assert_arity(kind, children, 1);
            cat_lines(vec![kind.keyword().to_string()], " ", children[0].render(&child_indent))
        }

        Kind::VarLine => {
            assert_arity(kind, children, 3);
            let names = children[0].render(indent);
            let ty = children[1].render(indent);
            let values = children[2].render(indent);
            let lines = cat_lines(names, " ", ty);
            cat_lines(lines, " = ", values)
        }

        Kind::Struct | Kind::Interface => {
            let mut lines = vec![format!("{} {{", kind.keyword())];
            for p in children {
                let mut lns = p.render(&child_indent);
                if !lns.is_empty() {
                    lns[0] = format!("{child_indent}{}", lns[0]);
                    lines.extend(lns);
                }
            }
            lines.push(format!("{indent}}}"));
            lines
        }

        Kind::Star => {
            assert_arity(kind, children, 1);
            cat_lines(vec!["*".to_string()], "", children[0].render(indent))
        }

        Kind::Pair => {
            assert_arity(kind, children, 2);
            cat_lines(children[0].render(indent), " ", children[1].render(indent))
        }

        Kind::Names => {
            let mut s = String::new();
            for p in children {
                let lns = p.render(&child_indent);
                let first = lns.first().map(String::as_str).unwrap_or("");
                s = cat(&s, ", ", first);
            }
            vec![s]
        }

        Kind::Values => {
            let mut lines = Vec::new();
            for p in children {
                lines = cat_lines(lines, ", ", p.render(&child_indent));
            }
            lines
        }

        Kind::Block => {
            let mut lines = vec!["{".to_string()];
            for c in children {
                let block = cat_lines(vec![child_indent.clone()], "", c.render(&child_indent));
                lines.extend(block);
            }
            lines.push(format!("{indent}}}"));
            lines
        }

        Kind::Results => {
            if children.is_empty() {
                return Vec::new();
            }
            let named = children[0]
                .leaf_text_of_first_child()
                .map(|t| !t.is_empty())
                .unwrap_or(false);
            let wrap = children.len() > 1 || named;

            let mut lines = Vec::new();
            if wrap {
                lines.push("(".to_string());
            }
            for (i, p) in children.iter().enumerate() {
                if i > 0 {
                    lines = cat_lines(lines, "", vec![", ".to_string()]);
                }
                lines = cat_lines(lines, "", p.render(&child_indent));
            }
            if wrap {
                lines = cat_lines(lines, "", vec![")".to_string()]);
            }
            lines
        }

        Kind::Func => {
            assert_arity(kind, children, 5);
            let mut lines = vec!["func".to_string()];
            let recv = &children[0];
            if !matches!(recv, Fragment::Null) {
                lines = cat_lines(lines, " (", recv.render(&child_indent));
                lines = cat_lines(lines, "", vec![")".to_string()]);
            }
            lines = cat_lines(lines, " ", children[1].render(&child_indent));
            lines = cat_lines(lines, "", vec!["(".to_string()]);
            lines = cat_lines(lines, "", children[2].render(&child_indent));
            lines = cat_lines(lines, "", vec![")".to_string()]);
            lines = cat_lines(lines, " ", children[3].render(&child_indent));
            lines = cat_lines(lines, " ", children[4].render(indent));
            lines
        }
    }
}

impl Fragment {
    /// For a [`Kind::Pair`] fragment, the text of its first (name) leaf
    /// child, used by [`Kind::Results`] to decide whether a single result is
    /// named (and therefore needs parenthesizing).
    fn leaf_text_of_first_child(&self) -> Option<&str> {
        match self {
            Fragment::Interior { kind: Kind::Pair, children } => children.first().and_then(Fragment::leaf_text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_diffs_to_the_other_sides_full_weight() {
        let f = Fragment::leaf("x", 100);
        assert_eq!(Fragment::Null.diff(&f), 100);
        assert_eq!(f.diff(&Fragment::Null), 100);
        assert_eq!(Fragment::Null.diff(&Fragment::Null), 0);
    }

    #[test]
    fn identical_leaves_diff_to_zero() {
        let a = Fragment::leaf("foo", 100);
        let b = Fragment::leaf("foo", 100);
        assert_eq!(a.diff(&b), 0);
    }

    #[test]
    fn different_kinds_cost_the_sum_of_weights() {
        let a = Fragment::interior(Kind::Struct, vec![]);
        let b = Fragment::interior(Kind::Interface, vec![]);
        let leaf = Fragment::leaf("x", 50);
        assert_eq!(a.diff(&leaf), a.weight() + leaf.weight());
        assert_eq!(leaf.weight(), 50);
    }

    #[test]
    fn var_line_omits_missing_type_and_values() {
        let names = Fragment::interior(Kind::Names, vec![Fragment::leaf("x", 100)]);
        let line = Fragment::interior(Kind::VarLine, vec![names, Fragment::Null, Fragment::interior(Kind::Values, vec![])]);
        assert_eq!(line.render(""), vec!["x".to_string()]);
    }

    #[test]
    fn var_line_renders_type_and_value() {
        let names = Fragment::interior(Kind::Names, vec![Fragment::leaf("x", 100)]);
        let ty = Fragment::leaf("int", 50);
        let values = Fragment::interior(Kind::Values, vec![Fragment::leaf("1", 100)]);
        let line = Fragment::interior(Kind::VarLine, vec![names, ty, values]);
        assert_eq!(line.render(""), vec!["x int = 1".to_string()]);
    }

    #[test]
    fn func_without_receiver_or_results_omits_both() {
        let name = Fragment::leaf("F", 100);
        let params = Fragment::interior(Kind::Names, vec![]);
        let results = Fragment::interior(Kind::Results, vec![]);
        let body = Fragment::interior(Kind::Block, vec![]);
        let f = Fragment::interior(Kind::Func, vec![Fragment::Null, name, params, results, body]);
        assert_eq!(f.render(""), vec!["func F() {".to_string(), "}".to_string()]);
    }

    #[test]
    fn one_line_summarizes_multiline_render() {
        let name = Fragment::leaf("F", 100);
        let params = Fragment::interior(Kind::Names, vec![]);
        let results = Fragment::interior(Kind::Results, vec![]);
        let body = Fragment::interior(
            Kind::Block,
            vec![Fragment::leaf("return", 100)],
        );
        let f = Fragment::interior(Kind::Func, vec![Fragment::Null, name, params, results, body]);
        assert_eq!(f.one_line(), "func F() { ... }");
    }
}
