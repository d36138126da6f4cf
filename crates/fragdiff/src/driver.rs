//! The diff driver and renderer (Component E): walks a pair of [`FileInfo`]
//! trees section by section and turns the result into hunk-marked text
//! lines, mirroring `DiffPackages`/`DiffImports`/`DiffTypes`/`DiffVars`/
//! `DiffFuncs`/`DiffLines`/`lineOutput` of `original_source/godiff.go`.

use fragdiff_core::{align, greedy_match, string_edit_distance};
use fragdiff_go::{Fragment, FileInfo};

use crate::config::RenderConfig;

const DEL: &str = "--- ";
const INS: &str = "+++ ";
const DEL_WHOLE: &str = "=== ";
const INS_WHOLE: &str = "### ";
const SAME: &str = "    ";
const ELISION: &str = "    ...";

/// Runs every section against `old`/`new` in order, returning the full
/// report as one line per entry (no trailing newline on any of them).
pub fn diff(old: &FileInfo, new: &FileInfo, cfg: &RenderConfig) -> Vec<String> {
    let mut out = Vec::new();
    diff_packages(old, new, cfg, &mut out);
    diff_imports(old, new, cfg, &mut out);
    diff_types(old, new, cfg, &mut out);
    diff_vars(old, new, cfg, &mut out);
    diff_funcs(old, new, cfg, &mut out);
    out
}

fn section_start(name: &str, cfg: &RenderConfig, out: &mut Vec<String>) {
    out.push(cfg.paint(&format!("===== {name}")));
}

fn section_end(name: &str, cfg: &RenderConfig, out: &mut Vec<String>) {
    out.push(cfg.paint(&format!("      {name} =====")));
}

fn diff_packages(old: &FileInfo, new: &FileInfo, cfg: &RenderConfig, out: &mut Vec<String>) {
    section_start("PACKAGES", cfg, out);
    if old.package != new.package {
        show_diff_line(&format!("package {}", old.package), &format!("package {}", new.package), out);
    }
    section_end("PACKAGES", cfg, out);
}

fn diff_imports(old: &FileInfo, new: &FileInfo, cfg: &RenderConfig, out: &mut Vec<String>) {
    section_start("IMPORTS", cfg, out);

    let mut a = old.imports.clone();
    let mut b = new.imports.clone();
    a.sort();
    b.sort();

    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() || j < b.len() {
        if i >= a.len() || (j < b.len() && a[i] > b[j]) {
            out.push(format!("{INS}import {}", b[j]));
            j += 1;
        } else if j >= b.len() || (i < a.len() && a[i] < b[j]) {
            out.push(format!("{DEL}import {}", a[i]));
            i += 1;
        } else {
            i += 1;
            j += 1;
        }
    }

    section_end("IMPORTS", cfg, out);
}

fn diff_types(old: &FileInfo, new: &FileInfo, cfg: &RenderConfig, out: &mut Vec<String>) {
    section_start("TYPES", cfg, out);

    let a = old.types.parts();
    let b = new.types.parts();
    let cost = cost_matrix(a, b);
    let assignment = greedy_match(&cost, |i| a[i].weight() / 2, |j| b[j].weight() / 2);

    for (i, m) in assignment.mat_a.iter().enumerate() {
        match m {
            None => out.push(format!("{DEL_WHOLE}type {} ...", type_name(&a[i]))),
            Some(j) if cost[i][*j] > 0 => show_diff(&a[i], &b[*j], out),
            Some(_) => {}
        }
    }
    for (j, m) in assignment.mat_b.iter().enumerate() {
        if m.is_none() {
            out.push(format!("{INS_WHOLE}type {} ...", type_name(&b[j])));
        }
    }

    section_end("TYPES", cfg, out);
}

fn diff_vars(old: &FileInfo, new: &FileInfo, cfg: &RenderConfig, out: &mut Vec<String>) {
    section_start("VARS", cfg, out);

    let a = old.vars.parts();
    let b = new.vars.parts();
    let cost = cost_matrix(a, b);
    let assignment = greedy_match(&cost, |i| a[i].weight() / 2, |j| b[j].weight() / 2);
    let gap = cfg.gap();

    for (i, m) in assignment.mat_a.iter().enumerate() {
        match m {
            None => show_elided(&a[i].render(""), gap, DEL, DEL_WHOLE, out),
            Some(j) if cost[i][*j] > 0 => {
                show_diff(&a[i], &b[*j], out);
                out.push(String::new());
            }
            Some(_) => {}
        }
    }
    for (j, m) in assignment.mat_b.iter().enumerate() {
        if m.is_none() {
            show_elided(&b[j].render(""), gap, INS, INS_WHOLE, out);
        }
    }

    section_end("VARS", cfg, out);
}

fn diff_funcs(old: &FileInfo, new: &FileInfo, cfg: &RenderConfig, out: &mut Vec<String>) {
    section_start("FUNCS", cfg, out);

    let a = old.funcs.parts();
    let b = new.funcs.parts();
    let cost = cost_matrix(a, b);
    let assignment = greedy_match(&cost, |i| a[i].weight() / 2, |j| b[j].weight() / 2);

    for (i, m) in assignment.mat_a.iter().enumerate() {
        match m {
            None => out.push(format!("{DEL_WHOLE}{}", a[i].one_line())),
            Some(j) if cost[i][*j] > 0 => show_diff(&a[i], &b[*j], out),
            Some(_) => {}
        }
    }
    for (j, m) in assignment.mat_b.iter().enumerate() {
        if m.is_none() {
            out.push(format!("{INS_WHOLE}{}", b[j].one_line()));
        }
    }

    section_end("FUNCS", cfg, out);
}

fn cost_matrix(a: &[Fragment], b: &[Fragment]) -> Vec<Vec<i64>> {
    a.iter().map(|x| b.iter().map(|y| x.diff(y)).collect()).collect()
}

/// The name leaf of a `TYPE` fragment (its first child), for the
/// whole-declaration delete/insert markers.
fn type_name(type_fragment: &Fragment) -> String {
    type_fragment
        .parts()
        .first()
        .and_then(|name| name.render("").into_iter().next())
        .unwrap_or_default()
}

fn show_diff_line(old: &str, new: &str, out: &mut Vec<String>) {
    out.push(format!("{DEL}{old}"));
    out.push(format!("{INS}{new}"));
}

fn show_diff(old: &Fragment, new: &Fragment, out: &mut Vec<String>) {
    diff_lines(&old.render(""), &new.render(""), out);
}

/// Shows every line of `lines` verbatim when there's little enough of it to
/// fit within `gap` lines of context at each end; otherwise keeps the first
/// and last `gap` lines and collapses the middle to a single `...` marker.
fn show_elided(lines: &[String], gap: usize, line_prefix: &str, marker_prefix: &str, out: &mut Vec<String>) {
    if lines.len() <= gap * 2 + 1 {
        for line in lines {
            out.push(format!("{line_prefix}{line}"));
        }
        return;
    }

    for (i, line) in lines.iter().enumerate() {
        if i < gap || i >= lines.len() - gap {
            out.push(format!("{line_prefix}{line}"));
        }
        if i == gap {
            out.push(format!("{marker_prefix}{ELISION}"));
        }
    }
}

/// Cost of substituting rendered line `a` for line `b`: zero when identical,
/// otherwise a character-edit-distance ratio scaled to `max`, so that a
/// one-character change in a long line costs far less than replacing it
/// outright with an unrelated line of the same length.
fn diff_of_strings(a: &str, b: &str, max: i64) -> i64 {
    if a == b {
        return 0;
    }
    let distance = string_edit_distance(a, b);
    let denom = a.len().max(b.len()) as i64;
    distance * max / denom
}

/// Accumulates a run of matched, unchanged lines and collapses it to at most
/// three lines of output (first, `...`, last) once a change interrupts it.
struct LineOutput<'a> {
    out: &'a mut Vec<String>,
    same_lines: Vec<String>,
}

impl<'a> LineOutput<'a> {
    fn new(out: &'a mut Vec<String>) -> Self {
        LineOutput { out, same_lines: Vec::new() }
    }

    fn output_del(&mut self, line: &str) {
        self.end();
        self.out.push(format!("{DEL}{line}"));
    }

    fn output_ins(&mut self, line: &str) {
        self.end();
        self.out.push(format!("{INS}{line}"));
    }

    fn output_same(&mut self, line: String) {
        self.same_lines.push(line);
    }

    fn end(&mut self) {
        if !self.same_lines.is_empty() {
            self.out.push(format!("{SAME}{}", self.same_lines[0]));
            if self.same_lines.len() > 2 {
                self.out.push(format!("{SAME}{ELISION}"));
            }
            if self.same_lines.len() > 1 {
                self.out.push(format!("{SAME}{}", self.same_lines[self.same_lines.len() - 1]));
            }
        }
        self.same_lines.clear();
    }
}

/// Structural line diff between two fully-rendered declarations: aligns
/// `org_lines` against `new_lines` by minimum edit cost, then walks the
/// alignment emitting deletions, insertions and elided runs of context.
fn diff_lines(org_lines: &[String], new_lines: &[String], out: &mut Vec<String>) {
    if org_lines.is_empty() && new_lines.is_empty() {
        return;
    }

    let alignment = align(
        org_lines.len(),
        new_lines.len(),
        |i, j| diff_of_strings(&org_lines[i], &new_lines[j], 2000),
        |_| 1000,
        |_| 1000,
    );

    let mut lo = LineOutput::new(out);
    let (mut i, mut j) = (0usize, 0usize);
    while i < org_lines.len() || j < new_lines.len() {
        if j >= new_lines.len() || (i < org_lines.len() && alignment.mat_a[i].is_none()) {
            lo.output_del(&org_lines[i]);
            i += 1;
        } else if i >= org_lines.len() || (j < new_lines.len() && alignment.mat_b[j].is_none()) {
            lo.output_ins(&new_lines[j]);
            j += 1;
        } else {
            if org_lines[i].trim() != new_lines[j].trim() {
                lo.output_del(&org_lines[i]);
                lo.output_ins(&new_lines[j]);
            } else {
                lo.output_same(org_lines[i].clone());
            }
            i += 1;
            j += 1;
        }
    }
    lo.end();
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragdiff_go::Kind;

    fn leaf(text: &str) -> Fragment {
        Fragment::leaf(text, 100)
    }

    #[test]
    fn identical_declarations_produce_no_line_diff() {
        let mut out = Vec::new();
        let lines = vec!["func F() {".to_string(), "}".to_string()];
        diff_lines(&lines, &lines, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn pure_insertion_has_no_context_to_elide() {
        let mut out = Vec::new();
        diff_lines(&[], &["x".to_string()], &mut out);
        assert_eq!(out, vec!["+++ x".to_string()]);
    }

    #[test]
    fn changed_line_surrounded_by_context_collapses_the_middle() {
        let old: Vec<String> = (0..7).map(|i| format!("line{i}")).collect();
        let mut new = old.clone();
        new[3] = "changed".to_string();
        let mut out = Vec::new();
        diff_lines(&old, &new, &mut out);
        assert_eq!(
            out,
            vec![
                "    line0".to_string(),
                "        ...".to_string(),
                "    line2".to_string(),
                "--- line3".to_string(),
                "+++ changed".to_string(),
                "    line4".to_string(),
                "        ...".to_string(),
                "    line6".to_string(),
            ]
        );
    }

    #[test]
    fn show_elided_keeps_gap_lines_at_each_end() {
        let lines: Vec<String> = (0..6).map(|i| format!("l{i}")).collect();
        let mut out = Vec::new();
        show_elided(&lines, 2, DEL, DEL_WHOLE, &mut out);
        assert_eq!(
            out,
            vec![
                "--- l0".to_string(),
                "--- l1".to_string(),
                "===     ...".to_string(),
                "--- l4".to_string(),
                "--- l5".to_string(),
            ]
        );
    }

    #[test]
    fn show_elided_shows_everything_when_short() {
        let lines = vec!["only".to_string()];
        let mut out = Vec::new();
        show_elided(&lines, 2, DEL, DEL_WHOLE, &mut out);
        assert_eq!(out, vec!["--- only".to_string()]);
    }

    #[test]
    fn unmatched_type_gets_a_whole_line_marker() {
        let cfg = RenderConfig::default();
        let old = FileInfo {
            package: "p".to_string(),
            imports: vec![],
            types: Fragment::interior(Kind::None, vec![Fragment::interior(Kind::Type, vec![leaf("Foo"), Fragment::Null])]),
            vars: Fragment::interior(Kind::None, vec![]),
            funcs: Fragment::interior(Kind::None, vec![]),
        };
        let new = FileInfo {
            package: "p".to_string(),
            imports: vec![],
            types: Fragment::interior(Kind::None, vec![]),
            vars: Fragment::interior(Kind::None, vec![]),
            funcs: Fragment::interior(Kind::None, vec![]),
        };
        let out = diff(&old, &new, &cfg);
        assert!(out.iter().any(|l| l == "=== type Foo ..."));
    }

    #[test]
    fn differing_package_names_show_as_a_pair() {
        let cfg = RenderConfig::default();
        let mut old = empty_file_info("old");
        let new = empty_file_info("new");
        old.package = "old".to_string();
        let out = diff(&old, &new, &cfg);
        assert!(out.contains(&"--- package old".to_string()));
        assert!(out.contains(&"+++ package new".to_string()));
    }

    fn empty_file_info(package: &str) -> FileInfo {
        FileInfo {
            package: package.to_string(),
            imports: vec![],
            types: Fragment::interior(Kind::None, vec![]),
            vars: Fragment::interior(Kind::None, vec![]),
            funcs: Fragment::interior(Kind::None, vec![]),
        }
    }
}
