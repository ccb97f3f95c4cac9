//! Hygiene: source-level standards for the gesture library
//!
//! Scans `src/` (test files excluded) for constructs the library must not
//! ship. Budgets only go down: to spend one, remove an existing hit first.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

// Recognizers absorb anomalies through guards; nothing may abort the host.
const UNWRAP: Budget = Budget { pattern: ".unwrap()", max: 0, why: "panics on None/Err" };
const EXPECT: Budget = Budget { pattern: ".expect(", max: 0, why: "panics on None/Err" };
const PANIC: Budget = Budget { pattern: "panic!(", max: 0, why: "aborts the host event loop" };
const UNREACHABLE: Budget = Budget { pattern: "unreachable!(", max: 0, why: "aborts the host event loop" };
const TODO: Budget = Budget { pattern: "todo!(", max: 0, why: "unfinished code path" };
const UNIMPLEMENTED: Budget = Budget { pattern: "unimplemented!(", max: 0, why: "unfinished code path" };

// Errors are handled or logged, never dropped.
const SILENT_DISCARD: Budget = Budget { pattern: "let _ =", max: 0, why: "discards a value unread" };
const DOT_OK: Budget = Budget { pattern: ".ok()", max: 0, why: "discards an error unread" };

// Output goes through `tracing`.
const PRINTLN: Budget = Budget { pattern: "println!(", max: 0, why: "bypasses tracing" };
const DBG: Budget = Budget { pattern: "dbg!(", max: 0, why: "debug leftover" };

const ALLOW_DEAD_CODE: Budget = Budget { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" };

fn production_sources() -> Vec<(PathBuf, String)> {
    let mut out = Vec::new();
    walk(Path::new("src"), &mut out);
    out
}

fn walk(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            walk(&path, out);
            continue;
        }
        let is_rust = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if !is_rust || is_test {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push((path, content));
        }
    }
}

fn check(budget: &Budget) {
    let sources = production_sources();
    assert!(!sources.is_empty(), "no sources found under src/");

    let hits: Vec<(String, usize)> = sources
        .iter()
        .filter_map(|(path, content)| {
            let count = content.lines().filter(|line| line.contains(budget.pattern)).count();
            (count > 0).then(|| (path.display().to_string(), count))
        })
        .collect();
    let found: usize = hits.iter().map(|(_, count)| count).sum();

    let listing = hits
        .iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(
        found <= budget.max,
        "`{}` budget exceeded ({}): found {found}, max {}.\n{listing}",
        budget.pattern,
        budget.why,
        budget.max,
    );
}

#[test]
fn unwrap_budget() {
    check(&UNWRAP);
}

#[test]
fn expect_budget() {
    check(&EXPECT);
}

#[test]
fn panic_budget() {
    check(&PANIC);
}

#[test]
fn unreachable_budget() {
    check(&UNREACHABLE);
}

#[test]
fn todo_budget() {
    check(&TODO);
}

#[test]
fn unimplemented_budget() {
    check(&UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check(&SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check(&DOT_OK);
}

#[test]
fn println_budget() {
    check(&PRINTLN);
}

#[test]
fn dbg_budget() {
    check(&DBG);
}

#[test]
fn allow_dead_code_budget() {
    check(&ALLOW_DEAD_CODE);
}
