//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries
//! (domain → application → infra / presentation) are maintained.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines that sit outside `#[cfg(test)]` blocks.
fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    let mut in_test = false;
    let mut depth = 0i32;
    let mut test_depth = 0i32;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") || trimmed.contains("#[cfg(all(test") {
            in_test = true;
            test_depth = depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if in_test && depth <= test_depth {
                        in_test = false;
                    }
                }
                _ => {}
            }
        }
        if !in_test && !trimmed.starts_with("//") && !trimmed.starts_with('*') {
            lines.push(line.to_string());
        }
    }
    lines
}

fn src_dir(layer: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer)
}

/// Every `file:line: text` in `layer` whose production code contains one of `needles`.
fn violations(layer: &str, needles: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for file in collect_rs_files(&src_dir(layer)) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in production_lines(&file).iter().enumerate() {
            if needles.iter().any(|n| line.contains(n)) {
                out.push(format!("{rel}:{}: {}", i + 1, line.trim()));
            }
        }
    }
    out
}

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let found = violations(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
            "reqwest",
        ],
    );
    assert!(found.is_empty(), "domain layer violations:\n{}", found.join("\n"));
}

#[test]
fn application_depends_only_on_domain_and_ports() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "reqwest", "std::fs"],
    );
    assert!(found.is_empty(), "application layer violations:\n{}", found.join("\n"));
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra layer violations:\n{}", found.join("\n"));
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let found = violations("infra", &["println!", "eprintln!"]);
    assert!(found.is_empty(), "infra must log through tracing:\n{}", found.join("\n"));
}

#[test]
fn no_inline_json_branching_in_commands() {
    let found = violations("commands", &["json: bool", "if json", "if !json"]);
    assert!(found.is_empty(), "commands must render through AppContext:\n{}", found.join("\n"));
}

#[test]
fn no_tokio_command_runner_outside_infra() {
    let mut found = Vec::new();
    for layer in ["domain", "application", "commands", "output"] {
        found.extend(violations(layer, &["TokioCommandRunner"]));
    }
    assert!(found.is_empty(), "construct runners in infra only:\n{}", found.join("\n"));
}
