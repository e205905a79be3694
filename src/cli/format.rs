use crate::batch::BatchResult;
use crate::config::{RuleEntry, RuleTable, Severity};
use crate::registry::{OverrideLayer, Registry};
use crate::resolve::Resolution;
use serde_json::json;

fn severity_cell(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warn => "\x1b[33mwarn \x1b[0m",
        Severity::Off => "\x1b[90moff  \x1b[0m",
    }
}

fn options_cell(entry: &RuleEntry) -> String {
    if entry.options.is_empty() {
        String::new()
    } else {
        // Compact single-line rendering; options are opaque JSON values.
        let rendered: Vec<String> = entry
            .options
            .iter()
            .map(|v| serde_json::to_string(v).unwrap_or_default())
            .collect();
        format!(" \x1b[90m{}\x1b[0m", rendered.join(" "))
    }
}

/// A rule entry in its serialized form: bare severity string, or an array of
/// severity followed by options.
pub fn entry_json(entry: &RuleEntry) -> serde_json::Value {
    if entry.options.is_empty() {
        json!(entry.severity.as_str())
    } else {
        let mut values = vec![json!(entry.severity.as_str())];
        values.extend(entry.options.iter().cloned());
        json!(values)
    }
}

fn print_summary_line(table: &RuleTable) {
    let (errors, warnings, disabled) = table.severity_counts();
    println!(
        "\n\x1b[1m{} rules ({} error, {} warn, {} off)\x1b[0m",
        table.len(),
        errors,
        warnings,
        disabled
    );
}

/// Print one effective rule table with ANSI colors.
pub fn print_table_pretty(layer: &str, path: &str, table: &RuleTable) {
    println!("\x1b[4m{}\x1b[0m \x1b[90m(layer: {})\x1b[0m", path, layer);
    for (id, entry) in table.iter() {
        println!("  {} {:<52}{}", severity_cell(entry.severity), id, options_cell(entry));
    }
    print_summary_line(table);
}

/// Print one effective rule table as structured JSON.
pub fn print_table_json(layer: &str, path: &str, table: &RuleTable) {
    let rules: serde_json::Map<String, serde_json::Value> = table
        .iter()
        .map(|(id, entry)| (id.to_string(), entry_json(entry)))
        .collect();

    let output = json!({
        "layer": layer,
        "path": path,
        "rules": rules,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

/// Print an effective table with the origin of each winning entry.
pub fn print_resolution_pretty(layer: &str, path: &str, resolution: &Resolution) {
    println!("\x1b[4m{}\x1b[0m \x1b[90m(layer: {})\x1b[0m", path, layer);
    for (id, entry) in resolution.rules.iter() {
        let origin = resolution.origins.get(id).map(String::as_str).unwrap_or("?");
        println!(
            "  {} {:<52} \x1b[36m{}\x1b[0m",
            severity_cell(entry.severity),
            id,
            origin
        );
    }
    print_summary_line(&resolution.rules);
    println!(
        "\x1b[90m{} override{} applied\x1b[0m",
        resolution.overrides_applied,
        if resolution.overrides_applied == 1 { "" } else { "s" }
    );
}

/// Print per-file batch summaries.
pub fn print_batch_pretty(result: &BatchResult) {
    for report in &result.reports {
        if report.ignored {
            println!("\x1b[90m{:<60} (ignored)\x1b[0m", report.path.display());
            continue;
        }
        println!(
            "{:<60} \x1b[31m{} error\x1b[0m, \x1b[33m{} warn\x1b[0m, \x1b[90m{} off\x1b[0m ({} override{})",
            report.path.display(),
            report.errors,
            report.warnings,
            report.disabled,
            report.overrides_applied,
            if report.overrides_applied == 1 { "" } else { "s" }
        );
    }
    println!(
        "\n\x1b[1m{} files resolved, {} ignored\x1b[0m",
        result.files_resolved, result.files_ignored
    );
}

/// Print batch results as structured JSON.
pub fn print_batch_json(result: &BatchResult) {
    let files: Vec<_> = result
        .reports
        .iter()
        .map(|r| {
            json!({
                "path": r.path.display().to_string(),
                "ignored": r.ignored,
                "errors": r.errors,
                "warnings": r.warnings,
                "off": r.disabled,
                "overrides_applied": r.overrides_applied,
            })
        })
        .collect();

    let output = json!({
        "files": files,
        "summary": {
            "resolved": result.files_resolved,
            "ignored": result.files_ignored,
        },
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn override_count(overrides: &[OverrideLayer]) -> usize {
    overrides
        .iter()
        .map(|ov| 1 + override_count(&ov.overrides))
        .sum()
}

/// List all registry layers with parent, rule, and override counts.
pub fn print_layers_pretty(registry: &Registry) {
    for name in registry.names() {
        let layer = match registry.get(name) {
            Some(layer) => layer,
            None => continue,
        };
        let parent = layer
            .parent
            .as_deref()
            .map(|p| format!(" \x1b[90m-> {}\x1b[0m", p))
            .unwrap_or_default();
        println!("\x1b[1m{}\x1b[0m{}", name, parent);
        println!(
            "  {} rules, {} overrides, {} ignore patterns",
            layer.rules.len(),
            override_count(&layer.overrides),
            layer.ignore_patterns.len()
        );
    }
}

/// List all registry layers as structured JSON.
pub fn print_layers_json(registry: &Registry) {
    let layers: Vec<_> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|layer| {
            json!({
                "name": layer.name,
                "parent": layer.parent,
                "rules": layer.rules.len(),
                "overrides": override_count(&layer.overrides),
                "ignore_patterns": layer.ignore_patterns,
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "layers": layers })).unwrap()
    );
}
