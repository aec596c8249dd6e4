//! Prometheus text exposition format (version 0.0.4).

use std::io::Write;

use crate::catalog::{self, MetricDesc};
use crate::sample::Sample;

/// Content type of the rendered exposition.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render samples in Prometheus exposition format.
///
/// Families are written in catalog order, each with HELP and TYPE comments.
/// Families without samples are omitted.
pub fn render(samples: &[Sample]) -> String {
    let mut output = Vec::with_capacity(samples.len() * 64);

    for desc in catalog::catalog() {
        let mut family = samples.iter().filter(|s| std::ptr::eq(s.desc, *desc)).peekable();
        if family.peek().is_none() {
            continue;
        }

        writeln!(output, "# HELP {} {}", desc.name, escape_help(desc.help)).ok();
        writeln!(output, "# TYPE {} {}", desc.name, desc.kind.as_str()).ok();

        for sample in family {
            writeln!(
                output,
                "{}{} {}",
                desc.name,
                format_labels(desc, &sample.label_values),
                format_value(sample.value)
            )
            .ok();
        }
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Format labels for Prometheus exposition format.
fn format_labels(desc: &MetricDesc, values: &[String]) -> String {
    if desc.labels.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = desc
        .labels
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect();

    format!("{{{}}}", parts.join(","))
}

/// Escape special characters in label values.
fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape special characters in HELP text.
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a floating point value for Prometheus.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
