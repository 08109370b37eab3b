//! Graphviz DOT serializer.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use kin_registry::PersonRegistry;
use kin_types::Person;

const FORWARD: &str = "[dir=forward, arrowhead=normal]";

/// Rendering knobs for [`to_dot_with`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Fill colour of person nodes.
    pub fill_color: String,
    /// Scheme of the `URL` attribute put on every person node.
    pub url_scheme: String,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            fill_color: "#E9F4FF".to_string(),
            url_scheme: "person".to_string(),
        }
    }
}

/// Render `registry` with the default [`GraphOptions`].
pub fn to_dot(registry: &PersonRegistry) -> String {
    to_dot_with(registry, &GraphOptions::default())
}

/// Render `registry` as a `strict digraph`.
///
/// Nodes come first, one per unique name in discovery order, then edges in
/// person order. Output is a pure function of the registry's order.
pub fn to_dot_with(registry: &PersonRegistry, options: &GraphOptions) -> String {
    let mut lines = vec![
        "strict digraph G {".to_string(),
        format!(
            "  node [shape=box, style=\"filled\", fillcolor=\"{}\"];",
            escape(&options.fill_color)
        ),
        "  edge [dir=none];".to_string(),
    ];

    // First entry per name, matching `PersonRegistry::get`.
    let mut by_name: HashMap<&str, &Person> = HashMap::with_capacity(registry.len());
    for person in registry.persons() {
        by_name.entry(person.name.as_str()).or_insert(person);
    }

    let names = registry.unique_names();
    for name in &names {
        lines.push(node_line(name, by_name.get(name).copied(), options));
    }

    let mut unions = HashSet::new();
    let mut edges = 0usize;
    for person in registry.persons() {
        let child = quoted(&person.name);
        match (person.mother_name(), person.father_name()) {
            (Some(mother), Some(father)) => {
                let union = quoted(&format!("{mother}_{father}_family"));
                if unions.insert(union.clone()) {
                    lines.push(format!("  {union} [shape=point];"));
                    lines.push(format!("  {} -> {union};", quoted(mother)));
                    lines.push(format!("  {} -> {union};", quoted(father)));
                    edges += 2;
                }
                lines.push(format!("  {union} -> {child} {FORWARD};"));
                edges += 1;
            }
            (Some(parent), None) | (None, Some(parent)) => {
                lines.push(format!("  {} -> {child} {FORWARD};", quoted(parent)));
                edges += 1;
            }
            (None, None) => {}
        }
    }

    lines.push("}".to_string());
    debug!(
        nodes = names.len(),
        unions = unions.len(),
        edges,
        "rendered dot graph"
    );
    lines.join("\n")
}

fn node_line(name: &str, person: Option<&Person>, options: &GraphOptions) -> String {
    let mut label = escape(name);
    if let Some(info) = person.and_then(Person::info_text).map(str::trim) {
        if !info.is_empty() {
            label.push_str("\\n");
            label.push_str(&escape(info));
        }
    }
    format!(
        "  {} [label=\"{label}\", URL=\"{}:{}\"];",
        quoted(name),
        escape(&options.url_scheme),
        urlencoding::encode(name)
    )
}

fn quoted(id: &str) -> String {
    format!("\"{}\"", escape(id))
}

/// Escape text for a double-quoted DOT string. Line breaks become the
/// centred-line escape `\n`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
