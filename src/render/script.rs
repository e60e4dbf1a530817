// file: src/render/script.rs
// description: in-memory Nuke script model and .nk text serialization
// reference: Nuke .nk stack-based script format

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub enum Knob {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Knob {
    pub fn text(value: impl Into<String>) -> Self {
        Knob::Text(value.into())
    }

    fn render(&self) -> String {
        match self {
            Knob::Int(v) => v.to_string(),
            Knob::Float(v) => v.to_string(),
            Knob::Bool(v) => v.to_string(),
            Knob::Text(v) => quote(v),
        }
    }
}

/// Quotes a knob value so Tcl treats it as a literal string.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' | '\\' | '[' | ']' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct NukeNode {
    pub class: String,
    pub name: String,
    pub input: Option<usize>,
    pub knobs: Vec<(String, Knob)>,
}

impl NukeNode {
    pub fn new(class: &str, name: String, input: Option<usize>) -> Self {
        Self {
            class: class.to_string(),
            name,
            input,
            knobs: Vec::new(),
        }
    }

    pub fn knob(mut self, name: &str, value: Knob) -> Self {
        self.knobs.push((name.to_string(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Knob> {
        self.knobs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// Root settings plus a list of nodes. Inputs refer to node indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NukeScript {
    pub root: Vec<(String, Knob)>,
    pub nodes: Vec<NukeNode>,
}

impl NukeScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, name: &str, value: Knob) {
        match self.root.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.root.push((name.to_string(), value)),
        }
    }

    pub fn add_node(&mut self, node: NukeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, index: usize) -> Option<&NukeNode> {
        self.nodes.get(index)
    }

    /// Serializes to .nk text. Each node is stored in a stack variable so a
    /// node whose input is not the previous one can `push` it back.
    pub fn to_nk(&self) -> String {
        let mut out = String::from("#! nuke -nx\n");

        out.push_str("Root {\n inputs 0\n");
        for (name, value) in &self.root {
            let _ = writeln!(out, " {} {}", name, value.render());
        }
        out.push_str("}\n");

        let mut top: Option<usize> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(input) = node.input
                && top != Some(input)
            {
                let _ = writeln!(out, "push $N{}", input);
            }

            let _ = writeln!(out, "{} {{", node.class);
            let _ = writeln!(out, " inputs {}", usize::from(node.input.is_some()));
            for (name, value) in &node.knobs {
                let _ = writeln!(out, " {} {}", name, value.render());
            }
            let _ = writeln!(out, " name {}", node.name);
            out.push_str("}\n");
            let _ = writeln!(out, "set N{} [stack 0]", index);

            top = Some(index);
        }

        out
    }
}
