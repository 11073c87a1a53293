// Mon Oct 19 2026 - Alex

use crate::output::ValueNode;
use colored::*;
use itertools::Itertools;

/// Indented text rendering of a value tree.
pub struct TreeFormatter {
    use_color: bool,
    show_types: bool,
    show_addresses: bool,
    indent: usize,
}

impl TreeFormatter {
    pub fn new() -> Self {
        Self {
            use_color: true,
            show_types: true,
            show_addresses: false,
            indent: 2,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_types(mut self, show: bool) -> Self {
        self.show_types = show;
        self
    }

    pub fn with_addresses(mut self, show: bool) -> Self {
        self.show_addresses = show;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn format(&self, node: &ValueNode) -> String {
        let mut lines = Vec::new();
        self.format_into(node, 0, &mut lines);
        lines.iter().join("\n")
    }

    fn format_into(&self, node: &ValueNode, level: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}{}", " ".repeat(level * self.indent), self.format_line(node)));
        for child in &node.children {
            self.format_into(child, level + 1, lines);
        }
    }

    pub fn format_line(&self, node: &ValueNode) -> String {
        let mut parts = Vec::new();
        parts.push(self.paint(&node.label, |s| s.cyan().bold()));
        if self.show_types && !node.type_name.is_empty() {
            parts.push(self.paint(&format!("({})", node.type_name), |s| s.yellow()));
        }
        if self.show_addresses {
            if let Some(address) = node.address {
                parts.push(self.paint(&format!("@ {}", address), |s| s.red()));
            }
        }
        if let Some(summary) = &node.summary {
            parts.push(format!("= {}", self.paint(summary, |s| s.green())));
        }
        if let Some(error) = &node.error {
            parts.push(self.paint(&format!("<error: {}>", error), |s| s.red().bold()));
        }
        parts.join(" ")
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for TreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Address;

    fn sample() -> ValueNode {
        ValueNode::new("value", "cista::basic_vector<int>")
            .with_address(Address::new(0x1000))
            .with_summary("size=2")
            .with_child(ValueNode::new("[0]", "int").with_summary("10"))
            .with_child(ValueNode::new("[1]", "int").with_error("Unreadable memory"))
    }

    #[test]
    fn test_plain_tree() {
        let text = TreeFormatter::new().with_color(false).format(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "value (cista::basic_vector<int>) = size=2");
        assert_eq!(lines[1], "  [0] (int) = 10");
        assert_eq!(lines[2], "  [1] (int) <error: Unreadable memory>");
    }

    #[test]
    fn test_addresses_and_no_types() {
        let formatter = TreeFormatter::new()
            .with_color(false)
            .with_types(false)
            .with_addresses(true);
        let line = formatter.format_line(&sample());
        assert_eq!(line, "value @ 0x0000000000001000 = size=2");
    }
}
