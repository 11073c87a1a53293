// Mon Oct 19 2026 - Alex

use crate::memory::Address;
use serde::Serialize;

/// One labeled entry of a rendered value tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueNode {
    pub label: String,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ValueNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValueNode {
    pub fn new(label: &str, type_name: &str) -> Self {
        Self {
            label: label.to_string(),
            type_name: type_name.to_string(),
            address: None,
            summary: None,
            children: Vec::new(),
            error: None,
        }
    }

    /// Marker appended when children were cut off.
    pub fn elided(remaining: u64) -> Self {
        Self::new("...", "").with_summary(format!("{} more", remaining))
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_child(mut self, child: ValueNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn child(&self, label: &str) -> Option<&ValueNode> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Follows `path` through child labels.
    pub fn find(&self, path: &[&str]) -> Option<&ValueNode> {
        path.iter().try_fold(self, |node, label| node.child(label))
    }

    /// Every error in the tree, depth first.
    pub fn errors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_errors(&mut out);
        out
    }

    fn collect_errors<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(e) = &self.error {
            out.push(e);
        }
        for child in &self.children {
            child.collect_errors(out);
        }
    }
}
