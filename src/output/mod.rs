// Mon Oct 19 2026 - Alex

pub mod json;
pub mod node;
pub mod presenter;
pub mod tree;

pub use json::{to_json, write_json};
pub use node::ValueNode;
pub use presenter::{BitsetStyle, Presenter, PresenterOptions};
pub use tree::TreeFormatter;
