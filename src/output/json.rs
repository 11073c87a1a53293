// Mon Oct 19 2026 - Alex

use crate::output::ValueNode;
use serde_json::{to_string, to_string_pretty};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn to_json(node: &ValueNode, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        to_string_pretty(node)
    } else {
        to_string(node)
    }
}

pub fn write_json<P: AsRef<Path>>(node: &ValueNode, path: P) -> std::io::Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, node)?;
    writer.write_all(b"\n")?;
    writer.flush()
}
