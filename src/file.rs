use std::{fs::File, io::BufReader, path::Path};

use serde_json::Value;

use crate::error::{Error, Result};

pub fn read_document(path: &Path) -> Result<Value> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    log::debug!("parsing {}", path.display());
    let reader = BufReader::new(f);
    Ok(serde_json::from_reader(reader)?)
}

pub fn parse_document(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}
