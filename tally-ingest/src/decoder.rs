//! Boundary with the page-content decoder.
//!
//! Decoding a PDF happens elsewhere; all we need per page is the set of
//! `{text, x, y}` fragments. The on-disk form is a JSON dump:
//!
//! ```json
//! {"pages": [[{"text": "01/15", "x": 36.0, "y": 512.4}, ...], ...]}
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::Token;

/// Suffix appended to the statement file name for its token dump
/// (`20240201-statements-5555-.pdf.tokens.json`).
pub const TOKEN_DUMP_SUFFIX: &str = ".tokens.json";

/// Yields the positioned tokens of every page of a document, in page order.
pub trait TokenSource {
    fn load_pages(&self, path: &Path) -> Result<Vec<Vec<Token>>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDump {
    pub pages: Vec<Vec<Token>>,
}

pub fn parse_token_dump(json: &str) -> Result<TokenDump> {
    Ok(serde_json::from_str(json)?)
}

/// Reads token dumps written by an external decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTokenDump;

impl TokenSource for JsonTokenDump {
    fn load_pages(&self, path: &Path) -> Result<Vec<Vec<Token>>> {
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let dump = parse_token_dump(&s).with_context(|| format!("parse token dump {}", path.display()))?;
        Ok(dump.pages)
    }
}

/// Name of the original statement a dump was made from: the dump's file
/// name without [`TOKEN_DUMP_SUFFIX`].
pub fn statement_filename(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(TOKEN_DUMP_SUFFIX).unwrap_or(name);
    Some(stem.to_string())
}
