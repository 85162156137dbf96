use serde::Serialize;

use crate::path::KeyPath;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub path: KeyPath,            // key-path of this node in the listed tree
    pub pointer: String,          // same location as a JSON Pointer
    pub key: Option<String>,      // key if object, index if array (as string)
    pub value_type: String,       // "object" | "array" | "string" | "number" | ...
    pub has_children: bool,
    pub child_count: usize,
    pub preview: String,          // short preview for leafs / strings / numbers
    pub expanded: bool,           // starts open under the active search
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildPage {
    pub nodes: Vec<Node>,
    pub total_count: usize,
    pub has_more: bool,
}
