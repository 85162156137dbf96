use std::{path::Path, sync::Arc};

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::Config;
use crate::depth::check_depth;
use crate::error::{Error, Result};
use crate::expand::ExpandSet;
use crate::file::{parse_document, read_document};
use crate::filter::{FilterOutcome, SearchTerm, TreeFilter};
use crate::path::KeyPath;
use crate::tree::list_children;
use crate::types::ChildPage;

/// Presentation-layer state: the loaded document and the live search term.
///
/// Every read recomputes the filtered view from these two; nothing derived is cached.
pub struct Session {
    doc: RwLock<Option<Arc<Value>>>,
    term: RwLock<SearchTerm>,
    engine: TreeFilter,
    max_depth: usize,
    preview_len: usize,
    page_size: usize,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(&Config::default())
    }
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            doc: RwLock::new(None),
            term: RwLock::new(SearchTerm::default()),
            engine: TreeFilter::with_parallel_min_children(config.search.parallel_min_children),
            max_depth: config.search.max_depth,
            preview_len: config.view.preview_len,
            page_size: config.view.page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn open_file(&self, path: &Path) -> Result<()> {
        self.replace_document(read_document(path)?)
    }

    pub fn open_str(&self, text: &str) -> Result<()> {
        self.replace_document(parse_document(text)?)
    }

    /// Installs `root` as the current document. Pages are read with [`Session::load_children`].
    pub fn replace_document(&self, root: Value) -> Result<()> {
        check_depth(&root, self.max_depth)?;
        *self.doc.write() = Some(Arc::new(root));
        log::debug!("document loaded");
        Ok(())
    }

    pub fn has_document(&self) -> bool {
        self.doc.read().is_some()
    }

    pub fn set_term(&self, raw: &str) {
        *self.term.write() = SearchTerm::new(raw);
    }

    pub fn clear_search(&self) {
        *self.term.write() = SearchTerm::default();
    }

    pub fn term(&self) -> SearchTerm {
        self.term.read().clone()
    }

    /// Pruned tree and match paths for the current document and term.
    pub fn view(&self) -> Result<FilterOutcome> {
        // Guards are dropped before the engine runs.
        let root = self.doc.read().clone().ok_or(Error::NoDocument)?;
        let term = self.term();
        Ok(self.engine.filter_document(Some(root.as_ref()), &term))
    }

    /// A page of children of `path` within the current view, with expand flags
    /// set from the current matches.
    pub fn load_children(&self, path: &KeyPath, offset: usize, limit: usize) -> Result<ChildPage> {
        let view = self.view()?;
        let expand = ExpandSet::new(&view.matches);
        list_children(&view.tree, path, offset, limit, self.preview_len, &expand)
    }

    /// Serialised subtree at `path` of the current view.
    pub fn node_value(&self, path: &KeyPath) -> Result<String> {
        let view = self.view()?;
        let value = path
            .resolve(&view.tree)
            .ok_or_else(|| Error::InvalidPath(path.joined()))?;
        Ok(serde_json::to_string(value)?)
    }
}
