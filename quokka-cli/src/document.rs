//! JSON element trees for `quokka apply`.
//!
//! ```json
//! { "tag": "div", "attrs": { "id": "panel" }, "width": 400, "height": 300,
//!   "children": [ { "tag": "span", "text": "hello" } ] }
//! ```
//!
//! `width` and `height` are the element's content size. They become the
//! parent metrics of its children; elements without a sized ancestor are
//! measured against the viewport.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quokka_css::ElementMetrics;
use quokka_dom::{Document, ElementData, NodeId};
use serde::Deserialize;

/// One element of the input tree.
#[derive(Debug, Deserialize)]
pub struct ElementSpec {
    tag: String,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    children: Vec<ElementSpec>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

/// A built document and the sizes declared for its elements.
#[derive(Debug)]
pub struct LoadedTree {
    /// The element tree.
    pub document: Document,
    sizes: HashMap<NodeId, (Option<f64>, Option<f64>)>,
}

impl LoadedTree {
    /// Build the document for `root`.
    pub fn build(root: &ElementSpec) -> Self {
        let mut tree = Self {
            document: Document::new(),
            sizes: HashMap::new(),
        };
        tree.append(NodeId::ROOT, root);
        tree
    }

    fn append(&mut self, parent: NodeId, spec: &ElementSpec) {
        let data = spec
            .attrs
            .iter()
            .fold(ElementData::new(spec.tag.as_str()), |data, (name, value)| {
                data.with_attr(name.as_str(), value.as_str())
            });
        let id = self.document.append_element(parent, data);
        let _ = self.sizes.insert(id, (spec.width, spec.height));
        if let Some(text) = &spec.text {
            let _ = self.document.append_text(id, text.as_str());
        }
        for child in &spec.children {
            self.append(id, child);
        }
    }

    /// Metrics for `element`: the nearest declared ancestor size per axis,
    /// falling back to `base`.
    pub fn metrics_for(&self, element: NodeId, base: ElementMetrics) -> ElementMetrics {
        let mut width = None;
        let mut height = None;
        let mut current = self.document.parent(element);
        while let Some(ancestor) = current {
            if let Some(&(w, h)) = self.sizes.get(&ancestor) {
                width = width.or(w);
                height = height.or(h);
            }
            current = self.document.parent(ancestor);
        }
        ElementMetrics {
            parent_width: width.unwrap_or(base.parent_width),
            parent_height: height.unwrap_or(base.parent_height),
            ..base
        }
    }
}

/// Read and build a tree from a JSON file.
pub fn load(path: &Path) -> Result<LoadedTree> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let root: ElementSpec =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(LoadedTree::build(&root))
}
