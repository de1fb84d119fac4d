use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::browser::automation::{Automation, SelectOption};
use crate::browser::error::AutomationError;
use crate::report::report_model::ControlState;

// ============================================================================
// Fixture model (YAML)
// ============================================================================

/// A form described as a tree of nodes, loadable from YAML.
///
/// ```yaml
/// name: signup
/// elements:
///   - tag: form
///     attrs: { id: signup }
///     children:
///       - tag: input
///         attrs: { type: text, id: first_name }
///       - tag: select
///         attrs: { id: country }
///         options:
///           - { value: "", text: Choose }
///           - { value: us, text: United States }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormFixture {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub elements: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    pub tag: String,

    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    #[serde(default)]
    pub children: Vec<NodeSpec>,

    #[serde(default)]
    pub options: Vec<OptionSpec>,

    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionSpec {
    /// Defaults to the option text, as in HTML.
    #[serde(default)]
    pub value: Option<String>,

    pub text: String,

    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FormFixture {
    pub fn parse(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }
}

impl NodeSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
            options: Vec::new(),
            checked: false,
        }
    }

    /// Shorthand for `<input type=...>`.
    pub fn input(input_type: &str) -> Self {
        Self::new("input").attr("type", input_type)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn name(self, name: &str) -> Self {
        self.attr("name", name)
    }

    pub fn value(self, value: &str) -> Self {
        self.attr("value", value)
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn option(mut self, value: &str, text: &str) -> Self {
        self.options.push(OptionSpec {
            value: Some(value.to_string()),
            text: text.to_string(),
            selected: false,
        });
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }
}

// ============================================================================
// In-memory DOM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub checked: bool,
    /// Current typed value of text-like controls.
    pub value: String,
    pub options: Vec<SelectOption>,
    pub selected_option: Option<usize>,
    stale: bool,
}

impl MemoryNode {
    fn input_type(&self) -> Option<&str> {
        if self.tag == "input" {
            Some(self.attrs.get("type").map(String::as_str).unwrap_or("text"))
        } else {
            None
        }
    }

    fn is_checkable(&self) -> bool {
        matches!(self.input_type(), Some("checkbox") | Some("radio"))
    }

    fn is_text_capable(&self) -> bool {
        match self.tag.as_str() {
            "textarea" | "datalist" => true,
            "input" => !self.is_checkable(),
            _ => false,
        }
    }
}

/// Interaction recorded by [`MemoryPage`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clear(NodeId),
    SendKeys(NodeId, String),
    Click(NodeId),
    SelectByValue(NodeId, String),
    SelectByText(NodeId, String),
    Submit(NodeId),
}

impl Call {
    pub fn node(&self) -> NodeId {
        match self {
            Call::Clear(id)
            | Call::SendKeys(id, _)
            | Call::Click(id)
            | Call::SelectByValue(id, _)
            | Call::SelectByText(id, _)
            | Call::Submit(id) => *id,
        }
    }
}

/// An in-memory page implementing [`Automation`].
///
/// Behaves like a browser for the interactions the fill engine uses and
/// records every state-changing call, so fills can be checked without a
/// real browser.
#[derive(Debug, Default)]
pub struct MemoryPage {
    nodes: Vec<MemoryNode>,
    roots: Vec<NodeId>,
    calls: Vec<Call>,
    submitted: Option<NodeId>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: &FormFixture) -> Self {
        let mut page = Self::new();
        for spec in &fixture.elements {
            page.add_root(spec);
        }
        page
    }

    /// Append a top-level node (and its subtree) to the page.
    pub fn add_root(&mut self, spec: &NodeSpec) -> NodeId {
        let id = self.insert(spec, None);
        self.roots.push(id);
        id
    }

    fn insert(&mut self, spec: &NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());

        let options: Vec<SelectOption> = spec
            .options
            .iter()
            .map(|o| SelectOption {
                value: o.value.clone().unwrap_or_else(|| o.text.clone()),
                text: o.text.clone(),
            })
            .collect();

        let selected_option = spec
            .options
            .iter()
            .position(|o| o.selected)
            .or(if options.is_empty() { None } else { Some(0) });

        self.nodes.push(MemoryNode {
            tag: spec.tag.to_lowercase(),
            attrs: spec.attrs.clone(),
            parent,
            children: Vec::new(),
            checked: spec.checked,
            value: spec.attrs.get("value").cloned().unwrap_or_default(),
            options,
            selected_option,
            stale: false,
        });

        for child in &spec.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }

        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// `None` for an id that does not belong to this page.
    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node by its `id` attribute.
    pub fn by_id(&self, html_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.get("id").map(String::as_str) == Some(html_id))
            .map(NodeId)
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Calls that targeted a given node.
    pub fn calls_for(&self, id: NodeId) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.node() == id).collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// The form node most recently submitted.
    pub fn submitted(&self) -> Option<NodeId> {
        self.submitted
    }

    /// Make every later interaction with the node fail as a stale element.
    pub fn mark_stale(&mut self, id: NodeId) -> Result<(), AutomationError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or_else(|| AutomationError::NoSuchElement(format!("node {}", id.0)))?;
        node.stale = true;
        Ok(())
    }

    /// `false` for unknown nodes.
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.checked)
    }

    /// Current text of a text-like control, empty for unknown nodes.
    pub fn text_value(&self, id: NodeId) -> &str {
        self.nodes.get(id.0).map_or("", |n| n.value.as_str())
    }

    /// Value of the selected option of a `<select>`.
    pub fn selected_value(&self, id: NodeId) -> Option<&str> {
        let node = self.nodes.get(id.0)?;
        node.selected_option
            .and_then(|i| node.options.get(i))
            .map(|o| o.value.as_str())
    }

    /// Final state of every form control, in document order.
    pub fn snapshot(&self) -> Vec<ControlState> {
        self.document_order()
            .into_iter()
            .filter_map(|id| {
                let node = &self.nodes[id.0];
                if !matches!(node.tag.as_str(), "input" | "select" | "textarea" | "datalist") {
                    return None;
                }

                let key = non_empty(node.attrs.get("id")).or_else(|| non_empty(node.attrs.get("name")));
                let kind = node.input_type().unwrap_or(node.tag.as_str()).to_string();
                let value = if node.is_checkable() {
                    let state = if node.checked { "checked" } else { "unchecked" };
                    match node.attrs.get("value") {
                        Some(v) if node.input_type() == Some("radio") => format!("{} ({})", state, v),
                        _ => state.to_string(),
                    }
                } else if node.tag == "select" {
                    self.selected_value(id).unwrap_or_default().to_string()
                } else {
                    node.value.clone()
                };

                Some(ControlState {
                    tag: node.tag.clone(),
                    kind,
                    key,
                    value,
                })
            })
            .collect()
    }

    fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.collect_subtree(*root, &mut out);
        }
        out
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for child in &self.nodes[id.0].children {
            self.collect_subtree(*child, out);
        }
    }

    fn live(&self, id: &NodeId) -> Result<&MemoryNode, AutomationError> {
        let node = self
            .nodes
            .get(id.0)
            .ok_or_else(|| AutomationError::NoSuchElement(format!("node {}", id.0)))?;
        if node.stale {
            return Err(AutomationError::StaleElement(format!(
                "<{}> node {} is no longer attached to the page",
                node.tag, id.0
            )));
        }
        Ok(node)
    }

    fn interactable(&self, id: &NodeId) -> Result<&MemoryNode, AutomationError> {
        let node = self.live(id)?;
        if node.attrs.contains_key("disabled") {
            return Err(AutomationError::NotInteractable(format!(
                "<{}> node {} is disabled",
                node.tag, id.0
            )));
        }
        Ok(node)
    }

    fn select_node(&self, id: &NodeId) -> Result<&MemoryNode, AutomationError> {
        let node = self.interactable(id)?;
        if node.tag != "select" {
            return Err(AutomationError::NotInteractable(format!(
                "element is <{}>, not <select>",
                node.tag
            )));
        }
        Ok(node)
    }

    fn matching(&self, candidates: Vec<NodeId>, selector: &str) -> Result<Vec<NodeId>, AutomationError> {
        let selectors = parse_selector(selector)?;
        Ok(candidates
            .into_iter()
            .filter(|id| {
                let node = &self.nodes[id.0];
                !node.stale && selectors.iter().any(|s| s.matches(node))
            })
            .collect())
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl Automation for MemoryPage {
    type Element = NodeId;

    fn find_all(&mut self, selector: &str) -> Result<Vec<NodeId>, AutomationError> {
        let all = self.document_order();
        self.matching(all, selector)
    }

    fn find_descendants(&mut self, root: &NodeId, selector: &str) -> Result<Vec<NodeId>, AutomationError> {
        self.live(root)?;
        let mut subtree = Vec::new();
        self.collect_subtree(*root, &mut subtree);
        subtree.remove(0);
        self.matching(subtree, selector)
    }

    fn tag_name(&mut self, element: &NodeId) -> Result<String, AutomationError> {
        Ok(self.live(element)?.tag.clone())
    }

    fn attribute(&mut self, element: &NodeId, name: &str) -> Result<Option<String>, AutomationError> {
        let node = self.live(element)?;
        if name == "value" {
            if node.is_text_capable() {
                return Ok(Some(node.value.clone()));
            }
            if node.tag == "select" {
                return Ok(self.selected_value(*element).map(str::to_string));
            }
        }
        Ok(node.attrs.get(name).cloned())
    }

    fn clear(&mut self, element: &NodeId) -> Result<(), AutomationError> {
        let node = self.interactable(element)?;
        if !node.is_text_capable() {
            return Err(AutomationError::NotInteractable(format!(
                "<{}> cannot be cleared",
                node.tag
            )));
        }
        self.nodes[element.0].value.clear();
        self.calls.push(Call::Clear(*element));
        Ok(())
    }

    fn send_keys(&mut self, element: &NodeId, text: &str) -> Result<(), AutomationError> {
        let node = self.interactable(element)?;
        if !node.is_text_capable() {
            return Err(AutomationError::NotInteractable(format!(
                "<{}> does not accept keystrokes",
                node.tag
            )));
        }
        self.nodes[element.0].value.push_str(text);
        self.calls.push(Call::SendKeys(*element, text.to_string()));
        Ok(())
    }

    fn click(&mut self, element: &NodeId) -> Result<(), AutomationError> {
        let node = self.interactable(element)?;
        let input_type = node.input_type().map(str::to_string);
        let name = node.attrs.get("name").cloned();

        match input_type.as_deref() {
            Some("checkbox") => {
                let node = &mut self.nodes[element.0];
                node.checked = !node.checked;
            }
            Some("radio") => {
                if let Some(name) = name.filter(|n| !n.is_empty()) {
                    for other in self.nodes.iter_mut() {
                        if other.input_type() == Some("radio")
                            && other.attrs.get("name") == Some(&name)
                        {
                            other.checked = false;
                        }
                    }
                }
                self.nodes[element.0].checked = true;
            }
            _ => {}
        }

        self.calls.push(Call::Click(*element));
        Ok(())
    }

    fn is_selected(&mut self, element: &NodeId) -> Result<bool, AutomationError> {
        Ok(self.live(element)?.checked)
    }

    fn options(&mut self, element: &NodeId) -> Result<Vec<SelectOption>, AutomationError> {
        Ok(self.select_node(element)?.options.clone())
    }

    fn select_by_value(&mut self, element: &NodeId, value: &str) -> Result<(), AutomationError> {
        let index = self
            .select_node(element)?
            .options
            .iter()
            .position(|o| o.value == value)
            .ok_or_else(|| {
                AutomationError::NoSuchElement(format!("Cannot locate option with value: {}", value))
            })?;
        self.nodes[element.0].selected_option = Some(index);
        self.calls.push(Call::SelectByValue(*element, value.to_string()));
        Ok(())
    }

    fn select_by_text(&mut self, element: &NodeId, text: &str) -> Result<(), AutomationError> {
        let index = self
            .select_node(element)?
            .options
            .iter()
            .position(|o| o.text == text)
            .ok_or_else(|| {
                AutomationError::NoSuchElement(format!("Cannot locate option with text: {}", text))
            })?;
        self.nodes[element.0].selected_option = Some(index);
        self.calls.push(Call::SelectByText(*element, text.to_string()));
        Ok(())
    }

    fn submit(&mut self, element: &NodeId) -> Result<(), AutomationError> {
        self.live(element)?;

        let mut current = Some(*element);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if node.tag == "form" {
                self.submitted = Some(id);
                self.calls.push(Call::Submit(*element));
                return Ok(());
            }
            current = node.parent;
        }

        Err(AutomationError::NoSuchElement(format!(
            "node {} is not inside a <form>",
            element.0
        )))
    }
}

// ============================================================================
// Selector subset
// ============================================================================

/// One compound selector: `tag`, `#id`, `tag#id`, `[attr=value]`,
/// `tag[attr=value]` or `*`.
#[derive(Debug, Clone, PartialEq, Default)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    attr: Option<(String, String)>,
}

impl SimpleSelector {
    fn matches(&self, node: &MemoryNode) -> bool {
        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        if let Some((name, value)) = &self.attr {
            let actual = match (name.as_str(), node.input_type()) {
                ("type", Some(t)) => Some(t),
                _ => node.attrs.get(name).map(String::as_str),
            };
            if actual != Some(value.as_str()) {
                return false;
            }
        }
        true
    }
}

fn parse_selector(selector: &str) -> Result<Vec<SimpleSelector>, AutomationError> {
    let invalid = || AutomationError::InvalidSelector(selector.to_string());

    let mut out = Vec::new();
    for part in selector.split(',') {
        let mut rest = part.trim();
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut parsed = SimpleSelector::default();

        let tag_end = rest.find(['#', '[']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" {
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid());
            }
            parsed.tag = Some(tag.to_lowercase());
        }
        rest = &rest[tag_end..];

        if let Some(after_hash) = rest.strip_prefix('#') {
            let id_end = after_hash.find('[').unwrap_or(after_hash.len());
            let id = &after_hash[..id_end];
            if id.is_empty() {
                return Err(invalid());
            }
            parsed.id = Some(id.to_string());
            rest = &after_hash[id_end..];
        }

        if let Some(after_bracket) = rest.strip_prefix('[') {
            let inner = after_bracket.strip_suffix(']').ok_or_else(invalid)?;
            let (name, value) = inner.split_once('=').ok_or_else(invalid)?;
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            parsed.attr = Some((name.trim().to_string(), value.to_string()));
            rest = "";
        }

        if !rest.is_empty() {
            return Err(invalid());
        }

        out.push(parsed);
    }

    Ok(out)
}
