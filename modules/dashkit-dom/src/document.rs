//! The live document tree.
//!
//! Backed by a `scraper::Html` tree. Committed fragments are parsed as HTML
//! in the context of the target element and grafted under it, replacing
//! everything that was there. Replaced nodes stay in the arena until enough
//! of them pile up, then the tree is rebuilt from the attached nodes.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use dashkit_html::{escape_into, html, SafeFragment};
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{DomError, DomResult};

const BLANK_DOCUMENT: &str =
    "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title></title></head><body></body></html>";

/// Detached nodes tolerated before a rebuild, and never fewer than the
/// attached node count.
pub(crate) const MIN_GARBAGE: usize = 512;

/// Handle to an element of a [`Document`].
///
/// Handles stay valid until a commit replaces the subtree holding them;
/// after that every operation on the handle reports [`DomError::Detached`].
/// Rebuilding the tree does not affect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    key: u64,
}

/// An event delivered to a listener.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    /// Element the event was dispatched on.
    pub target: Element,
    /// Element the running listener is registered on (target or an ancestor).
    pub current: Element,
}

pub type Handler = Rc<dyn Fn(&Event)>;

struct Listener {
    event: String,
    handler: Handler,
}

pub struct Document {
    html: Html,
    title: String,
    /// Attached elements only, in both directions.
    nodes: HashMap<Element, NodeId>,
    handles: HashMap<NodeId, Element>,
    next_key: u64,
    listeners: HashMap<Element, Vec<Listener>>,
    live_nodes: usize,
    garbage_nodes: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("title", &self.title)
            .field("elements", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("garbage_nodes", &self.garbage_nodes)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// An empty HTML document with a `<head>` and an empty `<body>`.
    pub fn new() -> Self {
        Self::parse(BLANK_DOCUMENT)
    }

    /// Parse a full host page. Used once at startup for the application
    /// shell the router mounts into.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let title = Selector::parse("title")
            .ok()
            .and_then(|selector| {
                html.select(&selector)
                    .next()
                    .map(|el| el.text().collect::<String>())
            })
            .unwrap_or_default();
        let root = html.tree.root().id();
        let mut doc = Self {
            html,
            title,
            nodes: HashMap::new(),
            handles: HashMap::new(),
            next_key: 0,
            listeners: HashMap::new(),
            live_nodes: 0,
            garbage_nodes: 0,
        };
        doc.live_nodes = doc.index_subtree(root);
        doc
    }

    // --- Queries ---

    /// First element matching `selector`, or `None`.
    pub fn query(&self, selector: &str) -> DomResult<Option<Element>> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).find_map(|el| self.element_of(el)))
    }

    /// First element under `scope` matching `selector`, or `None`.
    pub fn query_in(&self, scope: Element, selector: &str) -> DomResult<Option<Element>> {
        let selector = parse_selector(selector)?;
        let scope = self.element_ref(scope)?;
        Ok(scope
            .select(&selector)
            .filter(|el| el.id() != scope.id())
            .find_map(|el| self.element_of(el)))
    }

    /// All elements matching `selector`, in document order.
    pub fn query_all(&self, selector: &str) -> DomResult<Vec<Element>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .filter_map(|el| self.element_of(el))
            .collect())
    }

    /// Element whose `id` attribute equals `id` exactly.
    pub fn get_by_id(&self, id: &str) -> Option<Element> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().id() == Some(id))
            .find_map(|el| self.element_of(el))
    }

    pub fn body(&self) -> Option<Element> {
        self.query("body").ok().flatten()
    }

    // --- Reads ---

    pub fn tag_name(&self, el: Element) -> DomResult<String> {
        Ok(self.element_ref(el)?.value().name().to_string())
    }

    pub fn attr(&self, el: Element, name: &str) -> DomResult<Option<String>> {
        Ok(self.element_ref(el)?.value().attr(name).map(str::to_string))
    }

    pub fn has_attr(&self, el: Element, name: &str) -> DomResult<bool> {
        Ok(self.element_ref(el)?.value().attr(name).is_some())
    }

    /// Concatenated text content of the element and its descendants.
    pub fn text(&self, el: Element) -> DomResult<String> {
        Ok(self.element_ref(el)?.text().collect())
    }

    pub fn inner_html(&self, el: Element) -> DomResult<String> {
        Ok(self.element_ref(el)?.inner_html())
    }

    pub fn outer_html(&self, el: Element) -> DomResult<String> {
        Ok(self.element_ref(el)?.html())
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    pub fn is_attached(&self, el: Element) -> bool {
        self.element_ref(el).is_ok()
    }

    /// Nodes held by the tree, detached ones included.
    pub fn node_count(&self) -> usize {
        self.html.tree.nodes().count()
    }

    // --- Title ---

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the document title, mirrored into `<head><title>`.
    pub fn set_title(&mut self, title: &str) -> DomResult<()> {
        self.title = title.to_string();
        if let Some(el) = self.query("head > title")? {
            self.commit(el, &html!({ title }))?;
        }
        Ok(())
    }

    // --- Mutation ---

    /// Replace all content under `target` with the fragment's markup.
    ///
    /// The payload is parsed as HTML in the context of the target's tag, so
    /// rows committed into a `<tbody>` stay rows. Listeners registered
    /// inside the replaced subtree are discarded; handles to replaced
    /// elements become detached.
    pub fn commit(&mut self, target: Element, fragment: &SafeFragment) -> DomResult<()> {
        let (target_id, context, old_children) = {
            let node = self.element_ref(target)?;
            let children: Vec<NodeId> = node.children().map(|child| child.id()).collect();
            (node.id(), node.value().name().to_string(), children)
        };

        for id in old_children {
            let removed = self.unindex_subtree(id);
            self.live_nodes = self.live_nodes.saturating_sub(removed);
            self.garbage_nodes += removed;
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
            }
        }

        let parsed = parse_in_context(&context, fragment.as_str());
        let container = context_container(&parsed, &context);
        let mut grafted = Vec::new();
        if let Some(container) = parsed.tree.get(container) {
            for child in container.children() {
                if let Some(id) = graft(&mut self.html.tree, target_id, child, &mut |_, _| {}) {
                    grafted.push(id);
                }
            }
        }
        for id in grafted {
            self.live_nodes += self.index_subtree(id);
        }

        tracing::trace!(bytes = fragment.len(), context = %context, "Committed fragment");
        self.compact_if_needed();
        Ok(())
    }

    /// Set (or with `None`, remove) one attribute, keeping the element's
    /// children and listeners in place.
    pub fn set_attr(&mut self, el: Element, name: &'static str, value: Option<&str>) -> DomResult<()> {
        let (id, tag, attrs) = {
            let node = self.element_ref(el)?;
            let element = node.value();
            let attrs: Vec<(String, String)> = element
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (node.id(), element.name().to_string(), attrs)
        };

        let mut markup = String::new();
        markup.push('<');
        markup.push_str(&tag);
        let mut seen = false;
        for (key, current) in &attrs {
            let next = if key == name {
                seen = true;
                value
            } else {
                Some(current.as_str())
            };
            if let Some(next) = next {
                push_attr(&mut markup, key, next);
            }
        }
        if let (false, Some(next)) = (seen, value) {
            push_attr(&mut markup, name, next);
        }
        markup.push_str("></");
        markup.push_str(&tag);
        markup.push('>');

        // Reparse the start tag so the new node carries scraper's own
        // attribute and class bookkeeping.
        let parsed = Html::parse_fragment(&markup);
        let replacement = parsed
            .root_element()
            .children()
            .find_map(|child| match child.value() {
                Node::Element(element) if element.name() == tag => Some(Node::Element(element.clone())),
                _ => None,
            })
            .ok_or_else(|| DomError::AttributeRewrite(tag.clone()))?;

        if let Some(mut node) = self.html.tree.get_mut(id) {
            *node.value() = replacement;
        }
        Ok(())
    }

    // --- Listeners ---

    /// Register `handler` for `event` on `target`.
    pub fn add_listener(&mut self, target: Element, event: &str, handler: Handler) -> DomResult<()> {
        self.element_ref(target)?;
        self.listeners.entry(target).or_default().push(Listener {
            event: event.to_string(),
            handler,
        });
        Ok(())
    }

    /// Handlers for `event` on `target` and its ancestors, innermost first.
    pub fn handlers_for(&self, target: Element, event: &str) -> Vec<(Element, Handler)> {
        let Ok(node) = self.element_ref(target) else {
            return Vec::new();
        };
        std::iter::once(*node)
            .chain(node.ancestors())
            .filter_map(|n| self.handles.get(&n.id()).copied())
            .filter_map(|el| self.listeners.get(&el).map(|ls| (el, ls)))
            .flat_map(|(el, listeners)| {
                listeners
                    .iter()
                    .filter(|l| l.event == event)
                    .map(move |l| (el, l.handler.clone()))
            })
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    // --- Internals ---

    fn element_ref(&self, el: Element) -> DomResult<ElementRef<'_>> {
        let id = self.nodes.get(&el).ok_or(DomError::Detached)?;
        let node = self.html.tree.get(*id).ok_or(DomError::Detached)?;
        ElementRef::wrap(node).ok_or(DomError::Detached)
    }

    fn element_of(&self, el: ElementRef<'_>) -> Option<Element> {
        self.handles.get(&el.id()).copied()
    }

    /// Give every element under `id` a handle. Returns the number of nodes
    /// in the subtree.
    fn index_subtree(&mut self, id: NodeId) -> usize {
        let Some(root) = self.html.tree.get(id) else {
            return 0;
        };
        let mut count = 0;
        let mut elements = Vec::new();
        for node in root.descendants() {
            count += 1;
            if node.value().is_element() {
                elements.push(node.id());
            }
        }
        for id in elements {
            let el = Element { key: self.next_key };
            self.next_key += 1;
            self.nodes.insert(el, id);
            self.handles.insert(id, el);
        }
        count
    }

    /// Drop the handles and listeners of everything under `id`. Returns the
    /// number of nodes in the subtree.
    fn unindex_subtree(&mut self, id: NodeId) -> usize {
        let ids: Vec<NodeId> = match self.html.tree.get(id) {
            Some(node) => node.descendants().map(|d| d.id()).collect(),
            None => return 0,
        };
        for id in &ids {
            if let Some(el) = self.handles.remove(id) {
                self.nodes.remove(&el);
                self.listeners.remove(&el);
            }
        }
        ids.len()
    }

    fn compact_if_needed(&mut self) {
        if self.garbage_nodes >= MIN_GARBAGE.max(self.live_nodes) {
            self.compact();
        }
    }

    /// Rebuild the tree from the attached nodes, moving every handle to its
    /// node's new id.
    fn compact(&mut self) {
        let old = &self.html.tree;
        let mut tree = Tree::new(old.root().value().clone());
        let root = tree.root().id();
        let mut moved = HashMap::with_capacity(self.live_nodes);
        moved.insert(old.root().id(), root);
        for child in old.root().children() {
            graft(&mut tree, root, child, &mut |from, to| {
                moved.insert(from, to);
            });
        }

        let mut nodes = HashMap::with_capacity(self.nodes.len());
        let mut handles = HashMap::with_capacity(self.handles.len());
        for (from, el) in &self.handles {
            if let Some(to) = moved.get(from) {
                nodes.insert(*el, *to);
                handles.insert(*to, *el);
            }
        }

        tracing::debug!(
            dropped = self.garbage_nodes,
            live = self.live_nodes,
            "Rebuilt document tree"
        );
        self.html.tree = tree;
        self.nodes = nodes;
        self.handles = handles;
        self.garbage_nodes = 0;
    }
}

fn parse_selector(selector: &str) -> DomResult<Selector> {
    Selector::parse(selector).map_err(|err| DomError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

fn push_attr(markup: &mut String, key: &str, value: &str) {
    markup.push(' ');
    markup.push_str(key);
    markup.push_str("=\"");
    escape_into(markup, value);
    markup.push('"');
}

/// Ancestor chain that gives `context` its own parsing rules. Elements not
/// listed parse like `<body>` content.
fn context_chain(context: &str) -> &'static [&'static str] {
    match context {
        "table" => &["table"],
        "thead" => &["table", "thead"],
        "tbody" => &["table", "tbody"],
        "tfoot" => &["table", "tfoot"],
        "tr" => &["table", "tbody", "tr"],
        "colgroup" => &["table", "colgroup"],
        "select" => &["select"],
        "optgroup" => &["select", "optgroup"],
        "datalist" => &["datalist"],
        _ => &[],
    }
}

/// Parse `markup` as the content of a `context` element.
fn parse_in_context(context: &str, markup: &str) -> Html {
    let chain = context_chain(context);
    if chain.is_empty() {
        return Html::parse_fragment(markup);
    }
    let mut wrapped = String::with_capacity(markup.len() + 64);
    for tag in chain {
        wrapped.push('<');
        wrapped.push_str(tag);
        wrapped.push('>');
    }
    wrapped.push_str(markup);
    for tag in chain.iter().rev() {
        wrapped.push_str("</");
        wrapped.push_str(tag);
        wrapped.push('>');
    }
    Html::parse_fragment(&wrapped)
}

/// Node whose children are the parsed payload.
fn context_container(parsed: &Html, context: &str) -> NodeId {
    let mut container = parsed.root_element();
    for tag in context_chain(context) {
        match container
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == *tag)
        {
            Some(next) => container = next,
            None => break,
        }
    }
    container.id()
}

/// Copy `source` and its subtree under `parent`, reporting each copied
/// node's old and new id. Returns the id of the copy of `source`.
fn graft<F>(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>, on_copy: &mut F) -> Option<NodeId>
where
    F: FnMut(NodeId, NodeId),
{
    let mut parent = tree.get_mut(parent)?;
    let id = parent.append(source.value().clone()).id();
    on_copy(source.id(), id);
    for child in source.children() {
        graft(tree, id, child, on_copy);
    }
    Some(id)
}
