//! Shared handle to the live document.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use dashkit_html::SafeFragment;

use crate::document::{Document, Element, Event, Handler};
use crate::error::DomResult;

/// Cheaply cloneable handle to the single live [`Document`].
///
/// Everything runs on one thread; borrows are short and never held across
/// an `.await` or while listeners run.
#[derive(Clone, Default)]
pub struct Dom {
    inner: Rc<RefCell<Document>>,
}

impl Dom {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Rc::new(RefCell::new(document)),
        }
    }

    pub fn borrow(&self) -> Ref<'_, Document> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Document> {
        self.inner.borrow_mut()
    }

    pub fn query(&self, selector: &str) -> DomResult<Option<Element>> {
        self.borrow().query(selector)
    }

    /// Commit into the first match of `selector`. Returns `false` when
    /// nothing matches.
    pub fn commit(&self, selector: &str, fragment: &SafeFragment) -> DomResult<bool> {
        let mut doc = self.borrow_mut();
        match doc.query(selector)? {
            Some(target) => {
                doc.commit(target, fragment)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn mount(&self, target: Element, fragment: &SafeFragment) -> DomResult<()> {
        self.borrow_mut().commit(target, fragment)
    }

    pub fn on<F>(&self, target: Element, event: &str, handler: F) -> DomResult<()>
    where
        F: Fn(&Event) + 'static,
    {
        let handler: Handler = Rc::new(handler);
        self.borrow_mut().add_listener(target, event, handler)
    }

    /// Deliver `event` to `target` and its ancestors. Handlers run with no
    /// borrow held, so they may commit, attach listeners or navigate.
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, target: Element, event: &str) -> usize {
        let handlers = self.borrow().handlers_for(target, event);
        for (current, handler) in &handlers {
            let event = Event {
                name: event.to_string(),
                target,
                current: *current,
            };
            handler(&event);
        }
        handlers.len()
    }

    /// Dispatch on the first match of `selector`; 0 when nothing matches.
    pub fn trigger(&self, selector: &str, event: &str) -> DomResult<usize> {
        let target = self.query(selector)?;
        Ok(target.map_or(0, |target| self.dispatch(target, event)))
    }

    /// Text content of the first match of `selector`.
    pub fn text(&self, selector: &str) -> DomResult<Option<String>> {
        let doc = self.borrow();
        match doc.query(selector)? {
            Some(el) => Ok(Some(doc.text(el)?)),
            None => Ok(None),
        }
    }

    pub fn title(&self) -> String {
        self.borrow().title().to_string()
    }

    pub fn to_html(&self) -> String {
        self.borrow().to_html()
    }
}
