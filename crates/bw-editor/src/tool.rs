//! Tools and their activation state.
//!
//! A [`Tool`] is a shared handle: the tool box flips its activation state,
//! controllers read it to decide whether they are live, and hosts keep
//! clones for palette buttons. Everything runs on the UI thread, so the
//! handle is `Rc`-based and not `Send`.

use bw_core::ToolId;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Hooks a concrete tool can install to veto or react to activation changes.
pub trait ToolHooks {
    /// Called before the tool becomes active. Return `false` to refuse.
    fn on_activate(&mut self) -> bool {
        true
    }

    /// Called before the tool becomes inactive. Return `false` to refuse.
    fn on_deactivate(&mut self) -> bool {
        true
    }
}

struct ToolInner {
    id: ToolId,
    active: Cell<bool>,
    refresh_requested: Cell<bool>,
    hooks: RefCell<Option<Box<dyn ToolHooks>>>,
}

/// Shared handle to one tool. Clones refer to the same tool.
#[derive(Clone)]
pub struct Tool {
    inner: Rc<ToolInner>,
}

impl Tool {
    pub fn new(id: ToolId, initially_active: bool) -> Self {
        Self {
            inner: Rc::new(ToolInner {
                id,
                active: Cell::new(initially_active),
                refresh_requested: Cell::new(false),
                hooks: RefCell::new(None),
            }),
        }
    }

    pub fn with_hooks(id: ToolId, initially_active: bool, hooks: impl ToolHooks + 'static) -> Self {
        let tool = Self::new(id, initially_active);
        *tool.inner.hooks.borrow_mut() = Some(Box::new(hooks));
        tool
    }

    pub fn id(&self) -> ToolId {
        self.inner.id
    }

    pub fn active(&self) -> bool {
        self.inner.active.get()
    }

    /// Ask the host to redraw the views this tool affects.
    pub fn refresh_views(&self) {
        self.inner.refresh_requested.set(true);
    }

    pub(crate) fn take_refresh_request(&self) -> bool {
        self.inner.refresh_requested.replace(false)
    }

    /// Returns whether the tool is active afterwards.
    pub(crate) fn activate(&self) -> bool {
        if self.active() {
            return true;
        }
        let allowed = match self.inner.hooks.borrow_mut().as_mut() {
            Some(hooks) => hooks.on_activate(),
            None => true,
        };
        if allowed {
            self.inner.active.set(true);
        }
        allowed
    }

    /// Returns whether the tool is inactive afterwards.
    pub(crate) fn deactivate(&self) -> bool {
        if !self.active() {
            return true;
        }
        let allowed = match self.inner.hooks.borrow_mut().as_mut() {
            Some(hooks) => hooks.on_deactivate(),
            None => true,
        };
        if allowed {
            self.inner.active.set(false);
        }
        allowed
    }
}

impl PartialEq for Tool {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Tool {}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("id", &self.id())
            .field("active", &self.active())
            .finish()
    }
}
