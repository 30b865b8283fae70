use std::collections::HashSet;
use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Event, EventTarget};

/// Keeps every action bound to exactly one listener
#[derive(Default)]
pub struct Bindings {
    bound: HashSet<&'static str>,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    /// Returns false without binding if `action` already has a listener
    pub fn bind<F>(
        &mut self,
        action: &'static str,
        target: &EventTarget,
        event_type: &str,
        handler: F,
    ) -> Result<bool, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        if self.bound.contains(action) {
            warn!(action, "listener already bound");
            return Ok(false);
        }
        let listener = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())?;
        self.bound.insert(action);
        self.listeners.push(listener);
        Ok(true)
    }

    pub fn is_bound(&self, action: &str) -> bool {
        self.bound.contains(action)
    }

    /// Number of live listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listeners live as long as the page
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}
