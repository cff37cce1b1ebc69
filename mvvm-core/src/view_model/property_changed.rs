use std::sync::Arc;

use tracing::trace;

use crate::listener::{ListenerId, Listeners};

/// Change notification hub embedded in a view-model.
#[derive(Debug, Default)]
pub struct PropertyChanged {
    handlers: Listeners<dyn Fn(&str) + Send + Sync>,
}

impl PropertyChanged {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<H>(&self, handler: H) -> ListenerId where H: Fn(&str) + Send + Sync + 'static {
        self.handlers.add(Arc::new(handler))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.handlers.remove(id)
    }

    pub fn raise(&self, property: &str) {
        trace!("property {} changed", property);
        for handler in self.handlers.snapshot() {
            handler(property);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::view_model::{set_and_notify, PropertyChanged, ViewModel};

    #[derive(Default)]
    struct DocumentViewModel {
        changed: PropertyChanged,
        title: String,
        dirty: bool,
    }

    impl DocumentViewModel {
        fn set_title(&mut self, title: &str) -> bool {
            set_and_notify(&self.changed, &mut self.title, title.to_string(), "title")
        }

        fn set_dirty(&mut self, dirty: bool) -> bool {
            set_and_notify(&self.changed, &mut self.dirty, dirty, "dirty")
        }
    }

    impl ViewModel for DocumentViewModel {
        fn property_changed(&self) -> &PropertyChanged {
            &self.changed
        }
    }

    #[test]
    fn test_notifies_only_on_change() {
        let mut view_model = DocumentViewModel::default();
        let names = Arc::new(Mutex::new(vec![]));
        let sink = names.clone();
        let id = view_model.property_changed().subscribe(move |name| sink.lock().push(name.to_string()));
        assert!(view_model.set_title("draft"));
        assert!(!view_model.set_title("draft"));
        assert!(view_model.set_dirty(true));
        assert!(!view_model.set_dirty(true));
        view_model.notify("summary");
        assert_eq!(*names.lock(), vec!["title", "dirty", "summary"]);
        assert_eq!(view_model.title, "draft");
        assert!(view_model.changed.unsubscribe(id));
        assert!(view_model.set_dirty(false));
        assert_eq!(names.lock().len(), 3);
        assert_eq!(view_model.changed.handler_count(), 0);
    }
}
