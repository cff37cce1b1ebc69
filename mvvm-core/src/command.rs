use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::trace;

use crate::listener::{ListenerId, Listeners};

/// Something a view can bind a button or menu entry to.
pub trait Command<P> {
    fn can_execute(&self, parameter: &P) -> bool;

    fn execute(&self, parameter: &P);
}

/// A [`Command`] made of an action and an optional predicate.
pub struct DelegateCommand<P> {
    execute: Box<dyn Fn(&P) + Send + Sync>,
    can_execute: Option<Box<dyn Fn(&P) -> bool + Send + Sync>>,
    can_execute_changed: Listeners<dyn Fn() + Send + Sync>,
}

impl<P> DelegateCommand<P> where P: 'static {
    pub fn new<E>(execute: E) -> Self where E: Fn(&P) + Send + Sync + 'static {
        Self {
            execute: Box::new(execute),
            can_execute: None,
            can_execute_changed: Listeners::default(),
        }
    }

    pub fn with_predicate<E, C>(execute: E, can_execute: C) -> Self
        where
            E: Fn(&P) + Send + Sync + 'static,
            C: Fn(&P) -> bool + Send + Sync + 'static,
    {
        Self {
            execute: Box::new(execute),
            can_execute: Some(Box::new(can_execute)),
            can_execute_changed: Listeners::default(),
        }
    }

    /// Execute only if the predicate allows it. Returns whether it ran.
    pub fn try_execute(&self, parameter: &P) -> bool {
        if self.can_execute(parameter) {
            self.execute(parameter);
            true
        } else {
            false
        }
    }

    pub fn on_can_execute_changed<L>(&self, listener: L) -> ListenerId where L: Fn() + Send + Sync + 'static {
        self.can_execute_changed.add(Arc::new(listener))
    }

    pub fn remove_can_execute_changed(&self, id: ListenerId) -> bool {
        self.can_execute_changed.remove(id)
    }

    /// Tell bound views to query [`can_execute`](Command::can_execute) again.
    pub fn raise_can_execute_changed(&self) {
        let listeners = self.can_execute_changed.snapshot();
        trace!("raise can execute changed to {} listeners", listeners.len());
        for listener in listeners {
            listener();
        }
    }
}

impl<P> Command<P> for DelegateCommand<P> where P: 'static {
    fn can_execute(&self, parameter: &P) -> bool {
        match &self.can_execute {
            None => true,
            Some(can_execute) => can_execute(parameter),
        }
    }

    fn execute(&self, parameter: &P) {
        (self.execute)(parameter)
    }
}

impl<P> Debug for DelegateCommand<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateCommand")
            .field("has_predicate", &self.can_execute.is_some())
            .field("can_execute_changed", &self.can_execute_changed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::command::{Command, DelegateCommand};

    #[test]
    fn test_without_predicate() {
        let total = Arc::new(AtomicUsize::new(0));
        let sum = total.clone();
        let command = DelegateCommand::new(move |n: &usize| {
            sum.fetch_add(*n, Ordering::SeqCst);
        });
        assert!(command.can_execute(&1));
        command.execute(&2);
        assert!(command.try_execute(&3));
        assert_eq!(total.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_predicate_gates_try_execute() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let command = DelegateCommand::with_predicate(
            move |_: &String| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |name: &String| !name.is_empty(),
        );
        assert!(!command.can_execute(&String::new()));
        assert!(!command.try_execute(&String::new()));
        assert!(command.try_execute(&"save".to_string()));
        command.execute(&String::new());
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_can_execute_changed_listeners() {
        let enabled = Arc::new(AtomicBool::new(false));
        let gate = enabled.clone();
        let command = DelegateCommand::with_predicate(|_: &()| {}, move |_: &()| gate.load(Ordering::SeqCst));
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        let first = command.on_can_execute_changed(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = notified.clone();
        command.on_can_execute_changed(move || {
            counter.fetch_add(10, Ordering::SeqCst);
        });
        enabled.store(true, Ordering::SeqCst);
        command.raise_can_execute_changed();
        assert!(command.can_execute(&()));
        assert_eq!(notified.load(Ordering::SeqCst), 11);
        assert!(command.remove_can_execute_changed(first));
        assert!(!command.remove_can_execute_changed(first));
        command.raise_can_execute_changed();
        assert_eq!(notified.load(Ordering::SeqCst), 21);
    }
}
