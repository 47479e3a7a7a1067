use serde::{Deserialize, Serialize};
use std::fmt;

/// Which field of a [`FilterTerm`] was set.
#[derive(strum::Display, Copy, Clone, Debug, Eq, PartialEq)]
pub enum TermField {
    Text,
    Columns,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

pub type ChangeListener = Box<dyn FnMut(TermField)>;

/// One filter: `text` holds the needles and `columns` the target column names, both delimited
/// with `|` (see [`FilterConfig`](crate::config::FilterConfig)).
///
/// Equality is by value only, listeners are not compared and not cloned.
#[derive(Default, Serialize, Deserialize)]
pub struct FilterTerm {
    text: String,
    columns: String,
    #[serde(skip)]
    listeners: Vec<(ListenerId, ChangeListener)>,
    #[serde(skip)]
    next_listener_id: u64,
}

impl FilterTerm {
    pub fn new(text: impl Into<String>, columns: impl Into<String>) -> Self {
        FilterTerm {
            text: text.into(),
            columns: columns.into(),
            listeners: vec![],
            next_listener_id: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn columns(&self) -> &str {
        &self.columns
    }

    /// Set the filtering text. Listeners are notified even if the value did not change.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.notify(TermField::Text);
    }

    /// Set the filtered columns. Listeners are notified even if the value did not change.
    pub fn set_columns(&mut self, columns: impl Into<String>) {
        self.columns = columns.into();
        self.notify(TermField::Columns);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(TermField) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if no listener with such id was subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != len_before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self, field: TermField) {
        for (_, listener) in &mut self.listeners {
            listener(field);
        }
    }
}

impl Clone for FilterTerm {
    fn clone(&self) -> Self {
        FilterTerm::new(self.text.clone(), self.columns.clone())
    }
}

impl PartialEq for FilterTerm {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.columns == other.columns
    }
}

impl Eq for FilterTerm {}

impl fmt::Debug for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTerm")
            .field("text", &self.text)
            .field("columns", &self.columns)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" in [{}]", self.text, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn setters_notify_even_when_unchanged() {
        let fired = Rc::new(RefCell::new(vec![]));
        let mut term = FilterTerm::new("a", "Name");
        let sink = fired.clone();
        term.subscribe(move |field| sink.borrow_mut().push(field));

        term.set_text("a");
        term.set_columns("Name");
        term.set_text("b");

        assert_eq!(
            *fired.borrow(),
            vec![TermField::Text, TermField::Columns, TermField::Text]
        );
        assert_eq!(term.text(), "b");
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let count = Rc::new(RefCell::new(0));
        let mut term = FilterTerm::default();
        let sink = count.clone();
        let id = term.subscribe(move |_| *sink.borrow_mut() += 1);
        term.set_text("x");
        assert!(term.unsubscribe(id));
        assert!(!term.unsubscribe(id));
        term.set_text("y");
        assert_eq!(*count.borrow(), 1);
        assert_eq!(term.listener_count(), 0);
    }

    #[test]
    fn equality_ignores_listeners() {
        let mut a = FilterTerm::new("x", "A|B");
        a.subscribe(|_| {});
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.listener_count(), 0);
        assert_ne!(a, FilterTerm::new("x", "A"));
    }

    #[test]
    fn serializes_as_two_string_fields() {
        let mut term = FilterTerm::new("Rome|Milan", "City");
        term.subscribe(|_| {});
        let json = serde_json::to_value(&term).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Rome|Milan", "columns": "City" })
        );
        let back: FilterTerm = serde_json::from_value(json).unwrap();
        assert_eq!(back, term);
        assert_eq!(back.listener_count(), 0);
    }
}
