//! The parse stack: which container is being read, and the path trace
//! (`$.a.b[1]`-style) used in diagnostics.

use crate::token::ScopeState;

#[derive(Debug)]
pub(super) struct ScopeStack {
    states: Vec<ScopeState>,
    names: Vec<Option<String>>,
    indices: Vec<Option<i64>>,
}

impl ScopeStack {
    pub(super) fn new() -> Self {
        ScopeStack {
            states: vec![ScopeState::EmptyDocument],
            names: vec![None],
            indices: vec![None],
        }
    }

    pub(super) fn top(&self) -> ScopeState {
        *self.states.last().expect("scope stack never empties")
    }

    pub(super) fn set_top(&mut self, state: ScopeState) {
        *self.states.last_mut().expect("scope stack never empties") = state;
    }

    pub(super) fn push(&mut self, state: ScopeState) {
        self.states.push(state);
        self.names.push(None);
        self.indices.push(None);
    }

    /// Pop the current scope and increment the parent's array index, if
    /// the parent is an array.
    pub(super) fn pop(&mut self) -> ScopeState {
        log::trace!("scope: pop at depth {}", self.states.len());
        let popped = self.states.pop().expect("scope stack never empties");
        self.names.pop();
        self.indices.pop();
        self.advance_index();
        popped
    }

    /// Only the empty-array push needs an explicit starting index; object
    /// scopes never carry one.
    pub(super) fn init_array_index(&mut self) {
        *self.indices.last_mut().expect("scope stack never empties") = Some(0);
    }

    pub(super) fn set_name(&mut self, name: String) {
        *self.names.last_mut().expect("scope stack never empties") = Some(name);
    }

    /// Increment the current depth's array index, if it has one. A no-op
    /// for object scopes, which are tracked by name instead.
    pub(super) fn advance_index(&mut self) {
        if let Some(slot) = self.indices.last_mut() {
            if let Some(i) = slot {
                *i += 1;
            }
        }
    }

    /// `skip_value`'s documented quirk: the just-skipped value's slot is
    /// marked as an array-index advance *and* its name (if any) is
    /// overwritten with the literal string `"null"`, rather than left as
    /// the field name that was actually skipped.
    pub(super) fn mark_skipped(&mut self) {
        self.advance_index();
        if let Some(slot) = self.names.last_mut() {
            if slot.is_some() {
                *slot = Some("null".to_string());
            }
        }
    }

    pub(super) fn close(&mut self) {
        self.states = vec![ScopeState::Closed];
        self.names = vec![None];
        self.indices = vec![None];
    }

    /// `$[.name|[idx]]*`
    pub(super) fn path(&self) -> String {
        let mut out = String::from("$");
        for i in 0..self.states.len() {
            let state = self.states[i];
            if state.is_array() {
                if let Some(idx) = self.indices[i] {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            } else if state.is_object() {
                if let Some(name) = &self.names[i] {
                    out.push('.');
                    out.push_str(name);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_tracks_nested_array_index() {
        let mut s = ScopeStack::new();
        s.set_top(ScopeState::NonemptyDocument);
        s.push(ScopeState::EmptyObject);
        s.set_name("a".into());
        s.set_top(ScopeState::DanglingName);
        s.set_top(ScopeState::NonemptyObject);
        s.push(ScopeState::EmptyObject);
        s.set_name("b".into());
        s.set_top(ScopeState::DanglingName);
        s.set_top(ScopeState::NonemptyObject);
        s.push(ScopeState::EmptyArray);
        s.init_array_index();
        s.advance_index();
        assert_eq!(s.path(), "$.a.b[1]");
    }

    #[test]
    fn skip_marks_name_as_null_literal() {
        let mut s = ScopeStack::new();
        s.set_top(ScopeState::NonemptyDocument);
        s.push(ScopeState::EmptyObject);
        s.set_name("a".into());
        s.mark_skipped();
        assert_eq!(s.path(), "$.null");
    }
}
