use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::host::FilterHost;
use crate::term::{FilterTerm, ListenerId};
use crate::RowIdx;
use log::{debug, trace};
use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

/// Owns the filter terms and recomputes row visibility of a [`FilterHost`] whenever they change.
///
/// Terms are AND-ed together. Inside one term every column is checked against every needle, and
/// any case-insensitive substring match satisfies the term.
pub struct FilterEngine {
    terms: Vec<Entry>,
    config: FilterConfig,
    updating: bool,
    dirty: bool,
    /// Incremented by the listener every contained term carries.
    pending: Rc<Cell<usize>>,
}

struct Entry {
    term: FilterTerm,
    listener: ListenerId,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::with_config(FilterConfig::default())
    }

    pub fn with_config(config: FilterConfig) -> Self {
        FilterEngine {
            terms: vec![],
            config,
            updating: false,
            dirty: false,
            pending: Rc::new(Cell::new(0)),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Changing the config does not trigger filtering, call [`Self::filter`] afterwards.
    pub fn config_mut(&mut self) -> &mut FilterConfig {
        &mut self.config
    }

    pub fn terms(&self) -> impl Iterator<Item = &FilterTerm> + '_ {
        self.terms.iter().map(|e| &e.term)
    }

    pub fn term(&self, idx: usize) -> Option<&FilterTerm> {
        self.terms.get(idx).map(|e| &e.term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn position(&self, term: &FilterTerm) -> Option<usize> {
        self.terms.iter().position(|e| &e.term == term)
    }

    /// True between [`Self::begin_update`] and [`Self::end_update`].
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// True if something changed while updating and filtering is still owed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Add a term and filter.
    ///
    /// Returns `Ok(false)` without filtering if an equal term is already present, the new one is
    /// dropped in that case.
    pub fn add_term<H: FilterHost + ?Sized>(
        &mut self,
        host: &mut H,
        term: FilterTerm,
    ) -> Result<bool, FilterError> {
        if !self.insert(term) {
            return Ok(false);
        }
        self.filter(host)?;
        Ok(true)
    }

    /// Remove the term at `idx` and filter. The removed term is returned without any listener
    /// attached by the engine.
    ///
    /// If filtering fails, the term is still removed and dropped.
    pub fn remove_term_at<H: FilterHost + ?Sized>(
        &mut self,
        host: &mut H,
        idx: usize,
    ) -> Result<Option<FilterTerm>, FilterError> {
        if idx >= self.terms.len() {
            return Ok(None);
        }
        let term = self.detach(idx);
        debug!("FilterEngine: removed {term}");
        self.filter(host)?;
        Ok(Some(term))
    }

    /// Remove a term equal to `term`, if any.
    pub fn remove_term<H: FilterHost + ?Sized>(
        &mut self,
        host: &mut H,
        term: &FilterTerm,
    ) -> Result<Option<FilterTerm>, FilterError> {
        match self.position(term) {
            Some(idx) => self.remove_term_at(host, idx),
            None => Ok(None),
        }
    }

    /// Replace the whole collection, duplicates in `terms` are dropped.
    /// Returns the previous terms, then filters once.
    pub fn replace_terms<H: FilterHost + ?Sized>(
        &mut self,
        host: &mut H,
        terms: impl IntoIterator<Item = FilterTerm>,
    ) -> Result<Vec<FilterTerm>, FilterError> {
        let mut old = Vec::with_capacity(self.terms.len());
        while !self.terms.is_empty() {
            old.push(self.detach(0));
        }
        for term in terms {
            self.insert(term);
        }
        debug!(
            "FilterEngine: replaced {} terms with {}",
            old.len(),
            self.terms.len()
        );
        self.filter(host)?;
        Ok(old)
    }

    pub fn clear_terms<H: FilterHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<Vec<FilterTerm>, FilterError> {
        self.replace_terms(host, [])
    }

    /// Mutable access to a contained term. Setting its text or columns filters right away, same
    /// as adding or removing a term.
    pub fn term_mut<'a, H: FilterHost + ?Sized>(
        &'a mut self,
        host: &'a mut H,
        idx: usize,
    ) -> Option<TermMut<'a, H>> {
        if idx >= self.terms.len() {
            return None;
        }
        Some(TermMut {
            engine: self,
            host,
            idx,
        })
    }

    /// Postpone filtering until [`Self::end_update`] is called.
    pub fn begin_update(&mut self) {
        self.updating = true;
    }

    /// Leave updating mode and filter if anything changed in the meantime.
    pub fn end_update<H: FilterHost + ?Sized>(&mut self, host: &mut H) -> Result<(), FilterError> {
        self.updating = false;
        if self.dirty {
            self.filter(host)?;
        }
        Ok(())
    }

    /// Recompute visibility of every row. Called automatically on every change, explicit call is
    /// only needed when cell values change.
    ///
    /// While updating, only marks the engine dirty.
    pub fn filter<H: FilterHost + ?Sized>(&mut self, host: &mut H) -> Result<(), FilterError> {
        if self.updating {
            self.dirty = true;
            return Ok(());
        }
        self.dirty = false;
        self.evaluate(host)
    }

    fn evaluate<H: FilterHost + ?Sized>(&self, host: &mut H) -> Result<(), FilterError> {
        let compiled: Vec<CompiledTerm> = self
            .terms
            .iter()
            .map(|e| CompiledTerm::new(&e.term, self.config.delimiter))
            .collect();
        let template_row = host.template_row();
        trace!(
            "FilterEngine: filtering {} rows with {} terms",
            host.row_count(),
            compiled.len()
        );

        host.clear_current_cell();
        // Rows before a failing one keep their new visibility, so the host is told either way.
        let result = Self::apply_visibility(host, &compiled, template_row);
        host.on_filtered();
        result
    }

    fn apply_visibility<H: FilterHost + ?Sized>(
        host: &mut H,
        compiled: &[CompiledTerm],
        template_row: Option<RowIdx>,
    ) -> Result<(), FilterError> {
        for row in (0..host.row_count()).map(RowIdx) {
            if Some(row) == template_row {
                continue;
            }
            let mut visible = true;
            for term in compiled {
                if !term.is_satisfied_by(&*host, row)? {
                    visible = false;
                    break;
                }
            }
            host.set_row_visible(row, visible);
        }
        Ok(())
    }

    /// Push and subscribe, unless an equal term is already present. A rejected term is dropped
    /// without ever being subscribed, so nothing is dispatched for it.
    fn insert(&mut self, mut term: FilterTerm) -> bool {
        // Counted as if already inserted: the term itself is one of the matches.
        let equal = 1 + self.terms.iter().filter(|e| e.term == term).count();
        if equal > 1 {
            debug!("FilterEngine: rejected duplicate {term}");
            return false;
        }
        let pending = self.pending.clone();
        let listener = term.subscribe(move |field| {
            trace!("FilterEngine: term {field} changed");
            pending.set(pending.get() + 1);
        });
        debug!("FilterEngine: added {term}");
        self.terms.push(Entry { term, listener });
        true
    }

    /// Take the term out without filtering.
    fn detach(&mut self, idx: usize) -> FilterTerm {
        let Entry { mut term, listener } = self.terms.remove(idx);
        term.unsubscribe(listener);
        term
    }

    /// Filter once if any contained term notified since the last call.
    fn dispatch_pending<H: FilterHost + ?Sized>(&mut self, host: &mut H) -> Result<(), FilterError> {
        if self.pending.replace(0) > 0 {
            self.filter(host)
        } else {
            Ok(())
        }
    }
}

/// Borrow of one term inside a [`FilterEngine`], returned by [`FilterEngine::term_mut`].
pub struct TermMut<'a, H: FilterHost + ?Sized> {
    engine: &'a mut FilterEngine,
    host: &'a mut H,
    idx: usize,
}

impl<H: FilterHost + ?Sized> TermMut<'_, H> {
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), FilterError> {
        self.engine.terms[self.idx].term.set_text(text);
        self.engine.dispatch_pending(self.host)
    }

    pub fn set_columns(&mut self, columns: impl Into<String>) -> Result<(), FilterError> {
        self.engine.terms[self.idx].term.set_columns(columns);
        self.engine.dispatch_pending(self.host)
    }
}

impl<H: FilterHost + ?Sized> Deref for TermMut<'_, H> {
    type Target = FilterTerm;

    fn deref(&self) -> &FilterTerm {
        &self.engine.terms[self.idx].term
    }
}

/// Term split into column names and upper cased needles, once per pass.
struct CompiledTerm<'a> {
    columns: Vec<&'a str>,
    needles: Vec<String>,
}

impl<'a> CompiledTerm<'a> {
    fn new(term: &'a FilterTerm, delimiter: char) -> Self {
        CompiledTerm {
            columns: term.columns().split(delimiter).collect(),
            needles: term
                .text()
                .split(delimiter)
                .map(|s| s.to_uppercase())
                .collect(),
        }
    }

    /// Columns outer, needles inner, stops on the first match.
    fn is_satisfied_by<H: FilterHost + ?Sized>(
        &self,
        host: &H,
        row: RowIdx,
    ) -> Result<bool, FilterError> {
        for column in &self.columns {
            // Empty segment names no column and matches nothing.
            if column.is_empty() {
                continue;
            }
            let col_uid = host
                .column_uid(column)
                .ok_or_else(|| FilterError::UnknownColumn {
                    column: column.to_string(),
                    row,
                })?;
            let Some(value) = host.cell_text(row, col_uid) else {
                continue;
            };
            let value = value.to_uppercase();
            if self
                .needles
                .iter()
                .any(|needle| value.contains(needle.as_str()))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
