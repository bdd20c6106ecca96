//! Brand scoping for record collections.
//!
//! Every page that lists brand-tagged data goes through `ScopeFilter` rather
//! than comparing brand names itself.
//!
//! | caller            | visible records                          |
//! |-------------------|------------------------------------------|
//! | aggregator        | all, unchanged                           |
//! | brand(scope)      | `owner_scope == scope`, exact, in order  |
//! | no session        | none                                     |

use super::{Role, Session};

/// A record owned by one brand.
///
/// Implemented by any campaign, ad or analytics row the console lists.
pub trait ScopedRecord {
    /// Brand that owns this record.
    fn owner_scope(&self) -> &str;

    /// Whether `session` may see this record.
    fn is_visible_to(&self, session: Option<&Session>) -> bool {
        match session.map(Session::role) {
            None => false,
            Some(Role::Aggregator) => true,
            Some(Role::Brand(scope)) => self.owner_scope() == scope.as_str(),
        }
    }
}

impl<T: ScopedRecord + ?Sized> ScopedRecord for &T {
    fn owner_scope(&self) -> &str {
        (**self).owner_scope()
    }
}

/// Pure, deterministic visibility filter.
pub struct ScopeFilter;

impl ScopeFilter {
    /// Returns the records `session` may see, consuming the input.
    ///
    /// For an aggregator the input vector itself is handed back untouched.
    pub fn filter<R: ScopedRecord>(records: Vec<R>, session: Option<&Session>) -> Vec<R> {
        match session.map(Session::role) {
            None => Vec::new(),
            Some(Role::Aggregator) => records,
            Some(Role::Brand(scope)) => records
                .into_iter()
                .filter(|r| r.owner_scope() == scope.as_str())
                .collect(),
        }
    }

    /// Whether a single record is visible to `session`.
    pub fn is_visible<R: ScopedRecord + ?Sized>(record: &R, session: Option<&Session>) -> bool {
        record.is_visible_to(session)
    }

    /// Borrowing variant of [`ScopeFilter::filter`].
    pub fn filter_refs<'a, R: ScopedRecord>(
        records: &'a [R],
        session: Option<&Session>,
    ) -> Vec<&'a R> {
        records.iter().filter(|r| r.is_visible_to(session)).collect()
    }
}
