//! Interface to the external user store.
//!
//! The core only ever needs a snapshot of a subject; account
//! mutations, subscriptions and persistence live entirely on the other
//! side of this trait.

use selene::Subject;

pub trait SubjectStore: Send + Sync {
    /// A snapshot of the subject for one user, or `None` when the user
    /// is unknown.
    fn subject(&self, user_id: i64) -> anyhow::Result<Option<Subject>>;
}

/// Fixed in-memory store, enough for tests and single-subject tools.
#[derive(Debug, Default)]
pub struct StaticSubjectStore {
    subjects: std::collections::HashMap<i64, Subject>,
}

impl StaticSubjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: i64, subject: Subject) {
        self.subjects.insert(user_id, subject);
    }
}

impl SubjectStore for StaticSubjectStore {
    fn subject(&self, user_id: i64) -> anyhow::Result<Option<Subject>> {
        Ok(self.subjects.get(&user_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use selene::Location;

    #[test]
    fn static_store_round_trips_a_subject() {
        let moscow = Location::new(37.6173, 55.7558).unwrap();
        let subject = Subject::new(
            chrono::Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap(),
            moscow,
            moscow,
        );
        let mut store = StaticSubjectStore::new();
        store.insert(7, subject);

        assert_eq!(store.subject(7).unwrap(), Some(subject));
        assert_eq!(store.subject(8).unwrap(), None);
    }
}
