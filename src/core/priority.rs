//! Priority resolution
//!
//! A participant's priority is resolved once, when it is registered, from
//! an externally supplied override table keyed by [`TypeTag`].

use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
    fmt,
};

use log::trace;

use super::{
    error::{LifecycleError, LifecycleResult},
    traits::Participant,
};

/// Priority of participants no override matches. Negative values run
/// before it, positive values after.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Stable identifier of a participant type or type family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    /// Tag of a concrete Rust type, identical to what
    /// [`Participant::type_tag`] reports by default.
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Tag of a named family, for participants that declare it as an ancestor.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TypeTag {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered `(type, priority)` table for one phase.
#[derive(Debug, Clone, Default)]
pub struct PriorityOverrides {
    entries: Vec<(TypeTag, i32)>,
    index: HashMap<TypeTag, Vec<i32>>,
}

impl PriorityOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PriorityOverrides::push`].
    pub fn with(mut self, tag: impl Into<TypeTag>, priority: i32) -> Self {
        self.push(tag, priority);
        self
    }

    pub fn push(&mut self, tag: impl Into<TypeTag>, priority: i32) {
        let tag = tag.into();
        self.index.entry(tag.clone()).or_default().push(priority);
        self.entries.push((tag, priority));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeTag, i32)> {
        self.entries.iter().map(|(tag, priority)| (tag, *priority))
    }

    /// Resolve the effective priority of a participant.
    ///
    /// Matches with identical values collapse into one. More than one
    /// distinct value is a configuration conflict and is never settled by
    /// picking one of them.
    pub fn resolve<P>(&self, participant: &P) -> LifecycleResult<i32>
    where
        P: Participant + ?Sized,
    {
        let mut tags = participant.ancestor_tags();
        tags.push(participant.type_tag());

        let matches: BTreeSet<i32> = tags
            .iter()
            .filter_map(|tag| self.index.get(tag))
            .flatten()
            .copied()
            .collect();

        let mut distinct = matches.into_iter();
        match (distinct.next(), distinct.next()) {
            (None, _) => Ok(DEFAULT_PRIORITY),
            (Some(priority), None) => {
                trace!(
                    "Resolved priority {} for type '{}'",
                    priority,
                    participant.type_name()
                );
                Ok(priority)
            }
            (Some(first), Some(second)) => {
                let mut priorities = vec![first, second];
                priorities.extend(distinct);
                Err(LifecycleError::AmbiguousPriority {
                    type_name: participant.type_name(),
                    priorities,
                })
            }
        }
    }
}

impl<T: Into<TypeTag>> FromIterator<(T, i32)> for PriorityOverrides {
    fn from_iter<I: IntoIterator<Item = (T, i32)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (tag, priority) in iter {
            overrides.push(tag, priority);
        }
        overrides
    }
}
