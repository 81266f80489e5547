//! Constraints attached to a single property.

use super::failure::{ConstraintId, FailureRecord};

/// Type alias for constraint check closures.
pub(crate) type Check<M, V> = Box<dyn Fn(&V, &M) -> Result<(), String> + Send + Sync>;

/// A pure check over a property value and its owning model.
pub(crate) struct Constraint<M, V> {
    id: ConstraintId,
    members: Vec<String>,
    check: Check<M, V>,
}

impl<M, V> Constraint<M, V> {
    pub(crate) fn new(id: ConstraintId, check: Check<M, V>) -> Self {
        let members = vec![id.property.clone()];
        Self { id, members, check }
    }

    pub(crate) fn add_member(&mut self, member: String) {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }

    /// Run the check, producing a failure record if it does not hold.
    pub(crate) fn evaluate(&self, value: &V, model: &M) -> Option<FailureRecord> {
        (self.check)(value, model)
            .err()
            .map(|message| FailureRecord::new(self.id.clone(), self.members.clone(), message))
    }
}

impl<M, V> std::fmt::Debug for Constraint<M, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint")
            .field("id", &self.id)
            .field("members", &self.members)
            .finish()
    }
}
