//! The active-context table.

use fieldpool_core::ContextId;
use smallvec::SmallVec;

/// One activation flag per context.
///
/// Flags are plain booleans: activating an active context or
/// deactivating an inactive one does nothing, and there is no nesting
/// count. Scoped activation that survives nesting is provided by
/// [`FieldPool::enter`](crate::FieldPool::enter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveContextSet {
    flags: Vec<bool>,
}

impl ActiveContextSet {
    /// A set of `n` contexts, all inactive.
    pub fn new(n: usize) -> Self {
        Self {
            flags: vec![false; n],
        }
    }

    /// Set the flag. Returns `true` if it was previously clear.
    ///
    /// Out-of-range contexts are ignored and return `false`.
    pub fn activate(&mut self, context: ContextId) -> bool {
        match self.flags.get_mut(context.0 as usize) {
            Some(flag) => !std::mem::replace(flag, true),
            None => false,
        }
    }

    /// Clear the flag. Returns `true` if it was previously set.
    pub fn deactivate(&mut self, context: ContextId) -> bool {
        match self.flags.get_mut(context.0 as usize) {
            Some(flag) => std::mem::replace(flag, false),
            None => false,
        }
    }

    /// Whether the context is active. Unknown contexts are never active.
    pub fn is_active(&self, context: ContextId) -> bool {
        self.flags
            .get(context.0 as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Active contexts in ascending id order.
    pub fn active(&self) -> SmallVec<[ContextId; 4]> {
        self.flags
            .iter()
            .enumerate()
            .filter(|&(_, &on)| on)
            .map(|(i, _)| ContextId(i as u32))
            .collect()
    }

    /// Number of contexts tracked.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no contexts are tracked.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        let set = ActiveContextSet::new(3);
        assert!((0..3).all(|c| !set.is_active(ContextId(c))));
        assert!(set.active().is_empty());
    }

    #[test]
    fn activate_is_idempotent() {
        let mut set = ActiveContextSet::new(2);
        assert!(set.activate(ContextId(1)));
        assert!(!set.activate(ContextId(1)));
        assert!(set.is_active(ContextId(1)));
        assert!(!set.is_active(ContextId(0)));
    }

    #[test]
    fn nested_activation_collapses_to_one_flag() {
        let mut set = ActiveContextSet::new(1);
        set.activate(ContextId(0));
        set.activate(ContextId(0));
        assert!(set.deactivate(ContextId(0)));
        assert!(!set.is_active(ContextId(0)));
        assert!(!set.deactivate(ContextId(0)));
    }

    #[test]
    fn active_lists_in_id_order() {
        let mut set = ActiveContextSet::new(4);
        set.activate(ContextId(3));
        set.activate(ContextId(1));
        assert_eq!(set.active().as_slice(), &[ContextId(1), ContextId(3)]);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut set = ActiveContextSet::new(1);
        assert!(!set.activate(ContextId(5)));
        assert!(!set.is_active(ContextId(5)));
        assert_eq!(set.len(), 1);
    }
}
