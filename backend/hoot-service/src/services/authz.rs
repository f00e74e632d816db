/// Ownership guard
///
/// One comparison rule for every owned resource: the acting identity must
/// equal the recorded owner, compared as canonical UUIDs. Hoots and
/// comments go through the same function, so the two paths cannot drift
/// apart in how they compare identities.
use uuid::Uuid;

/// Outcome of an ownership check. `Deny` is a value, not an error; callers
/// decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Allow exactly when the actor is the recorded owner.
pub fn authorize(actor_id: Uuid, owner_id: Uuid) -> Access {
    if actor_id == owner_id {
        Access::Allow
    } else {
        Access::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        let id = Uuid::new_v4();
        assert_eq!(authorize(id, id), Access::Allow);
    }

    #[test]
    fn non_owner_is_denied() {
        assert_eq!(authorize(Uuid::new_v4(), Uuid::new_v4()), Access::Deny);
    }
}
