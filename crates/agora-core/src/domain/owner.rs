use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The party accountable for a post: a single user or a single group.
///
/// The source schema kept two nullable foreign keys and policed the
/// "never both set" invariant in a setter; the tagged variant makes a
/// half-set or double-set owner unrepresentable. Posts with no owner are
/// modeled as `Option<Owner>` on the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Owner {
    User(Uuid),
    Group(Uuid),
}

impl Owner {
    pub fn user(id: Uuid) -> Self {
        Owner::User(id)
    }

    pub fn group(id: Uuid) -> Self {
        Owner::Group(id)
    }

    /// True when this owner is exactly the given user.
    ///
    /// A group owner never matches an individual user, mirroring the
    /// original permission checks where a request user compared unequal
    /// to any group.
    pub fn is_user(&self, user_id: Uuid) -> bool {
        matches!(self, Owner::User(id) if *id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_owner_matches_only_that_user() {
        let me = Uuid::new_v4();
        let owner = Owner::user(me);

        assert!(owner.is_user(me));
        assert!(!owner.is_user(Uuid::new_v4()));
    }

    #[test]
    fn group_owner_matches_no_user() {
        let id = Uuid::new_v4();
        assert!(!Owner::group(id).is_user(id));
    }
}
