//! Ownership, authorization, and voting rules.
//!
//! These are free functions composed into handlers, replacing the view
//! class hierarchy the original expressed them through.

use uuid::Uuid;

use crate::domain::{Answer, Comment, Owner, Question};
use crate::error::DomainError;

/// Implemented by every post type that carries an owner.
pub trait Owned {
    fn owner(&self) -> Option<Owner>;
}

impl Owned for Question {
    fn owner(&self) -> Option<Owner> {
        self.owner
    }
}

impl Owned for Answer {
    fn owner(&self) -> Option<Owner> {
        self.owner
    }
}

impl Owned for Comment {
    fn owner(&self) -> Option<Owner> {
        self.owner
    }
}

/// Gate applied before every modify/delete: only the owning user passes.
///
/// Group-owned and ownerless posts fail for every actor. There is no
/// role-based override and no admin bypass.
pub fn authorize_mutation<T: Owned>(entity: &T, actor: Uuid) -> Result<(), DomainError> {
    match entity.owner() {
        Some(owner) if owner.is_user(actor) => Ok(()),
        _ => Err(DomainError::PermissionDenied),
    }
}

/// Self-vote check: a user may not recommend their own post.
///
/// On success the caller adds the actor to the voter set; membership is a
/// set insert, so repeat votes are absorbed without effect.
pub fn check_vote<T: Owned>(entity: &T, actor: Uuid) -> Result<(), DomainError> {
    match entity.owner() {
        Some(owner) if owner.is_user(actor) => Err(DomainError::OwnVote),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_by(author: Uuid) -> Question {
        Question::new("subject".into(), "content".into(), author)
    }

    #[test]
    fn owner_may_mutate() {
        let author = Uuid::new_v4();
        let q = question_by(author);

        assert!(authorize_mutation(&q, author).is_ok());
    }

    #[test]
    fn non_owner_may_not_mutate() {
        let q = question_by(Uuid::new_v4());

        let err = authorize_mutation(&q, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied));
    }

    #[test]
    fn group_owned_post_rejects_every_user() {
        let group = Uuid::new_v4();
        let mut q = question_by(Uuid::new_v4());
        q.owner = Some(Owner::group(group));

        // Not even an actor whose id equals the group id passes.
        assert!(authorize_mutation(&q, group).is_err());
    }

    #[test]
    fn ownerless_post_rejects_every_user() {
        let mut q = question_by(Uuid::new_v4());
        q.owner = None;

        assert!(authorize_mutation(&q, Uuid::new_v4()).is_err());
    }

    #[test]
    fn own_vote_is_rejected() {
        let author = Uuid::new_v4();
        let q = question_by(author);

        let err = check_vote(&q, author).unwrap_err();
        assert!(matches!(err, DomainError::OwnVote));
        assert_eq!(err.to_string(), "cannot vote on your own post");
    }

    #[test]
    fn others_may_vote() {
        let q = question_by(Uuid::new_v4());
        assert!(check_vote(&q, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn answer_and_comment_share_the_rules() {
        let author = Uuid::new_v4();
        let answer = Answer::new(Uuid::new_v4(), "a".into(), author);
        let comment = Comment::on_answer(answer.id, "c".into(), author);

        assert!(authorize_mutation(&answer, author).is_ok());
        assert!(check_vote(&comment, author).is_err());
        assert!(authorize_mutation(&comment, Uuid::new_v4()).is_err());
    }
}
