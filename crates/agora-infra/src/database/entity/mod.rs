//! SeaORM entities for the board schema.

pub mod answer;
pub mod answer_voter;
pub mod comment;
pub mod comment_voter;
pub mod question;
pub mod question_voter;
pub mod user;

use agora_core::domain::Owner;
use sea_orm::entity::prelude::*;

/// Discriminator column for the owner union: `'user'` or `'group'`.
///
/// Paired with a single `owner_id` column; the two-nullable-foreign-keys
/// layout of the source schema is gone.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum OwnerKind {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "group")]
    Group,
}

/// Join a discriminator/id column pair back into the domain union.
///
/// A half-set pair decodes as no owner; the write path never produces
/// one.
pub(crate) fn owner_from_columns(kind: Option<OwnerKind>, id: Option<Uuid>) -> Option<Owner> {
    match (kind, id) {
        (Some(OwnerKind::User), Some(id)) => Some(Owner::User(id)),
        (Some(OwnerKind::Group), Some(id)) => Some(Owner::Group(id)),
        _ => None,
    }
}

/// Split the domain union into the discriminator/id column pair.
pub(crate) fn owner_to_columns(owner: Option<Owner>) -> (Option<OwnerKind>, Option<Uuid>) {
    match owner {
        Some(Owner::User(id)) => (Some(OwnerKind::User), Some(id)),
        Some(Owner::Group(id)) => (Some(OwnerKind::Group), Some(id)),
        None => (None, None),
    }
}
