//! Comment entity for SeaORM.
//!
//! The parent lives in two nullable foreign key columns so the store can
//! cascade deletes; decoding into the domain's tagged parent is fallible
//! because a row with neither column set cannot be represented.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use agora_core::domain::{Comment, CommentParent};
use agora_core::error::RepoError;

use super::{OwnerKind, owner_from_columns, owner_to_columns};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub owner_kind: Option<OwnerKind>,
    pub owner_id: Option<Uuid>,
    pub created_on: DateTimeWithTimeZone,
    pub modified_on: DateTimeWithTimeZone,
    pub created_by: Uuid,
    pub modified_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::answer::Entity",
        from = "Column::AnswerId",
        to = "super::answer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Answer,
    #[sea_orm(has_many = "super::comment_voter::Entity")]
    Voter,
}

impl Related<super::comment_voter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Comment {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parent = match (model.question_id, model.answer_id) {
            (Some(question_id), None) => CommentParent::Question(question_id),
            (None, Some(answer_id)) => CommentParent::Answer(answer_id),
            _ => {
                return Err(RepoError::Corrupt(format!(
                    "comment {} does not reference exactly one parent",
                    model.id
                )));
            }
        };

        Ok(Self {
            id: model.id,
            parent,
            content: model.content,
            owner: owner_from_columns(model.owner_kind, model.owner_id),
            created_on: model.created_on.into(),
            modified_on: model.modified_on.into(),
            created_by: model.created_by,
            modified_by: model.modified_by,
        })
    }
}

impl From<Comment> for ActiveModel {
    fn from(comment: Comment) -> Self {
        let (owner_kind, owner_id) = owner_to_columns(comment.owner);
        Self {
            id: Set(comment.id),
            question_id: Set(comment.parent.question_id()),
            answer_id: Set(comment.parent.answer_id()),
            content: Set(comment.content),
            owner_kind: Set(owner_kind),
            owner_id: Set(owner_id),
            created_on: Set(comment.created_on.into()),
            modified_on: Set(comment.modified_on.into()),
            created_by: Set(comment.created_by),
            modified_by: Set(comment.modified_by),
        }
    }
}
