//! Question entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{OwnerKind, owner_from_columns, owner_to_columns};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subject: String,
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
    #[sea_orm(has_many = "super::answer::Entity")]
    Answer,
    #[sea_orm(has_many = "super::question_voter::Entity")]
    Voter,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answer.def()
    }
}

impl Related<super::question_voter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voter.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for agora_core::domain::Question {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            subject: model.subject,
            content: model.content,
            owner: owner_from_columns(model.owner_kind, model.owner_id),
            created_on: model.created_on.into(),
            modified_on: model.modified_on.into(),
            created_by: model.created_by,
            modified_by: model.modified_by,
        }
    }
}

impl From<agora_core::domain::Question> for ActiveModel {
    fn from(question: agora_core::domain::Question) -> Self {
        let (owner_kind, owner_id) = owner_to_columns(question.owner);
        Self {
            id: Set(question.id),
            subject: Set(question.subject),
            content: Set(question.content),
            owner_kind: Set(owner_kind),
            owner_id: Set(owner_id),
            created_on: Set(question.created_on.into()),
            modified_on: Set(question.modified_on.into()),
            created_by: Set(question.created_by),
            modified_by: Set(question.modified_by),
        }
    }
}
