//! Answer entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{OwnerKind, owner_from_columns, owner_to_columns};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question_id: Uuid,
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
    #[sea_orm(has_many = "super::answer_voter::Entity")]
    Voter,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::answer_voter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for agora_core::domain::Answer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            question_id: model.question_id,
            content: model.content,
            owner: owner_from_columns(model.owner_kind, model.owner_id),
            created_on: model.created_on.into(),
            modified_on: model.modified_on.into(),
            created_by: model.created_by,
            modified_by: model.modified_by,
        }
    }
}

impl From<agora_core::domain::Answer> for ActiveModel {
    fn from(answer: agora_core::domain::Answer) -> Self {
        let (owner_kind, owner_id) = owner_to_columns(answer.owner);
        Self {
            id: Set(answer.id),
            question_id: Set(answer.question_id),
            content: Set(answer.content),
            owner_kind: Set(owner_kind),
            owner_id: Set(owner_id),
            created_on: Set(answer.created_on.into()),
            modified_on: Set(answer.modified_on.into()),
            created_by: Set(answer.created_by),
            modified_by: Set(answer.modified_by),
        }
    }
}
