//! Initial schema: users, groups, the three post tables, and their voter
//! join tables.
//!
//! Deletion cascades through foreign keys: a question takes its answers,
//! the comments under either, and every affected voter row with it. The
//! owner columns are a discriminator/id pair and deliberately carry no
//! foreign key, since the id refers to a user or a group depending on the
//! discriminator.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn owned_post_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("owner_kind"))
                .string_len(8)
                .null(),
        )
        .col(ColumnDef::new(Alias::new("owner_id")).uuid().null())
        .col(
            ColumnDef::new(Alias::new("created_on"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("modified_on"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Alias::new("created_by")).uuid().not_null())
        .col(ColumnDef::new(Alias::new("modified_by")).uuid().not_null())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string_len(150).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_post_columns(
                    Table::create()
                        .table(Questions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Questions::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Questions::Subject).string_len(200).not_null())
                        .col(ColumnDef::new(Questions::Content).text().not_null()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_questions_created_by")
                        .from(Questions::Table, Alias::new("created_by"))
                        .to(Users::Table, Users::Id)
                        .on_update(ForeignKeyAction::Cascade)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_created_on")
                    .table(Questions::Table)
                    .col(Alias::new("created_on"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_post_columns(
                    Table::create()
                        .table(Answers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Answers::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Answers::QuestionId).uuid().not_null())
                        .col(ColumnDef::new(Answers::Content).text().not_null()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_answers_question")
                        .from(Answers::Table, Answers::QuestionId)
                        .to(Questions::Table, Questions::Id)
                        .on_update(ForeignKeyAction::Cascade)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_answers_created_by")
                        .from(Answers::Table, Alias::new("created_by"))
                        .to(Users::Table, Users::Id)
                        .on_update(ForeignKeyAction::Cascade)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                owned_post_columns(
                    Table::create()
                        .table(Comments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Comments::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Comments::QuestionId).uuid().null())
                        .col(ColumnDef::new(Comments::AnswerId).uuid().null())
                        .col(ColumnDef::new(Comments::Content).text().not_null()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comments_question")
                        .from(Comments::Table, Comments::QuestionId)
                        .to(Questions::Table, Questions::Id)
                        .on_update(ForeignKeyAction::Cascade)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comments_answer")
                        .from(Comments::Table, Comments::AnswerId)
                        .to(Answers::Table, Answers::Id)
                        .on_update(ForeignKeyAction::Cascade)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_comments_created_by")
                        .from(Comments::Table, Alias::new("created_by"))
                        .to(Users::Table, Users::Id)
                        .on_update(ForeignKeyAction::Cascade)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionVoters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QuestionVoters::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(QuestionVoters::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(QuestionVoters::QuestionId)
                            .col(QuestionVoters::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_voters_question")
                            .from(QuestionVoters::Table, QuestionVoters::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_voters_user")
                            .from(QuestionVoters::Table, QuestionVoters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AnswerVoters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AnswerVoters::AnswerId).uuid().not_null())
                    .col(ColumnDef::new(AnswerVoters::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(AnswerVoters::AnswerId)
                            .col(AnswerVoters::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answer_voters_answer")
                            .from(AnswerVoters::Table, AnswerVoters::AnswerId)
                            .to(Answers::Table, Answers::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answer_voters_user")
                            .from(AnswerVoters::Table, AnswerVoters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentVoters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CommentVoters::CommentId).uuid().not_null())
                    .col(ColumnDef::new(CommentVoters::UserId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(CommentVoters::CommentId)
                            .col(CommentVoters::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_voters_comment")
                            .from(CommentVoters::Table, CommentVoters::CommentId)
                            .to(Comments::Table, Comments::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_voters_user")
                            .from(CommentVoters::Table, CommentVoters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentVoters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnswerVoters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionVoters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedOn,
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    Subject,
    Content,
}

#[derive(DeriveIden)]
enum Answers {
    Table,
    Id,
    QuestionId,
    Content,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    QuestionId,
    AnswerId,
    Content,
}

#[derive(DeriveIden)]
enum QuestionVoters {
    Table,
    QuestionId,
    UserId,
}

#[derive(DeriveIden)]
enum AnswerVoters {
    Table,
    AnswerId,
    UserId,
}

#[derive(DeriveIden)]
enum CommentVoters {
    Table,
    CommentId,
    UserId,
}
