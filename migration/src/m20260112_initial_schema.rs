// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

/// 数据库初始模式迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

fn uuid_pk<T: IntoIden + 'static>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.uuid().not_null().primary_key();
    if manager.get_database_backend() == DbBackend::Postgres {
        def.default(Expr::cust("gen_random_uuid()"));
    }
    def
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 应用数据库迁移
    ///
    /// # 参数
    ///
    /// * `manager` - 数据库模式管理器
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 迁移成功
    /// * `Err(DbErr)` - 迁移失败
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create users table (No dependencies; id mirrors the identity provider)
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(Users::ScansThisMonth)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::LastScanReset)
                            .date()
                            .not_null()
                            .default(Expr::current_date()),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Create homes table (Depends on Users)
        manager
            .create_table(
                Table::create()
                    .table(Homes::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, Homes::Id))
                    .col(ColumnDef::new(Homes::Name).string().not_null())
                    .col(ColumnDef::new(Homes::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Homes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Homes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_homes_owner")
                            .from(Homes::Table, Homes::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Create home_members table (Depends on Homes, Users)
        // user_id stays null until an invite token is redeemed
        manager
            .create_table(
                Table::create()
                    .table(HomeMembers::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, HomeMembers::Id))
                    .col(ColumnDef::new(HomeMembers::HomeId).uuid().not_null())
                    .col(ColumnDef::new(HomeMembers::UserId).uuid().null())
                    .col(
                        ColumnDef::new(HomeMembers::Role)
                            .string()
                            .not_null()
                            .default("member"),
                    )
                    .col(ColumnDef::new(HomeMembers::InvitedEmail).string().null())
                    .col(ColumnDef::new(HomeMembers::InviteToken).string().null())
                    .col(
                        ColumnDef::new(HomeMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(HomeMembers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_home_members_home")
                            .from(HomeMembers::Table, HomeMembers::HomeId)
                            .to(Homes::Table, Homes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. Create rooms table (Depends on Homes)
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, Rooms::Id))
                    .col(ColumnDef::new(Rooms::HomeId).uuid().not_null())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::RoomType).string().not_null())
                    .col(ColumnDef::new(Rooms::Icon).string().null())
                    .col(ColumnDef::new(Rooms::SizeHint).string().null())
                    .col(
                        ColumnDef::new(Rooms::SensitivityTags)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Rooms::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_home")
                            .from(Rooms::Table, Rooms::HomeId)
                            .to(Homes::Table, Homes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 5. Create user_preferences table (Depends on Users, Homes)
        manager
            .create_table(
                Table::create()
                    .table(UserPreferences::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, UserPreferences::Id))
                    .col(ColumnDef::new(UserPreferences::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserPreferences::HomeId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserPreferences::DetailLevel)
                            .string()
                            .not_null()
                            .default("normal"),
                    )
                    .col(
                        ColumnDef::new(UserPreferences::CleaningStandard)
                            .string()
                            .not_null()
                            .default("quick"),
                    )
                    .col(
                        ColumnDef::new(UserPreferences::Restrictions)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(UserPreferences::MinutesPerDay)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(UserPreferences::DaysPerWeek)
                            .json()
                            .not_null()
                            .default("[1,2,3,4,5]"),
                    )
                    .col(
                        ColumnDef::new(UserPreferences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserPreferences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 6. Create scans table (Depends on Rooms, Users)
        manager
            .create_table(
                Table::create()
                    .table(Scans::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, Scans::Id))
                    .col(ColumnDef::new(Scans::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Scans::UserId).uuid().not_null())
                    .col(ColumnDef::new(Scans::ImageUrl).string().null())
                    .col(ColumnDef::new(Scans::ThumbnailUrl).string().null())
                    .col(ColumnDef::new(Scans::AiModel).string().not_null())
                    .col(ColumnDef::new(Scans::AiRawJson).json().not_null())
                    .col(ColumnDef::new(Scans::ScoreBefore).integer().null())
                    .col(ColumnDef::new(Scans::ScoreAfter).integer().null())
                    .col(
                        ColumnDef::new(Scans::KeepImage)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Scans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scans_room")
                            .from(Scans::Table, Scans::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 7. Create plans table (Depends on Scans, Rooms, Homes, Users)
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, Plans::Id))
                    .col(ColumnDef::new(Plans::ScanId).uuid().null())
                    .col(ColumnDef::new(Plans::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Plans::HomeId).uuid().not_null())
                    .col(ColumnDef::new(Plans::UserId).uuid().not_null())
                    .col(ColumnDef::new(Plans::Name).string().not_null())
                    .col(
                        ColumnDef::new(Plans::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Plans::IsTemplate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Plans::TotalEstimatedMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Plans::TotalActualMinutes).integer().null())
                    .col(
                        ColumnDef::new(Plans::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Plans::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Plans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Plans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_room")
                            .from(Plans::Table, Plans::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_home")
                            .from(Plans::Table, Plans::HomeId)
                            .to(Homes::Table, Homes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 8. Create tasks table (Depends on Plans, Rooms)
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, Tasks::Id))
                    .col(ColumnDef::new(Tasks::PlanId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::RoomId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(
                        ColumnDef::new(Tasks::DescriptionSteps)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Tasks::Category)
                            .string()
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(Tasks::EstimatedMinutes)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(Tasks::ActualMinutes).integer().null())
                    .col(
                        ColumnDef::new(Tasks::Difficulty)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(Tasks::Supplies)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Tasks::SafetyNotes)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Tasks::AssigneeId).uuid().null())
                    .col(
                        ColumnDef::new(Tasks::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tasks::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tasks::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_plan")
                            .from(Tasks::Table, Tasks::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 9. Create task_events table (append-only log, Depends on Tasks, Users)
        manager
            .create_table(
                Table::create()
                    .table(TaskEvents::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, TaskEvents::Id))
                    .col(ColumnDef::new(TaskEvents::TaskId).uuid().not_null())
                    .col(ColumnDef::new(TaskEvents::UserId).uuid().not_null())
                    .col(ColumnDef::new(TaskEvents::EventType).string().not_null())
                    .col(
                        ColumnDef::new(TaskEvents::Metadata)
                            .json()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(TaskEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_events_task")
                            .from(TaskEvents::Table, TaskEvents::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 10. Create user_stats table (Depends on Users, Homes)
        manager
            .create_table(
                Table::create()
                    .table(UserStats::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, UserStats::Id))
                    .col(ColumnDef::new(UserStats::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserStats::HomeId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserStats::TotalTasksCompleted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::TotalMinutesCleaned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::CurrentStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::LongestStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserStats::LastActivityDate).date().null())
                    .col(
                        ColumnDef::new(UserStats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserStats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 11. Create badges and user_badges tables
        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, Badges::Id))
                    .col(ColumnDef::new(Badges::Name).string().not_null())
                    .col(ColumnDef::new(Badges::Description).string().not_null())
                    .col(ColumnDef::new(Badges::Icon).string().not_null())
                    .col(ColumnDef::new(Badges::Category).string().not_null())
                    .col(ColumnDef::new(Badges::RequirementType).string().not_null())
                    .col(
                        ColumnDef::new(Badges::RequirementValue)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Badges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserBadges::Table)
                    .if_not_exists()
                    .col(uuid_pk(manager, UserBadges::Id))
                    .col(ColumnDef::new(UserBadges::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserBadges::BadgeId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserBadges::EarnedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_badges_badge")
                            .from(UserBadges::Table, UserBadges::BadgeId)
                            .to(Badges::Table, Badges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    /// 回滚数据库迁移
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            UserBadges::Table.into_iden(),
            Badges::Table.into_iden(),
            UserStats::Table.into_iden(),
            TaskEvents::Table.into_iden(),
            Tasks::Table.into_iden(),
            Plans::Table.into_iden(),
            Scans::Table.into_iden(),
            UserPreferences::Table.into_iden(),
            Rooms::Table.into_iden(),
            HomeMembers::Table.into_iden(),
            Homes::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    FullName,
    AvatarUrl,
    ScansThisMonth,
    LastScanReset,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Homes {
    Table,
    Id,
    Name,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HomeMembers {
    Table,
    Id,
    HomeId,
    UserId,
    Role,
    InvitedEmail,
    InviteToken,
    JoinedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    HomeId,
    Name,
    RoomType,
    Icon,
    SizeHint,
    SensitivityTags,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserPreferences {
    Table,
    Id,
    UserId,
    HomeId,
    DetailLevel,
    CleaningStandard,
    Restrictions,
    MinutesPerDay,
    DaysPerWeek,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Scans {
    Table,
    Id,
    RoomId,
    UserId,
    ImageUrl,
    ThumbnailUrl,
    AiModel,
    AiRawJson,
    ScoreBefore,
    ScoreAfter,
    KeepImage,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    ScanId,
    RoomId,
    HomeId,
    UserId,
    Name,
    Status,
    IsTemplate,
    TotalEstimatedMinutes,
    TotalActualMinutes,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    PlanId,
    RoomId,
    Title,
    DescriptionSteps,
    Category,
    Priority,
    EstimatedMinutes,
    ActualMinutes,
    Difficulty,
    Supplies,
    SafetyNotes,
    Status,
    AssigneeId,
    SortOrder,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TaskEvents {
    Table,
    Id,
    TaskId,
    UserId,
    EventType,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserStats {
    Table,
    Id,
    UserId,
    HomeId,
    TotalTasksCompleted,
    TotalMinutesCleaned,
    CurrentStreak,
    LongestStreak,
    LastActivityDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Badges {
    Table,
    Id,
    Name,
    Description,
    Icon,
    Category,
    RequirementType,
    RequirementValue,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserBadges {
    Table,
    Id,
    UserId,
    BadgeId,
    EarnedAt,
}
