// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index for tasks: plan ordering is the hot read path
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_plan_sort_order")
                    .table(Tasks::Table)
                    .col(Tasks::PlanId)
                    .col(Tasks::SortOrder)
                    .to_owned(),
            )
            .await?;

        // Index for task_events: streak/stats recomputation scans by user and time
        manager
            .create_index(
                Index::create()
                    .name("idx_task_events_user_type_created_at")
                    .table(TaskEvents::Table)
                    .col(TaskEvents::UserId)
                    .col(TaskEvents::EventType)
                    .col(TaskEvents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // One stats row per (user, home)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_stats_user_home")
                    .table(UserStats::Table)
                    .col(UserStats::UserId)
                    .col(UserStats::HomeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One preferences row per (user, home)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_preferences_user_home")
                    .table(UserPreferences::Table)
                    .col(UserPreferences::UserId)
                    .col(UserPreferences::HomeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Invite tokens are looked up on redemption
        manager
            .create_index(
                Index::create()
                    .name("idx_home_members_invite_token")
                    .table(HomeMembers::Table)
                    .col(HomeMembers::InviteToken)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_home_members_user")
                    .table(HomeMembers::Table)
                    .col(HomeMembers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_tasks_plan_sort_order",
            "idx_task_events_user_type_created_at",
            "idx_user_stats_user_home",
            "idx_user_preferences_user_home",
            "idx_home_members_invite_token",
            "idx_home_members_user",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    PlanId,
    SortOrder,
}

#[derive(DeriveIden)]
enum TaskEvents {
    Table,
    UserId,
    EventType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserStats {
    Table,
    UserId,
    HomeId,
}

#[derive(DeriveIden)]
enum UserPreferences {
    Table,
    UserId,
    HomeId,
}

#[derive(DeriveIden)]
enum HomeMembers {
    Table,
    UserId,
    InviteToken,
}
