// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

/// 通知偏好表迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationPrefs::Table)
                    .if_not_exists()
                    .col({
                        let mut col = ColumnDef::new(NotificationPrefs::Id);
                        col.uuid().not_null().primary_key();
                        if manager.get_database_backend() == DbBackend::Postgres {
                            col.default(Expr::cust("gen_random_uuid()"));
                        }
                        col
                    })
                    .col(
                        ColumnDef::new(NotificationPrefs::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::DailyReminder)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::DailyReminderTime)
                            .string()
                            .not_null()
                            .default("09:00"),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::DueReminders)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::AchievementNotifications)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::QuietHoursStart)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::QuietHoursEnd)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(NotificationPrefs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(NotificationPrefs::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum NotificationPrefs {
    Table,
    Id,
    UserId,
    DailyReminder,
    DailyReminderTime,
    DueReminders,
    AchievementNotifications,
    QuietHoursStart,
    QuietHoursEnd,
    CreatedAt,
    UpdatedAt,
}
