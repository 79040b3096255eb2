// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub use sea_orm_migration::prelude::*;

mod m20260112_initial_schema;
mod m20260114_create_indexes;
mod m20260119_add_billing_fields;
mod m20260123_create_push_subscriptions;
mod m20260125_create_notification_prefs;

/// 数据库迁移器
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// 获取所有迁移
    ///
    /// # 返回值
    ///
    /// 返回迁移列表
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260112_initial_schema::Migration),
            Box::new(m20260114_create_indexes::Migration),
            Box::new(m20260119_add_billing_fields::Migration),
            Box::new(m20260123_create_push_subscriptions::Migration),
            Box::new(m20260125_create_notification_prefs::Migration),
        ]
    }
}
