// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 家庭实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Home {
    /// 家庭唯一标识符
    pub id: Uuid,
    /// 家庭名称
    pub name: String,
    /// 所有者用户ID
    pub owner_id: Uuid,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 家庭成员关系
///
/// 通过邀请令牌加入：创建时 `user_id` 为空，持有
/// `invited_email` 与 `invite_token`；被邀请者兑换令牌后
/// 填入 `user_id` 与 `joined_at`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeMember {
    /// 成员关系唯一标识符
    pub id: Uuid,
    /// 家庭ID
    pub home_id: Uuid,
    /// 用户ID，邀请未兑换前为空
    pub user_id: Option<Uuid>,
    /// 成员角色
    pub role: MemberRole,
    /// 被邀请邮箱
    pub invited_email: Option<String>,
    /// 邀请令牌
    pub invite_token: Option<String>,
    /// 加入时间
    pub joined_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

/// 成员角色枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// 所有者
    Owner,
    /// 普通成员
    #[default]
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemberRole::Owner => write!(f, "owner"),
            MemberRole::Member => write!(f, "member"),
        }
    }
}

impl FromStr for MemberRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(MemberRole::Owner),
            "member" => Ok(MemberRole::Member),
            _ => Err(()),
        }
    }
}
