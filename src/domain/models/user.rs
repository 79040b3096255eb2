// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 用户档案实体
///
/// 用户身份由外部身份提供商持有，本地行镜像其ID与邮箱，
/// 并附加订阅与免费额度信息。`scans_this_month` 在计划被
/// 接受时递增；`last_scan_reset` 字段存在但目前没有任何
/// 代码路径推进它，重置节奏有意保持未定义。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// 用户ID（与身份提供商一致）
    pub id: Uuid,
    /// 邮箱
    pub email: String,
    /// 全名
    pub full_name: Option<String>,
    /// 头像URL
    pub avatar_url: Option<String>,
    /// 订阅档位
    pub subscription_tier: SubscriptionTier,
    /// 订阅状态
    pub subscription_status: Option<SubscriptionStatus>,
    /// 计费提供商侧的客户ID
    pub billing_customer_id: Option<String>,
    /// 试用结束时间
    pub trial_ends_at: Option<DateTime<FixedOffset>>,
    /// 本月已用扫描次数
    pub scans_this_month: i32,
    /// 上次额度重置日期
    pub last_scan_reset: NaiveDate,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 订阅档位枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// 免费档，扫描次数受月度额度限制
    #[default]
    Free,
    /// 高级档，无扫描限制
    Premium,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionTier::Free => write!(f, "free"),
            SubscriptionTier::Premium => write!(f, "premium"),
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionTier::Free),
            "premium" => Ok(SubscriptionTier::Premium),
            _ => Err(()),
        }
    }
}

/// 订阅状态枚举
///
/// 与计费提供商的订阅生命周期状态一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// 生效中
    Active,
    /// 试用中
    Trialing,
    /// 逾期未付
    PastDue,
    /// 已取消
    Cancelled,
    /// 未完成
    Incomplete,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Trialing => write!(f, "trialing"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::Incomplete => write!(f, "incomplete"),
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "canceled" => Ok(SubscriptionStatus::Cancelled),
            "incomplete" => Ok(SubscriptionStatus::Incomplete),
            _ => Err(()),
        }
    }
}

impl SubscriptionStatus {
    /// 判断该状态是否对应高级档位
    ///
    /// 计费提供商的 active / trialing 状态视为高级，其余回落到免费档
    pub fn grants_premium(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        )
    }
}
