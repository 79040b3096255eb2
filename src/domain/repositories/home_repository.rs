// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::home::{Home, HomeMember};
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 家庭仓库特质
///
/// 家庭与成员关系的数据访问接口。创建家庭时同时写入
/// 所有者成员关系；邀请以令牌形式发出，兑换后绑定用户。
#[async_trait]
pub trait HomeRepository: Send + Sync {
    /// 创建家庭并登记所有者成员关系
    async fn create(&self, name: &str, owner_id: Uuid) -> Result<Home, RepositoryError>;
    /// 根据ID查找家庭
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Home>, RepositoryError>;
    /// 列出用户所属的全部家庭
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Home>, RepositoryError>;
    /// 查找用户在某家庭中的成员关系
    async fn find_membership(
        &self,
        home_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HomeMember>, RepositoryError>;
    /// 判断用户是否持有任意家庭成员关系（入门流程判定）
    async fn has_any_membership(&self, user_id: Uuid) -> Result<bool, RepositoryError>;
    /// 列出家庭全部成员
    async fn list_members(&self, home_id: Uuid) -> Result<Vec<HomeMember>, RepositoryError>;
    /// 创建邀请（user_id为空，持有令牌与受邀邮箱）
    async fn create_invite(
        &self,
        home_id: Uuid,
        invited_email: &str,
        invite_token: &str,
    ) -> Result<HomeMember, RepositoryError>;
    /// 根据令牌查找未兑换的邀请
    async fn find_invite(&self, invite_token: &str)
        -> Result<Option<HomeMember>, RepositoryError>;
    /// 兑换邀请：绑定用户并记录加入时间
    async fn redeem_invite(
        &self,
        invite_token: &str,
        user_id: Uuid,
    ) -> Result<HomeMember, RepositoryError>;
}
