// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::models::stats::{DailyStats, UserStats};
use crate::domain::repositories::badge_repository::BadgeRepository;
use crate::domain::repositories::stats_repository::StatsRepository;
use crate::domain::repositories::task_repository::RepositoryError;

/// 对统计行应用一批完成事件
///
/// 纯函数：累加计数器并推进连续活跃天数。连续天数按日历日
/// 判定：
/// - 无历史活动：置为1
/// - 最近活动就在今天：不变（同日多次完成不重复累计）
/// - 与最近活动恰隔1天：加1
/// - 间隔超过1天：断签，重置为1
///
/// `longest_streak` 取历史最大值，单调不减。
pub fn apply_completion(
    mut stats: UserStats,
    today: NaiveDate,
    tasks_completed: i32,
    minutes_cleaned: i32,
) -> UserStats {
    stats.total_tasks_completed += tasks_completed;
    stats.total_minutes_cleaned += minutes_cleaned;

    match stats.last_activity_date {
        None => {
            stats.current_streak = 1;
            stats.last_activity_date = Some(today);
        }
        Some(last) if last == today => {
            // Same day: streak and activity date untouched
        }
        Some(last) => {
            let gap = (today - last).num_days();
            if gap == 1 {
                stats.current_streak += 1;
                stats.last_activity_date = Some(today);
            } else if gap > 1 {
                stats.current_streak = 1;
                stats.last_activity_date = Some(today);
            }
            // gap < 0 means a client clock ran ahead of us once; ignore
        }
    }

    stats.longest_streak = stats.longest_streak.max(stats.current_streak);
    stats.updated_at = Utc::now().into();
    stats
}

/// 进度统计服务
///
/// 维护每个用户在每个家庭中的累计计数与连续活跃天数，
/// 并在阈值达成时授予徽章。单日历史聚合按需从事件日志派生。
pub struct StatsService {
    stats_repo: Arc<dyn StatsRepository>,
    badge_repo: Arc<dyn BadgeRepository>,
}

impl StatsService {
    /// 创建进度统计服务
    pub fn new(stats_repo: Arc<dyn StatsRepository>, badge_repo: Arc<dyn BadgeRepository>) -> Self {
        Self {
            stats_repo,
            badge_repo,
        }
    }

    /// 记录一次或多次任务完成
    ///
    /// 耗时取调用方提供的实际分钟数（未提供时调用方应回退到
    /// 估算值再传入）。写回统计行后检查并授予新达成的徽章。
    ///
    /// # 参数
    ///
    /// * `user_id` - 用户ID
    /// * `home_id` - 家庭ID
    /// * `tasks_completed` - 本次完成的任务数
    /// * `minutes_cleaned` - 本次清洁分钟数
    ///
    /// # 返回值
    ///
    /// * `Ok(UserStats)` - 更新后的统计行
    /// * `Err(RepositoryError)` - 数据访问错误
    pub async fn record_completion(
        &self,
        user_id: Uuid,
        home_id: Uuid,
        tasks_completed: i32,
        minutes_cleaned: i32,
    ) -> Result<UserStats, RepositoryError> {
        let stats = self.stats_repo.find_or_create(user_id, home_id).await?;
        let today = Utc::now().date_naive();
        let stats = apply_completion(stats, today, tasks_completed, minutes_cleaned);
        let stats = self.stats_repo.update(&stats).await?;

        self.award_new_badges(&stats).await?;

        Ok(stats)
    }

    /// 最近30天的单日聚合历史
    pub async fn daily_history(&self, user_id: Uuid) -> Result<Vec<DailyStats>, RepositoryError> {
        let since = Utc::now().date_naive() - Duration::days(30);
        self.stats_repo.daily_stats(user_id, since).await
    }

    /// 授予所有新达成的徽章
    ///
    /// 授予是幂等的，重复检查不会重复写入
    async fn award_new_badges(&self, stats: &UserStats) -> Result<(), RepositoryError> {
        let badges = self.badge_repo.list_all().await?;
        let earned = self.badge_repo.list_for_user(stats.user_id).await?;

        for badge in badges {
            if earned.iter().any(|ub| ub.badge_id == badge.id) {
                continue;
            }
            if badge.is_met(
                stats.total_tasks_completed,
                stats.total_minutes_cleaned,
                stats.current_streak,
            ) {
                info!(badge = %badge.name, user = %stats.user_id, "Badge earned");
                self.badge_repo.grant(stats.user_id, badge.id).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_stats() -> UserStats {
        UserStats {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            home_id: Uuid::new_v4(),
            total_tasks_completed: 0,
            total_minutes_cleaned: 0,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_completion_starts_streak_at_one() {
        let stats = apply_completion(fresh_stats(), day("2026-03-10"), 1, 15);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.last_activity_date, Some(day("2026-03-10")));
        assert_eq!(stats.total_tasks_completed, 1);
        assert_eq!(stats.total_minutes_cleaned, 15);
    }

    #[test]
    fn test_consecutive_day_increments_streak() {
        let stats = apply_completion(fresh_stats(), day("2026-03-10"), 1, 10);
        let streak_after_first = stats.current_streak;
        let stats = apply_completion(stats, day("2026-03-11"), 1, 10);
        assert_eq!(stats.current_streak, streak_after_first + 1);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_same_day_completions_are_idempotent_for_streak() {
        let stats = apply_completion(fresh_stats(), day("2026-03-10"), 1, 10);
        let stats = apply_completion(stats, day("2026-03-10"), 2, 30);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.last_activity_date, Some(day("2026-03-10")));
        // Counters still accumulate
        assert_eq!(stats.total_tasks_completed, 3);
        assert_eq!(stats.total_minutes_cleaned, 40);
    }

    #[test]
    fn test_gap_of_two_days_resets_streak_to_one() {
        let mut stats = apply_completion(fresh_stats(), day("2026-03-10"), 1, 10);
        stats = apply_completion(stats, day("2026-03-11"), 1, 10);
        stats = apply_completion(stats, day("2026-03-12"), 1, 10);
        assert_eq!(stats.current_streak, 3);

        let stats = apply_completion(stats, day("2026-03-14"), 1, 10);
        assert_eq!(stats.current_streak, 1);
        // Broken streak never erodes the record
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn test_longest_streak_never_decreases() {
        let mut stats = fresh_stats();
        let days = [
            "2026-03-01",
            "2026-03-02",
            "2026-03-03",
            "2026-03-07",
            "2026-03-08",
            "2026-03-20",
        ];
        let mut longest_seen = 0;
        for d in days {
            stats = apply_completion(stats, day(d), 1, 5);
            assert!(stats.longest_streak >= longest_seen);
            assert!(stats.longest_streak >= stats.current_streak);
            longest_seen = stats.longest_streak;
        }
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_streak_is_never_zero_after_activity() {
        let mut stats = fresh_stats();
        for d in ["2026-01-01", "2026-02-01", "2026-03-01"] {
            stats = apply_completion(stats, day(d), 1, 5);
            assert_eq!(stats.current_streak, 1);
        }
    }
}
