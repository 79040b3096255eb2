// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use tracing::warn;

use crate::domain::models::analysis::{
    Observation, ProposedTask, RecurringSuggestion, RoomAnalysis,
};
use crate::domain::models::task::TaskCategory;

/// 模式校验错误
///
/// 记录首个不满足约定模式的字段及原因。该错误从不逃出分析
/// 服务：校验失败立即进入修复路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// 出错字段路径
    pub field: String,
    /// 违规说明
    pub reason: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// 严格校验模型返回的JSON对象
///
/// 字段名、枚举成员与数值范围都必须符合约定：
/// `difficulty ∈ [1,5]`、`priority ∈ [1,10]`、
/// `estimated_minutes ∈ [1,120]`、`room_confidence ∈ [0,100]`、
/// `before_score ∈ [0,100]`。
///
/// # 返回值
///
/// * `Ok(RoomAnalysis)` - 类型化的分析结果
/// * `Err(SchemaViolation)` - 首个违规字段
pub fn validate(raw: &Value) -> Result<RoomAnalysis, SchemaViolation> {
    let analysis: RoomAnalysis =
        serde_json::from_value(raw.clone()).map_err(|e| SchemaViolation {
            field: "$".to_string(),
            reason: e.to_string(),
        })?;

    if let Some(confidence) = analysis.room_confidence {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(SchemaViolation {
                field: "room_confidence".to_string(),
                reason: format!("out of range: {}", confidence),
            });
        }
    }

    if !(0..=100).contains(&analysis.before_score) {
        return Err(SchemaViolation {
            field: "before_score".to_string(),
            reason: format!("out of range: {}", analysis.before_score),
        });
    }

    for (i, task) in analysis.tasks.iter().enumerate() {
        if !(1..=120).contains(&task.estimated_minutes) {
            return Err(SchemaViolation {
                field: format!("tasks[{}].estimated_minutes", i),
                reason: format!("out of range: {}", task.estimated_minutes),
            });
        }
        if !(1..=5).contains(&task.difficulty) {
            return Err(SchemaViolation {
                field: format!("tasks[{}].difficulty", i),
                reason: format!("out of range: {}", task.difficulty),
            });
        }
        if !(1..=10).contains(&task.priority) {
            return Err(SchemaViolation {
                field: format!("tasks[{}].priority", i),
                reason: format!("out of range: {}", task.priority),
            });
        }
    }

    Ok(analysis)
}

/// 以缺省值修复不合模式的分析结果
///
/// 纯函数：从原始对象逐字段取值，缺失或类型不符时替换为
/// 约定缺省值，保证调用方总能得到结构完整的结果而不是错误。
/// 代价是畸形输出被静默降级。此函数对任意JSON输入都不会失败。
pub fn repair(raw: &Value) -> RoomAnalysis {
    let tasks = raw
        .get("tasks")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(repair_task).collect())
        .unwrap_or_default();

    let observations = raw
        .get("observations")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|o| serde_json::from_value::<Observation>(o.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let suggested_recurring_tasks = raw
        .get("suggested_recurring_tasks")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|s| serde_json::from_value::<RecurringSuggestion>(s.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    RoomAnalysis {
        room_guess: non_empty_str(raw.get("room_guess")),
        room_confidence: number(raw.get("room_confidence")),
        observations,
        tasks,
        total_estimated_minutes: integer_or(raw.get("total_estimated_minutes"), 30),
        suggested_recurring_tasks,
        before_score: integer_or(raw.get("before_score"), 50),
        summary: non_empty_str(raw.get("summary"))
            .unwrap_or_else(|| "Análisis completado".to_string()),
        quick_wins_summary: non_empty_str(raw.get("quick_wins_summary")),
    }
}

/// 校验，失败则修复
///
/// 分析服务的入口：合规结果原样返回，不合规结果记录警告
/// 后走缺省修复。此路径不会向调用方传播错误。
pub fn validate_or_repair(raw: &Value) -> RoomAnalysis {
    match validate(raw) {
        Ok(analysis) => analysis,
        Err(violation) => {
            warn!("Schema validation failed, repairing response: {}", violation);
            repair(raw)
        }
    }
}

fn repair_task(raw: &Value) -> ProposedTask {
    ProposedTask {
        title: non_empty_str(raw.get("title")).unwrap_or_else(|| "Tarea".to_string()),
        description_steps: string_vec(raw.get("description_steps")),
        category: raw
            .get("category")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<TaskCategory>().ok())
            .unwrap_or_default(),
        estimated_minutes: integer_or(raw.get("estimated_minutes"), 5),
        difficulty: integer_or(raw.get("difficulty"), 3),
        priority: integer_or(raw.get("priority"), 5),
        supplies: string_vec(raw.get("supplies")),
        safety_notes: string_vec(raw.get("safety_notes")),
        // assignable defaults to true unless the model said false explicitly
        assignable: raw.get("assignable").and_then(Value::as_bool) != Some(false),
        quick_win: raw.get("quick_win").and_then(Value::as_bool) == Some(true),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| *v != 0.0)
}

fn integer_or(value: Option<&Value>, default: i64) -> i64 {
    value
        .and_then(Value::as_i64)
        .filter(|v| *v != 0)
        .unwrap_or(default)
}

fn string_vec(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::analysis::Severity;
    use serde_json::json;

    fn valid_response() -> Value {
        json!({
            "room_guess": "Cocina",
            "room_confidence": 85,
            "observations": [
                {
                    "description": "Platos sucios en el fregadero",
                    "severity": "high",
                    "location": "fregadero",
                    "uncertain": false
                }
            ],
            "tasks": [
                {
                    "title": "Lavar los platos",
                    "description_steps": ["Apilar", "Fregar", "Secar"],
                    "category": "kitchen",
                    "estimated_minutes": 15,
                    "difficulty": 2,
                    "priority": 1,
                    "supplies": ["jabón"],
                    "safety_notes": [],
                    "assignable": true,
                    "quick_win": false
                }
            ],
            "total_estimated_minutes": 15,
            "suggested_recurring_tasks": [],
            "before_score": 40,
            "summary": "La cocina necesita atención",
            "quick_wins_summary": "Lava los platos primero"
        })
    }

    #[test]
    fn test_validate_accepts_conforming_response() {
        let analysis = validate(&valid_response()).unwrap();
        assert_eq!(analysis.room_guess.as_deref(), Some("Cocina"));
        assert_eq!(analysis.tasks.len(), 1);
        assert_eq!(analysis.observations[0].severity, Severity::High);
    }

    #[test]
    fn test_validate_applies_collection_defaults() {
        // 缺 supplies / safety_notes 的任务在校验路径下得到空列表，
        // 其余字段原样保留
        let mut raw = valid_response();
        let task = &mut raw["tasks"][0];
        task.as_object_mut().unwrap().remove("supplies");
        task.as_object_mut().unwrap().remove("safety_notes");

        let analysis = validate(&raw).unwrap();
        assert!(analysis.tasks[0].supplies.is_empty());
        assert!(analysis.tasks[0].safety_notes.is_empty());
        assert_eq!(analysis.tasks[0].title, "Lavar los platos");
        assert_eq!(analysis.tasks[0].estimated_minutes, 15);
    }

    #[test]
    fn test_validate_rejects_out_of_range_numbers() {
        let mut raw = valid_response();
        raw["tasks"][0]["difficulty"] = json!(6);
        assert!(validate(&raw).is_err());

        let mut raw = valid_response();
        raw["tasks"][0]["priority"] = json!(0);
        assert!(validate(&raw).is_err());

        let mut raw = valid_response();
        raw["tasks"][0]["estimated_minutes"] = json!(200);
        assert!(validate(&raw).is_err());

        let mut raw = valid_response();
        raw["before_score"] = json!(150);
        assert!(validate(&raw).is_err());

        let mut raw = valid_response();
        raw["room_confidence"] = json!(-5);
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_enum_members() {
        let mut raw = valid_response();
        raw["tasks"][0]["category"] = json!("garage");
        assert!(validate(&raw).is_err());

        let mut raw = valid_response();
        raw["observations"][0]["severity"] = json!("catastrophic");
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn test_repair_of_empty_object_yields_documented_defaults() {
        let analysis = repair(&json!({}));
        assert_eq!(analysis.room_guess, None);
        assert_eq!(analysis.room_confidence, None);
        assert!(analysis.observations.is_empty());
        assert!(analysis.tasks.is_empty());
        assert_eq!(analysis.total_estimated_minutes, 30);
        assert!(analysis.suggested_recurring_tasks.is_empty());
        assert_eq!(analysis.before_score, 50);
        assert_eq!(analysis.summary, "Análisis completado");
        assert_eq!(analysis.quick_wins_summary, None);
    }

    #[test]
    fn test_repair_fills_task_defaults_and_keeps_present_fields() {
        let raw = json!({
            "tasks": [
                {
                    "title": "Barrer el suelo",
                    "category": "floor",
                    "estimated_minutes": 12
                }
            ],
            "before_score": 60,
            "summary": "Bastante ordenado"
        });

        let analysis = repair(&raw);
        assert_eq!(analysis.tasks.len(), 1);
        let task = &analysis.tasks[0];
        assert_eq!(task.title, "Barrer el suelo");
        assert_eq!(task.category, TaskCategory::Floor);
        assert_eq!(task.estimated_minutes, 12);
        assert_eq!(task.difficulty, 3);
        assert_eq!(task.priority, 5);
        assert!(task.supplies.is_empty());
        assert!(task.safety_notes.is_empty());
        assert!(task.assignable);
        assert!(!task.quick_win);
        assert_eq!(analysis.before_score, 60);
        assert_eq!(analysis.summary, "Bastante ordenado");
    }

    #[test]
    fn test_repair_assignable_only_false_when_explicit() {
        let raw = json!({ "tasks": [ { "assignable": false }, { "assignable": "yes" }, {} ] });
        let analysis = repair(&raw);
        assert!(!analysis.tasks[0].assignable);
        assert!(analysis.tasks[1].assignable);
        assert!(analysis.tasks[2].assignable);
        assert_eq!(analysis.tasks[0].title, "Tarea");
    }

    #[test]
    fn test_repair_replaces_wrong_types() {
        let raw = json!({
            "room_guess": 42,
            "room_confidence": "high",
            "observations": "none",
            "tasks": [
                {
                    "title": ["not", "a", "string"],
                    "category": "spaceship",
                    "estimated_minutes": "quince",
                    "difficulty": null,
                    "priority": {},
                    "supplies": "mop"
                }
            ],
            "total_estimated_minutes": "mucho",
            "before_score": false,
            "summary": 7,
            "quick_wins_summary": []
        });

        let analysis = repair(&raw);
        assert_eq!(analysis.room_guess, None);
        assert_eq!(analysis.room_confidence, None);
        assert!(analysis.observations.is_empty());
        let task = &analysis.tasks[0];
        assert_eq!(task.title, "Tarea");
        assert_eq!(task.category, TaskCategory::General);
        assert_eq!(task.estimated_minutes, 5);
        assert_eq!(task.difficulty, 3);
        assert_eq!(task.priority, 5);
        assert!(task.supplies.is_empty());
        assert_eq!(analysis.total_estimated_minutes, 30);
        assert_eq!(analysis.before_score, 50);
        assert_eq!(analysis.summary, "Análisis completado");
        assert_eq!(analysis.quick_wins_summary, None);
    }

    #[test]
    fn test_repair_drops_malformed_observations_keeps_valid() {
        let raw = json!({
            "observations": [
                { "description": "Polvo en estantes", "severity": "low" },
                { "description": "???", "severity": "impossible" },
                "not an object"
            ]
        });
        let analysis = repair(&raw);
        assert_eq!(analysis.observations.len(), 1);
        assert_eq!(analysis.observations[0].description, "Polvo en estantes");
        assert_eq!(analysis.observations[0].severity, Severity::Low);
        assert!(!analysis.observations[0].uncertain);
    }

    #[test]
    fn test_repair_never_panics_on_arbitrary_values() {
        for raw in [
            json!(null),
            json!("just a string"),
            json!(12345),
            json!([1, 2, 3]),
            json!({ "tasks": 17 }),
            json!({ "tasks": [null, 3, "x"] }),
        ] {
            let analysis = repair(&raw);
            assert_eq!(analysis.summary, "Análisis completado");
        }
    }

    #[test]
    fn test_validate_or_repair_prefers_validation() {
        let analysis = validate_or_repair(&valid_response());
        assert_eq!(analysis.room_guess.as_deref(), Some("Cocina"));

        let mut raw = valid_response();
        raw["tasks"][0]["difficulty"] = json!(99);
        let analysis = validate_or_repair(&raw);
        // 修复路径保留合规字段，替换违规字段
        assert_eq!(analysis.tasks[0].title, "Lavar los platos");
        assert_eq!(analysis.tasks[0].difficulty, 3);
    }
}
