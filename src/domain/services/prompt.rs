// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::AnalysisPreferences;
use crate::domain::models::preferences::{CleaningStandard, DetailLevel};

/// 固定的五条分析规则加响应模式说明
///
/// 规则：只描述可见内容、标记不确定观察、要求具体而非泛泛、
/// 按视觉影响排序、给出符合实际的时间估算。
const BASE_RULES: &str = "Eres un asistente experto en limpieza y organización del hogar. Tu trabajo es analizar fotos de habitaciones e identificar qué necesita limpieza o atención, generando un plan de tareas práctico y accionable.

REGLAS IMPORTANTES:
1. Solo menciona lo que PUEDES VER en la imagen. No inventes problemas que no existen.
2. Si algo no está claro o no puedes verlo bien, marca \"uncertain: true\".
3. Sé específico: \"limpiar la mesa del comedor\" es mejor que \"limpiar superficies\".
4. Prioriza impacto visual: las tareas que más cambio visual generan van primero.
5. Estima tiempos realistas basados en el tamaño visible del espacio.
6. Las \"quick wins\" son tareas de 5 minutos o menos que generan un cambio inmediato.";

const RESPONSE_SCHEMA: &str = r#"DEBES responder SOLO con un JSON válido siguiendo exactamente este esquema:
{
  "room_guess": string | null,
  "room_confidence": number (0-100) | null,
  "observations": [
    {
      "description": string,
      "severity": "low" | "medium" | "high",
      "location": string | null,
      "uncertain": boolean
    }
  ],
  "tasks": [
    {
      "title": string,
      "description_steps": string[],
      "category": "order" | "dust" | "surfaces" | "floor" | "trash" | "laundry" | "kitchen" | "bathroom" | "general",
      "estimated_minutes": number,
      "difficulty": number (1-5),
      "priority": number (1-10, donde 1 es más prioritario),
      "supplies": string[],
      "safety_notes": string[],
      "assignable": boolean,
      "quick_win": boolean
    }
  ],
  "total_estimated_minutes": number,
  "suggested_recurring_tasks": [
    {
      "title": string,
      "category": string,
      "frequency_days": number,
      "reason": string
    }
  ],
  "before_score": number (0-100, donde 0 es muy sucio y 100 está impecable),
  "summary": string (resumen breve del estado general),
  "quick_wins_summary": string | null (si hay tareas rápidas, resumen de qué se puede hacer en 10 min)
}"#;

/// 组合系统指令
///
/// 将固定规则、详略与标准变体、用户限制、空间特征和房间提示
/// 拼接成单条系统提示词。限制与特征逐条原样写入；列表为空时
/// 整段省略。
///
/// # 参数
///
/// * `preferences` - 偏好快照
/// * `room_name` - 用户选择的房间名称（可选）
/// * `room_type` - 房间类型（可选，只有给出房间名称时才有意义）
///
/// # 返回值
///
/// 返回完整的系统提示词文本
pub fn build_system_prompt(
    preferences: &AnalysisPreferences,
    room_name: Option<&str>,
    room_type: Option<&str>,
) -> String {
    let detail_instructions = match preferences.detail_level {
        DetailLevel::Brief => "Genera descripciones muy cortas, 1-2 pasos por tarea máximo.",
        DetailLevel::Normal => "Genera descripciones claras con 2-4 pasos por tarea.",
        DetailLevel::Detailed => "Genera descripciones detalladas con todos los pasos necesarios.",
    };

    let standard_instructions = match preferences.cleaning_standard {
        CleaningStandard::Quick => {
            "Prioriza tareas rápidas y esenciales. Enfócate en lo más visible e impactante."
        }
        CleaningStandard::Deep => {
            "Incluye tareas de limpieza profunda y detallada, aunque tomen más tiempo."
        }
    };

    let restrictions_list = if preferences.restrictions.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nRestricciones del usuario (NO sugieras productos o métodos que las violen):\n{}",
            preferences
                .restrictions
                .iter()
                .map(|r| format!("- {}", r))
                .collect::<Vec<_>>()
                .join("\n")
        )
    };

    let sensitivity_list = if preferences.sensitivity_tags.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nCaracterísticas del espacio a considerar:\n{}",
            preferences
                .sensitivity_tags
                .iter()
                .map(|s| format!("- {}", s))
                .collect::<Vec<_>>()
                .join("\n")
        )
    };

    let room_context = match room_name {
        Some(name) => {
            let type_suffix = room_type
                .map(|t| format!(" (tipo: {})", t))
                .unwrap_or_default();
            format!(
                "El usuario ha indicado que esta es la habitación: {}{}.",
                name, type_suffix
            )
        }
        None => "El usuario no especificó qué habitación es. Intenta identificarla por los elementos visibles.".to_string(),
    };

    format!(
        "{}\n\n{}\n{}{}{}\n\n{}\n\n{}",
        BASE_RULES,
        detail_instructions,
        standard_instructions,
        restrictions_list,
        sensitivity_list,
        room_context,
        RESPONSE_SCHEMA
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(restrictions: Vec<&str>, tags: Vec<&str>) -> AnalysisPreferences {
        AnalysisPreferences {
            detail_level: DetailLevel::Brief,
            cleaning_standard: CleaningStandard::Quick,
            restrictions: restrictions.into_iter().map(String::from).collect(),
            sensitivity_tags: tags.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_restrictions_appear_verbatim() {
        let p = prefs(vec!["no usar lejía", "sin aerosoles"], vec![]);
        let prompt = build_system_prompt(&p, None, None);
        assert!(prompt.contains("- no usar lejía"));
        assert!(prompt.contains("- sin aerosoles"));
        assert!(prompt.contains("Restricciones del usuario"));
    }

    #[test]
    fn test_sensitivity_tags_appear_verbatim() {
        let p = prefs(vec![], vec!["suelo de madera", "mascotas"]);
        let prompt = build_system_prompt(&p, None, None);
        assert!(prompt.contains("- suelo de madera"));
        assert!(prompt.contains("- mascotas"));
        assert!(prompt.contains("Características del espacio"));
    }

    #[test]
    fn test_empty_lists_omit_sections_entirely() {
        let p = prefs(vec![], vec![]);
        let prompt = build_system_prompt(&p, None, None);
        assert!(!prompt.contains("Restricciones del usuario"));
        assert!(!prompt.contains("Características del espacio"));
    }

    #[test]
    fn test_room_hint_with_and_without_type() {
        let p = prefs(vec![], vec![]);

        let prompt = build_system_prompt(&p, Some("Cocina"), Some("kitchen"));
        assert!(prompt.contains("esta es la habitación: Cocina (tipo: kitchen)."));

        let prompt = build_system_prompt(&p, Some("Cocina"), None);
        assert!(prompt.contains("esta es la habitación: Cocina."));

        let prompt = build_system_prompt(&p, None, None);
        assert!(prompt.contains("no especificó qué habitación"));
    }

    #[test]
    fn test_detail_and_standard_variants() {
        let mut p = prefs(vec![], vec![]);
        p.detail_level = DetailLevel::Detailed;
        p.cleaning_standard = CleaningStandard::Deep;
        let prompt = build_system_prompt(&p, None, None);
        assert!(prompt.contains("descripciones detalladas"));
        assert!(prompt.contains("limpieza profunda"));

        p.detail_level = DetailLevel::Brief;
        p.cleaning_standard = CleaningStandard::Quick;
        let prompt = build_system_prompt(&p, None, None);
        assert!(prompt.contains("1-2 pasos por tarea"));
        assert!(prompt.contains("tareas rápidas y esenciales"));
    }
}
