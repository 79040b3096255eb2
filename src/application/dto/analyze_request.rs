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

use serde::{Deserialize, Serialize};

use crate::domain::models::analysis::AnalysisPreferences;
use crate::domain::models::preferences::{CleaningStandard, DetailLevel};

/// 图片分析请求数据传输对象
///
/// 客户端在上传前已压缩图片（原图上限10MB，宽度缩到1200像素
/// 以内，重编码为0.8质量的JPEG），这里收到的是base64文本
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequestDto {
    /// base64编码的JPEG图片
    pub image_base64: String,
    /// 用户选择的房间名称
    pub selected_room: Option<String>,
    /// 房间类型
    pub room_type: Option<String>,
    /// 偏好快照
    pub preferences: AnalyzePreferencesDto,
}

/// 分析偏好数据传输对象
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePreferencesDto {
    /// 详略程度
    pub detail_level: DetailLevel,
    /// 清洁标准
    pub cleaning_standard: CleaningStandard,
    /// 限制清单
    #[serde(default)]
    pub restrictions: Vec<String>,
    /// 空间敏感特征
    #[serde(default)]
    pub sensitivity_tags: Vec<String>,
}

impl From<AnalyzePreferencesDto> for AnalysisPreferences {
    fn from(dto: AnalyzePreferencesDto) -> Self {
        AnalysisPreferences {
            detail_level: dto.detail_level,
            cleaning_standard: dto.cleaning_standard,
            restrictions: dto.restrictions,
            sensitivity_tags: dto.sensitivity_tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_camel_case_request() {
        let body = r#"{
            "imageBase64": "aW1hZ2Vu",
            "selectedRoom": "Cocina",
            "roomType": "kitchen",
            "preferences": {
                "detailLevel": "brief",
                "cleaningStandard": "deep",
                "restrictions": ["sin lejía"],
                "sensitivityTags": ["mascotas"]
            }
        }"#;
        let dto: AnalyzeRequestDto = serde_json::from_str(body).unwrap();
        assert_eq!(dto.selected_room.as_deref(), Some("Cocina"));
        assert_eq!(dto.preferences.detail_level, DetailLevel::Brief);
        assert_eq!(dto.preferences.cleaning_standard, CleaningStandard::Deep);
        assert_eq!(dto.preferences.restrictions, vec!["sin lejía"]);
    }

    #[test]
    fn test_preference_lists_default_to_empty() {
        let body = r#"{
            "imageBase64": "aW1hZ2Vu",
            "selectedRoom": null,
            "roomType": null,
            "preferences": { "detailLevel": "normal", "cleaningStandard": "quick" }
        }"#;
        let dto: AnalyzeRequestDto = serde_json::from_str(body).unwrap();
        assert!(dto.preferences.restrictions.is_empty());
        assert!(dto.preferences.sensitivity_tags.is_empty());
    }
}
