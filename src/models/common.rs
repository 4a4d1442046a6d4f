use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// 变更类接口的通用返回体
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// `{ "isActive": bool }`，各实体的启用/停用请求体都包在实体名下
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUpdate {
    pub is_active: bool,
}

/// 下拉选择框只需要 id 和名称
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NameOnly {
    pub id: i64,
    pub name: String,
}

/// 必填字符串：缺失或全空白都视为未填写
pub fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled() {
        assert_eq!(filled(&Some(" shoes ".to_string())), Some("shoes"));
        assert_eq!(filled(&Some("   ".to_string())), None);
        assert_eq!(filled(&None), None);
    }
}
