use serde::{Deserialize, Serialize};

use super::{require_id, require_text, Validate};
use crate::error::ApiError;

/// POST /manage/color/add
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewColor {
    pub color: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub create_time: Option<String>,
}

impl Validate for NewColor {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("color", &self.color)?;
        validate_status(self.status)
    }
}

/// PUT /manage/color/update. An absent status leaves the stored one alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorUpdate {
    pub id: i64,
    pub color: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
}

impl Validate for ColorUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        require_id(self.id)?;
        require_text("color", &self.color)?;
        validate_status(self.status)
    }
}

/// PUT /manage/color/setColor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveColor {
    pub id: i64,
}

impl Validate for ActiveColor {
    fn validate(&self) -> Result<(), ApiError> {
        require_id(self.id)
    }
}

fn validate_status(status: Option<i64>) -> Result<(), ApiError> {
    match status {
        None | Some(0) | Some(1) => Ok(()),
        Some(other) => Err(ApiError::validation(format!("status must be 0 or 1, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn color_is_required() {
        let color: NewColor = serde_json::from_value(json!({ "color": " " })).unwrap();
        assert!(color.validate().is_err());
        let color: NewColor = serde_json::from_value(json!({ "color": "#00ff00" })).unwrap();
        assert!(color.validate().is_ok());
        assert_eq!(color.status, None);
    }

    #[test]
    fn status_is_a_flag() {
        let update: ColorUpdate = serde_json::from_value(json!({ "id": 1, "color": "#000", "status": 2 })).unwrap();
        assert!(update.validate().is_err());
    }
}
