//! Application settings stored as key/value rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Setting service over the `app_configuration` table
#[derive(Clone)]
pub struct SettingService {
    db: PgPool,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AppSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Input for changing a setting's value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingInput {
    #[validate(length(max = 2000))]
    pub value: String,
}

impl SettingService {
    /// Create a new SettingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All settings by key
    pub async fn list_settings(&self) -> AppResult<Vec<AppSetting>> {
        let settings = sqlx::query_as::<_, AppSetting>(
            "SELECT key, value, description, updated_at FROM app_configuration ORDER BY key",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(settings)
    }

    /// Change the value of an existing setting
    pub async fn update_setting(&self, key: &str, input: UpdateSettingInput) -> AppResult<AppSetting> {
        input.validate()?;

        let setting = sqlx::query_as::<_, AppSetting>(
            r#"
            UPDATE app_configuration
            SET value = $2, updated_at = NOW()
            WHERE key = $1
            RETURNING key, value, description, updated_at
            "#,
        )
        .bind(key)
        .bind(input.value.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Setting '{}'", key)))?;

        tracing::info!(key = %setting.key, "setting updated");
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_length_limit() {
        let ok = UpdateSettingInput { value: "DO".to_string() };
        assert!(ok.validate().is_ok());

        let too_long = UpdateSettingInput { value: "9".repeat(2001) };
        assert!(too_long.validate().is_err());
    }
}
