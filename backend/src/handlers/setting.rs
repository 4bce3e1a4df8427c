//! Application settings handlers (staff only)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::setting::{AppSetting, UpdateSettingInput};
use crate::services::SettingService;
use crate::AppState;

/// List settings
pub async fn list_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<AppSetting>>> {
    user.require_admin()?;
    let settings = SettingService::new(state.db).list_settings().await?;
    Ok(Json(settings))
}

/// Change a setting's value
pub async fn update_setting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key): Path<String>,
    Json(input): Json<UpdateSettingInput>,
) -> AppResult<Json<AppSetting>> {
    user.require_admin()?;
    let setting = SettingService::new(state.db).update_setting(&key, input).await?;
    Ok(Json(setting))
}
