//! Signed-in user profile

use axum::{extract::State, Json};
use shared::{Client, UserProfile};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::ClientService;
use crate::AppState;

/// Profile of the caller, with the bound client's name when there is one
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let company_name = match user.client_id {
        Some(client_id) => {
            let lookup = ClientService::new(state.db).get_client(client_id).await;
            company_name(lookup)?
        }
        None => None,
    };

    Ok(Json(UserProfile {
        id: user.user_id,
        email: user.email,
        role: user.role,
        client_id: user.client_id,
        company_name,
    }))
}

/// A binding to a since-deleted client leaves the name empty
fn company_name(lookup: AppResult<Client>) -> AppResult<Option<String>> {
    match lookup {
        Ok(client) => Ok(Some(client.name)),
        Err(AppError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn client(name: &str) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: name.to_string(),
            tax_id: None,
            email: None,
            phone: None,
            is_client: true,
            is_agency: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_company_name_from_bound_client() {
        let name = company_name(Ok(client("Textiles del Valle"))).unwrap();
        assert_eq!(name.as_deref(), Some("Textiles del Valle"));
    }

    #[test]
    fn test_deleted_client_gives_no_company_name() {
        let name = company_name(Err(AppError::NotFound("Client".to_string()))).unwrap();
        assert!(name.is_none());
    }

    #[test]
    fn test_other_lookup_errors_propagate() {
        let result = company_name(Err(AppError::Internal("pool closed".to_string())));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
