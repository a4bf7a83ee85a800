//! Command surface for the login page and header menu.

use serde::Serialize;

use crate::context::MonitorContext;
use crate::models::{Session, UserType};

use super::LoginError;

pub const LOGIN_FAILED_NOTICE: &str = "Login failed. Please check your credentials.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: Option<Session>,
    pub error: Option<String>,
    /// Toast text shown after the attempt.
    pub notification: String,
}

pub async fn login(
    ctx: &MonitorContext,
    email: String,
    password: String,
    user_type: UserType,
) -> LoginResponse {
    match ctx.sessions().login(&email, &password, user_type).await {
        Ok(session) => LoginResponse {
            success: true,
            notification: format!("Welcome back, {}!", session.name),
            user: Some(session),
            error: None,
        },
        Err(err) => {
            let error = match err.downcast_ref::<LoginError>() {
                Some(login_error) => login_error.to_string(),
                None => format!("{err:#}"),
            };
            LoginResponse {
                success: false,
                user: None,
                error: Some(error),
                notification: LOGIN_FAILED_NOTICE.to_string(),
            }
        }
    }
}

pub async fn logout(ctx: &MonitorContext) -> Result<(), String> {
    ctx.sessions().logout().await.map_err(|e| e.to_string())
}

pub fn get_current_user(ctx: &MonitorContext) -> Option<Session> {
    ctx.sessions().current_session()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn login_reports_welcome_notice() {
        let dir = tempdir().unwrap();
        let ctx = MonitorContext::create(dir.path()).await.unwrap();

        let response = login(&ctx, "a@b.com".into(), "pw".into(), UserType::Admin).await;
        assert!(response.success);
        assert_eq!(response.notification, "Welcome back, Admin User!");
        assert_eq!(get_current_user(&ctx).unwrap().user_type, UserType::Admin);

        logout(&ctx).await.unwrap();
        assert!(get_current_user(&ctx).is_none());
    }

    #[tokio::test]
    async fn strict_policy_failure_is_reported_not_raised() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"require_credentials": true}"#,
        )
        .unwrap();
        let ctx = MonitorContext::create(dir.path()).await.unwrap();

        let response = login(&ctx, "".into(), "".into(), UserType::Caregiver).await;
        assert!(!response.success);
        assert!(response.user.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("email and password are required")
        );
        assert_eq!(response.notification, LOGIN_FAILED_NOTICE);
    }
}
