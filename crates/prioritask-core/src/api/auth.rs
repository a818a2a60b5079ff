//! Login, registration and logout.

use tracing::info;

use crate::client::{ApiClient, LOGIN_PATH, REGISTER_PATH, SessionEvent};
use crate::error::{Error, Result};
use crate::types::{Credentials, NewUser, TokenResponse, User};
use crate::validation;

impl ApiClient {
    /// Log in and store the returned access token.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        validation::email(&credentials.email)?;
        validation::password(&credentials.password)?;

        let token: TokenResponse = self.post(LOGIN_PATH, credentials).await?;
        if token.access_token.is_empty() {
            return Err(Error::Decode("login response has an empty access_token".into()));
        }

        self.session().set_token(&token.access_token)?;
        info!(email = %credentials.email, "Logged in");
        self.emit(SessionEvent::LoggedIn);
        Ok(token)
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, user: &NewUser) -> Result<User> {
        validation::new_user(user)?;
        self.post(REGISTER_PATH, user).await
    }

    /// The user the stored token belongs to.
    pub async fn current_user(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    /// Forget the access token. The selected room is kept.
    pub fn logout(&self) -> Result<()> {
        self.session().clear_token()?;
        info!("Logged out");
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crate::client::SessionEvent;
    use crate::error::Error;
    use crate::session::SessionStore;
    use crate::test_support::MockBackend;
    use crate::types::{Credentials, NewUser};

    fn credentials() -> Credentials {
        Credentials {
            email: "ana@example.com".into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_login_stores_token_and_emits_event() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/login",
            200,
            json!({ "access_token": "tok-1", "token_type": "bearer" }),
        );
        let (client, store) = backend.client(None);
        let mut events = client.subscribe();

        let token = client.login(&credentials()).await.unwrap();

        assert_eq!(token.access_token, "tok-1");
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);

        let sent = backend.requests_to("/auth/login");
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].body,
            Some(json!({ "email": "ana@example.com", "password": "secret" }))
        );
    }

    #[tokio::test]
    async fn test_rejected_login_never_refreshes() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/login",
            401,
            json!({ "detail": "Credenciales inválidas" }),
        );
        let (client, store) = backend.client(Some("old"));

        let err = client.login(&credentials()).await.unwrap_err();

        assert!(err.is_auth_failure());
        assert_eq!(err.user_message("Error al iniciar sesión"), "Credenciales inválidas");
        assert_eq!(backend.refresh_calls(), 0);
        // A failed login leaves the previous session alone.
        assert_eq!(store.token().unwrap().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_login_validates_before_sending() {
        let backend = MockBackend::start().await;
        let (client, _) = backend.client(None);

        let err = client
            .login(&Credentials {
                email: "not-an-email".into(),
                password: "x".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(backend.requests_to("/auth/login").is_empty());
    }

    #[tokio::test]
    async fn test_register_sends_nombre() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/register",
            201,
            json!({ "id": "u-1", "email": "ana@example.com", "nombre": "Ana", "is_active": true }),
        );
        let (client, store) = backend.client(None);

        let user = client
            .register(&NewUser {
                nombre: "Ana".into(),
                email: "ana@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, "u-1");
        assert_eq!(store.token().unwrap(), None);
        assert_eq!(
            backend.requests_to("/auth/register")[0].body.as_ref().unwrap()["nombre"],
            "Ana"
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_surfaces_detail() {
        let backend = MockBackend::start().await;
        backend.on(
            Method::POST,
            "/auth/register",
            400,
            json!({ "detail": "El correo electrónico ya está registrado." }),
        );
        let (client, _) = backend.client(None);

        let err = client
            .register(&NewUser {
                nombre: "Ana".into(),
                email: "ana@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.user_message("Error al registrar. Revisa los datos."),
            "El correo electrónico ya está registrado."
        );
    }

    #[tokio::test]
    async fn test_current_user() {
        let backend = MockBackend::start().await;
        backend.accept_token("tok");
        backend.on(
            Method::GET,
            "/auth/me",
            200,
            json!({ "id": "u-1", "email": "ana@example.com", "nombre": null, "is_active": true }),
        );
        let (client, _) = backend.client(Some("tok"));

        let me = client.current_user().await.unwrap();
        assert_eq!(me.email, "ana@example.com");
        assert_eq!(me.nombre, None);
    }

    #[tokio::test]
    async fn test_logout_keeps_selected_room() {
        let backend = MockBackend::start().await;
        let (client, store) = backend.client(Some("tok"));
        store.set_room_id("room-1").unwrap();
        let mut events = client.subscribe();

        client.logout().unwrap();

        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.room_id().unwrap().as_deref(), Some("room-1"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert!(!client.is_logged_in().unwrap());
    }
}
