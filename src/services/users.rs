use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::UserClient;
use crate::domain::{User, UserCreate};
use crate::error::AuthError;
use crate::messages::{ServiceResponse, UserRequest};
use crate::security;

/// Owns registered users and their live sessions.
///
/// Registration, login, and token resolution all run through this actor, so
/// the user map and session map have a single writer.
pub struct UserService {
    receiver: mpsc::Receiver<UserRequest>,
    users: HashMap<String, User>,
    /// token -> user id
    sessions: HashMap<String, String>,
    next_id: u64,
}

impl UserService {
    pub fn new(buffer_size: usize) -> (Self, UserClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            users: HashMap::new(),
            sessions: HashMap::new(),
            next_id: 1,
        };
        let client = UserClient::new(sender);
        (service, client)
    }

    #[instrument(name = "user_service", skip(self))]
    pub async fn run(mut self) {
        info!("UserService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                UserRequest::Register { create, respond_to } => {
                    self.handle_register(create, respond_to);
                }
                UserRequest::Login {
                    email,
                    password,
                    respond_to,
                } => {
                    self.handle_login(email, password, respond_to);
                }
                UserRequest::Authenticate { token, respond_to } => {
                    self.handle_authenticate(token, respond_to);
                }
                UserRequest::GetUser { id, respond_to } => {
                    self.handle_get_user(id, respond_to);
                }
                UserRequest::Shutdown => {
                    info!("UserService shutting down");
                    break;
                }
                #[cfg(test)]
                UserRequest::GetUserCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.users.len()));
                }
            }
        }

        info!("UserService stopped");
    }

    #[instrument(fields(user_email = %create.email), skip(self, create, respond_to))]
    fn handle_register(
        &mut self,
        create: UserCreate,
        respond_to: ServiceResponse<(User, String), AuthError>,
    ) {
        debug!("Processing register request");

        let result = self.register_user(create);

        match &result {
            Ok((user, _)) => info!(user_id = %user.id, "User registered"),
            Err(e) => error!(error = %e, "Registration failed"),
        }

        let _ = respond_to.send(result);
    }

    fn register_user(&mut self, create: UserCreate) -> Result<(User, String), AuthError> {
        if !is_valid_email(&create.email) {
            return Err(AuthError::ValidationError(
                "Valid email is required".to_string(),
            ));
        }
        if create.password.chars().count() < 6 {
            return Err(AuthError::ValidationError(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        if create.name.trim().chars().count() < 2 {
            return Err(AuthError::ValidationError(
                "Name must be at least 2 characters".to_string(),
            ));
        }
        if self.users.values().any(|u| u.email == create.email) {
            return Err(AuthError::EmailTaken(create.email));
        }

        let id = format!("user_{}", self.next_id);
        self.next_id += 1;

        let user = User {
            id: id.clone(),
            name: create.name,
            email: create.email,
            password_hash: security::hash_password(&create.password),
            role: create.role,
            created_at: Utc::now(),
        };
        self.users.insert(id.clone(), user.clone());

        let token = security::generate_token();
        self.sessions.insert(token.clone(), id);

        Ok((user, token))
    }

    #[instrument(fields(user_email = %email), skip(self, email, password, respond_to))]
    fn handle_login(
        &mut self,
        email: String,
        password: String,
        respond_to: ServiceResponse<(User, String), AuthError>,
    ) {
        debug!("Processing login request");

        let result = self.login_user(email, password);

        match &result {
            Ok((user, _)) => info!(user_id = %user.id, "User logged in"),
            Err(e) => info!(error = %e, "Login rejected"),
        }

        let _ = respond_to.send(result);
    }

    fn login_user(&mut self, email: String, password: String) -> Result<(User, String), AuthError> {
        if !is_valid_email(&email) {
            return Err(AuthError::ValidationError(
                "Valid email is required".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AuthError::ValidationError(
                "Password is required".to_string(),
            ));
        }

        // Unknown email and wrong password collapse into one failure so the
        // response does not reveal which part was wrong.
        let user = self
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        if !security::verify_password(&user.password_hash, &password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = security::generate_token();
        self.sessions.insert(token.clone(), user.id.clone());

        Ok((user, token))
    }

    #[instrument(skip(self, token, respond_to))]
    fn handle_authenticate(&self, token: String, respond_to: ServiceResponse<User, AuthError>) {
        debug!("Processing authenticate request");

        let result = self
            .sessions
            .get(&token)
            .and_then(|user_id| self.users.get(user_id))
            .cloned()
            .ok_or(AuthError::InvalidToken);

        match &result {
            Ok(user) => debug!(user_id = %user.id, "Token resolved"),
            Err(_) => info!("Invalid token presented"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_get_user(&self, id: String, respond_to: ServiceResponse<Option<User>, AuthError>) {
        debug!("Processing get_user request");

        let user = self.users.get(&id).cloned();

        match &user {
            Some(user) => debug!(user_name = %user.name, "User found"),
            None => debug!("User not found"),
        }

        let _ = respond_to.send(Ok(user));
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && domain.split('.').all(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn start_service() -> UserClient {
        let (service, client) = UserService::new(8);
        tokio::spawn(service.run());
        client
    }

    fn create(name: &str, email: &str, password: &str) -> UserCreate {
        UserCreate {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn register_assigns_ids_and_issues_token() {
        let client = start_service();

        let (user, token) = client
            .register(create("Alice", "alice@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(user.id, "user_1");
        assert_eq!(user.role, Role::User);
        assert!(!token.is_empty());

        let resolved = client.authenticate(token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn register_rejects_invalid_input() {
        let client = start_service();

        let short_password = client
            .register(create("Alice", "alice@example.com", "123"))
            .await;
        assert!(matches!(short_password, Err(AuthError::ValidationError(_))));

        let bad_email = client
            .register(create("Alice", "not-an-email", "password123"))
            .await;
        assert!(matches!(bad_email, Err(AuthError::ValidationError(_))));

        let short_name = client
            .register(create("A", "alice@example.com", "password123"))
            .await;
        assert!(matches!(short_name, Err(AuthError::ValidationError(_))));

        let count = client.get_user_count().await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let client = start_service();

        client
            .register(create("Alice", "alice@example.com", "password123"))
            .await
            .unwrap();
        let duplicate = client
            .register(create("Other Alice", "alice@example.com", "password456"))
            .await;

        assert!(matches!(duplicate, Err(AuthError::EmailTaken(_))));
        assert_eq!(client.get_user_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let client = start_service();
        client
            .register(create("Alice", "alice@example.com", "password123"))
            .await
            .unwrap();

        let (user, token) = client
            .login("alice@example.com".to_string(), "password123".to_string())
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(!token.is_empty());

        let wrong_password = client
            .login("alice@example.com".to_string(), "nope123".to_string())
            .await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));

        let unknown_email = client
            .login("bob@example.com".to_string(), "password123".to_string())
            .await;
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_token() {
        let client = start_service();

        let result = client.authenticate("forged-token".to_string()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn email_validation_matches_expected_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b@sub.example.co"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }
}
