use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, CreateUserInput, LoginInput, User, UserRole};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub role: UserRole,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Err(AppError::Unauthorized(
                "Missing or invalid authorization header".to_string(),
            )));
        };

        match req.app_data::<Data<Config>>() {
            Some(config) => ready(decode_claims(token, &config.jwt_secret)),
            None => {
                log::error!("Config is not registered as app data");
                ready(Err(AppError::internal_server_error()))
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        let matches = verify(&request.password, &user.password_hash).map_err(|e| {
            log::error!("Password verification failed for {}: {}", user.id, e);
            AppError::internal_server_error()
        })?;
        if !matches {
            log::warn!("Failed login for {}", request.email);
            return Err(invalid());
        }

        let token = self.generate_token(&user)?;
        log::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Hashes the password and stores a new account. The manager, if any,
    /// must already exist.
    pub async fn create_user(&self, request: CreateUserInput) -> Result<User, AppError> {
        request.validate().map_err(AppError::BadRequest)?;

        if let Some(manager_id) = request.manager_id {
            if self.user_repository.find_by_id(manager_id).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "Manager {} does not exist",
                    manager_id
                )));
            }
        }

        let password_hash = hash(&request.password, self.config.bcrypt_cost).map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            AppError::internal_server_error()
        })?;

        let user = self
            .user_repository
            .create_user(User::new(request, password_hash))
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("Email already exists".to_string()),
                other => other,
            })?;

        log::info!("Created {} user {}", user.role, user.id);
        Ok(user)
    }

    /// Creates the configured admin unless an account with that email exists.
    /// Returns the new account, if one was made.
    pub async fn ensure_admin(&self) -> Result<Option<User>, AppError> {
        let (Some(email), Some(password)) = (&self.config.admin_email, &self.config.admin_password)
        else {
            return Ok(None);
        };

        if self.user_repository.find_by_email(email).await?.is_some() {
            log::info!("Admin account {} already present", email);
            return Ok(None);
        }

        let admin = self
            .create_user(CreateUserInput {
                email: email.clone(),
                password: password.clone(),
                name: self.config.admin_name.clone(),
                role: Some(UserRole::Admin),
                department: "Administration".to_string(),
                position: None,
                employee_number: None,
                manager_id: None,
            })
            .await?;
        log::info!("Seeded admin account {} ({})", admin.email, admin.id);
        Ok(Some(admin))
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<User, AppError> {
        self.user_repository
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode_claims(token, &self.config.jwt_secret)
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| AppError::internal_server_error_message("Token expiry overflow"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| {
            log::error!("Token encoding failed: {}", e);
            AppError::internal_server_error()
        })
    }
}
