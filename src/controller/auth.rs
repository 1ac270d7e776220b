//! Bearer token extractor
//!
//! Every user-scoped endpoint takes an `AuthUser`; the token is an HS256
//! JWT whose `sub` claim is the user id.

use actix_web::{dev, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl AuthUser {
    pub fn from_token(token: &str, secret: &str) -> Result<AuthUser, Error> {
        let data = decode::<UserClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
            Error::Unauthorized(String::from("Token subject is not a user id"))
        })?;

        Ok(AuthUser { user_id })
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized(String::from("Missing token")))?
        .to_str()?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Unauthorized(String::from("Expected bearer token")))
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState<State>>>() {
            Some(state) => state,
            None => {
                return ready(Err(Error::ServerError(String::from(
                    "App state not found",
                ))))
            },
        };

        ready(
            bearer_token(req)
                .and_then(|token| {
                    AuthUser::from_token(token, &state.config.jwt_secret)
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, exp: i64, secret: &str) -> String {
        let claims = UserClaims {
            sub: sub.to_owned(),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_user() {
        let user_id = Uuid::new_v4();
        let t = token(&user_id.to_string(), Utc::now().timestamp() + 600, SECRET);

        let user = AuthUser::from_token(&t, SECRET).unwrap();
        assert_eq!(user.user_id, user_id);
    }

    #[test]
    fn test_wrong_secret_and_expired_tokens_are_rejected() {
        let sub = Uuid::new_v4().to_string();
        let forged = token(&sub, Utc::now().timestamp() + 600, "other");
        let expired = token(&sub, Utc::now().timestamp() - 3600, SECRET);

        assert!(matches!(
            AuthUser::from_token(&forged, SECRET),
            Err(Error::JWT(_))
        ));
        assert!(matches!(
            AuthUser::from_token(&expired, SECRET),
            Err(Error::JWT(_))
        ));
    }

    #[test]
    fn test_non_uuid_subject_is_unauthorized() {
        let t = token("alice", Utc::now().timestamp() + 600, SECRET);
        assert!(matches!(
            AuthUser::from_token(&t, SECRET),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic Zm9v"))
            .to_http_request();
        assert!(matches!(bearer_token(&req), Err(Error::Unauthorized(_))));

        let req = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&req), Err(Error::Unauthorized(_))));
    }
}
