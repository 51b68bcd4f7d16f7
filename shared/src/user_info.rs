use serde::{Serialize, Deserialize};
use std::fmt;
use uuid::Uuid;

pub const USER_COOKIE: &str = "av_uid";
pub const USER_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Opaque voter identity. One vote per category is allowed per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn anonymous() -> Self {
        Self(format!("anon_{}", Uuid::new_v4().simple()))
    }

    pub fn telegram(telegram_id: &str) -> Self {
        Self(format!("tg_{}", telegram_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.starts_with("anon_")
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Backend-specific Rocket implementation
#[cfg(feature = "backend")]
mod backend_impl {
    use super::*;
    use crate::validation::is_valid_user_key;
    use rocket::http::{Cookie, SameSite};
    use rocket::request::{FromRequest, Outcome};
    use rocket::Request;

    pub fn user_cookie(key: &UserKey) -> Cookie<'static> {
        Cookie::build((USER_COOKIE, key.as_str().to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(USER_COOKIE_MAX_AGE_DAYS))
            .build()
    }

    #[rocket::async_trait]
    impl<'r> FromRequest<'r> for UserKey {
        type Error = ();

        async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
            let cookies = req.cookies();
            if let Some(cookie) = cookies.get(USER_COOKIE) {
                if is_valid_user_key(cookie.value()) {
                    return Outcome::Success(UserKey::new(cookie.value()));
                }
            }

            let key = UserKey::anonymous();
            cookies.add(user_cookie(&key));
            Outcome::Success(key)
        }
    }
}

#[cfg(feature = "backend")]
pub use backend_impl::user_cookie;
