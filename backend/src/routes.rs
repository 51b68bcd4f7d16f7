use std::collections::BTreeMap;
use rocket::{State, get, post, http::{CookieJar, Status, uri::Origin}, response::Redirect, serde::json::Json};
use tracing::{debug, info, warn, instrument};
use shared::models::*;
use shared::user_info::{user_cookie, UserKey};
use shared::validation::validate_vote_request;
use crate::{
   error::ApiError,
   service::{VoteOutcome, VoteService},
   telegram::TelegramVerifier,
};

pub struct AppState {
    pub votes: VoteService,
    pub telegram: TelegramVerifier,
}

impl AppState {
    pub fn new(votes: VoteService) -> Self {
        Self {
            votes,
            telegram: TelegramVerifier::new(),
        }
    }

    pub fn new_with_telegram(votes: VoteService, bot_token: impl Into<String>) -> Self {
        Self {
            votes,
            telegram: TelegramVerifier::new_with_token(bot_token),
        }
    }
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

#[instrument(skip(state, request, user_key), fields(user = %user_key))]
#[post("/vote", format = "json", data = "<request>")]
pub async fn cast_vote(
    state: &State<AppState>,
    request: Json<VoteRequest>,
    user_key: UserKey,
) -> Result<Json<OkResponse>, ApiError> {
    let request = request.into_inner();
    validate_vote_request(&request)?;

    match state.votes.cast_vote(&user_key, &request.category_id, &request.nominee_id).await? {
        VoteOutcome::Accepted => Ok(Json(OkResponse::ok())),
        VoteOutcome::Rejected(reason) => {
            debug!("Vote for {}/{} rejected: {:?}", request.category_id, request.nominee_id, reason);
            Err(reason.into())
        }
    }
}

#[get("/results")]
pub async fn results(state: &State<AppState>) -> Json<Vec<CategoryResult>> {
    Json(state.votes.results())
}

#[get("/category/<id>")]
pub async fn get_category(state: &State<AppState>, id: &str) -> Result<Json<Category>, ApiError> {
    state.votes
        .category(id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[get("/prefs/music")]
pub async fn get_music_pref(
    state: &State<AppState>,
    user_key: UserKey,
) -> Result<Json<MusicPreference>, ApiError> {
    let music_on = state.votes.music_preference(&user_key).await?;
    Ok(Json(MusicPreference { music_on }))
}

#[post("/prefs/music", format = "json", data = "<request>")]
pub async fn set_music_pref(
    state: &State<AppState>,
    request: Json<SetMusicPreference>,
    user_key: UserKey,
) -> Result<Json<OkResponse>, ApiError> {
    state.votes.set_music_preference(&user_key, request.on).await?;
    Ok(Json(OkResponse::ok()))
}

/// Redirect target of the Telegram login widget. Rebinds the caller's
/// identity cookie to their Telegram account.
#[get("/tg-auth")]
pub async fn telegram_login(
    state: &State<AppState>,
    uri: &Origin<'_>,
    cookies: &CookieJar<'_>,
) -> Result<Redirect, ApiError> {
    let fields: BTreeMap<String, String> = uri
        .query()
        .map(|q| q.segments().map(|(k, v)| (k.to_string(), v.to_string())).collect())
        .unwrap_or_default();

    match state.telegram.verify(&fields) {
        Ok(user_key) => {
            info!("Telegram login verified for {}", user_key);
            cookies.add(user_cookie(&user_key));
            Ok(Redirect::found("/"))
        }
        Err(e) => {
            warn!("Telegram login rejected: {}", e);
            Err(ApiError::Unauthorized)
        }
    }
}
