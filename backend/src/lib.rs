pub mod catchers;
pub mod config;
pub mod error;
pub mod fairings;
pub mod ledger;
pub mod queries;
pub mod routes;
pub mod service;
pub mod store;
pub mod telegram;
pub use shared::{models::*, error::{Error, ErrorCode}, user_info::*};
pub use shared::catalog::{Catalog, LoadError};
pub use shared::tally::{Snapshot, TallyCache};

use rocket::{catchers, routes, Build, Rocket, fairing::AdHoc};
use crate::catchers::{bad_request, forbidden, internal_error, not_found, service_unavailable, unauthorized, unprocessable};
use crate::fairings::{RequestLog, CORS};
use crate::routes::{all_options, cast_vote, get_category, get_music_pref, results, set_music_pref, telegram_login, AppState};

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .attach(CORS)
        .attach(RequestLog)
        .attach(AdHoc::on_shutdown("Print results", |rocket| Box::pin(async move {
            if let Some(state) = rocket.state::<AppState>() {
                state.votes.log_results();
            }
        })))
        .manage(state)
        .mount(
            "/api",
            routes![
                cast_vote,
                results,
                get_category,
                get_music_pref,
                set_music_pref,
                all_options
            ],
        )
        .mount("/", routes![telegram_login])
        .register(
            "/",
            catchers![
                forbidden,
                unauthorized,
                bad_request,
                unprocessable,
                internal_error,
                service_unavailable,
                not_found
            ],
        )
}
