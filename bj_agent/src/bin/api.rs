use actix_web::{
    body::BoxBody,
    delete, error, get,
    http::StatusCode,
    post, web, App, HttpResponse, HttpServer,
};
use bj_agent::prelude::*;
use clap::Parser;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{error, info, Level};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    address: String,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

/// Errors handed back to API callers.
#[derive(Debug, Error)]
enum UserError {
    #[error("an internal error occurred")]
    InternalError,
    #[error("invalid configuration: {0}")]
    BadConfig(#[from] ConfigError),
    #[error("no session with id {0}")]
    SessionNotFound(Uuid),
    #[error("{0}")]
    OutOfFunds(BlackjackGameError),
    #[error("session aborted: {0}")]
    SessionAborted(BlackjackGameError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            UserError::InternalError | UserError::SessionAborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            UserError::BadConfig(_) => StatusCode::BAD_REQUEST,
            UserError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            UserError::OutOfFunds(_) => StatusCode::CONFLICT,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewGameResponse {
    session_id: Uuid,
    bankroll: f64,
    base_bet: f64,
    use_card_counting: bool,
    use_wonging: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayHandResponse {
    success: bool,
    sat_out: bool,
    hand_data: HandOutcome,
    stats: StatsSnapshot,
}

#[derive(Serialize)]
struct HistoryResponse {
    history: Vec<HandOutcome>,
}

fn find_session(registry: &SessionRegistry, id: Uuid) -> Result<Arc<Mutex<Session>>, UserError> {
    registry.get(&id).ok_or(UserError::SessionNotFound(id))
}

fn lock(session: &Mutex<Session>) -> Result<MutexGuard<'_, Session>, UserError> {
    session.lock().map_err(|_| UserError::InternalError)
}

/// Starts a new session from the configuration in the body, missing fields take their defaults.
#[post("/api/new-game")]
async fn new_game(
    config: web::Json<SessionConfig>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, UserError> {
    let config = config.into_inner();
    let (session_id, _) = registry.create(config)?;
    Ok(HttpResponse::Ok().json(NewGameResponse {
        session_id,
        bankroll: config.starting_bankroll,
        base_bet: config.base_bet,
        use_card_counting: config.counting_enabled,
        use_wonging: config.wonging_enabled,
    }))
}

/// Plays the next round of a session. A fatal error discards the session.
#[post("/api/sessions/{id}/play-hand")]
async fn play_hand(
    id: web::Path<Uuid>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, UserError> {
    let id = id.into_inner();
    let session = find_session(&registry, id)?;
    let mut session = lock(&session)?;
    let played = session.play_one_hand();
    match played {
        Ok(outcome) => Ok(HttpResponse::Ok().json(PlayHandResponse {
            success: true,
            sat_out: outcome.sat_out,
            hand_data: outcome,
            stats: session.stats(),
        })),
        Err(e) if e.is_out_of_funds() => Err(UserError::OutOfFunds(e)),
        Err(e) => {
            error!(%id, %e, "discarding session");
            drop(session);
            registry.remove(&id);
            Err(UserError::SessionAborted(e))
        }
    }
}

#[get("/api/sessions/{id}/stats")]
async fn session_stats(
    id: web::Path<Uuid>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, UserError> {
    let session = find_session(&registry, id.into_inner())?;
    let stats = lock(&session)?.stats();
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/api/sessions/{id}/history")]
async fn session_history(
    id: web::Path<Uuid>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, UserError> {
    let session = find_session(&registry, id.into_inner())?;
    let history = lock(&session)?.history().to_vec();
    Ok(HttpResponse::Ok().json(HistoryResponse { history }))
}

#[delete("/api/sessions/{id}")]
async fn end_session(
    id: web::Path<Uuid>,
    registry: web::Data<SessionRegistry>,
) -> Result<HttpResponse, UserError> {
    let id = id.into_inner();
    registry
        .remove(&id)
        .ok_or(UserError::SessionNotFound(id))?;
    Ok(HttpResponse::NoContent().finish())
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(new_game)
        .service(play_hand)
        .service(session_stats)
        .service(session_history)
        .service(end_session);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    info!("Listening at {}:{}...", args.address, args.port);

    let registry = web::Data::new(SessionRegistry::new());

    HttpServer::new(move || App::new().app_data(registry.clone()).configure(configure))
        .bind((args.address.as_str(), args.port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use serde_json::{json, Value};

    macro_rules! app {
        ($registry:expr) => {
            test::init_service(App::new().app_data($registry.clone()).configure(configure)).await
        };
    }

    async fn new_session(registry: &web::Data<SessionRegistry>, body: Value) -> String {
        let app = app!(registry);
        let req = test::TestRequest::post()
            .uri("/api/new-game")
            .set_json(body)
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        resp["sessionId"].as_str().unwrap().to_owned()
    }

    #[actix_web::test]
    async fn test_new_game() {
        let registry = web::Data::new(SessionRegistry::new());
        let app = app!(registry);
        let req = test::TestRequest::post()
            .uri("/api/new-game")
            .set_json(json!({"bankroll": 500, "baseBet": 5, "useWonging": false}))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["bankroll"], 500.0);
        assert_eq!(resp["baseBet"], 5.0);
        assert_eq!(resp["useCardCounting"], true);
        assert_eq!(resp["useWonging"], false);
        assert!(resp["sessionId"].as_str().unwrap().parse::<Uuid>().is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[actix_web::test]
    async fn test_new_game_rejects_bad_config() {
        let registry = web::Data::new(SessionRegistry::new());
        let app = app!(registry);
        let req = test::TestRequest::post()
            .uri("/api/new-game")
            .set_json(json!({"penetration": 1.5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        for body in [
            json!({"numDecks": u64::MAX}),
            json!({"numDecks": 9}),
            json!({"penetration": 0.99}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/new-game")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
        assert!(registry.is_empty());
    }

    #[actix_web::test]
    async fn test_play_hands_and_read_back() {
        let registry = web::Data::new(SessionRegistry::new());
        let id = new_session(&registry, json!({})).await;
        let app = app!(registry);

        for n in 1..=5u32 {
            let req = test::TestRequest::post()
                .uri(&format!("/api/sessions/{}/play-hand", id))
                .to_request();
            let resp: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(resp["success"], true);
            assert_eq!(resp["handData"]["handNumber"], n);
            assert_eq!(resp["satOut"], resp["handData"]["satOut"]);
            assert_eq!(resp["stats"]["totalOpportunities"], n);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}/history", id))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["history"].as_array().unwrap().len(), 5);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}/stats", id))
            .to_request();
        let stats: StatsSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats.total_opportunities, 5);
        assert_eq!(stats.starting_bankroll, 1000.0);
    }

    #[actix_web::test]
    async fn test_out_of_funds_is_conflict() {
        let registry = web::Data::new(SessionRegistry::new());
        let id = new_session(&registry, json!({"startingBankroll": 5, "baseBet": 10})).await;
        let app = app!(registry);
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/play-hand", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        // the session survives a refused round
        assert_eq!(registry.len(), 1);
    }

    #[actix_web::test]
    async fn test_unknown_and_deleted_sessions() {
        let registry = web::Data::new(SessionRegistry::new());
        let id = new_session(&registry, json!({})).await;
        let app = app!(registry);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}/stats", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(registry.is_empty());

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/play-hand", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
