//! In-memory stand-in for the MadMimi API.
//!
//! Reproduces the provider's answer shapes rather than its business logic:
//! plain-text ids on success, the `Authentication failed` literal, JSON
//! envelopes with `success: false`, and the status codes the client
//! classifies (400, 403, 404, 409, 422, 302, 500).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const USERNAME: &str = "jo@example.com";
pub const API_KEY: &str = "s3cret";

/// Promotion every fresh server knows about, with id 1.
pub const SEED_PROMOTION: &str = "Welcome";

/// Largest `per_page` the stats reports accept.
pub const MAX_PER_PAGE: u32 = 100;

type Params = HashMap<String, String>;

#[derive(Debug, Default)]
pub struct Account {
    /// Promotion name to id.
    promotions: BTreeMap<String, u64>,
    lists: BTreeMap<String, BTreeSet<String>>,
    /// Transaction id to recipient.
    transactions: BTreeMap<u64, String>,
}

#[derive(Debug)]
pub struct Provider {
    account: RwLock<Account>,
    next_id: AtomicU64,
}

impl Provider {
    fn new() -> Self {
        let mut account = Account::default();
        account.promotions.insert(SEED_PROMOTION.to_string(), 1);
        Self {
            account: RwLock::new(account),
            next_id: AtomicU64::new(1000),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

pub type Db = Arc<Provider>;

pub fn app() -> Router {
    let db: Db = Arc::new(Provider::new());
    Router::new()
        .route("/mailer", post(send_mailer))
        .route("/mailer/to_list", post(send_to_list))
        .route("/mailers/status/{id}", get(mailer_status))
        .route("/promotions/save", post(save_promotion))
        .route("/promotions.xml", get(list_promotions))
        .route("/promotions/{pid}/mailings/{mid}", get(mailing_summary))
        .route("/promotions/{pid}/mailings/{mid}/{report}", get(mailing_report))
        .route("/audience_lists", post(create_list))
        .route("/audience_lists/lists.xml", get(list_lists))
        .route("/audience_lists/{name}", delete(delete_list))
        .route("/audience_lists/{name}/add", post(add_member))
        .route("/audience_lists/{name}/remove", post(remove_member))
        .route("/audience_members/search.xml", get(search_members))
        .route("/broken", get(broken).post(broken))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Every end point checks credentials first, like the real service.
fn authorize(params: &Params) -> Result<(), Response> {
    let username = params.get("username").map(String::as_str);
    let api_key = params.get("api_key").map(String::as_str);
    if username == Some(USERNAME) && api_key == Some(API_KEY) {
        return Ok(());
    }
    tracing::debug!(?username, "rejecting credentials");
    Err((StatusCode::UNAUTHORIZED, "Authentication failed").into_response())
}

fn required<'a>(params: &'a Params, name: &str) -> Result<&'a str, Response> {
    match params.get(name).map(String::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{name} is required"),
        )
            .into_response()),
    }
}

fn xml(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body).into_response()
}

fn has_unfilled_placeholders(params: &Params) -> bool {
    let html = params.get("raw_html").map(String::as_str).unwrap_or("");
    html.contains('{') && !params.contains_key("body")
}

async fn send_mailer(State(db): State<Db>, Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let (promotion, recipient) = match (
        required(&params, "promotion_name"),
        required(&params, "recipient"),
    ) {
        (Ok(promotion), Ok(recipient)) => (promotion, recipient),
        (Err(rejection), _) | (_, Err(rejection)) => return rejection,
    };
    if !recipient.contains('@') {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Recipient is not a valid email").into_response();
    }

    let mut account = db.account.write().await;
    if !account.promotions.contains_key(promotion) && !params.contains_key("raw_html") {
        return (StatusCode::CONFLICT, format!("No promotion named {promotion}")).into_response();
    }
    if has_unfilled_placeholders(&params) {
        return (
            StatusCode::FORBIDDEN,
            "Your email has {placeholders} in it, but no body was supplied",
        )
            .into_response();
    }
    let id = db.next_id();
    account.transactions.insert(id, recipient.to_string());
    id.to_string().into_response()
}

async fn send_to_list(State(db): State<Db>, Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let (promotion, list) = match (
        required(&params, "promotion_name"),
        required(&params, "list_name"),
    ) {
        (Ok(promotion), Ok(list)) => (promotion, list),
        (Err(rejection), _) | (_, Err(rejection)) => return rejection,
    };

    let account = db.account.read().await;
    if !account.promotions.contains_key(promotion) || !account.lists.contains_key(list) {
        return (
            StatusCode::CONFLICT,
            format!("No promotion or list named {promotion} / {list}"),
        )
            .into_response();
    }
    db.next_id().to_string().into_response()
}

async fn mailer_status(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(params): Form<Params>,
) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let account = db.account.read().await;
    match id.parse::<u64>().ok().filter(|id| account.transactions.contains_key(id)) {
        Some(_) => "sent".into_response(),
        None => (StatusCode::BAD_REQUEST, format!("Transaction {id} does not exist")).into_response(),
    }
}

async fn save_promotion(State(db): State<Db>, Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let name = match required(&params, "promotion_name") {
        Ok(name) => name,
        Err(rejection) => return rejection,
    };
    if has_unfilled_placeholders(&params) {
        return (
            StatusCode::FORBIDDEN,
            "Your email has {placeholders} in it, please remove them",
        )
            .into_response();
    }
    let mut account = db.account.write().await;
    let next = db.next_id();
    let id = *account.promotions.entry(name.to_string()).or_insert(next);
    format!("Saved {name} ({id})").into_response()
}

async fn list_promotions(State(db): State<Db>, Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let page = params.get("page").map(String::as_str).unwrap_or("1");
    let account = db.account.read().await;
    let mut body = format!("<promotions page=\"{page}\">");
    for (name, id) in &account.promotions {
        body.push_str(&format!("<promotion id=\"{id}\" name=\"{name}\"/>"));
    }
    body.push_str("</promotions>");
    xml(body)
}

async fn known_promotion(db: &Db, pid: &str) -> Result<(), Response> {
    let account = db.account.read().await;
    let known = pid
        .parse::<u64>()
        .map(|pid| account.promotions.values().any(|id| *id == pid))
        .unwrap_or(false);
    if known {
        Ok(())
    } else {
        Err((StatusCode::BAD_REQUEST, format!("Promotion {pid} does not exist")).into_response())
    }
}

/// `/promotions/{pid}/mailings/{mid}.xml`: totals, never paginated.
async fn mailing_summary(
    State(db): State<Db>,
    Path((pid, mid)): Path<(String, String)>,
    Form(params): Form<Params>,
) -> Response {
    let Some(mid) = mid.strip_suffix(".xml") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    if let Err(rejection) = known_promotion(&db, &pid).await {
        return rejection;
    }
    let sent = db.account.read().await.transactions.len();
    xml(format!(
        "<mailing promotion=\"{pid}\" mailing=\"{mid}\" sent=\"{sent}\"/>"
    ))
}

async fn mailing_report(
    State(db): State<Db>,
    Path((pid, mid, report)): Path<(String, String, String)>,
    Form(params): Form<Params>,
) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let element = match report.as_str() {
        "clicked.xml" => "clicked",
        "read.xml" => "read",
        "unsubscribed.xml" => "unsubscribed",
        "bounced.xml" => "bounced",
        "forwarded.xml" => "forwarded",
        "sent.xml" => "sent",
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    if let Err(rejection) = known_promotion(&db, &pid).await {
        return rejection;
    }

    let per_page = params.get("per_page").map(|v| v.parse::<u32>());
    let per_page = match per_page {
        None => 30,
        Some(Ok(n)) if (1..=MAX_PER_PAGE).contains(&n) => n,
        Some(_) => return (StatusCode::BAD_REQUEST, "argument out of range").into_response(),
    };
    let page = params.get("page").map(String::as_str).unwrap_or("1");
    xml(format!(
        "<{element} promotion=\"{pid}\" mailing=\"{mid}\" page=\"{page}\" per_page=\"{per_page}\"/>"
    ))
}

async fn create_list(State(db): State<Db>, Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let name = match required(&params, "name") {
        Ok(name) => name,
        Err(rejection) => return rejection,
    };
    let mut account = db.account.write().await;
    if account.lists.contains_key(name) {
        return Json(json!({
            "success": false,
            "error": format!("A list named {name} already exists"),
            "code": 5,
        }))
        .into_response();
    }
    account.lists.insert(name.to_string(), BTreeSet::new());
    Json(json!({ "success": true, "list": name })).into_response()
}

async fn list_lists(State(db): State<Db>, Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let account = db.account.read().await;
    let mut body = String::from("<lists>");
    for (name, members) in &account.lists {
        body.push_str(&format!(
            "<list name=\"{name}\" subscriber_count=\"{}\"/>",
            members.len()
        ));
    }
    body.push_str("</lists>");
    xml(body)
}

async fn delete_list(
    State(db): State<Db>,
    Path(name): Path<String>,
    Form(params): Form<Params>,
) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let mut account = db.account.write().await;
    match account.lists.remove(&name) {
        Some(_) => "deleted".into_response(),
        None => (StatusCode::BAD_REQUEST, format!("List {name} does not exist")).into_response(),
    }
}

async fn add_member(
    State(db): State<Db>,
    Path(name): Path<String>,
    Form(params): Form<Params>,
) -> Response {
    change_membership(db, name, params, true).await
}

async fn remove_member(
    State(db): State<Db>,
    Path(name): Path<String>,
    Form(params): Form<Params>,
) -> Response {
    change_membership(db, name, params, false).await
}

async fn change_membership(db: Db, list: String, params: Params, add: bool) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    let email = match required(&params, "email") {
        Ok(email) => email,
        Err(rejection) => return rejection,
    };
    if !email.contains('@') {
        return (StatusCode::UNPROCESSABLE_ENTITY, format!("{email} is not a valid email")).into_response();
    }
    let mut account = db.account.write().await;
    let Some(members) = account.lists.get_mut(&list) else {
        return (StatusCode::CONFLICT, format!("No list named {list}")).into_response();
    };
    if add {
        members.insert(email.to_string());
    } else {
        members.remove(email);
    }
    StatusCode::OK.into_response()
}

/// Member search is a paid feature; the provider redirects other accounts.
async fn search_members(Form(params): Form<Params>) -> Response {
    if let Err(rejection) = authorize(&params) {
        return rejection;
    }
    (StatusCode::FOUND, [(header::LOCATION, "/upgrade")]).into_response()
}

async fn broken() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<html><body><h1>We're sorry, but something went wrong.</h1></body></html>"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Params {
        Params::from([
            ("username".to_string(), USERNAME.to_string()),
            ("api_key".to_string(), API_KEY.to_string()),
        ])
    }

    #[test]
    fn authorize_accepts_known_credentials() {
        assert!(authorize(&creds()).is_ok());
    }

    #[test]
    fn authorize_rejects_wrong_key() {
        let mut params = creds();
        params.insert("api_key".to_string(), "nope".to_string());
        let rejection = authorize(&params).unwrap_err();
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn placeholders_need_a_body() {
        let mut params = creds();
        params.insert("raw_html".to_string(), "Hi {name}".to_string());
        assert!(has_unfilled_placeholders(&params));
        params.insert("body".to_string(), "name: Jo".to_string());
        assert!(!has_unfilled_placeholders(&params));
    }

    #[test]
    fn required_rejects_empty_values() {
        let mut params = creds();
        params.insert("email".to_string(), String::new());
        let rejection = required(&params, "email").unwrap_err();
        assert_eq!(rejection.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn provider_starts_with_seed_promotion() {
        let provider = Provider::new();
        let account = provider.account.try_read().unwrap();
        assert_eq!(account.promotions.get(SEED_PROMOTION), Some(&1));
        assert!(account.lists.is_empty());
    }
}
