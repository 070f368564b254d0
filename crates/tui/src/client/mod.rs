use api_types::{
    ErrorResponse, MessageResponse,
    auth::{Login, LoginResponse, ResetPassword, SendOtp, Signup, VerifyOtp, VerifyOtpResponse},
    entry::{Entry, EntryDraft},
};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },
    #[error("server error: {0}")]
    Server(String),
    /// The request succeeded but the body was not the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Message sent by the server, if the error carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Conflict(message) | Self::Server(message) | Self::Validation { message, .. }
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// HTTP client for the Tally REST API.
///
/// Entry routes take the bearer token explicitly; the client keeps no session.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Setting(format!("invalid base_url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Setting(format!("invalid base_url: {base_url}")));
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = Self::checked(req).await?;
        let body = res.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            tracing::warn!(%err, "response body did not decode");
            ClientError::Decode(err.to_string())
        })
    }

    async fn send_unit(&self, req: RequestBuilder) -> std::result::Result<(), ClientError> {
        Self::checked(req).await.map(|_| ())
    }

    async fn checked(req: RequestBuilder) -> std::result::Result<reqwest::Response, ClientError> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.json::<ErrorResponse>().await.unwrap_or_default();
        let message = body.message.unwrap_or_else(|| "unknown error".to_string());
        tracing::debug!(status = status.as_u16(), %message, "request rejected");

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(message),
            400 | 422 => ClientError::Validation {
                field: body.field,
                message,
            },
            _ => ClientError::Server(message),
        };
        Err(err)
    }

    pub async fn signup(&self, payload: &Signup) -> std::result::Result<MessageResponse, ClientError> {
        tracing::info!("signing up");
        self.send(self.http.post(self.url("auth/signup")).json(payload))
            .await
    }

    pub async fn login(&self, payload: &Login) -> std::result::Result<LoginResponse, ClientError> {
        tracing::info!("logging in");
        self.send(self.http.post(self.url("auth/login")).json(payload))
            .await
    }

    pub async fn send_otp(&self, email: &str) -> std::result::Result<MessageResponse, ClientError> {
        let payload = SendOtp {
            email: email.trim().to_string(),
        };
        self.send(self.http.post(self.url("auth/send-otp")).json(&payload))
            .await
    }

    pub async fn verify_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> std::result::Result<VerifyOtpResponse, ClientError> {
        let payload = VerifyOtp {
            email: email.trim().to_string(),
            otp: otp.trim().to_string(),
        };
        self.send(self.http.post(self.url("auth/verify-otp")).json(&payload))
            .await
    }

    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
    ) -> std::result::Result<MessageResponse, ClientError> {
        let payload = ResetPassword {
            reset_token: reset_token.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("auth/reset-password")).json(&payload))
            .await
    }

    /// Entries that fail to decode are logged and skipped; the rest are kept.
    pub async fn list_entries(&self, token: &str) -> std::result::Result<Vec<Entry>, ClientError> {
        let raw: Vec<serde_json::Value> = self
            .send(self.http.get(self.url("entries")).bearer_auth(token))
            .await?;
        let total = raw.len();
        let entries: Vec<Entry> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let id = value
                    .get("_id")
                    .or_else(|| value.get("id"))
                    .and_then(|id| id.as_str())
                    .map(str::to_string);
                serde_json::from_value::<Entry>(value)
                    .inspect_err(|err| {
                        tracing::warn!(index, id = ?id, %err, "skipping undecodable entry");
                    })
                    .ok()
            })
            .collect();
        tracing::debug!(count = entries.len(), skipped = total - entries.len(), "entries fetched");
        Ok(entries)
    }

    pub async fn create_entry(
        &self,
        token: &str,
        draft: &EntryDraft,
    ) -> std::result::Result<(), ClientError> {
        tracing::info!(kind = draft.kind.as_str(), "creating entry");
        self.send_unit(
            self.http
                .post(self.url("entries"))
                .bearer_auth(token)
                .json(draft),
        )
        .await
    }

    pub async fn update_entry(
        &self,
        token: &str,
        id: &str,
        draft: &EntryDraft,
    ) -> std::result::Result<(), ClientError> {
        tracing::info!(%id, "updating entry");
        self.send_unit(
            self.http
                .put(self.url(&format!("entries/{id}")))
                .bearer_auth(token)
                .json(draft),
        )
        .await
    }

    pub async fn delete_entry(&self, token: &str, id: &str) -> std::result::Result<(), ClientError> {
        tracing::info!(%id, "deleting entry");
        self.send_unit(
            self.http
                .delete(self.url(&format!("entries/{id}")))
                .bearer_auth(token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use api_types::entry::{Category, EntryKind, PaidVia};
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{delete, get, post},
    };
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use super::*;

    const TOKEN: &str = "t0k3n";

    type Seen = Arc<Mutex<Vec<String>>>;

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"))
    }

    async fn spawn_api() -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/api/auth/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "Passw0rd!" {
                        (StatusCode::OK, Json(json!({ "token": TOKEN })))
                    } else {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "message": "Wrong password", "field": "password" })),
                        )
                    }
                }),
            )
            .route(
                "/api/auth/signup",
                post(|| async {
                    (
                        StatusCode::CONFLICT,
                        Json(json!({ "message": "Email already registered" })),
                    )
                }),
            )
            .route(
                "/api/auth/verify-otp",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({ "message": "ok", "resetToken": format!("rt-{}", body["otp"].as_str().unwrap_or("")) }))
                }),
            )
            .route(
                "/api/auth/send-otp",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/entries",
                get(|headers: HeaderMap| async move {
                    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                        Some("Bearer mixed") => {
                            return (
                                StatusCode::OK,
                                Json(json!([
                                    { "_id": "1", "type": "income", "title": "Pay", "amount": 500,
                                      "date": "2024-01-05" },
                                    { "_id": "2", "type": "expense", "title": "No date", "amount": 10 },
                                    { "_id": "3", "type": "expense", "title": "Bad date", "amount": 10,
                                      "date": "yesterday" },
                                    { "_id": "4", "type": "Expense", "title": "Legacy", "amount": 10,
                                      "date": "2024-01-06" },
                                    { "_id": "5", "type": "expense", "title": "Lunch", "amount": 120,
                                      "date": "2024-01-07", "category": "Food" }
                                ])),
                            );
                        }
                        Some("Bearer garbled") => {
                            return (StatusCode::OK, Json(json!({ "entries": "nope" })));
                        }
                        _ => {}
                    }
                    if !authorized(&headers) {
                        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "expired" })));
                    }
                    (
                        StatusCode::OK,
                        Json(json!([
                            { "_id": "1", "type": "income", "title": "Pay", "amount": 500,
                              "date": "2024-01-05", "category": "Salary", "paidVia": "Bank Transfer" },
                            { "_id": "2", "type": "expense", "title": "Lunch", "amount": "120",
                              "date": "2024-01-06T09:30:00.000Z", "category": "Food" }
                        ])),
                    )
                })
                .post(
                    |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        if !authorized(&headers) {
                            return StatusCode::UNAUTHORIZED;
                        }
                        seen.lock().unwrap().push(format!("POST {}", body["paidVia"]));
                        StatusCode::CREATED
                    },
                ),
            )
            .route(
                "/api/entries/{id}",
                delete(|State(seen): State<Seen>, Path(id): Path<String>| async move {
                    seen.lock().unwrap().push(format!("DELETE {id}"));
                    if id == "missing" {
                        StatusCode::NOT_FOUND
                    } else {
                        StatusCode::OK
                    }
                })
                .put(
                    |State(seen): State<Seen>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                        seen.lock().unwrap().push(format!("PUT {id} {}", body["amount"]));
                        StatusCode::OK
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/api/"), seen)
    }

    fn draft() -> EntryDraft {
        EntryDraft {
            kind: EntryKind::Expense,
            title: "Taxi".to_string(),
            amount: 80.5,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: Category::Travel,
            paid_via: PaidVia::Upi,
            notes: None,
        }
    }

    #[tokio::test]
    async fn login_returns_token() {
        let (base, _) = spawn_api().await;
        let client = Client::new(&base).unwrap();
        let res = client
            .login(&Login {
                email: "me@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(res.token, TOKEN);
    }

    #[tokio::test]
    async fn field_errors_keep_their_field() {
        let (base, _) = spawn_api().await;
        let client = Client::new(&base).unwrap();
        let err = client
            .login(&Login {
                email: "me@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            ClientError::Validation { field, message } => {
                assert_eq!(field.as_deref(), Some("password"));
                assert_eq!(message, "Wrong password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn status_codes_map_to_variants() {
        let (base, _) = spawn_api().await;
        let client = Client::new(&base).unwrap();

        let conflict = client
            .signup(&Signup {
                name: "A".to_string(),
                email: "a@b.co".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(conflict.server_message(), Some("Email already registered"));

        let server = client.send_otp("a@b.co").await.unwrap_err();
        assert!(matches!(&server, ClientError::Server(m) if m == "unknown error"));

        let unauthorized = client.list_entries("wrong").await.unwrap_err();
        assert!(matches!(unauthorized, ClientError::Unauthorized));

        let missing = client.delete_entry(TOKEN, "missing").await.unwrap_err();
        assert!(matches!(missing, ClientError::NotFound));
    }

    #[tokio::test]
    async fn verify_otp_returns_reset_token() {
        let (base, _) = spawn_api().await;
        let client = Client::new(&base).unwrap();
        let res = client.verify_otp(" a@b.co ", " 1234 ").await.unwrap();
        assert_eq!(res.reset_token, "rt-1234");
    }

    #[tokio::test]
    async fn entries_crud_uses_bearer_token() {
        let (base, seen) = spawn_api().await;
        // No trailing slash: paths still land under /api.
        let client = Client::new(base.trim_end_matches('/')).unwrap();

        let entries = client.list_entries(TOKEN).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].paid_via, Some(PaidVia::BankTransfer));
        assert_eq!(entries[1].amount, Some(120.0));
        assert_eq!(entries[1].date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());

        client.create_entry(TOKEN, &draft()).await.unwrap();
        client.update_entry(TOKEN, "1", &draft()).await.unwrap();
        client.delete_entry(TOKEN, "2").await.unwrap();

        assert!(matches!(
            client.create_entry("bad", &draft()).await,
            Err(ClientError::Unauthorized)
        ));

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["POST \"UPI\"", "PUT 1 80.5", "DELETE 2"]);
    }

    #[tokio::test]
    async fn list_keeps_good_entries_when_some_are_malformed() {
        let (base, _) = spawn_api().await;
        let client = Client::new(&base).unwrap();

        let entries = client.list_entries("mixed").await.unwrap();
        let ids: Vec<_> = entries.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["1", "5"]);
        assert_eq!(entries[1].category, "Food");
    }

    #[tokio::test]
    async fn unexpected_body_is_a_decode_error() {
        let (base, _) = spawn_api().await;
        let client = Client::new(&base).unwrap();

        let err = client.list_entries("garbled").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(Client::new("not a url").is_err());
        assert!(Client::new("mailto:someone@example.com").is_err());
    }
}
