//! REST client used by the console views.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::console::messages::{friendly, NETWORK_ERROR};
use crate::console::session::{Session, SessionError};
use crate::errors::Ack;
use crate::models::admin::AdminResponse;
use crate::models::bet::BetDetail;
use crate::models::date_range::DateRangeQuery;
use crate::models::flight::FlightDetail;
use crate::models::flight_plan::{CreateFlightPlan, FlightPlan};
use crate::models::payout::{PayoutDetail, UpdatePayout};
use crate::models::player::Player;
use crate::models::setting::Setting;
use crate::services::auth::LoginResponse;
use crate::services::dashboard::DashboardStats;

/// Console client errors. `Display` is the operator-facing wording.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{}", NETWORK_ERROR)]
    Network(#[source] reqwest::Error),

    #[error("{}", friendly(.message))]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ConsoleError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<ErrorBody>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// Admin API client. Every call carries the session's bearer token when
/// one is held.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ConsoleError::Network)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let req = self.http.request(method, url);
        match self.session.token() {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    /// Send a request and unwrap the response envelope.
    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ConsoleError> {
        let resp = req.send().await.map_err(ConsoleError::Network)?;
        let status = resp.status();
        let body = resp.text().await.map_err(ConsoleError::Network)?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ConsoleError::Decode(e.to_string())),
            Err(_) => {
                return Err(ConsoleError::Api {
                    status: status.as_u16(),
                    code: "HTTP_ERROR".to_string(),
                    message: status.canonical_reason().unwrap_or("Unknown").to_string(),
                })
            }
        };

        if let Some(err) = envelope.error {
            tracing::debug!(status = status.as_u16(), code = %err.code, "API call failed");
            return Err(ConsoleError::Api {
                status: status.as_u16(),
                code: err.code,
                message: err.message,
            });
        }
        envelope
            .data
            .ok_or_else(|| ConsoleError::Decode("response carried no data".to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        Self::send(self.request(Method::GET, self.url(path))).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConsoleError> {
        Self::send(self.request(Method::POST, self.url(path)).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConsoleError> {
        Self::send(self.request(Method::PUT, self.url(path)).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Ack, ConsoleError> {
        Self::send(self.request(Method::DELETE, self.url(path))).await
    }

    /// Log in and keep the issued token in the session.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AdminResponse, ConsoleError> {
        let resp: LoginResponse = self
            .post("/login", &LoginBody { username, password })
            .await?;
        self.session.begin(resp.token, resp.user.clone())?;
        tracing::info!(username = %resp.user.username, "Console session started");
        Ok(resp.user)
    }

    /// Tell the server and drop the local token; the token is dropped even
    /// when the server cannot be reached.
    pub async fn logout(&mut self) -> Result<(), ConsoleError> {
        let result: Result<Ack, ConsoleError> = self.post("/logout", &()).await;
        self.session.clear()?;
        result.map(|_| ())
    }

    pub async fn dashboard(&self, range: &DateRangeQuery) -> Result<DashboardStats, ConsoleError> {
        let mut params = Vec::new();
        if let Some(from) = &range.from {
            params.push(("from", from.as_str()));
        }
        if let Some(to) = &range.to {
            params.push(("to", to.as_str()));
        }
        let url = Url::parse_with_params(&self.url("/api/dashboard"), &params)
            .map_err(|e| ConsoleError::Decode(e.to_string()))?;
        Self::send(self.request(Method::GET, url)).await
    }

    pub async fn bets(&self) -> Result<Vec<BetDetail>, ConsoleError> {
        self.get("/api/bets").await
    }

    pub async fn payouts(&self) -> Result<Vec<PayoutDetail>, ConsoleError> {
        self.get("/api/payouts").await
    }

    pub async fn update_payout(
        &self,
        id: Uuid,
        input: &UpdatePayout,
    ) -> Result<PayoutDetail, ConsoleError> {
        self.put(&format!("/api/payouts/{id}"), input).await
    }

    pub async fn flights(&self) -> Result<Vec<FlightDetail>, ConsoleError> {
        self.get("/api/flights").await
    }

    pub async fn flight_plans(&self) -> Result<Vec<FlightPlan>, ConsoleError> {
        self.get("/api/flight-plans").await
    }

    pub async fn create_flight_plan(
        &self,
        input: &CreateFlightPlan,
    ) -> Result<FlightPlan, ConsoleError> {
        self.post("/api/flight-plans", input).await
    }

    pub async fn players(&self) -> Result<Vec<Player>, ConsoleError> {
        self.get("/api/players").await
    }

    pub async fn settings(&self) -> Result<Vec<Setting>, ConsoleError> {
        self.get("/api/settings").await
    }
}
