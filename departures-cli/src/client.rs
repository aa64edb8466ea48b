use departures_core::Airport;
use departures_engine::Flight;
use serde::Deserialize;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum BoardCliError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("server returned an error: {0}")]
    Server(String),
    #[error("{0}")]
    Validation(String),
}

impl From<reqwest::Error> for BoardCliError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}

/// Read-only client for a running departures server.
pub struct BoardClient {
    base_url: Url,
    http: reqwest::Client,
}

impl BoardClient {
    pub fn new(base_url: &str) -> Result<Self, BoardCliError> {
        let url = Url::parse(base_url)
            .map_err(|err| BoardCliError::Validation(format!("invalid server URL: {err}")))?;
        Ok(Self {
            base_url: url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BoardCliError> {
        self.base_url
            .join(path)
            .map_err(|err| BoardCliError::Validation(format!("invalid path: {err}")))
    }

    pub async fn schedule(&self) -> Result<Vec<Flight>, BoardCliError> {
        let url = self.endpoint("/schedule")?;
        let response = self.http.get(url).send().await?;
        parse_response(response).await
    }

    pub async fn airports(&self) -> Result<Vec<Airport>, BoardCliError> {
        let url = self.endpoint("/airports")?;
        let response = self.http.get(url).send().await?;
        parse_response(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: String,
}

async fn parse_response<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, BoardCliError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| BoardCliError::Http(err.to_string()))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(err) = serde_json::from_str::<ServerError>(&body) {
            Err(BoardCliError::Server(format!("{status}: {}", err.error)))
        } else {
            Err(BoardCliError::Server(format!("{status}: {body}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use departures_engine::Remarks;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_schedule_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "time": "2024-05-01T14:35:00Z",
                    "airline": "AC",
                    "flight": "0871",
                    "airport": "YUL",
                    "gate": "B07",
                    "delay": 15,
                    "cancelled": false,
                    "minutes": 42,
                    "remarks": "delayed"
                }
            ])))
            .mount(&server)
            .await;

        let client = BoardClient::new(&server.uri()).expect("client");
        let flights = client.schedule().await.expect("schedule");

        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].airline_code, "AC");
        assert_eq!(flights[0].delay_minutes, 15);
        assert_eq!(flights[0].minutes_until_departure, Some(42));
        assert_eq!(flights[0].remarks, Some(Remarks::Delayed));
    }

    #[tokio::test]
    async fn airports_keep_extra_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/airports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"code": "CDG", "country": "FR", "featured": true, "names": {"en": "Paris"}}
            ])))
            .mount(&server)
            .await;

        let client = BoardClient::new(&server.uri()).expect("client");
        let airports = client.airports().await.expect("airports");

        assert_eq!(airports[0].featured, Some(true));
        assert_eq!(airports[0].extra["names"]["en"], "Paris");
    }

    #[tokio::test]
    async fn surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"error": "warming up"})),
            )
            .mount(&server)
            .await;

        let client = BoardClient::new(&server.uri()).expect("client");
        let err = client.schedule().await.unwrap_err();

        match err {
            BoardCliError::Server(message) => {
                assert!(message.starts_with("503"), "{message}");
                assert!(message.ends_with("warming up"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_server_url() {
        assert!(matches!(
            BoardClient::new("not a url"),
            Err(BoardCliError::Validation(_))
        ));
    }
}
