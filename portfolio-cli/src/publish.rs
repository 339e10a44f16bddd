//! HTTP publisher for portfolio reports.

use crate::CliResult;
use log::info;
use portfolio_core::PortfolioReport;
use reqwest::Client;

/// Where a report is published.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublishTarget {
    /// Endpoint receiving the JSON report.
    pub url: String,
    /// Bearer token sent with the request.
    pub token: Option<String>,
}

impl PublishTarget {
    /// Build a target, rejecting blank URLs and dropping blank tokens.
    pub fn new(url: &str, token: Option<String>) -> CliResult<Self> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err("publish url cannot be empty".into());
        }
        let token = token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        Ok(Self {
            url: url.to_string(),
            token,
        })
    }
}

/// Build the HTTP client used for publishing.
pub fn build_client() -> CliResult<Client> {
    Ok(Client::builder().user_agent("portfolio-cli").build()?)
}

/// POST the report as JSON to the target.
pub async fn publish_report(
    client: &Client,
    target: &PublishTarget,
    report: &PortfolioReport,
) -> CliResult<()> {
    let mut request = client
        .post(&target.url)
        .header("Accept", "application/json")
        .json(report);
    if let Some(token) = &target.token {
        request = request.bearer_auth(token);
    }
    request.send().await?.error_for_status()?;
    info!(
        "published report for {} repositories to {}",
        report.repositories_analyzed, target.url
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PublishTarget, build_client, publish_report};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use portfolio_core::PortfolioReport;

    #[test]
    fn target_trims_url_and_drops_blank_token() {
        let target = PublishTarget::new(" https://reports.example.com/ ", Some("  ".to_string()))
            .expect("target");
        assert_eq!(target.url, "https://reports.example.com");
        assert_eq!(target.token, None);

        assert!(PublishTarget::new("   ", None).is_err());
    }

    #[tokio::test]
    async fn publish_posts_json_with_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/reports")
                    .header("authorization", "Bearer secret")
                    .header("content-type", "application/json")
                    .json_body_partial(r#"{"repositories_analyzed": 2}"#);
                then.status(202);
            })
            .await;

        let report = PortfolioReport {
            repositories_analyzed: 2,
            ..PortfolioReport::default()
        };
        let target = PublishTarget::new(&server.url("/reports"), Some("secret".to_string()))
            .expect("target");
        let client = build_client().expect("client");

        publish_report(&client, &target, &report)
            .await
            .expect("publish");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn publish_surfaces_server_errors() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/reports");
                then.status(500);
            })
            .await;

        let target = PublishTarget::new(&server.url("/reports"), None).expect("target");
        let client = build_client().expect("client");

        let result = publish_report(&client, &target, &PortfolioReport::default()).await;
        assert!(result.is_err());
        mock.assert_async().await;
    }
}
