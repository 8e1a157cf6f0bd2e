use crate::config::ForwardSettings;
use crate::domain::model::HttpReply;
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(settings: &ForwardSettings) -> Result<Self> {
        if settings.accept_invalid_certs {
            tracing::debug!("TLS certificate verification disabled for forwarded requests");
        }

        let mut builder = Client::builder().danger_accept_invalid_certs(settings.accept_invalid_certs);
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        tracing::debug!("Forward response status: {}", status);

        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}
