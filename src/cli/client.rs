use anyhow::{anyhow, bail, Context};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Thin JSON client over the Movies API.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> anyhow::Result<Self> {
        if base.cannot_be_a_base() {
            bail!("Server URL cannot be used as a base: {}", base);
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { http, base })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Server URL cannot be used as a base: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    pub async fn get(&self, url: Url) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, url)).await
    }

    pub async fn delete(&self, url: Url) -> anyhow::Result<Value> {
        self.send(self.request(Method::DELETE, url)).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> anyhow::Result<Value> {
        self.send(self.request(Method::POST, url).json(body)).await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> anyhow::Result<Value> {
        self.send(self.request(Method::PATCH, url).json(body)).await
    }

    /// Sends the request and turns any non-2xx status into an error carrying the server's message.
    pub async fn send(&self, request: RequestBuilder) -> anyhow::Result<Value> {
        let response = request.send().await.context("Request to Movies API failed")?;
        read_json(response).await
    }
}

async fn read_json(response: Response) -> anyhow::Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    let body: Value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    if status.is_success() {
        return Ok(body);
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    bail!("{} {}", status, message)
}
