use actix_web::{web, Either, HttpResponse};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::generator::GenerateOptions;
use crate::interfaces::extractor::{
    extract_from_source, ExtractError, ExtractOutcome, SubscriptionSource,
};
use crate::models::LinkResult;
use crate::utils::http_std::FetchOptions;
use crate::Settings;

/// Body of `POST /api/extract`, accepted as JSON or form data
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ExtractRequest {
    /// `url` or `json`; inferred from the other fields when absent
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    /// Subscription URL to fetch
    pub url: Option<String>,
    /// Inline Clash YAML or Sing-box JSON
    pub json_input: Option<String>,
}

/// Query parameters shared by the extract routes
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ExtractQuery {
    /// `text` for a plain-text reply, JSON otherwise
    pub format: Option<String>,
}

impl ExtractQuery {
    fn wants_text(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("text"))
    }
}

#[derive(Serialize, Debug)]
struct ExtractResponse<'a> {
    success: bool,
    message: String,
    summary: String,
    all_links: String,
    nodes: &'a [LinkResult],
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl ExtractRequest {
    fn into_source(self) -> Result<SubscriptionSource, String> {
        let input_type = match self.input_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_ascii_lowercase(),
            _ if self.url.as_deref().is_some_and(|u| !u.trim().is_empty()) => "url".to_string(),
            _ => "json".to_string(),
        };

        match input_type.as_str() {
            "url" => Ok(SubscriptionSource::Url(self.url.unwrap_or_default())),
            "json" => Ok(SubscriptionSource::Inline(self.json_input.unwrap_or_default())),
            "file" => Err(
                "File uploads go to POST /api/extract/upload as the raw request body".to_string(),
            ),
            other => Err(format!("Unsupported inputType: {}", other)),
        }
    }
}

fn error_response(err: &ExtractError) -> HttpResponse {
    let body = ErrorResponse {
        success: false,
        error: err.to_string(),
    };
    match err {
        ExtractError::Fetch(e) => {
            error!("Subscription fetch failed: {}", e);
            HttpResponse::BadGateway().json(body)
        }
        _ => {
            warn!("Extraction failed: {}", err);
            HttpResponse::BadRequest().json(body)
        }
    }
}

fn outcome_response(outcome: &ExtractOutcome, query: &ExtractQuery) -> HttpResponse {
    if query.wants_text() {
        return HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(format!("{}\n\n{}", outcome.all_links(), outcome.summary()));
    }

    HttpResponse::Ok().json(ExtractResponse {
        success: true,
        message: outcome.message(),
        summary: outcome.summary(),
        all_links: outcome.all_links(),
        nodes: &outcome.results,
    })
}

async fn run_extraction(source: SubscriptionSource, query: &ExtractQuery) -> HttpResponse {
    let global = Settings::current();
    let fetch = FetchOptions::from(global.as_ref());
    let options = GenerateOptions::from(global.as_ref());

    match extract_from_source(&source, &fetch, &options).await {
        Ok(outcome) => outcome_response(&outcome, query),
        Err(e) => error_response(&e),
    }
}

/// Handler for `POST /api/extract`
///
/// Only `url` and `json` inputs are accepted here; files are posted to
/// `/api/extract/upload` instead.
pub async fn extract_handler(
    query: web::Query<ExtractQuery>,
    body: Either<web::Json<ExtractRequest>, web::Form<ExtractRequest>>,
) -> HttpResponse {
    let request = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    debug!("Received extract request: {:?}", request);

    match request.into_source() {
        Ok(source) => run_extraction(source, &query).await,
        Err(message) => HttpResponse::BadRequest().json(ErrorResponse {
            success: false,
            error: message,
        }),
    }
}

/// Handler for `POST /api/extract/upload`, the request body is the file
pub async fn upload_handler(query: web::Query<ExtractQuery>, body: web::Bytes) -> HttpResponse {
    debug!("Received upload of {} bytes", body.len());
    run_extraction(SubscriptionSource::Upload(body.to_vec()), &query).await
}

/// Register the API endpoints with Actix Web
pub fn config(cfg: &mut web::ServiceConfig) {
    let limit = Settings::current().max_allowed_upload_size;

    cfg.service(
        web::resource("/api/extract")
            // `Either` buffers the body through `Bytes` before either side parses it
            .app_data(web::PayloadConfig::new(limit))
            .app_data(web::JsonConfig::default().limit(limit))
            .app_data(web::FormConfig::default().limit(limit))
            .route(web::post().to(extract_handler)),
    )
    .service(
        web::resource("/api/extract/upload")
            .app_data(web::PayloadConfig::new(limit))
            .route(web::post().to(upload_handler)),
    );
}
