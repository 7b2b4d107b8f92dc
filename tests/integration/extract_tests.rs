//! Schema extraction against a mock form host

use crate::test_user_agent;
use formcast::http::build_http_client;
use formcast::schema::{extract, QuestionKind};
use formcast::{ExtractError, FetchError, ParseError};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM_PAGE: &str = r#"<html><head><title>Survey</title></head><body>
<form action="formResponse" method="POST">
    <input type="hidden" name="fvv" value="1">
    <input type="hidden" name="fbzx" value="-7331">
    <input type="hidden" name="pageHistory" value="0">
</form>
<script type="text/javascript">var FB_PUBLIC_LOAD_DATA_ = [null,[null,[
    [111,"What is your email?",null,0,[[2001,null,1]]],
    [112,"Pick a side",null,2,[[2002,[["Left"],["Right"]],1]]],
    [113,"Toppings",null,4,[[2003,[["Cheese"],["Olives"],["Basil"]],0]]],
    [114,"Section header",null,8,null]
]],"/forms","Survey"];
</script></body></html>"#;

fn client() -> reqwest::Client {
    build_http_client(&test_user_agent(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_extract_schema_from_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/forms/d/e/abc/viewform"))
        .and(header(
            "user-agent",
            "TestClient/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(FORM_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let form_url = format!("{}/forms/d/e/abc/viewform", base_url);
    let schema = extract(&client(), &form_url).await.unwrap();

    assert_eq!(schema.url, form_url);
    assert_eq!(
        schema.submission_url,
        format!("{}/forms/d/e/abc/formResponse", base_url)
    );
    assert_eq!(schema.len(), 3);

    let email = schema.question("entry.2001").unwrap();
    assert_eq!(email.kind, QuestionKind::FreeText);
    assert_eq!(email.text, "What is your email?");

    let side = schema.question("entry.2002").unwrap();
    assert_eq!(side.kind, QuestionKind::SingleChoice);
    assert_eq!(side.options, vec!["Left", "Right"]);

    let toppings = schema.question("entry.2003").unwrap();
    assert_eq!(toppings.kind, QuestionKind::MultiChoice);
    assert!(!toppings.required);

    assert_eq!(schema.hidden_fields.len(), 3);
    assert_eq!(
        schema.hidden_fields.get("fbzx").map(String::as_str),
        Some("-7331")
    );
}

#[tokio::test]
async fn test_redirect_resolves_submission_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/s/short"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/forms/d/e/real/viewform", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forms/d/e/real/viewform"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FORM_PAGE))
        .mount(&mock_server)
        .await;

    let schema = extract(&client(), &format!("{}/s/short", base_url))
        .await
        .unwrap();

    assert_eq!(
        schema.submission_url,
        format!("{}/forms/d/e/real/formResponse", base_url)
    );
}

#[tokio::test]
async fn test_rate_limited_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let result = extract(
        &client(),
        &format!("{}/forms/d/e/abc/viewform", mock_server.uri()),
    )
    .await;

    assert!(matches!(
        result,
        Err(ExtractError::Fetch(FetchError::RateLimited { .. }))
    ));
}

#[tokio::test]
async fn test_server_error_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = extract(
        &client(),
        &format!("{}/forms/d/e/abc/viewform", mock_server.uri()),
    )
    .await;

    assert!(matches!(
        result,
        Err(ExtractError::Fetch(FetchError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_page_without_blob() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Sign in</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let result = extract(
        &client(),
        &format!("{}/forms/d/e/abc/viewform", mock_server.uri()),
    )
    .await;

    assert!(matches!(
        result,
        Err(ExtractError::Parse(ParseError::BlobNotFound))
    ));
}

#[tokio::test]
async fn test_malformed_blob() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<script>var FB_PUBLIC_LOAD_DATA_ = [null,{"not":"a list"}];</script>"#,
        ))
        .mount(&mock_server)
        .await;

    let result = extract(
        &client(),
        &format!("{}/forms/d/e/abc/viewform", mock_server.uri()),
    )
    .await;

    assert!(matches!(result, Err(ExtractError::Parse(_))));
}
