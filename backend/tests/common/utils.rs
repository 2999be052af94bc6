use axum::{
    http::{header, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use uuid::Uuid;

pub const MULTIPART_BOUNDARY: &str = "gallery-test-boundary";

/// Builds a `multipart/form-data` body with one part
pub fn multipart_body(
    field: &str,
    file_name: Option<&str>,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());

    match file_name {
        Some(file_name) => {
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        None => {
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{field}\"\r\n").as_bytes(),
            );
        }
    }

    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Collects a response body into a string
pub async fn body_string(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Asserts a `303 See Other` redirect to `location`
pub fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        location
    );
}

/// Random file name so concurrent runs against a shared bucket don't collide
pub fn unique_file_name(extension: &str) -> String {
    format!("test-{}.{extension}", Uuid::new_v4().simple())
}
