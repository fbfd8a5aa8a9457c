use actix_web::{
    body::MessageBody,
    http::{Method, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use log::debug;

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    request(Method::GET, path, None, configure).await
}

pub async fn post_request<F>(path: &str, body: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    request(Method::POST, path, Some(body), configure).await
}

pub async fn request<F>(method: Method, path: &str, body: Option<&str>, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let mut req = TestRequest::default().method(method).uri(path);
    if let Some(body) = body {
        req = req.insert_header(("Content-Type", "application/json")).set_payload(body.to_string());
    }
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request to {path}");
    let (_, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
