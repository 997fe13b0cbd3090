use plainweb::http::request::{Method, RequestBuilder};
use plainweb::http::response::StatusCode;
use plainweb::views;

fn request(method: Method, path: &str) -> RequestBuilder {
    RequestBuilder::new().method(method).path(path)
}

fn text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

#[test]
fn test_demo_routes_compile() {
    let router = views::routes().unwrap();

    assert_eq!(router.len(), 6);
    assert!(router.resolve("/user/abc/profile").is_ok());
    assert!(router.resolve("/index.html").is_err());
}

#[test]
fn test_now_renders_html() {
    let response = views::now(&request(Method::GET, "/now").build().unwrap()).unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(text(&response.body).contains("Now: "));
}

#[test]
fn test_show_request_echoes_and_escapes() {
    let req = request(Method::POST, "/show_request")
        .query("a=1")
        .header("X-Test", "<b>")
        .body("payload")
        .build()
        .unwrap();
    let body = text(&views::show_request(&req).unwrap().body);

    assert!(body.contains("POST /show_request?a=1 HTTP/1.1"));
    assert!(body.contains("X-Test: &lt;b&gt;"));
    assert!(body.contains("payload"));
}

#[test]
fn test_parameters_rejects_get() {
    let response = views::parameters(&request(Method::GET, "/parameters").build().unwrap()).unwrap();

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_parameters_echoes_form() {
    let req = request(Method::POST, "/parameters")
        .body("foo=bar&hoge=fuga+piyo")
        .build()
        .unwrap();
    let response = views::parameters(&req).unwrap();

    assert_eq!(response.status, StatusCode::OK);
    let body = text(&response.body);
    assert!(body.contains("foo = bar"));
    assert!(body.contains("hoge = fuga piyo"));
}

#[test]
fn test_user_profile_without_capture_fails() {
    let req = request(Method::GET, "/user/1/profile").build().unwrap();

    assert!(views::user_profile(&req).is_err());
}

#[test]
fn test_login_get_shows_form() {
    let response = views::login(&request(Method::GET, "/login").build().unwrap()).unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(text(&response.body).contains("<form"));
}

#[test]
fn test_login_post_requires_username() {
    let req = request(Method::POST, "/login").body("email=a@b.com").build().unwrap();

    assert_eq!(views::login(&req).unwrap().status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_login_post_sets_cookies() {
    let req = request(Method::POST, "/login")
        .body("username=taro&email=a%40b.com")
        .build()
        .unwrap();
    let response = views::login(&req).unwrap();

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.headers["Location"], "/welcome");
    assert_eq!(response.cookies["username"], "taro");
    assert_eq!(response.cookies["email"], "a@b.com");
}

#[test]
fn test_welcome_reads_cookies() {
    let req = request(Method::GET, "/welcome")
        .header("Cookie", "username=taro; email=a@b.com")
        .build()
        .unwrap();
    let response = views::welcome(&req).unwrap();

    assert_eq!(response.status, StatusCode::OK);
    let body = text(&response.body);
    assert!(body.contains("Welcome, taro!"));
    assert!(body.contains("a@b.com"));
}

#[test]
fn test_welcome_redirects_without_cookie() {
    let response = views::welcome(&request(Method::GET, "/welcome").build().unwrap()).unwrap();

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.headers["Location"], "/login");
}

#[test]
fn test_login_rejects_unsafe_cookie_values() {
    for body in [
        "username=taro%0D%0ASet-Cookie:%20admin=1&email=a",
        "username=taro%3B%20admin%3D1",
        "username=taro&email=a%20b",
        "username=ta%07ro",
    ] {
        let req = request(Method::POST, "/login").body(body).build().unwrap();
        let response = views::login(&req).unwrap();

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(response.cookies.is_empty(), "{body}");
    }
}
