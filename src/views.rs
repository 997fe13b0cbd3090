//! Demo application handlers.
//!
//! These sit outside the HTTP core and only use the public handler
//! contract: read the request, return a response.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::routing::{PatternError, Router};

/// The demo route table. Anything not listed here is served from the
/// static root.
pub fn routes() -> Result<Router, PatternError> {
    Router::builder()
        .route("/now", now)
        .route("/show_request", show_request)
        .route("/parameters", parameters)
        .route("/user/<user_id>/profile", user_profile)
        .route("/login", login)
        .route("/welcome", welcome)
        .build()
}

pub fn now(_request: &Request) -> anyhow::Result<Response> {
    let now = OffsetDateTime::now_utc().format(&Rfc2822)?;
    Ok(Response::html(page(&format!("<h1>Now: {now}</h1>"))))
}

pub fn show_request(request: &Request) -> anyhow::Result<Response> {
    let mut headers: Vec<_> = request.headers.iter().collect();
    headers.sort();
    let headers = headers
        .into_iter()
        .map(|(k, v)| format!("{}: {}", escape_html(k), escape_html(v)))
        .collect::<Vec<_>>()
        .join("\n");

    let body = String::from_utf8_lossy(&request.body);

    Ok(Response::html(page(&format!(
        "<h1>Request Line:</h1>\n<p>{} {} {}</p>\n\
         <h1>Headers:</h1>\n<pre>{}</pre>\n\
         <h1>Body:</h1>\n<pre>{}</pre>",
        request.method,
        escape_html(&request.target()),
        escape_html(&request.version),
        headers,
        escape_html(&body),
    ))))
}

/// Echoes POSTed form fields; other methods get 405.
pub fn parameters(request: &Request) -> anyhow::Result<Response> {
    if request.method != Method::POST {
        return Ok(Response::method_not_allowed());
    }

    let params = request
        .form_params()
        .into_iter()
        .map(|(k, v)| format!("{} = {}", escape_html(&k), escape_html(&v)))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Response::html(page(&format!("<h1>Parameters:</h1>\n<pre>{params}</pre>"))))
}

pub fn user_profile(request: &Request) -> anyhow::Result<Response> {
    let user_id = request
        .param("user_id")
        .ok_or_else(|| anyhow::anyhow!("route did not capture user_id"))?;

    Ok(Response::html(page(&format!(
        "<h1>Profile</h1>\n<p>ID: {}</p>",
        escape_html(user_id)
    ))))
}

/// GET shows the form; POST stores `username` and `email` in cookies and
/// redirects to `/welcome`.
pub fn login(request: &Request) -> anyhow::Result<Response> {
    match request.method {
        Method::GET => Ok(Response::html(page(
            "<h1>Login</h1>\n\
             <form action=\"/login\" method=\"post\">\n\
             <p>username: <input type=\"text\" name=\"username\"></p>\n\
             <p>email: <input type=\"text\" name=\"email\"></p>\n\
             <input type=\"submit\" value=\"login\">\n\
             </form>",
        ))),
        Method::POST => {
            let params = request.form_params();
            let field = |name: &str| {
                params
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
            };

            let Some(username) = field("username").filter(|u| !u.is_empty()) else {
                return Ok(Response::bad_request());
            };
            let email = field("email");
            if !is_cookie_value(&username) || !email.as_deref().is_none_or(is_cookie_value) {
                return Ok(Response::bad_request());
            }

            let mut response = Response::redirect("/welcome");
            response.cookies.insert("username".to_string(), username);
            if let Some(email) = email {
                response.cookies.insert("email".to_string(), email);
            }
            Ok(response)
        }
        _ => Ok(Response::method_not_allowed()),
    }
}

/// Greets the user from cookies, or sends them to `/login`.
pub fn welcome(request: &Request) -> anyhow::Result<Response> {
    let Some(username) = request.cookie("username") else {
        return Ok(Response::redirect("/login"));
    };
    let email = request.cookie("email").unwrap_or("");

    Ok(Response::html(page(&format!(
        "<h1>Welcome, {}!</h1>\n<p>email: {}</p>",
        escape_html(username),
        escape_html(email)
    ))))
}

/// Cookie values may not carry controls, whitespace or cookie delimiters.
fn is_cookie_value(value: &str) -> bool {
    value
        .chars()
        .all(|c| !c.is_control() && !c.is_whitespace() && !matches!(c, ';' | ',' | '"' | '\\'))
}

fn page(inner: &str) -> String {
    format!("<html>\n<body>\n{inner}\n</body>\n</html>\n")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
