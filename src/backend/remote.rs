use std::time::Duration;

use anyhow::Context;
use log::{debug, trace};
use reqwest::header::CACHE_CONTROL;
use serde::{Deserialize, Serialize};

use super::{Backend, SubmitError};
use crate::models::{BookId, Comment, CommentDraft, Summary};
use crate::utils::date::now_millis;

/// Ratings and comments served by the showcase API.
///
/// ```text
/// GET  {base}/api/books/{id}/summary   -> {"avg": 4.5, "count": 2}
/// GET  {base}/api/books/{id}/comments  -> {"comments": [...]}
/// POST {base}/api/books/{id}/rate      <- {"stars": 4}
/// POST {base}/api/books/{id}/comment   <- {"name", "email", "text", "turnstileToken"}
/// ```
pub struct RemoteBackend {
    base: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct RateBody {
    stars: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentBody<'a> {
    name: &'a str,
    email: &'a str,
    text: &'a str,
    turnstile_token: &'a str,
}

#[derive(Deserialize)]
struct CommentsReply {
    #[serde(default)]
    comments: Option<Vec<Comment>>,
}

#[derive(Deserialize, Default)]
struct SubmitReply {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteBackend {
    pub fn new(base: &str) -> anyhow::Result<RemoteBackend> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(RemoteBackend {
            base: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, book: &BookId, tail: &str) -> String {
        format!(
            "{}/api/books/{}/{}",
            self.base,
            urlencoding::encode(book.as_str()),
            tail
        )
    }

    fn post<T: Serialize>(&self, url: &str, body: &T) -> anyhow::Result<(bool, String)> {
        let res = self
            .client
            .post(url)
            .json(body)
            .send()
            .with_context(|| format!("POST {}", url))?;

        let success = res.status().is_success();
        let text = res.text()?;

        debug!("POST {} -> success = {}", url, success);

        Ok((success, text))
    }
}

pub(crate) fn parse_summary(text: &str) -> anyhow::Result<Summary> {
    let summary = serde_json::from_str::<Summary>(text)?;

    Ok(Summary { mine: 0, ..summary })
}

pub(crate) fn parse_comments(text: &str) -> anyhow::Result<Vec<Comment>> {
    let reply = serde_json::from_str::<CommentsReply>(text)?;

    Ok(reply.comments.unwrap_or_default())
}

/// Error message out of a failed reply, when the body carries one.
pub(crate) fn parse_rejection(text: &str) -> Option<String> {
    serde_json::from_str::<SubmitReply>(text)
        .ok()
        .and_then(|reply| reply.error)
        .filter(|e| !e.trim().is_empty())
}

pub(crate) fn parse_comment_reply(text: &str) -> Result<(), SubmitError> {
    let reply = serde_json::from_str::<SubmitReply>(text).unwrap_or_default();

    match reply.ok {
        Some(true) => Ok(()),
        _ => Err(SubmitError::Rejected(
            reply.error.filter(|e| !e.trim().is_empty()),
        )),
    }
}

impl Backend for RemoteBackend {
    fn summary(&self, book: &BookId) -> anyhow::Result<Summary> {
        trace!("RemoteBackend::summary()");
        let url = format!("{}?t={}", self.url(book, "summary"), now_millis());

        let text = self
            .client
            .get(url.as_str())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .text()?;

        parse_summary(&text).with_context(|| format!("summary of {}", book))
    }

    fn comments(&self, book: &BookId) -> anyhow::Result<Vec<Comment>> {
        trace!("RemoteBackend::comments()");
        let url = self.url(book, "comments");

        let text = self
            .client
            .get(url.as_str())
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .text()?;

        parse_comments(&text).with_context(|| format!("comments of {}", book))
    }

    fn rate(&self, book: &BookId, stars: u8, _token: &str) -> Result<(), SubmitError> {
        trace!("RemoteBackend::rate()");
        let (success, text) = self.post(&self.url(book, "rate"), &RateBody { stars })?;

        if !success {
            return Err(SubmitError::Rejected(parse_rejection(&text)));
        }

        Ok(())
    }

    fn comment(
        &self,
        book: &BookId,
        draft: &CommentDraft,
        token: &str,
    ) -> Result<(), SubmitError> {
        trace!("RemoteBackend::comment()");
        let body = CommentBody {
            name: &draft.name,
            email: &draft.email,
            text: &draft.text,
            turnstile_token: token,
        };

        let (_, text) = self.post(&self.url(book, "comment"), &body)?;

        parse_comment_reply(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_comment_reply, parse_comments, parse_rejection, parse_summary, CommentBody,
        RemoteBackend,
    };
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use crate::backend::{Backend, SubmitError};
    use crate::models::BookId;

    /// Answers a single request with `status` and a JSON `body`.
    fn serve_once(status: &'static str, body: &'static str) -> anyhow::Result<RemoteBackend> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let mut head: Vec<u8> = vec![];

                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Ok(RemoteBackend {
            base: format!("http://{}", addr),
            client: reqwest::blocking::Client::builder().no_proxy().build()?,
        })
    }

    #[test]
    fn urls() -> anyhow::Result<()> {
        let backend = RemoteBackend::new("https://api.example.org/")?;

        assert_eq!(
            "https://api.example.org/api/books/7/summary",
            backend.url(&BookId::from("7"), "summary")
        );
        assert_eq!(
            "https://api.example.org/api/books/a%20b/comments",
            backend.url(&BookId::from("a b"), "comments")
        );

        Ok(())
    }

    #[test]
    fn summary_from_server() -> anyhow::Result<()> {
        let backend = serve_once("200 OK", r#"{"avg": 4.5, "count": 2}"#)?;

        let summary = backend.summary(&BookId::from("1"))?;

        assert_eq!(4.5, summary.avg);
        assert_eq!(2, summary.count);

        Ok(())
    }

    #[test]
    fn summary_error_status_is_a_failure() -> anyhow::Result<()> {
        let backend = serve_once("500 Internal Server Error", r#"{"error": "db down"}"#)?;

        assert!(backend.summary(&BookId::from("1")).is_err());

        Ok(())
    }

    #[test]
    fn comments_error_status_is_a_failure() -> anyhow::Result<()> {
        let backend = serve_once("503 Service Unavailable", r#"{"error": "db down"}"#)?;

        assert!(backend.comments(&BookId::from("1")).is_err());

        Ok(())
    }

    #[test]
    fn summary_reply() -> anyhow::Result<()> {
        let summary = parse_summary(r#"{"avg": 3.5, "count": 4, "mine": 5}"#)?;

        assert_eq!(3.5, summary.avg);
        assert_eq!(4, summary.count);
        assert_eq!(0, summary.mine);

        assert!(parse_summary("<html>502</html>").is_err());

        Ok(())
    }

    #[test]
    fn comments_reply() -> anyhow::Result<()> {
        let comments = parse_comments(
            r#"{"comments": [{"id": "1", "name": "Ann", "text": "Great", "createdAt": 1700000000000}]}"#,
        )?;

        assert_eq!(1, comments.len());
        assert_eq!("Ann", comments[0].name);

        assert!(parse_comments("{}")?.is_empty());
        assert!(parse_comments(r#"{"comments": null}"#)?.is_empty());

        Ok(())
    }

    #[test]
    fn rejection_message() -> anyhow::Result<()> {
        assert_eq!(
            Some(String::from("Too many ratings")),
            parse_rejection(r#"{"error": "Too many ratings"}"#)
        );
        assert_eq!(None, parse_rejection(r#"{"error": ""}"#));
        assert_eq!(None, parse_rejection("Internal Server Error"));

        Ok(())
    }

    #[test]
    fn comment_reply() -> anyhow::Result<()> {
        assert!(parse_comment_reply(r#"{"ok": true}"#).is_ok());

        match parse_comment_reply(r#"{"ok": false, "error": "Bad token"}"#) {
            Err(SubmitError::Rejected(Some(message))) => assert_eq!("Bad token", message),
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            parse_comment_reply("gateway timeout"),
            Err(SubmitError::Rejected(None))
        ));

        Ok(())
    }

    #[test]
    fn comment_body_uses_wire_names() -> anyhow::Result<()> {
        let body = CommentBody {
            name: "Ann",
            email: "ann@example.org",
            text: "Great",
            turnstile_token: "tok",
        };

        let json = serde_json::to_value(&body)?;

        assert_eq!("tok", json["turnstileToken"]);
        assert_eq!("Ann", json["name"]);

        Ok(())
    }
}
