//! Pulls a human-readable message out of an error response body.
use serde::Deserialize;

const SNIPPET_MAX: usize = 500;

pub(crate) fn extract_error_message(body: &[u8]) -> String {
    // Twitter v1.1: {"errors":[{"code":34,"message":"..."}]}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize)]
    struct TwErr {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: String,
    }

    // Personality Insights: {"code":400,"sub_code":"S00005","error":"..."}
    // and the generic {"message":".."} / {"detail":".."} shapes.
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        error: Option<serde_json::Value>,
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            if !first.message.is_empty() {
                return match first.code {
                    Some(code) => format!("{} (code {code})", first.message),
                    None => first.message,
                };
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        match m.error {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s,
            Some(serde_json::Value::Object(obj)) => {
                if let Some(serde_json::Value::String(s)) = obj.get("message") {
                    return s.clone();
                }
            }
            _ => {}
        }
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.detail.is_empty() {
            return m.detail;
        }
    }
    snip_body(body)
}

pub(crate) fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
