//
//  wsapi-client
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Small helpers shared by the transport and the session facade.
//!
//! ## Categories
//!
//! - **URL Utilities**: [`join_url`]
//! - **Logging Utilities**: [`mask_secret`], [`truncate`]
//!
//! ## Example
//!
//! ```rust
//! use wsapi_client::util::{join_url, mask_secret};
//!
//! let url = join_url(&["https://rally1.rallydev.com/slm/webservice/", "v3.0", "User/1"]);
//! assert_eq!(url, "https://rally1.rallydev.com/slm/webservice/v3.0/User/1");
//!
//! assert_eq!(mask_secret("deadbeefdeadbeef"), "dead...beef");
//! ```

/// Joins URL segments with exactly one `/` between them.
///
/// Leading and trailing slashes at each boundary are collapsed, so a base URL
/// may or may not end with `/`. Empty segments are skipped.
///
/// # Example
///
/// ```rust
/// use wsapi_client::util::join_url;
///
/// assert_eq!(join_url(&["https://host/base", "v3.0", "/Project/1/"]), "https://host/base/v3.0/Project/1/");
/// assert_eq!(join_url(&["https://host/base/", "", "User"]), "https://host/base/User");
/// ```
pub fn join_url(segments: &[&str]) -> String {
    let mut url = String::new();

    for segment in segments.iter().filter(|segment| !segment.is_empty()) {
        if url.is_empty() {
            url.push_str(segment);
            continue;
        }
        let trimmed = url.trim_end_matches('/').len();
        url.truncate(trimmed);
        url.push('/');
        url.push_str(segment.trim_start_matches('/'));
    }

    url
}

/// Masks a secret for logging, keeping four characters at each end.
///
/// Secrets of twelve characters or fewer are fully replaced.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Truncates a string to at most `max_len` characters, adding an ellipsis
/// when something was cut. Used to keep response bodies short in debug logs.
///
/// # Example
///
/// ```rust
/// use wsapi_client::util::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("short", 3), "sho");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}
