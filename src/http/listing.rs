//! HTML listings for directories that have no `index.html`.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Response, StatusCode},
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a file name becomes a relative href.
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A single directory entry as shown in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Build a listing response for the directory `request_path` names under `root`.
///
/// Returns `None` when the method is not GET/HEAD, the path escapes the root,
/// or it does not name a readable directory.
pub async fn directory_listing(
    root: &Path,
    request_path: &str,
    method: &Method,
) -> Option<Response<Body>> {
    if method != Method::GET && method != Method::HEAD {
        return None;
    }

    let relative = normalize_target(request_path)?;
    let dir = root.join(relative);

    let entries = match read_entries(&dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %dir.display(), error = %e, "No listing for path");
            return None;
        }
    };

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(render_listing(&entries))
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    Some(response)
}

/// Decode a request path into a path relative to the content root.
///
/// `..` anywhere in the decoded path rejects the request.
pub fn normalize_target(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    let mut normalized = PathBuf::new();
    for component in Path::new(decoded.trim_matches('/')).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(segment) => normalized.push(segment),
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }

    Some(normalized)
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let is_dir = entry.file_type().await?.is_dir();
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Render entries as a bare `<pre>` list of links, directories slash-terminated.
pub fn render_listing(entries: &[ListingEntry]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );

    for entry in entries {
        let mut name = entry.name.clone();
        if entry.is_dir {
            name.push('/');
        }
        let href = utf8_percent_encode(&name, HREF).to_string();

        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            encode_double_quoted_attribute(&href),
            encode_text(&name)
        ));
    }

    html.push_str("</pre>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool) -> ListingEntry {
        ListingEntry {
            name: name.into(),
            is_dir,
        }
    }

    #[test]
    fn normalizes_request_paths() {
        assert_eq!(normalize_target("/"), Some(PathBuf::new()));
        assert_eq!(normalize_target("/pub/"), Some(PathBuf::from("pub")));
        assert_eq!(
            normalize_target("/my%20files/./x/"),
            Some(PathBuf::from("my files/x"))
        );
    }

    #[test]
    fn rejects_parent_components() {
        assert_eq!(normalize_target("/../etc/"), None);
        assert_eq!(normalize_target("/pub/%2e%2e/%2E%2E/"), None);
        assert_eq!(normalize_target("/%ff/"), None);
    }

    #[test]
    fn renders_escaped_links() {
        let html = render_listing(&[
            entry("a&b.html", false),
            entry("my notes.txt", false),
            entry("<sub>", true),
        ]);

        assert_eq!(
            html,
            "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n\
             <a href=\"a&amp;b.html\">a&amp;b.html</a>\n\
             <a href=\"my%20notes.txt\">my notes.txt</a>\n\
             <a href=\"%3Csub%3E/\">&lt;sub&gt;/</a>\n\
             </pre>\n"
        );
    }

    #[test]
    fn empty_directory_renders_empty_list() {
        assert!(render_listing(&[]).ends_with("<pre>\n</pre>\n"));
    }

    #[tokio::test]
    async fn only_get_and_head_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(directory_listing(dir.path(), "/", &Method::POST).await.is_none());
        assert!(directory_listing(dir.path(), "/", &Method::GET).await.is_some());
        assert!(directory_listing(dir.path(), "/missing/", &Method::GET)
            .await
            .is_none());
    }
}
