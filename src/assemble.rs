//! Compiles a [`RequestDescriptor`] into a transport-ready
//! [`WireRequest`].

use url::Url;

use crate::descriptor::{BodyEncoding, RequestDescriptor};
use crate::header;
use crate::multipart::{self, Boundary};
use crate::transport::WireRequest;
use crate::{Error, Result};

/// Assembles `descriptor` into a wire request.
///
/// A path that does not parse as a URL (after the query string, if any, is
/// appended) is the only hard failure. An empty encoder output — an absent
/// bag, a bag with no encodable pairs — degrades to "no body" instead.
pub fn assemble(descriptor: &RequestDescriptor) -> Result<WireRequest> {
    let mut target = descriptor.path().to_string();
    if let Some(query) = descriptor.query.as_ref().and_then(|bag| bag.query_string()) {
        target.push('?');
        target.push_str(&query);
    }
    let url = Url::parse(&target).map_err(|_| Error::InvalidRequest)?;

    let mut request = WireRequest::new(url, descriptor.method().verb());
    for (name, value) in &descriptor.headers {
        request.set_header(name.as_ref(), value.as_ref());
    }
    apply_body(descriptor, &mut request);
    Ok(request)
}

fn apply_body(descriptor: &RequestDescriptor, request: &mut WireRequest) {
    match descriptor.body_encoding() {
        BodyEncoding::None => {}
        BodyEncoding::Json => {
            if let Some(bytes) = descriptor.body.as_ref().and_then(|bag| bag.json_bytes()) {
                request.set_header(header::CONTENT_TYPE, "application/json");
                request.body = Some(bytes);
            }
        }
        BodyEncoding::FormUrlEncoded => {
            request.set_header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            if let Some(form) = descriptor.body.as_ref().and_then(|bag| bag.query_string()) {
                request.body = Some(form.into_bytes());
            }
        }
        BodyEncoding::FormData => {
            apply_multipart(descriptor, request, "application/form-data");
        }
        BodyEncoding::MultipartFormData => {
            apply_multipart(descriptor, request, "multipart/form-data");
        }
    }
}

/// Builds the multipart body: field parts, then file parts, then the
/// closing marker, appended exactly once.
fn apply_multipart(descriptor: &RequestDescriptor, request: &mut WireRequest, content_type: &str) {
    let boundary = Boundary::generate();
    request.set_header(
        header::CONTENT_TYPE,
        format!("{content_type}; boundary={boundary}"),
    );

    let mut body = Vec::new();
    let pairs = descriptor
        .body
        .as_ref()
        .map(|bag| bag.form_pairs())
        .unwrap_or_default();
    if let Some(fields) = multipart::field_parts(&pairs, &boundary) {
        body.extend_from_slice(&fields);
    }
    if let Some(files) = descriptor
        .files
        .as_ref()
        .and_then(|files| files.file_parts(&boundary))
    {
        body.extend_from_slice(&files);
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    request.body = Some(body);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::multipart::{FileAttachment, FileSet};
    use crate::params::ParamBag;

    fn with_query(descriptor: RequestDescriptor, tree: serde_json::Value) -> RequestDescriptor {
        let mut descriptor = descriptor;
        descriptor.query = Some(ParamBag::from_tree(tree));
        descriptor
    }

    #[test]
    fn query_string_is_appended_to_the_path() {
        let descriptor = with_query(
            RequestDescriptor::get("https://api.example.com/items"),
            json!({"page": 2}),
        );
        let request = assemble(&descriptor).unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/items?page=2");
        assert_eq!(request.verb, "GET");
        assert_eq!(request.body, None);
    }

    #[test]
    fn empty_query_leaves_the_path_untouched() {
        let descriptor = with_query(
            RequestDescriptor::get("https://api.example.com/items"),
            json!({}),
        );
        let request = assemble(&descriptor).unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/items");
    }

    #[test]
    fn unparseable_path_is_the_only_hard_failure() {
        let err = assemble(&RequestDescriptor::get("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest));

        // Missing body parameters degrade to "no body".
        let descriptor = RequestDescriptor::post("https://api.example.com/items")
            .with_body_encoding(BodyEncoding::Json);
        let request = assemble(&descriptor).unwrap();
        assert_eq!(request.body, None);
        assert_eq!(request.header("content-type"), None);
    }

    #[test]
    fn json_body_sets_content_type_only_when_produced() {
        let mut descriptor = RequestDescriptor::post("https://api.example.com/items");
        descriptor.body = Some(ParamBag::from_tree(json!({"title": "hi"})));
        descriptor.body_encoding = BodyEncoding::Json;
        let request = assemble(&descriptor).unwrap();
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(br#"{"title":"hi"}"# as &[u8]));
    }

    #[test]
    fn form_urlencoded_body_reuses_the_query_encoding() {
        let mut descriptor = RequestDescriptor::post("https://api.example.com/login");
        descriptor.body = Some(ParamBag::from_tree(json!({"user": "a b"})));
        descriptor.body_encoding = BodyEncoding::FormUrlEncoded;
        let request = assemble(&descriptor).unwrap();
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body.as_deref(), Some(b"user=a%20b" as &[u8]));
    }

    #[test]
    fn caller_headers_apply_in_order_with_last_write_winning() {
        let descriptor = RequestDescriptor::get("https://api.example.com")
            .with_header("X-Token", "one")
            .with_header("x-token", "two");
        let request = assemble(&descriptor).unwrap();
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("x-token"), Some("two"));
    }

    #[test]
    fn body_content_type_overrides_a_caller_header() {
        let mut descriptor = RequestDescriptor::post("https://api.example.com")
            .with_header("content-type", "text/plain");
        descriptor.body = Some(ParamBag::from_tree(json!({"k": "v"})));
        descriptor.body_encoding = BodyEncoding::Json;
        let request = assemble(&descriptor).unwrap();
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    fn closing_marker_count(body: &[u8], boundary: &str) -> usize {
        let marker = format!("--{boundary}--\r\n");
        String::from_utf8_lossy(body).matches(&marker).count()
    }

    fn boundary_of(request: &WireRequest) -> String {
        request
            .header("content-type")
            .and_then(|value| value.split_once("boundary="))
            .map(|(_, boundary)| boundary.to_string())
            .unwrap()
    }

    #[test]
    fn multipart_body_terminates_exactly_once() {
        // Parameters and files, parameters only, files only, neither.
        let files = FileSet::new("f", vec![FileAttachment::new("a.txt", vec![0x46])]);
        let cases = [
            (Some(json!({"k": "v"})), Some(files.clone())),
            (Some(json!({"k": "v"})), None),
            (None, Some(files)),
            (None, None),
        ];
        for (tree, files) in cases {
            let mut descriptor = RequestDescriptor::upload("https://api.example.com/files");
            descriptor.body = tree.map(ParamBag::from_tree);
            descriptor.files = files;
            let request = assemble(&descriptor).unwrap();
            let boundary = boundary_of(&request);
            let body = request.body.as_deref().unwrap();
            assert_eq!(closing_marker_count(body, &boundary), 1);
            assert!(body.ends_with(format!("--{boundary}--\r\n").as_bytes()));
        }
    }

    #[test]
    fn multipart_and_legacy_form_data_content_types_are_distinct() {
        let descriptor = RequestDescriptor::post("https://api.example.com")
            .with_body_encoding(BodyEncoding::MultipartFormData);
        let request = assemble(&descriptor).unwrap();
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary=Boundary-"));

        let descriptor = RequestDescriptor::post("https://api.example.com")
            .with_body_encoding(BodyEncoding::FormData);
        let request = assemble(&descriptor).unwrap();
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("application/form-data; boundary=Boundary-"));
    }

    #[test]
    fn each_assembly_generates_a_fresh_boundary() {
        let descriptor = RequestDescriptor::upload("https://api.example.com/files");
        let first = boundary_of(&assemble(&descriptor).unwrap());
        let second = boundary_of(&assemble(&descriptor).unwrap());
        assert_ne!(first, second);
    }

    #[test]
    fn upload_assembles_as_post() {
        let descriptor = RequestDescriptor::upload("https://api.example.com/files");
        assert_eq!(assemble(&descriptor).unwrap().verb, "POST");
    }
}
