//! Declarative descriptions of HTTP calls.

use std::borrow::Cow;

use serde::Serialize;

use crate::multipart::FileSet;
use crate::params::ParamBag;

/// Logical request method.
///
/// Mostly a one-to-one mapping onto HTTP verbs, plus [`Method::Upload`],
/// which is a POST whose body is assembled as a multipart upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET.
    Get,
    /// HEAD.
    Head,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// PATCH.
    Patch,
    /// DELETE.
    Delete,
    /// TRACE.
    Trace,
    /// CONNECT.
    Connect,
    /// Logical upload, sent as POST.
    Upload,
}

impl Method {
    /// The wire verb for this method.
    pub const fn verb(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post | Method::Upload => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

/// How body parameters are encoded into request-body bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    /// No body.
    #[default]
    None,
    /// JSON bytes, `application/json`.
    Json,
    /// Percent-encoded pairs, `application/x-www-form-urlencoded`.
    FormUrlEncoded,
    /// Multipart parts under the legacy `application/form-data` content
    /// type. Some deployed servers expect this literal instead of the
    /// standard one; the two kinds are not interchangeable.
    FormData,
    /// Multipart parts under `multipart/form-data`.
    MultipartFormData,
}

/// Immutable description of one HTTP call.
///
/// A descriptor owns everything needed to assemble a wire request: path,
/// method, header list, optional parameter bags and optional file
/// attachments. Parameter bags are captured at construction, so a
/// descriptor can be reused across loads without re-serializing.
///
/// ```
/// use wireline::{BodyEncoding, RequestDescriptor};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct NewPost<'a> {
///     title: &'a str,
/// }
///
/// let descriptor = RequestDescriptor::post("https://api.example.com/posts")
///     .with_header("authorization", "Bearer t0ken")
///     .with_body(BodyEncoding::Json, &NewPost { title: "hi" });
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub(crate) path: Cow<'static, str>,
    pub(crate) method: Method,
    pub(crate) body_encoding: BodyEncoding,
    pub(crate) query: Option<ParamBag>,
    pub(crate) body: Option<ParamBag>,
    pub(crate) headers: Vec<(Cow<'static, str>, Cow<'static, str>)>,
    pub(crate) files: Option<FileSet>,
}

impl RequestDescriptor {
    /// Creates a descriptor for `method` and `path`.
    pub fn new(method: Method, path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            method,
            body_encoding: BodyEncoding::None,
            query: None,
            body: None,
            headers: Vec::new(),
            files: None,
        }
    }

    /// GET `path`.
    pub fn get(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Get, path)
    }

    /// HEAD `path`.
    pub fn head(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Head, path)
    }

    /// POST `path`.
    pub fn post(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PUT `path`.
    pub fn put(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Put, path)
    }

    /// PATCH `path`.
    pub fn patch(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Upload to `path`: POST with a multipart body.
    pub fn upload(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Method::Upload, path).with_body_encoding(BodyEncoding::MultipartFormData)
    }

    /// Appends a header. Duplicate names are allowed here; the last
    /// occurrence wins when the request is assembled.
    pub fn with_header(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Captures `params` as the query parameter bag.
    ///
    /// A bag that fails to serialize is dropped (logged), leaving the
    /// descriptor without query parameters.
    pub fn with_query<P: Serialize + ?Sized>(mut self, params: &P) -> Self {
        self.query = ParamBag::new(params);
        self
    }

    /// Captures `params` as the body parameter bag, encoded per `encoding`.
    pub fn with_body<P: Serialize + ?Sized>(mut self, encoding: BodyEncoding, params: &P) -> Self {
        self.body = ParamBag::new(params);
        self.body_encoding = encoding;
        self
    }

    /// Sets the body encoding without body parameters, e.g. a multipart
    /// request consisting of file parts only.
    pub fn with_body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    /// Attaches files for multipart assembly.
    pub fn with_files(mut self, files: FileSet) -> Self {
        self.files = Some(files);
        self
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The logical method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The body encoding kind.
    pub fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }
}
