//! Names of the HTTP headers this crate emits.

macro_rules! standard_headers {
    (
        $(
            $(#[$docs:meta])*
            ($upcase:ident, $name:literal);
        )+
    ) => {
        $(
            $(#[$docs])*
            pub const $upcase: &'static str = $name;
        )+
    }
}

standard_headers! {
    /// Media type of the request or response body.
    ///
    /// Set by the assembler according to the descriptor's body encoding;
    /// for multipart kinds the value carries the boundary parameter.
    (CONTENT_TYPE, "content-type");

    /// Per-part disposition inside a multipart body.
    ///
    /// Only the `form-data` value with the `name` and `filename`
    /// directives is used in this crate.
    (CONTENT_DISPOSITION, "content-disposition");

    /// Size of the entity body in octets.
    (CONTENT_LENGTH, "content-length");

    /// Content types the caller is able to understand.
    (ACCEPT, "accept");

    /// Credentials authenticating the caller with the server.
    (AUTHORIZATION, "authorization");

    /// Identifies the requesting client software.
    (USER_AGENT, "user-agent");
}
