//! Transfer option registry.
//!
//! The closed set of libcurl options xfer knows how to apply. Callers name
//! options without the `CURLOPT_` prefix and in any case; lookups re-add the
//! prefix and compare against the canonical libcurl name.

/// Prefix libcurl puts in front of every transfer option name.
pub const OPTION_PREFIX: &str = "CURLOPT_";

/// Shape of the value an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Free-form string (URL, header value, path).
    Text,
    /// On/off switch.
    Flag,
    /// Non-negative integer.
    Number,
    /// Non-negative integer number of seconds.
    Seconds,
    /// Non-negative integer number of milliseconds.
    Millis,
    /// List of strings (headers, resolve entries).
    List,
}

impl ValueKind {
    /// Human description used in validation messages.
    pub fn describe(self) -> &'static str {
        match self {
            ValueKind::Text => "a string",
            ValueKind::Flag => "a boolean",
            ValueKind::Number => "a non-negative integer",
            ValueKind::Seconds => "a non-negative number of seconds",
            ValueKind::Millis => "a non-negative number of milliseconds",
            ValueKind::List => "a string or an array of strings",
        }
    }
}

macro_rules! transfer_options {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, $kind:ident; )*) => {
        /// A libcurl transfer option known to xfer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TransferOption {
            $( $(#[$doc])* $variant, )*
        }

        impl TransferOption {
            /// Canonical libcurl name, prefix included.
            pub const fn name(self) -> &'static str {
                match self {
                    $( TransferOption::$variant => $name, )*
                }
            }

            /// Shape of value this option accepts.
            pub const fn kind(self) -> ValueKind {
                match self {
                    $( TransferOption::$variant => ValueKind::$kind, )*
                }
            }
        }

        /// Every registered option, keyed by its canonical libcurl name.
        pub static REGISTRY: &[(&str, TransferOption)] = &[
            $( ($name, TransferOption::$variant), )*
        ];
    };
}

transfer_options! {
    // Behaviour
    /// Return the body from `exec` instead of writing it to stdout.
    ReturnTransfer => "CURLOPT_RETURNTRANSFER", Flag;
    Verbose => "CURLOPT_VERBOSE", Flag;
    /// Include response headers in the body.
    Header => "CURLOPT_HEADER", Flag;
    NoProgress => "CURLOPT_NOPROGRESS", Flag;
    NoSignal => "CURLOPT_NOSIGNAL", Flag;
    FailOnError => "CURLOPT_FAILONERROR", Flag;

    // Network
    Url => "CURLOPT_URL", Text;
    Port => "CURLOPT_PORT", Number;
    Proxy => "CURLOPT_PROXY", Text;
    ProxyPort => "CURLOPT_PROXYPORT", Number;
    NoProxy => "CURLOPT_NOPROXY", Text;
    HttpProxyTunnel => "CURLOPT_HTTPPROXYTUNNEL", Flag;
    Interface => "CURLOPT_INTERFACE", Text;
    LocalPort => "CURLOPT_LOCALPORT", Number;
    DnsCacheTimeout => "CURLOPT_DNS_CACHE_TIMEOUT", Seconds;
    BufferSize => "CURLOPT_BUFFERSIZE", Number;
    TcpNoDelay => "CURLOPT_TCP_NODELAY", Flag;
    TcpKeepAlive => "CURLOPT_TCP_KEEPALIVE", Flag;
    TcpKeepIdle => "CURLOPT_TCP_KEEPIDLE", Seconds;
    TcpKeepInterval => "CURLOPT_TCP_KEEPINTVL", Seconds;
    UnixSocketPath => "CURLOPT_UNIX_SOCKET_PATH", Text;
    PathAsIs => "CURLOPT_PATH_AS_IS", Flag;

    // Authentication
    Username => "CURLOPT_USERNAME", Text;
    Password => "CURLOPT_PASSWORD", Text;
    /// `user:password` in one string.
    UserPwd => "CURLOPT_USERPWD", Text;
    ProxyUsername => "CURLOPT_PROXYUSERNAME", Text;
    ProxyPassword => "CURLOPT_PROXYPASSWORD", Text;

    // HTTP
    AutoReferer => "CURLOPT_AUTOREFERER", Flag;
    AcceptEncoding => "CURLOPT_ACCEPT_ENCODING", Text;
    /// Legacy spelling of `ACCEPT_ENCODING`.
    Encoding => "CURLOPT_ENCODING", Text;
    TransferEncoding => "CURLOPT_TRANSFER_ENCODING", Flag;
    FollowLocation => "CURLOPT_FOLLOWLOCATION", Flag;
    UnrestrictedAuth => "CURLOPT_UNRESTRICTED_AUTH", Flag;
    MaxRedirs => "CURLOPT_MAXREDIRS", Number;
    Put => "CURLOPT_PUT", Flag;
    Post => "CURLOPT_POST", Flag;
    /// URL-encoded request body. Always produced by the POST-field encoder.
    PostFields => "CURLOPT_POSTFIELDS", Text;
    PostFieldSize => "CURLOPT_POSTFIELDSIZE", Number;
    Referer => "CURLOPT_REFERER", Text;
    UserAgent => "CURLOPT_USERAGENT", Text;
    HttpHeader => "CURLOPT_HTTPHEADER", List;
    Cookie => "CURLOPT_COOKIE", Text;
    CookieFile => "CURLOPT_COOKIEFILE", Text;
    CookieJar => "CURLOPT_COOKIEJAR", Text;
    CookieSession => "CURLOPT_COOKIESESSION", Flag;
    HttpGet => "CURLOPT_HTTPGET", Flag;
    IgnoreContentLength => "CURLOPT_IGNORE_CONTENT_LENGTH", Flag;
    HttpContentDecoding => "CURLOPT_HTTP_CONTENT_DECODING", Flag;
    HttpTransferDecoding => "CURLOPT_HTTP_TRANSFER_DECODING", Flag;
    /// One of the `CURL_HTTP_VERSION_*` numbers.
    HttpVersion => "CURLOPT_HTTP_VERSION", Number;

    // Protocol
    Range => "CURLOPT_RANGE", Text;
    ResumeFrom => "CURLOPT_RESUME_FROM", Number;
    CustomRequest => "CURLOPT_CUSTOMREQUEST", Text;
    NoBody => "CURLOPT_NOBODY", Flag;
    InFileSize => "CURLOPT_INFILESIZE", Number;
    Upload => "CURLOPT_UPLOAD", Flag;
    MaxFileSize => "CURLOPT_MAXFILESIZE", Number;
    FileTime => "CURLOPT_FILETIME", Flag;

    // Connection
    Timeout => "CURLOPT_TIMEOUT", Seconds;
    TimeoutMs => "CURLOPT_TIMEOUT_MS", Millis;
    LowSpeedLimit => "CURLOPT_LOW_SPEED_LIMIT", Number;
    LowSpeedTime => "CURLOPT_LOW_SPEED_TIME", Seconds;
    MaxSendSpeed => "CURLOPT_MAX_SEND_SPEED_LARGE", Number;
    MaxRecvSpeed => "CURLOPT_MAX_RECV_SPEED_LARGE", Number;
    MaxConnects => "CURLOPT_MAXCONNECTS", Number;
    FreshConnect => "CURLOPT_FRESH_CONNECT", Flag;
    ForbidReuse => "CURLOPT_FORBID_REUSE", Flag;
    ConnectTimeout => "CURLOPT_CONNECTTIMEOUT", Seconds;
    ConnectTimeoutMs => "CURLOPT_CONNECTTIMEOUT_MS", Millis;
    /// One of the `CURL_IPRESOLVE_*` numbers.
    IpResolve => "CURLOPT_IPRESOLVE", Number;
    Resolve => "CURLOPT_RESOLVE", List;

    // TLS
    SslCert => "CURLOPT_SSLCERT", Text;
    SslCertType => "CURLOPT_SSLCERTTYPE", Text;
    SslKey => "CURLOPT_SSLKEY", Text;
    SslKeyType => "CURLOPT_SSLKEYTYPE", Text;
    KeyPasswd => "CURLOPT_KEYPASSWD", Text;
    SslVerifyHost => "CURLOPT_SSL_VERIFYHOST", Flag;
    SslVerifyPeer => "CURLOPT_SSL_VERIFYPEER", Flag;
    CaInfo => "CURLOPT_CAINFO", Text;
    CaPath => "CURLOPT_CAPATH", Text;
    CrlFile => "CURLOPT_CRLFILE", Text;
    SslCipherList => "CURLOPT_SSL_CIPHER_LIST", Text;
    SslSessionIdCache => "CURLOPT_SSL_SESSIONID_CACHE", Flag;
    CertInfo => "CURLOPT_CERTINFO", Flag;
}

impl TransferOption {
    /// Name as callers write it: lowercase, no prefix (`"useragent"`).
    pub fn key(self) -> String {
        self.name()
            .trim_start_matches(OPTION_PREFIX)
            .to_ascii_lowercase()
    }
}

/// Look up a caller-supplied option name (no prefix, any case).
pub fn lookup(key: &str) -> Option<TransferOption> {
    if key.is_empty() {
        return None;
    }
    let canonical = format!("{OPTION_PREFIX}{}", key.to_ascii_uppercase());
    REGISTRY
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, option)| *option)
}

/// Returns `true` if `key` names a registered option.
pub fn is_known(key: &str) -> bool {
    lookup(key).is_some()
}
