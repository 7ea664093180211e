//! libcurl engine backed by the `curl` crate's `Easy` handle.

use std::io::Write;
use std::time::Duration;

use curl::easy::{Easy, HttpVersion, IpResolve, List};
use xfer_core::{OptionValue, StagedOption, TransferOption, ValueKind};

use super::{Engine, NativeError, Session};
use crate::info::TransferInfo;

/// `CURLE_UNSUPPORTED_PROTOCOL`
const UNSUPPORTED_PROTOCOL: i32 = 1;
/// `CURLE_BAD_FUNCTION_ARGUMENT`
const BAD_FUNCTION_ARGUMENT: i32 = 43;

impl From<curl::Error> for NativeError {
    fn from(e: curl::Error) -> Self {
        let message = match e.extra_description() {
            Some(extra) => format!("{}: {}", e.description(), extra),
            None => e.description().to_string(),
        };
        NativeError::new(message, e.code() as i32)
    }
}

/// Opens libcurl easy handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlEngine;

impl CurlEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for CurlEngine {
    type Session = CurlSession;

    fn open(&self) -> Result<CurlSession, NativeError> {
        curl::init();

        let version = curl::Version::get();
        if !version.protocols().any(|p| p == "http") {
            return Err(NativeError::new(
                format!("libcurl {} was built without HTTP support", version.version()),
                UNSUPPORTED_PROTOCOL,
            ));
        }

        tracing::debug!(libcurl = version.version(), "opened transfer session");
        Ok(CurlSession {
            easy: Easy::new(),
            return_transfer: false,
        })
    }
}

/// One libcurl easy handle.
pub struct CurlSession {
    easy: Easy,
    /// When false, `perform` streams the body to stdout and returns nothing.
    return_transfer: bool,
}

impl CurlSession {
    fn apply(&mut self, option: TransferOption, value: &OptionValue) -> Result<(), NativeError> {
        let easy = &mut self.easy;
        match option {
            TransferOption::ReturnTransfer => self.return_transfer = flag(option, value)?,
            TransferOption::Verbose => easy.verbose(flag(option, value)?)?,
            TransferOption::Header => easy.show_header(flag(option, value)?)?,
            TransferOption::NoProgress => easy.progress(!flag(option, value)?)?,
            TransferOption::NoSignal => easy.signal(!flag(option, value)?)?,
            TransferOption::FailOnError => easy.fail_on_error(flag(option, value)?)?,

            TransferOption::Url => easy.url(text(option, value)?)?,
            TransferOption::Port => easy.port(narrow(option, value)?)?,
            TransferOption::Proxy => easy.proxy(text(option, value)?)?,
            TransferOption::ProxyPort => easy.proxy_port(narrow(option, value)?)?,
            TransferOption::NoProxy => easy.noproxy(text(option, value)?)?,
            TransferOption::HttpProxyTunnel => easy.http_proxy_tunnel(flag(option, value)?)?,
            TransferOption::Interface => easy.interface(text(option, value)?)?,
            TransferOption::LocalPort => easy.set_local_port(narrow(option, value)?)?,
            TransferOption::DnsCacheTimeout => easy.dns_cache_timeout(duration(option, value)?)?,
            TransferOption::BufferSize => easy.buffer_size(narrow(option, value)?)?,
            TransferOption::TcpNoDelay => easy.tcp_nodelay(flag(option, value)?)?,
            TransferOption::TcpKeepAlive => easy.tcp_keepalive(flag(option, value)?)?,
            TransferOption::TcpKeepIdle => easy.tcp_keepidle(duration(option, value)?)?,
            TransferOption::TcpKeepInterval => easy.tcp_keepintvl(duration(option, value)?)?,
            TransferOption::UnixSocketPath => easy.unix_socket(text(option, value)?)?,
            TransferOption::PathAsIs => easy.path_as_is(flag(option, value)?)?,

            TransferOption::Username => easy.username(text(option, value)?)?,
            TransferOption::Password => easy.password(text(option, value)?)?,
            TransferOption::UserPwd => {
                let credentials = text(option, value)?;
                let (user, password) = credentials.split_once(':').unwrap_or((credentials, ""));
                easy.username(user)?;
                easy.password(password)?;
            }
            TransferOption::ProxyUsername => easy.proxy_username(text(option, value)?)?,
            TransferOption::ProxyPassword => easy.proxy_password(text(option, value)?)?,

            TransferOption::AutoReferer => easy.autoreferer(flag(option, value)?)?,
            TransferOption::AcceptEncoding | TransferOption::Encoding => easy.accept_encoding(text(option, value)?)?,
            TransferOption::TransferEncoding => easy.transfer_encoding(flag(option, value)?)?,
            TransferOption::FollowLocation => easy.follow_location(flag(option, value)?)?,
            TransferOption::UnrestrictedAuth => easy.unrestricted_auth(flag(option, value)?)?,
            TransferOption::MaxRedirs => easy.max_redirections(narrow(option, value)?)?,
            TransferOption::Put => easy.put(flag(option, value)?)?,
            TransferOption::Post => easy.post(flag(option, value)?)?,
            TransferOption::PostFields => easy.post_fields_copy(text(option, value)?.as_bytes())?,
            TransferOption::PostFieldSize => easy.post_field_size(number(option, value)?)?,
            TransferOption::Referer => easy.referer(text(option, value)?)?,
            TransferOption::UserAgent => easy.useragent(text(option, value)?)?,
            TransferOption::HttpHeader => easy.http_headers(list(option, value)?)?,
            TransferOption::Cookie => easy.cookie(text(option, value)?)?,
            TransferOption::CookieFile => easy.cookie_file(text(option, value)?)?,
            TransferOption::CookieJar => easy.cookie_jar(text(option, value)?)?,
            TransferOption::CookieSession => easy.cookie_session(flag(option, value)?)?,
            TransferOption::HttpGet => easy.get(flag(option, value)?)?,
            TransferOption::IgnoreContentLength => easy.ignore_content_length(flag(option, value)?)?,
            TransferOption::HttpContentDecoding => easy.http_content_decoding(flag(option, value)?)?,
            TransferOption::HttpTransferDecoding => easy.http_transfer_decoding(flag(option, value)?)?,
            TransferOption::HttpVersion => easy.http_version(http_version(option, value)?)?,

            TransferOption::Range => easy.range(text(option, value)?)?,
            TransferOption::ResumeFrom => easy.resume_from(number(option, value)?)?,
            TransferOption::CustomRequest => easy.custom_request(text(option, value)?)?,
            TransferOption::NoBody => easy.nobody(flag(option, value)?)?,
            TransferOption::InFileSize => easy.in_filesize(number(option, value)?)?,
            TransferOption::Upload => easy.upload(flag(option, value)?)?,
            TransferOption::MaxFileSize => easy.max_filesize(number(option, value)?)?,
            TransferOption::FileTime => easy.fetch_filetime(flag(option, value)?)?,

            TransferOption::Timeout | TransferOption::TimeoutMs => easy.timeout(duration(option, value)?)?,
            TransferOption::LowSpeedLimit => easy.low_speed_limit(narrow(option, value)?)?,
            TransferOption::LowSpeedTime => easy.low_speed_time(duration(option, value)?)?,
            TransferOption::MaxSendSpeed => easy.max_send_speed(number(option, value)?)?,
            TransferOption::MaxRecvSpeed => easy.max_recv_speed(number(option, value)?)?,
            TransferOption::MaxConnects => easy.max_connects(narrow(option, value)?)?,
            TransferOption::FreshConnect => easy.fresh_connect(flag(option, value)?)?,
            TransferOption::ForbidReuse => easy.forbid_reuse(flag(option, value)?)?,
            TransferOption::ConnectTimeout | TransferOption::ConnectTimeoutMs => easy.connect_timeout(duration(option, value)?)?,
            TransferOption::IpResolve => easy.ip_resolve(ip_resolve(option, value)?)?,
            TransferOption::Resolve => easy.resolve(list(option, value)?)?,

            TransferOption::SslCert => easy.ssl_cert(text(option, value)?)?,
            TransferOption::SslCertType => easy.ssl_cert_type(text(option, value)?)?,
            TransferOption::SslKey => easy.ssl_key(text(option, value)?)?,
            TransferOption::SslKeyType => easy.ssl_key_type(text(option, value)?)?,
            TransferOption::KeyPasswd => easy.key_password(text(option, value)?)?,
            TransferOption::SslVerifyHost => easy.ssl_verify_host(flag(option, value)?)?,
            TransferOption::SslVerifyPeer => easy.ssl_verify_peer(flag(option, value)?)?,
            TransferOption::CaInfo => easy.cainfo(text(option, value)?)?,
            TransferOption::CaPath => easy.capath(text(option, value)?)?,
            TransferOption::CrlFile => easy.crlfile(text(option, value)?)?,
            TransferOption::SslCipherList => easy.ssl_cipher_list(text(option, value)?)?,
            TransferOption::SslSessionIdCache => easy.ssl_sessionid_cache(flag(option, value)?)?,
            TransferOption::CertInfo => easy.certinfo(flag(option, value)?)?,
        }
        Ok(())
    }
}

impl Session for CurlSession {
    fn set_options(&mut self, batch: &[StagedOption]) -> Result<(), NativeError> {
        for (option, value) in batch {
            self.apply(*option, value).map_err(|e| NativeError {
                message: format!("{}: {}", option.name(), e.message),
                ..e
            })?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.easy.reset();
        self.return_transfer = false;
    }

    fn perform(&mut self) -> Result<Vec<u8>, NativeError> {
        let return_transfer = self.return_transfer;
        let mut body = Vec::new();
        {
            let mut stdout = std::io::stdout();
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                if return_transfer {
                    body.extend_from_slice(data);
                    return Ok(data.len());
                }
                // A short count makes libcurl abort with CURLE_WRITE_ERROR.
                match stdout.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(_) => Ok(0),
                }
            })?;
            transfer.perform()?;
        }
        Ok(body)
    }

    fn info(&mut self) -> Result<TransferInfo, NativeError> {
        let easy = &mut self.easy;
        Ok(TransferInfo {
            url: easy.effective_url()?.map(str::to_owned),
            content_type: easy.content_type()?.map(str::to_owned),
            http_code: easy.response_code()?,
            header_size: easy.header_size()?,
            request_size: easy.request_size()?,
            redirect_count: easy.redirect_count()?,
            redirect_url: easy.redirect_url()?.map(str::to_owned),
            total_time: easy.total_time()?.as_secs_f64(),
            namelookup_time: easy.namelookup_time()?.as_secs_f64(),
            connect_time: easy.connect_time()?.as_secs_f64(),
            pretransfer_time: easy.pretransfer_time()?.as_secs_f64(),
            starttransfer_time: easy.starttransfer_time()?.as_secs_f64(),
            redirect_time: easy.redirect_time()?.as_secs_f64(),
            size_download: easy.download_size()?,
            download_content_length: easy.content_length_download()?,
            primary_ip: easy.primary_ip()?.map(str::to_owned),
            primary_port: easy.primary_port()?,
            local_ip: easy.local_ip()?.map(str::to_owned),
            local_port: easy.local_port()?,
        })
    }

    fn close(self) {
        tracing::trace!("closing transfer session");
        drop(self.easy);
    }
}

fn mismatch(option: TransferOption) -> NativeError {
    NativeError::new(
        format!("{} expects {}", option.name(), option.kind().describe()),
        BAD_FUNCTION_ARGUMENT,
    )
}

fn text(option: TransferOption, value: &OptionValue) -> Result<&str, NativeError> {
    value.as_text().ok_or_else(|| mismatch(option))
}

fn flag(option: TransferOption, value: &OptionValue) -> Result<bool, NativeError> {
    value.as_flag().ok_or_else(|| mismatch(option))
}

fn number(option: TransferOption, value: &OptionValue) -> Result<u64, NativeError> {
    value.as_number().ok_or_else(|| mismatch(option))
}

fn out_of_range(option: TransferOption, n: u64) -> NativeError {
    NativeError::new(
        format!("{} value {n} is out of range", option.name()),
        BAD_FUNCTION_ARGUMENT,
    )
}

fn narrow<T: TryFrom<u64>>(option: TransferOption, value: &OptionValue) -> Result<T, NativeError> {
    let n = number(option, value)?;
    T::try_from(n).map_err(|_| out_of_range(option, n))
}

/// libcurl takes durations as a signed `long`, in seconds or in
/// milliseconds depending on the setter, so seconds are bounded to what
/// still fits once scaled to milliseconds.
fn duration(option: TransferOption, value: &OptionValue) -> Result<Duration, NativeError> {
    let n = number(option, value)?;
    let (limit, duration) = match option.kind() {
        ValueKind::Millis => (i64::MAX as u64, Duration::from_millis(n)),
        _ => (i64::MAX as u64 / 1000, Duration::from_secs(n)),
    };
    if n > limit {
        return Err(out_of_range(option, n));
    }
    Ok(duration)
}

fn list(option: TransferOption, value: &OptionValue) -> Result<List, NativeError> {
    let items = value.as_list().ok_or_else(|| mismatch(option))?;
    let mut list = List::new();
    for item in items {
        list.append(item)?;
    }
    Ok(list)
}

fn http_version(option: TransferOption, value: &OptionValue) -> Result<HttpVersion, NativeError> {
    match number(option, value)? {
        0 => Ok(HttpVersion::Any),
        1 => Ok(HttpVersion::V10),
        2 => Ok(HttpVersion::V11),
        3 => Ok(HttpVersion::V2),
        4 => Ok(HttpVersion::V2TLS),
        5 => Ok(HttpVersion::V2PriorKnowledge),
        other => Err(NativeError::new(
            format!("unsupported {} value {other}", option.name()),
            BAD_FUNCTION_ARGUMENT,
        )),
    }
}

fn ip_resolve(option: TransferOption, value: &OptionValue) -> Result<IpResolve, NativeError> {
    match number(option, value)? {
        0 => Ok(IpResolve::Any),
        1 => Ok(IpResolve::V4),
        2 => Ok(IpResolve::V6),
        other => Err(NativeError::new(
            format!("unsupported {} value {other}", option.name()),
            BAD_FUNCTION_ARGUMENT,
        )),
    }
}
