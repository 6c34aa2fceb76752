use super::types::LogEntry;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// nginx `ui` access log line, with empty remote user and real ip:
    ///
    /// ```text
    /// $remote_addr -  - [$time_local] "$request"
    /// $status $body_bytes_sent "$http_referer" "$http_user_agent"
    /// "$http_x_forwarded_for" "$http_X_REQUEST_ID" $http_X_RB_USER $request_time
    /// ```
    static ref LINE_PATTERN: Regex = Regex::new(concat!(
        r#"^(?P<remote_addr>\d+\.\d+\.\d+\.\d+) -  - "#,
        r#"\[(?P<time_local>[^\]]+)\] "#,
        r#""(?P<method>\S+) (?P<request>\S+) (?P<protocol>[^"]+)" "#,
        r#"(?P<status>\d+) (?P<body_bytes_sent>\d+) "#,
        r#""(?P<referer>[^"]*)" "(?P<user_agent>[^"]*)" "(?P<forwarded_for>[^"]*)" "(?P<request_id>[^"]*)" "#,
        r#"(?P<rb_user>\S+) (?P<request_time>[0-9]+(?:\.[0-9]+)?)\s*$"#,
    ))
    .unwrap();
}

/// Extracts (endpoint, latency) pairs from single access log lines
pub struct LineMatcher;

impl LineMatcher {
    /// Match one line, returning `None` for anything that does not have
    /// the expected shape
    pub fn match_line(line: &str) -> Option<LogEntry> {
        let captures = LINE_PATTERN.captures(line)?;

        let endpoint = captures.name("request")?.as_str();
        let latency = captures.name("request_time")?.as_str().parse::<f64>().ok()?;

        Some(LogEntry::new(endpoint, latency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(request: &str, time: &str) -> String {
        format!(
            r#"1.2.3.4 -  - [29/Jun/2017:03:50:22 +0300] "GET {} HTTP/1.1" 200 927 "-" "-" "-" "-" - {}"#,
            request, time
        )
    }

    #[test]
    fn test_match_minimal_line() {
        let entry = LineMatcher::match_line(
            r#"1.2.3.4 -  - [date] "GET /a HTTP/1.1" 200 123 "-" "-" "-" "-" - 0.100"#,
        )
        .unwrap();

        assert_eq!(entry.endpoint, "/a");
        assert_eq!(entry.latency, 0.100);
    }

    #[test]
    fn test_match_real_nginx_line() {
        let raw = r#"1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/25019354 HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9 libwww-FM/2.14 SSL-MM/1.4.1 GNUTLS/2.10.5" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" 0.390"#;

        let entry = LineMatcher::match_line(raw).unwrap();
        assert_eq!(entry.endpoint, "/api/v2/banner/25019354");
        assert_eq!(entry.latency, 0.390);
    }

    #[test]
    fn test_match_ignores_trailing_newline() {
        let raw = format!("{}\n", line("/b", "1.5"));

        let entry = LineMatcher::match_line(&raw).unwrap();
        assert_eq!(entry.endpoint, "/b");
        assert_eq!(entry.latency, 1.5);
    }

    #[test]
    fn test_match_is_method_agnostic() {
        let raw = r#"10.0.0.1 -  - [date] "POST /api/1/photo/ HTTP/1.0" 201 0 "-" "curl" "-" "-" - 12"#;

        let entry = LineMatcher::match_line(raw).unwrap();
        assert_eq!(entry.endpoint, "/api/1/photo/");
        assert_eq!(entry.latency, 12.0);
    }

    #[test]
    fn test_extracts_captured_substrings() {
        for (request, time) in [
            ("/", "0.000"),
            ("/api/v2/slot/4705/groups", "0.704"),
            ("/export/appinstall_raw/2017-06-29/", "0.001"),
            ("/api/v2/banner/1717161?a=1&b=2", "1337.5"),
        ] {
            let entry = LineMatcher::match_line(&line(request, time)).unwrap();
            assert_eq!(entry.endpoint, request);
            assert_eq!(entry.latency, time.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_non_numeric_duration_is_no_match() {
        assert!(LineMatcher::match_line(&line("/a", "-")).is_none());
        assert!(LineMatcher::match_line(&line("/a", "abc")).is_none());
        assert!(LineMatcher::match_line(&line("/a", "NaN")).is_none());
        assert!(LineMatcher::match_line(&line("/a", "inf")).is_none());
        assert!(LineMatcher::match_line(&line("/a", "-0.5")).is_none());
    }

    #[test]
    fn test_missing_quotes_is_no_match() {
        let raw = r#"1.2.3.4 -  - [date] GET /a HTTP/1.1 200 123 "-" "-" "-" "-" - 0.100"#;
        assert!(LineMatcher::match_line(raw).is_none());
    }

    #[test]
    fn test_authenticated_user_is_no_match() {
        let raw = r#"1.99.174.176 3b81f63526fa8  - [29/Jun/2017:03:50:22 +0300] "GET /api/1/photo/65535/ HTTP/1.1" 200 12 "-" "python-requests/2.13.0" "-" "1498697422-32900793-4708-9752770" "-" 0.133"#;
        assert!(LineMatcher::match_line(raw).is_none());

        let real_ip = line("/a", "0.100").replacen("-  - ", "-  10.0.0.1 ", 1);
        assert!(LineMatcher::match_line(&real_ip).is_none());

        let single_space = line("/a", "0.100").replacen("-  - ", "- - ", 1);
        assert!(LineMatcher::match_line(&single_space).is_none());
    }

    #[test]
    fn test_truncated_line_is_no_match() {
        let full = line("/a", "0.100");
        for cut in [10, 30, 60, full.len() - 8] {
            assert!(
                LineMatcher::match_line(&full[..cut]).is_none(),
                "prefix of length {} should not match",
                cut
            );
        }
    }

    #[test]
    fn test_garbage_is_no_match() {
        assert!(LineMatcher::match_line("").is_none());
        assert!(LineMatcher::match_line("hello world").is_none());
        assert!(LineMatcher::match_line(r#""GET /a HTTP/1.1" 0.1"#).is_none());
    }
}
