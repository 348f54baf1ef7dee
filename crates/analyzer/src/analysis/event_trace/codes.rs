//! Result vocabulary and error/status code descriptions.

/// Normalise a mark result to success/failure. Anything outside the success
/// vocabulary, including a missing result, counts as failure.
pub fn is_success(result: Option<&str>) -> bool {
    matches!(result, Some("e=true" | "s" | "t" | "fre-upn-win-success"))
}

/// Expand a known error/status code to `CODE: meaning`. Unknown codes pass through.
pub fn describe_code(code: &str) -> String {
    let meaning = match code {
        "caa10001" => "Need user interface to continue",
        "caa2000c" | "200" => "The request requires user interaction",
        "caa20064" => "Server returned an unknown error code",
        "caa20003" => "Invalid grant",
        "4c7" => "The user cancelled the prompt",
        "caa20001" => "The client is not authorized to request an authorization code using this method",
        "0" => "Success",
        "403" => "Forbidden",
        _ => return code.to_string(),
    };

    format!("{}: {}", display_code(code), meaning)
}

fn display_code(code: &str) -> String {
    if code.starts_with("caa") {
        code.to_uppercase()
    } else {
        code.to_string()
    }
}

/// Bare status codes are hex digit runs ("0", "200", "caa2000c").
pub fn is_status_code(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_vocabulary() {
        for value in ["e=true", "s", "t", "fre-upn-win-success"] {
            assert!(is_success(Some(value)), "{}", value);
        }
        for value in ["f", "false", "n", "true", "success", ""] {
            assert!(!is_success(Some(value)), "{}", value);
        }
        assert!(!is_success(None));
    }

    #[test]
    fn test_known_codes_expand() {
        assert_eq!(describe_code("caa10001"), "CAA10001: Need user interface to continue");
        assert_eq!(describe_code("200"), "200: The request requires user interaction");
        assert_eq!(describe_code("caa2000c"), "CAA2000C: The request requires user interaction");
        assert_eq!(describe_code("4c7"), "4c7: The user cancelled the prompt");
        assert_eq!(describe_code("0"), "0: Success");
    }

    #[test]
    fn test_unknown_code_passes_through() {
        assert_eq!(describe_code("deadbeef"), "deadbeef");
        assert_eq!(describe_code("code1"), "code1");
    }

    #[test]
    fn test_status_code_shape() {
        assert!(is_status_code("0"));
        assert!(is_status_code("caa2000c"));
        assert!(!is_status_code("token1"));
        assert!(!is_status_code("https://graph"));
        assert!(!is_status_code(""));
    }
}
