//! Marks — per-token decoding of the event-trace micro-protocol.
//!
//! A mark is `action` or `action:result`. Most actions map to a fixed
//! sentence whose wording and severity depend only on the result; a few
//! read or arm the cross-mark [`TraceState`], which the caller threads
//! through the marks strictly left to right.

use crate::analysis::model::Severity;

use super::codes::{describe_code, is_status_code, is_success};

/// One `;`-delimited token of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark<'a> {
    pub action: &'a str,
    /// Trimmed result; `None` when absent or empty
    pub result: Option<&'a str>,
    raw_result: Option<&'a str>,
}

impl<'a> Mark<'a> {
    /// Blank tokens carry nothing and yield `None`.
    pub fn parse(raw: &'a str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }

        let (action, raw_result) = match raw.split_once(':') {
            Some((action, result)) if !result.is_empty() => (action, Some(result)),
            Some((action, _)) => (action, None),
            None => (raw, None),
        };

        Some(Self {
            action: action.trim(),
            result: raw_result.map(str::trim).filter(|r| !r.is_empty()),
            raw_result,
        })
    }

    /// Result split on further `:` separators (`code:status`).
    pub fn parts(&self) -> Vec<&'a str> {
        self.raw_result
            .map(|r| r.split(':').collect())
            .unwrap_or_default()
    }

    fn part(&self, index: usize) -> &'a str {
        self.parts().get(index).copied().unwrap_or("unknown")
    }

    fn succeeded(&self) -> bool {
        is_success(self.result)
    }

    fn result_is(&self, expected: &str) -> bool {
        self.result == Some(expected)
    }

    fn code(&self) -> String {
        describe_code(self.result.unwrap_or("unknown"))
    }
}

/// State carried across the marks of one trace. Reset for every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceState {
    /// Unrecognized marks still to be read as trailing failure codes:
    /// 2 means the next one is the error code, 1 the status code.
    pub pending_failure_codes: u8,
    pub protocol_version: Option<String>,
}

/// One explanation line with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub severity: Severity,
    pub line: String,
}

impl Fragment {
    fn new(severity: Severity, line: impl Into<String>) -> Self {
        Self { severity, line: line.into() }
    }
}

enum Outcome {
    Emit(Fragment),
    /// Recognized, intentionally silent
    NoOp,
    Unrecognized,
}

use Severity::{Failure, Verbose, Warning};

fn emit(severity: Severity, line: impl Into<String>) -> Outcome {
    Outcome::Emit(Fragment::new(severity, line))
}

fn pick<T>(condition: bool, yes: T, no: T) -> T {
    if condition { yes } else { no }
}

/// Decode one mark, returning the next state and at most one fragment.
pub fn decode_mark(mut state: TraceState, mark: &Mark<'_>) -> (TraceState, Option<Fragment>) {
    let outcome = match mark.action {
        "adalv" => {
            let version = normalize_protocol_version(mark.result.unwrap_or("unknown"));
            let line = format!("This auth flow is using ADAL {}", version);
            state.protocol_version = Some(version);
            emit(Warning, line)
        }
        "sso_default_fail" => {
            let parts = mark.parts();
            if parts.len() == 2 {
                emit(
                    Failure,
                    format!(
                        "SSO failed with error code '{}' and status code '{}'.",
                        describe_code(parts[0]),
                        describe_code(parts[1])
                    ),
                )
            } else {
                state.pending_failure_codes = 2;
                emit(Failure, "Failed to SSO.")
            }
        }
        action => fixed(action, mark),
    };

    match outcome {
        Outcome::Emit(fragment) => (state, Some(fragment)),
        Outcome::NoOp => (state, None),
        Outcome::Unrecognized => unrecognized(state, mark),
    }
}

/// "2" and "23" are legacy encodings of 2.2 and 2.3.
fn normalize_protocol_version(raw: &str) -> String {
    match raw {
        "2" => "2.2".to_string(),
        "23" => "2.3".to_string(),
        other => other.to_string(),
    }
}

fn unrecognized(mut state: TraceState, mark: &Mark<'_>) -> (TraceState, Option<Fragment>) {
    if let Some(result) = mark.result {
        if let Some(index) = result.find("sso-") {
            let stage = result[index..].trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '-');
            return (state, Some(Fragment::new(Verbose, format!("{} is complete.", stage))));
        }
    }

    let fragment = match state.pending_failure_codes {
        2 => Fragment::new(Failure, format!("SSO failure error code {}.", describe_code(mark.action))),
        1 => Fragment::new(Failure, format!("SSO failure status code {}.", describe_code(mark.action))),
        _ => {
            tracing::trace!(action = mark.action, "unrecognized trace action");
            let line = match mark.result {
                Some(result) => format!("Auth action taken: {} resulted in: {}.", mark.action, result),
                None => format!("Auth action taken: {}.", mark.action),
            };
            return (state, Some(Fragment::new(Verbose, line)));
        }
    };

    state.pending_failure_codes -= 1;
    (state, Some(fragment))
}

fn fixed(action: &str, mark: &Mark<'_>) -> Outcome {
    let ok = mark.succeeded();

    match action {
        "acq" => match mark.result {
            Some(result) if is_status_code(result) => emit(
                Verbose,
                format!("The acquire token call completed with status {}.", describe_code(result)),
            ),
            Some(resource) => emit(Verbose, format!("Attempting to acquire the {} resource token.", resource)),
            None => emit(Verbose, "Attempting to acquire a token."),
        },
        "fp" => emit(
            pick(ok, Warning, Verbose),
            format!("The app will {}show a prompt as the default behavior.", pick(ok, "", "not ")),
        ),
        "sfp" => emit(
            Verbose,
            format!(
                "There were {}entries in storage.json that require a force prompt to occur.",
                pick(ok, "", "no ")
            ),
        ),
        "gun" => emit(
            Warning,
            "Failed to fetch the Windows user UPN. This is expected if the machine is not domain joined.",
        ),
        "lhfw" => emit(
            pick(ok, Verbose, Warning),
            format!("The UPN from the UPN window was {}found.", pick(ok, "", "not ")),
        ),
        "iemDisabled" => emit(Verbose, "IE Emulation mode is not enabled for this user."),
        "iemEnabled" => emit(Warning, "IE Emulation mode is enabled for this user."),
        "wamEnabled" => emit(Warning, "WAM is enabled for this user."),
        "wamDisabled" => emit(Verbose, "WAM is not enabled for this user."),
        "upnOverride" => emit(
            Failure,
            "UPN override flag is set. It will now attempt to get a back-up UPN given that the UPN from \
             the UPN window is not present. This is for BVT testing scenarios ONLY.",
        ),
        "winverchek" | "winvercheck" => emit(
            Verbose,
            "Checking if the OS version is above Win 10 RS2. (This is to verify if os is WAM compatible.)",
        ),
        "rmiergk" => emit(Warning, "Removed the IE Emulation mode regkey due to a preauth setting."),
        "wfd" => emit(
            Failure,
            "UPN was missing from storage.json and also desktopConfig. But the fallback to get the \
             domain joined username was disabled so will proceed without a UPN.",
        ),
        "fallbackv2" => emit(
            pick(ok, Warning, Failure),
            format!(
                "UPN was missing from storage.json {} was {}found in desktopConfig.",
                pick(ok, "but", "and"),
                pick(ok, "", "not ")
            ),
        ),
        "fallback" => emit(
            pick(ok, Warning, Failure),
            format!(
                "UPN was missing from storage.json. {} in finding the UPN from either storage.json entry \
                 of homeUserUpn or through the domain joined credentials. This can result in an unnecessary \
                 prompts or unexpected behavior.",
                pick(ok, "Succeeded", "Failed")
            ),
        ),
        "ctx" => emit(
            Verbose,
            pick(
                mark.result_is("c"),
                "No saved context found, creating a new auth context.",
                "Saved auth context from a previous session was found.",
            ),
        ),
        "req_ui_known" => emit(
            Verbose,
            format!(
                "The error code '{}' was emitted as part of the acquire token call. \
                 As a result, we will attempt WIA if possible before showing a prompt.",
                mark.code()
            ),
        ),
        "should_wia" => emit(
            Verbose,
            format!("WIA will {}be attempted as part of this auth flow.", pick(ok, "", "not ")),
        ),
        "wia_status" => emit(Verbose, format!("WIA call returned status code {}.", mark.code())),
        "wiaSkipDiffUser" if mark.result_is("true") => emit(
            Verbose,
            "WIA was not attempted because the loginHint from the UPN does not match the domain joined user's UPN.",
        ),
        "wiaSkipSetting" if mark.result_is("true") => {
            emit(Verbose, "WIA was not attempted because a flag was set to skip it.")
        }
        "wiaSkipDiffUser" | "wiaSkipSetting" => Outcome::NoOp,
        "no_upn" => emit(
            Verbose,
            "UPN is not present, so cannot attempt WIA. Will instead attempt to show a login prompt.",
        ),
        "use_wia" => match mark.result {
            Some("s") => emit(Verbose, "Modern WIA was attempted."),
            Some("f") => emit(Warning, "WIA request failed to execute."),
            _ => emit(Verbose, "No skip WIA hook was found. Proceeding with WIA attempt."),
        },
        "use_wa" => {
            if mark.result_is("success") {
                emit(Verbose, "WIA was attempted.")
            } else {
                emit(Warning, "WIA request failed to execute.")
            }
        }
        "wa_logoutskip" => emit(Verbose, "WIA attempt skipped since the user was logged out."),
        "error_wia" => emit(Verbose, "WIA request failed to execute."),
        "ats" => emit(
            Verbose,
            format!(
                "Acquire token call resulted in status code '{}' and error code '{}'.",
                describe_code(mark.part(0)),
                describe_code(mark.part(1))
            ),
        ),
        "at" => emit(
            Warning,
            "The acquire token call failed and requested for user input. \
             As a result, a prompt may be shown unless there is already one running.",
        ),
        "fre-upn-win" => emit(
            Verbose,
            format!("{} in fetching the UPN from the UPN window.", pick(ok, "Succeeded", "Failed")),
        ),
        "euV2" => emit(Verbose, "Extracting the user profile object from the fetched token."),
        "ssoUserCookieSet" => cookie_attempt("user object", mark),
        "teamsSSOAuth" => cookie_attempt("token", mark),
        "ssoStatusCookieSet" => cookie_attempt("ssoStatus", mark),
        "aggCookie" => cookie_attempt("Chat Service Aggregator", mark),
        "removecookie" => emit(Verbose, "Failed to remove auth cookies."),
        "removeCookieFlag" => emit(Verbose, "Attempting to remove the previous auth cookies (if any)."),
        "ubc" => emit(
            Verbose,
            "UPN was fetched before creating context by checking for homeUserUpn key in storage.json and \
             if that failed, attempting to grab the Windows user UPN.",
        ),
        "enc" => emit(
            Verbose,
            format!("{} in encoding the user object.", pick(ok, "Succeeded", "Failed")),
        ),
        "addToMapV2" => emit(
            Verbose,
            format!(
                "{} in adding/updating the user object to the async user map.",
                pick(ok, "Succeeded", "Failed")
            ),
        ),
        "detectSemicolon" => emit(
            pick(ok, Warning, Verbose),
            format!("{} semicolon in the user profile.", pick(ok, "Found a", "Did not find a")),
        ),
        "addToMap" => emit(
            Verbose,
            format!(
                "{} in adding the cached user to the user map for use by Offline/LBW flows. This is old \
                 code that can cause issues for customers with special characters in their names.",
                pick(ok, "Succeeded", "Failed")
            ),
        ),
        "remav" => emit(
            pick(ok, Verbose, Warning),
            format!(
                "ADAL 2 is disabled. {} in trying to remove the ADAL version from the regkey \
                 (used by Outlook Add-in).",
                pick(ok, "Succeeded", "Failed")
            ),
        ),
        "setav" => emit(
            pick(ok, Verbose, Warning),
            format!(
                "ADAL 2 is enabled. {} in trying to add the ADAL version regkey (used by Outlook Add-in).",
                pick(ok, "Succeeded", "Failed")
            ),
        ),
        "cacheUserCookie" => emit(
            Verbose,
            pick(
                mark.result_is("t"),
                "Successfully set the cached user profile cookie.",
                "Failed to set the cached user profile cookie. \
                 This is acceptable so long as the processEnv contains the cached user profile.",
            ),
        ),
        "setCacheProfile" => emit(
            Verbose,
            pick(
                mark.result_is("t"),
                "Will attempt to set the cached user profile for Offline/LBW flow.",
                "The cached user profile is missing so cannot proceed with Offline/LBW flow.",
            ),
        ),
        "setchatSvcAggCookie" | "setdesktopUserProfile" | "setssostatus" | "setSSOAUTHCOOKIE" => {
            let cookie = &action[3..];
            if mark.result_is("t") {
                emit(Verbose, format!("Set the {} cookie successfully.", cookie))
            } else {
                emit(
                    Verbose,
                    format!(
                        "Failed to set the {} cookie. (Old code might return failure when it succeeds. \
                         Check following logs for real result.)",
                        cookie
                    ),
                )
            }
        }
        "frw=true" | "frw=false" => emit(
            Verbose,
            format!(
                "Force reload web app is set to {}. This will affect Fast Tenant Switch scenarios only.",
                &action[4..]
            ),
        ),
        "rmvCookie" => emit(Verbose, "Code reached the remove cookie path."),
        "resolve" => emit(Verbose, "Successfully removed all auth cookies."),
        "reject" => emit(Verbose, "Failed to completely remove the cookies."),
        "authAsync" => emit(Warning, "Attempting to start the app in Offline/LBW flow."),
        "authInit" => emit(Failure, "Offline/LBW flow failed, so attempting to launch the app regularly."),
        "setFailCookie" => emit(Verbose, "SSO failed, setting the failure ssoStatus cookie."),
        "failCookieSet" => emit(Verbose, "Successfully set the failure ssoStatus cookie."),
        "err=Error" => emit(
            Failure,
            format!(
                "The following error was thrown during the auth flow. '{}'.",
                mark.result.unwrap_or_default()
            ),
        ),
        "lwp" => emit(Warning, "Code is executing the login window promise."),
        "lwp-status" => {
            if mark.result_is("success") {
                emit(Verbose, "The prompt shown completed successfully.")
            } else {
                emit(
                    Failure,
                    format!("The auth prompt failed to fetch a token with error code '{}'.", mark.code()),
                )
            }
        }
        "sso_catch" => emit(Failure, "SSO failed."),
        "mt-token-wiapre-token-acqmt-token-wia" => {
            if mark.result_is("success") {
                emit(Verbose, "Silent token fetch succeeded.")
            } else {
                emit(
                    Verbose,
                    format!("Silent token fetch of the MT token failed with error code '{}'.", mark.code()),
                )
            }
        }
        _ => Outcome::Unrecognized,
    }
}

fn cookie_attempt(cookie: &str, mark: &Mark<'_>) -> Outcome {
    let ok = mark.succeeded();
    let result = if ok { "success" } else { mark.result.unwrap_or("none") };
    emit(
        pick(ok, Verbose, Warning),
        format!("Attempted to set the {} cookie with result {}.", cookie, result),
    )
}
