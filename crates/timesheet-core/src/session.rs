//! Per-load session tokens
//!
//! A token is the standard (padded) base64 encoding of
//! `"<epoch-millis>-<student id>"`. It correlates a request with the load
//! that issued it and carries no authorization meaning.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local};
use timesheet_util::{SessionToken, StudentId, TimesheetError};

/// Build the session token for a load of `student_id` issued at `now`
pub fn build_session(student_id: &StudentId, now: &DateTime<Local>) -> SessionToken {
    let raw = format!("{}-{}", now.timestamp_millis(), student_id);
    SessionToken::from_encoded(STANDARD.encode(raw))
}

/// Decoded contents of a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStamp {
    pub millis: i64,
    pub student_id: StudentId,
}

/// Recover the timestamp and student id from a token
pub fn decode_session(token: &SessionToken) -> Result<SessionStamp, TimesheetError> {
    let bytes = STANDARD
        .decode(token.as_str())
        .map_err(|e| TimesheetError::session_token(e.to_string()))?;
    let raw = String::from_utf8(bytes).map_err(|e| TimesheetError::session_token(e.to_string()))?;

    // Millis never contain '-' after the sign, the student id may
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (millis, student_id) = unsigned
        .split_once('-')
        .ok_or_else(|| TimesheetError::session_token("missing separator"))?;
    let millis = format!("{}{}", sign, millis)
        .parse::<i64>()
        .map_err(|e| TimesheetError::session_token(e.to_string()))?;

    Ok(SessionStamp {
        millis,
        student_id: StudentId::new(student_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_millis(millis: i64) -> DateTime<Local> {
        Local.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn known_encoding() {
        let token = build_session(&StudentId::new("12345"), &at_millis(1_700_000_000_000));
        assert_eq!(token.as_str(), "MTcwMDAwMDAwMDAwMC0xMjM0NQ==");
    }

    #[test]
    fn identical_inputs_identical_tokens() {
        let now = at_millis(1_736_762_400_000);
        let id = StudentId::new("12345");
        assert_eq!(build_session(&id, &now), build_session(&id, &now));
    }

    #[test]
    fn differing_inputs_differing_tokens() {
        let now = at_millis(1_736_762_400_000);
        let a = build_session(&StudentId::new("12345"), &now);
        let b = build_session(&StudentId::new("67890"), &now);
        let c = build_session(&StudentId::new("12345"), &at_millis(1_736_762_400_001));

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn decode_recovers_parts() {
        let token = build_session(&StudentId::new("A-17"), &at_millis(1_736_762_400_123));
        let stamp = decode_session(&token).unwrap();

        assert_eq!(stamp.millis, 1_736_762_400_123);
        assert_eq!(stamp.student_id, StudentId::new("A-17"));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_session(&SessionToken::from_encoded("not base64!")).is_err());
        // "12345" with no separator
        assert!(decode_session(&SessionToken::from_encoded("MTIzNDU=")).is_err());
    }
}
