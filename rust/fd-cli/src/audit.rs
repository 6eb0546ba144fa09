//! Offline re-verification of a session transcript.

use std::collections::HashMap;
use std::path::Path;

use fd_fair::{fair_value, verify, Digest, SecretKey};
use fd_logging::{read_events, NdjsonError, RevealEventV1, EVENT_COMMIT, EVENT_REVEAL};

#[derive(Debug)]
pub struct RoundCheck {
    pub round: u32,
    pub purpose: String,
    pub result: Result<(), String>,
}

#[derive(Debug, Default)]
pub struct AuditReport {
    pub events: usize,
    pub commits: usize,
    pub rounds: Vec<RoundCheck>,
}

impl AuditReport {
    pub fn failures(&self) -> usize {
        self.rounds.iter().filter(|r| r.result.is_err()).count()
    }
}

pub fn audit_file(path: impl AsRef<Path>) -> Result<AuditReport, NdjsonError> {
    let events = read_events(path)?;
    let mut report = AuditReport {
        events: events.len(),
        ..AuditReport::default()
    };
    // round -> digest shown before the user answered
    let mut committed: HashMap<u32, String> = HashMap::new();

    for ev in events {
        let kind = ev.get("event").and_then(|e| e.as_str()).map(str::to_string);
        match kind.as_deref() {
            Some(EVENT_COMMIT) => {
                report.commits += 1;
                // A round that does not fit u32 cannot belong to any reveal.
                let round = ev
                    .get("round")
                    .and_then(|r| r.as_u64())
                    .and_then(|r| u32::try_from(r).ok());
                let hmac = ev.get("hmac").and_then(|h| h.as_str());
                if let (Some(round), Some(hmac)) = (round, hmac) {
                    committed.insert(round, hmac.to_string());
                }
            }
            Some(EVENT_REVEAL) => {
                let check = match serde_json::from_value::<RevealEventV1>(ev) {
                    Ok(rev) => RoundCheck {
                        round: rev.round,
                        purpose: rev.purpose.clone(),
                        result: check_reveal(&rev, committed.get(&rev.round).map(String::as_str)),
                    },
                    Err(e) => RoundCheck {
                        round: 0,
                        purpose: String::new(),
                        result: Err(format!("malformed reveal event: {e}")),
                    },
                };
                report.rounds.push(check);
            }
            _ => {}
        }
    }
    Ok(report)
}

/// Everything a user could check by hand about one revealed round.
pub fn check_reveal(rev: &RevealEventV1, committed_hmac: Option<&str>) -> Result<(), String> {
    let Some(shown) = committed_hmac else {
        return Err("no commit event precedes this reveal".to_string());
    };
    if !shown.eq_ignore_ascii_case(&rev.hmac) {
        return Err(format!("digest changed after commit: {shown} -> {}", rev.hmac));
    }
    if rev.modulus < 1 {
        return Err("modulus must be at least 1".to_string());
    }
    if rev.own_value >= rev.modulus || rev.counterpart_value >= rev.modulus {
        return Err(format!(
            "values {} and {} must be below {}",
            rev.own_value, rev.counterpart_value, rev.modulus
        ));
    }
    let expected = fair_value(rev.own_value, rev.counterpart_value, rev.modulus);
    if expected != rev.result {
        return Err(format!("result {} but {} was expected", rev.result, expected));
    }
    let key = SecretKey::from_hex(&rev.key).map_err(|e| format!("bad key: {e}"))?;
    let digest = Digest::from_hex(&rev.hmac).map_err(|e| format!("bad hmac: {e}"))?;
    if !verify(key.as_bytes(), rev.own_value, &digest) {
        return Err("HMAC does not match the revealed key and value".to_string());
    }
    Ok(())
}
