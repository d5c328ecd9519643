//! `dig` text output parsing

use super::{cached, extract_u64};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// What a single dig query returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigAnswer {
    /// `ANSWER: n` from the flags header, 0 when absent
    pub answer_count: u32,
    pub has_answer_section: bool,
    pub query_time_ms: Option<u64>,
}

impl DigAnswer {
    /// The query produced at least one answer record
    pub fn has_answer(&self) -> bool {
        self.answer_count > 0 || self.has_answer_section
    }
}

pub fn parse_dig_output(output: &str) -> DigAnswer {
    static ANSWER: OnceLock<Option<Regex>> = OnceLock::new();

    let answer_count = cached(&ANSWER, r"ANSWER: (\d+)")
        .and_then(|re| re.captures(output))
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0);

    let query_time_ms = output
        .lines()
        .find_map(|line| line.split_once("Query time:"))
        .and_then(|(_, rest)| extract_u64(rest));

    DigAnswer {
        answer_count,
        has_answer_section: output.contains("ANSWER SECTION"),
        query_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIG_OK: &str = "; <<>> DiG 9.10.6 <<>> +time=3 +tries=1 google.com
;; global options: +cmd
;; Got answer:
;; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 4242
;; flags: qr rd ra; QUERY: 1, ANSWER: 1, AUTHORITY: 0, ADDITIONAL: 1

;; QUESTION SECTION:
;google.com.\t\t\tIN\tA

;; ANSWER SECTION:
google.com.\t\t300\tIN\tA\t142.250.72.14

;; Query time: 24 msec
;; SERVER: 192.168.1.1#53(192.168.1.1)
;; WHEN: Mon Jan 01 12:00:00 PST 2024
;; MSG SIZE  rcvd: 55
";

    #[test]
    fn test_parse_answer() {
        let answer = parse_dig_output(DIG_OK);
        assert_eq!(answer.answer_count, 1);
        assert!(answer.has_answer_section);
        assert!(answer.has_answer());
        assert_eq!(answer.query_time_ms, Some(24));
    }

    #[test]
    fn test_parse_nxdomain() {
        let output = ";; ->>HEADER<<- opcode: QUERY, status: NXDOMAIN, id: 1
;; flags: qr rd ra; QUERY: 1, ANSWER: 0, AUTHORITY: 1, ADDITIONAL: 1

;; Query time: 31 msec
";
        let answer = parse_dig_output(output);
        assert!(!answer.has_answer());
        assert_eq!(answer.query_time_ms, Some(31));
    }

    #[test]
    fn test_parse_timeout() {
        let answer = parse_dig_output(";; connection timed out; no servers could be reached\n");
        assert_eq!(answer, DigAnswer::default());
    }
}
