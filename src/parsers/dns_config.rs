//! Resolver configuration parsing for `scutil --dns` and `/etc/resolv.conf`

use super::key_value;
use crate::models::{DnsConfiguration, DnsResolverEntry};

/// Parse resolver configuration.
///
/// `scutil --dns` prints `resolver #n` blocks; resolv.conf text has no
/// such blocks and is read as a single unscoped resolver. Resolvers
/// without nameservers (mDNS, search-only) are dropped.
pub fn parse_dns_configuration(output: &str) -> DnsConfiguration {
    if output.lines().any(|l| l.trim_start().starts_with("resolver #")) {
        parse_scutil(output)
    } else {
        parse_resolv_conf(output)
    }
}

fn parse_scutil(output: &str) -> DnsConfiguration {
    let mut config = DnsConfiguration::default();
    let mut current: Option<DnsResolverEntry> = None;

    let finish = |entry: Option<DnsResolverEntry>, config: &mut DnsConfiguration| {
        if let Some(entry) = entry.filter(|e| !e.nameservers.is_empty()) {
            config.resolvers.push(entry);
        }
    };

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("resolver #") || trimmed.starts_with("DNS configuration") {
            finish(current.take(), &mut config);
            if trimmed.starts_with("resolver #") {
                current = Some(DnsResolverEntry::default());
            }
            continue;
        }

        let (Some(entry), Some((key, value))) = (current.as_mut(), key_value(trimmed)) else {
            continue;
        };

        if key.starts_with("nameserver") {
            entry.nameservers.push(value.to_string());
        } else if key.starts_with("search domain") {
            entry.search_domains.push(value.to_string());
        } else if key == "if_index" {
            entry.interface = value
                .split_once('(')
                .map(|(_, name)| name.trim_end_matches(')').trim().to_string())
                .filter(|name| !name.is_empty());
        }
    }
    finish(current.take(), &mut config);

    config
}

fn parse_resolv_conf(output: &str) -> DnsConfiguration {
    let mut entry = DnsResolverEntry::default();

    for line in output.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("nameserver") => entry.nameservers.extend(tokens.next().map(str::to_string)),
            Some("search") | Some("domain") => entry.search_domains.extend(tokens.map(str::to_string)),
            _ => {}
        }
    }

    let mut config = DnsConfiguration::default();
    if !entry.nameservers.is_empty() {
        config.resolvers.push(entry);
    }
    config
}
