//! Bulk DNS resolution reliability probe

use super::Prober;
use crate::models::DnsReliabilityResult;
use crate::parsers::parse_dig_output;
use std::sync::atomic::{AtomicBool, Ordering};

/// Label used when queries go to the system resolver
pub const SYSTEM_DEFAULT_RESOLVER: &str = "system default";

/// Fixed list of long-lived, widely-resolvable domains.
///
/// Runs always take a prefix of this list, so two runs with the same
/// count query the same names.
pub const DOMAIN_CORPUS: &[&str] = &[
    // technology
    "google.com", "facebook.com", "youtube.com", "amazon.com", "microsoft.com",
    "apple.com", "netflix.com", "twitter.com", "instagram.com", "linkedin.com",
    "adobe.com", "oracle.com", "salesforce.com", "zoom.us", "cisco.com",
    "intel.com", "nvidia.com", "amd.com", "ibm.com", "dell.com",
    "hp.com", "samsung.com", "sony.com", "toshiba.com", "lenovo.com",
    // cloud and CDN
    "cloudflare.com", "aws.amazon.com", "azure.microsoft.com", "cloud.google.com", "digitalocean.com",
    "heroku.com", "netlify.com", "vercel.com", "fastly.com", "akamai.com",
    // messaging and social
    "whatsapp.com", "telegram.org", "discord.com", "slack.com", "teams.microsoft.com",
    "snapchat.com", "tiktok.com", "pinterest.com", "tumblr.com", "mastodon.social",
    // developer
    "github.com", "gitlab.com", "bitbucket.org", "stackoverflow.com", "npmjs.com",
    "pypi.org", "docker.com", "kubernetes.io", "apache.org", "mozilla.org",
    "w3.org", "ietf.org", "jquery.com", "nodejs.org", "python.org",
    // shopping
    "ebay.com", "walmart.com", "target.com", "bestbuy.com", "shopify.com",
    "etsy.com", "aliexpress.com", "alibaba.com", "rakuten.com", "wayfair.com",
    // news
    "cnn.com", "bbc.com", "nytimes.com", "reuters.com", "bloomberg.com",
    "wsj.com", "theguardian.com", "forbes.com", "techcrunch.com", "wired.com",
    "theverge.com", "arstechnica.com", "engadget.com", "mashable.com",
    // streaming
    "spotify.com", "soundcloud.com", "twitch.tv", "vimeo.com", "dailymotion.com",
    "hulu.com", "disneyplus.com", "hbomax.com", "primevideo.com", "crunchyroll.com",
    // productivity
    "dropbox.com", "box.com", "onedrive.live.com", "notion.so", "trello.com",
    "asana.com", "monday.com", "atlassian.com", "evernote.com", "grammarly.com",
    // payments
    "paypal.com", "stripe.com", "square.com", "coinbase.com", "visa.com",
    "mastercard.com", "americanexpress.com", "bankofamerica.com", "chase.com",
    // reference and education
    "wikipedia.org", "wikimedia.org", "khanacademy.org", "coursera.org", "udemy.com",
    "edx.org", "mit.edu", "stanford.edu", "harvard.edu", "archive.org",
    "dictionary.com", "imdb.com",
    // search and browsers
    "bing.com", "yahoo.com", "duckduckgo.com", "yandex.com", "baidu.com",
    "brave.com", "opera.com", "vivaldi.com",
    // publishing
    "medium.com", "wordpress.com", "blogger.com", "substack.com", "ghost.org",
    // gaming
    "steampowered.com", "epicgames.com", "ea.com", "blizzard.com", "roblox.com",
    "minecraft.net", "playstation.com", "xbox.com", "nintendo.com",
    // travel
    "maps.google.com", "booking.com", "airbnb.com", "expedia.com", "tripadvisor.com",
    "uber.com", "lyft.com",
    // public sector
    "usa.gov", "whitehouse.gov", "nasa.gov", "who.int", "un.org",
    "europa.eu", "gov.uk", "canada.ca",
    // security
    "protonmail.com", "signal.org", "lastpass.com", "1password.com", "bitwarden.com",
];

impl Prober {
    /// Resolve the first `count` corpus domains one at a time.
    ///
    /// A query counts only when dig exits 0 and returned an answer. Any
    /// runner failure is one failed domain. Once `cancel` is set the loop
    /// stops; the query in flight at that moment is not tallied, since the
    /// interrupt may have killed it, so the result covers only queries
    /// that completed undisturbed.
    pub async fn dns_reliability(&self, server: Option<&str>, count: usize, cancel: &AtomicBool) -> DnsReliabilityResult {
        let time_arg = format!("+time={}", self.settings.dns_query_timeout_seconds);
        let server_arg = server.map(|s| format!("@{}", s));

        let mut successful = 0u32;
        let mut failures = Vec::new();
        let mut response_times = Vec::new();

        for domain in DOMAIN_CORPUS.iter().take(count).copied() {
            if cancel.load(Ordering::SeqCst) {
                break;
            }

            let mut args = vec![time_arg.as_str(), "+tries=1"];
            if let Some(server_arg) = &server_arg {
                args.push(server_arg.as_str());
            }
            args.push(domain);

            let answered = match self.runner.run("dig", &args, self.settings.dns_process_timeout).await {
                Ok(output) if output.success() => {
                    let answer = parse_dig_output(&output.stdout);
                    if answer.has_answer() {
                        if let Some(ms) = answer.query_time_ms {
                            response_times.push(ms as f64);
                        }
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            };

            if cancel.load(Ordering::SeqCst) {
                break;
            }
            if answered {
                successful += 1;
            } else {
                failures.push(domain.to_string());
            }
        }

        DnsReliabilityResult::from_tally(
            server.unwrap_or(SYSTEM_DEFAULT_RESOLVER),
            successful,
            failures,
            &response_times,
        )
    }
}
