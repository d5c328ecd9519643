//! Interface counter parsing for `netstat -I <dev> -b -d -n` and `netstat -i`

use super::extract_u64;
use crate::models::NetworkMetrics;

/// Parse the counters row of `interface`.
///
/// Columns are located by their header labels. Values are aligned from
/// the right, because BSD netstat leaves the Address column blank for
/// some rows and every value after it would otherwise shift left. The
/// link-level row (`<Link#n>`) wins over per-address rows. Returns
/// `None` when there is no header or no row for the interface.
pub fn parse_netstat(output: &str, interface: &str) -> Option<NetworkMetrics> {
    let mut lines = output.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines
        .by_ref()
        .find(|l| {
            let first = l.split_whitespace().next().unwrap_or_default();
            first == "Name" || first == "Iface"
        })?
        .split_whitespace()
        .collect();

    let rows: Vec<Vec<&str>> = lines
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| tokens.first().is_some_and(|name| name.trim_end_matches('*') == interface))
        .collect();

    let row = rows
        .iter()
        .find(|tokens| tokens.get(2).is_some_and(|n| n.starts_with("<Link")))
        .or_else(|| rows.first())?;

    let column = |labels: &[&str]| -> Option<u64> {
        let index = header.iter().position(|h| labels.contains(h))?;
        let from_right = header.len() - index;
        let token = row.len().checked_sub(from_right).and_then(|i| row.get(i))?;
        Some(extract_u64(token).unwrap_or(0))
    };

    let mut metrics = NetworkMetrics::new(interface);
    metrics.packets_in = column(&["Ipkts", "RX-OK"]).unwrap_or(0);
    metrics.errors_in = column(&["Ierrs", "RX-ERR"]).unwrap_or(0);
    metrics.bytes_in = column(&["Ibytes"]).unwrap_or(0);
    metrics.packets_out = column(&["Opkts", "TX-OK"]).unwrap_or(0);
    metrics.errors_out = column(&["Oerrs", "TX-ERR"]).unwrap_or(0);
    metrics.bytes_out = column(&["Obytes"]).unwrap_or(0);
    metrics.collisions = column(&["Coll"]).unwrap_or(0);

    if let Some(drops) = column(&["Drop", "Idrop", "RX-DRP"]) {
        metrics = metrics.with_drops(drops);
    }

    Some(metrics)
}
