//! Wi-Fi association and scan records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal strength bucket derived from RSSI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    #[serde(rename = "very weak")]
    VeryWeak,
    Weak,
    Fair,
    Good,
    Excellent,
}

impl SignalQuality {
    /// Bucket an RSSI value in dBm
    pub fn from_rssi(rssi: i32) -> Self {
        if rssi >= -55 {
            Self::Excellent
        } else if rssi >= -60 {
            Self::Good
        } else if rssi >= -70 {
            Self::Fair
        } else if rssi >= -80 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Weak => "weak",
            Self::VeryWeak => "very weak",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for SignalQuality {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Frequency band derived from the channel number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    Band2_4GHz,
    #[serde(rename = "5GHz")]
    Band5GHz,
    #[serde(rename = "6GHz")]
    Band6GHz,
}

impl Band {
    pub fn from_channel(channel: u16) -> Self {
        if channel <= 14 {
            Self::Band2_4GHz
        } else if channel <= 177 {
            Self::Band5GHz
        } else {
            Self::Band6GHz
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Band2_4GHz => "2.4GHz",
            Self::Band5GHz => "5GHz",
            Self::Band6GHz => "6GHz",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current Wi-Fi association
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WiFiInfo {
    pub ssid: String,
    pub bssid: String,
    /// Primary channel, 1-233
    pub channel: u16,
    /// dBm, negative
    pub rssi: i32,
    /// dBm; 0 when the tool does not report it
    pub noise: i32,
    /// dB
    pub snr: i32,
    /// Mbps
    pub tx_rate: u32,
    pub mcs_index: Option<u8>,
    pub phy_mode: String,
    pub security: String,
    /// MHz; 0 when unknown
    pub channel_width: u16,
}

impl WiFiInfo {
    pub fn signal_quality(&self) -> SignalQuality {
        SignalQuality::from_rssi(self.rssi)
    }

    pub fn band(&self) -> Band {
        Band::from_channel(self.channel)
    }

    /// Whether a noise floor was measured, which makes `snr` meaningful
    pub fn has_noise_reading(&self) -> bool {
        self.noise != 0
    }
}

/// One access point seen during a scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkScan {
    pub ssid: String,
    pub bssid: String,
    pub channel: u16,
    pub rssi: i32,
    pub security: String,
}

impl NetworkScan {
    pub fn signal_quality(&self) -> SignalQuality {
        SignalQuality::from_rssi(self.rssi)
    }

    pub fn band(&self) -> Band {
        Band::from_channel(self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wifi(rssi: i32, channel: u16) -> WiFiInfo {
        WiFiInfo {
            ssid: "HomeNet".to_string(),
            rssi,
            channel,
            ..WiFiInfo::default()
        }
    }

    #[test]
    fn test_signal_quality_buckets() {
        assert_eq!(wifi(-45, 36).signal_quality(), SignalQuality::Excellent);
        assert_eq!(wifi(-55, 36).signal_quality(), "excellent");
        assert_eq!(wifi(-58, 36).signal_quality(), SignalQuality::Good);
        assert_eq!(wifi(-65, 36).signal_quality(), SignalQuality::Fair);
        assert_eq!(wifi(-70, 36).signal_quality(), SignalQuality::Fair);
        assert_eq!(wifi(-75, 36).signal_quality(), SignalQuality::Weak);
        assert_eq!(wifi(-85, 36).signal_quality(), "very weak");
    }

    #[test]
    fn test_signal_quality_is_monotonic() {
        let mut previous = SignalQuality::VeryWeak;
        for rssi in -100..=-20 {
            let quality = SignalQuality::from_rssi(rssi);
            assert!(quality >= previous, "quality dropped at {rssi} dBm");
            previous = quality;
        }
    }

    #[test]
    fn test_band_from_channel() {
        assert_eq!(wifi(-50, 1).band(), Band::Band2_4GHz);
        assert_eq!(wifi(-50, 14).band(), Band::Band2_4GHz);
        assert_eq!(wifi(-50, 36).band(), Band::Band5GHz);
        assert_eq!(wifi(-50, 177).band(), Band::Band5GHz);
        assert_eq!(wifi(-50, 181).band().to_string(), "6GHz");
    }

    #[test]
    fn test_quality_serializes_with_space() {
        let json = serde_json::to_string(&SignalQuality::VeryWeak).unwrap();
        assert_eq!(json, "\"very weak\"");
    }
}
