//! Static knowledge about Bluetooth identifiers.
//!
//! Holds the Bluetooth SIG assigned GATT service table, the keyword lists
//! used to spot beacon protocols and vendors in free text, and the set of
//! domains treated as authoritative. All of it is `'static` data built at
//! compile time; [`BLUETOOTH`] is the instance the classifier uses by
//! default.
//!
//! Reference: <https://www.bluetooth.com/specifications/assigned-numbers/>

/// Suffix shared by every UUID derived from the Bluetooth SIG base UUID.
pub const SIG_BASE_SUFFIX: &str = "-0000-1000-8000-00805f9b34fb";

/// An assigned GATT service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownService {
    /// 16-bit assigned number as four hex digits (e.g. `"180D"`).
    pub short_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Lookup tables consulted by the classifier.
#[derive(Debug)]
pub struct KnowledgeBase {
    pub services: &'static [KnownService],
    pub ibeacon_indicators: &'static [&'static str],
    pub eddystone_indicators: &'static [&'static str],
    pub vendor_indicators: &'static [&'static str],
    pub authoritative_domains: &'static [&'static str],
}

const fn service(
    short_id: &'static str,
    name: &'static str,
    description: &'static str,
) -> KnownService {
    KnownService {
        short_id,
        name,
        description,
    }
}

pub const KNOWN_SERVICES: &[KnownService] = &[
    service(
        "1800",
        "Generic Access",
        "Generic Access Profile service for device name and appearance",
    ),
    service(
        "1801",
        "Generic Attribute",
        "Generic Attribute Profile service for service discovery",
    ),
    service(
        "1802",
        "Immediate Alert",
        "Immediate Alert service for alerting devices",
    ),
    service(
        "1803",
        "Link Loss",
        "Link Loss service for proximity detection",
    ),
    service(
        "1804",
        "Tx Power",
        "Tx Power service for transmission power reporting",
    ),
    service(
        "1805",
        "Current Time",
        "Current Time service for time synchronization",
    ),
    service(
        "1806",
        "Reference Time Update",
        "Reference Time Update service for time calibration",
    ),
    service(
        "1807",
        "Next DST Change",
        "Next DST Change service for daylight saving time updates",
    ),
    service(
        "1808",
        "Glucose",
        "Glucose service for blood glucose monitoring",
    ),
    service(
        "1809",
        "Health Thermometer",
        "Health Thermometer service for body temperature measurement",
    ),
    service(
        "180A",
        "Device Information",
        "Device Information service for manufacturer and model data",
    ),
    service(
        "180D",
        "Heart Rate",
        "Heart Rate service for heart rate monitoring",
    ),
    service(
        "180E",
        "Phone Alert Status",
        "Phone Alert Status service for phone alerts",
    ),
    service(
        "180F",
        "Battery Service",
        "Battery Service for battery level reporting",
    ),
    service(
        "1810",
        "Blood Pressure",
        "Blood Pressure service for blood pressure monitoring",
    ),
    service(
        "1811",
        "Alert Notification",
        "Alert Notification service for push notifications",
    ),
    service(
        "1812",
        "Human Interface Device",
        "Human Interface Device service for HID over GATT",
    ),
    service(
        "1813",
        "Scan Parameters",
        "Scan Parameters service for scan configuration",
    ),
    service(
        "1814",
        "Running Speed and Cadence",
        "Running Speed and Cadence service for fitness tracking",
    ),
    service(
        "1816",
        "Cycling Speed and Cadence",
        "Cycling Speed and Cadence service for cycling fitness",
    ),
    service(
        "1818",
        "Cycling Power",
        "Cycling Power service for power meters",
    ),
    service(
        "1819",
        "Location and Navigation",
        "Location and Navigation service for GPS data",
    ),
    service(
        "181A",
        "Environmental Sensing",
        "Environmental Sensing service for environmental data",
    ),
    service(
        "181C",
        "User Data",
        "User Data service for user profile information",
    ),
    service(
        "181D",
        "Weight Scale",
        "Weight Scale service for body weight measurement",
    ),
    service(
        "181E",
        "Bond Management",
        "Bond Management service for pairing management",
    ),
    service(
        "181F",
        "Continuous Glucose Monitoring",
        "Continuous Glucose Monitoring service for CGM devices",
    ),
    service(
        "1820",
        "Internet Protocol Support",
        "Internet Protocol Support service for IP connectivity",
    ),
    service(
        "1821",
        "Indoor Positioning",
        "Indoor Positioning service for indoor location",
    ),
    service(
        "1822",
        "Pulse Oximeter",
        "Pulse Oximeter service for SpO2 measurement",
    ),
    service(
        "1823",
        "HTTP Proxy",
        "HTTP Proxy service for web access via BLE",
    ),
    service(
        "1824",
        "Transport Discovery",
        "Transport Discovery service for transport discovery",
    ),
    service(
        "1825",
        "Object Transfer",
        "Object Transfer service for file transfer",
    ),
    service(
        "1826",
        "Fitness Machine",
        "Fitness Machine service for fitness equipment",
    ),
    service(
        "1827",
        "Mesh Provisioning",
        "Mesh Provisioning service for Bluetooth Mesh",
    ),
    service(
        "1828",
        "Mesh Proxy",
        "Mesh Proxy service for Bluetooth Mesh",
    ),
];

pub const IBEACON_INDICATORS: &[&str] = &["ibeacon", "i-beacon", "apple beacon", "proximity uuid"];

pub const EDDYSTONE_INDICATORS: &[&str] = &[
    "eddystone",
    "google beacon",
    "eddystone-uid",
    "eddystone-url",
    "eddystone-tlm",
    "eddystone-eid",
];

pub const VENDOR_INDICATORS: &[&str] = &[
    "apple",
    "samsung",
    "google",
    "fitbit",
    "garmin",
    "nordic",
    "nordic semiconductor",
    "texas instruments",
    "silicon labs",
    "espressif",
    "qualcomm",
    "broadcom",
    "xiaomi",
    "huawei",
    "microsoft",
    "amazon",
    "nrf",
];

pub const AUTHORITATIVE_DOMAINS: &[&str] = &[
    "bluetooth.com",
    "bluetooth.org",
    "developer.apple.com",
    "developer.android.com",
    "developer.nordicsemi.com",
    "infocenter.nordicsemi.com",
    "ti.com",
    "silabs.com",
];

/// The built-in Bluetooth knowledge base.
pub static BLUETOOTH: KnowledgeBase = KnowledgeBase {
    services: KNOWN_SERVICES,
    ibeacon_indicators: IBEACON_INDICATORS,
    eddystone_indicators: EDDYSTONE_INDICATORS,
    vendor_indicators: VENDOR_INDICATORS,
    authoritative_domains: AUTHORITATIVE_DOMAINS,
};

/// True when `identifier` has the form `0000XXXX-0000-1000-8000-00805f9b34fb`
/// (case-insensitive).
pub fn matches_standard_form(identifier: &str) -> bool {
    extract_short_form(identifier).is_some()
}

/// Return the `XXXX` of a standard-form identifier.
pub fn extract_short_form(identifier: &str) -> Option<&str> {
    if identifier.len() != 36 || !identifier.is_ascii() {
        return None;
    }
    let (prefix, rest) = identifier.split_at(4);
    let (short, suffix) = rest.split_at(4);

    let ok = prefix == "0000"
        && short.chars().all(|c| c.is_ascii_hexdigit())
        && suffix.eq_ignore_ascii_case(SIG_BASE_SUFFIX);
    ok.then_some(short)
}

/// Case-insensitive substring test against a keyword list.
pub fn contains_any(text_lower: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text_lower.contains(n))
}

impl KnowledgeBase {
    /// Look up the assigned service for a standard-form identifier.
    pub fn lookup_known_service(&self, identifier: &str) -> Option<&'static KnownService> {
        let short = extract_short_form(identifier)?;
        self.services
            .iter()
            .find(|s| s.short_id.eq_ignore_ascii_case(short))
    }

    /// True when the URL contains one of the trusted domains.
    pub fn is_authoritative_source(&self, url: &str) -> bool {
        contains_any(&url.to_lowercase(), self.authoritative_domains)
    }
}
