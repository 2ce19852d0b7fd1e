use crate::carrier::Carrier;
use regex::RegexSet;
use std::sync::LazyLock;

/// Number formats per carrier, checked in this order
///
/// Several numeric lengths are shared between carriers (20/22/15 digits for
/// USPS and FedEx, 12 digits for FedEx and DHL). The first carrier in this
/// table that matches wins.
const CARRIER_PATTERNS: &[(Carrier, &[&str])] = &[
    (
        Carrier::Ups,
        &[r"^1Z[0-9A-Z]{16}$", r"^1Z[0-9A-Z]{18}$", r"^T[0-9]{10}$"],
    ),
    (
        Carrier::Usps,
        &[
            r"^[0-9]{20}$",
            r"^[0-9]{22}$",
            r"^[A-Z]{2}[0-9]{9}US$",
            r"^[0-9]{13}$",
            r"^[0-9]{15}$",
        ],
    ),
    (
        Carrier::FedEx,
        &[
            r"^[0-9]{12}$",
            r"^[0-9]{14}$",
            r"^[0-9]{15}$",
            r"^[0-9]{20}$",
            r"^[0-9]{22}$",
        ],
    ),
    (
        Carrier::Dhl,
        &[
            r"^[0-9]{10}$",
            r"^[0-9]{11}$",
            r"^[0-9]{12}$",
            r"^JD[0-9]{18}$",
            r"^[0-9]{9}$",
        ],
    ),
];

static MATCHERS: LazyLock<Vec<(Carrier, RegexSet)>> = LazyLock::new(|| {
    CARRIER_PATTERNS
        .iter()
        .map(|(carrier, patterns)| {
            let set = RegexSet::new(*patterns).expect("carrier patterns are valid regexes");
            (*carrier, set)
        })
        .collect()
});

/// Detects the carrier of a tracking number from its format
///
/// The number is upper-cased before matching. Callers that accept user
/// input should run it through
/// [`normalize_tracking_number`](crate::carrier::normalize_tracking_number)
/// first so spaces and dashes do not defeat detection.
///
/// # Examples
///
/// ```
/// use package_tracker::carrier::{detect_carrier, Carrier};
///
/// assert_eq!(detect_carrier("1Z999AA10123456784"), Carrier::Ups);
/// assert_eq!(detect_carrier("9400100000000000000000"), Carrier::Usps);
/// assert_eq!(detect_carrier("123456789012"), Carrier::FedEx);
/// assert_eq!(detect_carrier("JD014600003828394701"), Carrier::Dhl);
/// assert_eq!(detect_carrier("hello"), Carrier::Unknown);
/// ```
pub fn detect_carrier(tracking_number: &str) -> Carrier {
    let candidate = tracking_number.to_uppercase();

    MATCHERS
        .iter()
        .find(|(_, set)| set.is_match(&candidate))
        .map(|(carrier, _)| *carrier)
        .unwrap_or(Carrier::Unknown)
}
