/// Delivery status definitions
///
/// This module defines every status a tracked package can be reported in,
/// along with how each one is shown in the menu.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the delivery status of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// Package has reached the recipient
    Delivered,

    /// Package is moving through the carrier network
    InTransit,

    /// Package is on the vehicle for final delivery
    OutForDelivery,

    /// Carrier reported a delay, hold or other problem
    Exception,

    /// Label created but the carrier has not received the package
    Pending,

    /// Status could not be determined
    Unknown,
}

impl TrackingStatus {
    /// All statuses, in menu priority order
    pub const ALL: [TrackingStatus; 6] = [
        Self::Delivered,
        Self::OutForDelivery,
        Self::InTransit,
        Self::Exception,
        Self::Pending,
        Self::Unknown,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out For Delivery",
            Self::Exception => "Exception",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }

    /// Menu icon
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Delivered => "✅",
            Self::InTransit => "🚚",
            Self::OutForDelivery => "🚛",
            Self::Exception => "⚠️",
            Self::Pending => "⏳",
            Self::Unknown => "❓",
        }
    }

    /// Menu text color; unknown packages use the default color
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Delivered => Some("green"),
            Self::InTransit => Some("blue"),
            Self::OutForDelivery => Some("orange"),
            Self::Exception => Some("red"),
            Self::Pending => Some("yellow"),
            Self::Unknown => None,
        }
    }

    /// Returns true if the carrier actually told us something
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
