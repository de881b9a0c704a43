//! # Default Attribute Inference
//!
//! Placeholder heuristics that fill in location, type and status when a
//! threat record leaves them out. They look only at the leading octet of
//! the IP string and at the raw severity numbers. This is not geolocation
//! and not malware classification; callers who know better should supply
//! the fields explicitly.

/// Guess a location from the IP prefix.
pub fn infer_location(ip: &str) -> &'static str {
    if ip.starts_with("192.") || ip.starts_with("8.") {
        "USA"
    } else if ip.starts_with("10.") {
        "Germany"
    } else if ip.starts_with("172.") {
        "China"
    } else {
        "Unknown"
    }
}

/// Guess a threat type from the IP prefix, falling back to the severity
/// numbers for addresses the prefix table does not cover.
pub fn infer_type(ip: &str, base_severity: u32, pre_deform_percent: u32) -> &'static str {
    if ip.starts_with("192.") {
        "DDoS"
    } else if ip.starts_with("10.") {
        "Malware"
    } else if ip.starts_with("172.") {
        "Virus"
    } else if base_severity >= 80 || pre_deform_percent > 50 {
        "Ransomware"
    } else if base_severity >= 50 {
        "Malware"
    } else {
        "Spyware"
    }
}

/// Guess a response status from severity and pre-deformation.
pub fn infer_status(severity: u32, pre_deform_percent: u32) -> &'static str {
    if severity >= 85 || pre_deform_percent > 60 {
        "Critical"
    } else if severity >= 60 || pre_deform_percent > 30 {
        "Active"
    } else {
        "Monitored"
    }
}
