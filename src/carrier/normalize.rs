/// Normalizes user-entered tracking numbers
///
/// Surrounding and inner whitespace and dashes are removed and letters are
/// upper-cased, so `1z 999-aa1` and `1Z999AA1` name the same package.
///
/// # Examples
///
/// ```
/// use package_tracker::carrier::normalize_tracking_number;
///
/// assert_eq!(normalize_tracking_number(" 1z999aa1 0123 "), "1Z999AA10123");
/// assert_eq!(normalize_tracking_number("9400-1000-0000"), "940010000000");
/// ```
pub fn normalize_tracking_number(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}
