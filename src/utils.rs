use chrono::NaiveDate;

const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Buddhist Era years run 543 ahead of the Gregorian calendar.
const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Parses a provider draw label such as `"16 กรกฎาคม 2568"`.
pub fn thai_date_to_gregorian(label: &str) -> Option<NaiveDate> {
    let mut parts = label.split_whitespace();
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month = THAI_MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year - BUDDHIST_ERA_OFFSET, month, day)
}

/// `"16 กรกฎาคม 2568"` becomes `"16 July 2025"`. Labels that do not parse are
/// returned unchanged.
pub fn format_draw_date_english(label: &str) -> String {
    if label.trim().is_empty() {
        return "-".to_string();
    }
    match thai_date_to_gregorian(label) {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => label.to_string(),
    }
}

/// Groups digits in threes for display: `"123456"` becomes `"123 456"`.
pub fn format_ticket_display(ticket_number: &str) -> String {
    ticket_number
        .chars()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
