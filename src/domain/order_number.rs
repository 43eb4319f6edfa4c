use chrono::NaiveDate;

/// `ORD<YYYY><MM><DD><NNN>`; the sequence is padded to three digits and
/// simply widens past 999.
pub fn format_order_number(day: NaiveDate, sequence: i32) -> String {
    format!("ORD{}{:03}", day.format("%Y%m%d"), sequence)
}
