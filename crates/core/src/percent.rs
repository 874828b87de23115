/// Integer percentage of `part` over `whole`, rounded half up.
///
/// Returns 0 when `whole` is 0 and saturates at 100.
#[must_use]
pub fn rounded_percentage(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    let rounded = (200 * part + whole) / (2 * whole);
    u8::try_from(rounded).unwrap_or(100)
}
