/// Combines one burst of raw ADC samples into a single reading.
///
/// A sample sitting on a rail (0 or full scale and above) wins over the
/// mean, so a disconnected or shorted sensor still reaches the estimator as
/// a rail reading instead of being averaged into a plausible value.
pub fn combine(samples: &[u16], full_scale: u16) -> Option<u16> {
    if samples.is_empty() {
        return None;
    }

    if let Some(&rail) = samples.iter().find(|&&s| s == 0 || s >= full_scale) {
        return Some(rail);
    }

    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    let count = samples.len() as u64;

    // round half up
    Some(((sum + count / 2) / count) as u16)
}
