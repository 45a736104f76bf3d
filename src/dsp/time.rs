/// Get the number of samples in a time span given in milliseconds.
#[inline]
pub fn ms_to_sample_count(milliseconds: f64, sample_rate: f64) -> f64 {
    sample_rate * (milliseconds / 1000.0)
}

#[test]
fn one_second_at_48_khz() {
    assert_eq!(ms_to_sample_count(1000.0, 48000.0), 48000.0);
    assert_eq!(ms_to_sample_count(500.0, 44100.0), 22050.0);
}
