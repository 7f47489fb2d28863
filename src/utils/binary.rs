/// Check if content appears to be binary
///
/// Looks at the first 8 KiB: too many NUL bytes or too many control
/// characters other than newline, carriage return and tab mean binary.
pub fn is_binary(content: &[u8]) -> bool {
    let sample = &content[..content.len().min(8192)];
    let sample_size = sample.len();

    let null_count = sample.iter().filter(|&&b| b == 0).count();
    if null_count > sample_size / 10 {
        return true;
    }

    let control_count = sample
        .iter()
        .filter(|&&b| b < 0x20 && !matches!(b, b'\n' | b'\r' | b'\t'))
        .count();

    control_count > sample_size / 8
}
