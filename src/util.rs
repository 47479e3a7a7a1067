use encoding_rs::Encoding;

/// Spreadsheet style column name: 1 -> A, 26 -> Z, 27 -> AA.
pub fn base_26(mut num: u32) -> String {
    let mut result = String::new();
    while num > 0 {
        num -= 1; // Adjust for 1-based indexing
        let remainder = (num % 26) as u8;
        let letter = (b'A' + remainder) as char;
        result.insert(0, letter);
        num /= 26;
    }
    result
}

/// Guess text encoding from the first `max_bytes` of the input.
pub fn detect_encoding(bytes: &[u8], max_bytes: usize) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(max_bytes)];
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "A")]
    #[case(26, "Z")]
    #[case(27, "AA")]
    #[case(52, "AZ")]
    #[case(703, "AAA")]
    fn base_26_names(#[case] num: u32, #[case] expected: &str) {
        assert_eq!(base_26(num), expected);
    }

    #[test]
    fn utf8_is_detected() {
        let text = "Name,City\nJürgen,Zürich\n";
        assert_eq!(
            detect_encoding(text.as_bytes(), 1024),
            encoding_rs::UTF_8
        );
    }
}
