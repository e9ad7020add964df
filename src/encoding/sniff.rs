/*!
Best-guess encoding detection for buffers with no declared charset.

Detection is a byte-order-mark check followed by a UTF-8 probability score.  The score is the percentage of non-ASCII bytes that sit inside a well-formed multi-byte sequence.  High-bit legacy text forms such sequences only by accident, and rarely.
*/
use super::{DetectedEncoding, UTF16_BE_BOM, UTF16_LE_BOM, UTF8_BOM};

/// Scores above this are accepted outright.
const CONFIDENT: u8 = 98;

/// Scores above this are accepted when backed by enough good bytes.
const PLAUSIBLE: u8 = 95;

/// Good bytes needed for a merely plausible score.
const PLAUSIBLE_MIN_GOOD: usize = 30;

/**
Guess the encoding of `bytes`.

`bytes` is the content only; the terminator must not be included.  This never reads outside `bytes`, and always returns the same answer for the same input.
*/
pub fn detect(bytes: &[u8]) -> DetectedEncoding {
    if let Some(enc) = detect_bom(bytes) {
        return enc;
    }

    if utf8_confidence(bytes) > 0 {
        DetectedEncoding::Utf8
    } else {
        DetectedEncoding::SystemDefault
    }
}

fn detect_bom(bytes: &[u8]) -> Option<DetectedEncoding> {
    // Too short to carry a mark.
    let head = bytes.get(..3)?;

    if head == UTF8_BOM {
        Some(DetectedEncoding::Utf8)
    } else if head == UTF16_BE_BOM {
        Some(DetectedEncoding::Utf16Be)
    } else if head[..2] == UTF16_LE_BOM && matches!(head[2], 0x01..=0x7F) {
        Some(DetectedEncoding::Utf16Le)
    } else {
        None
    }
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/**
Number of bytes in the multi-byte sequence led by `lead`, or `None` if `lead` cannot start one.
*/
#[inline]
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/**
Computes how likely `bytes` is to be UTF-8, in `[0, 100]`.

Pure ASCII scores 0: it is valid in every encoding we could fall back to, so claiming it as UTF-8 says nothing.  Scores that fail both acceptance thresholds are also reported as 0.
*/
pub(crate) fn utf8_confidence(bytes: &[u8]) -> u8 {
    let mut ascii = 0usize;
    let mut good = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            ascii += 1;
            i += 1;
            continue;
        }

        let seq = sequence_len(b)
            .and_then(|n| bytes.get(i..i + n))
            .filter(|seq| seq[1..].iter().all(|&c| is_continuation(c)));

        match seq {
            Some(seq) => {
                good += seq.len();
                i += seq.len();
            },
            None => i += 1,
        }
    }

    if ascii == bytes.len() {
        return 0;
    }

    let non_ascii = (bytes.len() - ascii) as u64;
    let score = (100 * good as u64 / non_ascii) as u8;

    if score > CONFIDENT || (score > PLAUSIBLE && good > PLAUSIBLE_MIN_GOOD) {
        score
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use rstest::rstest;
    use super::*;
    use crate::encoding::DetectedEncoding::*;

    /// Forty Cyrillic letters (80 good bytes) with `stray` lone high bytes appended.
    fn cyrillic_with_strays(stray: usize) -> Vec<u8> {
        let mut bytes = "Ж".repeat(40).into_bytes();
        bytes.extend(std::iter::repeat(0xFF).take(stray));
        bytes
    }

    #[rstest]
    #[case::empty(b"", SystemDefault)]
    #[case::two_bytes(&[0xEF, 0xBB], SystemDefault)]
    #[case::utf8_bom(&[0xEF, 0xBB, 0xBF], Utf8)]
    #[case::utf8_bom_then_junk(&[0xEF, 0xBB, 0xBF, 0xFF, 0xFE, 0x80], Utf8)]
    #[case::utf16_be_bom(&[0xFE, 0xFF, 0x00, 0x41], Utf16Be)]
    #[case::utf16_le_bom(&[0xFF, 0xFE, 0x41], Utf16Le)]
    #[case::utf16_le_bom_lowest(&[0xFF, 0xFE, 0x01], Utf16Le)]
    #[case::utf16_le_bom_non_ascii(&[0xFF, 0xFE, 0x80], SystemDefault)]
    #[case::ascii(b"hello", SystemDefault)]
    #[case::cjk("中言语".as_bytes(), Utf8)]
    #[case::latin("Un apôtre".as_bytes(), Utf8)]
    #[case::cyrillic("красавица Наталья".as_bytes(), Utf8)]
    #[case::emoji("ok 😀".as_bytes(), Utf8)]
    #[case::latin1_garcon(b"g\xaar\xe7on", SystemDefault)]
    #[case::broken_continuation(&[0x61, 0xC3, 0x41, 0xC3, 0xA9], SystemDefault)]
    fn detects(#[case] bytes: &[u8], #[case] expected: DetectedEncoding) {
        assert_eq!(detect(bytes), expected);
    }

    #[test]
    fn ascii_scores_zero() {
        assert_eq!(utf8_confidence(b"hello"), 0);
        assert_eq!(utf8_confidence(b""), 0);
    }

    #[test]
    fn well_formed_cjk_scores_full() {
        assert_eq!(utf8_confidence("中言语".as_bytes()), 100);
    }

    #[rstest]
    // 80 / 82 = 97
    #[case(2, 97)]
    // 80 / 83 = 96
    #[case(3, 96)]
    fn marginal_scores_pass_with_a_large_sample(#[case] stray: usize, #[case] score: u8) {
        let bytes = cyrillic_with_strays(stray);
        assert_eq!(utf8_confidence(&bytes), score);
        assert_eq!(detect(&bytes), Utf8);
    }

    #[test]
    fn marginal_scores_fail_with_a_small_sample() {
        // 10 good bytes out of 11 non-ASCII bytes: 90, and too few good bytes anyway.
        let mut bytes = "Ж".repeat(5).into_bytes();
        bytes.push(0xFF);
        assert_eq!(utf8_confidence(&bytes), 0);
        assert_eq!(detect(&bytes), SystemDefault);
    }

    #[test]
    fn low_scores_are_rejected() {
        // 80 / 85 = 94
        let bytes = cyrillic_with_strays(5);
        assert_eq!(utf8_confidence(&bytes), 0);
        assert_eq!(detect(&bytes), SystemDefault);
    }

    #[rstest]
    #[case::two(&[0x41, 0xC3])]
    #[case::three(&[0x41, 0xE4, 0xB8])]
    #[case::four(&[0x41, 0xF0, 0x9F, 0x98])]
    fn truncated_sequences_stay_in_bounds(#[case] bytes: &[u8]) {
        assert_eq!(utf8_confidence(bytes), 0);
        assert_eq!(detect(bytes), SystemDefault);
    }

    #[test]
    fn rejected_lead_does_not_swallow_the_next_sequence() {
        // The first lead fails validation, but the following `C3 A9` still counts.
        let bytes = [0xC3, 0xC3, 0xA9];
        // 2 good of 3 non-ASCII.
        assert_eq!(utf8_confidence(&bytes), 0);
        let mut long = vec![0xC3];
        long.extend("é".repeat(60).as_bytes());
        // 120 / 121 = 99
        assert_eq!(utf8_confidence(&long), 99);
    }

    #[quickcheck]
    fn detect_is_pure(bytes: Vec<u8>) -> bool {
        detect(&bytes) == detect(&bytes)
    }

    #[quickcheck]
    fn confidence_is_a_percentage(bytes: Vec<u8>) -> bool {
        utf8_confidence(&bytes) <= 100
    }

    #[quickcheck]
    fn valid_utf8_without_bom_is_utf8_or_ascii(s: String) -> bool {
        let bytes = s.as_bytes();
        if bytes.starts_with(&UTF8_BOM) {
            return true;
        }
        match detect(bytes) {
            Utf8 => !s.is_ascii(),
            SystemDefault => s.is_ascii(),
            _ => false,
        }
    }
}
