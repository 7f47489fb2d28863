#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packset::text::SubstringIndex;

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    needle: String,
    case_sensitive: bool,
}

fuzz_target!(|input: Input| {
    // Compare indexed occurrences against a brute-force char scan
    let index = SubstringIndex::with_case(&input.text, input.case_sensitive);
    let fold = |s: &str| -> Vec<char> {
        if input.case_sensitive {
            s.chars().collect()
        } else {
            s.chars().map(|c| c.to_ascii_lowercase()).collect()
        }
    };
    let hay = fold(&input.text);
    let pat = fold(&input.needle);

    let expected: Vec<i64> = if pat.is_empty() || pat.len() > hay.len() {
        Vec::new()
    } else {
        (0..=hay.len() - pat.len())
            .filter(|&i| hay[i..i + pat.len()] == pat[..])
            .map(|i| i as i64)
            .collect()
    };

    let found: Vec<i64> = index.occurrences(&input.needle).iter().collect();
    assert_eq!(found, expected);
});
