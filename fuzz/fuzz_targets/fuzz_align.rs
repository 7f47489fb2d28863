#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packset::sets::RangedSet;

#[derive(Arbitrary, Debug)]
struct Input {
    offset: i16,
    length: u16,
    values: Vec<u16>,
    new_offset: i16,
    new_length: u16,
}

fuzz_target!(|input: Input| {
    // Realignment must agree with copying members one by one
    let offset = input.offset as i64;
    let length = input.length as usize % 2048;
    let values: Vec<i64> = if length == 0 {
        Vec::new()
    } else {
        input
            .values
            .iter()
            .map(|&v| offset + (v as usize % length) as i64)
            .collect()
    };
    let Ok(set) = RangedSet::<u8>::from_values(offset, length, values) else {
        return;
    };

    let new_offset = input.new_offset as i64;
    let new_length = input.new_length as usize % 2048;
    let aligned = set.align_to(new_offset, new_length);

    let mut expected = RangedSet::<u8>::new(new_offset, new_length);
    for v in set.iter() {
        if expected.in_range(v) {
            let _ = expected.insert(v);
        }
    }
    assert_eq!(aligned, expected);
});
