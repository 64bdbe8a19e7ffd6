use std::io::Cursor;

use rand::{Rng, SeedableRng};

use lzpi::{compress, decompress, Decoder, Encoder};

fn roundtrip(input: &[u8]) {
    let packed = compress(Cursor::new(input)).unwrap();
    let unpacked = decompress(Cursor::new(&packed)).unwrap();
    assert_eq!(
        input,
        &unpacked[..],
        "round-trip failed for {} input bytes ({} compressed)",
        input.len(),
        packed.len()
    );
}

#[test]
fn roundtrip_empty() {
    let packed = compress(Cursor::new(&b""[..])).unwrap();
    assert!(packed.is_empty());
    roundtrip(b"");
}

#[test]
fn roundtrip_single_byte() {
    let packed = compress(Cursor::new(&b"A"[..])).unwrap();
    assert_eq!(packed, [0x00, 0x41]);
    assert_eq!(decompress(Cursor::new(&packed)).unwrap(), b"A");
}

#[test]
fn roundtrip_every_single_byte_value() {
    for b in 0..=255u8 {
        let packed = compress(Cursor::new(&[b][..])).unwrap();
        assert_eq!(packed, [0x00, b]);
        assert_eq!(decompress(Cursor::new(&packed)).unwrap(), [b]);
    }
}

#[test]
fn roundtrip_run_of_as() {
    let input = [0x41u8; 10];
    let packed = compress(Cursor::new(&input[..])).unwrap();
    assert_eq!(packed, [0x40, 0x41, 0x00, 0x08]);
    roundtrip(&input);
}

#[test]
fn alternating_pair_expands_past_its_own_offset() {
    // two literals seed a copy whose length exceeds its distance
    let input: Vec<u8> = b"AB".iter().cycle().take(20).cloned().collect();
    let packed = compress(Cursor::new(&input[..])).unwrap();
    assert_eq!(packed, [0x20, b'A', b'B', 1, 17]);
    roundtrip(&input);
}

#[test]
fn repeated_alphabet_becomes_one_maximal_match() {
    // 0..=255 twice: the second half is a single longest-possible
    // back-reference with both fields saturated
    let mut input: Vec<u8> = (0..=255u8).collect();
    let first = input.clone();
    input.extend_from_slice(&first);

    let packed = compress(Cursor::new(&input[..])).unwrap();
    // 32 groups of 8 literals, then one group holding the match
    assert_eq!(packed.len(), 32 * 9 + 3);
    assert_eq!(&packed[32 * 9..], &[0x80, 0xFF, 0xFF]);
    roundtrip(&input);
}

#[test]
fn each_further_period_costs_one_match_token() {
    let period: Vec<u8> = (0..=255u8).collect();
    let mut input = Vec::new();
    for _ in 0..8 {
        input.extend_from_slice(&period);
    }

    let packed = compress(Cursor::new(&input[..])).unwrap();
    // literals for the first period, then seven saturated matches
    // sharing one control byte
    let mut expect: Vec<u8> = Vec::new();
    for group in 0u16..32 {
        expect.push(0x00);
        expect.extend((0..8).map(|k| (group * 8 + k) as u8));
    }
    expect.push(0xFE);
    for _ in 0..7 {
        expect.extend_from_slice(&[0xFF, 0xFF]);
    }
    assert_eq!(packed, expect);
    roundtrip(&input);
}

#[test]
fn roundtrip_own_source() {
    // the repository's own smoke test: the crate must survive itself
    roundtrip(include_bytes!("../src/encode.rs"));
    roundtrip(include_bytes!("../src/decode.rs"));
}

#[test]
fn roundtrip_uniform_random() {
    // incompressible input must still round-trip byte-exact
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x1261);
    let input: Vec<u8> = (0..1024).map(|_| rng.gen()).collect();
    roundtrip(&input);
}

#[test]
fn roundtrip_skewed_random() {
    // a four-symbol alphabet produces long, frequently overlapping
    // matches and drives the window through many wraps
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5CA1);
    let input: Vec<u8> = (0..64 * 1024).map(|_| rng.gen_range(0..4u8)).collect();
    roundtrip(&input);
}

#[test]
fn roundtrip_patchy_text() {
    // repeated chunks with point mutations: highly compressible but
    // never exactly periodic
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xF00D);
    let chunk: Vec<u8> = (0..1000).map(|_| rng.gen_range(b'a'..=b'z')).collect();

    let mut input = Vec::with_capacity(256 * 1024);
    while input.len() < 256 * 1024 {
        input.extend_from_slice(&chunk);
        let at = input.len() - rng.gen_range(1..chunk.len());
        input[at] = rng.gen();
    }
    roundtrip(&input);
}

#[test]
fn roundtrip_period_longer_than_window() {
    // matches would need to reach 300 bytes back; the encoder must make
    // do with nearer ones or literals, and still round-trip
    let period: Vec<u8> = (0..300u32).map(|i| (i % 256) as u8).collect();
    let mut input = Vec::new();
    for _ in 0..20 {
        input.extend_from_slice(&period);
    }
    roundtrip(&input);
}

#[test]
fn builders_match_the_convenience_functions() {
    let data = b"the quick brown fox jumps over the lazy dog and the quick cat";

    let via_fn = compress(Cursor::new(&data[..])).unwrap();
    let via_builder = Encoder::for_bytes(data).encode_to_vec().unwrap();
    assert_eq!(via_fn, via_builder);

    let back = Decoder::for_bytes(&via_builder).decode_to_vec().unwrap();
    assert_eq!(&data[..], &back[..]);
}

#[test]
fn encoder_logging_is_optional_and_harmless() {
    let data = b"mississippi mississippi";
    let plain = Encoder::for_bytes(data).encode_to_vec().unwrap();

    let mut log = Vec::new();
    let logged = Encoder::for_bytes(data)
        .with_logging(&mut log)
        .encode_to_vec()
        .unwrap();

    assert_eq!(plain, logged);
    assert!(!log.is_empty());
}
