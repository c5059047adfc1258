// Perk flags travel as a bitmap: one bit per perk in catalog order,
// MSB-first within each byte, ceil(n / 8) bytes total. Both directions
// must agree bit-for-bit or shared codes corrupt silently.

pub fn pack_flags(flags: &[bool]) -> Vec<u8> {
    let mut out = Vec::with_capacity((flags.len() + 7) / 8);
    let mut acc = 0u8;

    for (i, &flag) in flags.iter().enumerate() {
        acc = (acc << 1) | flag as u8;
        if i % 8 == 7 {
            out.push(acc);
            acc = 0;
        }
    }

    // Left-align the trailing partial byte; the low pad bits stay zero.
    let rem = flags.len() % 8;
    if rem != 0 {
        out.push(acc << (8 - rem));
    }

    out
}

pub fn unpack_flags(bytes: &[u8], count: usize) -> Vec<bool> {
    (0..count)
        .map(|i| {
            let byte = bytes.get(i / 8).copied().unwrap_or(0);
            byte & (1 << (7 - i % 8)) != 0
        })
        .collect()
}
