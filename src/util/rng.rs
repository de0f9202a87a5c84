use rand::RngCore;

#[cfg(test)]
pub fn generate_array<const N: usize>(rng: &mut impl RngCore) -> Result<[u8; N], rand::Error> {
    let mut buf = [0; N];
    rng.try_fill_bytes(&mut buf)?;
    Ok(buf)
}

/// uniform pick in `0..=bound` by masked rejection sampling
pub fn next_bound(
    bound: usize,
    mut rng: impl RngCore,
    max_tries: impl Into<Option<usize>>,
) -> usize {
    if bound == 0 {
        return 0;
    }
    let mask = (1usize << (bound.ilog2() + 1)) - 1;
    if let Some(max_tries) = max_tries.into() {
        for _ in 0..max_tries {
            let pick = rng.next_u64() as usize & mask;
            if pick <= bound {
                return pick;
            }
        }
        panic!("to many tries");
    } else {
        loop {
            let pick = rng.next_u64() as usize & mask;
            if pick <= bound {
                return pick;
            }
        }
    }
}

#[allow(clippy::module_name_repetitions)]
#[cfg(test)]
pub fn seeded_rng() -> ([u8; 32], rand::rngs::StdRng) {
    let seed = generate_array(&mut rand::rngs::OsRng).expect("failed to generate seed");
    let rng = <rand::rngs::StdRng as rand::SeedableRng>::from_seed(seed);
    (seed, rng)
}
