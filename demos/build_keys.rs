use order_preserving_mph::{Builder, LabelTable, MphError, Opmphf, TrialPair};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

const N_KEYS: usize = 200_000;
const GEN_SEED: u64 = 42;

fn main() -> Result<(), MphError> {
    println!("--- order_preserving_mph build ---");
    println!("n = {N_KEYS}");

    // 1) Generate unique keys
    let t0 = Instant::now();
    let keys = gen_unique_keys(N_KEYS, GEN_SEED);
    let gen_s = t0.elapsed().as_secs_f64();
    println!(
        "gen:    {:>8.3} s   ({:.1} M keys/s)",
        gen_s,
        N_KEYS as f64 / gen_s / 1e6
    );

    // 2) Build; m = 2.5n keeps the per-seed acceptance rate comfortable
    let m = (N_KEYS as u32) * 5 / 2;
    let t1 = Instant::now();
    let mph = Builder::new(m)
        .with_trials(TrialPair::xxh3())
        .build(keys.iter().map(|v| v.as_slice()))?;
    let build_s = t1.elapsed().as_secs_f64();
    println!(
        "build:  {:>8.3} s   (seed {}, m = {})",
        build_s,
        mph.seed(),
        mph.num_nodes()
    );

    // 3) Lookup all keys and check the order
    let t2 = Instant::now();
    let mut misplaced = 0usize;
    for (rank, k) in keys.iter().enumerate() {
        if mph.index(k) != rank as u64 {
            misplaced += 1;
        }
    }
    let lookup_s = t2.elapsed().as_secs_f64();
    println!(
        "lookup: {:>8.3} s   ({:.1} M lookups/s)   (misplaced={misplaced})",
        lookup_s,
        N_KEYS as f64 / lookup_s / 1e6
    );

    // 4) Export, encode, restore
    let bytes = mph.export().to_bytes()?;
    let restored = Opmphf::from_table(TrialPair::xxh3(), LabelTable::from_bytes(&bytes)?)?;
    let same = keys.iter().all(|k| restored.index(k) == mph.index(k));
    println!("export: {} bytes   (restored matches: {same})", bytes.len());

    Ok(())
}

/// Generate N unique 16-byte keys (raw bytes), deterministically.
fn gen_unique_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = HashSet::with_capacity(n * 2);
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        if set.insert(buf) {
            keys.push(buf.to_vec());
        }
    }
    keys
}
