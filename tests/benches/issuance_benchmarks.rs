//! # WorldSocial Issuance Benchmarks
//!
//! | Path | What dominates |
//! |------|----------------|
//! | attestation recovery | secp256k1 public-key recovery |
//! | request_mint (mock proof) | signature recovery + bookkeeping |
//! | reward distribution | share math + ledger credit |
//! | Groth16 verify | BN254 pairing check |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_crypto::{Secp256k1Recovery, SignatureRecovery};
use shared_types::units::tokens;
use shared_types::{Address, U256};
use std::time::Duration;
use ws_02_identity_verifier::{hash_to_field, Groth16ProofVerifier, IdentityProofVerifier};
use ws_03_token_issuance::{
    attestation_digest, creator_share, sign_attestation, TokenIssuanceApi,
};
use ws_tests::fixtures::{Harness, CREATOR, OWNER, VIEWER};
use ws_tests::zk::ZkDeployment;

fn bench_attestation(c: &mut Criterion) {
    let mut group = c.benchmark_group("attestation");
    let h = Harness::new();
    let account = Address::new([0xA1; 20]);
    let nullifier = U256::from(42u64);
    let digest = attestation_digest(&account, nullifier);
    let signature = sign_attestation(&h.attester, &account, nullifier).unwrap();

    group.bench_function("recover_signer", |b| {
        b.iter(|| black_box(Secp256k1Recovery.recover(&digest, &signature).unwrap()))
    });
    group.finish();
}

fn bench_request_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_mint");
    group.measurement_time(Duration::from_secs(10));

    for accounts in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(accounts));
        group.bench_with_input(
            BenchmarkId::new("distinct_accounts", accounts),
            &accounts,
            |b, &accounts| {
                b.iter_batched(
                    || {
                        let h = Harness::with_params(|p| p.wait_between_mints = 0);
                        let requests: Vec<_> = (0..accounts)
                            .map(|i| {
                                let mut bytes = [0u8; 20];
                                bytes[12..].copy_from_slice(&(i + 1).to_be_bytes());
                                h.mint_request(Address::new(bytes), i + 1)
                            })
                            .collect();
                        (h, requests)
                    },
                    |(mut h, requests)| {
                        for request in &requests {
                            h.token.request_mint(request).unwrap();
                        }
                        black_box(h.token.ledger().total_supply())
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_rewards(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewards");

    group.bench_function("creator_share", |b| {
        b.iter(|| black_box(creator_share(black_box(U256::MAX))))
    });

    let mut h = Harness::new();
    h.token.register_creator(&OWNER, CREATOR).unwrap();
    group.bench_function("reward_creator", |b| {
        b.iter(|| h.token.reward_creator(&OWNER, CREATOR, tokens(100)).unwrap())
    });
    group.bench_function("reward_viewer", |b| {
        b.iter(|| h.token.reward_viewer(&OWNER, VIEWER, tokens(100)).unwrap())
    });
    group.finish();
}

fn bench_groth16_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("groth16");
    let mut zk = ZkDeployment::setup(7);
    let verifier = Groth16ProofVerifier::from_snarkjs_json(&zk.verification_key_json()).unwrap();
    let context = ws_02_identity_verifier::ProofContext::new("app_bench", "mint");
    let account = Address::new([0xA1; 20]);
    let nullifier = hash_to_field(b"bench");
    let proof = zk.prove(&context, &account, nullifier);
    let root = zk.root();

    group.bench_function("verify", |b| {
        b.iter(|| {
            verifier
                .verify(root, &context, &account, nullifier, black_box(&proof))
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_attestation,
    bench_request_mint,
    bench_rewards,
    bench_groth16_verify
);
criterion_main!(benches);
