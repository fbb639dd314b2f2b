//! Modular Addition Example
//!
//! Proves relations between hidden credential attributes, first one at a
//! time and then as a parallel batch.
//! Run with: cargo run --example modular_addition --release

use aingle_keyproof::{
    AdditionBatch, AdditionProofStructure, BaseMerge, BaseTable, Group, NameRegistry,
    PedersenCommitment, ProofParameters, ResponseTable, Transcript, WitnessTable,
};
use num_bigint::BigInt;
use std::time::Instant;

fn main() {
    println!("=== AIngle Keyproof Modular Addition Example ===\n");

    let group = Group::rfc2409_1024();
    let params = ProofParameters::default();
    println!(
        "Group: {}-bit safe prime, {} range rounds\n",
        group.modulus().bits(),
        params.range_iterations
    );

    // Example 1: A single relation
    println!("1. Single relation: day + shift = weekday (mod 7)");

    let mut registry = NameRegistry::new();
    let structure =
        AdditionProofStructure::new(&mut registry, "day", "shift", "week", "weekday", 8, &params)
            .expect("fresh registry");

    let mut table = BaseTable::new();
    let mut witnesses = WitnessTable::new();
    for (name, value) in [("day", 200), ("shift", 45), ("week", 7), ("weekday", 0)] {
        let committed = registry.committed(name);
        let (commitment, opening) = PedersenCommitment::commit(&group, &BigInt::from(value));
        table.insert(committed.value, commitment.into_element());
        witnesses.insert_opening(committed, &opening);
    }
    let bases = BaseMerge::new(vec![&group, &table]);
    println!(
        "   Relation holds: {}",
        structure.is_true(&witnesses).expect("all witnesses present")
    );

    let start = Instant::now();
    let mut transcript = Transcript::new();
    let commit = structure
        .commitments_from_secrets(&group, &mut transcript, &bases, &witnesses)
        .expect("commit");
    let challenge = transcript.challenge(b"example");
    let proof = structure
        .build_proof(&challenge, commit, &witnesses)
        .expect("prove");
    println!(
        "   Proved in {:?}: {} commitments, transcript {}",
        start.elapsed(),
        transcript.len(),
        transcript.fingerprint()
    );

    let start = Instant::now();
    let mut recomputed = Transcript::new();
    let structure_ok = structure.verify_proof_structure(&group, &proof);
    structure
        .commitments_from_proof(
            &group,
            &mut recomputed,
            &challenge,
            &bases,
            &ResponseTable::new(),
            &proof,
        )
        .expect("well-formed proof");
    let valid = structure_ok && recomputed.challenge(b"example") == challenge;
    println!("   Verified in {:?}: {}", start.elapsed(), valid);

    let wire = serde_json::to_vec(&proof).expect("serialize");
    println!("   Proof size: {} bytes as JSON\n", wire.len());

    // Example 2: A simulated proof
    println!("2. Simulated proof");
    let fake = structure.fake_proof(&group);
    let mut recomputed = Transcript::new();
    structure
        .commitments_from_proof(
            &group,
            &mut recomputed,
            &challenge,
            &bases,
            &ResponseTable::new(),
            &fake,
        )
        .expect("fake proofs are well formed");
    println!(
        "   Passes structure check: {}",
        structure.verify_proof_structure(&group, &fake)
    );
    println!(
        "   Reproduces the transcript: {}\n",
        recomputed.challenge(b"example") == challenge
    );

    // Example 3: Batch of chained relations
    println!("3. Batch: x_i + step = x_(i+1) (mod 1009)");
    let mut registry = NameRegistry::new();
    let mut batch = AdditionBatch::new();
    let mut table = BaseTable::new();
    let mut witnesses = WitnessTable::new();

    let (step, modulus) = (777i64, 1009i64);
    let mut value = 12i64;
    let mut values = vec![("x0".to_string(), value)];
    for i in 0..16 {
        let (current, next) = (format!("x{}", i), format!("x{}", i + 1));
        batch.push(
            AdditionProofStructure::new(&mut registry, &current, "step", "p", &next, 4, &params)
                .expect("distinct relations"),
        );
        value = (value + step) % modulus;
        values.push((next, value));
    }
    values.push(("step".to_string(), step));
    values.push(("p".to_string(), modulus));

    for (name, value) in &values {
        let committed = registry.committed(name);
        let (commitment, opening) = PedersenCommitment::commit(&group, &BigInt::from(*value));
        table.insert(committed.value, commitment.into_element());
        witnesses.insert_opening(committed, &opening);
    }
    let bases = BaseMerge::new(vec![&group, &table]);

    let start = Instant::now();
    let proof = batch
        .prove(&group, &bases, &witnesses, b"batch")
        .expect("prove batch");
    println!(
        "   Proved {} relations in {:?} ({} commitments)",
        batch.len(),
        start.elapsed(),
        batch.num_commitments()
    );

    let result = batch
        .verify(&group, &bases, &ResponseTable::new(), &proof, b"batch")
        .expect("verify batch");
    println!(
        "   Verified: {} ({} ms)",
        result.all_valid, result.verification_time_ms
    );
}
