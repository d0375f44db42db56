mod determinism_tests;
mod scoring_invariants;
