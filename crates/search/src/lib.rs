//! Cascade search crate - exhaustive single-swap greedy search.

mod greedy;

pub use greedy::{
    candidate_seed, candidate_swaps, evaluate_swap, Candidate, Evaluation, GreedySearch,
    SearchOutcome,
};
