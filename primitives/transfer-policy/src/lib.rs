//! Transfer authorization capability.
//!
//! A ledger holds at most one reference to a policy and asks it whether a
//! value move from `subject` to `target` may proceed. Policies live in their
//! own pallets and only ever see identities, never the ledger itself.

#![cfg_attr(not(feature = "std"), no_std)]

use codec::{DecodeWithMemTracking, MaxEncodedLen};
use frame_support::{weights::Weight, Parameter};
use sp_runtime::{traits::MaybeSerializeDeserialize, DispatchResult};

/// A pluggable authorization oracle consulted before every transfer.
pub trait TransferPolicy<AccountId> {
    /// Reference to a concrete policy instance, as stored by the ledger.
    type PolicyId: Parameter + DecodeWithMemTracking + MaxEncodedLen + MaybeSerializeDeserialize;

    /// Policy specific configuration forwarded on assignment.
    type InitPayload: Parameter + DecodeWithMemTracking;

    /// Whether `policy` refers to something that can currently be evaluated.
    fn exists(policy: &Self::PolicyId) -> bool;

    /// Decide whether `subject` may move value to `target`.
    ///
    /// Must terminate and must not rely on its own writes: callers evaluate
    /// it inside a storage layer that is always rolled back.
    fn decide(policy: &Self::PolicyId, subject: &AccountId, target: &AccountId) -> bool;

    /// Apply `payload` to `policy` on behalf of `initializer`.
    fn initialize(
        policy: &Self::PolicyId,
        initializer: &AccountId,
        payload: Self::InitPayload,
    ) -> DispatchResult;

    /// Worst case weight of a single `decide`.
    fn decide_weight() -> Weight {
        Weight::zero()
    }

    /// Weight of applying `payload` through `initialize`.
    fn initialize_weight(_payload: &Self::InitPayload) -> Weight {
        Weight::zero()
    }
}

/// Setup hooks used by the ledger benchmarks.
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId, PolicyId> {
    /// Create a policy owned by `owner` that approves transfers to `target`.
    fn allowing_policy(owner: &AccountId, target: &AccountId) -> PolicyId;
}
