//! Weights for pallet-enforced-token.
//!
//! Placeholder values: a flat base per call plus one database access per
//! storage item touched. Not produced by benchmarks; replace with
//! `frame-benchmarking-cli` output once the benchmarks have been run.
//! Policy evaluation and policy initialization are charged separately
//! through `TransferPolicy`.

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, RuntimeDbWeight, Weight},
};

pub trait WeightInfo {
    fn mint() -> Weight;
    fn burn() -> Weight;
    fn transfer() -> Weight;
    fn approve() -> Weight;
    fn transfer_from() -> Weight;
    fn assign_policy() -> Weight;
    fn transfer_ownership() -> Weight;
}

const BASE: u64 = 10_000_000;

fn flat(db: RuntimeDbWeight, reads: u64, writes: u64) -> Weight {
    Weight::from_parts(BASE, 0).saturating_add(db.reads_writes(reads, writes))
}

// (reads, writes) per call. The guard flag is read by every call and written
// (then rolled back) by the two gated transfers.
const MINT: (u64, u64) = (4, 2);
const BURN: (u64, u64) = (3, 2);
const TRANSFER: (u64, u64) = (4, 3);
const APPROVE: (u64, u64) = (1, 1);
const TRANSFER_FROM: (u64, u64) = (5, 4);
const ASSIGN_POLICY: (u64, u64) = (2, 1);
const TRANSFER_OWNERSHIP: (u64, u64) = (2, 1);

/// Weights scaled by the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn mint() -> Weight {
        flat(T::DbWeight::get(), MINT.0, MINT.1)
    }
    fn burn() -> Weight {
        flat(T::DbWeight::get(), BURN.0, BURN.1)
    }
    fn transfer() -> Weight {
        flat(T::DbWeight::get(), TRANSFER.0, TRANSFER.1)
    }
    fn approve() -> Weight {
        flat(T::DbWeight::get(), APPROVE.0, APPROVE.1)
    }
    fn transfer_from() -> Weight {
        flat(T::DbWeight::get(), TRANSFER_FROM.0, TRANSFER_FROM.1)
    }
    fn assign_policy() -> Weight {
        flat(T::DbWeight::get(), ASSIGN_POLICY.0, ASSIGN_POLICY.1)
    }
    fn transfer_ownership() -> Weight {
        flat(T::DbWeight::get(), TRANSFER_OWNERSHIP.0, TRANSFER_OWNERSHIP.1)
    }
}

// For tests.
impl WeightInfo for () {
    fn mint() -> Weight {
        flat(RocksDbWeight::get(), MINT.0, MINT.1)
    }
    fn burn() -> Weight {
        flat(RocksDbWeight::get(), BURN.0, BURN.1)
    }
    fn transfer() -> Weight {
        flat(RocksDbWeight::get(), TRANSFER.0, TRANSFER.1)
    }
    fn approve() -> Weight {
        flat(RocksDbWeight::get(), APPROVE.0, APPROVE.1)
    }
    fn transfer_from() -> Weight {
        flat(RocksDbWeight::get(), TRANSFER_FROM.0, TRANSFER_FROM.1)
    }
    fn assign_policy() -> Weight {
        flat(RocksDbWeight::get(), ASSIGN_POLICY.0, ASSIGN_POLICY.1)
    }
    fn transfer_ownership() -> Weight {
        flat(RocksDbWeight::get(), TRANSFER_OWNERSHIP.0, TRANSFER_OWNERSHIP.1)
    }
}
