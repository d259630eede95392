//! Weights for pallet-whitelist-policy.
//!
//! Placeholder values: a flat base per call plus one database access per
//! storage item touched. Not produced by benchmarks; replace with
//! `frame-benchmarking-cli` output once the benchmarks have been run.

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, RuntimeDbWeight, Weight},
};

pub trait WeightInfo {
    fn create() -> Weight;
    fn add_to_whitelist(n: u32) -> Weight;
    fn remove_from_whitelist(n: u32) -> Weight;
    fn nuke_whitelist(m: u32) -> Weight;
    fn transfer_ownership() -> Weight;
}

const BASE: u64 = 10_000_000;
const PER_ACCOUNT: u64 = 5_000_000;

fn create(db: RuntimeDbWeight) -> Weight {
    // next id, details
    Weight::from_parts(BASE, 0).saturating_add(db.reads_writes(1, 2))
}

fn add_to_whitelist(db: RuntimeDbWeight, n: u32) -> Weight {
    // details, then per account: membership probe, member + slot
    let n = u64::from(n);
    Weight::from_parts(BASE, 0)
        .saturating_add(Weight::from_parts(PER_ACCOUNT, 0).saturating_mul(n))
        .saturating_add(db.reads_writes(1 + n, 1 + 2 * n))
}

fn remove_from_whitelist(db: RuntimeDbWeight, n: u32) -> Weight {
    // details, then per account: member, last slot, and the swap
    let n = u64::from(n);
    Weight::from_parts(BASE, 0)
        .saturating_add(Weight::from_parts(PER_ACCOUNT, 0).saturating_mul(n))
        .saturating_add(db.reads_writes(1 + 2 * n, 1 + 4 * n))
}

fn nuke_whitelist(db: RuntimeDbWeight, m: u32) -> Weight {
    let m = u64::from(m);
    Weight::from_parts(BASE, 0)
        .saturating_add(db.reads_writes(1, 1 + 2 * m))
}

fn transfer_ownership(db: RuntimeDbWeight) -> Weight {
    Weight::from_parts(BASE, 0).saturating_add(db.reads_writes(1, 1))
}

/// Weights scaled by the runtime's database weights.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn create() -> Weight {
        create(T::DbWeight::get())
    }
    fn add_to_whitelist(n: u32) -> Weight {
        add_to_whitelist(T::DbWeight::get(), n)
    }
    fn remove_from_whitelist(n: u32) -> Weight {
        remove_from_whitelist(T::DbWeight::get(), n)
    }
    fn nuke_whitelist(m: u32) -> Weight {
        nuke_whitelist(T::DbWeight::get(), m)
    }
    fn transfer_ownership() -> Weight {
        transfer_ownership(T::DbWeight::get())
    }
}

// For tests.
impl WeightInfo for () {
    fn create() -> Weight {
        create(RocksDbWeight::get())
    }
    fn add_to_whitelist(n: u32) -> Weight {
        add_to_whitelist(RocksDbWeight::get(), n)
    }
    fn remove_from_whitelist(n: u32) -> Weight {
        remove_from_whitelist(RocksDbWeight::get(), n)
    }
    fn nuke_whitelist(m: u32) -> Weight {
        nuke_whitelist(RocksDbWeight::get(), m)
    }
    fn transfer_ownership() -> Weight {
        transfer_ownership(RocksDbWeight::get())
    }
}
