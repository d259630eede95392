//! Benchmarking setup for pallet-enforced-token

use super::*;

#[allow(unused)]
use crate::Pallet as EnforcedToken;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;
use transfer_policy_primitives::BenchmarkHelper;

const FUNDS: u128 = 10_000_000;

fn install_owner<T: Config>() -> T::AccountId {
    let owner: T::AccountId = account("owner", 0, 0);
    Owner::<T>::put(&owner);
    owner
}

/// Fund `holder` and attach a policy that lets `recipient` receive.
fn gated_transfer_setup<T: Config>(holder: &T::AccountId, recipient: &T::AccountId) {
    let owner = install_owner::<T>();
    let policy = T::BenchmarkHelper::allowing_policy(&owner, recipient);
    ActivePolicy::<T>::put(policy);
    Pallet::<T>::do_mint(holder, FUNDS).expect("Fresh ledger cannot overflow");
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn mint() {
        let owner = install_owner::<T>();
        let recipient: T::AccountId = account("recipient", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner), recipient.clone(), FUNDS);

        assert_eq!(Balances::<T>::get(&recipient), FUNDS);
    }

    #[benchmark]
    fn burn() {
        let caller: T::AccountId = whitelisted_caller();
        Pallet::<T>::do_mint(&caller, FUNDS).expect("Fresh ledger cannot overflow");

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), FUNDS);

        assert_eq!(Balances::<T>::get(&caller), 0);
    }

    #[benchmark]
    fn transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        gated_transfer_setup::<T>(&caller, &recipient);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), recipient.clone(), 1_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000);
    }

    #[benchmark]
    fn approve() {
        let caller: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), spender.clone(), FUNDS);

        assert_eq!(Allowances::<T>::get(&caller, &spender), FUNDS);
    }

    #[benchmark]
    fn transfer_from() {
        let spender: T::AccountId = whitelisted_caller();
        let holder: T::AccountId = account("holder", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        gated_transfer_setup::<T>(&holder, &recipient);
        Allowances::<T>::insert(&holder, &spender, FUNDS);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender.clone()), holder.clone(), recipient.clone(), 1_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000);
        assert_eq!(Allowances::<T>::get(&holder, &spender), FUNDS - 1_000);
    }

    #[benchmark]
    fn assign_policy() {
        let owner = install_owner::<T>();
        let target: T::AccountId = account("target", 0, 0);
        let policy = T::BenchmarkHelper::allowing_policy(&owner, &target);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner), policy.clone(), None);

        assert_eq!(ActivePolicy::<T>::get(), Some(policy));
    }

    #[benchmark]
    fn transfer_ownership() {
        let owner = install_owner::<T>();
        let successor: T::AccountId = account("successor", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner), successor.clone());

        assert_eq!(Owner::<T>::get(), Some(successor));
    }

    impl_benchmark_test_suite!(EnforcedToken, crate::mock::new_test_ext(), crate::mock::Test);
}
