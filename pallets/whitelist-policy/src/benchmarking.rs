//! Benchmarking setup for pallet-whitelist-policy

use super::*;

#[allow(unused)]
use crate::Pallet as Whitelist;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

fn accounts<T: Config>(n: u32) -> Vec<T::AccountId> {
    (0..n).map(|i| account("member", i, 0)).collect()
}

fn filled<T: Config>(owner: &T::AccountId, n: u32) -> WhitelistId {
    let id = Pallet::<T>::do_create(owner.clone()).expect("Whitelist ids exhausted");
    let details = Whitelists::<T>::get(id).expect("Created above; qed");
    Pallet::<T>::do_add(id, details, accounts::<T>(n)).expect("n is within MaxMembers");
    id
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn create() {
        let origin = T::CreateOrigin::try_successful_origin().expect("Create origin");
        let id = NextWhitelistId::<T>::get();

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin);

        assert!(Whitelists::<T>::contains_key(id));
    }

    #[benchmark]
    fn add_to_whitelist(n: Linear<1, { T::MaxBatchSize::get().min(T::MaxMembers::get()) }>) {
        let caller: T::AccountId = whitelisted_caller();
        let id = filled::<T>(&caller, 0);
        let batch: BoundedVec<_, T::MaxBatchSize> =
            accounts::<T>(n).try_into().expect("n is within MaxBatchSize");

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), id, batch);

        assert_eq!(Pallet::<T>::whitelist_count(id), n);
    }

    #[benchmark]
    fn remove_from_whitelist(
        n: Linear<1, { T::MaxBatchSize::get().min(T::MaxMembers::get()) }>,
    ) {
        let caller: T::AccountId = whitelisted_caller();
        let id = filled::<T>(&caller, T::MaxMembers::get());
        // Removing from the front forces every removal to move the last slot.
        let batch: BoundedVec<_, T::MaxBatchSize> =
            accounts::<T>(n).try_into().expect("n is within MaxBatchSize");

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), id, batch);

        assert_eq!(Pallet::<T>::whitelist_count(id), T::MaxMembers::get() - n);
    }

    #[benchmark]
    fn nuke_whitelist(m: Linear<0, { T::MaxMembers::get() }>) {
        let caller: T::AccountId = whitelisted_caller();
        let id = filled::<T>(&caller, m);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), id);

        assert_eq!(Pallet::<T>::whitelist_count(id), 0);
    }

    #[benchmark]
    fn transfer_ownership() {
        let caller: T::AccountId = whitelisted_caller();
        let id = filled::<T>(&caller, 0);
        let new_owner: T::AccountId = account("operator", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), id, new_owner.clone());

        assert_eq!(Pallet::<T>::owner(id), Some(new_owner));
    }

    impl_benchmark_test_suite!(Whitelist, crate::mock::new_test_ext(), crate::mock::Test);
}
