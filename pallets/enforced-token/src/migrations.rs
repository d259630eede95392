//! Storage migrations for pallet-enforced-token.
//!
//! Each migration is versioned, checks the on-chain storage version before
//! doing anything and bumps it when done, so re-running is harmless.
//!
//! # Wiring Migrations in Runtime
//!
//! ```ignore
//! parameter_types! {
//!     pub TokenOwner: AccountId = /* governance account */;
//! }
//!
//! pub type Executive = frame_executive::Executive<
//!     Runtime,
//!     Block,
//!     frame_system::ChainContext<Runtime>,
//!     Runtime,
//!     AllPalletsWithSystem,
//!     pallet_enforced_token::migrations::v1::MigrateToV1<Runtime, TokenOwner>,
//! >;
//! ```

use frame_support::{pallet_prelude::*, traits::OnRuntimeUpgrade};
use sp_std::marker::PhantomData;

use crate::{Config, Owner, Pallet};

/// Version 0 → 1: ledger ownership.
///
/// Version 0 ledgers were administered through a runtime origin and stored no
/// owner. Without an owner nobody could assign a policy, so every transfer
/// would fail with `PolicyNotAssigned`. This migration installs `InitialOwner`
/// when no owner is recorded and leaves an existing owner untouched.
pub mod v1 {
    use super::*;

    pub struct MigrateToV1<T, InitialOwner>(PhantomData<(T, InitialOwner)>);

    impl<T: Config, InitialOwner: Get<T::AccountId>> OnRuntimeUpgrade
        for MigrateToV1<T, InitialOwner>
    {
        fn on_runtime_upgrade() -> Weight {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();

            if on_chain_version >= 1 {
                log::info!(
                    target: crate::LOG_TARGET,
                    "Storage already at v{on_chain_version:?}, skipping v1 migration"
                );
                return T::DbWeight::get().reads(1);
            }

            let mut writes = 1;
            if Owner::<T>::get().is_none() {
                Owner::<T>::put(InitialOwner::get());
                writes += 1;
                log::info!(target: crate::LOG_TARGET, "Installed initial ledger owner");
            }

            StorageVersion::new(1).put::<Pallet<T>>();
            log::info!(target: crate::LOG_TARGET, "Migrated storage v0 → v1");

            T::DbWeight::get().reads_writes(2, writes)
        }

        #[cfg(feature = "try-runtime")]
        fn pre_upgrade() -> Result<sp_std::vec::Vec<u8>, sp_runtime::TryRuntimeError> {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();
            Ok((on_chain_version, Owner::<T>::get()).encode())
        }

        #[cfg(feature = "try-runtime")]
        fn post_upgrade(state: sp_std::vec::Vec<u8>) -> Result<(), sp_runtime::TryRuntimeError> {
            let (pre_version, pre_owner): (StorageVersion, Option<T::AccountId>) =
                Decode::decode(&mut &state[..])
                    .map_err(|_| sp_runtime::TryRuntimeError::Other("Failed to decode pre-state"))?;

            if pre_version < 1 {
                ensure!(
                    Pallet::<T>::on_chain_storage_version() >= 1,
                    sp_runtime::TryRuntimeError::Other("Migration to v1 did not complete")
                );
                ensure!(
                    Owner::<T>::get().is_some(),
                    sp_runtime::TryRuntimeError::Other("Ledger has no owner after v1")
                );
            }
            if pre_owner.is_some() {
                ensure!(
                    Owner::<T>::get() == pre_owner,
                    sp_runtime::TryRuntimeError::Other("Existing owner was overwritten")
                );
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{new_test_ext, Test, OPERATOR, OWNER};
    use frame_support::parameter_types;

    parameter_types! {
        pub const MigrationOwner: u64 = OPERATOR;
    }

    type Migration = v1::MigrateToV1<Test, MigrationOwner>;

    #[test]
    fn migration_installs_owner_when_missing() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();
            Owner::<Test>::kill();

            Migration::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
            assert_eq!(Owner::<Test>::get(), Some(OPERATOR));
        });
    }

    #[test]
    fn migration_keeps_existing_owner() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();

            Migration::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
            assert_eq!(Owner::<Test>::get(), Some(OWNER));
        });
    }

    #[test]
    fn migration_skipped_when_already_applied() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(1).put::<Pallet<Test>>();
            Owner::<Test>::kill();

            Migration::on_runtime_upgrade();

            // Already at v1: an absent owner is left absent.
            assert_eq!(Owner::<Test>::get(), None);
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }

    #[test]
    fn migration_skipped_on_higher_version() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(5).put::<Pallet<Test>>();

            Migration::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 5);
        });
    }

    #[test]
    fn migration_is_idempotent() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();
            Owner::<Test>::kill();

            Migration::on_runtime_upgrade();
            Owner::<Test>::put(OWNER);
            Migration::on_runtime_upgrade();

            assert_eq!(Owner::<Test>::get(), Some(OWNER));
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }
}
