#![cfg_attr(not(feature = "std"), no_std)]

//! Owner-managed whitelists of approved transfer destinations.
//!
//! Each whitelist is an explicitly created instance with its own owner. Only
//! the owner may edit it; anyone may query it. Through [`TransferPolicy`] a
//! ledger can attach a whitelist and have every transfer destination checked
//! against it.
//!
//! Members are kept in two maps: `Members` answers membership in O(1) and
//! records each member's slot, `Slots` holds the members densely in
//! `0..count` so the set can be enumerated. Removing a member moves the last
//! slot into the vacated one.

use frame_support::{dispatch::DispatchResult, ensure, pallet_prelude::*};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;
use transfer_policy_primitives::TransferPolicy;

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

const LOG_TARGET: &str = "runtime::whitelist-policy";

/// Identifier of a whitelist instance.
pub type WhitelistId = u32;

/// Ownership and size of a whitelist.
#[derive(Encode, Decode, MaxEncodedLen, TypeInfo, Clone, PartialEq, Eq, RuntimeDebug)]
pub struct WhitelistDetails<AccountId> {
    pub owner: AccountId,
    pub count: u32,
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Origin allowed to create whitelists; the account it yields owns
        /// the new whitelist.
        type CreateOrigin: EnsureOrigin<Self::RuntimeOrigin, Success = Self::AccountId>;

        /// Maximum number of members a single whitelist can hold.
        #[pallet::constant]
        type MaxMembers: Get<u32>;

        /// Maximum number of accounts accepted by one add or remove call.
        #[pallet::constant]
        type MaxBatchSize: Get<u32>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Id handed to the next created whitelist
    #[pallet::storage]
    pub type NextWhitelistId<T> = StorageValue<_, WhitelistId, ValueQuery>;

    #[pallet::storage]
    pub type Whitelists<T: Config> =
        StorageMap<_, Blake2_128Concat, WhitelistId, WhitelistDetails<T::AccountId>>;

    /// Member -> slot
    #[pallet::storage]
    pub type Members<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        WhitelistId,
        Blake2_128Concat,
        T::AccountId,
        u32,
    >;

    /// Slot -> member, dense in `0..count`
    #[pallet::storage]
    pub type Slots<T: Config> =
        StorageDoubleMap<_, Blake2_128Concat, WhitelistId, Twox64Concat, u32, T::AccountId>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// A new, empty whitelist was created
        Created { whitelist: WhitelistId, owner: T::AccountId },
        /// Account approved as a destination
        MemberAdded { whitelist: WhitelistId, account: T::AccountId },
        /// Account no longer approved
        MemberRemoved { whitelist: WhitelistId, account: T::AccountId },
        /// All members dropped at once
        WhitelistCleared { whitelist: WhitelistId, removed: u32 },
        /// Whitelist handed to a new owner
        OwnershipTransferred {
            whitelist: WhitelistId,
            previous: T::AccountId,
            new: T::AccountId,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// No whitelist exists under this id.
        UnknownWhitelist,
        /// Caller does not own the whitelist.
        Unauthorized,
        /// The call would grow the whitelist past `MaxMembers`.
        TooManyMembers,
        /// Whitelist ids are exhausted.
        Overflow,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::create())]
        pub fn create(origin: OriginFor<T>) -> DispatchResult {
            let owner = T::CreateOrigin::ensure_origin(origin)?;
            Self::do_create(owner)?;
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::add_to_whitelist(accounts.len() as u32))]
        pub fn add_to_whitelist(
            origin: OriginFor<T>,
            whitelist: WhitelistId,
            accounts: BoundedVec<T::AccountId, T::MaxBatchSize>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let details = Self::ensure_owner(whitelist, &who)?;
            Self::do_add(whitelist, details, accounts.into_inner())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::remove_from_whitelist(accounts.len() as u32))]
        pub fn remove_from_whitelist(
            origin: OriginFor<T>,
            whitelist: WhitelistId,
            accounts: BoundedVec<T::AccountId, T::MaxBatchSize>,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let details = Self::ensure_owner(whitelist, &who)?;
            Self::do_remove(whitelist, details, accounts.into_inner());
            Ok(())
        }

        /// Drop every member of `whitelist`.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::nuke_whitelist(T::MaxMembers::get()))]
        pub fn nuke_whitelist(origin: OriginFor<T>, whitelist: WhitelistId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let details = Self::ensure_owner(whitelist, &who)?;
            Self::do_nuke(whitelist, details);
            Ok(())
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::transfer_ownership())]
        pub fn transfer_ownership(
            origin: OriginFor<T>,
            whitelist: WhitelistId,
            new_owner: T::AccountId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let mut details = Self::ensure_owner(whitelist, &who)?;
            details.owner = new_owner.clone();
            Whitelists::<T>::insert(whitelist, details);
            Self::deposit_event(Event::OwnershipTransferred {
                whitelist,
                previous: who,
                new: new_owner,
            });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Whitelists to create as `(owner, members)`, assigned ids `0..n` in order
        pub whitelists: Vec<(T::AccountId, Vec<T::AccountId>)>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            for (owner, members) in &self.whitelists {
                let id = Pallet::<T>::do_create(owner.clone()).expect("Whitelist ids exhausted");
                let details = Whitelists::<T>::get(id).expect("Created above; qed");
                Pallet::<T>::do_add(id, details, members.clone())
                    .expect("Genesis whitelist exceeds MaxMembers");
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    /// Create an empty whitelist owned by `owner`.
    pub fn do_create(owner: T::AccountId) -> Result<WhitelistId, DispatchError> {
        let id = NextWhitelistId::<T>::get();
        let next = id.checked_add(1).ok_or(Error::<T>::Overflow)?;
        Whitelists::<T>::insert(id, WhitelistDetails { owner: owner.clone(), count: 0 });
        NextWhitelistId::<T>::put(next);
        Self::deposit_event(Event::Created { whitelist: id, owner });
        Ok(id)
    }

    fn ensure_owner(
        whitelist: WhitelistId,
        who: &T::AccountId,
    ) -> Result<WhitelistDetails<T::AccountId>, DispatchError> {
        let details = Whitelists::<T>::get(whitelist).ok_or(Error::<T>::UnknownWhitelist)?;
        ensure!(details.owner == *who, Error::<T>::Unauthorized);
        Ok(details)
    }

    fn do_add(
        whitelist: WhitelistId,
        mut details: WhitelistDetails<T::AccountId>,
        accounts: Vec<T::AccountId>,
    ) -> DispatchResult {
        let mut fresh: Vec<T::AccountId> = Vec::with_capacity(accounts.len());
        for account in accounts {
            if !Members::<T>::contains_key(whitelist, &account) && !fresh.contains(&account) {
                fresh.push(account);
            }
        }

        // Capacity is checked for the whole batch before the first write.
        let count = details
            .count
            .checked_add(fresh.len() as u32)
            .filter(|count| *count <= T::MaxMembers::get())
            .ok_or(Error::<T>::TooManyMembers)?;

        for (slot, account) in (details.count..).zip(fresh) {
            Members::<T>::insert(whitelist, &account, slot);
            Slots::<T>::insert(whitelist, slot, &account);
            Self::deposit_event(Event::MemberAdded { whitelist, account });
        }
        details.count = count;
        Whitelists::<T>::insert(whitelist, details);
        Ok(())
    }

    fn do_remove(
        whitelist: WhitelistId,
        mut details: WhitelistDetails<T::AccountId>,
        accounts: Vec<T::AccountId>,
    ) {
        for account in accounts {
            let Some(slot) = Members::<T>::take(whitelist, &account) else {
                continue;
            };
            let last = details.count.saturating_sub(1);
            if slot != last {
                if let Some(moved) = Slots::<T>::get(whitelist, last) {
                    Slots::<T>::insert(whitelist, slot, &moved);
                    Members::<T>::insert(whitelist, &moved, slot);
                }
            }
            Slots::<T>::remove(whitelist, last);
            details.count = last;
            Self::deposit_event(Event::MemberRemoved { whitelist, account });
        }
        Whitelists::<T>::insert(whitelist, details);
    }

    fn do_nuke(whitelist: WhitelistId, mut details: WhitelistDetails<T::AccountId>) {
        let removed = details.count;
        let _ = Members::<T>::clear_prefix(whitelist, u32::MAX, None);
        let _ = Slots::<T>::clear_prefix(whitelist, u32::MAX, None);
        details.count = 0;
        Whitelists::<T>::insert(whitelist, details);
        log::debug!(target: LOG_TARGET, "whitelist {whitelist} cleared, {removed} members dropped");
        Self::deposit_event(Event::WhitelistCleared { whitelist, removed });
    }

    pub fn is_whitelisted(whitelist: WhitelistId, account: &T::AccountId) -> bool {
        Members::<T>::contains_key(whitelist, account)
    }

    /// Number of members, zero for unknown whitelists.
    pub fn whitelist_count(whitelist: WhitelistId) -> u32 {
        Whitelists::<T>::get(whitelist).map(|details| details.count).unwrap_or_default()
    }

    /// Current members in slot order.
    pub fn whitelist(whitelist: WhitelistId) -> Vec<T::AccountId> {
        (0..Self::whitelist_count(whitelist))
            .filter_map(|slot| Slots::<T>::get(whitelist, slot))
            .collect()
    }

    /// Policy decision for a single destination; same answer as `is_whitelisted`.
    pub fn evaluate(whitelist: WhitelistId, account: &T::AccountId) -> bool {
        Self::is_whitelisted(whitelist, account)
    }

    pub fn owner(whitelist: WhitelistId) -> Option<T::AccountId> {
        Whitelists::<T>::get(whitelist).map(|details| details.owner)
    }
}

impl<T: Config> TransferPolicy<T::AccountId> for Pallet<T> {
    type PolicyId = WhitelistId;
    type InitPayload = BoundedVec<T::AccountId, T::MaxBatchSize>;

    fn exists(policy: &WhitelistId) -> bool {
        Whitelists::<T>::contains_key(policy)
    }

    fn decide(policy: &WhitelistId, _subject: &T::AccountId, target: &T::AccountId) -> bool {
        let allowed = Self::evaluate(*policy, target);
        if !allowed {
            log::debug!(
                target: LOG_TARGET,
                "whitelist {policy} rejects destination {target:?}"
            );
        }
        allowed
    }

    /// Seeds the whitelist; the initializer must own it.
    fn initialize(
        policy: &WhitelistId,
        initializer: &T::AccountId,
        payload: Self::InitPayload,
    ) -> DispatchResult {
        let details = Self::ensure_owner(*policy, initializer)?;
        Self::do_add(*policy, details, payload.into_inner())
    }

    fn decide_weight() -> Weight {
        T::DbWeight::get().reads(1)
    }

    fn initialize_weight(payload: &Self::InitPayload) -> Weight {
        T::WeightInfo::add_to_whitelist(payload.len() as u32)
    }
}

#[cfg(feature = "runtime-benchmarks")]
impl<T: Config> transfer_policy_primitives::BenchmarkHelper<T::AccountId, WhitelistId>
    for Pallet<T>
{
    fn allowing_policy(owner: &T::AccountId, target: &T::AccountId) -> WhitelistId {
        let id = Self::do_create(owner.clone()).expect("Whitelist ids exhausted");
        let details = Whitelists::<T>::get(id).expect("Created above; qed");
        Self::do_add(id, details, Vec::from([target.clone()])).expect("Fresh whitelist has room");
        id
    }
}
