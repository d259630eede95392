#![cfg_attr(not(feature = "std"), no_std)]

//! # Enforced Token Pallet
//!
//! A fungible ledger (mint, burn, transfer, approve, transfer_from) whose
//! value-moving calls are authorized by an attached [`TransferPolicy`].
//!
//! The ledger keeps at most one policy reference. Until the owner assigns one
//! every transfer fails with [`Error::PolicyNotAssigned`]. Once assigned, the
//! policy decides on `(from, to)` before any balance is touched.
//!
//! Policy evaluation runs inside a storage layer that is always rolled back,
//! with the ledger's mutating calls locked for its duration, so a policy can
//! neither leave writes behind nor re-enter the ledger. A transfer whose
//! policy tried to re-enter fails with [`Error::ReentrantCall`].

use frame_support::{
    dispatch::DispatchResult,
    dispatch_context::{run_in_context, with_context},
    ensure,
    pallet_prelude::*,
    storage::{with_storage_layer, with_transaction},
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_runtime::TransactionOutcome;
use sp_std::prelude::*;
use transfer_policy_primitives::TransferPolicy;

pub use pallet::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod migrations;
pub mod weights;

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

const LOG_TARGET: &str = "runtime::enforced-token";

/// Left in the dispatch context when a mutating call is attempted while a
/// policy is deciding. Lives outside storage so the rollback of the failed
/// nested call cannot erase it.
struct ReentryAttempted;

/// Reference to a policy instance, as understood by the configured policy.
pub type PolicyIdOf<T> = <<T as Config>::Policy as TransferPolicy<
    <T as frame_system::Config>::AccountId,
>>::PolicyId;

/// Initialization payload accepted by the configured policy.
pub type InitPayloadOf<T> = <<T as Config>::Policy as TransferPolicy<
    <T as frame_system::Config>::AccountId,
>>::InitPayload;

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Policies the ledger can be attached to.
        type Policy: TransferPolicy<Self::AccountId>;

        /// Whether `mint` is reserved to the ledger owner. When false any
        /// signed account may mint.
        #[pallet::constant]
        type OwnerOnlyMint: Get<bool>;

        type WeightInfo: WeightInfo;

        #[cfg(feature = "runtime-benchmarks")]
        type BenchmarkHelper: transfer_policy_primitives::BenchmarkHelper<
            Self::AccountId,
            PolicyIdOf<Self>,
        >;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Token name (e.g., "Guardian Token")
    #[pallet::storage]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<64>>, ValueQuery>;

    /// Token symbol (e.g., "GRD")
    #[pallet::storage]
    pub type TokenSymbol<T> = StorageValue<_, BoundedVec<u8, ConstU32<16>>, ValueQuery>;

    /// Token decimals
    #[pallet::storage]
    pub type Decimals<T> = StorageValue<_, u8, ValueQuery>;

    /// Total token supply (minted minus burned)
    #[pallet::storage]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances
    #[pallet::storage]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// Spending ceilings, keyed by (owner, spender)
    #[pallet::storage]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Account allowed to mint (if restricted), assign policies and hand over ownership
    #[pallet::storage]
    pub type Owner<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Policy consulted before every transfer; `None` until assigned
    #[pallet::storage]
    pub type ActivePolicy<T: Config> = StorageValue<_, PolicyIdOf<T>, OptionQuery>;

    /// Set only while a policy decision is being computed
    #[pallet::storage]
    pub type Evaluating<T> = StorageValue<_, bool, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Tokens transferred from one account to another
        Transferred { from: T::AccountId, to: T::AccountId, amount: u128 },
        /// New tokens minted
        Minted { to: T::AccountId, amount: u128 },
        /// Tokens destroyed by their holder
        Burned { from: T::AccountId, amount: u128 },
        /// Spending ceiling set for `spender` over `owner`'s balance
        Approval { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        /// Transfers are now checked against `policy`
        PolicyAssigned { policy: PolicyIdOf<T>, initialized: bool },
        /// Ledger ownership handed over
        OwnershipTransferred { previous: T::AccountId, new: T::AccountId },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller is not the ledger owner.
        Unauthorized,
        /// No policy has been assigned yet, so nothing can be transferred.
        PolicyNotAssigned,
        /// The attached policy denied the transfer.
        NotWhitelisted,
        InsufficientBalance,
        InsufficientAllowance,
        /// The policy rejected the initialization payload.
        PolicyInitializationFailed,
        /// The policy reference does not resolve to an existing policy.
        UnknownPolicy,
        Overflow,
        /// A mutating call was attempted while a policy decision was running.
        /// Also returned by the transfer whose policy made that attempt.
        ReentrantCall,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            if T::OwnerOnlyMint::get() {
                Self::ensure_owner(origin)?;
            } else {
                ensure_signed(origin)?;
            }
            Self::do_mint(&to, amount)
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::transfer().saturating_add(T::Policy::decide_weight()))]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let from = ensure_signed(origin)?;
            Self::do_transfer(&from, &to, amount)
        }

        /// Set `spender`'s allowance over the caller's balance, replacing any
        /// previous value. Not subject to the transfer policy.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(origin: OriginFor<T>, spender: T::AccountId, amount: u128) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let owner = ensure_signed(origin)?;
            Allowances::<T>::insert(&owner, &spender, amount);
            Self::deposit_event(Event::Approval { owner, spender, amount });
            Ok(())
        }

        /// Move `amount` from `from` to `to` using the caller's allowance.
        ///
        /// The policy is asked about `(from, to)`; the spender plays no part
        /// in the decision.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::transfer_from().saturating_add(T::Policy::decide_weight()))]
        pub fn transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let spender = ensure_signed(origin)?;
            Self::do_transfer_from(&spender, &from, &to, amount)
        }

        /// Attach `policy`, optionally forwarding `init` to it first.
        ///
        /// Replaces any previously assigned policy. If the policy rejects
        /// `init` nothing changes.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::assign_policy().saturating_add(
            init.as_ref().map_or(Weight::zero(), T::Policy::initialize_weight)
        ))]
        pub fn assign_policy(
            origin: OriginFor<T>,
            policy: PolicyIdOf<T>,
            init: Option<InitPayloadOf<T>>,
        ) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let who = Self::ensure_owner(origin)?;
            Self::do_assign_policy(&who, policy, init)
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::assign_policy())]
        pub fn assign_policy_address(origin: OriginFor<T>, policy: PolicyIdOf<T>) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let who = Self::ensure_owner(origin)?;
            Self::do_assign_policy(&who, policy, None)
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::transfer_ownership())]
        pub fn transfer_ownership(origin: OriginFor<T>, new_owner: T::AccountId) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let previous = Self::ensure_owner(origin)?;
            Owner::<T>::put(&new_owner);
            Self::deposit_event(Event::OwnershipTransferred { previous, new: new_owner });
            Ok(())
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::burn())]
        pub fn burn(origin: OriginFor<T>, amount: u128) -> DispatchResult {
            Self::ensure_not_evaluating()?;
            let from = ensure_signed(origin)?;
            Self::do_burn(&from, amount)
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Ledger owner (the deployer). Required: a ledger without an owner
        /// can never be given a policy. `None` only exists so the config has
        /// a default, and building with it panics.
        pub owner: Option<T::AccountId>,
        /// Token name
        pub token_name: Vec<u8>,
        /// Token symbol
        pub token_symbol: Vec<u8>,
        /// Token decimals (e.g., 18 for ETH-style)
        pub decimals: u8,
        /// Initial token mints (account, amount)
        pub initial_balances: Vec<(T::AccountId, u128)>,
        /// Policy attached from the first block
        pub policy: Option<PolicyIdOf<T>>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            let name: BoundedVec<u8, ConstU32<64>> =
                self.token_name.clone().try_into().expect("Token name too long (max 64 bytes)");
            TokenName::<T>::put(name);

            let symbol: BoundedVec<u8, ConstU32<16>> =
                self.token_symbol.clone().try_into().expect("Token symbol too long (max 16 bytes)");
            TokenSymbol::<T>::put(symbol);

            Decimals::<T>::put(self.decimals);

            let owner = self.owner.as_ref().expect("Genesis must name a ledger owner");
            Owner::<T>::put(owner);

            for (account, amount) in &self.initial_balances {
                Pallet::<T>::do_mint(account, *amount).expect("Initial supply overflows u128");
            }

            if let Some(ref policy) = self.policy {
                ActivePolicy::<T>::put(policy);
            }
        }
    }
}

impl<T: Config> Pallet<T> {
    fn ensure_owner(origin: OriginFor<T>) -> Result<T::AccountId, DispatchError> {
        let who = ensure_signed(origin)?;
        ensure!(Owner::<T>::get().as_ref() == Some(&who), Error::<T>::Unauthorized);
        Ok(who)
    }

    /// Reject the call if a policy decision is running, and flag the attempt
    /// so the decision itself fails.
    fn ensure_not_evaluating() -> DispatchResult {
        if Evaluating::<T>::get() {
            let _ = with_context::<ReentryAttempted, _>(|attempt| attempt.set(ReentryAttempted));
            log::warn!(target: LOG_TARGET, "mutating call attempted during policy evaluation");
            return Err(Error::<T>::ReentrantCall.into());
        }
        Ok(())
    }

    /// Ask `policy` about `(subject, target)`.
    ///
    /// Every write made while deciding is discarded, including the
    /// `Evaluating` flag itself. If the policy tried to call back into the
    /// ledger the decision fails with `ReentrantCall`, whatever it returned.
    fn evaluate(
        policy: &PolicyIdOf<T>,
        subject: &T::AccountId,
        target: &T::AccountId,
    ) -> Result<bool, DispatchError> {
        run_in_context(|| {
            let _ = with_context::<ReentryAttempted, _>(|attempt| attempt.take());

            let allowed = with_transaction(|| {
                Evaluating::<T>::put(true);
                let allowed = T::Policy::decide(policy, subject, target);
                TransactionOutcome::Rollback(Ok::<_, DispatchError>(allowed))
            })?;

            let reentered = with_context::<ReentryAttempted, _>(|attempt| attempt.take().is_some())
                .unwrap_or(false);
            if reentered {
                log::error!(
                    target: LOG_TARGET,
                    "policy {policy:?} attempted to re-enter the ledger, aborting {subject:?} -> {target:?}"
                );
                return Err(Error::<T>::ReentrantCall.into());
            }
            Ok(allowed)
        })
    }

    fn ensure_permitted(from: &T::AccountId, to: &T::AccountId) -> DispatchResult {
        let policy = ActivePolicy::<T>::get().ok_or(Error::<T>::PolicyNotAssigned)?;
        if !Self::evaluate(&policy, from, to)? {
            log::debug!(
                target: LOG_TARGET,
                "policy {policy:?} denied transfer {from:?} -> {to:?}"
            );
            return Err(Error::<T>::NotWhitelisted.into());
        }
        Ok(())
    }

    /// Debit `from` and credit `to`. Nothing is written unless both sides
    /// are valid.
    fn move_balance(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        let from_balance =
            Balances::<T>::get(from).checked_sub(amount).ok_or(Error::<T>::InsufficientBalance)?;
        if from != to {
            let to_balance =
                Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Balances::<T>::insert(from, from_balance);
            Balances::<T>::insert(to, to_balance);
        }
        Self::deposit_event(Event::Transferred { from: from.clone(), to: to.clone(), amount });
        Ok(())
    }

    pub fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        Self::ensure_permitted(from, to)?;
        Self::move_balance(from, to, amount)
    }

    pub fn do_transfer_from(
        spender: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_permitted(from, to)?;
        let remaining = Allowances::<T>::get(from, spender)
            .checked_sub(amount)
            .ok_or(Error::<T>::InsufficientAllowance)?;
        Self::move_balance(from, to, amount)?;
        Allowances::<T>::insert(from, spender, remaining);
        Ok(())
    }

    pub fn do_mint(to: &T::AccountId, amount: u128) -> DispatchResult {
        let supply = TotalSupply::<T>::get().checked_add(amount).ok_or(Error::<T>::Overflow)?;
        let balance = Balances::<T>::get(to).checked_add(amount).ok_or(Error::<T>::Overflow)?;
        TotalSupply::<T>::put(supply);
        Balances::<T>::insert(to, balance);
        Self::deposit_event(Event::Minted { to: to.clone(), amount });
        Ok(())
    }

    pub fn do_burn(from: &T::AccountId, amount: u128) -> DispatchResult {
        let balance =
            Balances::<T>::get(from).checked_sub(amount).ok_or(Error::<T>::InsufficientBalance)?;
        // Supply is the sum of all balances, so it cannot be below `amount` here.
        let supply = TotalSupply::<T>::get().saturating_sub(amount);
        Balances::<T>::insert(from, balance);
        TotalSupply::<T>::put(supply);
        Self::deposit_event(Event::Burned { from: from.clone(), amount });
        Ok(())
    }

    pub fn do_assign_policy(
        who: &T::AccountId,
        policy: PolicyIdOf<T>,
        init: Option<InitPayloadOf<T>>,
    ) -> DispatchResult {
        ensure!(T::Policy::exists(&policy), Error::<T>::UnknownPolicy);

        let initialized = init.is_some();
        if let Some(payload) = init {
            with_storage_layer(|| T::Policy::initialize(&policy, who, payload)).map_err(|e| {
                log::debug!(
                    target: LOG_TARGET,
                    "policy {policy:?} rejected initialization: {e:?}"
                );
                Error::<T>::PolicyInitializationFailed
            })?;
        }

        ActivePolicy::<T>::put(&policy);
        log::debug!(target: LOG_TARGET, "policy {policy:?} assigned");
        Self::deposit_event(Event::PolicyAssigned { policy, initialized });
        Ok(())
    }

    pub fn balance_of(who: &T::AccountId) -> u128 {
        Balances::<T>::get(who)
    }

    pub fn allowance(owner: &T::AccountId, spender: &T::AccountId) -> u128 {
        Allowances::<T>::get(owner, spender)
    }

    pub fn total_supply() -> u128 {
        TotalSupply::<T>::get()
    }

    pub fn owner() -> Option<T::AccountId> {
        Owner::<T>::get()
    }

    pub fn current_policy() -> Option<PolicyIdOf<T>> {
        ActivePolicy::<T>::get()
    }

    pub fn token_name() -> Vec<u8> {
        TokenName::<T>::get().into_inner()
    }

    pub fn token_symbol() -> Vec<u8> {
        TokenSymbol::<T>::get().into_inner()
    }

    pub fn decimals() -> u8 {
        Decimals::<T>::get()
    }
}
