use crate as pallet_enforced_token;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame_support::{derive_impl, ord_parameter_types, parameter_types, traits::ConstU32};
use frame_system::EnsureSignedBy;
use pallet_whitelist_policy::WhitelistId;
use scale_info::TypeInfo;
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage, DispatchError, DispatchResult,
};
use std::cell::RefCell;
use transfer_policy_primitives::TransferPolicy;

type Block = frame_system::mocking::MockBlock<Test>;

// Whitelist is declared first so its genesis runs before the ledger's.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Whitelist: pallet_whitelist_policy,
        EnforcedToken: pallet_enforced_token,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
}

pub const OWNER: u64 = 1;
pub const USER1: u64 = 2;
pub const USER2: u64 = 3;
pub const USER3: u64 = 4;
pub const OPERATOR: u64 = 9;

/// Whitelist created at genesis, owned by `OWNER`, initially empty.
pub const LIST: WhitelistId = 0;

pub const INITIAL_BALANCE: u128 = 100;

ord_parameter_types! {
    pub const WhitelistCreator: u64 = OWNER;
}

impl pallet_whitelist_policy::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type CreateOrigin = EnsureSignedBy<WhitelistCreator, u64>;
    type MaxMembers = ConstU32<64>;
    type MaxBatchSize = ConstU32<16>;
    type WeightInfo = ();
}

/// Policy kinds this runtime can attach to the ledger.
#[derive(
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum MockPolicy {
    /// Destination must be a member of the whitelist.
    Whitelist(WhitelistId),
    /// Only the given account may send.
    OnlyFrom(u64),
    /// Writes storage while deciding, then allows.
    Scribble,
    /// Tries to call back into the ledger and to write storage while deciding.
    Reentrant,
}

/// Storage key written by the `Scribble` and `Reentrant` policies while deciding.
pub const PROBE_KEY: &[u8] = b":mock:probe";

thread_local! {
    /// Outcome of the last nested ledger call made by `MockPolicy::Reentrant`.
    pub static NESTED_CALL: RefCell<Option<DispatchResult>> = const { RefCell::new(None) };
}

pub fn nested_call_result() -> Option<DispatchResult> {
    NESTED_CALL.with(|r| r.borrow().clone())
}

pub struct MockPolicies;
impl TransferPolicy<u64> for MockPolicies {
    type PolicyId = MockPolicy;
    type InitPayload = <Whitelist as TransferPolicy<u64>>::InitPayload;

    fn exists(policy: &MockPolicy) -> bool {
        match policy {
            MockPolicy::Whitelist(id) => <Whitelist as TransferPolicy<u64>>::exists(id),
            MockPolicy::OnlyFrom(_) | MockPolicy::Scribble | MockPolicy::Reentrant => true,
        }
    }

    fn decide(policy: &MockPolicy, subject: &u64, target: &u64) -> bool {
        match policy {
            MockPolicy::Whitelist(id) => {
                <Whitelist as TransferPolicy<u64>>::decide(id, subject, target)
            }
            MockPolicy::OnlyFrom(sender) => subject == sender,
            MockPolicy::Scribble => {
                sp_io::storage::set(PROBE_KEY, &[1]);
                true
            }
            MockPolicy::Reentrant => {
                let nested = EnforcedToken::mint(RuntimeOrigin::signed(OWNER), *subject, 1_000);
                NESTED_CALL.with(|r| *r.borrow_mut() = Some(nested));
                sp_io::storage::set(PROBE_KEY, &[1]);
                true
            }
        }
    }

    fn initialize(policy: &MockPolicy, initializer: &u64, payload: Self::InitPayload) -> DispatchResult {
        match policy {
            MockPolicy::Whitelist(id) => {
                <Whitelist as TransferPolicy<u64>>::initialize(id, initializer, payload)
            }
            MockPolicy::OnlyFrom(_) | MockPolicy::Scribble | MockPolicy::Reentrant => {
                Err(DispatchError::Other("policy takes no initialization payload"))
            }
        }
    }
}

#[cfg(feature = "runtime-benchmarks")]
pub struct PolicySetup;
#[cfg(feature = "runtime-benchmarks")]
impl transfer_policy_primitives::BenchmarkHelper<u64, MockPolicy> for PolicySetup {
    fn allowing_policy(owner: &u64, target: &u64) -> MockPolicy {
        MockPolicy::Whitelist(<Whitelist as transfer_policy_primitives::BenchmarkHelper<
            u64,
            WhitelistId,
        >>::allowing_policy(owner, target))
    }
}

parameter_types! {
    pub static OwnerOnlyMint: bool = true;
}

impl pallet_enforced_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type Policy = MockPolicies;
    type OwnerOnlyMint = OwnerOnlyMint;
    type WeightInfo = ();
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper = PolicySetup;
}

/// Ledger owned by `OWNER` holding 100 for `USER1` and `USER2`, with no policy
/// attached. Whitelist `LIST` exists and is empty.
pub fn new_test_ext() -> sp_io::TestExternalities {
    ExtBuilder::default().build()
}

pub struct ExtBuilder {
    balances: Vec<(u64, u128)>,
    policy: Option<MockPolicy>,
    whitelist_owner: u64,
    whitelisted: Vec<u64>,
}

impl Default for ExtBuilder {
    fn default() -> Self {
        Self {
            balances: vec![(USER1, INITIAL_BALANCE), (USER2, INITIAL_BALANCE)],
            policy: None,
            whitelist_owner: OWNER,
            whitelisted: vec![],
        }
    }
}

impl ExtBuilder {
    pub fn balances(mut self, balances: Vec<(u64, u128)>) -> Self {
        self.balances = balances;
        self
    }

    pub fn policy(mut self, policy: MockPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn whitelist(mut self, owner: u64, members: Vec<u64>) -> Self {
        self.whitelist_owner = owner;
        self.whitelisted = members;
        self
    }

    pub fn build(self) -> sp_io::TestExternalities {
        OwnerOnlyMint::set(true);
        NESTED_CALL.with(|r| *r.borrow_mut() = None);

        let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

        pallet_whitelist_policy::GenesisConfig::<Test> {
            whitelists: vec![(self.whitelist_owner, self.whitelisted)],
        }
        .assimilate_storage(&mut t)
        .unwrap();

        pallet_enforced_token::GenesisConfig::<Test> {
            owner: Some(OWNER),
            token_name: b"Guardian Token".to_vec(),
            token_symbol: b"GRD".to_vec(),
            decimals: 18,
            initial_balances: self.balances,
            policy: self.policy,
        }
        .assimilate_storage(&mut t)
        .unwrap();

        let mut ext = sp_io::TestExternalities::new(t);
        ext.execute_with(|| System::set_block_number(1));
        ext
    }
}
