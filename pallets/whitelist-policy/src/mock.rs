use crate as pallet_whitelist_policy;
use frame_support::{derive_impl, parameter_types, traits::ConstU32};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};

type Block = frame_system::mocking::MockBlock<Test>;

frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Whitelist: pallet_whitelist_policy,
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
pub const OUTSIDER: u64 = 7;
pub const OPERATOR: u64 = 9;

/// Whitelist created at genesis, owned by `OWNER`.
pub const LIST: u32 = 0;

pub const MAX_MEMBERS: u32 = 8;

parameter_types! {
    pub static Creators: Vec<u64> = vec![OWNER, USER1, USER2];
}

pub struct EnsureCreator;
impl frame_support::traits::EnsureOrigin<RuntimeOrigin> for EnsureCreator {
    type Success = u64;

    fn try_origin(o: RuntimeOrigin) -> Result<Self::Success, RuntimeOrigin> {
        match o.clone().into() {
            Ok(frame_system::RawOrigin::Signed(account)) if Creators::get().contains(&account) => {
                Ok(account)
            }
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<RuntimeOrigin, ()> {
        Ok(RuntimeOrigin::signed(OWNER))
    }
}

impl pallet_whitelist_policy::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type CreateOrigin = EnsureCreator;
    type MaxMembers = ConstU32<MAX_MEMBERS>;
    type MaxBatchSize = ConstU32<16>;
    type WeightInfo = ();
}

// Build genesis storage with a single empty whitelist owned by `OWNER`.
// `OWNER`, `USER1` and `USER2` may create further whitelists.
pub fn new_test_ext() -> sp_io::TestExternalities {
    Creators::set(vec![OWNER, USER1, USER2]);
    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_whitelist_policy::GenesisConfig::<Test> { whitelists: vec![(OWNER, vec![])] }
        .assimilate_storage(&mut t)
        .unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
