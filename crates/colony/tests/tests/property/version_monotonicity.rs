//! Property tests: the current colony version never goes backwards, and an
//! upgrade succeeds exactly when its target is registered and newer.

use colony_tests::World;
use colony_types::{ErrorCode, Version};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Registration attempts with arbitrary declared versions.
    #[test]
    fn current_version_non_decreasing(declared in prop::collection::vec(1u64..6, 1..10)) {
        let mut w = World::new().unwrap();
        let mut previous = w.net.current_colony_version();
        for v in declared {
            let resolver = w.net.deploy_colony_version(Version(v), Vec::new()).unwrap();
            let result = w.net.add_colony_version(w.owner, resolver);
            let current = w.net.current_colony_version();

            prop_assert!(current >= previous);
            if v == previous.0 + 1 {
                prop_assert_eq!(result.unwrap(), Version(v));
                prop_assert_eq!(current, Version(v));
            } else {
                prop_assert_eq!(result.unwrap_err().code(), ErrorCode::BadVersionOrder);
                prop_assert_eq!(current, previous);
            }
            previous = current;
        }
    }

    #[test]
    fn upgrade_iff_registered_and_newer(
        registered in 1u64..5,
        targets in prop::collection::vec(0u64..7, 1..8),
    ) {
        let mut w = World::new().unwrap();
        w.add_colony_versions(registered).unwrap();
        let colony = w.colony;

        for target in targets {
            let before = w.net.colony_version(colony).unwrap();
            let result = w.net.upgrade_colony(w.owner, colony, Version(target));
            let should_succeed = target > before.0 && target <= registered;
            prop_assert_eq!(result.is_ok(), should_succeed);

            let after = w.net.colony_version(colony).unwrap();
            if should_succeed {
                prop_assert_eq!(after, Version(target));
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}
