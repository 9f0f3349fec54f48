/// Asserts that a block panics, catching the unwind so that the test can go on to inspect the
/// state left behind. An optional second argument requires the panic message to contain it.
macro_rules! assert_panics {
    ($run:block) => {
        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _ = $run;
            }))
            .is_err(),
            "assertion failed to panic"
        )
    };
    ($run:block, $contains:expr) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = $run;
        })) {
            Ok(_) => panic!("assertion failed to panic"),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<String>()
                    .map(String::as_str)
                    .or_else(|| payload.downcast_ref::<&str>().copied())
                    .unwrap_or_default();
                assert!(
                    message.contains($contains),
                    "panic message {:?} doesn't contain {:?}",
                    message,
                    $contains
                );
            },
        }
    };
}

pub(crate) use assert_panics;
