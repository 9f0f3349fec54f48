use std::error::Error;

pub(crate) trait ResultExtension<T, E: Error> {
    /// Like [`Result::unwrap`], but only for error types implementing [`Error`], and panics with
    /// the error's own message rather than its debug representation. Used for contract
    /// violations, which share the strongly typed errors of the fallible paths but aren't meant to
    /// be handled.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    #[track_caller]
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    #[track_caller]
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{}", error),
        }
    }
}
