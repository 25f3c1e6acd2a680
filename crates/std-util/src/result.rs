#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            actual => {
                use std::fmt::Write;
                let mut msg = format!("expected `Err`; actual={:?}", actual);

                $(
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Ok(v) => v,
            actual => {
                use std::fmt::Write;
                let mut msg = format!("expected `Ok`; actual={:?}", actual);

                $(
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

/// Unwraps a write that must succeed: neither a fatal error nor an invalid
/// changeset.
#[macro_export]
macro_rules! assert_written {
    ($e:expr) => {
        match $e {
            Ok(Ok(v)) => v,
            actual => panic!("expected a successful write; actual={:?}", actual),
        }
    };
}

/// Unwraps a write that must hand back an invalid changeset.
#[macro_export]
macro_rules! assert_invalid {
    ($e:expr) => {
        match $e {
            Ok(Err(changeset)) => changeset,
            actual => panic!("expected an invalid changeset; actual={:?}", actual),
        }
    };
}
