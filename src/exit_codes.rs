//! Exit code constants for the orcasai CLI.
//!
//! The CLI collaborator relies on these being distinct:
//! - 0: Success
//! - 1: User error (bad args, missing runner command)
//! - 2: Pod not found
//! - 3: Validation or binding failure (config, tools, pod schema, inputs)
//! - 4: Execution failure reported by the agent runtime

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid invocation.
pub const USER_ERROR: i32 = 1;

/// No pod definition file maps to the requested key.
pub const POD_NOT_FOUND: i32 = 2;

/// Validation or binding failure: tools config, pod schema, tool resolution,
/// missing inputs, template errors, or an unknown agent reference.
pub const VALIDATION_FAILURE: i32 = 3;

/// The external agent runtime reported a terminal failure.
pub const EXECUTION_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            POD_NOT_FOUND,
            VALIDATION_FAILURE,
            EXECUTION_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero_and_failures_are_not() {
        assert_eq!(SUCCESS, 0);
        for code in [USER_ERROR, POD_NOT_FOUND, VALIDATION_FAILURE, EXECUTION_FAILURE] {
            assert_ne!(code, 0);
        }
    }
}
