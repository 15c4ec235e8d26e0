//! Output formatting and exit codes.

use docdesk_executor::OperationResult;

/// Exit code for a completed operation.
pub const EXIT_OK: i32 = 0;
/// Exit code for a failed operation.
pub const EXIT_FAILED: i32 = 1;
/// Exit code for bad arguments or configuration.
pub const EXIT_USAGE: i32 = 2;

/// Render the result envelope for stdout.
pub fn format_result(result: &OperationResult, compact: bool) -> String {
    result.to_json(compact)
}

/// Exit code for a result envelope.
pub fn exit_code(result: &OperationResult) -> i32 {
    if result.success {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}

/// Log filter for the given `-v` count, unless `explicit` overrides it.
pub fn log_filter(verbose: u8, explicit: Option<&str>) -> String {
    if let Some(filter) = explicit {
        return filter.to_string();
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdesk_executor::{Error, Output};

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&OperationResult::ok(Output::Unit)), EXIT_OK);
        let failed = OperationResult::err(&Error::MissingIdentifier);
        assert_eq!(exit_code(&failed), EXIT_FAILED);
    }

    #[test]
    fn test_compact_is_one_line() {
        let result = OperationResult::ok(Output::DocumentText(None));
        assert!(!format_result(&result, true).contains('\n'));
        assert!(format_result(&result, false).contains('\n'));
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0, None), "warn");
        assert_eq!(log_filter(2, None), "debug");
        assert_eq!(log_filter(9, None), "trace");
        assert_eq!(log_filter(1, Some("docdesk::query=trace")), "docdesk::query=trace");
    }
}
