//! Subcommand implementations.

pub mod count;
pub mod fund;
pub mod source;
pub mod version;

use fundscan_core::FundError;

/// Report a failure and exit with status 1.
///
/// JSON mode prints the stable `{ ok: false, error: { code, message } }`
/// envelope on stdout.
pub fn exit_with_error(err: &FundError, json: bool) -> ! {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": {
                    "code": err.code(),
                    "message": err.to_string()
                }
            })
        );
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}
