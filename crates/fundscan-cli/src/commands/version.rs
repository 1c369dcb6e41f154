use fundscan_core::version::version_string;
use miette::Result;

pub fn run(json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "version": fundscan_core::VERSION,
                "schema_version": fundscan_core::version::FUND_SCHEMA_VERSION
            })
        );
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
