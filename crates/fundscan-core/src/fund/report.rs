/// Short message printed after an install when funded packages exist.
///
/// Returns `None` when there is nothing to report or output is JSON.
#[must_use]
pub fn funding_report(length: usize, json: bool) -> Option<String> {
    if json || length == 0 {
        return None;
    }

    let subject = if length == 1 {
        "package is"
    } else {
        "packages are"
    };
    Some(format!(
        "{length} {subject} looking for funding\n  run `fundscan fund` for details"
    ))
}
