//! SBML validation through the sbml.org online validator.

use std::path::Path;

use anyhow::Context;
use reqwest::multipart;

const VALIDATOR_URL: &str = "http://sbml.org/validator/";

/// Upload `path` to the online validator and report the result.
///
/// Returns `"OK"` when the file validates, otherwise a JSON listing of the
/// problems found. Unit consistency checking is off.
pub async fn validate(path: &Path) -> anyhow::Result<String> {
    let contents = std::fs::read(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model.sbml".to_string());
    let form = multipart::Form::new()
        .part(
            "file",
            multipart::Part::bytes(contents).file_name(file_name),
        )
        .text("output", "json")
        .text("offcheck", "u");

    let response = reqwest::Client::new()
        .post(VALIDATOR_URL)
        .multipart(form)
        .send()
        .await
        .context("validator request failed")?
        .error_for_status()
        .context("validator rejected the request")?;
    let body: serde_json::Value = response
        .json()
        .await
        .context("validator returned malformed JSON")?;

    let results = body
        .get("validation-results")
        .context("validator response has no validation-results")?;
    if results.get("no-errors").is_some() {
        Ok("OK".to_string())
    } else {
        let problems = results
            .get("problem")
            .context("validator reported errors without a problem listing")?;
        Ok(serde_json::to_string_pretty(problems)?)
    }
}
