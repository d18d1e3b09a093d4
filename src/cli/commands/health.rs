use reqwest::Method;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_record;
use crate::cli::OutputFormat;

/// Prints the health report; exits non-zero when the server is DOWN
pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (status, report) = client.send(Method::GET, "/health", None, None).await?;

    match output_format {
        OutputFormat::Json => output_record(output_format, &report)?,
        OutputFormat::Text => {
            println!("Status: {}", report["status"].as_str().unwrap_or("UNKNOWN"));
            output_record(output_format, &report["details"])?;
        }
    }

    if !status.is_success() {
        anyhow::bail!("server reported {}", status);
    }
    Ok(())
}
