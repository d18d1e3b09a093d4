use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a single record: pretty JSON, or aligned `field: value` lines
pub fn output_record(output_format: OutputFormat, record: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => {
            for line in record_lines(record) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn record_lines(record: &Value) -> Vec<String> {
    match record.as_object() {
        Some(fields) => {
            let width = fields.keys().map(|k| k.len()).max().unwrap_or(0);
            fields
                .iter()
                .map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    format!("{:<width$}  {}", key, text, width = width)
                })
                .collect()
        }
        None => vec![record.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_record_fields() {
        let lines = record_lines(&json!({"id": "jane.doe", "email": "j@x.com", "port": 1408}));
        assert!(lines.contains(&"id     jane.doe".to_string()));
        assert!(lines.contains(&"email  j@x.com".to_string()));
        assert!(lines.contains(&"port   1408".to_string()));
    }

    #[test]
    fn non_objects_print_as_json() {
        assert_eq!(record_lines(&json!([1, 2])), vec!["[1,2]".to_string()]);
    }
}
