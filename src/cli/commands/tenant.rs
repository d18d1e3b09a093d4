use clap::Subcommand;
use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::cli::client::{segment, ApiClient};
use crate::cli::utils::{output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "Show tenant connection metadata")]
    Get {
        #[arg(help = "Tenant ID")]
        tenant: String,
    },

    #[command(about = "Create or replace a tenant")]
    Create {
        #[arg(help = "Tenant ID")]
        tenant: String,
        #[arg(long, help = "Cache host name")]
        host: String,
        #[arg(long, help = "Cache port")]
        port: u16,
        #[arg(long, default_value = "json", help = "Serializer format (json, yaml)")]
        serializer: String,
        #[arg(long = "type", default_value = "", help = "Tenant type")]
        tenant_type: String,
    },

    #[command(about = "Change a tenant's type and/or port")]
    Update {
        #[arg(help = "Tenant ID")]
        tenant: String,
        #[arg(long = "type", help = "New tenant type")]
        tenant_type: Option<String>,
        #[arg(long, help = "New cache port")]
        port: Option<u16>,
    },

    #[command(about = "Delete a tenant")]
    Delete {
        #[arg(help = "Tenant ID")]
        tenant: String,
    },
}

fn update_body(tenant_type: Option<String>, port: Option<u16>) -> Value {
    let mut body = Map::new();
    if let Some(tenant_type) = tenant_type {
        body.insert("type".to_string(), json!(tenant_type));
    }
    if let Some(port) = port {
        body.insert("port".to_string(), json!(port));
    }
    Value::Object(body)
}

pub async fn handle(client: &ApiClient, cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TenantCommands::Get { tenant } => {
            let path = format!("/tenants/{}", segment(&tenant));
            let record = client.call(Method::GET, &path, None, None).await?;
            output_record(output_format, &record)
        }
        TenantCommands::Create {
            tenant,
            host,
            port,
            serializer,
            tenant_type,
        } => {
            let body = json!({
                "tenant": tenant,
                "hostName": host,
                "port": port,
                "serializer": serializer,
                "type": tenant_type,
            });
            let record = client.call(Method::POST, "/tenants", None, Some(&body)).await?;
            output_success(output_format, &format!("Tenant '{}' saved", tenant), Some(record))
        }
        TenantCommands::Update {
            tenant,
            tenant_type,
            port,
        } => {
            if tenant_type.is_none() && port.is_none() {
                anyhow::bail!("nothing to update: pass --type and/or --port");
            }
            let path = format!("/tenants/{}", segment(&tenant));
            let body = update_body(tenant_type, port);
            let record = client.call(Method::PUT, &path, None, Some(&body)).await?;
            output_record(output_format, &record)
        }
        TenantCommands::Delete { tenant } => {
            let path = format!("/tenants/{}", segment(&tenant));
            let record = client.call(Method::DELETE, &path, None, None).await?;
            output_success(output_format, &format!("Tenant '{}' deleted", tenant), Some(record))
        }
    }
}
